//! Locating frames in the tree by id.
//!
//! The tree has no parent pointers, so every operation that names a frame by
//! id first searches for it, pre-order, descending only into container
//! bodies. The result records both the ids and the body indices on the way
//! down from the top level.

use crate::edit_state::EditableFrame;
use crate::frame::FrameId;

/// Where a frame sits in the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Location {
    /// Ids from the top-level frame down to the target, inclusive.
    pub ids: Vec<FrameId>,
    /// Index into each successive sibling sequence; same length as `ids`.
    pub indices: Vec<usize>,
}

impl Location {
    /// Depth of the located frame: the number of containers above it.
    pub fn depth(&self) -> usize {
        self.indices.len().saturating_sub(1)
    }

    /// Index of the frame within its own sibling sequence.
    pub fn index(&self) -> usize {
        self.indices.last().copied().unwrap_or_default()
    }

    /// Body indices leading to the frame's parent; empty at top level.
    pub fn parent_indices(&self) -> &[usize] {
        &self.indices[..self.depth()]
    }

    /// Id of the enclosing container, if any.
    pub fn parent_id(&self) -> Option<FrameId> {
        self.ids.len().checked_sub(2).map(|i| self.ids[i])
    }
}

/// Find `target`, returning `None` if it is not in the tree.
pub(crate) fn locate(frames: &[EditableFrame], target: FrameId) -> Option<Location> {
    let mut location = Location {
        ids: Vec::new(),
        indices: Vec::new(),
    };
    if search(frames, target, &mut location) {
        tracing::trace!(%target, path = ?location.ids, "located frame");
        Some(location)
    } else {
        None
    }
}

fn search(frames: &[EditableFrame], target: FrameId, location: &mut Location) -> bool {
    for (index, frame) in frames.iter().enumerate() {
        location.ids.push(frame.id());
        location.indices.push(index);
        if frame.id() == target {
            return true;
        }
        if let Some(body) = frame.frame.body()
            && search(body, target, location)
        {
            return true;
        }
        location.ids.pop();
        location.indices.pop();
    }
    false
}

/// The sibling sequence reached by following `parent` body indices.
pub(crate) fn siblings_mut<'a>(
    frames: &'a mut Vec<EditableFrame>,
    parent: &[usize],
) -> Option<&'a mut Vec<EditableFrame>> {
    let mut current = frames;
    for &index in parent {
        current = current.get_mut(index)?.frame.body_mut()?;
    }
    Some(current)
}

/// The frame reached by following `indices`.
pub(crate) fn frame_at_mut<'a>(
    frames: &'a mut Vec<EditableFrame>,
    indices: &[usize],
) -> Option<&'a mut EditableFrame> {
    let (last, parent) = indices.split_last()?;
    siblings_mut(frames, parent)?.get_mut(*last)
}

pub(crate) fn frame_at<'a>(frames: &'a [EditableFrame], indices: &[usize]) -> Option<&'a EditableFrame> {
    let (first, rest) = indices.split_first()?;
    let mut current = frames.get(*first)?;
    for &index in rest {
        current = current.frame.body()?.get(index)?;
    }
    Some(current)
}
