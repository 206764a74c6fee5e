//! `FramesEditor`: the owner of the frame tree and its only writer.
//!
//! Every operation names frames by id and resolves them to a position with a
//! path search. A frame that cannot be found turns the operation into a no-op;
//! the presentation layer may hold ids that a previous event deleted.

mod path;

use std::collections::HashSet;

use tracing::{debug, trace};

use crate::codegen::{self, CodegenOptions};
use crate::edit_state::{EditAction, EditStatus, EditableFrame, save_all, walk_all};
use crate::error::FrameError;
use crate::frame::{Frame, FrameId, reserve_ids_through};
use crate::sample::sample_frames;

use path::{Location, frame_at, frame_at_mut, locate, siblings_mut};

/// A request from the presentation layer about one frame.
#[derive(Debug, Clone)]
pub enum EditRequest {
    Edit,
    Save,
    /// Replace the payload while editing continues.
    Modify(Frame),
    Delete,
    SelectIndex,
}

impl EditRequest {
    pub fn action(&self) -> EditAction {
        match self {
            EditRequest::Edit => EditAction::Edit,
            EditRequest::Save => EditAction::Save,
            EditRequest::Modify(_) => EditAction::Modify,
            EditRequest::Delete => EditAction::Delete,
            EditRequest::SelectIndex => EditAction::SelectIndex,
        }
    }
}

/// The frame tree plus the last selection path.
#[derive(Debug, Default, Clone)]
pub struct FramesEditor {
    frames: Vec<EditableFrame>,
    /// Ids from the top level down to the selected frame; empty when nothing is selected.
    index_path: Vec<FrameId>,
    revision: u64,
}

// Constructors
impl FramesEditor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take ownership of an existing tree.
    ///
    /// Rejects duplicate ids, ids above [`MAX_FRAME_ID`](crate::MAX_FRAME_ID) and more than one
    /// frame being edited. The process id allocator is moved past every id in
    /// the tree before empty container bodies get their placeholders, then
    /// depths are recomputed.
    pub fn from_frames(mut frames: Vec<EditableFrame>) -> Result<Self, FrameError> {
        let mut seen = HashSet::new();
        let mut editing: Option<FrameId> = None;
        let mut problem = None;
        walk_all(&frames, &mut |f| {
            if problem.is_some() {
                return;
            }
            if !f.id().is_storable() {
                problem = Some(FrameError::IdOutOfRange(f.id()));
            } else if !seen.insert(f.id()) {
                problem = Some(FrameError::DuplicateId(f.id()));
            } else if f.is_being_edited() {
                match editing {
                    Some(first) => problem = Some(FrameError::MultipleEditors(first, f.id())),
                    None => editing = Some(f.id()),
                }
            }
        });
        if let Some(err) = problem {
            return Err(err);
        }

        if let Some(max) = seen.into_iter().max() {
            reserve_ids_through(max);
        }
        for frame in &mut frames {
            frame.frame.set_depth(0);
            fill_placeholders(frame);
        }
        debug!(count = frames.len(), "loaded frames");
        Ok(Self {
            frames,
            index_path: Vec::new(),
            revision: 0,
        })
    }

    /// An editor holding the starter project.
    pub fn sample() -> Self {
        let frames = sample_frames();
        let max = frames_max_id(&frames);
        if let Some(max) = max {
            reserve_ids_through(max);
        }
        Self {
            frames,
            index_path: Vec::new(),
            revision: 0,
        }
    }
}

// Read-only views
impl FramesEditor {
    /// The top-level frame sequence.
    pub fn frames(&self) -> &[EditableFrame] {
        &self.frames
    }

    /// An owned copy of the current tree.
    pub fn snapshot(&self) -> Vec<EditableFrame> {
        self.frames.clone()
    }

    pub fn into_frames(self) -> Vec<EditableFrame> {
        self.frames
    }

    pub fn index_path(&self) -> &[FrameId] {
        &self.index_path
    }

    /// The selected frame's id, if anything is selected.
    pub fn selected(&self) -> Option<FrameId> {
        self.index_path.last().copied()
    }

    /// Bumped by every change to the tree.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn find(&self, id: FrameId) -> Option<&EditableFrame> {
        let location = locate(&self.frames, id)?;
        frame_at(&self.frames, &location.indices)
    }

    /// The frame currently being edited, if any.
    pub fn being_edited(&self) -> Option<&EditableFrame> {
        let mut found = None;
        walk_all(&self.frames, &mut |f| {
            if found.is_none() && f.is_being_edited() {
                found = Some(f);
            }
        });
        found
    }

    /// Generate source for the current tree.
    pub fn python_code(&self, options: &CodegenOptions) -> String {
        codegen::python_code(&self.frames, options)
    }
}

// Operations
impl FramesEditor {
    /// Record the path to `id` as the selection.
    ///
    /// Returns `false`, leaving nothing selected, if `id` is not in the tree.
    pub fn select_index(&mut self, id: FrameId) -> bool {
        match locate(&self.frames, id) {
            Some(location) => {
                debug!(%id, "select frame");
                self.index_path = location.ids;
                true
            }
            None => {
                debug!(%id, "select: frame not found");
                self.index_path.clear();
                false
            }
        }
    }

    /// Start editing `id`. Every other frame is saved first.
    pub fn edit(&mut self, id: FrameId) -> bool {
        let Some(location) = locate(&self.frames, id) else {
            debug!(%id, "edit: frame not found");
            return false;
        };
        save_all(&mut self.frames);
        if let Some(target) = frame_at_mut(&mut self.frames, &location.indices) {
            target.edit_status = EditStatus::BeingEdited;
        }
        debug!(%id, "edit frame");
        self.index_path = location.ids;
        self.bump();
        true
    }

    /// Finish whatever edit is in progress.
    pub fn save(&mut self) {
        debug!("save frames");
        save_all(&mut self.frames);
        self.bump();
    }

    /// Replace the payload of `id`, which must be being edited, with that of
    /// `replacement`. The id is kept and depths are recomputed from position.
    pub fn modify(&mut self, id: FrameId, replacement: Frame) -> Result<bool, FrameError> {
        let Some(location) = locate(&self.frames, id) else {
            debug!(%id, "modify: frame not found");
            return Ok(false);
        };
        let Some(current) = frame_at(&self.frames, &location.indices) else {
            return Ok(false);
        };
        if !current.is_being_edited() {
            return Err(FrameError::NotBeingEdited(id));
        }
        if current.frame.tag() != replacement.tag() {
            return Err(FrameError::KindMismatch {
                id,
                expected: current.frame.tag(),
                found: replacement.tag(),
            });
        }
        let max_incoming = self.check_new_ids(&replacement, Some(id))?;
        reserve_ids_through(max_incoming);

        let mut updated = EditableFrame::being_edited(Frame {
            id,
            depth: location.depth(),
            kind: replacement.kind,
        });
        if let Some(body) = updated.frame.body_mut() {
            save_all(body);
        }
        updated.frame.set_depth(location.depth());
        fill_placeholders(&mut updated);

        if let Some(target) = frame_at_mut(&mut self.frames, &location.indices) {
            *target = updated;
        }
        trace!(%id, "modify frame");
        self.index_path = location.ids;
        self.bump();
        Ok(true)
    }

    /// Remove `id` and its subtree. Deleting a frame that is not there does nothing.
    pub fn delete(&mut self, id: FrameId) -> bool {
        let Some(location) = locate(&self.frames, id) else {
            debug!(%id, "delete: frame not found");
            return false;
        };
        let Some(siblings) = siblings_mut(&mut self.frames, location.parent_indices()) else {
            return false;
        };
        siblings.remove(location.index());
        if let Some(parent) = location.parent_id() {
            self.refill_placeholder(parent);
        }
        if self.index_path.contains(&id) {
            self.index_path.clear();
        }
        debug!(%id, "delete frame");
        self.bump();
        true
    }

    /// Insert `frame`, saved, right after the selected frame at the same depth.
    ///
    /// With nothing selected, or a selection that no longer exists, the frame
    /// is appended at the top level.
    pub fn add_frame(&mut self, frame: Frame) -> Result<FrameId, FrameError> {
        let max_incoming = self.check_new_ids(&frame, None)?;
        reserve_ids_through(max_incoming);
        let id = frame.id;
        let mut added = EditableFrame::saved(frame);
        added.force_saved();

        let anchor = self.selected().and_then(|selected| locate(&self.frames, selected));
        match anchor {
            Some(location) => {
                added.frame.set_depth(location.depth());
                fill_placeholders(&mut added);
                if let Some(siblings) = siblings_mut(&mut self.frames, location.parent_indices()) {
                    siblings.insert(location.index() + 1, added);
                }
                debug!(%id, after = ?location.ids.last(), "add frame");
            }
            None => {
                if !self.index_path.is_empty() {
                    debug!(path = ?self.index_path, "add: stale selection, appending");
                    self.index_path.clear();
                }
                added.frame.set_depth(0);
                fill_placeholders(&mut added);
                self.frames.push(added);
                debug!(%id, "add frame at end");
            }
        }
        self.bump();
        Ok(id)
    }

    /// Move `id` and its subtree to sit right after `anchor`, as its sibling.
    ///
    /// A move into an empty container goes after the container's placeholder.
    pub fn move_after(&mut self, id: FrameId, anchor: FrameId) -> Result<bool, FrameError> {
        if id == anchor {
            return Err(FrameError::InvalidMove { id, anchor });
        }
        let (Some(from), Some(to)) = (locate(&self.frames, id), locate(&self.frames, anchor)) else {
            debug!(%id, %anchor, "move: frame not found");
            return Ok(false);
        };
        if to.ids.contains(&id) {
            return Err(FrameError::InvalidMove { id, anchor });
        }

        let Some(siblings) = siblings_mut(&mut self.frames, from.parent_indices()) else {
            return Ok(false);
        };
        let mut moved = siblings.remove(from.index());

        // Removal may have shifted the anchor's indices.
        let Some(to) = locate(&self.frames, anchor) else {
            if let Some(siblings) = siblings_mut(&mut self.frames, from.parent_indices()) {
                siblings.insert(from.index(), moved);
            }
            return Ok(false);
        };
        moved.frame.set_depth(to.depth());
        if let Some(siblings) = siblings_mut(&mut self.frames, to.parent_indices()) {
            siblings.insert(to.index() + 1, moved);
        }
        if let Some(parent) = from.parent_id() {
            self.refill_placeholder(parent);
        }
        self.refresh_selection();
        debug!(%id, %anchor, "move frame");
        self.bump();
        Ok(true)
    }

    /// Dispatch a request for `id`, refusing actions its status does not allow.
    pub fn request(&mut self, id: FrameId, request: EditRequest) -> Result<bool, FrameError> {
        let Some(frame) = self.find(id) else {
            debug!(%id, action = ?request.action(), "request: frame not found");
            return Ok(false);
        };
        let action = request.action();
        if !frame.edit_status.allows(action) {
            return Err(FrameError::NotPermitted { id, action });
        }
        match request {
            EditRequest::Edit => Ok(self.edit(id)),
            EditRequest::Save => {
                self.save();
                Ok(true)
            }
            EditRequest::Modify(replacement) => self.modify(id, replacement),
            EditRequest::Delete => Ok(self.delete(id)),
            EditRequest::SelectIndex => Ok(self.select_index(id)),
        }
    }
}

// Helpers
impl FramesEditor {
    fn bump(&mut self) {
        self.revision += 1;
    }

    /// Check that `frame`'s subtree brings no id already in the tree, no id
    /// twice, and no id above [`MAX_FRAME_ID`](crate::MAX_FRAME_ID). Returns the largest id it brings.
    ///
    /// `replacing` names a frame being replaced. It keeps its id, and ids
    /// inside its current subtree may be reused.
    fn check_new_ids(&self, frame: &Frame, replacing: Option<FrameId>) -> Result<FrameId, FrameError> {
        let mut existing = HashSet::new();
        let mut skip_depth: Option<usize> = None;
        walk_all(&self.frames, &mut |f| {
            if let Some(depth) = skip_depth {
                if f.frame.depth > depth {
                    return;
                }
                skip_depth = None;
            }
            if Some(f.id()) == replacing {
                skip_depth = Some(f.frame.depth);
                return;
            }
            existing.insert(f.id());
        });

        let top = replacing.unwrap_or(frame.id);
        let mut incoming = HashSet::from([top]);
        let mut problem = if !top.is_storable() {
            Some(FrameError::IdOutOfRange(top))
        } else if replacing.is_none() && existing.contains(&top) {
            Some(FrameError::DuplicateId(top))
        } else {
            None
        };
        if let Some(body) = frame.body() {
            walk_all(body, &mut |f| {
                if problem.is_some() {
                    return;
                }
                if !f.id().is_storable() {
                    problem = Some(FrameError::IdOutOfRange(f.id()));
                } else if existing.contains(&f.id()) || !incoming.insert(f.id()) {
                    problem = Some(FrameError::DuplicateId(f.id()));
                }
            });
        }
        match problem {
            Some(err) => Err(err),
            None => Ok(incoming.into_iter().max().unwrap_or(top)),
        }
    }

    fn refill_placeholder(&mut self, container: FrameId) {
        let Some(location) = locate(&self.frames, container) else {
            return;
        };
        if let Some(frame) = frame_at_mut(&mut self.frames, &location.indices) {
            fill_placeholders(frame);
        }
    }

    fn refresh_selection(&mut self) {
        if let Some(selected) = self.selected() {
            self.index_path = locate(&self.frames, selected)
                .map(|location: Location| location.ids)
                .unwrap_or_default();
        }
    }
}

/// Give every empty container body in `frame`'s subtree an invisible anchor.
fn fill_placeholders(frame: &mut EditableFrame) {
    let depth = frame.frame.depth;
    if let Some(body) = frame.frame.body_mut() {
        if body.is_empty() {
            let mut placeholder = Frame::invisible();
            placeholder.depth = depth + 1;
            body.push(EditableFrame::saved(placeholder));
        }
        for child in body {
            fill_placeholders(child);
        }
    }
}

fn frames_max_id(frames: &[EditableFrame]) -> Option<FrameId> {
    let mut max = None;
    walk_all(frames, &mut |f| max = max.max(Some(f.id())));
    max
}
