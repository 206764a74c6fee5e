use thiserror::Error;

use crate::edit_state::EditAction;
use crate::frame::{FrameId, FrameTag};

/// Logic errors raised by frame-tree operations.
///
/// Every check that can produce one of these runs before the tree is touched,
/// so an error never leaves a half-applied change behind. A frame that cannot
/// be found is not an error; those operations are no-ops instead.
#[derive(Debug, Error)]
pub enum FrameError {
    #[error("frame {id} is a {expected} frame, replacement is a {found} frame")]
    KindMismatch {
        id: FrameId,
        expected: FrameTag,
        found: FrameTag,
    },

    #[error("frame {0} is not being edited")]
    NotBeingEdited(FrameId),

    #[error("{action:?} is not available for frame {id} in its current state")]
    NotPermitted { id: FrameId, action: EditAction },

    #[error("cannot move frame {id} after {anchor}: anchor lies inside the moved frame")]
    InvalidMove { id: FrameId, anchor: FrameId },

    #[error("{kind} frame takes {expected} field(s), got {found}")]
    FieldCount {
        kind: FrameTag,
        expected: usize,
        found: usize,
    },

    #[error("frame id {0} appears more than once")]
    DuplicateId(FrameId),

    #[error("frame id {0} is above the largest storable id")]
    IdOutOfRange(FrameId),

    #[error("frames {0} and {1} are both being edited")]
    MultipleEditors(FrameId, FrameId),

    #[error("invalid frames JSON: {0}")]
    Json(#[from] serde_json::Error),
}
