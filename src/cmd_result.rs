use crate::error::FrameError;

/// The result of executing one script command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CmdResult {
    Success,
    Failure(CmdFailure),
}

/// The reason a command failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CmdFailure {
    /// The frame's edit status does not offer this action.
    NotPermitted,
    /// Modify was aimed at a frame that is not being edited.
    NotBeingEdited,
    /// The replacement payload is a different kind of frame.
    KindMismatch,
    /// The move target lies inside the frame being moved.
    InvalidMove,
    /// The frame would bring an id that is already in the tree.
    DuplicateId,
    /// The payload did not match the kind's fields.
    BadPayload,
}

impl CmdResult {
    pub fn is_success(&self) -> bool {
        matches!(self, CmdResult::Success)
    }

    pub fn is_failure(&self) -> bool {
        !self.is_success()
    }
}

impl From<&FrameError> for CmdFailure {
    fn from(err: &FrameError) -> Self {
        match err {
            FrameError::KindMismatch { .. } => CmdFailure::KindMismatch,
            FrameError::NotBeingEdited(_) => CmdFailure::NotBeingEdited,
            FrameError::NotPermitted { .. } => CmdFailure::NotPermitted,
            FrameError::InvalidMove { .. } => CmdFailure::InvalidMove,
            FrameError::DuplicateId(_) | FrameError::MultipleEditors(..) => CmdFailure::DuplicateId,
            FrameError::IdOutOfRange(_) => CmdFailure::BadPayload,
            FrameError::FieldCount { .. } | FrameError::Json(_) => CmdFailure::BadPayload,
        }
    }
}

impl<T> From<Result<T, FrameError>> for CmdResult {
    fn from(result: Result<T, FrameError>) -> Self {
        match result {
            Ok(_) => CmdResult::Success,
            Err(err) => CmdResult::Failure(CmdFailure::from(&err)),
        }
    }
}
