//! Edit status tracking for frames in the tree.
//!
//! Every frame held by the editor is either saved or being edited. At most one
//! frame in the whole tree is being edited; the store keeps that true by
//! saving everything before it starts a new edit.

use serde::{Deserialize, Serialize};

use crate::frame::{Frame, FrameId};

/// The edit status of a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EditStatus {
    #[default]
    #[serde(rename = "saved")]
    Saved,
    #[serde(rename = "being-edited")]
    BeingEdited,
}

/// Something the presentation layer can ask of one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditAction {
    Edit,
    Save,
    Modify,
    Delete,
    SelectIndex,
}

const SAVED_ACTIONS: &[EditAction] = &[EditAction::Edit, EditAction::Delete, EditAction::SelectIndex];
const BEING_EDITED_ACTIONS: &[EditAction] = &[
    EditAction::Save,
    EditAction::Modify,
    EditAction::Delete,
    EditAction::SelectIndex,
];

impl EditStatus {
    /// Actions available to a frame in this status.
    pub fn actions(self) -> &'static [EditAction] {
        match self {
            EditStatus::Saved => SAVED_ACTIONS,
            EditStatus::BeingEdited => BEING_EDITED_ACTIONS,
        }
    }

    pub fn allows(self, action: EditAction) -> bool {
        self.actions().contains(&action)
    }
}

/// A frame as held by the editor: the frame plus its edit status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditableFrame {
    #[serde(flatten)]
    pub frame: Frame,
    #[serde(rename = "editStatus")]
    pub edit_status: EditStatus,
}

impl From<Frame> for EditableFrame {
    fn from(frame: Frame) -> Self {
        Self::saved(frame)
    }
}

impl EditableFrame {
    pub fn saved(frame: Frame) -> Self {
        Self {
            frame,
            edit_status: EditStatus::Saved,
        }
    }

    pub fn being_edited(frame: Frame) -> Self {
        Self {
            frame,
            edit_status: EditStatus::BeingEdited,
        }
    }

    pub fn id(&self) -> FrameId {
        self.frame.id
    }

    pub fn is_being_edited(&self) -> bool {
        self.edit_status == EditStatus::BeingEdited
    }

    /// Actions the presentation layer may offer for this frame.
    pub fn actions(&self) -> &'static [EditAction] {
        self.edit_status.actions()
    }

    /// Mark this frame and its whole subtree saved.
    pub fn force_saved(&mut self) {
        self.edit_status = EditStatus::Saved;
        if let Some(body) = self.frame.body_mut() {
            save_all(body);
        }
    }

    /// Visit this frame and its subtree in pre-order.
    pub fn walk<'a>(&'a self, f: &mut impl FnMut(&'a EditableFrame)) {
        f(self);
        if let Some(body) = self.frame.body() {
            for child in body {
                child.walk(f);
            }
        }
    }
}

/// Mark every frame in `frames`, at every depth, saved.
pub fn save_all(frames: &mut [EditableFrame]) {
    for frame in frames {
        frame.force_saved();
    }
}

/// Visit every frame in `frames` in pre-order.
pub fn walk_all<'a>(frames: &'a [EditableFrame], f: &mut impl FnMut(&'a EditableFrame)) {
    for frame in frames {
        frame.walk(f);
    }
}
