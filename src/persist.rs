//! Conversion between the frame tree and its stored JSON form.
//!
//! The stored form is a JSON array of frames using the project format's field
//! names (`kind`, `editStatus`, `commentText`, `variableName`, ...).

use crate::edit_state::EditableFrame;
use crate::error::FrameError;
use crate::frames_editor::FramesEditor;

/// Serialise a frame sequence.
pub fn frames_to_json(frames: &[EditableFrame]) -> Result<String, FrameError> {
    Ok(serde_json::to_string_pretty(frames)?)
}

/// Parse a frame sequence without checking tree invariants.
pub fn frames_from_json(json: &str) -> Result<Vec<EditableFrame>, FrameError> {
    Ok(serde_json::from_str(json)?)
}

impl FramesEditor {
    pub fn to_json(&self) -> Result<String, FrameError> {
        frames_to_json(self.frames())
    }

    /// Build an editor from stored JSON, checking the tree as
    /// [`FramesEditor::from_frames`] does.
    pub fn from_json(json: &str) -> Result<Self, FrameError> {
        FramesEditor::from_frames(frames_from_json(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::CodegenOptions;
    use crate::edit_state::{EditStatus, walk_all};
    use crate::frame::{Frame, FrameId, FrameKind, IdSource, MAX_FRAME_ID, ProcessIds};

    #[test]
    fn test_stored_field_names() {
        let frames = vec![EditableFrame::saved(Frame {
            id: FrameId(7),
            depth: 0,
            kind: FrameKind::Assignment {
                variable_name: "x".into(),
                value_text: "1".into(),
            },
        })];
        let value: serde_json::Value = serde_json::from_str(&frames_to_json(&frames).unwrap()).unwrap();
        assert_eq!(
            value,
            serde_json::json!([{
                "id": 7,
                "depth": 0,
                "kind": "assignment",
                "variableName": "x",
                "valueText": "1",
                "editStatus": "saved",
            }])
        );
    }

    #[test]
    fn test_reads_stored_project() {
        let json = r#"[
            {"id": 10, "kind": "class", "editStatus": "saved", "name": "MySprite", "depth": 0,
             "body": [
                {"id": 1000, "kind": "invisible", "editStatus": "saved", "depth": 1},
                {"id": 1002, "kind": "keyPressed", "key_name": "\"a\"", "editStatus": "being-edited", "depth": 1},
                {"id": 1003, "kind": "glide", "Xvalue": "1", "Yvalue": "2", "seconds": "3",
                 "editStatus": "saved", "depth": 1}
             ]}
        ]"#;
        let editor = FramesEditor::from_json(json).unwrap();
        assert_eq!(editor.being_edited().map(|f| f.id()), Some(FrameId(1002)));
        assert_eq!(
            editor.python_code(&CodegenOptions::default()),
            "import pytch\nimport random\nclass MySprite( pytch.Sprite ):\n    @pytch.when_key_pressed(\"a\")\n    self.glide_to_xy(1, 2, 3)\n"
        );
    }

    #[test]
    fn test_round_trip_preserves_tree() {
        let mut editor = FramesEditor::sample();
        editor.edit(FrameId(1001));
        let json = editor.to_json().unwrap();
        let loaded = FramesEditor::from_json(&json).unwrap();
        assert_eq!(loaded.frames(), editor.frames());
        assert_eq!(loaded.find(FrameId(1001)).unwrap().edit_status, EditStatus::BeingEdited);
    }

    #[test]
    fn test_load_recomputes_depths() {
        let json = r#"[{"id": 1, "kind": "if", "condition": "x", "depth": 5, "editStatus": "saved",
                        "body": [{"id": 2, "kind": "print", "printText": "x", "depth": 0, "editStatus": "saved"}]}]"#;
        let editor = FramesEditor::from_json(json).unwrap();
        assert_eq!(editor.find(FrameId(1)).unwrap().frame.depth, 0);
        assert_eq!(editor.find(FrameId(2)).unwrap().frame.depth, 1);
    }

    #[test]
    fn test_load_rejects_duplicate_ids() {
        let json = r#"[{"id": 1, "kind": "comment", "commentText": "a", "depth": 0, "editStatus": "saved"},
                       {"id": 1, "kind": "comment", "commentText": "b", "depth": 0, "editStatus": "saved"}]"#;
        assert!(matches!(
            FramesEditor::from_json(json),
            Err(FrameError::DuplicateId(FrameId(1)))
        ));
    }

    #[test]
    fn test_load_rejects_two_editors() {
        let json = r#"[{"id": 1, "kind": "wait", "seconds": "1", "depth": 0, "editStatus": "being-edited"},
                       {"id": 2, "kind": "wait", "seconds": "2", "depth": 0, "editStatus": "being-edited"}]"#;
        assert!(matches!(
            FramesEditor::from_json(json),
            Err(FrameError::MultipleEditors(FrameId(1), FrameId(2)))
        ));
    }

    #[test]
    fn test_load_reserves_ids() {
        let high = ProcessIds.next_id().0 + 1000;
        let json = format!(
            r#"[{{"id": {high}, "kind": "flagClicked", "depth": 0, "editStatus": "saved"}}]"#
        );
        FramesEditor::from_json(&json).unwrap();
        assert!(Frame::flag_clicked().id.0 > high);
    }

    #[test]
    fn test_load_placeholders_get_fresh_ids() {
        let next = ProcessIds.next_id().0 + 1;
        let json = format!(
            r#"[{{"id": {next}, "kind": "if", "condition": "x", "depth": 0, "editStatus": "saved", "body": []}}]"#
        );
        let editor = FramesEditor::from_json(&json).unwrap();
        let mut ids = Vec::new();
        walk_all(editor.frames(), &mut |f| ids.push(f.id()));
        assert_eq!(ids.len(), 2);
        assert_eq!(ids[0], FrameId(next));
        assert!(ids[1] > FrameId(next));
    }

    #[test]
    fn test_load_rejects_ids_past_storable_range() {
        let json = format!(
            r#"[{{"id": {}, "kind": "flagClicked", "depth": 0, "editStatus": "saved"}}]"#,
            u32::MAX
        );
        assert!(matches!(
            FramesEditor::from_json(&json),
            Err(FrameError::IdOutOfRange(FrameId(u32::MAX)))
        ));
        assert!(ProcessIds.next_id().0 <= MAX_FRAME_ID);
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            FramesEditor::from_json("[{\"id\": 1}]"),
            Err(FrameError::Json(_))
        ));
    }
}
