//! The starter project a new editor opens with.

use crate::edit_state::EditableFrame;
use crate::frame::{Frame, FrameId, FrameKind};

fn saved(id: u32, depth: usize, kind: FrameKind) -> EditableFrame {
    EditableFrame::saved(Frame {
        id: FrameId(id),
        depth,
        kind,
    })
}

/// A `MySprite` class with a costume list, a green-flag handler and a
/// `speak` method. Ids are fixed and all below the process allocator's range.
pub fn sample_frames() -> Vec<EditableFrame> {
    let speak = saved(
        1003,
        1,
        FrameKind::Def {
            name: "speak".into(),
            body: vec![
                saved(1004, 2, FrameKind::Invisible),
                saved(
                    1005,
                    2,
                    FrameKind::SayForSeconds {
                        text: "\"Hello\"".into(),
                        seconds: "2.0".into(),
                    },
                ),
            ],
        },
    );
    vec![saved(
        10,
        0,
        FrameKind::Class {
            name: "MySprite".into(),
            body: vec![
                saved(1000, 1, FrameKind::Invisible),
                saved(
                    1001,
                    1,
                    FrameKind::Assignment {
                        variable_name: "Costumes".into(),
                        value_text: "[\"Snake.png\"]".into(),
                    },
                ),
                saved(1002, 1, FrameKind::FlagClicked),
                speak,
            ],
        },
    )]
}
