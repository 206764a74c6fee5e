//! A frame tree editor for Pytch sprite programs, and its Python generator.
//!
//! # Example
//!
//! ```rust
//! use pytch_frames::{CodegenOptions, Frame, FramesEditor};
//!
//! let mut editor = FramesEditor::new();
//! let class = editor
//!     .add_frame(Frame::class("Foo", [Frame::assignment("x", "1")]))
//!     .unwrap();
//!
//! // New frames go right after the selection.
//! editor.select_index(class);
//! editor.add_frame(Frame::comment("end of Foo")).unwrap();
//!
//! assert_eq!(
//!     editor.python_code(&CodegenOptions::default()),
//!     "import pytch\nimport random\nclass Foo( pytch.Sprite ):\n    x = 1\n# end of Foo\n"
//! );
//! ```

mod cmd_result;
pub mod code;
pub mod codegen;
pub mod compiler;
mod edit_state;
mod error;
mod frame;
mod frames_editor;
mod interpreter;
mod persist;
mod sample;
mod trail_param;

pub use cmd_result::{CmdFailure, CmdResult};
pub use code::{CompiledScript, ExecOutcome};
pub use codegen::{CodegenOptions, GeneratedCode, generate, python_code};
pub use compiler::compile;
pub use edit_state::{EditAction, EditStatus, EditableFrame};
pub use error::FrameError;
pub use frame::{
    FIRST_FRAME_ID, Frame, FrameId, FrameKind, FrameTag, IdSource, MAX_FRAME_ID, ProcessIds, SequentialIds,
};
pub use frames_editor::{EditRequest, FramesEditor};
pub use interpreter::{ScriptContext, execute};
pub use persist::{frames_from_json, frames_to_json};
pub use trail_param::TrailParam;
