//! Intermediate representation for compiled frame-editing scripts.

use crate::cmd_result::CmdFailure;
use crate::frame::{FrameId, FrameTag};

/// A compiled sequence of script commands.
#[derive(Debug, Clone, Default)]
pub struct CompiledScript {
    pub instructions: Vec<Instruction>,
}

/// A single compiled instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instruction {
    /// `ID sel`: select a frame as the insertion anchor.
    Select(FrameId),
    /// `ID ed`: begin editing a frame.
    Edit(FrameId),
    /// `sv`: finish the edit in progress.
    Save,
    /// `ID mod /kind/fields.../`: replace the payload of the frame being edited.
    Modify { id: FrameId, payload: Payload },
    /// `ID del`: delete a frame and its body.
    Delete(FrameId),
    /// `add /kind/fields.../`: add a frame after the selection.
    Add(Payload),
    /// `ID mv /ANCHOR/`: move a frame to just after another.
    Move { id: FrameId, anchor: FrameId },
    /// `pc`: emit the generated code.
    PrintCode,
}

/// Kind and free-text fields for a new or replacement frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payload {
    pub tag: FrameTag,
    pub fields: Vec<String>,
}

/// Opcode identifying a script command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmdOp {
    Select,
    Edit,
    Save,
    Modify,
    Delete,
    Add,
    Move,
    PrintCode,
}

impl Instruction {
    pub fn op(&self) -> CmdOp {
        match self {
            Instruction::Select(_) => CmdOp::Select,
            Instruction::Edit(_) => CmdOp::Edit,
            Instruction::Save => CmdOp::Save,
            Instruction::Modify { .. } => CmdOp::Modify,
            Instruction::Delete(_) => CmdOp::Delete,
            Instruction::Add(_) => CmdOp::Add,
            Instruction::Move { .. } => CmdOp::Move,
            Instruction::PrintCode => CmdOp::PrintCode,
        }
    }
}

/// Outcome of executing a compiled script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecOutcome {
    Success,
    /// The instruction at `index` failed; later instructions did not run.
    Failure {
        index: usize,
        op: CmdOp,
        failure: CmdFailure,
    },
}

impl ExecOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ExecOutcome::Success)
    }

    pub fn is_failure(&self) -> bool {
        !self.is_success()
    }
}
