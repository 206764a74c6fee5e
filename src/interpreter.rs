//! Command execution engine for compiled frame-editing scripts.
//!
//! Instructions from a [`CompiledScript`] run one after another against a
//! [`ScriptContext`]. The first failing command stops the script. An id that
//! is not in the tree is skipped, not failed.

use tracing::{debug, warn};

use crate::code::*;
use crate::codegen::CodegenOptions;
use crate::frame::{Frame, FrameId, FrameKind};
use crate::frames_editor::{EditRequest, FramesEditor};
use crate::{CmdFailure, CmdResult};

/// The environment a script runs in.
pub struct ScriptContext<'a> {
    pub editor: &'a mut FramesEditor,
    pub options: CodegenOptions,
    /// Text produced by `pc` commands, in order.
    pub output: Vec<String>,
}

impl<'a> ScriptContext<'a> {
    pub fn new(editor: &'a mut FramesEditor, options: CodegenOptions) -> Self {
        Self {
            editor,
            options,
            output: Vec::new(),
        }
    }
}

/// Execute compiled code against a script context. Top-level entry point.
pub fn execute(ctx: &mut ScriptContext, code: &CompiledScript) -> ExecOutcome {
    for (index, instr) in code.instructions.iter().enumerate() {
        if let CmdResult::Failure(failure) = dispatch(ctx, instr) {
            warn!(index, op = ?instr.op(), ?failure, "command failed");
            return ExecOutcome::Failure {
                index,
                op: instr.op(),
                failure,
            };
        }
    }
    ExecOutcome::Success
}

/// Dispatch one instruction to the store.
fn dispatch(ctx: &mut ScriptContext, instr: &Instruction) -> CmdResult {
    match instr {
        Instruction::Select(id) => {
            if !ctx.editor.select_index(*id) {
                skipped(*id, "select");
            }
            CmdResult::Success
        }
        Instruction::Edit(id) => request(ctx, *id, EditRequest::Edit, "edit"),
        Instruction::Save => {
            ctx.editor.save();
            CmdResult::Success
        }
        Instruction::Modify { id, payload } => match replacement_for(ctx.editor, *id, payload) {
            Ok(frame) => request(ctx, *id, EditRequest::Modify(frame), "modify"),
            Err(failure) => CmdResult::Failure(failure),
        },
        Instruction::Delete(id) => request(ctx, *id, EditRequest::Delete, "delete"),
        Instruction::Add(payload) => {
            match FrameKind::from_fields(payload.tag, payload.fields.clone(), Vec::new()) {
                Ok(kind) => ctx.editor.add_frame(Frame::new(kind)).into(),
                Err(err) => CmdResult::Failure(CmdFailure::from(&err)),
            }
        }
        Instruction::Move { id, anchor } => match ctx.editor.move_after(*id, *anchor) {
            Ok(false) => {
                skipped(*id, "move");
                CmdResult::Success
            }
            result => result.into(),
        },
        Instruction::PrintCode => {
            ctx.output.push(ctx.editor.python_code(&ctx.options));
            CmdResult::Success
        }
    }
}

fn request(ctx: &mut ScriptContext, id: FrameId, req: EditRequest, what: &str) -> CmdResult {
    match ctx.editor.request(id, req) {
        Ok(false) => {
            skipped(id, what);
            CmdResult::Success
        }
        result => result.into(),
    }
}

/// Build the replacement for `id` from a payload. A container keeps its
/// current body; only its header fields change.
fn replacement_for(editor: &FramesEditor, id: FrameId, payload: &Payload) -> Result<Frame, CmdFailure> {
    let body = editor
        .find(id)
        .and_then(|f| f.frame.body())
        .map(<[_]>::to_vec)
        .unwrap_or_default();
    let kind = FrameKind::from_fields(payload.tag, payload.fields.clone(), body)
        .map_err(|err| CmdFailure::from(&err))?;
    Ok(Frame { id, depth: 0, kind })
}

fn skipped(id: FrameId, what: &str) {
    debug!(%id, what, "frame not in tree, command skipped");
}
