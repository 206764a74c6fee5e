//! Recursive descent compiler for frame-editing scripts.
//!
//! A script is a sequence of commands, each of the form
//! `[ID] NAME [TRAILING PARAMETERS]`:
//!
//! ```text
//! 1001 sel                  ! select frame 1001
//! add /assignment/score/0/  ! add "score = 0" after it
//! 1003 ed                   ! start editing the speak method
//! 1003 mod /def/shout/      ! rename it while editing
//! sv
//! ```
//!
//! Trailing parameters of one command share the delimiter that opens the
//! first of them. `!` starts a comment that runs to the end of the line.

use itertools::Itertools;
use phf::{Map, phf_map};
use std::iter::Peekable;
use std::str::Chars;

use anyhow::{Context, Result, bail};

use crate::code::*;
use crate::frame::{FrameId, FrameTag};
use crate::trail_param::TrailParam;

/// Compile a script into a [`CompiledScript`].
pub fn compile(input: &str) -> Result<CompiledScript> {
    let mut compiler = Compiler {
        chars: input.chars().peekable(),
    };
    compiler.compile_sequence()
}

struct Compiler<'a> {
    chars: Peekable<Chars<'a>>,
}

impl Compiler<'_> {
    fn compile_sequence(&mut self) -> Result<CompiledScript> {
        let mut instructions = Vec::new();
        loop {
            self.skip_whitespace_and_comments();
            if self.chars.peek().is_none() {
                break;
            }
            let instr = self
                .compile_command()
                .with_context(|| format!("in command {}", instructions.len() + 1))?;
            instructions.push(instr);
        }
        Ok(CompiledScript { instructions })
    }

    /// Parse one command: optional frame id, name, then its trailing parameters.
    fn compile_command(&mut self) -> Result<Instruction> {
        let target = self.parse_frame_id()?;
        self.skip_whitespace_and_comments();
        let (name, cmd) = self.parse_command()?;

        let id = match (cmd.takes_id, target) {
            (true, Some(id)) => Some(id),
            (true, None) => bail!("Syntax error: {} needs a frame id.", name.to_uppercase()),
            (false, Some(_)) => bail!("Syntax error: {} does not take a frame id.", name.to_uppercase()),
            (false, None) => None,
        };

        let instr = match (cmd.op, id) {
            (CmdOp::Select, Some(id)) => Instruction::Select(id),
            (CmdOp::Edit, Some(id)) => Instruction::Edit(id),
            (CmdOp::Delete, Some(id)) => Instruction::Delete(id),
            (CmdOp::Modify, Some(id)) => Instruction::Modify {
                id,
                payload: self.parse_payload()?,
            },
            (CmdOp::Move, Some(id)) => Instruction::Move {
                id,
                anchor: self.parse_anchor()?,
            },
            (CmdOp::Save, None) => Instruction::Save,
            (CmdOp::Add, None) => Instruction::Add(self.parse_payload()?),
            (CmdOp::PrintCode, None) => Instruction::PrintCode,
            (op, _) => bail!("Syntax error: malformed {:?} command.", op),
        };
        Ok(instr)
    }

    /// Parse a leading frame id, if there is one.
    fn parse_frame_id(&mut self) -> Result<Option<FrameId>> {
        let digits: String = self.chars.peeking_take_while(|ch| ch.is_ascii_digit()).collect();
        if digits.is_empty() {
            return Ok(None);
        }
        let id = digits
            .parse::<u32>()
            .with_context(|| format!("Invalid frame id: {}", digits))?;
        Ok(Some(FrameId(id)))
    }

    /// Parse a command name.
    fn parse_command(&mut self) -> Result<(String, &'static CmdInfo)> {
        let name: String = self
            .chars
            .peeking_take_while(|ch| ch.is_ascii_alphabetic())
            .map(|ch| ch.to_ascii_lowercase())
            .collect();
        if name.is_empty() {
            bail!("Syntax error: expected command name.");
        }
        let info = name_to_info(&name)?;
        Ok((name, info))
    }

    /// Parse `/kind/field/.../`: a kind name followed by that kind's fields.
    fn parse_payload(&mut self) -> Result<Payload> {
        self.skip_whitespace_and_comments();
        let kind = self.parse_trailing_param()?;
        let Some(tag) = FrameTag::from_name(kind.content.trim()) else {
            bail!("Syntax error: unknown frame kind '{}'.", kind.content);
        };
        let fields = tag
            .field_names()
            .iter()
            .map(|_| self.parse_trailing_param_with_delim(kind.delim).map(|tpar| tpar.content))
            .collect::<Result<Vec<_>>>()?;
        Ok(Payload { tag, fields })
    }

    /// Parse `/ID/`, the frame to move after.
    fn parse_anchor(&mut self) -> Result<FrameId> {
        self.skip_whitespace_and_comments();
        let tpar = self.parse_trailing_param()?;
        let id = tpar
            .content
            .trim()
            .parse::<u32>()
            .with_context(|| format!("Invalid anchor frame id: {}", tpar.content))?;
        Ok(FrameId(id))
    }

    /// Parse a trailing parameter: delimiter-bounded string.
    fn parse_trailing_param(&mut self) -> Result<TrailParam> {
        let delim = match self.chars.next() {
            Some(c) if c.is_ascii_punctuation() => c,
            _ => bail!("Syntax error: expected trailing parameter delimiter."),
        };
        self.parse_trailing_param_with_delim(delim)
    }

    /// Parse a trailing parameter using a known delimiter.
    fn parse_trailing_param_with_delim(&mut self, delim: char) -> Result<TrailParam> {
        let mut content = String::new();
        loop {
            match self.chars.next() {
                Some(c) if c == delim => return Ok(TrailParam::new(delim, content)),
                Some(c) => content.push(c),
                None => bail!("Syntax error: unclosed trailing parameter."),
            }
        }
    }

    /// Skip whitespace and `!`-to-end-of-line comments.
    fn skip_whitespace_and_comments(&mut self) {
        loop {
            match self.chars.peek() {
                Some(&ch) if ch.is_whitespace() => {
                    self.chars.next();
                }
                Some(&'!') => {
                    for ch in self.chars.by_ref() {
                        if ch == '\n' {
                            break;
                        }
                    }
                }
                _ => break,
            }
        }
    }
}

struct CmdInfo {
    op: CmdOp,
    takes_id: bool,
}

/// Command names, short and long. Please keep names sorted alphabetically.
const NAME_TO_OP_MAP: Map<&'static str, CmdInfo> = phf_map! {
    "add" => CmdInfo { op: CmdOp::Add, takes_id: false },
    "del" => CmdInfo { op: CmdOp::Delete, takes_id: true },
    "delete" => CmdInfo { op: CmdOp::Delete, takes_id: true },
    "ed" => CmdInfo { op: CmdOp::Edit, takes_id: true },
    "edit" => CmdInfo { op: CmdOp::Edit, takes_id: true },
    "mod" => CmdInfo { op: CmdOp::Modify, takes_id: true },
    "modify" => CmdInfo { op: CmdOp::Modify, takes_id: true },
    "move" => CmdInfo { op: CmdOp::Move, takes_id: true },
    "mv" => CmdInfo { op: CmdOp::Move, takes_id: true },
    "pc" => CmdInfo { op: CmdOp::PrintCode, takes_id: false },
    "save" => CmdInfo { op: CmdOp::Save, takes_id: false },
    "sel" => CmdInfo { op: CmdOp::Select, takes_id: true },
    "select" => CmdInfo { op: CmdOp::Select, takes_id: true },
    "sv" => CmdInfo { op: CmdOp::Save, takes_id: false },
};

/// Map a command name string to its CmdInfo.
fn name_to_info(name: &str) -> Result<&'static CmdInfo> {
    NAME_TO_OP_MAP
        .get(name)
        .ok_or_else(|| anyhow::anyhow!("Syntax error: unknown command '{}'.", name.to_uppercase()))
}
