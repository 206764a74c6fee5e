//! The frame model: one node of the structured program tree.
//!
//! A [`Frame`] is a tagged variant over the kinds a learner can place in a
//! program. Container kinds (if/for/while/class/def) own a body of child
//! frames; every other kind is a leaf. Constructors stamp a fresh id and
//! depth 0 and never touch existing frames.

mod ids;

use std::fmt;

use phf::{Map, phf_map};
use serde::{Deserialize, Serialize};

use crate::edit_state::EditableFrame;
use crate::error::FrameError;

pub use ids::{
    FIRST_FRAME_ID, FrameId, IdSource, MAX_FRAME_ID, ProcessIds, SequentialIds, reserve_ids_through,
};

/// A frame: id, nesting depth and kind-specific payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frame {
    pub id: FrameId,
    /// Number of container frames above this one; 0 at top level.
    pub depth: usize,
    #[serde(flatten)]
    pub kind: FrameKind,
}

/// Kind tag plus payload.
///
/// Field and tag names follow the stored project format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum FrameKind {
    #[serde(rename = "comment")]
    Comment {
        #[serde(rename = "commentText")]
        text: String,
    },
    #[serde(rename = "statement")]
    Statement {
        #[serde(rename = "statementText")]
        text: String,
    },
    #[serde(rename = "print")]
    Print {
        #[serde(rename = "printText")]
        text: String,
    },
    #[serde(rename = "assignment", rename_all = "camelCase")]
    Assignment {
        variable_name: String,
        value_text: String,
    },
    /// Assignment of a list literal, one entry per element.
    #[serde(rename = "list", rename_all = "camelCase")]
    List {
        variable_name: String,
        #[serde(rename = "valueText")]
        values: Vec<String>,
    },
    #[serde(rename = "if")]
    If {
        condition: String,
        body: Vec<EditableFrame>,
    },
    #[serde(rename = "for")]
    For {
        condition: String,
        body: Vec<EditableFrame>,
    },
    #[serde(rename = "while")]
    While {
        condition: String,
        body: Vec<EditableFrame>,
    },
    #[serde(rename = "class")]
    Class {
        name: String,
        body: Vec<EditableFrame>,
    },
    #[serde(rename = "def")]
    Def {
        name: String,
        body: Vec<EditableFrame>,
    },
    #[serde(rename = "glide")]
    Glide {
        #[serde(rename = "Xvalue")]
        x: String,
        #[serde(rename = "Yvalue")]
        y: String,
        seconds: String,
    },
    #[serde(rename = "sayforseconds")]
    SayForSeconds { text: String, seconds: String },
    #[serde(rename = "wait")]
    Wait { seconds: String },
    #[serde(rename = "spriteClicked")]
    SpriteClicked,
    #[serde(rename = "flagClicked")]
    FlagClicked,
    #[serde(rename = "keyPressed")]
    KeyPressed { key_name: String },
    /// Non-rendering insertion anchor inside an otherwise empty body.
    #[serde(rename = "invisible")]
    Invisible,
}

/// The kind of a frame without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameTag {
    Comment,
    Statement,
    Print,
    Assignment,
    List,
    If,
    For,
    While,
    Class,
    Def,
    Glide,
    SayForSeconds,
    Wait,
    SpriteClicked,
    FlagClicked,
    KeyPressed,
    Invisible,
}

/// Kind names accepted by [`FrameTag::from_name`], lower-cased.
const NAME_TO_TAG: Map<&'static str, FrameTag> = phf_map! {
    "assignment" => FrameTag::Assignment,
    "class" => FrameTag::Class,
    "comment" => FrameTag::Comment,
    "def" => FrameTag::Def,
    "flagclicked" => FrameTag::FlagClicked,
    "for" => FrameTag::For,
    "glide" => FrameTag::Glide,
    "if" => FrameTag::If,
    "invisible" => FrameTag::Invisible,
    "keypressed" => FrameTag::KeyPressed,
    "list" => FrameTag::List,
    "print" => FrameTag::Print,
    "sayforseconds" => FrameTag::SayForSeconds,
    "spriteclicked" => FrameTag::SpriteClicked,
    "statement" => FrameTag::Statement,
    "wait" => FrameTag::Wait,
    "while" => FrameTag::While,
};

impl FrameTag {
    /// Look up a kind by name, ignoring case.
    pub fn from_name(name: &str) -> Option<Self> {
        NAME_TO_TAG.get(name.to_ascii_lowercase().as_str()).copied()
    }

    /// Canonical name, as stored in the `kind` field.
    pub fn name(self) -> &'static str {
        match self {
            FrameTag::Comment => "comment",
            FrameTag::Statement => "statement",
            FrameTag::Print => "print",
            FrameTag::Assignment => "assignment",
            FrameTag::List => "list",
            FrameTag::If => "if",
            FrameTag::For => "for",
            FrameTag::While => "while",
            FrameTag::Class => "class",
            FrameTag::Def => "def",
            FrameTag::Glide => "glide",
            FrameTag::SayForSeconds => "sayforseconds",
            FrameTag::Wait => "wait",
            FrameTag::SpriteClicked => "spriteClicked",
            FrameTag::FlagClicked => "flagClicked",
            FrameTag::KeyPressed => "keyPressed",
            FrameTag::Invisible => "invisible",
        }
    }

    /// Names of the free-text payload fields, in the order
    /// [`FrameKind::from_fields`] expects them. Bodies are not fields.
    pub fn field_names(self) -> &'static [&'static str] {
        match self {
            FrameTag::Comment | FrameTag::Statement | FrameTag::Print => &["text"],
            FrameTag::Assignment => &["variable_name", "value_text"],
            FrameTag::List => &["variable_name", "values"],
            FrameTag::If | FrameTag::For | FrameTag::While => &["condition"],
            FrameTag::Class | FrameTag::Def => &["name"],
            FrameTag::Glide => &["x", "y", "seconds"],
            FrameTag::SayForSeconds => &["text", "seconds"],
            FrameTag::Wait => &["seconds"],
            FrameTag::KeyPressed => &["key_name"],
            FrameTag::SpriteClicked | FrameTag::FlagClicked | FrameTag::Invisible => &[],
        }
    }

    pub fn is_container(self) -> bool {
        match self {
            FrameTag::If | FrameTag::For | FrameTag::While | FrameTag::Class | FrameTag::Def => true,
            FrameTag::Comment
            | FrameTag::Statement
            | FrameTag::Print
            | FrameTag::Assignment
            | FrameTag::List
            | FrameTag::Glide
            | FrameTag::SayForSeconds
            | FrameTag::Wait
            | FrameTag::SpriteClicked
            | FrameTag::FlagClicked
            | FrameTag::KeyPressed
            | FrameTag::Invisible => false,
        }
    }
}

impl fmt::Display for FrameTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FrameKind {
    pub fn tag(&self) -> FrameTag {
        match self {
            FrameKind::Comment { .. } => FrameTag::Comment,
            FrameKind::Statement { .. } => FrameTag::Statement,
            FrameKind::Print { .. } => FrameTag::Print,
            FrameKind::Assignment { .. } => FrameTag::Assignment,
            FrameKind::List { .. } => FrameTag::List,
            FrameKind::If { .. } => FrameTag::If,
            FrameKind::For { .. } => FrameTag::For,
            FrameKind::While { .. } => FrameTag::While,
            FrameKind::Class { .. } => FrameTag::Class,
            FrameKind::Def { .. } => FrameTag::Def,
            FrameKind::Glide { .. } => FrameTag::Glide,
            FrameKind::SayForSeconds { .. } => FrameTag::SayForSeconds,
            FrameKind::Wait { .. } => FrameTag::Wait,
            FrameKind::SpriteClicked => FrameTag::SpriteClicked,
            FrameKind::FlagClicked => FrameTag::FlagClicked,
            FrameKind::KeyPressed { .. } => FrameTag::KeyPressed,
            FrameKind::Invisible => FrameTag::Invisible,
        }
    }

    /// Child frames, for container kinds only.
    pub fn body(&self) -> Option<&[EditableFrame]> {
        match self {
            FrameKind::If { body, .. }
            | FrameKind::For { body, .. }
            | FrameKind::While { body, .. }
            | FrameKind::Class { body, .. }
            | FrameKind::Def { body, .. } => Some(body),
            FrameKind::Comment { .. }
            | FrameKind::Statement { .. }
            | FrameKind::Print { .. }
            | FrameKind::Assignment { .. }
            | FrameKind::List { .. }
            | FrameKind::Glide { .. }
            | FrameKind::SayForSeconds { .. }
            | FrameKind::Wait { .. }
            | FrameKind::SpriteClicked
            | FrameKind::FlagClicked
            | FrameKind::KeyPressed { .. }
            | FrameKind::Invisible => None,
        }
    }

    pub fn body_mut(&mut self) -> Option<&mut Vec<EditableFrame>> {
        match self {
            FrameKind::If { body, .. }
            | FrameKind::For { body, .. }
            | FrameKind::While { body, .. }
            | FrameKind::Class { body, .. }
            | FrameKind::Def { body, .. } => Some(body),
            FrameKind::Comment { .. }
            | FrameKind::Statement { .. }
            | FrameKind::Print { .. }
            | FrameKind::Assignment { .. }
            | FrameKind::List { .. }
            | FrameKind::Glide { .. }
            | FrameKind::SayForSeconds { .. }
            | FrameKind::Wait { .. }
            | FrameKind::SpriteClicked
            | FrameKind::FlagClicked
            | FrameKind::KeyPressed { .. }
            | FrameKind::Invisible => None,
        }
    }

    /// Build a payload from free-text fields in [`FrameTag::field_names`] order.
    ///
    /// List values are given as one comma-separated field. `body` is used by
    /// container kinds and dropped by leaves.
    pub fn from_fields(
        tag: FrameTag,
        fields: Vec<String>,
        body: Vec<EditableFrame>,
    ) -> Result<FrameKind, FrameError> {
        let expected = tag.field_names().len();
        if fields.len() != expected {
            return Err(FrameError::FieldCount {
                kind: tag,
                expected,
                found: fields.len(),
            });
        }
        let mut fields = fields.into_iter();
        let mut next = move || fields.next().unwrap_or_default();
        let kind = match tag {
            FrameTag::Comment => FrameKind::Comment { text: next() },
            FrameTag::Statement => FrameKind::Statement { text: next() },
            FrameTag::Print => FrameKind::Print { text: next() },
            FrameTag::Assignment => FrameKind::Assignment {
                variable_name: next(),
                value_text: next(),
            },
            FrameTag::List => FrameKind::List {
                variable_name: next(),
                values: split_list_values(&next()),
            },
            FrameTag::If => FrameKind::If { condition: next(), body },
            FrameTag::For => FrameKind::For { condition: next(), body },
            FrameTag::While => FrameKind::While { condition: next(), body },
            FrameTag::Class => FrameKind::Class { name: next(), body },
            FrameTag::Def => FrameKind::Def { name: next(), body },
            FrameTag::Glide => FrameKind::Glide {
                x: next(),
                y: next(),
                seconds: next(),
            },
            FrameTag::SayForSeconds => FrameKind::SayForSeconds {
                text: next(),
                seconds: next(),
            },
            FrameTag::Wait => FrameKind::Wait { seconds: next() },
            FrameTag::SpriteClicked => FrameKind::SpriteClicked,
            FrameTag::FlagClicked => FrameKind::FlagClicked,
            FrameTag::KeyPressed => FrameKind::KeyPressed { key_name: next() },
            FrameTag::Invisible => FrameKind::Invisible,
        };
        Ok(kind)
    }
}

fn split_list_values(s: &str) -> Vec<String> {
    if s.trim().is_empty() {
        return Vec::new();
    }
    s.split(',').map(|v| v.trim().to_string()).collect()
}

// Constructors
impl Frame {
    /// Build a frame with an id from the process-wide allocator.
    pub fn new(kind: FrameKind) -> Self {
        Self::with_ids(&mut ProcessIds, kind)
    }

    /// Build a frame with an id from `ids`. Any body is placed one level down.
    pub fn with_ids(ids: &mut impl IdSource, kind: FrameKind) -> Self {
        let mut frame = Self {
            id: ids.next_id(),
            depth: 0,
            kind,
        };
        frame.set_depth(0);
        frame
    }

    /// The frame the "add" palette creates for `tag`: empty text, one-second
    /// timings, and a placeholder as the body of a container.
    pub fn blank(tag: FrameTag) -> Self {
        let seconds = || "1".to_string();
        let placeholder = || vec![EditableFrame::saved(Frame::invisible())];
        let kind = match tag {
            FrameTag::Comment => FrameKind::Comment { text: String::new() },
            FrameTag::Statement => FrameKind::Statement { text: String::new() },
            FrameTag::Print => FrameKind::Print { text: String::new() },
            FrameTag::Assignment => FrameKind::Assignment {
                variable_name: String::new(),
                value_text: String::new(),
            },
            FrameTag::List => FrameKind::List {
                variable_name: String::new(),
                values: Vec::new(),
            },
            FrameTag::If => FrameKind::If {
                condition: String::new(),
                body: placeholder(),
            },
            FrameTag::For => FrameKind::For {
                condition: String::new(),
                body: placeholder(),
            },
            FrameTag::While => FrameKind::While {
                condition: String::new(),
                body: placeholder(),
            },
            FrameTag::Class => FrameKind::Class {
                name: String::new(),
                body: placeholder(),
            },
            FrameTag::Def => FrameKind::Def {
                name: String::new(),
                body: placeholder(),
            },
            FrameTag::Glide => FrameKind::Glide {
                x: String::new(),
                y: String::new(),
                seconds: seconds(),
            },
            FrameTag::SayForSeconds => FrameKind::SayForSeconds {
                text: String::new(),
                seconds: seconds(),
            },
            FrameTag::Wait => FrameKind::Wait { seconds: seconds() },
            FrameTag::SpriteClicked => FrameKind::SpriteClicked,
            FrameTag::FlagClicked => FrameKind::FlagClicked,
            FrameTag::KeyPressed => FrameKind::KeyPressed {
                key_name: String::new(),
            },
            FrameTag::Invisible => FrameKind::Invisible,
        };
        Self::new(kind)
    }

    pub fn comment(text: impl Into<String>) -> Self {
        Self::new(FrameKind::Comment { text: text.into() })
    }

    pub fn statement(text: impl Into<String>) -> Self {
        Self::new(FrameKind::Statement { text: text.into() })
    }

    pub fn print(text: impl Into<String>) -> Self {
        Self::new(FrameKind::Print { text: text.into() })
    }

    pub fn assignment(variable_name: impl Into<String>, value_text: impl Into<String>) -> Self {
        Self::new(FrameKind::Assignment {
            variable_name: variable_name.into(),
            value_text: value_text.into(),
        })
    }

    pub fn list<I, S>(variable_name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(FrameKind::List {
            variable_name: variable_name.into(),
            values: values.into_iter().map(Into::into).collect(),
        })
    }

    pub fn if_frame(condition: impl Into<String>, body: impl IntoIterator<Item = Frame>) -> Self {
        Self::new(FrameKind::If {
            condition: condition.into(),
            body: saved_body(body),
        })
    }

    pub fn for_loop(condition: impl Into<String>, body: impl IntoIterator<Item = Frame>) -> Self {
        Self::new(FrameKind::For {
            condition: condition.into(),
            body: saved_body(body),
        })
    }

    pub fn while_loop(condition: impl Into<String>, body: impl IntoIterator<Item = Frame>) -> Self {
        Self::new(FrameKind::While {
            condition: condition.into(),
            body: saved_body(body),
        })
    }

    pub fn class(name: impl Into<String>, body: impl IntoIterator<Item = Frame>) -> Self {
        Self::new(FrameKind::Class {
            name: name.into(),
            body: saved_body(body),
        })
    }

    pub fn def(name: impl Into<String>, body: impl IntoIterator<Item = Frame>) -> Self {
        Self::new(FrameKind::Def {
            name: name.into(),
            body: saved_body(body),
        })
    }

    pub fn glide(x: impl Into<String>, y: impl Into<String>, seconds: impl Into<String>) -> Self {
        Self::new(FrameKind::Glide {
            x: x.into(),
            y: y.into(),
            seconds: seconds.into(),
        })
    }

    pub fn say_for_seconds(text: impl Into<String>, seconds: impl Into<String>) -> Self {
        Self::new(FrameKind::SayForSeconds {
            text: text.into(),
            seconds: seconds.into(),
        })
    }

    pub fn wait(seconds: impl Into<String>) -> Self {
        Self::new(FrameKind::Wait {
            seconds: seconds.into(),
        })
    }

    pub fn sprite_clicked() -> Self {
        Self::new(FrameKind::SpriteClicked)
    }

    pub fn flag_clicked() -> Self {
        Self::new(FrameKind::FlagClicked)
    }

    pub fn key_pressed(key_name: impl Into<String>) -> Self {
        Self::new(FrameKind::KeyPressed {
            key_name: key_name.into(),
        })
    }

    pub fn invisible() -> Self {
        Self::new(FrameKind::Invisible)
    }
}

fn saved_body(body: impl IntoIterator<Item = Frame>) -> Vec<EditableFrame> {
    body.into_iter().map(EditableFrame::saved).collect()
}

impl Frame {
    pub fn tag(&self) -> FrameTag {
        self.kind.tag()
    }

    pub fn is_container(&self) -> bool {
        self.tag().is_container()
    }

    pub fn body(&self) -> Option<&[EditableFrame]> {
        self.kind.body()
    }

    pub fn body_mut(&mut self) -> Option<&mut Vec<EditableFrame>> {
        self.kind.body_mut()
    }

    /// Set this frame's depth and re-depth its whole subtree to match.
    pub fn set_depth(&mut self, depth: usize) {
        self.depth = depth;
        if let Some(body) = self.kind.body_mut() {
            for child in body {
                child.frame.set_depth(depth + 1);
            }
        }
    }
}
