//! Projection of the frame tree to Python source.
//!
//! Generation is a pre-order walk: each visible frame contributes one line,
//! indented four spaces per level, followed by the lines of its body.
//! Placeholders contribute nothing. The output always starts with the two
//! import lines, so an empty tree generates just the header.

use itertools::Itertools;

use crate::edit_state::EditableFrame;
use crate::frame::{Frame, FrameId, FrameKind};

const INDENT: &str = "    ";

/// Names the generated code refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodegenOptions {
    /// Module imported at the top and used for decorators and `wait_seconds`.
    pub module: String,
    /// Base class for `class` frames.
    pub sprite_base: String,
}

impl Default for CodegenOptions {
    fn default() -> Self {
        Self {
            module: "pytch".to_string(),
            sprite_base: "pytch.Sprite".to_string(),
        }
    }
}

/// Generated source plus the frame behind each body line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedCode {
    pub text: String,
    /// Number of header lines before the first frame line.
    pub header_lines: usize,
    /// `line_frames[i]` produced line `header_lines + i + 1` (1-based).
    pub line_frames: Vec<FrameId>,
}

impl GeneratedCode {
    /// The frame that produced 1-based source line `line`, if a frame did.
    pub fn frame_at_line(&self, line: usize) -> Option<FrameId> {
        let index = line.checked_sub(self.header_lines + 1)?;
        self.line_frames.get(index).copied()
    }

    /// The 1-based source line produced by `id`, if it produced one.
    pub fn line_of(&self, id: FrameId) -> Option<usize> {
        let index = self.line_frames.iter().position(|&f| f == id)?;
        Some(self.header_lines + index + 1)
    }
}

/// Generate the source text for `frames`.
pub fn python_code(frames: &[EditableFrame], options: &CodegenOptions) -> String {
    generate(frames, options).text
}

/// Generate the source text for `frames` together with its line map.
pub fn generate(frames: &[EditableFrame], options: &CodegenOptions) -> GeneratedCode {
    let mut code = GeneratedCode {
        text: format!("import {}\nimport random\n", options.module),
        header_lines: 2,
        line_frames: Vec::new(),
    };
    for frame in frames {
        emit(frame, options, &mut code);
    }
    code
}

fn emit(frame: &EditableFrame, options: &CodegenOptions, code: &mut GeneratedCode) {
    if let Some(line) = frame_line(&frame.frame, options) {
        for _ in 0..frame.frame.depth {
            code.text.push_str(INDENT);
        }
        code.text.push_str(&line);
        code.text.push('\n');
        code.line_frames.push(frame.id());
    }
    if let Some(body) = frame.frame.body() {
        for child in body {
            emit(child, options, code);
        }
    }
}

/// The unindented line for one frame; `None` for placeholders.
fn frame_line(frame: &Frame, options: &CodegenOptions) -> Option<String> {
    let module = &options.module;
    let line = match &frame.kind {
        FrameKind::Comment { text } => format!("# {text}"),
        FrameKind::Statement { text } => text.clone(),
        FrameKind::Print { text } => format!("print({text})"),
        FrameKind::Assignment {
            variable_name,
            value_text,
        } => format!("{variable_name} = {value_text}"),
        FrameKind::List {
            variable_name,
            values,
        } => format!("{variable_name} = [{}]", values.iter().join(", ")),
        FrameKind::If { condition, .. } => format!("if {condition}:"),
        FrameKind::For { condition, .. } => format!("for {condition}:"),
        FrameKind::While { condition, .. } => format!("while {condition}:"),
        FrameKind::Class { name, .. } => format!("class {name}( {} ):", options.sprite_base),
        FrameKind::Def { name, .. } => format!("def {name}(self):"),
        FrameKind::Glide { x, y, seconds } => format!("self.glide_to_xy({x}, {y}, {seconds})"),
        FrameKind::SayForSeconds { text, seconds } => format!("self.say_for_seconds({text}, {seconds})"),
        FrameKind::Wait { seconds } => format!("{module}.wait_seconds( {seconds})"),
        FrameKind::SpriteClicked => format!("@{module}.when_this_sprite_clicked"),
        FrameKind::FlagClicked => format!("@{module}.when_green_flag_clicked"),
        FrameKind::KeyPressed { key_name } => format!("@{module}.when_key_pressed({key_name})"),
        FrameKind::Invisible => return None,
    };
    Some(line)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample::sample_frames;

    const HEADER: &str = "import pytch\nimport random\n";

    fn code(frames: Vec<Frame>) -> String {
        let frames: Vec<EditableFrame> = frames.into_iter().map(EditableFrame::saved).collect();
        python_code(&frames, &CodegenOptions::default())
    }

    #[test]
    fn test_empty_tree_is_header_only() {
        assert_eq!(code(vec![]), HEADER);
    }

    #[test]
    fn test_invisible_only_is_header_only() {
        assert_eq!(code(vec![Frame::invisible()]), HEADER);
    }

    #[test]
    fn test_comment() {
        assert_eq!(code(vec![Frame::comment("hi")]), format!("{HEADER}# hi\n"));
    }

    #[test]
    fn test_class_with_assignment() {
        let frames = vec![Frame::class("Foo", [Frame::assignment("x", "1")])];
        assert_eq!(
            code(frames),
            format!("{HEADER}class Foo( pytch.Sprite ):\n    x = 1\n")
        );
    }

    #[test]
    fn test_leaf_templates() {
        let frames = vec![
            Frame::statement("self.change_x(10)"),
            Frame::print("\"hello\""),
            Frame::list("Costumes", ["\"a.png\"", "\"b.png\""]),
            Frame::glide("0", "100", "2"),
            Frame::say_for_seconds("\"Hi\"", "1.5"),
            Frame::wait("3"),
            Frame::sprite_clicked(),
            Frame::flag_clicked(),
            Frame::key_pressed("\"ArrowLeft\""),
        ];
        let expected = [
            "self.change_x(10)",
            "print(\"hello\")",
            "Costumes = [\"a.png\", \"b.png\"]",
            "self.glide_to_xy(0, 100, 2)",
            "self.say_for_seconds(\"Hi\", 1.5)",
            "pytch.wait_seconds( 3)",
            "@pytch.when_this_sprite_clicked",
            "@pytch.when_green_flag_clicked",
            "@pytch.when_key_pressed(\"ArrowLeft\")",
        ];
        let body = expected.iter().map(|l| format!("{l}\n")).join("");
        assert_eq!(code(frames), format!("{HEADER}{body}"));
    }

    #[test]
    fn test_nested_loops_indent() {
        let frames = vec![Frame::def(
            "run",
            [Frame::for_loop(
                "i in range(3)",
                [Frame::if_frame("i > 1", [Frame::while_loop("False", [Frame::invisible()])])],
            )],
        )];
        assert_eq!(
            code(frames),
            format!(
                "{HEADER}def run(self):\n    for i in range(3):\n        if i > 1:\n            while False:\n"
            )
        );
    }

    #[test]
    fn test_sample_project() {
        let expected = format!(
            "{HEADER}class MySprite( pytch.Sprite ):\n    Costumes = [\"Snake.png\"]\n    @pytch.when_green_flag_clicked\n    def speak(self):\n        self.say_for_seconds(\"Hello\", 2.0)\n"
        );
        assert_eq!(python_code(&sample_frames(), &CodegenOptions::default()), expected);
    }

    #[test]
    fn test_generation_is_deterministic() {
        let frames = sample_frames();
        let options = CodegenOptions::default();
        assert_eq!(python_code(&frames, &options), python_code(&frames, &options));
    }

    #[test]
    fn test_custom_module_names() {
        let options = CodegenOptions {
            module: "stage".into(),
            sprite_base: "stage.Actor".into(),
        };
        let frames: Vec<EditableFrame> = vec![
            EditableFrame::saved(Frame::class("A", [Frame::flag_clicked()])),
            EditableFrame::saved(Frame::wait("1")),
        ];
        assert_eq!(
            python_code(&frames, &options),
            "import stage\nimport random\nclass A( stage.Actor ):\n    @stage.when_green_flag_clicked\nstage.wait_seconds( 1)\n"
        );
    }

    #[test]
    fn test_frame_line_is_none_only_for_placeholders() {
        let options = CodegenOptions::default();
        assert_eq!(frame_line(&Frame::invisible(), &options), None);
        assert_eq!(frame_line(&Frame::statement("pass"), &options), Some("pass".to_string()));
        assert_eq!(
            frame_line(&Frame::while_loop("True", []), &options),
            Some("while True:".to_string())
        );
    }

    #[test]
    fn test_line_map_skips_placeholders() {
        let generated = generate(&sample_frames(), &CodegenOptions::default());
        assert_eq!(generated.frame_at_line(1), None);
        assert_eq!(generated.frame_at_line(3), Some(FrameId(10)));
        assert_eq!(generated.frame_at_line(4), Some(FrameId(1001)));
        assert_eq!(generated.frame_at_line(7), Some(FrameId(1005)));
        assert_eq!(generated.frame_at_line(8), None);
        assert_eq!(generated.line_of(FrameId(1003)), Some(6));
        assert_eq!(generated.line_of(FrameId(1000)), None);
    }
}
