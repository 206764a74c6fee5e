use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::io::{self, Read};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use pytch_frames::{CodegenOptions, FramesEditor, ScriptContext, compile, execute};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Command script to run; read from stdin when absent
    #[arg(value_name = "SCRIPT")]
    script: Option<String>,

    /// Load the frame tree from a JSON project file
    #[arg(short = 'l', long, value_name = "FILE", conflicts_with = "sample")]
    load: Option<String>,

    /// Save the frame tree as JSON after the script succeeds
    #[arg(short = 's', long, value_name = "FILE")]
    save: Option<String>,

    /// Start from the sample project
    #[arg(short = 'S', long)]
    sample: bool,

    /// Print the frame tree as JSON instead of generated code
    #[arg(short = 'j', long)]
    json: bool,

    /// Module imported by the generated code
    #[arg(short = 'm', long, value_name = "NAME", env = "PYTCH_MODULE", default_value = "pytch")]
    module: String,

    /// Base class for generated sprite classes [default: MODULE.Sprite]
    #[arg(short = 'b', long, value_name = "CLASS", env = "PYTCH_SPRITE_BASE")]
    sprite_base: Option<String>,
}

fn init_logging() {
    let filter = ["PYTCH_LOG", "RUST_LOG"]
        .into_iter()
        .find_map(|var| EnvFilter::try_from_env(var).ok())
        .unwrap_or_else(|| EnvFilter::new("warn"));
    // A second initialisation is harmless.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn main() -> Result<ExitCode> {
    init_logging();
    let args = Args::parse();

    let options = CodegenOptions {
        sprite_base: args
            .sprite_base
            .unwrap_or_else(|| format!("{}.Sprite", args.module)),
        module: args.module,
    };

    let mut editor = if let Some(path) = args.load.as_ref() {
        let json = fs::read_to_string(path).with_context(|| format!("Failed to read {}", path))?;
        FramesEditor::from_json(&json).with_context(|| format!("Failed to load {}", path))?
    } else if args.sample {
        FramesEditor::sample()
    } else {
        FramesEditor::new()
    };

    let script = match args.script.as_ref() {
        Some(path) => fs::read_to_string(path).with_context(|| format!("Failed to read {}", path))?,
        None => {
            let mut script = String::new();
            io::stdin()
                .read_to_string(&mut script)
                .context("Failed to read stdin")?;
            script
        }
    };
    let code = compile(&script)?;

    let mut ctx = ScriptContext::new(&mut editor, options.clone());
    let outcome = execute(&mut ctx, &code);
    let output = ctx.output;

    for text in &output {
        print!("{}", text);
    }
    if outcome.is_failure() {
        println!("\x07COMMAND FAILED");
        return Ok(ExitCode::FAILURE);
    }

    if args.json {
        println!("{}", editor.to_json()?);
    } else if output.is_empty() {
        print!("{}", editor.python_code(&options));
    }

    if let Some(path) = args.save.as_ref() {
        let mut json = editor.to_json()?;
        json.push('\n');
        fs::write(path, json).with_context(|| format!("Failed to write {}", path))?;
        let count = editor.frames().len();
        eprintln!(
            "{} written ({} top-level frame{}).",
            path,
            count,
            if count == 1 { "" } else { "s" }
        );
    }
    Ok(ExitCode::SUCCESS)
}
