//! `fis25c`: reads a JSON AST fixture, analyzes and lowers it, and writes
//! the resulting three-address code to a file or stdout.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use fis25_compiler::ast::AbstractSyntaxTree;
use fis25_compiler::Compiler;

/// Semantic analyzer and TAC generator for the FIS-25 didactic compiler.
#[derive(Parser, Debug)]
#[clap(name = "fis25c", version)]
struct Cli {
    /// Path to a JSON-encoded `AbstractSyntaxTree` fixture.
    ast_path: PathBuf,

    /// Output path for the generated TAC. Defaults to the input path with
    /// its extension replaced by `.tac`.
    #[clap(short, long)]
    output: Option<PathBuf>,

    /// Print the generated TAC to stdout instead of writing a file.
    #[clap(long)]
    stdout: bool,

    /// Enable verbose (debug-level) logging on stderr.
    #[clap(long)]
    debug: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let log_level = if cli.debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("fis25c: {err}");
            ExitCode::from(exitcode::DATAERR as u8)
        }
    }
}

fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let fixture_text = fs::read_to_string(&cli.ast_path)?;
    let tree: AbstractSyntaxTree = serde_json::from_str(&fixture_text)?;

    let tac = Compiler::new().compile(tree.root())?;

    if cli.stdout {
        print!("{tac}");
        return Ok(());
    }

    let output_path = cli
        .output
        .clone()
        .unwrap_or_else(|| cli.ast_path.with_extension("tac"));
    fs::write(&output_path, tac)?;
    log::info!("wrote {}", output_path.display());
    Ok(())
}
