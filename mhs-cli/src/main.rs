use std::env;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::{Command, ExitCode, ExitStatus};

use anyhow::{Context, Result, bail};
use clap::{ArgAction, Parser};
use log::{LevelFilter, info, warn};
use mhs_core::{CoreError, compile_rust, emit_ast, emit_tokens};
use simple_logger::SimpleLogger;

/// コマンドライン引数を定義するための構造体
#[derive(Parser, Debug)]
#[command(version, about = "Compile MHS programs to Rust", long_about = None)]
struct Cli {
    #[arg(short, long, help = "Source file (reads standard input when absent)")]
    input: Option<String>,

    #[arg(short, long, default_value = "output.rs")]
    output: String,

    #[arg(
        long,
        value_name = "FORMAT",
        default_value = "rust",
        help = "Output format: rust, tokens, ast"
    )]
    emit: String,

    #[arg(long, help = "Build the generated Rust with rustc and run it")]
    run: bool,

    #[arg(short, long, action = ArgAction::Count, help = "Log more (repeatable)")]
    verbose: u8,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    match execute(cli) {
        Err(err) => match err.downcast_ref::<CoreError>() {
            Some(CoreError::MissingInitializer { .. }) => {
                println!("{err}");
                Ok(ExitCode::FAILURE)
            }
            _ => Err(err),
        },
        result => result,
    }
}

fn init_logging(verbosity: u8) -> Result<()> {
    let level = match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    SimpleLogger::new()
        .with_level(level)
        .env()
        .init()
        .context("failed to install logger")
}

fn execute(cli: Cli) -> Result<ExitCode> {
    let source = match &cli.input {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read input file {path}"))?,
        None => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("failed to read standard input")?;
            buffer
        }
    };

    match cli.emit.as_str() {
        "rust" => {
            let artifact = compile_rust(&source)?;
            write_output(&cli.output, artifact.code.as_bytes())?;
            info!("wrote {}", cli.output);
            if cli.run {
                let status = build_and_run(Path::new(&cli.output))?;
                return Ok(exit_code(status));
            }
        }
        "tokens" => write_output(&cli.output, emit_tokens(&source).as_bytes())?,
        "ast" => write_output(&cli.output, emit_ast(&source)?.as_bytes())?,
        other => return Err(CoreError::UnsupportedFormat(other.to_string()).into()),
    }

    if cli.run && cli.emit != "rust" {
        warn!("--run is ignored for --emit {}", cli.emit);
    }

    Ok(ExitCode::SUCCESS)
}

fn write_output(path: &str, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = PathBuf::from(path).parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {parent:?}"))?;
        }
    }
    fs::write(path, bytes).with_context(|| format!("failed to write output file {path}"))?;
    Ok(())
}

/// Build `source` with `$RUSTC` (or `rustc` from `PATH`) in a scratch
/// directory and run the result with inherited stdio.
fn build_and_run(source: &Path) -> Result<ExitStatus> {
    let dir = tempfile::tempdir().context("failed to create build directory")?;
    let binary = dir.path().join(format!("program{}", env::consts::EXE_SUFFIX));
    let rustc = env::var_os("RUSTC").unwrap_or_else(|| "rustc".into());

    let status = Command::new(&rustc)
        .args(["--edition", "2021", "--cap-lints", "allow", "-o"])
        .arg(&binary)
        .arg(source)
        .status()
        .with_context(|| format!("failed to invoke {}", rustc.to_string_lossy()))?;
    if !status.success() {
        bail!("rustc could not build {}", source.display());
    }

    info!("running {}", binary.display());
    Command::new(&binary)
        .status()
        .with_context(|| format!("failed to run {}", binary.display()))
}

fn exit_code(status: ExitStatus) -> ExitCode {
    if status.success() {
        return ExitCode::SUCCESS;
    }
    let code = status.code().unwrap_or(1);
    ExitCode::from(u8::try_from(code).unwrap_or(1))
}
