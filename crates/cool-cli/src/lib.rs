//! Cool semantic checker CLI
//!
//! Reads a parsed program as a JSON AST document, type-checks it, and
//! either prints the diagnostics or writes the type-decorated document.

pub mod commands;

use anyhow::Context;
use clap::{ArgAction, Parser, ValueEnum};
use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;

use commands::check::{self, CheckOptions};

#[derive(Parser, Debug)]
#[command(name = "coolsemant")]
#[command(about = "Type-check a parsed Cool program", long_about = None)]
#[command(version)]
pub struct Cli {
    /// JSON AST document ("-" reads standard input)
    pub input: String,

    /// Write the decorated AST here instead of standard output
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Diagnostic format
    #[arg(long, value_enum, default_value_t = Format::Text)]
    pub format: Format,

    /// Check only; do not write the decorated AST
    #[arg(long)]
    pub no_emit: bool,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

/// How diagnostics are written to standard error
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    /// One `<file>:<line>: <message>` line per error, then the halt message
    Text,
    /// A JSON array of `{code, file, line, message}` objects
    Json,
}

/// Install the stderr log subscriber; warnings only unless `-v` is given
pub fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    // A subscriber may already be installed when embedded in tests
    let _ = tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_ansi(false)
        .with_max_level(level)
        .try_init();
}

fn read_input(input: &str) -> anyhow::Result<String> {
    if input == "-" {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .context("failed to read standard input")?;
        Ok(text)
    } else {
        fs::read_to_string(input).with_context(|| format!("failed to read {}", input))
    }
}

/// Run the checker as configured by `cli`.
///
/// Returns `Ok(true)` when the program is well typed. The decorated AST is
/// only written (and an output file only created) on success.
pub fn run(cli: &Cli) -> anyhow::Result<bool> {
    tracing::info!(input = %cli.input, "checking");
    let source = read_input(&cli.input)?;

    let options = CheckOptions {
        format: cli.format,
        emit: !cli.no_emit,
    };

    let mut decorated = Vec::new();
    let passed = {
        let mut stderr = io::stderr().lock();
        check::execute(&source, &options, &mut decorated, &mut stderr)?
    };

    if passed && !decorated.is_empty() {
        match &cli.output {
            Some(path) => fs::write(path, &decorated)
                .with_context(|| format!("failed to write {}", path.display()))?,
            None => {
                let mut stdout = io::stdout().lock();
                stdout.write_all(&decorated).context("failed to write standard output")?;
                stdout.flush()?;
            }
        }
    }

    Ok(passed)
}
