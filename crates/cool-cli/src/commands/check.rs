//! `coolsemant`: type-check a JSON AST document.

use anyhow::Context;
use std::io::Write;

use cool_semant::{analyze, Interner, ProgramDoc};

use crate::Format;

/// Options for a single check run
#[derive(Debug, Clone, Copy)]
pub struct CheckOptions {
    pub format: Format,
    /// Write the decorated AST on success
    pub emit: bool,
}

/// Check `source` and report to `out` / `err`.
///
/// Returns whether the program was accepted. Only malformed input and write
/// failures are errors; semantic errors are reported on `err`.
pub fn execute<W: Write, E: Write>(
    source: &str,
    options: &CheckOptions,
    out: &mut W,
    err: &mut E,
) -> anyhow::Result<bool> {
    let doc = ProgramDoc::from_json(source).context("failed to decode AST document")?;

    let mut interner = Interner::new();
    let mut program = doc.into_program(&mut interner);
    tracing::debug!(classes = program.classes.len(), "AST decoded");

    match analyze(&mut program, &mut interner) {
        Ok(_) => {
            if options.emit {
                let decorated = ProgramDoc::from_program(&program, &interner);
                serde_json::to_writer_pretty(&mut *out, &decorated)
                    .context("failed to write decorated AST")?;
                writeln!(out)?;
            }
            Ok(true)
        }
        Err(failure) => {
            tracing::info!(errors = failure.error_count(), "program rejected");
            match options.format {
                Format::Text => {
                    failure.diagnostics().render_text(err)?;
                    writeln!(err, "{}", failure)?;
                }
                Format::Json => failure.diagnostics().render_json(err)?,
            }
            Ok(false)
        }
    }
}
