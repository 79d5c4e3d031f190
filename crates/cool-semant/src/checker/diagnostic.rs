//! Diagnostic collection and rendering
//!
//! Diagnostics are line-tagged: `<file>:<line>: <message>`. The checker only
//! sees the AST, never source text, so there is no snippet rendering.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::{self, Write};

use super::error::SemantError;

/// A located semantic error
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Source file, if the error has a location
    pub file: Option<String>,
    /// Source line, if the error has a location
    pub line: Option<u32>,
    pub error: SemantError,
}

impl Diagnostic {
    /// Create a located diagnostic
    pub fn at(file: impl Into<String>, line: u32, error: impl Into<SemantError>) -> Self {
        Diagnostic {
            file: Some(file.into()),
            line: Some(line),
            error: error.into(),
        }
    }

    /// Create a diagnostic with no source location
    pub fn global(error: impl Into<SemantError>) -> Self {
        Diagnostic {
            file: None,
            line: None,
            error: error.into(),
        }
    }

    /// Error code (e.g., "E2016")
    pub fn code(&self) -> &'static str {
        self.error.code()
    }

    /// Convert to the JSON representation
    pub fn to_json(&self) -> JsonDiagnostic {
        JsonDiagnostic {
            code: self.code().to_string(),
            file: self.file.clone(),
            line: self.line,
            message: self.error.to_string(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.file, self.line) {
            (Some(file), Some(line)) => write!(f, "{}:{}: {}", file, line, self.error),
            _ => write!(f, "{}", self.error),
        }
    }
}

/// JSON representation of a diagnostic for tool integration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonDiagnostic {
    /// Error code (e.g., "E2016")
    pub code: String,
    /// Source file
    pub file: Option<String>,
    /// Source line (1-indexed)
    pub line: Option<u32>,
    /// Error message
    pub message: String,
}

/// Append-only error sink shared by every check call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an error at `file:line`
    pub fn record(&mut self, file: &str, line: u32, error: impl Into<SemantError>) {
        let diag = Diagnostic::at(file, line, error);
        tracing::trace!(code = diag.code(), %diag, "semantic error");
        self.items.push(diag);
    }

    /// Record an already-built diagnostic
    pub fn push(&mut self, diag: Diagnostic) {
        tracing::trace!(code = diag.code(), %diag, "semantic error");
        self.items.push(diag);
    }

    pub fn error_count(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.items.iter()
    }

    /// Write one `<file>:<line>: <message>` line per diagnostic
    pub fn render_text<W: Write>(&self, out: &mut W) -> io::Result<()> {
        for diag in &self.items {
            writeln!(out, "{}", diag)?;
        }
        Ok(())
    }

    /// Write all diagnostics as a pretty-printed JSON array
    pub fn render_json<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let json: Vec<JsonDiagnostic> = self.items.iter().map(Diagnostic::to_json).collect();
        serde_json::to_writer_pretty(&mut *out, &json)?;
        writeln!(out)
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
