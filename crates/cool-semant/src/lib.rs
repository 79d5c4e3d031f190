//! Cool Semantic Analysis
//!
//! Type checking for Cool programs delivered as a parsed AST.
//!
//! This crate provides:
//! - String interning for identifiers and type names
//! - The class hierarchy with the five basic classes
//! - Method environment and scoped type environment
//! - Conformance and join over the class tree
//! - Typing rules for every expression form, decorating the AST in place
//! - A JSON wire format for the AST, in and out
//!
//! # Usage
//!
//! ```ignore
//! use cool_semant::{analyze, Interner, ProgramDoc};
//!
//! let mut interner = Interner::new();
//! let mut program = ProgramDoc::from_json(&text)?.into_program(&mut interner);
//!
//! match analyze(&mut program, &mut interner) {
//!     Ok(_) => println!("{}", ProgramDoc::from_program(&program, &interner).to_json_pretty()?),
//!     Err(failure) => {
//!         failure.diagnostics().render_text(&mut std::io::stderr())?;
//!         eprintln!("{}", failure);
//!     }
//! }
//! ```

pub mod ast;
pub mod checker;
pub mod interner;
pub mod wire;

// Re-export main types
pub use checker::{analyze, Diagnostic, Diagnostics, Semant, SemantError, SemantFailure};
pub use interner::{Interner, Symbol};
pub use wire::ProgramDoc;
