//! Semantic analysis
//!
//! Runs in three phases:
//! 1. Build and validate the class hierarchy (fail-fast)
//! 2. Build the method environment
//! 3. Type-check every class in declaration order, accumulating errors
//!
//! On success every expression in the program carries its static type.

pub mod builtins;
pub mod checker;
pub mod classes;
pub mod diagnostic;
pub mod error;
pub mod methods;
pub mod names;
pub mod subtyping;
pub mod symbols;

pub use checker::TypeChecker;
pub use classes::{AttributeInfo, ClassInfo, ClassTable};
pub use diagnostic::{Diagnostic, Diagnostics, JsonDiagnostic};
pub use error::{CheckError, HierarchyError, SemantError};
pub use methods::{FormalSig, MethodEnv, MethodSig};
pub use names::WellKnown;
pub use subtyping::SubtypingContext;
pub use symbols::{ScopeGuard, TypeEnv};

use thiserror::Error;

use crate::ast::Program;
use crate::interner::Interner;

/// Tables produced by a successful analysis
#[derive(Debug, Clone)]
pub struct Semant {
    pub classes: ClassTable,
    pub methods: MethodEnv,
}

/// Analysis rejected the program.
///
/// The Display text is the halt message; the diagnostics are carried along
/// for the driver to print first.
#[derive(Debug, Error)]
pub enum SemantFailure {
    /// The class hierarchy is malformed; no expression was checked
    #[error("Compilation halted due to static semantic errors.")]
    Hierarchy(Diagnostics),

    /// One or more feature or expression errors
    #[error("Compilation halted due to static semantic errors")]
    Check(Diagnostics),
}

impl SemantFailure {
    pub fn diagnostics(&self) -> &Diagnostics {
        match self {
            SemantFailure::Hierarchy(diagnostics) | SemantFailure::Check(diagnostics) => diagnostics,
        }
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics().error_count()
    }
}

/// Check `program` and decorate it with static types.
///
/// The well-known names are interned into `interner` before checking starts.
#[tracing::instrument(skip_all, fields(classes = program.classes.len()))]
pub fn analyze(program: &mut Program, interner: &mut Interner) -> Result<Semant, SemantFailure> {
    let names = WellKnown::new(interner);
    let interner = &*interner;

    let classes = ClassTable::build(program, names, interner).map_err(|diag| {
        let mut diagnostics = Diagnostics::new();
        diagnostics.push(diag);
        SemantFailure::Hierarchy(diagnostics)
    })?;

    let methods = MethodEnv::build(&classes);

    let mut diagnostics = Diagnostics::new();
    let mut checker = TypeChecker::new(&classes, &methods, interner, &mut diagnostics);
    for class in &mut program.classes {
        checker.check_class(class);
    }

    if !diagnostics.is_empty() {
        tracing::debug!(errors = diagnostics.error_count(), "type checking failed");
        return Err(SemantFailure::Check(diagnostics));
    }

    tracing::debug!("program is well typed");
    Ok(Semant { classes, methods })
}
