//! Method environment
//!
//! Flat `(class, method) → signature` lookup built once from the validated
//! hierarchy. Inherited methods are found by walking the parent chain.

use rustc_hash::FxHashMap;

use super::classes::ClassTable;
use crate::interner::Symbol;

/// Formal parameter signature
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormalSig {
    pub name: Symbol,
    pub type_decl: Symbol,
    pub line: u32,
}

/// Method signature
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodSig {
    /// Class that declares the method
    pub owner: Symbol,
    pub name: Symbol,
    pub formals: Vec<FormalSig>,
    pub return_type: Symbol,
    /// Index of the declaring feature within its class
    pub position: usize,
    pub line: u32,
}

impl MethodSig {
    pub fn arity(&self) -> usize {
        self.formals.len()
    }
}

/// Method signatures keyed by declaring class and method name
#[derive(Debug, Clone, Default)]
pub struct MethodEnv {
    methods: FxHashMap<(Symbol, Symbol), MethodSig>,
}

impl MethodEnv {
    /// Record every method of every class.
    ///
    /// When a class declares a method twice the first declaration is kept;
    /// the later one is reported while checking the class.
    #[tracing::instrument(skip_all)]
    pub fn build(classes: &ClassTable) -> Self {
        let mut methods = FxHashMap::default();

        for class in classes.iter() {
            for sig in &class.methods {
                methods
                    .entry((class.name, sig.name))
                    .or_insert_with(|| sig.clone());
            }
        }

        tracing::debug!(methods = methods.len(), "method environment built");
        MethodEnv { methods }
    }

    /// Method declared directly on `class`
    pub fn declared(&self, class: Symbol, method: Symbol) -> Option<&MethodSig> {
        self.methods.get(&(class, method))
    }

    /// Method declared on `class` or the nearest ancestor that has one
    pub fn resolve(&self, classes: &ClassTable, class: Symbol, method: Symbol) -> Option<&MethodSig> {
        classes
            .ancestors(class)
            .find_map(|info| self.declared(info.name, method))
    }

    pub fn len(&self) -> usize {
        self.methods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }
}
