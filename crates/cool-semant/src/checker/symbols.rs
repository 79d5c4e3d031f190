//! Type environment: scoped identifier → declared type bindings
//!
//! Scopes are entered through `TypeEnv::enter_scope`, which returns a guard.
//! The scope is popped when the guard drops, so every exit path (including
//! early returns after an error) leaves the stack balanced.

use rustc_hash::FxHashMap;
use std::ops::{Deref, DerefMut};

use crate::interner::Symbol;

/// Scope stack for the class currently being checked
#[derive(Debug)]
pub struct TypeEnv {
    scopes: Vec<FxHashMap<Symbol, Symbol>>,
}

impl TypeEnv {
    /// Create an environment holding one empty base scope
    pub fn new() -> Self {
        TypeEnv {
            scopes: vec![FxHashMap::default()],
        }
    }

    /// Push a scope; it is popped when the returned guard drops
    pub fn enter_scope(&mut self) -> ScopeGuard<'_> {
        self.scopes.push(FxHashMap::default());
        ScopeGuard { env: self }
    }

    /// Bind `name` in the innermost scope, shadowing outer bindings
    pub fn bind(&mut self, name: Symbol, ty: Symbol) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name, ty);
        }
    }

    /// Innermost binding of `name`
    pub fn lookup(&self, name: Symbol) -> Option<Symbol> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.get(&name).copied())
    }

    /// Number of scopes currently open (including the base scope)
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }
}

/// Open scope; dereferences to the environment it belongs to
pub struct ScopeGuard<'e> {
    env: &'e mut TypeEnv,
}

impl Default for TypeEnv {
    fn default() -> Self {
        Self::new()
    }
}

impl Deref for ScopeGuard<'_> {
    type Target = TypeEnv;

    fn deref(&self) -> &TypeEnv {
        self.env
    }
}

impl DerefMut for ScopeGuard<'_> {
    fn deref_mut(&mut self) -> &mut TypeEnv {
        self.env
    }
}

impl Drop for ScopeGuard<'_> {
    fn drop(&mut self) {
        self.env.scopes.pop();
    }
}
