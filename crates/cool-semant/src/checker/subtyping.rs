//! Subtyping rules for Cool class types
//!
//! Implements conformance `T <= U` over the validated class tree and the
//! least upper bound (join) used to type multi-branch expressions.

use super::classes::ClassTable;
use crate::interner::Symbol;

/// Conformance and join relative to the class being checked.
///
/// SELF_TYPE inside the class `C` stands for some subclass of `C`, so the
/// current class is needed to resolve it.
#[derive(Debug, Clone, Copy)]
pub struct SubtypingContext<'a> {
    classes: &'a ClassTable,
    current_class: Symbol,
}

impl<'a> SubtypingContext<'a> {
    pub fn new(classes: &'a ClassTable, current_class: Symbol) -> Self {
        SubtypingContext { classes, current_class }
    }

    /// Check if `sub` conforms to `sup` (sub <= sup)
    pub fn is_subtype(&self, sub: Symbol, sup: Symbol) -> bool {
        let names = self.classes.names();

        // Reflexivity: T <= T (covers SELF_TYPE <= SELF_TYPE)
        if sub == sup {
            return true;
        }

        // The no-type sentinel is bottom
        if sub == names.no_type {
            return true;
        }

        // Only SELF_TYPE conforms to SELF_TYPE
        if sup == names.self_type {
            return false;
        }

        let sub = self.resolve_self_type(sub);
        self.classes.ancestors(sub).any(|class| class.name == sup)
    }

    /// Least common ancestor of `a` and `b`.
    ///
    /// SELF_TYPE on either side is resolved to the current class first. The
    /// no-type sentinel is the identity.
    pub fn join(&self, a: Symbol, b: Symbol) -> Symbol {
        let names = self.classes.names();

        if a == names.no_type {
            return b;
        }
        if b == names.no_type {
            return a;
        }

        let a = self.resolve_self_type(a);
        let b = self.resolve_self_type(b);

        self.classes
            .ancestors(a)
            .map(|class| class.name)
            .find(|&ancestor| self.is_subtype(b, ancestor))
            .unwrap_or(names.object)
    }

    /// SELF_TYPE → current class; any other type unchanged
    pub fn resolve_self_type(&self, ty: Symbol) -> Symbol {
        if ty == self.classes.names().self_type {
            self.current_class
        } else {
            ty
        }
    }
}
