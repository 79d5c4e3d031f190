//! Pre-interned names the checker refers to directly

use crate::interner::{Interner, Symbol};

/// Names with fixed meaning in the language and in the basic classes.
///
/// Interned once up front so that every comparison against them during
/// checking is a symbol compare.
#[derive(Debug, Clone, Copy)]
pub struct WellKnown {
    pub object: Symbol,
    pub io: Symbol,
    pub int: Symbol,
    pub bool_: Symbol,
    pub string: Symbol,
    pub self_type: Symbol,
    pub self_: Symbol,
    pub main_class: Symbol,
    pub main_method: Symbol,
    /// Sentinel type of expressions that produce no usable value
    pub no_type: Symbol,
    /// Parent of the root class
    pub no_class: Symbol,
    pub prim_slot: Symbol,
    pub basic_file: Symbol,

    // Basic class members
    pub arg: Symbol,
    pub arg2: Symbol,
    pub val: Symbol,
    pub str_field: Symbol,
    pub abort: Symbol,
    pub type_name: Symbol,
    pub copy: Symbol,
    pub out_string: Symbol,
    pub out_int: Symbol,
    pub in_string: Symbol,
    pub in_int: Symbol,
    pub length: Symbol,
    pub concat: Symbol,
    pub substr: Symbol,
}

impl WellKnown {
    pub fn new(interner: &mut Interner) -> Self {
        WellKnown {
            object: interner.intern("Object"),
            io: interner.intern("IO"),
            int: interner.intern("Int"),
            bool_: interner.intern("Bool"),
            string: interner.intern("String"),
            self_type: interner.intern("SELF_TYPE"),
            self_: interner.intern("self"),
            main_class: interner.intern("Main"),
            main_method: interner.intern("main"),
            no_type: interner.intern("_no_type"),
            no_class: interner.intern("_no_class"),
            prim_slot: interner.intern("_prim_slot"),
            basic_file: interner.intern("<basic class>"),
            arg: interner.intern("arg"),
            arg2: interner.intern("arg2"),
            val: interner.intern("_val"),
            str_field: interner.intern("_str_field"),
            abort: interner.intern("abort"),
            type_name: interner.intern("type_name"),
            copy: interner.intern("copy"),
            out_string: interner.intern("out_string"),
            out_int: interner.intern("out_int"),
            in_string: interner.intern("in_string"),
            in_int: interner.intern("in_int"),
            length: interner.intern("length"),
            concat: interner.intern("concat"),
            substr: interner.intern("substr"),
        }
    }

    /// Int, Bool and String: sealed value classes
    pub fn is_primitive(&self, ty: Symbol) -> bool {
        ty == self.int || ty == self.bool_ || ty == self.string
    }
}
