//! The five basic classes: Object, IO, Int, Bool and String
//!
//! They have no method bodies; only their signatures matter to the checker.

use super::classes::{AttributeInfo, ClassInfo};
use super::methods::{FormalSig, MethodSig};
use super::names::WellKnown;
use crate::interner::Symbol;

fn method(owner: Symbol, position: usize, name: Symbol, formals: &[(Symbol, Symbol)], return_type: Symbol) -> MethodSig {
    MethodSig {
        owner,
        name,
        formals: formals
            .iter()
            .map(|&(name, type_decl)| FormalSig { name, type_decl, line: 0 })
            .collect(),
        return_type,
        position,
        line: 0,
    }
}

fn attribute(name: Symbol, type_decl: Symbol) -> AttributeInfo {
    AttributeInfo { name, type_decl, line: 0 }
}

fn class(n: &WellKnown, name: Symbol, parent: Symbol) -> ClassInfo {
    ClassInfo {
        name,
        parent,
        attributes: Vec::new(),
        methods: Vec::new(),
        filename: n.basic_file,
        line: 0,
        builtin: true,
    }
}

/// Build the basic classes in installation order
pub fn basic_classes(n: &WellKnown) -> Vec<ClassInfo> {
    // Object: abort() : Object, type_name() : String, copy() : SELF_TYPE
    let mut object = class(n, n.object, n.no_class);
    object.methods = vec![
        method(n.object, 0, n.abort, &[], n.object),
        method(n.object, 1, n.type_name, &[], n.string),
        method(n.object, 2, n.copy, &[], n.self_type),
    ];

    let mut io = class(n, n.io, n.object);
    io.methods = vec![
        method(n.io, 0, n.out_string, &[(n.arg, n.string)], n.self_type),
        method(n.io, 1, n.out_int, &[(n.arg, n.int)], n.self_type),
        method(n.io, 2, n.in_string, &[], n.string),
        method(n.io, 3, n.in_int, &[], n.int),
    ];

    let mut int = class(n, n.int, n.object);
    int.attributes = vec![attribute(n.val, n.prim_slot)];

    let mut bool_ = class(n, n.bool_, n.object);
    bool_.attributes = vec![attribute(n.val, n.prim_slot)];

    let mut string = class(n, n.string, n.object);
    string.attributes = vec![attribute(n.val, n.int), attribute(n.str_field, n.prim_slot)];
    string.methods = vec![
        method(n.string, 0, n.length, &[], n.int),
        method(n.string, 1, n.concat, &[(n.arg, n.string)], n.string),
        method(n.string, 2, n.substr, &[(n.arg, n.int), (n.arg2, n.int)], n.string),
    ];

    vec![object, io, int, bool_, string]
}
