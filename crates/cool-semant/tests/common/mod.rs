//! Shared builders for checker integration tests
//!
//! Programs are written as wire documents so the tests exercise the same
//! path a parser-produced AST takes.

#![allow(dead_code)]

use cool_semant::ast::BinaryOp;
use cool_semant::wire::{CaseBranchDoc, ClassDoc, ExprDoc, ExprNode, FeatureDoc, FormalDoc};
use cool_semant::{analyze, Interner, ProgramDoc, SemantFailure};

pub const FILE: &str = "test.cl";

/// Override the source line of a node
pub trait At {
    fn at(self, line: u32) -> Self;
}

impl At for ExprDoc {
    fn at(mut self, line: u32) -> Self {
        self.line = line;
        self
    }
}

impl At for FeatureDoc {
    fn at(mut self, line: u32) -> Self {
        match &mut self {
            FeatureDoc::Attribute { line: l, .. } | FeatureDoc::Method { line: l, .. } => *l = line,
        }
        self
    }
}

impl At for ClassDoc {
    fn at(mut self, line: u32) -> Self {
        self.line = line;
        self
    }
}

// ============================================================================
// Expressions
// ============================================================================

fn expr(node: ExprNode) -> ExprDoc {
    ExprDoc { line: 1, ty: None, node }
}

fn boxed(e: ExprDoc) -> Box<ExprDoc> {
    Box::new(e)
}

pub fn int(value: i64) -> ExprDoc {
    expr(ExprNode::IntConst { value })
}

pub fn string(value: &str) -> ExprDoc {
    expr(ExprNode::StrConst { value: value.to_string() })
}

pub fn boolean(value: bool) -> ExprDoc {
    expr(ExprNode::BoolConst { value })
}

pub fn id(name: &str) -> ExprDoc {
    expr(ExprNode::Object { name: name.to_string() })
}

pub fn assign(name: &str, value: ExprDoc) -> ExprDoc {
    expr(ExprNode::Assign { name: name.to_string(), value: boxed(value) })
}

pub fn call(receiver: ExprDoc, method: &str, args: Vec<ExprDoc>) -> ExprDoc {
    expr(ExprNode::Dispatch { receiver: boxed(receiver), method: method.to_string(), args })
}

/// Dispatch with the implicit `self` receiver
pub fn call_self(method: &str, args: Vec<ExprDoc>) -> ExprDoc {
    call(id("self"), method, args)
}

pub fn static_call(receiver: ExprDoc, type_name: &str, method: &str, args: Vec<ExprDoc>) -> ExprDoc {
    expr(ExprNode::StaticDispatch {
        receiver: boxed(receiver),
        type_name: type_name.to_string(),
        method: method.to_string(),
        args,
    })
}

pub fn cond(pred: ExprDoc, then_branch: ExprDoc, else_branch: ExprDoc) -> ExprDoc {
    expr(ExprNode::Cond {
        pred: boxed(pred),
        then_branch: boxed(then_branch),
        else_branch: boxed(else_branch),
    })
}

pub fn while_loop(pred: ExprDoc, body: ExprDoc) -> ExprDoc {
    expr(ExprNode::Loop { pred: boxed(pred), body: boxed(body) })
}

pub fn block(body: Vec<ExprDoc>) -> ExprDoc {
    expr(ExprNode::Block { body })
}

pub fn let_in(name: &str, type_decl: &str, init: Option<ExprDoc>, body: ExprDoc) -> ExprDoc {
    expr(ExprNode::Let {
        name: name.to_string(),
        type_decl: type_decl.to_string(),
        init: init.map(boxed),
        body: boxed(body),
    })
}

pub fn case(scrutinee: ExprDoc, branches: Vec<(&str, &str, ExprDoc)>) -> ExprDoc {
    expr(ExprNode::Case {
        scrutinee: boxed(scrutinee),
        branches: branches
            .into_iter()
            .map(|(name, type_decl, body)| CaseBranchDoc {
                name: name.to_string(),
                type_decl: type_decl.to_string(),
                line: body.line,
                body,
            })
            .collect(),
    })
}

pub fn binary(op: BinaryOp, lhs: ExprDoc, rhs: ExprDoc) -> ExprDoc {
    expr(ExprNode::Binary { op, lhs: boxed(lhs), rhs: boxed(rhs) })
}

pub fn neg(operand: ExprDoc) -> ExprDoc {
    expr(ExprNode::Neg { operand: boxed(operand) })
}

pub fn not(operand: ExprDoc) -> ExprDoc {
    expr(ExprNode::Not { operand: boxed(operand) })
}

pub fn isvoid(operand: ExprDoc) -> ExprDoc {
    expr(ExprNode::IsVoid { operand: boxed(operand) })
}

pub fn new(type_name: &str) -> ExprDoc {
    expr(ExprNode::New { type_name: type_name.to_string() })
}

// ============================================================================
// Features and classes
// ============================================================================

pub fn attr(name: &str, type_decl: &str, init: Option<ExprDoc>) -> FeatureDoc {
    FeatureDoc::Attribute {
        name: name.to_string(),
        type_decl: type_decl.to_string(),
        init,
        line: 1,
    }
}

pub fn method(name: &str, formals: &[(&str, &str)], return_type: &str, body: ExprDoc) -> FeatureDoc {
    FeatureDoc::Method {
        name: name.to_string(),
        formals: formals
            .iter()
            .map(|&(name, type_decl)| FormalDoc {
                name: name.to_string(),
                type_decl: type_decl.to_string(),
                line: 1,
            })
            .collect(),
        return_type: return_type.to_string(),
        body,
        line: 1,
    }
}

pub fn class(name: &str, parent: &str, features: Vec<FeatureDoc>) -> ClassDoc {
    ClassDoc {
        name: name.to_string(),
        parent: parent.to_string(),
        filename: FILE.to_string(),
        line: 1,
        features,
    }
}

/// `class Main { main(): Object { 0 } }`
pub fn main_class() -> ClassDoc {
    class("Main", "Object", vec![method("main", &[], "Object", int(0))])
}

/// Main whose `main` body is `body`
pub fn main_with(body: ExprDoc) -> ClassDoc {
    class("Main", "Object", vec![method("main", &[], "Object", body)])
}

// ============================================================================
// Running the checker
// ============================================================================

/// Result of checking a program
pub struct Checked {
    /// The program after checking, decorated as far as checking got
    pub doc: ProgramDoc,
    pub failure: Option<SemantFailure>,
}

pub fn check(classes: Vec<ClassDoc>) -> Checked {
    let mut interner = Interner::new();
    let mut program = ProgramDoc { classes }.into_program(&mut interner);
    let failure = analyze(&mut program, &mut interner).err();
    Checked {
        doc: ProgramDoc::from_program(&program, &interner),
        failure,
    }
}

impl Checked {
    pub fn is_ok(&self) -> bool {
        self.failure.is_none()
    }

    /// Rendered diagnostics, `<file>:<line>: <message>`
    pub fn messages(&self) -> Vec<String> {
        match &self.failure {
            Some(failure) => failure.diagnostics().iter().map(|d| d.to_string()).collect(),
            None => Vec::new(),
        }
    }

    pub fn codes(&self) -> Vec<&'static str> {
        match &self.failure {
            Some(failure) => failure.diagnostics().iter().map(|d| d.code()).collect(),
            None => Vec::new(),
        }
    }

    /// Body of `class.method`
    pub fn body(&self, class: &str, method: &str) -> &ExprDoc {
        self.doc
            .classes
            .iter()
            .filter(|c| c.name == class)
            .flat_map(|c| c.features.iter())
            .find_map(|f| match f {
                FeatureDoc::Method { name, body, .. } if name == method => Some(body),
                _ => None,
            })
            .unwrap_or_else(|| panic!("no method {}.{}", class, method))
    }

    /// Body of `Main.main`
    pub fn main_body(&self) -> &ExprDoc {
        self.body("Main", "main")
    }
}

/// Inferred type of a node, `"<none>"` if undecorated
pub fn ty(e: &ExprDoc) -> &str {
    e.ty.as_deref().unwrap_or("<none>")
}

/// Direct sub-expressions of a node
pub fn children(e: &ExprDoc) -> Vec<&ExprDoc> {
    match &e.node {
        ExprNode::IntConst { .. }
        | ExprNode::StrConst { .. }
        | ExprNode::BoolConst { .. }
        | ExprNode::Object { .. }
        | ExprNode::New { .. } => Vec::new(),
        ExprNode::Assign { value, .. } => vec![&**value],
        ExprNode::StaticDispatch { receiver, args, .. } | ExprNode::Dispatch { receiver, args, .. } => {
            std::iter::once(&**receiver).chain(args.iter()).collect()
        }
        ExprNode::Cond { pred, then_branch, else_branch } => vec![&**pred, &**then_branch, &**else_branch],
        ExprNode::Loop { pred, body } => vec![&**pred, &**body],
        ExprNode::Block { body } => body.iter().collect(),
        ExprNode::Let { init, body, .. } => init.iter().map(|i| &**i).chain(std::iter::once(&**body)).collect(),
        ExprNode::Case { scrutinee, branches } => {
            std::iter::once(&**scrutinee).chain(branches.iter().map(|b| &b.body)).collect()
        }
        ExprNode::Binary { lhs, rhs, .. } => vec![&**lhs, &**rhs],
        ExprNode::Neg { operand } | ExprNode::Not { operand } | ExprNode::IsVoid { operand } => vec![&**operand],
    }
}

/// Every node in the tree carries a type
pub fn fully_decorated(e: &ExprDoc) -> bool {
    e.ty.is_some() && children(e).into_iter().all(fully_decorated)
}
