//! Abstract Syntax Tree (AST) consumed by the semantic checker.
//!
//! The tree is produced by an external parser. Every expression carries the
//! source line it came from and an output slot, `ty`, that the checker fills
//! with the statically inferred type.

use serde::{Deserialize, Serialize};

use crate::interner::Symbol;

/// Root node: every class of the compilation unit, in declaration order
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    pub classes: Vec<Class>,
}

impl Program {
    /// Create a new program
    pub fn new(classes: Vec<Class>) -> Self {
        Self { classes }
    }
}

/// Class declaration
#[derive(Debug, Clone, PartialEq)]
pub struct Class {
    pub name: Symbol,
    pub parent: Symbol,
    pub features: Vec<Feature>,
    /// Source file the class was declared in
    pub filename: Symbol,
    pub line: u32,
}

/// Class member: attributes and methods
#[derive(Debug, Clone, PartialEq)]
pub enum Feature {
    Attribute(Attribute),
    Method(Method),
}

/// Attribute declaration: `name : Type [<- init]`
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub name: Symbol,
    pub type_decl: Symbol,
    pub init: Option<Expression>,
    pub line: u32,
}

/// Method declaration: `name(formals) : ReturnType { body }`
#[derive(Debug, Clone, PartialEq)]
pub struct Method {
    pub name: Symbol,
    pub formals: Vec<Formal>,
    pub return_type: Symbol,
    pub body: Expression,
    pub line: u32,
}

/// Method parameter
#[derive(Debug, Clone, PartialEq)]
pub struct Formal {
    pub name: Symbol,
    pub type_decl: Symbol,
    pub line: u32,
}

/// Expression node with its source line and inferred type slot
#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    pub kind: ExprKind,
    pub line: u32,
    /// Written by the checker; `None` until the node has been checked
    pub ty: Option<Symbol>,
}

impl Expression {
    /// Create an undecorated expression
    pub fn new(kind: ExprKind, line: u32) -> Self {
        Self { kind, line, ty: None }
    }
}

/// Binary operators, serialized as their source spelling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryOp {
    #[serde(rename = "+")]
    Add,
    #[serde(rename = "-")]
    Sub,
    #[serde(rename = "*")]
    Mul,
    #[serde(rename = "/")]
    Div,
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = "<=")]
    Le,
    #[serde(rename = "=")]
    Eq,
}

impl BinaryOp {
    /// Source spelling of the operator
    pub fn as_str(&self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Eq => "=",
        }
    }

    /// `+ - * /`
    pub fn is_arithmetic(&self) -> bool {
        matches!(self, BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div)
    }
}

/// One `name : Type => body` arm of a case expression
#[derive(Debug, Clone, PartialEq)]
pub struct CaseBranch {
    pub name: Symbol,
    pub type_decl: Symbol,
    pub body: Expression,
    pub line: u32,
}

/// Expression forms
#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    /// Integer literal
    IntConst(i64),
    /// String literal
    StrConst(String),
    /// `true` / `false`
    BoolConst(bool),
    /// Identifier reference (including `self`)
    Object(Symbol),
    /// `name <- value`
    Assign {
        name: Symbol,
        value: Box<Expression>,
    },
    /// `receiver@Type.method(args)`
    StaticDispatch {
        receiver: Box<Expression>,
        type_name: Symbol,
        method: Symbol,
        args: Vec<Expression>,
    },
    /// `receiver.method(args)`; an implicit receiver is `self`
    Dispatch {
        receiver: Box<Expression>,
        method: Symbol,
        args: Vec<Expression>,
    },
    /// `if pred then a else b fi`
    Cond {
        pred: Box<Expression>,
        then_branch: Box<Expression>,
        else_branch: Box<Expression>,
    },
    /// `while pred loop body pool`
    Loop {
        pred: Box<Expression>,
        body: Box<Expression>,
    },
    /// `{ e1; e2; ... }`
    Block(Vec<Expression>),
    /// `let name : Type [<- init] in body`
    Let {
        name: Symbol,
        type_decl: Symbol,
        init: Option<Box<Expression>>,
        body: Box<Expression>,
    },
    /// `case scrutinee of branches esac`
    Case {
        scrutinee: Box<Expression>,
        branches: Vec<CaseBranch>,
    },
    Binary {
        op: BinaryOp,
        lhs: Box<Expression>,
        rhs: Box<Expression>,
    },
    /// Integer complement `~e`
    Neg(Box<Expression>),
    /// Boolean negation `not e`
    Not(Box<Expression>),
    /// `isvoid e`
    IsVoid(Box<Expression>),
    /// `new Type`
    New(Symbol),
}
