//! JSON document form of the AST
//!
//! The parser hands the checker a `ProgramDoc`; names are plain strings and
//! every expression carries its source line. `into_program` interns the
//! names, and `from_program` writes a checked program back out with each
//! expression's `ty` filled in.

use serde::{Deserialize, Serialize};

use crate::ast::{
    Attribute, BinaryOp, CaseBranch, Class, ExprKind, Expression, Feature, Formal, Method, Program,
};
use crate::interner::Interner;

/// Whole compilation unit
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ProgramDoc {
    pub classes: Vec<ClassDoc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassDoc {
    pub name: String,
    pub parent: String,
    pub filename: String,
    pub line: u32,
    #[serde(default)]
    pub features: Vec<FeatureDoc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FeatureDoc {
    Attribute {
        name: String,
        type_decl: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        init: Option<ExprDoc>,
        line: u32,
    },
    Method {
        name: String,
        #[serde(default)]
        formals: Vec<FormalDoc>,
        return_type: String,
        body: ExprDoc,
        line: u32,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormalDoc {
    pub name: String,
    pub type_decl: String,
    pub line: u32,
}

/// Expression with its line and, once checked, its static type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExprDoc {
    pub line: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ty: Option<String>,
    pub node: ExprNode,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseBranchDoc {
    pub name: String,
    pub type_decl: String,
    pub body: ExprDoc,
    pub line: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "expr", rename_all = "snake_case")]
pub enum ExprNode {
    IntConst {
        value: i64,
    },
    StrConst {
        value: String,
    },
    BoolConst {
        value: bool,
    },
    Object {
        name: String,
    },
    Assign {
        name: String,
        value: Box<ExprDoc>,
    },
    StaticDispatch {
        receiver: Box<ExprDoc>,
        type_name: String,
        method: String,
        #[serde(default)]
        args: Vec<ExprDoc>,
    },
    Dispatch {
        receiver: Box<ExprDoc>,
        method: String,
        #[serde(default)]
        args: Vec<ExprDoc>,
    },
    Cond {
        pred: Box<ExprDoc>,
        then_branch: Box<ExprDoc>,
        else_branch: Box<ExprDoc>,
    },
    Loop {
        pred: Box<ExprDoc>,
        body: Box<ExprDoc>,
    },
    Block {
        body: Vec<ExprDoc>,
    },
    Let {
        name: String,
        type_decl: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        init: Option<Box<ExprDoc>>,
        body: Box<ExprDoc>,
    },
    Case {
        scrutinee: Box<ExprDoc>,
        branches: Vec<CaseBranchDoc>,
    },
    Binary {
        op: BinaryOp,
        lhs: Box<ExprDoc>,
        rhs: Box<ExprDoc>,
    },
    Neg {
        operand: Box<ExprDoc>,
    },
    Not {
        operand: Box<ExprDoc>,
    },
    IsVoid {
        operand: Box<ExprDoc>,
    },
    New {
        type_name: String,
    },
}

impl ProgramDoc {
    /// Parse a document from JSON text
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    /// Pretty-printed JSON
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Intern every name and build the checker's AST.
    ///
    /// Any `ty` present in the document is ignored; the checker recomputes it.
    pub fn into_program(self, interner: &mut Interner) -> Program {
        let classes = self
            .classes
            .into_iter()
            .map(|class| lower_class(class, interner))
            .collect();
        Program::new(classes)
    }

    /// Write `program` back out, including each expression's inferred type
    pub fn from_program(program: &Program, interner: &Interner) -> Self {
        ProgramDoc {
            classes: program
                .classes
                .iter()
                .map(|class| raise_class(class, interner))
                .collect(),
        }
    }
}

// ============================================================================
// Document -> AST
// ============================================================================

fn lower_class(class: ClassDoc, interner: &mut Interner) -> Class {
    Class {
        name: interner.intern(&class.name),
        parent: interner.intern(&class.parent),
        features: class
            .features
            .into_iter()
            .map(|feature| lower_feature(feature, interner))
            .collect(),
        filename: interner.intern(&class.filename),
        line: class.line,
    }
}

fn lower_feature(feature: FeatureDoc, interner: &mut Interner) -> Feature {
    match feature {
        FeatureDoc::Attribute {
            name,
            type_decl,
            init,
            line,
        } => Feature::Attribute(Attribute {
            name: interner.intern(&name),
            type_decl: interner.intern(&type_decl),
            init: init.map(|init| lower_expr(init, interner)),
            line,
        }),
        FeatureDoc::Method {
            name,
            formals,
            return_type,
            body,
            line,
        } => Feature::Method(Method {
            name: interner.intern(&name),
            formals: formals
                .into_iter()
                .map(|formal| Formal {
                    name: interner.intern(&formal.name),
                    type_decl: interner.intern(&formal.type_decl),
                    line: formal.line,
                })
                .collect(),
            return_type: interner.intern(&return_type),
            body: lower_expr(body, interner),
            line,
        }),
    }
}

fn lower_boxed(expr: Box<ExprDoc>, interner: &mut Interner) -> Box<Expression> {
    Box::new(lower_expr(*expr, interner))
}

fn lower_all(exprs: Vec<ExprDoc>, interner: &mut Interner) -> Vec<Expression> {
    exprs.into_iter().map(|e| lower_expr(e, interner)).collect()
}

fn lower_expr(expr: ExprDoc, interner: &mut Interner) -> Expression {
    let kind = match expr.node {
        ExprNode::IntConst { value } => ExprKind::IntConst(value),
        ExprNode::StrConst { value } => ExprKind::StrConst(value),
        ExprNode::BoolConst { value } => ExprKind::BoolConst(value),
        ExprNode::Object { name } => ExprKind::Object(interner.intern(&name)),
        ExprNode::Assign { name, value } => ExprKind::Assign {
            name: interner.intern(&name),
            value: lower_boxed(value, interner),
        },
        ExprNode::StaticDispatch {
            receiver,
            type_name,
            method,
            args,
        } => ExprKind::StaticDispatch {
            receiver: lower_boxed(receiver, interner),
            type_name: interner.intern(&type_name),
            method: interner.intern(&method),
            args: lower_all(args, interner),
        },
        ExprNode::Dispatch {
            receiver,
            method,
            args,
        } => ExprKind::Dispatch {
            receiver: lower_boxed(receiver, interner),
            method: interner.intern(&method),
            args: lower_all(args, interner),
        },
        ExprNode::Cond {
            pred,
            then_branch,
            else_branch,
        } => ExprKind::Cond {
            pred: lower_boxed(pred, interner),
            then_branch: lower_boxed(then_branch, interner),
            else_branch: lower_boxed(else_branch, interner),
        },
        ExprNode::Loop { pred, body } => ExprKind::Loop {
            pred: lower_boxed(pred, interner),
            body: lower_boxed(body, interner),
        },
        ExprNode::Block { body } => ExprKind::Block(lower_all(body, interner)),
        ExprNode::Let {
            name,
            type_decl,
            init,
            body,
        } => ExprKind::Let {
            name: interner.intern(&name),
            type_decl: interner.intern(&type_decl),
            init: init.map(|init| lower_boxed(init, interner)),
            body: lower_boxed(body, interner),
        },
        ExprNode::Case {
            scrutinee,
            branches,
        } => ExprKind::Case {
            scrutinee: lower_boxed(scrutinee, interner),
            branches: branches
                .into_iter()
                .map(|branch| CaseBranch {
                    name: interner.intern(&branch.name),
                    type_decl: interner.intern(&branch.type_decl),
                    body: lower_expr(branch.body, interner),
                    line: branch.line,
                })
                .collect(),
        },
        ExprNode::Binary { op, lhs, rhs } => ExprKind::Binary {
            op,
            lhs: lower_boxed(lhs, interner),
            rhs: lower_boxed(rhs, interner),
        },
        ExprNode::Neg { operand } => ExprKind::Neg(lower_boxed(operand, interner)),
        ExprNode::Not { operand } => ExprKind::Not(lower_boxed(operand, interner)),
        ExprNode::IsVoid { operand } => ExprKind::IsVoid(lower_boxed(operand, interner)),
        ExprNode::New { type_name } => ExprKind::New(interner.intern(&type_name)),
    };
    Expression::new(kind, expr.line)
}

// ============================================================================
// AST -> document
// ============================================================================

fn raise_class(class: &Class, interner: &Interner) -> ClassDoc {
    let text = |sym| interner.resolve(sym).to_string();
    ClassDoc {
        name: text(class.name),
        parent: text(class.parent),
        filename: text(class.filename),
        line: class.line,
        features: class
            .features
            .iter()
            .map(|feature| match feature {
                Feature::Attribute(attr) => FeatureDoc::Attribute {
                    name: text(attr.name),
                    type_decl: text(attr.type_decl),
                    init: attr.init.as_ref().map(|init| raise_expr(init, interner)),
                    line: attr.line,
                },
                Feature::Method(method) => FeatureDoc::Method {
                    name: text(method.name),
                    formals: method
                        .formals
                        .iter()
                        .map(|formal| FormalDoc {
                            name: text(formal.name),
                            type_decl: text(formal.type_decl),
                            line: formal.line,
                        })
                        .collect(),
                    return_type: text(method.return_type),
                    body: raise_expr(&method.body, interner),
                    line: method.line,
                },
            })
            .collect(),
    }
}

fn raise_boxed(expr: &Expression, interner: &Interner) -> Box<ExprDoc> {
    Box::new(raise_expr(expr, interner))
}

fn raise_all(exprs: &[Expression], interner: &Interner) -> Vec<ExprDoc> {
    exprs.iter().map(|e| raise_expr(e, interner)).collect()
}

fn raise_expr(expr: &Expression, interner: &Interner) -> ExprDoc {
    let text = |sym| interner.resolve(sym).to_string();

    let node = match &expr.kind {
        ExprKind::IntConst(value) => ExprNode::IntConst { value: *value },
        ExprKind::StrConst(value) => ExprNode::StrConst {
            value: value.clone(),
        },
        ExprKind::BoolConst(value) => ExprNode::BoolConst { value: *value },
        ExprKind::Object(name) => ExprNode::Object { name: text(*name) },
        ExprKind::Assign { name, value } => ExprNode::Assign {
            name: text(*name),
            value: raise_boxed(value, interner),
        },
        ExprKind::StaticDispatch {
            receiver,
            type_name,
            method,
            args,
        } => ExprNode::StaticDispatch {
            receiver: raise_boxed(receiver, interner),
            type_name: text(*type_name),
            method: text(*method),
            args: raise_all(args, interner),
        },
        ExprKind::Dispatch {
            receiver,
            method,
            args,
        } => ExprNode::Dispatch {
            receiver: raise_boxed(receiver, interner),
            method: text(*method),
            args: raise_all(args, interner),
        },
        ExprKind::Cond {
            pred,
            then_branch,
            else_branch,
        } => ExprNode::Cond {
            pred: raise_boxed(pred, interner),
            then_branch: raise_boxed(then_branch, interner),
            else_branch: raise_boxed(else_branch, interner),
        },
        ExprKind::Loop { pred, body } => ExprNode::Loop {
            pred: raise_boxed(pred, interner),
            body: raise_boxed(body, interner),
        },
        ExprKind::Block(body) => ExprNode::Block {
            body: raise_all(body, interner),
        },
        ExprKind::Let {
            name,
            type_decl,
            init,
            body,
        } => ExprNode::Let {
            name: text(*name),
            type_decl: text(*type_decl),
            init: init.as_deref().map(|init| raise_boxed(init, interner)),
            body: raise_boxed(body, interner),
        },
        ExprKind::Case {
            scrutinee,
            branches,
        } => ExprNode::Case {
            scrutinee: raise_boxed(scrutinee, interner),
            branches: branches
                .iter()
                .map(|branch| CaseBranchDoc {
                    name: text(branch.name),
                    type_decl: text(branch.type_decl),
                    body: raise_expr(&branch.body, interner),
                    line: branch.line,
                })
                .collect(),
        },
        ExprKind::Binary { op, lhs, rhs } => ExprNode::Binary {
            op: *op,
            lhs: raise_boxed(lhs, interner),
            rhs: raise_boxed(rhs, interner),
        },
        ExprKind::Neg(operand) => ExprNode::Neg {
            operand: raise_boxed(operand, interner),
        },
        ExprKind::Not(operand) => ExprNode::Not {
            operand: raise_boxed(operand, interner),
        },
        ExprKind::IsVoid(operand) => ExprNode::IsVoid {
            operand: raise_boxed(operand, interner),
        },
        ExprKind::New(type_name) => ExprNode::New {
            type_name: text(*type_name),
        },
    };

    ExprDoc {
        line: expr.line,
        ty: expr.ty.map(text),
        node,
    }
}
