//! Type checker
//!
//! Walks every feature and expression of a class, applies the typing rule
//! for each form, and writes the inferred type into the node's `ty` slot.
//! Errors are recorded in the shared `Diagnostics` sink and replaced by a
//! fallback type so checking always continues to the end of the class.

use rustc_hash::FxHashSet;

use super::classes::ClassTable;
use super::diagnostic::Diagnostics;
use super::error::CheckError;
use super::methods::{MethodEnv, MethodSig};
use super::names::WellKnown;
use super::subtyping::SubtypingContext;
use super::symbols::TypeEnv;
use crate::ast::{Attribute, BinaryOp, CaseBranch, Class, ExprKind, Expression, Feature, Method};
use crate::interner::{Interner, Symbol};

/// Type checker
///
/// Holds the read-only tables shared by all classes. Per-class state is the
/// class being checked and its source file; the type environment is created
/// fresh for each class and threaded through the walk.
pub struct TypeChecker<'a> {
    classes: &'a ClassTable,
    methods: &'a MethodEnv,
    interner: &'a Interner,
    diagnostics: &'a mut Diagnostics,
    names: WellKnown,

    /// Class whose features are being checked
    current_class: Symbol,

    /// Source file of the current class, for error locations
    file: &'a str,
}

impl<'a> TypeChecker<'a> {
    /// Create a new type checker
    pub fn new(
        classes: &'a ClassTable,
        methods: &'a MethodEnv,
        interner: &'a Interner,
        diagnostics: &'a mut Diagnostics,
    ) -> Self {
        let names = *classes.names();
        TypeChecker {
            classes,
            methods,
            interner,
            diagnostics,
            names,
            current_class: names.object,
            file: "",
        }
    }

    /// Resolve a Symbol to a String
    #[inline]
    fn resolve(&self, sym: Symbol) -> String {
        self.interner.resolve(sym).to_string()
    }

    fn error(&mut self, line: u32, error: CheckError) {
        self.diagnostics.record(self.file, line, error);
    }

    fn subtyping(&self) -> SubtypingContext<'a> {
        SubtypingContext::new(self.classes, self.current_class)
    }

    fn is_subtype(&self, sub: Symbol, sup: Symbol) -> bool {
        self.subtyping().is_subtype(sub, sup)
    }

    fn join(&self, a: Symbol, b: Symbol) -> Symbol {
        self.subtyping().join(a, b)
    }

    // ========================================================================
    // Classes and features
    // ========================================================================

    /// Check every feature of `class` and decorate its expressions
    pub fn check_class(&mut self, class: &mut Class) {
        self.current_class = class.name;
        self.file = self.interner.resolve(class.filename);
        let _span = tracing::debug_span!("check_class", class = self.interner.resolve(class.name)).entered();
        let errors_before = self.diagnostics.error_count();

        let mut env = TypeEnv::new();
        self.bind_attributes(&mut env);
        env.bind(self.names.self_, self.names.self_type);

        if class.name == self.names.main_class
            && self
                .methods
                .resolve(self.classes, class.name, self.names.main_method)
                .is_none()
        {
            self.error(class.line, CheckError::MissingMainMethod);
        }

        for (position, feature) in class.features.iter_mut().enumerate() {
            match feature {
                Feature::Attribute(attr) => self.check_attribute(&mut env, attr),
                Feature::Method(method) => self.check_method(&mut env, method, position),
            }
        }

        tracing::debug!(
            errors = self.diagnostics.error_count() - errors_before,
            "class checked"
        );
    }

    /// Bind inherited attributes root-first, then the class's own.
    ///
    /// The first binding of a name wins. A collision is reported only when
    /// the later declaration belongs to the current class; collisions inside
    /// an ancestor were already reported while checking that ancestor. An
    /// attribute of undefined type is bound as Object; `check_attribute`
    /// reports the type.
    fn bind_attributes(&mut self, env: &mut TypeEnv) {
        let classes = self.classes;
        let chain: Vec<_> = classes.ancestors(self.current_class).collect();

        for info in chain.into_iter().rev() {
            for attr in &info.attributes {
                if attr.name == self.names.self_ {
                    continue;
                }
                if env.lookup(attr.name).is_some() {
                    if info.name == self.current_class {
                        let name = self.resolve(attr.name);
                        self.error(attr.line, CheckError::DuplicateAttribute { name });
                    }
                    continue;
                }
                let ty = if classes.is_declared_type(attr.type_decl) {
                    attr.type_decl
                } else {
                    self.names.object
                };
                env.bind(attr.name, ty);
            }
        }
    }

    fn check_attribute(&mut self, env: &mut TypeEnv, attr: &mut Attribute) {
        if attr.name == self.names.self_ {
            self.error(attr.line, CheckError::SelfAsAttributeName);
            if let Some(init) = attr.init.as_mut() {
                self.check_expr(env, init);
            }
            return;
        }

        let known = self.classes.is_declared_type(attr.type_decl);
        if !known {
            self.error(
                attr.line,
                CheckError::UndefinedType {
                    context: format!("attribute {}", self.resolve(attr.name)),
                    ty: self.resolve(attr.type_decl),
                },
            );
        }

        let Some(init) = attr.init.as_mut() else {
            return;
        };
        let init_ty = self.check_expr(env, init);

        if known && !self.is_subtype(init_ty, attr.type_decl) {
            self.error(
                attr.line,
                CheckError::InitTypeMismatch {
                    name: self.resolve(attr.name),
                    actual: self.resolve(init_ty),
                    expected: self.resolve(attr.type_decl),
                },
            );
        }
    }

    fn check_method(&mut self, env: &mut TypeEnv, method: &mut Method, position: usize) {
        let methods = self.methods;
        let classes = self.classes;
        let names = self.names;

        let mut scope = env.enter_scope();
        scope.bind(names.self_, names.self_type);

        // The method environment holds the first declaration of each name
        if let Some(first) = methods.declared(self.current_class, method.name) {
            if first.position != position {
                let name = self.resolve(method.name);
                self.error(method.line, CheckError::DuplicateMethod { name });
            }
        }

        let overridden: Option<&MethodSig> = classes
            .parent(self.current_class)
            .and_then(|parent| methods.resolve(classes, parent, method.name));

        let mut seen = FxHashSet::default();
        for (i, formal) in method.formals.iter().enumerate() {
            if formal.name == names.self_ {
                self.error(formal.line, CheckError::SelfAsFormalName);
            } else {
                let mut bound = formal.type_decl;
                if formal.type_decl == names.self_type {
                    let name = self.resolve(formal.name);
                    self.error(formal.line, CheckError::SelfTypeFormal { name });
                } else if !classes.contains(formal.type_decl) {
                    self.error(
                        formal.line,
                        CheckError::UndefinedFormalType {
                            name: self.resolve(formal.name),
                            ty: self.resolve(formal.type_decl),
                        },
                    );
                    bound = names.object;
                }

                if !seen.insert(formal.name) {
                    let name = self.resolve(formal.name);
                    self.error(formal.line, CheckError::DuplicateFormal { name });
                }
                scope.bind(formal.name, bound);
            }

            if let Some(original) = overridden.and_then(|sig| sig.formals.get(i)) {
                if original.type_decl != formal.type_decl {
                    self.error(
                        formal.line,
                        CheckError::OverrideFormalMismatch {
                            method: self.resolve(method.name),
                            actual: self.resolve(formal.type_decl),
                            original: self.resolve(original.type_decl),
                        },
                    );
                }
            }
        }

        if let Some(original) = overridden {
            if original.arity() != method.formals.len() {
                let name = self.resolve(method.name);
                self.error(method.line, CheckError::OverrideArityMismatch { method: name });
            }
        }

        let return_known = classes.is_declared_type(method.return_type);
        if !return_known {
            self.error(
                method.line,
                CheckError::UndefinedType {
                    context: format!("return type of method {}", self.resolve(method.name)),
                    ty: self.resolve(method.return_type),
                },
            );
        }

        let body_ty = self.check_expr(&mut scope, &mut method.body);
        drop(scope);

        if return_known && !self.is_subtype(body_ty, method.return_type) {
            self.error(
                method.line,
                CheckError::ReturnTypeMismatch {
                    method: self.resolve(method.name),
                    actual: self.resolve(body_ty),
                    expected: self.resolve(method.return_type),
                },
            );
        }
    }

    // ========================================================================
    // Expressions
    // ========================================================================

    /// Check an expression, record its type in `expr.ty` and return it
    pub fn check_expr(&mut self, env: &mut TypeEnv, expr: &mut Expression) -> Symbol {
        let line = expr.line;
        let names = self.names;

        let ty = match &mut expr.kind {
            ExprKind::IntConst(_) => names.int,
            ExprKind::StrConst(_) => names.string,
            ExprKind::BoolConst(_) => names.bool_,
            ExprKind::Object(name) => self.check_identifier(env, *name, line),
            ExprKind::Assign { name, value } => self.check_assign(env, *name, value, line),
            ExprKind::StaticDispatch {
                receiver,
                type_name,
                method,
                args,
            } => self.check_static_dispatch(env, receiver, *type_name, *method, args, line),
            ExprKind::Dispatch {
                receiver,
                method,
                args,
            } => {
                let receiver_ty = self.check_expr(env, receiver);
                self.check_call(env, receiver_ty, receiver_ty, *method, args, line)
            }
            ExprKind::Cond {
                pred,
                then_branch,
                else_branch,
            } => {
                let pred_ty = self.check_expr(env, pred);
                let then_ty = self.check_expr(env, then_branch);
                let else_ty = self.check_expr(env, else_branch);
                if !self.is_subtype(pred_ty, names.bool_) {
                    self.error(line, CheckError::NonBooleanPredicate { construct: "if" });
                }
                self.join(then_ty, else_ty)
            }
            ExprKind::Loop { pred, body } => {
                let pred_ty = self.check_expr(env, pred);
                if !self.is_subtype(pred_ty, names.bool_) {
                    self.error(line, CheckError::NonBooleanPredicate { construct: "while" });
                }
                self.check_expr(env, body);
                names.object
            }
            ExprKind::Block(exprs) => {
                let mut ty = names.no_type;
                for e in exprs.iter_mut() {
                    ty = self.check_expr(env, e);
                }
                ty
            }
            ExprKind::Let {
                name,
                type_decl,
                init,
                body,
            } => self.check_let(env, *name, *type_decl, init.as_deref_mut(), body, line),
            ExprKind::Case {
                scrutinee,
                branches,
            } => {
                self.check_expr(env, scrutinee);
                self.check_case(env, branches)
            }
            ExprKind::Binary { op, lhs, rhs } => self.check_binary(env, *op, lhs, rhs, line),
            ExprKind::Neg(operand) => {
                let operand_ty = self.check_expr(env, operand);
                if self.is_subtype(operand_ty, names.int) {
                    names.int
                } else {
                    let actual = self.resolve(operand_ty);
                    self.error(line, CheckError::NonIntegerComplement { actual });
                    names.no_type
                }
            }
            ExprKind::Not(operand) => {
                let operand_ty = self.check_expr(env, operand);
                if !self.is_subtype(operand_ty, names.bool_) {
                    let actual = self.resolve(operand_ty);
                    self.error(line, CheckError::NonBooleanOperand { actual });
                }
                names.bool_
            }
            ExprKind::IsVoid(operand) => {
                self.check_expr(env, operand);
                names.bool_
            }
            ExprKind::New(type_name) => self.check_new(*type_name, line),
        };

        expr.ty = Some(ty);
        ty
    }

    fn check_identifier(&mut self, env: &TypeEnv, name: Symbol, line: u32) -> Symbol {
        match env.lookup(name) {
            Some(ty) => ty,
            None => {
                let name = self.resolve(name);
                self.error(line, CheckError::UndeclaredIdentifier { name });
                self.names.object
            }
        }
    }

    fn check_assign(&mut self, env: &mut TypeEnv, name: Symbol, value: &mut Expression, line: u32) -> Symbol {
        let value_ty = self.check_expr(env, value);

        if name == self.names.self_ {
            self.error(line, CheckError::SelfAssignment);
            return self.names.object;
        }

        let Some(declared) = env.lookup(name) else {
            let name = self.resolve(name);
            self.error(line, CheckError::AssignUndeclared { name });
            return self.names.object;
        };

        if !self.is_subtype(value_ty, declared) {
            self.error(
                line,
                CheckError::TypeMismatch {
                    name: self.resolve(name),
                    actual: self.resolve(value_ty),
                    expected: self.resolve(declared),
                },
            );
            return self.names.object;
        }

        value_ty
    }

    fn check_new(&mut self, type_name: Symbol, line: u32) -> Symbol {
        if self.classes.is_declared_type(type_name) {
            type_name
        } else {
            let name = self.resolve(type_name);
            self.error(line, CheckError::UndefinedClassInNew { name });
            self.names.object
        }
    }

    fn check_static_dispatch(
        &mut self,
        env: &mut TypeEnv,
        receiver: &mut Expression,
        type_name: Symbol,
        method: Symbol,
        args: &mut [Expression],
        line: u32,
    ) -> Symbol {
        let receiver_ty = self.check_expr(env, receiver);

        if !self.classes.contains(type_name) {
            self.error(
                line,
                CheckError::UndefinedType {
                    context: "static dispatch".to_string(),
                    ty: self.resolve(type_name),
                },
            );
            for arg in args.iter_mut() {
                self.check_expr(env, arg);
            }
            return self.names.object;
        }

        if !self.is_subtype(receiver_ty, type_name) {
            self.error(
                line,
                CheckError::StaticDispatchNonConforming {
                    actual: self.resolve(self.subtyping().resolve_self_type(receiver_ty)),
                    expected: self.resolve(type_name),
                },
            );
        }

        self.check_call(env, type_name, receiver_ty, method, args, line)
    }

    /// Check arguments against the method found on `dispatch_ty`.
    ///
    /// A method returning SELF_TYPE yields the receiver's static type, so a
    /// chain of calls on `self` keeps SELF_TYPE. An undefined return type
    /// yields Object.
    fn check_call(
        &mut self,
        env: &mut TypeEnv,
        dispatch_ty: Symbol,
        receiver_ty: Symbol,
        method: Symbol,
        args: &mut [Expression],
        line: u32,
    ) -> Symbol {
        let arg_types: Vec<Symbol> = args.iter_mut().map(|arg| self.check_expr(env, arg)).collect();

        // Receiver already failed and was reported
        if dispatch_ty == self.names.no_type {
            return self.names.object;
        }

        let methods = self.methods;
        let lookup = self.subtyping().resolve_self_type(dispatch_ty);
        let Some(sig) = methods.resolve(self.classes, lookup, method) else {
            let name = self.resolve(method);
            self.error(line, CheckError::UndefinedMethod { name });
            return self.names.object;
        };

        for (formal, &actual) in sig.formals.iter().zip(&arg_types) {
            if !self.is_subtype(actual, formal.type_decl) {
                self.error(
                    line,
                    CheckError::ArgTypeMismatch {
                        method: self.resolve(method),
                        param: self.resolve(formal.name),
                        actual: self.resolve(actual),
                        expected: self.resolve(formal.type_decl),
                    },
                );
            }
        }

        if sig.arity() != arg_types.len() {
            self.error(
                line,
                CheckError::ArityMismatch {
                    method: self.resolve(method),
                    expected: sig.arity(),
                    actual: arg_types.len(),
                },
            );
        }

        if sig.return_type == self.names.self_type {
            receiver_ty
        } else if self.classes.is_declared_type(sig.return_type) {
            sig.return_type
        } else {
            // Reported at the method declaration
            self.names.object
        }
    }

    fn check_let(
        &mut self,
        env: &mut TypeEnv,
        name: Symbol,
        type_decl: Symbol,
        init: Option<&mut Expression>,
        body: &mut Expression,
        line: u32,
    ) -> Symbol {
        // The initializer does not see the new binding
        let init_ty = init.map(|init| self.check_expr(env, init));

        let known = self.classes.is_declared_type(type_decl);
        let bound = if known {
            type_decl
        } else {
            self.error(
                line,
                CheckError::UndefinedType {
                    context: format!("let variable {}", self.resolve(name)),
                    ty: self.resolve(type_decl),
                },
            );
            self.names.object
        };

        if let Some(init_ty) = init_ty {
            if known && !self.is_subtype(init_ty, type_decl) {
                self.error(
                    line,
                    CheckError::InitTypeMismatch {
                        name: self.resolve(name),
                        actual: self.resolve(init_ty),
                        expected: self.resolve(type_decl),
                    },
                );
            }
        }

        let mut scope = env.enter_scope();
        if name == self.names.self_ {
            self.error(line, CheckError::SelfBoundInLet);
        } else {
            scope.bind(name, bound);
        }
        self.check_expr(&mut scope, body)
    }

    /// Fold branch types with join.
    ///
    /// After a duplicate branch type the remaining branches are still checked
    /// but no longer folded, and the case is typed Object.
    fn check_case(&mut self, env: &mut TypeEnv, branches: &mut [CaseBranch]) -> Symbol {
        let mut seen = FxHashSet::default();
        let mut folded: Option<Symbol> = None;
        let mut duplicate = false;

        for branch in branches.iter_mut() {
            if !seen.insert(branch.type_decl) {
                let ty = self.resolve(branch.type_decl);
                self.error(branch.line, CheckError::DuplicateCaseBranch { ty });
                duplicate = true;
            }

            let bound = if self.classes.contains(branch.type_decl) {
                branch.type_decl
            } else {
                self.error(
                    branch.line,
                    CheckError::UndefinedType {
                        context: format!("case branch {}", self.resolve(branch.name)),
                        ty: self.resolve(branch.type_decl),
                    },
                );
                self.names.object
            };

            let mut scope = env.enter_scope();
            if branch.name == self.names.self_ {
                self.error(branch.line, CheckError::SelfBoundInCase);
            } else {
                scope.bind(branch.name, bound);
            }
            let branch_ty = self.check_expr(&mut scope, &mut branch.body);
            drop(scope);

            if !duplicate {
                folded = Some(match folded {
                    Some(acc) => self.join(acc, branch_ty),
                    None => branch_ty,
                });
            }
        }

        if duplicate {
            self.names.object
        } else {
            folded.unwrap_or(self.names.no_type)
        }
    }

    fn check_binary(
        &mut self,
        env: &mut TypeEnv,
        op: BinaryOp,
        lhs: &mut Expression,
        rhs: &mut Expression,
        line: u32,
    ) -> Symbol {
        let names = self.names;
        let left = self.check_expr(env, lhs);
        let right = self.check_expr(env, rhs);

        if op == BinaryOp::Eq {
            let primitive = names.is_primitive(left) || names.is_primitive(right);
            let settled = left == names.no_type || right == names.no_type;
            if primitive && !settled && left != right {
                self.error(
                    line,
                    CheckError::IllegalPrimitiveComparison {
                        left: self.resolve(left),
                        right: self.resolve(right),
                    },
                );
            }
            return names.bool_;
        }

        let ints = self.is_subtype(left, names.int) && self.is_subtype(right, names.int);
        if !ints {
            self.error(
                line,
                CheckError::NonIntegerOperand {
                    op: op.as_str(),
                    left: self.resolve(left),
                    right: self.resolve(right),
                },
            );
        }

        match (op.is_arithmetic(), ints) {
            (true, true) => names.int,
            (true, false) => names.no_type,
            (false, _) => names.bool_,
        }
    }
}
