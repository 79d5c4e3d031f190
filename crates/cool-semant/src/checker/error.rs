//! Error types for hierarchy validation and type checking
//!
//! Names inside the errors are already resolved to text so that an error can
//! be rendered without access to the interner.

use thiserror::Error;

/// Structural errors found while building the class hierarchy.
///
/// The first one aborts hierarchy construction.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HierarchyError {
    /// Two classes with the same name (including redefining a basic class)
    #[error("Redefinition of class {name}.")]
    DuplicateClass {
        /// Class name
        name: String,
    },

    /// A user class named SELF_TYPE
    #[error("Redefinition of basic class {name}.")]
    IllegalRedefinition {
        /// Class name
        name: String,
    },

    /// No class named Main in the program
    #[error("Class Main is not defined.")]
    MissingMain,

    /// Parent class does not exist
    #[error("Class {class} inherits from an undefined class {parent}.")]
    UndefinedParent {
        /// Inheriting class
        class: String,
        /// Missing parent
        parent: String,
    },

    /// Parent is Int, Bool, String or SELF_TYPE
    #[error("Class {class} cannot inherit class {parent}.")]
    IllegalInheritance {
        /// Inheriting class
        class: String,
        /// Sealed parent
        parent: String,
    },

    /// The parent chain loops back on itself
    #[error("Class {class}, or an ancestor of {class}, is involved in an inheritance cycle.")]
    InheritanceCycle {
        /// Class whose parent walk revisited a class
        class: String,
    },
}

impl HierarchyError {
    /// Stable error code
    pub fn code(&self) -> &'static str {
        match self {
            HierarchyError::DuplicateClass { .. } => "E1001",
            HierarchyError::IllegalRedefinition { .. } => "E1002",
            HierarchyError::MissingMain => "E1003",
            HierarchyError::UndefinedParent { .. } => "E1004",
            HierarchyError::IllegalInheritance { .. } => "E1005",
            HierarchyError::InheritanceCycle { .. } => "E1006",
        }
    }
}

/// Errors found while checking features and expressions.
///
/// All of these are recoverable: the checker records them and continues
/// with a fallback type.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CheckError {
    // ========================================================================
    // Class body
    // ========================================================================

    /// Attribute name already bound in this class or an ancestor
    #[error("Attribute {name} is already defined either in the same class or in a superclass.")]
    DuplicateAttribute {
        /// Attribute name
        name: String,
    },

    /// Attribute named `self`
    #[error("'self' cannot be the name of an attribute.")]
    SelfAsAttributeName,

    /// Method declared twice in one class
    #[error("Method {name} is multiply defined.")]
    DuplicateMethod {
        /// Method name
        name: String,
    },

    /// Class Main has no `main` method
    #[error("No 'main' method in class Main.")]
    MissingMainMethod,

    /// A declared type names no known class
    #[error("Class {ty} of {context} is undefined.")]
    UndefinedType {
        /// Where the type appeared (e.g. "attribute x")
        context: String,
        /// The unknown type name
        ty: String,
    },

    // ========================================================================
    // Methods and formals
    // ========================================================================

    /// Formal parameter named `self`
    #[error("'self' cannot be the name of a formal parameter.")]
    SelfAsFormalName,

    /// Formal parameter declared as SELF_TYPE
    #[error("Formal parameter {name} cannot have type SELF_TYPE.")]
    SelfTypeFormal {
        /// Parameter name
        name: String,
    },

    /// Two formals with the same name
    #[error("Formal parameter {name} is multiply defined.")]
    DuplicateFormal {
        /// Parameter name
        name: String,
    },

    /// Formal declared with an unknown class
    #[error("Class {ty} of formal parameter {name} is undefined.")]
    UndefinedFormalType {
        /// Parameter name
        name: String,
        /// Unknown type
        ty: String,
    },

    /// Overriding method changes a parameter type
    #[error("In redefined method {method}, parameter type {actual} is different from original type {original}.")]
    OverrideFormalMismatch {
        /// Method name
        method: String,
        /// Type in the overriding method
        actual: String,
        /// Type in the overridden method
        original: String,
    },

    /// Overriding method changes the parameter count
    #[error("Incompatible number of formal parameters in redefined method {method}.")]
    OverrideArityMismatch {
        /// Method name
        method: String,
    },

    /// Body type does not conform to the declared return type
    #[error("Inferred return type {actual} of method {method} does not conform to declared return type {expected}.")]
    ReturnTypeMismatch {
        /// Method name
        method: String,
        /// Inferred body type
        actual: String,
        /// Declared return type
        expected: String,
    },

    // ========================================================================
    // Expressions
    // ========================================================================

    /// Identifier not bound in any enclosing scope
    #[error("Undeclared identifier {name}.")]
    UndeclaredIdentifier {
        /// Identifier
        name: String,
    },

    /// `self <- e`
    #[error("Cannot assign to 'self'.")]
    SelfAssignment,

    /// Assignment target not bound
    #[error("Assignment to undeclared variable {name}.")]
    AssignUndeclared {
        /// Target name
        name: String,
    },

    /// Assigned value does not conform to the target's declared type
    #[error("Type {actual} of assigned expression does not conform to declared type {expected} of identifier {name}.")]
    TypeMismatch {
        /// Target name
        name: String,
        /// Value type
        actual: String,
        /// Declared type
        expected: String,
    },

    /// `new` with an unknown class
    #[error("'new' used with undefined class {name}.")]
    UndefinedClassInNew {
        /// Class name
        name: String,
    },

    /// `e@T.m()` where e does not conform to T
    #[error("Expression type {actual} does not conform to declared static dispatch type {expected}.")]
    StaticDispatchNonConforming {
        /// Receiver type
        actual: String,
        /// Ascribed type
        expected: String,
    },

    /// No method with this name on the receiver's class or its ancestors
    #[error("Dispatch to undefined method {name}.")]
    UndefinedMethod {
        /// Method name
        name: String,
    },

    /// Argument does not conform to the formal's type
    #[error("In call of method {method}, type {actual} of parameter {param} does not conform to declared type {expected}.")]
    ArgTypeMismatch {
        /// Method name
        method: String,
        /// Formal name
        param: String,
        /// Argument type
        actual: String,
        /// Formal type
        expected: String,
    },

    /// Argument count differs from the formal count
    #[error("Method {method} called with wrong number of arguments: expected {expected}, got {actual}.")]
    ArityMismatch {
        /// Method name
        method: String,
        /// Declared formal count
        expected: usize,
        /// Supplied argument count
        actual: usize,
    },

    /// `if`/`while` predicate is not Bool
    #[error("Predicate of '{construct}' does not have type Bool.")]
    NonBooleanPredicate {
        /// "if" or "while"
        construct: &'static str,
    },

    /// Two case branches with the same declared type
    #[error("Duplicate branch {ty} in case statement.")]
    DuplicateCaseBranch {
        /// Repeated type
        ty: String,
    },

    /// `let self : T in ...`
    #[error("'self' cannot be bound in a 'let' expression.")]
    SelfBoundInLet,

    /// `case e of self : T => ...`
    #[error("'self' cannot be bound in a 'case' branch.")]
    SelfBoundInCase,

    /// Initializer does not conform to the declared type (let or attribute)
    #[error("Inferred type {actual} of initialization of {name} does not conform to declared type {expected}.")]
    InitTypeMismatch {
        /// Bound name
        name: String,
        /// Initializer type
        actual: String,
        /// Declared type
        expected: String,
    },

    /// Arithmetic or comparison on non-Int operands
    #[error("Non-Int arguments: {left} {op} {right}")]
    NonIntegerOperand {
        /// Operator spelling
        op: &'static str,
        /// Left operand type
        left: String,
        /// Right operand type
        right: String,
    },

    /// `~e` on a non-Int
    #[error("Argument of '~' has type {actual} instead of Int.")]
    NonIntegerComplement {
        /// Operand type
        actual: String,
    },

    /// `=` between a basic type and a different type
    #[error("Illegal comparison with a basic type: {left} = {right}")]
    IllegalPrimitiveComparison {
        /// Left operand type
        left: String,
        /// Right operand type
        right: String,
    },

    /// `not e` on a non-Bool
    #[error("Argument of 'not' has type {actual} instead of Bool.")]
    NonBooleanOperand {
        /// Operand type
        actual: String,
    },
}

impl CheckError {
    /// Stable error code
    pub fn code(&self) -> &'static str {
        use CheckError::*;

        match self {
            DuplicateAttribute { .. } => "E2001",
            SelfAsAttributeName => "E2002",
            DuplicateMethod { .. } => "E2003",
            MissingMainMethod => "E2004",
            UndefinedType { .. } => "E2005",
            SelfAsFormalName => "E2006",
            SelfTypeFormal { .. } => "E2007",
            DuplicateFormal { .. } => "E2008",
            UndefinedFormalType { .. } => "E2009",
            OverrideFormalMismatch { .. } => "E2010",
            OverrideArityMismatch { .. } => "E2011",
            ReturnTypeMismatch { .. } => "E2012",
            UndeclaredIdentifier { .. } => "E2013",
            SelfAssignment => "E2014",
            AssignUndeclared { .. } => "E2015",
            TypeMismatch { .. } => "E2016",
            UndefinedClassInNew { .. } => "E2017",
            StaticDispatchNonConforming { .. } => "E2018",
            UndefinedMethod { .. } => "E2019",
            ArgTypeMismatch { .. } => "E2020",
            ArityMismatch { .. } => "E2021",
            NonBooleanPredicate { .. } => "E2022",
            DuplicateCaseBranch { .. } => "E2023",
            SelfBoundInLet => "E2024",
            SelfBoundInCase => "E2025",
            InitTypeMismatch { .. } => "E2026",
            NonIntegerOperand { .. } => "E2027",
            NonIntegerComplement { .. } => "E2028",
            IllegalPrimitiveComparison { .. } => "E2029",
            NonBooleanOperand { .. } => "E2030",
        }
    }
}

/// Any semantic error
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SemantError {
    #[error(transparent)]
    Hierarchy(#[from] HierarchyError),

    #[error(transparent)]
    Check(#[from] CheckError),
}

impl SemantError {
    /// Stable error code
    pub fn code(&self) -> &'static str {
        match self {
            SemantError::Hierarchy(err) => err.code(),
            SemantError::Check(err) => err.code(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hierarchy_messages() {
        let err = HierarchyError::DuplicateClass { name: "A".to_string() };
        assert_eq!(err.to_string(), "Redefinition of class A.");

        let err = HierarchyError::IllegalInheritance {
            class: "A".to_string(),
            parent: "Int".to_string(),
        };
        assert_eq!(err.to_string(), "Class A cannot inherit class Int.");

        assert_eq!(HierarchyError::MissingMain.to_string(), "Class Main is not defined.");
    }

    #[test]
    fn test_check_messages() {
        let err = CheckError::NonIntegerOperand {
            op: "+",
            left: "Int".to_string(),
            right: "String".to_string(),
        };
        assert_eq!(err.to_string(), "Non-Int arguments: Int + String");

        let err = CheckError::ArityMismatch {
            method: "f".to_string(),
            expected: 2,
            actual: 3,
        };
        assert!(err.to_string().contains("expected 2, got 3"));
    }

    #[test]
    fn test_codes_are_phase_prefixed() {
        let hierarchy: SemantError = HierarchyError::MissingMain.into();
        let check: SemantError = CheckError::SelfAssignment.into();
        assert!(hierarchy.code().starts_with("E1"));
        assert!(check.code().starts_with("E2"));
        assert_eq!(hierarchy.to_string(), "Class Main is not defined.");
    }
}
