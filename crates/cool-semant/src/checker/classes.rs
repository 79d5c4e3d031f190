//! Class hierarchy table
//!
//! Installs the basic classes, registers every user class and validates the
//! inheritance graph. Construction is fail-fast: the first structural error
//! is returned and nothing else is checked. A table that builds successfully
//! is a finite tree rooted at Object.

use rustc_hash::{FxHashMap, FxHashSet};

use super::builtins::basic_classes;
use super::diagnostic::Diagnostic;
use super::error::HierarchyError;
use super::methods::{FormalSig, MethodSig};
use super::names::WellKnown;
use crate::ast::{Class, Feature, Program};
use crate::interner::{Interner, Symbol};

/// Attribute signature
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeInfo {
    pub name: Symbol,
    pub type_decl: Symbol,
    pub line: u32,
}

/// Signatures of one class, detached from the AST bodies
#[derive(Debug, Clone, PartialEq)]
pub struct ClassInfo {
    pub name: Symbol,
    pub parent: Symbol,
    pub attributes: Vec<AttributeInfo>,
    /// Methods in declaration order (duplicates included)
    pub methods: Vec<MethodSig>,
    pub filename: Symbol,
    pub line: u32,
    /// One of the five basic classes
    pub builtin: bool,
}

impl ClassInfo {
    /// Extract the signatures of a user class
    pub fn from_ast(class: &Class) -> Self {
        let mut attributes = Vec::new();
        let mut methods = Vec::new();

        for (position, feature) in class.features.iter().enumerate() {
            match feature {
                Feature::Attribute(attr) => attributes.push(AttributeInfo {
                    name: attr.name,
                    type_decl: attr.type_decl,
                    line: attr.line,
                }),
                Feature::Method(method) => methods.push(MethodSig {
                    owner: class.name,
                    name: method.name,
                    formals: method
                        .formals
                        .iter()
                        .map(|f| FormalSig {
                            name: f.name,
                            type_decl: f.type_decl,
                            line: f.line,
                        })
                        .collect(),
                    return_type: method.return_type,
                    position,
                    line: method.line,
                }),
            }
        }

        ClassInfo {
            name: class.name,
            parent: class.parent,
            attributes,
            methods,
            filename: class.filename,
            line: class.line,
            builtin: false,
        }
    }
}

/// Validated inheritance graph, immutable once built
#[derive(Debug, Clone)]
pub struct ClassTable {
    classes: FxHashMap<Symbol, ClassInfo>,
    /// Basic classes first, then user classes in declaration order
    order: Vec<Symbol>,
    names: WellKnown,
}

impl ClassTable {
    /// Build and validate the hierarchy.
    ///
    /// Returns the first structural error as a diagnostic.
    #[tracing::instrument(skip_all, fields(classes = program.classes.len()))]
    pub fn build(program: &Program, names: WellKnown, interner: &Interner) -> Result<Self, Diagnostic> {
        let mut table = ClassTable {
            classes: FxHashMap::default(),
            order: Vec::new(),
            names,
        };

        for info in basic_classes(&names) {
            table.insert(info);
        }

        // Registration
        for class in &program.classes {
            let file = interner.resolve(class.filename);
            let name = interner.resolve(class.name).to_string();

            if table.classes.contains_key(&class.name) {
                return Err(Diagnostic::at(file, class.line, HierarchyError::DuplicateClass { name }));
            }
            if class.name == names.self_type {
                return Err(Diagnostic::at(file, class.line, HierarchyError::IllegalRedefinition { name }));
            }
            table.insert(ClassInfo::from_ast(class));
        }

        if !table.contains(names.main_class) {
            return Err(Diagnostic::global(HierarchyError::MissingMain));
        }

        // Parent chains
        for class in &program.classes {
            table.validate_ancestry(class.name, interner)?;
        }

        tracing::debug!(classes = table.order.len(), "class hierarchy validated");
        Ok(table)
    }

    fn insert(&mut self, info: ClassInfo) {
        self.order.push(info.name);
        self.classes.insert(info.name, info);
    }

    /// Walk from `start` to the root, rejecting undefined or sealed parents and cycles
    fn validate_ancestry(&self, start: Symbol, interner: &Interner) -> Result<(), Diagnostic> {
        let names = &self.names;
        let mut visited = FxHashSet::default();
        visited.insert(start);

        let mut current = match self.classes.get(&start) {
            Some(info) => info,
            None => return Ok(()),
        };

        while current.parent != names.object {
            let parent = current.parent;
            let located = |error: HierarchyError| {
                Diagnostic::at(interner.resolve(current.filename), current.line, error)
            };

            if parent == names.self_type || names.is_primitive(parent) {
                return Err(located(HierarchyError::IllegalInheritance {
                    class: interner.resolve(current.name).to_string(),
                    parent: interner.resolve(parent).to_string(),
                }));
            }

            let next = match self.classes.get(&parent) {
                Some(info) => info,
                None => {
                    return Err(located(HierarchyError::UndefinedParent {
                        class: interner.resolve(current.name).to_string(),
                        parent: interner.resolve(parent).to_string(),
                    }))
                }
            };

            if !visited.insert(parent) {
                return Err(located(HierarchyError::InheritanceCycle {
                    class: interner.resolve(start).to_string(),
                }));
            }

            current = next;
        }

        Ok(())
    }

    /// Pre-interned names shared with the rest of the checker
    pub fn names(&self) -> &WellKnown {
        &self.names
    }

    pub fn get(&self, name: Symbol) -> Option<&ClassInfo> {
        self.classes.get(&name)
    }

    pub fn contains(&self, name: Symbol) -> bool {
        self.classes.contains_key(&name)
    }

    /// Parent of `name`; `None` for Object and unknown classes
    pub fn parent(&self, name: Symbol) -> Option<Symbol> {
        self.get(name)
            .map(|info| info.parent)
            .filter(|parent| self.contains(*parent))
    }

    /// A declared type is usable if it names a class or is SELF_TYPE
    pub fn is_declared_type(&self, ty: Symbol) -> bool {
        ty == self.names.self_type || self.contains(ty)
    }

    /// `name` followed by each of its ancestors up to Object.
    ///
    /// Empty for names outside the hierarchy.
    pub fn ancestors(&self, name: Symbol) -> Ancestors<'_> {
        Ancestors {
            table: self,
            next: self.get(name),
        }
    }

    /// All classes, basic classes first
    pub fn iter(&self) -> impl Iterator<Item = &ClassInfo> {
        self.order.iter().filter_map(move |name| self.classes.get(name))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Iterator over a class and its ancestors
pub struct Ancestors<'a> {
    table: &'a ClassTable,
    next: Option<&'a ClassInfo>,
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = &'a ClassInfo;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = self.table.get(current.parent);
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixture {
        interner: Interner,
        names: WellKnown,
        classes: Vec<Class>,
    }

    impl Fixture {
        fn new() -> Self {
            let mut interner = Interner::new();
            let names = WellKnown::new(&mut interner);
            Fixture { interner, names, classes: Vec::new() }
        }

        fn class(&mut self, name: &str, parent: &str, line: u32) -> &mut Self {
            let class = Class {
                name: self.interner.intern(name),
                parent: self.interner.intern(parent),
                features: Vec::new(),
                filename: self.interner.intern("test.cl"),
                line,
            };
            self.classes.push(class);
            self
        }

        fn build(&self) -> Result<ClassTable, Diagnostic> {
            let program = Program::new(self.classes.clone());
            ClassTable::build(&program, self.names, &self.interner)
        }
    }

    fn hierarchy_error(result: Result<ClassTable, Diagnostic>) -> (Option<u32>, HierarchyError) {
        match result {
            Err(Diagnostic { line, error: crate::checker::SemantError::Hierarchy(err), .. }) => (line, err),
            other => panic!("expected hierarchy error, got {:?}", other.map(|t| t.len())),
        }
    }

    #[test]
    fn test_basic_classes_installed() {
        let mut fx = Fixture::new();
        fx.class("Main", "Object", 1);
        let table = fx.build().unwrap();

        assert_eq!(table.len(), 6);
        for name in ["Object", "IO", "Int", "Bool", "String", "Main"] {
            let sym = fx.interner.get(name).unwrap();
            assert!(table.contains(sym), "missing class {}", name);
        }
        assert_eq!(table.parent(fx.names.object), None);
        assert_eq!(table.parent(fx.names.io), Some(fx.names.object));
        assert!(table.get(fx.names.int).unwrap().builtin);
    }

    #[test]
    fn test_ancestors_walk_to_root() {
        let mut fx = Fixture::new();
        fx.class("Main", "Object", 1).class("B", "Main", 2).class("A", "B", 3);
        let table = fx.build().unwrap();

        let a = fx.interner.get("A").unwrap();
        let chain: Vec<&str> = table.ancestors(a).map(|c| fx.interner.resolve(c.name)).collect();
        assert_eq!(chain, vec!["A", "B", "Main", "Object"]);
    }

    #[test]
    fn test_ancestors_of_unknown_is_empty() {
        let mut fx = Fixture::new();
        fx.class("Main", "Object", 1);
        let table = fx.build().unwrap();
        let ghost = fx.interner.intern("Ghost");
        assert_eq!(table.ancestors(ghost).count(), 0);
    }

    #[test]
    fn test_duplicate_class() {
        let mut fx = Fixture::new();
        fx.class("Main", "Object", 1).class("A", "Object", 2).class("A", "Object", 5);
        let (line, err) = hierarchy_error(fx.build());
        assert_eq!(line, Some(5));
        assert_eq!(err, HierarchyError::DuplicateClass { name: "A".to_string() });
    }

    #[test]
    fn test_redefining_basic_class_is_duplicate() {
        let mut fx = Fixture::new();
        fx.class("Main", "Object", 1).class("Int", "Object", 2);
        let (_, err) = hierarchy_error(fx.build());
        assert_eq!(err, HierarchyError::DuplicateClass { name: "Int".to_string() });
    }

    #[test]
    fn test_self_type_class() {
        let mut fx = Fixture::new();
        fx.class("Main", "Object", 1).class("SELF_TYPE", "Object", 2);
        let (_, err) = hierarchy_error(fx.build());
        assert_eq!(err, HierarchyError::IllegalRedefinition { name: "SELF_TYPE".to_string() });
    }

    #[test]
    fn test_missing_main() {
        let mut fx = Fixture::new();
        fx.class("A", "Object", 1);
        let (line, err) = hierarchy_error(fx.build());
        assert_eq!(line, None);
        assert_eq!(err, HierarchyError::MissingMain);
    }

    #[test]
    fn test_undefined_parent() {
        let mut fx = Fixture::new();
        fx.class("Main", "Object", 1).class("A", "Missing", 4);
        let (line, err) = hierarchy_error(fx.build());
        assert_eq!(line, Some(4));
        assert_eq!(
            err,
            HierarchyError::UndefinedParent { class: "A".to_string(), parent: "Missing".to_string() }
        );
    }

    #[test]
    fn test_sealed_parents() {
        for sealed in ["Int", "Bool", "String", "SELF_TYPE"] {
            let mut fx = Fixture::new();
            fx.class("Main", "Object", 1).class("A", sealed, 2);
            let (_, err) = hierarchy_error(fx.build());
            assert_eq!(
                err,
                HierarchyError::IllegalInheritance { class: "A".to_string(), parent: sealed.to_string() },
                "inheriting {} must be rejected",
                sealed
            );
        }
    }

    #[test]
    fn test_sealed_parent_deep_in_chain() {
        let mut fx = Fixture::new();
        fx.class("Main", "A", 1).class("A", "B", 2).class("B", "String", 3);
        let (line, err) = hierarchy_error(fx.build());
        assert_eq!(line, Some(3));
        assert_eq!(
            err,
            HierarchyError::IllegalInheritance { class: "B".to_string(), parent: "String".to_string() }
        );
    }

    #[test]
    fn test_direct_cycle() {
        let mut fx = Fixture::new();
        fx.class("Main", "Object", 1).class("A", "A", 2);
        let (_, err) = hierarchy_error(fx.build());
        assert_eq!(err, HierarchyError::InheritanceCycle { class: "A".to_string() });
    }

    #[test]
    fn test_transitive_cycle_reports_first_class() {
        let mut fx = Fixture::new();
        fx.class("Main", "Object", 1).class("A", "B", 2).class("B", "C", 3).class("C", "A", 4);
        let (_, err) = hierarchy_error(fx.build());
        // Fail-fast: only A's walk runs
        assert_eq!(err, HierarchyError::InheritanceCycle { class: "A".to_string() });
    }

    #[test]
    fn test_cycle_not_containing_start_terminates() {
        let mut fx = Fixture::new();
        fx.class("Main", "B", 1).class("B", "C", 2).class("C", "B", 3);
        let (_, err) = hierarchy_error(fx.build());
        assert_eq!(err, HierarchyError::InheritanceCycle { class: "Main".to_string() });
    }

    #[test]
    fn test_declared_types() {
        let mut fx = Fixture::new();
        fx.class("Main", "Object", 1);
        let table = fx.build().unwrap();
        assert!(table.is_declared_type(fx.names.self_type));
        assert!(table.is_declared_type(fx.names.main_class));
        assert!(!table.is_declared_type(fx.names.prim_slot));
        assert!(!table.is_declared_type(fx.names.no_type));
    }
}
