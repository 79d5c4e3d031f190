//! Tests for class hierarchy construction and validation

mod common;

use common::*;
use cool_semant::SemantFailure;

fn hierarchy_failure(checked: &Checked) -> Vec<String> {
    assert!(
        matches!(checked.failure, Some(SemantFailure::Hierarchy(_))),
        "expected hierarchy failure, got: {:?}",
        checked.messages()
    );
    checked.messages()
}

#[test]
fn test_minimal_program_accepted() {
    let checked = check(vec![main_class()]);
    assert!(checked.is_ok(), "Expected no errors, got: {:?}", checked.messages());
}

#[test]
fn test_duplicate_class() {
    let checked = check(vec![
        main_class(),
        class("A", "Object", vec![]).at(3),
        class("A", "Object", vec![]).at(7),
    ]);
    assert_eq!(hierarchy_failure(&checked), vec!["test.cl:7: Redefinition of class A."]);
}

#[test]
fn test_redefining_basic_class() {
    for basic in ["Object", "IO", "Int", "Bool", "String"] {
        let checked = check(vec![main_class(), class(basic, "Object", vec![]).at(2)]);
        assert_eq!(
            hierarchy_failure(&checked),
            vec![format!("test.cl:2: Redefinition of class {}.", basic)],
        );
    }
}

#[test]
fn test_class_named_self_type() {
    let checked = check(vec![main_class(), class("SELF_TYPE", "Object", vec![]).at(4)]);
    assert_eq!(
        hierarchy_failure(&checked),
        vec!["test.cl:4: Redefinition of basic class SELF_TYPE."]
    );
}

#[test]
fn test_missing_main_has_no_location() {
    let checked = check(vec![class("A", "Object", vec![method("main", &[], "Object", int(0))])]);
    assert_eq!(hierarchy_failure(&checked), vec!["Class Main is not defined."]);
    assert_eq!(checked.codes(), vec!["E1003"]);
}

#[test]
fn test_missing_main_rejected_before_expressions() {
    // The undeclared identifier is never reported
    let checked = check(vec![class("A", "Object", vec![method("f", &[], "Object", id("ghost"))])]);
    assert_eq!(hierarchy_failure(&checked), vec!["Class Main is not defined."]);
    assert!(checked.body("A", "f").ty.is_none());
}

#[test]
fn test_undefined_parent() {
    let checked = check(vec![main_class(), class("A", "Missing", vec![]).at(5)]);
    assert_eq!(
        hierarchy_failure(&checked),
        vec!["test.cl:5: Class A inherits from an undefined class Missing."]
    );
}

#[test]
fn test_sealed_classes_cannot_be_inherited() {
    for sealed in ["Int", "Bool", "String", "SELF_TYPE"] {
        let checked = check(vec![main_class(), class("A", sealed, vec![]).at(2)]);
        assert_eq!(
            hierarchy_failure(&checked),
            vec![format!("test.cl:2: Class A cannot inherit class {}.", sealed)],
            "inheriting {} must be rejected",
            sealed
        );
    }
}

#[test]
fn test_sealed_inheritance_anywhere_in_chain() {
    let checked = check(vec![
        class("Main", "A", vec![method("main", &[], "Object", int(0))]),
        class("A", "B", vec![]).at(2),
        class("B", "Bool", vec![]).at(3),
    ]);
    assert_eq!(hierarchy_failure(&checked), vec!["test.cl:3: Class B cannot inherit class Bool."]);
}

#[test]
fn test_self_inheritance_cycle() {
    let checked = check(vec![main_class(), class("A", "A", vec![]).at(2)]);
    assert_eq!(
        hierarchy_failure(&checked),
        vec!["test.cl:2: Class A, or an ancestor of A, is involved in an inheritance cycle."]
    );
}

#[test]
fn test_transitive_cycle_reported_once() {
    let checked = check(vec![
        main_class(),
        class("A", "B", vec![]).at(2),
        class("B", "C", vec![]).at(3),
        class("C", "A", vec![]).at(4),
    ]);
    let messages = hierarchy_failure(&checked);
    assert_eq!(messages.len(), 1, "fail-fast must stop at the first cycle: {:?}", messages);
    assert!(messages[0].contains("Class A, or an ancestor of A"), "got {:?}", messages);
}

#[test]
fn test_cycle_above_start_class_terminates() {
    let checked = check(vec![
        class("Main", "B", vec![method("main", &[], "Object", int(0))]),
        class("B", "C", vec![]).at(2),
        class("C", "B", vec![]).at(3),
    ]);
    assert_eq!(checked.codes(), vec!["E1006"]);
}

#[test]
fn test_first_structural_error_stops_validation() {
    let checked = check(vec![
        main_class(),
        class("A", "Missing", vec![]).at(2),
        class("B", "Int", vec![]).at(3),
        class("C", "C", vec![]).at(4),
    ]);
    assert_eq!(checked.codes(), vec!["E1004"]);
}

#[test]
fn test_hierarchy_halt_message() {
    let checked = check(vec![main_class(), class("A", "String", vec![])]);
    let failure = checked.failure.expect("hierarchy must be rejected");
    assert_eq!(failure.to_string(), "Compilation halted due to static semantic errors.");
}

#[test]
fn test_deep_valid_hierarchy() {
    let checked = check(vec![
        main_class(),
        class("D", "C", vec![]),
        class("C", "B", vec![]),
        class("B", "A", vec![]),
        class("A", "IO", vec![]),
    ]);
    assert!(checked.is_ok(), "forward references are allowed, got: {:?}", checked.messages());
}
