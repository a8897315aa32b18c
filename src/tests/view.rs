use super::HierarchyView;
use crate::builder::HierarchyBuilder;
use crate::config::Config;
use crate::element::ElementKind;
use crate::error::HierarchyError;
use crate::fixtures::{cursor_at, index, labels, repeat_form};

fn top_level() -> HierarchyView {
    let config = Config::default();
    let mut cursor = cursor_at(&repeat_form(), "/q1");
    HierarchyBuilder::new(&config).build(&mut cursor).unwrap()
}

#[test]
fn test_expand_then_collapse_restores_list() {
    let mut view = top_level();
    let before = view.clone();
    assert_eq!(view.len(), 3);

    assert_eq!(view.expand(&index("/R")).unwrap(), 1);
    assert_eq!(view.len(), 5);
    assert_eq!(labels(&view.elements), ["Q1", "R", "     R 1", "     R 2", "Q2"]);
    assert_eq!(view.elements[1].kind, ElementKind::Expanded);
    assert_eq!(view.position_of(&index("/R[1]")), Some(3));

    assert_eq!(view.collapse(&index("/R")).unwrap(), 1);
    assert_eq!(view, before);
}

#[test]
fn test_toggles_are_idempotent() {
    let mut view = top_level();
    view.expand(&index("/R")).unwrap();
    view.expand(&index("/R")).unwrap();
    assert_eq!(view.len(), 5);

    view.collapse(&index("/R")).unwrap();
    view.collapse(&index("/R")).unwrap();
    assert_eq!(view.len(), 3);
}

#[test]
fn test_unknown_header_is_an_error() {
    let mut view = top_level();
    let err = view.expand(&index("/q1")).unwrap_err();
    assert!(matches!(err, HierarchyError::InvariantViolation(_)));
    assert_eq!(view, top_level());
}

#[test]
fn test_collapse_checks_rows_beneath_header() {
    let mut view = top_level();
    view.expand(&index("/R")).unwrap();
    view.elements.remove(2);

    let err = view.collapse(&index("/R")).unwrap_err();
    assert_eq!(
        err.to_string(),
        "hierarchy invariant violated: instance rows of /R are not directly beneath it"
    );
    assert_eq!(view.len(), 4);
}

#[test]
fn test_empty_view() {
    let view = HierarchyView::empty();
    assert!(view.is_empty());
    assert!(view.get(0).is_none());
    assert!(!view.ascend_enabled);
}
