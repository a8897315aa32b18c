use super::HierarchyBuilder;
use crate::config::Config;
use crate::cursor::{CursorError, FormCursor};
use crate::element::ElementKind;
use crate::error::HierarchyError;
use crate::fixtures::{cursor_at, flat_form, form, household_form, index, labels, repeat_form};
use crate::form_index::Event;
use crate::memory::{FormDefinition, FormNode, MemoryCursor};
use crate::view::HierarchyView;
use std::collections::HashSet;

fn build_at(form: &FormDefinition, at: &str) -> HierarchyView {
    let config = Config::default();
    let mut cursor = cursor_at(form, at);
    HierarchyBuilder::new(&config).build(&mut cursor).unwrap()
}

fn element_indices(view: &HierarchyView) -> Vec<String> {
    view.elements
        .iter()
        .map(|e| e.index.as_ref().unwrap().to_string())
        .collect()
}

/// Every index the form's event stream passes through.
fn all_indices(form: &FormDefinition) -> Vec<String> {
    let mut cursor = MemoryCursor::new(form);
    let mut indices = vec![cursor.current_index().to_string()];
    while cursor.step_next(true).is_ok_and(|e| e != Event::End) {
        indices.push(cursor.current_index().to_string());
    }
    indices.push("<end>".to_string());
    indices
}

#[test]
fn test_flat_form() {
    let view = build_at(&flat_form(), "/q2");
    assert_eq!(view.path_text, "");
    assert!(!view.ascend_enabled);
    assert_eq!(element_indices(&view), ["/q1", "/q2", "/q3"]);
    assert!(view
        .elements
        .iter()
        .all(|e| e.kind == ElementKind::Question));
}

#[test]
fn test_repeat_instances_fold_under_one_header() {
    let view = build_at(&repeat_form(), "/q1");
    assert_eq!(labels(&view.elements), ["Q1", "R", "Q2"]);
    assert!(!view.ascend_enabled);

    let header = &view.elements[1];
    assert_eq!(header.kind, ElementKind::Collapsed);
    assert_eq!(header.index, Some(index("/R")));
    assert_eq!(labels(&header.children), ["     R 1", "     R 2"]);
    assert_eq!(
        header
            .children
            .iter()
            .map(|c| c.index.clone().unwrap())
            .collect::<Vec<_>>(),
        [index("/R[0]"), index("/R[1]")]
    );
    assert!(header.children.iter().all(|c| c.kind == ElementKind::Child));
}

#[test]
fn test_inside_repeat_instance_shows_only_its_body() {
    let view = build_at(&repeat_form(), "/R[0]/qr");
    assert_eq!(view.path_text, "R (1)");
    assert!(view.ascend_enabled);
    assert_eq!(element_indices(&view), ["/R[0]/qr"]);
}

#[test]
fn test_starting_on_repeat_event_shows_that_instance() {
    let view = build_at(&repeat_form(), "/R[1]");
    assert_eq!(view.path_text, "R (2)");
    assert_eq!(element_indices(&view), ["/R[1]/qr"]);
}

#[test]
fn test_unlabelled_read_only_question_is_omitted() {
    let form = form(vec![
        FormNode::question("name", "Name"),
        FormNode::Question {
            name: "calc".to_string(),
            label: String::new(),
            answer: "42".to_string(),
            read_only: true,
            step_error: None,
        },
        FormNode::Question {
            name: "note".to_string(),
            label: "Thanks!".to_string(),
            answer: String::new(),
            read_only: true,
            step_error: None,
        },
        FormNode::question("blank", ""),
    ]);
    let view = build_at(&form, "/name");
    assert_eq!(element_indices(&view), ["/name", "/note", "/blank"]);
}

#[test]
fn test_question_rows_carry_answers() {
    let form = form(vec![FormNode::Question {
        name: "village".to_string(),
        label: "Village".to_string(),
        answer: "Ngong".to_string(),
        read_only: false,
        step_error: None,
    }]);
    let view = build_at(&form, "<beginning>");
    assert_eq!(view.elements[0].secondary.as_deref(), Some("Ngong"));
}

#[test]
fn test_error_mid_build_restores_cursor() {
    let form = form(vec![
        FormNode::question("q1", "Q1"),
        FormNode::question("q2", "Q2"),
        FormNode::Question {
            name: "q3".to_string(),
            label: "Q3".to_string(),
            answer: String::new(),
            read_only: false,
            step_error: Some("relevance failed".to_string()),
        },
    ]);
    let config = Config::default();
    let mut cursor = cursor_at(&form, "/q2");

    let err = HierarchyBuilder::new(&config).build(&mut cursor).unwrap_err();
    assert_eq!(
        err,
        HierarchyError::Cursor(CursorError::domain("relevance failed"))
    );
    assert_eq!(cursor.current_index(), index("/q2"));
}

#[test]
fn test_nested_repeat_level() {
    let view = build_at(&household_form(), "/H[0]/head");
    assert_eq!(view.path_text, "Household (1)");
    assert_eq!(labels(&view.elements), ["Head", "Member"]);
    assert_eq!(
        labels(&view.elements[1].children),
        ["     Member 1", "     Member 2", "     Member 3"]
    );

    let view = build_at(&household_form(), "/H[1]/M[0]/name");
    assert_eq!(view.path_text, "Household (2) > Member (1)");
    assert_eq!(element_indices(&view), ["/H[1]/M[0]/name"]);
}

#[test]
fn test_top_level_hides_nested_repeats() {
    let view = build_at(&household_form(), "<beginning>");
    assert_eq!(labels(&view.elements), ["Household"]);
    assert_eq!(
        labels(&view.elements[0].children),
        ["     Household 1", "     Household 2"]
    );
}

#[test]
fn test_sibling_repeats_each_get_a_header() {
    let form = form(vec![
        FormNode::repeat(
            "A",
            "Crops",
            vec![
                vec![FormNode::question("a", "Crop")],
                vec![FormNode::question("a", "Crop")],
            ],
        ),
        FormNode::repeat("B", "Animals", vec![vec![FormNode::question("b", "Animal")]]),
        FormNode::repeat("B2", "Tools", vec![]),
        FormNode::question("q", "Done"),
    ]);
    let view = build_at(&form, "/q");
    assert_eq!(labels(&view.elements), ["Crops", "Animals", "Done"]);
    assert_eq!(view.elements[0].children.len(), 2);
    assert_eq!(view.elements[1].children.len(), 1);
}

#[test]
fn test_groups_are_transparent() {
    let form = form(vec![
        FormNode::group(
            "G",
            "Site",
            vec![
                FormNode::question("gps", "GPS"),
                FormNode::repeat(
                    "R",
                    "Plot",
                    vec![vec![FormNode::group(
                        "D",
                        "Details",
                        vec![FormNode::question("crop", "Crop")],
                    )]],
                ),
            ],
        ),
        FormNode::question("end", "End"),
    ]);
    let view = build_at(&form, "/G/gps");
    assert_eq!(labels(&view.elements), ["GPS", "Plot", "End"]);

    let view = build_at(&form, "/G/R[0]/D/crop");
    assert_eq!(view.path_text, "Site (1) > Plot (1)");
    assert_eq!(element_indices(&view), ["/G/R[0]/D/crop"]);
}

#[test]
fn test_custom_indent_and_up_row() {
    let config = Config {
        child_indent: "- ".to_string(),
        show_up_row: true,
        ..Config::default()
    };
    let builder = HierarchyBuilder::new(&config);

    let mut cursor = cursor_at(&repeat_form(), "/q1");
    let top = builder.build(&mut cursor).unwrap();
    assert_eq!(labels(&top.elements[1].children), ["- R 1", "- R 2"]);
    assert!(top.elements.iter().all(|e| e.index.is_some()));

    let mut cursor = cursor_at(&repeat_form(), "/R[0]/qr");
    let inner = builder.build(&mut cursor).unwrap();
    assert_eq!(labels(&inner.elements), ["..", "QR"]);
    assert_eq!(inner.elements[0].index, None);
    assert_eq!(inner.elements[0].kind, ElementKind::Up);
    assert!(top.elements.iter().all(|e| e.kind != ElementKind::Up));
}

#[test]
fn test_build_invariants_hold_from_every_start() {
    let config = Config::default();
    let forms = [flat_form(), repeat_form(), household_form()];
    for form in &forms {
        for at in all_indices(form) {
            let mut cursor = cursor_at(form, &at);
            let view = HierarchyBuilder::new(&config).build(&mut cursor).unwrap();

            assert_eq!(cursor.current_index().to_string(), at, "cursor moved");

            let mut seen = HashSet::new();
            for element in &view.elements {
                assert!(seen.insert(element.index.clone()), "duplicate row at {at}");
                assert!(element.is_header() || element.children.is_empty());
                if element.kind == ElementKind::Question {
                    let at_row = cursor.event_at(element.index.as_ref().unwrap()).unwrap();
                    assert_eq!(at_row, Event::Question);
                }
                for (n, child) in element.children.iter().enumerate() {
                    let child_index = child.index.as_ref().unwrap();
                    assert_eq!(child.kind, ElementKind::Child);
                    assert_eq!(child_index.multiplicity(), n);
                    assert_eq!(
                        Some(child_index.reference()),
                        element.index.as_ref().map(|i| i.reference())
                    );
                    assert!(child.children.is_empty());
                }
            }

            let start = index(&at);
            let enclosing = if cursor.event() == Event::Repeat {
                Some(start.clone())
            } else {
                std::iter::successors(cursor.step_out(&start), |i| cursor.step_out(i))
                    .find(|i| cursor.event_at(i).unwrap() == Event::Repeat)
            };
            if let Some(enclosing) = enclosing {
                for element in &view.elements {
                    let reference = element.index.as_ref().unwrap().reference();
                    assert!(reference.is_within(&enclosing.reference()));
                }
            }
        }
    }
}
