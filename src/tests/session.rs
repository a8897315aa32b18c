use super::{HierarchySession, Outcome};
use crate::config::Config;
use crate::cursor::FormCursor;
use crate::fixtures::{cursor_at, form, index, labels, repeat_form, RecordingHost};
use crate::form_index::FormIndex;
use crate::memory::{FormNode, MemoryCursor};

fn session_at(at: &str) -> HierarchySession<MemoryCursor, RecordingHost> {
    HierarchySession::open(
        cursor_at(&repeat_form(), at),
        RecordingHost::default(),
        Config::default(),
    )
}

#[test]
fn test_open_renders_and_focuses_start_row() {
    let session = session_at("/q2");
    let host = session.host();
    assert_eq!(host.renders.len(), 1);
    let (path_text, ascend_enabled, elements) = &host.renders[0];
    assert_eq!(path_text, "");
    assert!(!ascend_enabled);
    assert_eq!(labels(elements), ["Q1", "R", "Q2"]);
    assert_eq!(session.focus(), 2);
    assert_eq!(session.outcome(), None);
}

#[test]
fn test_focus_defaults_to_first_row() {
    let session = session_at("<beginning>");
    assert_eq!(session.focus(), 0);
}

#[test]
fn test_descend_into_instance_and_ascend() {
    let mut session = session_at("/q1");
    session.select(1);
    assert_eq!(session.focus(), 1);
    assert_eq!(session.view().len(), 5);

    session.select(3);
    assert_eq!(session.view().path_text, "R (2)");
    assert!(session.view().ascend_enabled);
    assert_eq!(session.cursor().current_index(), index("/R[1]"));

    session.ascend();
    assert_eq!(session.view().path_text, "");
    assert_eq!(labels(&session.view().elements), ["Q1", "R", "Q2"]);
    assert_eq!(session.host().renders.len(), 4);
    assert_eq!(session.outcome(), None);
}

#[test]
fn test_selecting_question_finishes() {
    let mut session = session_at("/q2");
    session.move_focus(-2);
    session.select_focused();
    assert_eq!(session.outcome(), Some(Outcome::Ok));
    assert_eq!(session.host().outcomes, [Outcome::Ok]);
    assert_eq!(session.cursor().current_index(), index("/q1"));
}

#[test]
fn test_move_focus_stays_in_list() {
    let mut session = session_at("/q1");
    session.move_focus(-5);
    assert_eq!(session.focus(), 0);
    session.move_focus(10);
    assert_eq!(session.focus(), 2);
}

#[test]
fn test_back_restores_start_index() {
    let mut session = session_at("/R[0]/qr");
    session.ascend();
    assert_eq!(session.cursor().current_index(), FormIndex::beginning_of_form());

    session.back();
    assert_eq!(session.outcome(), Some(Outcome::Cancelled));
    let (cursor, host) = session.into_parts();
    assert_eq!(cursor.current_index(), index("/R[0]/qr"));
    assert_eq!(host.outcomes, [Outcome::Cancelled]);
}

#[test]
fn test_jump_to_beginning_and_end() {
    let mut session = session_at("/q2");
    session.jump_to_beginning();
    assert_eq!(session.cursor().current_index(), FormIndex::beginning_of_form());
    assert_eq!(session.outcome(), Some(Outcome::Ok));

    let mut session = session_at("/q2");
    session.jump_to_end();
    assert_eq!(session.cursor().current_index(), FormIndex::end_of_form());
    assert_eq!(session.outcome(), Some(Outcome::Ok));
}

#[test]
fn test_build_error_is_reported_once() {
    let form = form(vec![
        FormNode::question("q1", "Q1"),
        FormNode::question("q2", "Q2"),
        FormNode::Question {
            name: "q3".to_string(),
            label: "Q3".to_string(),
            answer: String::new(),
            read_only: false,
            step_error: Some("boom".to_string()),
        },
    ]);
    let session = HierarchySession::open(
        cursor_at(&form, "/q2"),
        RecordingHost::default(),
        Config::default(),
    );
    assert_eq!(session.host().errors, ["boom"]);
    assert!(session.host().renders.is_empty());
    assert!(session.view().is_empty());
    assert_eq!(session.cursor().current_index(), index("/q2"));
    assert_eq!(session.outcome(), None);
}
