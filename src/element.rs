//! Rows of the hierarchy list.
//!
//! An element is one visible row: a question, a repeat header (collapsed or expanded), or one
//! instance of a repeat listed beneath its header. Repeat headers carry their instance rows from
//! the moment they are built; expanding a header only changes which rows are visible.

use crate::cursor::{CaptionPrompt, QuestionPrompt};
use crate::form_index::FormIndex;
use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
/// Role of a row in the list, and for repeat headers whether their instances are showing.
pub enum ElementKind {
    /// A question; selecting it leaves the hierarchy at that question.
    Question,
    /// A repeat header whose instance rows are hidden.
    Collapsed,
    /// A repeat header whose instance rows follow it in the list.
    Expanded,
    /// One instance of a repeat, listed under its header.
    Child,
    /// The synthetic row leading to the enclosing level; it has no index.
    Up,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
/// One row of the hierarchy list.
pub struct HierarchyElement {
    /// Primary text of the row.
    pub label: String,
    /// Answer text shown under a question's label.
    pub secondary: Option<String>,
    /// Where selecting the row leads; `None` only for the [`ElementKind::Up`] row.
    pub index: Option<FormIndex>,
    /// Role of the row.
    pub kind: ElementKind,
    /// Instance rows of a repeat header, in instance order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<HierarchyElement>,
}

impl HierarchyElement {
    #[must_use]
    /// Row for a question, labelled with its caption and showing its answer.
    pub fn question(prompt: QuestionPrompt) -> Self {
        Self {
            label: prompt.long_text,
            secondary: Some(prompt.answer_text),
            index: Some(prompt.index),
            kind: ElementKind::Question,
            children: Vec::new(),
        }
    }

    #[must_use]
    /// Collapsed header standing for every instance of a repeat. Its index names the repeat
    /// itself, so it never coincides with the index of one of its instance rows.
    pub fn repeat_header(caption: &CaptionPrompt) -> Self {
        Self {
            label: caption.long_text.clone(),
            secondary: None,
            index: Some(caption.index.template()),
            kind: ElementKind::Collapsed,
            children: Vec::new(),
        }
    }

    #[must_use]
    /// Row for one repeat instance, numbered from 1.
    pub fn repeat_instance(caption: &CaptionPrompt, indent: &str) -> Self {
        Self {
            label: format!("{indent}{} {}", caption.long_text, caption.multiplicity + 1),
            secondary: None,
            index: Some(caption.index.clone()),
            kind: ElementKind::Child,
            children: Vec::new(),
        }
    }

    #[must_use]
    /// Synthetic row that ascends one level when selected.
    pub fn up(label: &str) -> Self {
        Self {
            label: label.to_string(),
            secondary: None,
            index: None,
            kind: ElementKind::Up,
            children: Vec::new(),
        }
    }

    #[must_use]
    /// Whether this row is a repeat header, collapsed or expanded.
    pub fn is_header(&self) -> bool {
        matches!(self.kind, ElementKind::Collapsed | ElementKind::Expanded)
    }
}
