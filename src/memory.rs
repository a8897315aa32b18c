//! An in-memory form and a cursor over it.
//!
//! A [`FormDefinition`] is the outline of one filled-in form: questions with their answers,
//! groups, and repeats with their instances. [`MemoryCursor`] flattens it into the event stream a
//! form engine would produce, so the hierarchy screen can be driven without one.
//!
//! Forms are read from JSON:
//!
//! ```json
//! { "title": "Census",
//!   "children": [
//!     { "type": "question", "name": "village", "label": "Village", "answer": "Ngong" },
//!     { "type": "repeat", "name": "household", "label": "Household",
//!       "instances": [[{ "type": "question", "name": "head", "label": "Head" }]] } ] }
//! ```

use crate::cursor::{CaptionPrompt, CursorError, CursorResult, FormCursor, QuestionPrompt};
use crate::form_index::{Event, FormIndex, IndexStep};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::{fs, io};
use thiserror::Error;

#[derive(Debug, Error)]
/// Reasons a form outline is rejected.
pub enum FormError {
    /// The text is not a JSON form outline.
    #[error("invalid form outline: {0}")]
    Json(#[from] serde_json::Error),

    /// Two siblings would be reached through the same index.
    #[error("more than one node at index {0}")]
    DuplicateIndex(FormIndex),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
/// Outline of one filled-in form.
pub struct FormDefinition {
    /// Title shown above the hierarchy.
    pub title: String,
    /// Top-level nodes in form order.
    pub children: Vec<FormNode>,
}

impl FormDefinition {
    /// Parse a form from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON does not describe a form, or if the form fails
    /// [`validate`](Self::validate).
    pub fn from_json(json: &str) -> Result<Self, FormError> {
        let form: Self = serde_json::from_str(json)?;
        form.validate()?;
        Ok(form)
    }

    /// Check that every node has an index of its own.
    ///
    /// Sibling names must differ, and a repeat also claims its bare name (the index of its header
    /// row) and one index per instance plus the new-instance prompt.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::DuplicateIndex`] naming the first index claimed twice.
    pub fn validate(&self) -> Result<(), FormError> {
        check_siblings(&self.children, &[])
    }

    /// Read a form from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or does not describe a valid form.
    pub fn load(path: &Path) -> io::Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_json(&contents).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
/// One node of a form outline.
pub enum FormNode {
    /// A question and its current answer.
    Question {
        /// Node name; no sibling may claim the same index.
        name: String,
        /// Caption; may be empty for calculated values.
        #[serde(default)]
        label: String,
        /// Current answer as text.
        #[serde(default)]
        answer: String,
        /// Whether the question is computed rather than entered.
        #[serde(default)]
        read_only: bool,
        /// Error the form raises when the cursor steps onto this question.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        step_error: Option<String>,
    },
    /// A plain group of nodes.
    Group {
        /// Node name; no sibling may claim the same index.
        name: String,
        /// Caption.
        #[serde(default)]
        label: String,
        /// Whether the group's questions share one screen.
        #[serde(default)]
        field_list: bool,
        /// Error the form raises when the group is opened as one screen.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        screen_error: Option<String>,
        /// Nested nodes.
        children: Vec<FormNode>,
    },
    /// A repeat and the body of each of its instances.
    Repeat {
        /// Node name; no sibling may claim the same index.
        name: String,
        /// Caption.
        #[serde(default)]
        label: String,
        /// Body of each instance, in instance order.
        instances: Vec<Vec<FormNode>>,
    },
}

impl FormNode {
    #[must_use]
    /// An editable, unanswered question.
    pub fn question(name: &str, label: &str) -> Self {
        Self::Question {
            name: name.to_string(),
            label: label.to_string(),
            answer: String::new(),
            read_only: false,
            step_error: None,
        }
    }

    #[must_use]
    /// A plain group.
    pub fn group(name: &str, label: &str, children: Vec<FormNode>) -> Self {
        Self::Group {
            name: name.to_string(),
            label: label.to_string(),
            field_list: false,
            screen_error: None,
            children,
        }
    }

    #[must_use]
    /// A repeat with the given instances.
    pub fn repeat(name: &str, label: &str, instances: Vec<Vec<FormNode>>) -> Self {
        Self::Repeat {
            name: name.to_string(),
            label: label.to_string(),
            instances,
        }
    }
}

/// One event of the flattened form.
#[derive(Debug)]
struct Entry {
    index: FormIndex,
    event: Event,
    parent: Option<usize>,
    /// Position of the last entry inside this entry's subtree.
    last: usize,
    label: String,
    answer: String,
    read_only: bool,
    field_list: bool,
    step_error: Option<String>,
    screen_error: Option<String>,
}

impl Entry {
    fn new(index: FormIndex, event: Event, parent: Option<usize>, label: &str) -> Self {
        Self {
            index,
            event,
            parent,
            last: 0,
            label: label.to_string(),
            answer: String::new(),
            read_only: false,
            field_list: false,
            step_error: None,
            screen_error: None,
        }
    }
}

/// Cursor over a [`FormDefinition`].
pub struct MemoryCursor {
    title: String,
    entries: Vec<Entry>,
    positions: HashMap<FormIndex, usize>,
    current: usize,
}

impl MemoryCursor {
    #[must_use]
    /// Cursor positioned at the beginning of `form`.
    ///
    /// `form` is expected to pass [`FormDefinition::validate`]; forms read through
    /// [`FormDefinition::from_json`] or [`FormDefinition::load`] always do.
    pub fn new(form: &FormDefinition) -> Self {
        let mut entries = vec![Entry::new(FormIndex::BeginningOfForm, Event::Begin, None, "")];
        flatten(&form.children, &[], None, &mut entries);
        let end = entries.len();
        entries.push(Entry::new(FormIndex::EndOfForm, Event::End, None, ""));
        entries[end].last = end;

        let positions = entries
            .iter()
            .enumerate()
            .map(|(position, entry)| (entry.index.clone(), position))
            .collect();

        Self {
            title: form.title.clone(),
            entries,
            positions,
            current: 0,
        }
    }

    #[must_use]
    /// Title of the form.
    pub fn title(&self) -> &str {
        &self.title
    }

    fn position(&self, index: &FormIndex) -> CursorResult<usize> {
        self.positions
            .get(index)
            .copied()
            .ok_or_else(|| CursorError::UnknownIndex(index.clone()))
    }

    fn entry(&self) -> &Entry {
        &self.entries[self.current]
    }

    /// Outermost field-list group containing `position`, including `position` itself.
    fn field_list_group(&self, position: usize) -> Option<usize> {
        let mut outermost = None;
        let mut walk = Some(position);
        while let Some(p) = walk {
            let entry = &self.entries[p];
            if entry.event == Event::Group && entry.field_list {
                outermost = Some(p);
            }
            walk = entry.parent;
        }
        outermost
    }

    fn land_on(&mut self, position: usize) -> CursorResult<Event> {
        let entry = &self.entries[position];
        if let Some(message) = &entry.step_error {
            return Err(CursorError::domain(message.clone()));
        }
        self.current = position;
        Ok(entry.event)
    }
}

fn flatten(
    nodes: &[FormNode],
    prefix: &[IndexStep],
    parent: Option<usize>,
    entries: &mut Vec<Entry>,
) {
    let path = |step: IndexStep| {
        let mut steps = prefix.to_vec();
        steps.push(step);
        FormIndex::Node(steps)
    };

    for node in nodes {
        match node {
            FormNode::Question {
                name,
                label,
                answer,
                read_only,
                step_error,
            } => {
                let position = entries.len();
                let index = path(IndexStep::node(name));
                let mut entry = Entry::new(index, Event::Question, parent, label);
                entry.answer.clone_from(answer);
                entry.read_only = *read_only;
                entry.step_error.clone_from(step_error);
                entry.last = position;
                entries.push(entry);
            }
            FormNode::Group {
                name,
                label,
                field_list,
                screen_error,
                children,
            } => {
                let position = entries.len();
                let index = path(IndexStep::node(name));
                let mut entry = Entry::new(index.clone(), Event::Group, parent, label);
                entry.field_list = *field_list;
                entry.screen_error.clone_from(screen_error);
                entries.push(entry);
                flatten(children, index.steps(), Some(position), entries);
                entries[position].last = entries.len() - 1;
            }
            FormNode::Repeat {
                name,
                label,
                instances,
            } => {
                for (instance, body) in instances.iter().enumerate() {
                    let position = entries.len();
                    let index = path(IndexStep::repeat(name, instance));
                    entries.push(Entry::new(index.clone(), Event::Repeat, parent, label));
                    flatten(body, index.steps(), Some(position), entries);
                    entries[position].last = entries.len() - 1;
                }
                let position = entries.len();
                let index = path(IndexStep::repeat(name, instances.len()));
                let mut prompt = Entry::new(index, Event::PromptNewRepeat, parent, label);
                prompt.last = position;
                entries.push(prompt);
            }
        }
    }
}

fn check_siblings(nodes: &[FormNode], prefix: &[IndexStep]) -> Result<(), FormError> {
    let path = |step: IndexStep| {
        let mut steps = prefix.to_vec();
        steps.push(step);
        steps
    };

    let mut claimed = HashSet::new();
    for node in nodes {
        let steps = match node {
            FormNode::Question { name, .. } | FormNode::Group { name, .. } => {
                vec![IndexStep::node(name)]
            }
            FormNode::Repeat {
                name, instances, ..
            } => std::iter::once(IndexStep::node(name))
                .chain((0..=instances.len()).map(|i| IndexStep::repeat(name, i)))
                .collect(),
        };
        for step in steps {
            if !claimed.insert(step.clone()) {
                return Err(FormError::DuplicateIndex(FormIndex::Node(path(step))));
            }
        }

        match node {
            FormNode::Question { .. } => {}
            FormNode::Group { name, children, .. } => {
                check_siblings(children, &path(IndexStep::node(name)))?;
            }
            FormNode::Repeat {
                name, instances, ..
            } => {
                for (instance, body) in instances.iter().enumerate() {
                    check_siblings(body, &path(IndexStep::repeat(name, instance)))?;
                }
            }
        }
    }
    Ok(())
}

impl FormCursor for MemoryCursor {
    fn current_index(&self) -> FormIndex {
        self.entry().index.clone()
    }

    fn event(&self) -> Event {
        self.entry().event
    }

    fn event_at(&self, index: &FormIndex) -> CursorResult<Event> {
        Ok(self.entries[self.position(index)?].event)
    }

    fn step_next(&mut self, into_group: bool) -> CursorResult<Event> {
        let entry = self.entry();
        if entry.event == Event::End {
            return Ok(Event::End);
        }
        let skip_body = !into_group && matches!(entry.event, Event::Group | Event::Repeat);
        let target = if skip_body { entry.last + 1 } else { self.current + 1 };
        self.land_on(target.min(self.entries.len() - 1))
    }

    fn step_out(&self, index: &FormIndex) -> Option<FormIndex> {
        let position = self.positions.get(index)?;
        self.entries[*position]
            .parent
            .map(|parent| self.entries[parent].index.clone())
    }

    fn jump_to(&mut self, index: &FormIndex) -> CursorResult<Event> {
        self.current = self.position(index)?;
        Ok(self.event())
    }

    fn step_outer_screen(&mut self) -> CursorResult<Event> {
        let mut ancestor = self.entry().parent;
        while let Some(p) = ancestor {
            if self.entries[p].event != Event::Group {
                break;
            }
            ancestor = self.entries[p].parent;
        }

        self.current = match ancestor {
            None => 0,
            // From a repeat instance, the enclosing repeat instance is one screen out.
            Some(p) if self.event() == Event::Repeat => p,
            // From inside an instance, step past the instance itself.
            Some(p) => self.entries[p].parent.unwrap_or(0),
        };
        Ok(self.event())
    }

    fn step_previous_screen(&mut self) -> CursorResult<Event> {
        let target = match self.field_list_group(self.current) {
            Some(group) => group,
            None => {
                let previous = self.current.saturating_sub(1);
                self.field_list_group(previous).unwrap_or(previous)
            }
        };
        if let Some(message) = &self.entries[target].screen_error {
            return Err(CursorError::domain(message.clone()));
        }
        self.land_on(target)
    }

    fn question_prompt(&self) -> CursorResult<QuestionPrompt> {
        let entry = self.entry();
        if entry.event != Event::Question {
            return Err(CursorError::NoPrompt { event: entry.event });
        }
        Ok(QuestionPrompt {
            long_text: entry.label.clone(),
            answer_text: entry.answer.clone(),
            index: entry.index.clone(),
            read_only: entry.read_only,
            has_label: !entry.label.is_empty(),
        })
    }

    fn caption_prompt_at(&self, index: &FormIndex) -> CursorResult<CaptionPrompt> {
        let entry = &self.entries[self.position(index)?];
        match entry.event {
            Event::Group | Event::Repeat | Event::PromptNewRepeat => Ok(CaptionPrompt {
                long_text: entry.label.clone(),
                index: entry.index.clone(),
                multiplicity: entry.index.multiplicity(),
            }),
            event => Err(CursorError::NoPrompt { event }),
        }
    }

    fn index_is_field_list(&self) -> bool {
        self.field_list_group(self.current).is_some()
    }
}

#[cfg(test)]
#[path = "tests/memory.rs"]
mod tests;
