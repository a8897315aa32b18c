//! The narrow interface through which the hierarchy core drives a form.
//!
//! A [`FormCursor`] is a stateful forward cursor over the form's event stream. The host owns it;
//! the hierarchy core borrows it, moves it while building, and puts it back where it found it.

use crate::form_index::{Event, FormIndex};
use thiserror::Error;

/// Result type for cursor operations.
pub type CursorResult<T> = Result<T, CursorError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
/// Failures raised by the form model underneath a cursor.
pub enum CursorError {
    /// The form model rejected the move, e.g. an expression failed while stepping.
    #[error("{message}")]
    Domain {
        /// Message from the form model.
        message: String,
    },

    /// The form has no node at this index.
    #[error("no form node at index {0}")]
    UnknownIndex(FormIndex),

    /// A prompt was requested at an event that does not carry one.
    #[error("no prompt available at {event:?} event")]
    NoPrompt {
        /// Event the cursor was positioned on.
        event: Event,
    },
}

impl CursorError {
    #[must_use]
    /// Create a domain error from the form model's message.
    pub fn domain(message: impl Into<String>) -> Self {
        Self::Domain {
            message: message.into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// Display data for the question under the cursor.
pub struct QuestionPrompt {
    /// Long caption of the question.
    pub long_text: String,
    /// Current answer rendered as text, possibly empty.
    pub answer_text: String,
    /// Index of the question.
    pub index: FormIndex,
    /// Whether the question can be edited.
    pub read_only: bool,
    /// Whether the question carries a non-empty label.
    pub has_label: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// Display data for a group or repeat.
pub struct CaptionPrompt {
    /// Long caption of the group or repeat.
    pub long_text: String,
    /// Index of the node.
    pub index: FormIndex,
    /// Repeat instance number, 0 for plain groups.
    pub multiplicity: usize,
}

/// Stateful cursor over a form's event stream.
pub trait FormCursor {
    /// Index the cursor is positioned on.
    fn current_index(&self) -> FormIndex;

    /// Event at the current position.
    fn event(&self) -> Event;

    /// Event at an arbitrary index.
    ///
    /// # Errors
    ///
    /// Returns an error if the index does not exist in the form.
    fn event_at(&self, index: &FormIndex) -> CursorResult<Event>;

    /// Advance one event. With `into_group` the cursor descends into groups and repeats instead of
    /// skipping past them.
    ///
    /// # Errors
    ///
    /// Returns an error if the form model refuses the step; the cursor does not move.
    fn step_next(&mut self, into_group: bool) -> CursorResult<Event>;

    /// Index of the node enclosing `index`, or `None` at the top level.
    fn step_out(&self, index: &FormIndex) -> Option<FormIndex>;

    /// Move the cursor to `index`.
    ///
    /// # Errors
    ///
    /// Returns an error if the index does not exist in the form.
    fn jump_to(&mut self, index: &FormIndex) -> CursorResult<Event>;

    /// Move outward by one screen scope: the nearest enclosing repeat, or the beginning.
    ///
    /// # Errors
    ///
    /// Returns an error if the form model refuses the move.
    fn step_outer_screen(&mut self) -> CursorResult<Event>;

    /// Move back by one screen.
    ///
    /// # Errors
    ///
    /// Returns an error if the form model refuses the move.
    fn step_previous_screen(&mut self) -> CursorResult<Event>;

    /// Prompt for the question under the cursor.
    ///
    /// # Errors
    ///
    /// Returns [`CursorError::NoPrompt`] when the cursor is not on a question.
    fn question_prompt(&self) -> CursorResult<QuestionPrompt>;

    /// Caption for the group or repeat under the cursor.
    ///
    /// # Errors
    ///
    /// Returns [`CursorError::NoPrompt`] when the cursor is not on a group or repeat.
    fn caption_prompt(&self) -> CursorResult<CaptionPrompt> {
        self.caption_prompt_at(&self.current_index())
    }

    /// Caption for the group or repeat at `index`.
    ///
    /// # Errors
    ///
    /// Returns an error when `index` does not name a group or repeat.
    fn caption_prompt_at(&self, index: &FormIndex) -> CursorResult<CaptionPrompt>;

    /// Whether the current index is shown as part of a field list screen.
    fn index_is_field_list(&self) -> bool;
}
