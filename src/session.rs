//! The hierarchy screen as a whole: one cursor, one host, and the view in between.
//!
//! A session is opened on the cursor's current position. It builds the level around that
//! position, hands the rows to the host, and routes every user action back through the builder
//! and the dispatcher. Errors never escape a session: each one is shown to the host once and the
//! cursor is returned to the index it held when the current level was built.

use crate::builder::HierarchyBuilder;
use crate::config::Config;
use crate::cursor::FormCursor;
use crate::dispatch::{Selection, SelectionDispatcher};
use crate::element::HierarchyElement;
use crate::error::HierarchyError;
use crate::form_index::FormIndex;
use crate::view::HierarchyView;
use serde::Serialize;
use tracing::{error, info};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
/// How the session handed control back to the host.
pub enum Outcome {
    /// The cursor was moved somewhere the host should now display.
    Ok,
    /// The user backed out; the cursor is where it was when the session opened.
    Cancelled,
}

/// Receiver of everything the hierarchy screen wants displayed.
pub trait HierarchyHost {
    /// Show a freshly built or toggled list.
    fn render(&mut self, path_text: &str, ascend_enabled: bool, elements: &[HierarchyElement]);

    /// Tell the user something went wrong.
    fn show_error(&mut self, message: &str);

    /// Close the hierarchy screen.
    fn finish_with(&mut self, outcome: Outcome);
}

/// Drives the hierarchy screen for one visit.
pub struct HierarchySession<C, H> {
    cursor: C,
    host: H,
    config: Config,
    /// Index the cursor held when the session opened; restored on back.
    start_index: FormIndex,
    /// Index the cursor held when the current level was built; restored after errors.
    entry_index: FormIndex,
    view: HierarchyView,
    focus: usize,
    outcome: Option<Outcome>,
}

impl<C: FormCursor, H: HierarchyHost> HierarchySession<C, H> {
    /// Open the screen on the cursor's current position and focus the row for that position.
    pub fn open(cursor: C, host: H, config: Config) -> Self {
        let start_index = cursor.current_index();
        info!(start = %start_index, "opening hierarchy");
        let mut session = Self {
            cursor,
            host,
            config,
            entry_index: start_index.clone(),
            start_index,
            view: HierarchyView::empty(),
            focus: 0,
            outcome: None,
        };
        session.refresh();
        session
    }

    /// Rebuild the level around the cursor and render it, focusing the row for the cursor's
    /// position. Returns whether the build succeeded.
    pub fn refresh(&mut self) -> bool {
        self.entry_index = self.cursor.current_index();
        match HierarchyBuilder::new(&self.config).build(&mut self.cursor) {
            Ok(view) => {
                self.view = view;
                self.focus = self.view.position_of(&self.entry_index).unwrap_or(0);
                self.render();
                true
            }
            Err(e) => {
                self.report(&e);
                false
            }
        }
    }

    /// Act on the row at `position`.
    pub fn select(&mut self, position: usize) {
        match SelectionDispatcher::dispatch(&mut self.view, position, &mut self.cursor) {
            Ok(Selection::Ascended | Selection::Descended(_)) => {
                self.refresh();
            }
            Ok(Selection::Collapsed(header) | Selection::Expanded(header)) => {
                self.focus = header;
                self.render();
            }
            Ok(Selection::Finished(_)) => self.finish(Outcome::Ok),
            Err(e) => self.report(&e),
        }
    }

    /// Show the enclosing level.
    pub fn ascend(&mut self) {
        match SelectionDispatcher::ascend(&mut self.cursor) {
            Ok(()) => {
                self.refresh();
            }
            Err(e) => self.report(&e),
        }
    }

    /// Leave the screen positioned before the first question.
    pub fn jump_to_beginning(&mut self) {
        info!("jumping to beginning of form");
        self.jump_and_finish(&FormIndex::beginning_of_form());
    }

    /// Leave the screen positioned after the last question.
    pub fn jump_to_end(&mut self) {
        info!("jumping to end of form");
        self.jump_and_finish(&FormIndex::end_of_form());
    }

    /// Leave the screen with the cursor back where it was when the session opened.
    pub fn back(&mut self) {
        info!(index = %self.start_index, "returning to start index");
        match self.cursor.jump_to(&self.start_index) {
            Ok(_) => self.finish(Outcome::Cancelled),
            Err(e) => self.report(&e.into()),
        }
    }

    /// Move the focused row by `delta`, staying within the list.
    pub fn move_focus(&mut self, delta: isize) {
        let last = self.view.len().saturating_sub(1);
        self.focus = self.focus.saturating_add_signed(delta).min(last);
    }

    /// Act on the focused row.
    pub fn select_focused(&mut self) {
        if !self.view.is_empty() {
            self.select(self.focus);
        }
    }

    #[must_use]
    /// The level currently shown.
    pub fn view(&self) -> &HierarchyView {
        &self.view
    }

    #[must_use]
    /// Position of the focused row.
    pub fn focus(&self) -> usize {
        self.focus
    }

    #[must_use]
    /// How the session ended, once it has.
    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    #[must_use]
    /// The cursor being driven.
    pub fn cursor(&self) -> &C {
        &self.cursor
    }

    #[must_use]
    /// The host receiving output.
    pub fn host(&self) -> &H {
        &self.host
    }

    /// The host receiving output, for acknowledging what it shows.
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Give back the cursor and the host.
    pub fn into_parts(self) -> (C, H) {
        (self.cursor, self.host)
    }

    fn jump_and_finish(&mut self, index: &FormIndex) {
        match self.cursor.jump_to(index) {
            Ok(_) => self.finish(Outcome::Ok),
            Err(e) => self.report(&e.into()),
        }
    }

    fn render(&mut self) {
        self.host.render(
            &self.view.path_text,
            self.view.ascend_enabled,
            &self.view.elements,
        );
    }

    fn finish(&mut self, outcome: Outcome) {
        info!(?outcome, index = %self.cursor.current_index(), "leaving hierarchy");
        self.outcome = Some(outcome);
        self.host.finish_with(outcome);
    }

    fn report(&mut self, e: &HierarchyError) {
        error!(index = %self.entry_index, "hierarchy error: {e}");
        self.host.show_error(&e.to_string());
        if let Err(restore_err) = self.cursor.jump_to(&self.entry_index) {
            error!(index = %self.entry_index, "could not restore cursor: {restore_err}");
        }
    }
}

#[cfg(test)]
#[path = "tests/session.rs"]
mod tests;
