//! Turns a selected row into a navigation action.

use crate::cursor::FormCursor;
use crate::element::ElementKind;
use crate::error::{HierarchyError, Result};
use crate::form_index::FormIndex;
use crate::view::HierarchyView;
use tracing::{info, warn};

#[derive(Clone, Debug, PartialEq, Eq)]
/// What selecting a row did, and therefore what the caller must do next.
pub enum Selection {
    /// The cursor moved out one screen scope; rebuild.
    Ascended,
    /// The header at this position was collapsed; re-render.
    Collapsed(usize),
    /// The header at this position was expanded; re-render.
    Expanded(usize),
    /// The cursor now sits on a repeat instance; rebuild.
    Descended(FormIndex),
    /// The cursor now sits on a question; hand control back to the host.
    Finished(FormIndex),
}

/// Applies row selections to the view and the cursor.
pub struct SelectionDispatcher;

impl SelectionDispatcher {
    /// Act on the row at `position`.
    ///
    /// Header rows toggle in place. Question and instance rows move the cursor; if that fails the
    /// cursor is put back where it was before the selection.
    ///
    /// # Errors
    ///
    /// Returns an error if the position holds no row, if the row is malformed, or if the cursor
    /// refuses the jump.
    pub fn dispatch(
        view: &mut HierarchyView,
        position: usize,
        cursor: &mut dyn FormCursor,
    ) -> Result<Selection> {
        let row = view.get(position).ok_or_else(|| {
            HierarchyError::invariant(format!("no row at position {position}"))
        })?;
        let kind = row.kind;

        let Some(index) = row.index.clone() else {
            if kind == ElementKind::Child {
                return Err(HierarchyError::invariant(format!(
                    "repeat instance row '{}' has no index",
                    row.label
                )));
            }
            Self::ascend(cursor)?;
            return Ok(Selection::Ascended);
        };

        match kind {
            ElementKind::Up => {
                Self::ascend(cursor)?;
                Ok(Selection::Ascended)
            }
            ElementKind::Expanded => {
                info!(%index, "collapsing repeat");
                view.collapse(&index).map(Selection::Collapsed)
            }
            ElementKind::Collapsed => {
                info!(%index, "expanding repeat");
                view.expand(&index).map(Selection::Expanded)
            }
            ElementKind::Question => {
                info!(%index, "jumping to question");
                Self::restoring(cursor, |cursor| {
                    cursor.jump_to(&index)?;
                    if cursor.index_is_field_list() {
                        cursor
                            .step_previous_screen()
                            .map_err(HierarchyError::Navigation)?;
                    }
                    Ok(Selection::Finished(cursor.current_index()))
                })
            }
            ElementKind::Child => {
                info!(%index, "jumping to repeat instance");
                Self::restoring(cursor, |cursor| {
                    cursor.jump_to(&index)?;
                    Ok(Selection::Descended(index.clone()))
                })
            }
        }
    }

    /// Move the cursor out by one screen scope.
    ///
    /// # Errors
    ///
    /// Returns an error if the cursor refuses the move; the cursor is left where it was.
    pub fn ascend(cursor: &mut dyn FormCursor) -> Result<()> {
        info!(from = %cursor.current_index(), "ascending one level");
        Self::restoring(cursor, |cursor| {
            cursor.step_outer_screen()?;
            Ok(())
        })
    }

    /// Run `action`, jumping the cursor back to its starting index if it fails.
    fn restoring<T>(
        cursor: &mut dyn FormCursor,
        action: impl FnOnce(&mut dyn FormCursor) -> Result<T>,
    ) -> Result<T> {
        let entry = cursor.current_index();
        action(&mut *cursor).inspect_err(|e| {
            warn!(index = %entry, "navigation failed, restoring cursor: {e}");
            if let Err(restore_err) = cursor.jump_to(&entry) {
                warn!(index = %entry, "could not restore cursor: {restore_err}");
            }
        })
    }
}

#[cfg(test)]
#[path = "tests/dispatch.rs"]
mod tests;
