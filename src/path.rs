//! Breadcrumb text for the level being shown.

use crate::cursor::FormCursor;
use crate::error::Result;
use crate::form_index::FormIndex;

/// Formats the captions enclosing an index into a breadcrumb such as `Household (2) > Member (1)`.
pub struct PathFormatter<'a> {
    separator: &'a str,
}

impl<'a> PathFormatter<'a> {
    #[must_use]
    /// Formatter joining captions with `separator`.
    pub fn new(separator: &'a str) -> Self {
        Self { separator }
    }

    /// Breadcrumb of every node enclosing `index`, outermost first, each caption followed by its
    /// 1-based instance number. Empty when `index` is at the top level.
    ///
    /// # Errors
    ///
    /// Returns an error if the cursor cannot supply a caption for an enclosing node.
    pub fn format(&self, cursor: &dyn FormCursor, index: &FormIndex) -> Result<String> {
        self.join_outward(cursor, cursor.step_out(index))
    }

    /// Breadcrumb of a repeat instance being shown: the instance itself and everything enclosing
    /// it.
    ///
    /// # Errors
    ///
    /// Returns an error if the cursor cannot supply a caption for one of the nodes.
    pub fn format_scope(&self, cursor: &dyn FormCursor, scope: &FormIndex) -> Result<String> {
        self.join_outward(cursor, Some(scope.clone()))
    }

    fn join_outward(&self, cursor: &dyn FormCursor, first: Option<FormIndex>) -> Result<String> {
        let mut path = String::new();
        let mut current = first;
        while let Some(enclosing) = current {
            let caption = cursor.caption_prompt_at(&enclosing)?;
            path = format!(
                "{} ({}){}{path}",
                caption.long_text,
                caption.multiplicity + 1,
                self.separator
            );
            current = cursor.step_out(&enclosing);
        }
        if path.ends_with(self.separator) {
            path.truncate(path.len() - self.separator.len());
        }
        Ok(path)
    }
}

#[cfg(test)]
#[path = "tests/path.rs"]
mod tests;
