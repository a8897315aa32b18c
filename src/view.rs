//! The list currently on screen and its collapse/expand transitions.
//!
//! Repeat headers toggle between collapsed and expanded. Expanding inserts the header's instance
//! rows directly beneath it; collapsing removes exactly those rows again. Both transitions locate
//! the header by its form index rather than by a screen position.

use crate::element::{ElementKind, HierarchyElement};
use crate::error::{HierarchyError, Result};
use crate::form_index::FormIndex;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
/// One level of the hierarchy as shown to the user.
pub struct HierarchyView {
    /// Breadcrumb of the enclosing repeat context; empty at the top level.
    pub path_text: String,
    /// Whether an enclosing level exists to ascend to.
    pub ascend_enabled: bool,
    /// Visible rows in display order.
    pub elements: Vec<HierarchyElement>,
}

impl HierarchyView {
    #[must_use]
    /// View over freshly built rows, with every repeat header collapsed.
    pub fn new(path_text: String, ascend_enabled: bool, elements: Vec<HierarchyElement>) -> Self {
        Self {
            path_text,
            ascend_enabled,
            elements,
        }
    }

    #[must_use]
    /// An empty view, shown before the first build or after a failed one.
    pub fn empty() -> Self {
        Self::new(String::new(), false, Vec::new())
    }

    #[must_use]
    /// Row at `position`.
    pub fn get(&self, position: usize) -> Option<&HierarchyElement> {
        self.elements.get(position)
    }

    #[must_use]
    /// Number of visible rows.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    #[must_use]
    /// Whether no rows are visible.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    #[must_use]
    /// Position of the visible row that jumps to `index`.
    pub fn position_of(&self, index: &FormIndex) -> Option<usize> {
        self.elements
            .iter()
            .position(|e| e.index.as_ref() == Some(index))
    }

    fn header_position(&self, header: &FormIndex) -> Result<usize> {
        self.elements
            .iter()
            .position(|e| e.is_header() && e.index.as_ref() == Some(header))
            .ok_or_else(|| HierarchyError::invariant(format!("no repeat header at {header}")))
    }

    /// Show the instance rows of the header at `header`. Returns the header's position.
    ///
    /// # Errors
    ///
    /// Returns an error if no visible repeat header has that index.
    pub fn expand(&mut self, header: &FormIndex) -> Result<usize> {
        let position = self.header_position(header)?;
        let row = &mut self.elements[position];
        if row.kind == ElementKind::Collapsed {
            row.kind = ElementKind::Expanded;
            let children = row.children.clone();
            self.elements.splice(position + 1..position + 1, children);
        }
        Ok(position)
    }

    /// Hide the instance rows of the header at `header`. Returns the header's position.
    ///
    /// # Errors
    ///
    /// Returns an error if no visible repeat header has that index, or if the rows beneath an
    /// expanded header are not its instance rows.
    pub fn collapse(&mut self, header: &FormIndex) -> Result<usize> {
        let position = self.header_position(header)?;
        let row = &self.elements[position];
        if row.kind != ElementKind::Expanded {
            return Ok(position);
        }

        let shown = position + 1..position + 1 + row.children.len();
        let matches = self
            .elements
            .get(shown.clone())
            .is_some_and(|rows| rows.iter().eq(row.children.iter()));
        if !matches {
            return Err(HierarchyError::invariant(format!(
                "instance rows of {header} are not directly beneath it"
            )));
        }

        self.elements.drain(shown);
        self.elements[position].kind = ElementKind::Collapsed;
        Ok(position)
    }
}

#[cfg(test)]
#[path = "tests/view.rs"]
mod tests;
