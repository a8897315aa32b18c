//! Projects the form's event stream onto one level of the hierarchy.
//!
//! The level shown is the body of the repeat instance enclosing the cursor, or the whole top
//! level when no repeat encloses it. Every repeat met at that level is folded into one collapsed
//! header carrying a row per instance; the questions inside those repeats stay hidden until the
//! user descends into an instance.
//!
//! The cursor is moved while the level is read and is always jumped back to where it started.

use crate::config::Config;
use crate::cursor::FormCursor;
use crate::element::HierarchyElement;
use crate::error::{HierarchyError, Result};
use crate::form_index::{Event, FormIndex, Reference};
use crate::path::PathFormatter;
use crate::view::HierarchyView;
use tracing::{debug, error};

/// Builds the visible list for the level enclosing the cursor.
pub struct HierarchyBuilder<'a> {
    config: &'a Config,
}

impl<'a> HierarchyBuilder<'a> {
    #[must_use]
    /// Builder using the labels and separators from `config`.
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    /// Build the view for the level enclosing the cursor's current index.
    ///
    /// The cursor is back at its starting index when this returns, whether or not the build
    /// succeeded.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by the cursor while traversing the level.
    pub fn build(&self, cursor: &mut dyn FormCursor) -> Result<HierarchyView> {
        let saved = cursor.current_index();
        let built = self.build_level(cursor, &saved);
        let restored = cursor.jump_to(&saved);

        match (built, restored) {
            (Ok(view), Ok(_)) => Ok(view),
            (Ok(_), Err(e)) => {
                error!(index = %saved, "could not restore cursor after build: {e}");
                Err(e.into())
            }
            (Err(e), restored) => {
                if let Err(restore_err) = restored {
                    error!(index = %saved, "could not restore cursor after failed build: {restore_err}");
                }
                Err(e)
            }
        }
    }

    fn build_level(&self, cursor: &mut dyn FormCursor, saved: &FormIndex) -> Result<HierarchyView> {
        let scope = Self::enter_scope(cursor, saved)?;
        let enclosing = scope.as_ref().map(FormIndex::reference).unwrap_or_default();
        debug!(start = %saved, enclosing = %enclosing, "building hierarchy level");

        let (path_text, ascend_enabled) = if cursor.event() == Event::Begin {
            cursor.step_next(true)?;
            (String::new(), false)
        } else {
            let formatter = PathFormatter::new(&self.config.path_separator);
            let path = match &scope {
                Some(scope) => formatter.format_scope(cursor, scope)?,
                None => formatter.format(cursor, saved)?,
            };
            (path, true)
        };

        let mut elements = self.collect_level(cursor, &enclosing)?;
        if ascend_enabled && self.config.show_up_row {
            elements.insert(0, HierarchyElement::up(&self.config.up_row_label));
        }

        Ok(HierarchyView::new(path_text, ascend_enabled, elements))
    }

    /// Position the cursor on the first event of the level to show and return the repeat
    /// instance enclosing that level, if any.
    fn enter_scope(cursor: &mut dyn FormCursor, saved: &FormIndex) -> Result<Option<FormIndex>> {
        if cursor.event() == Event::Repeat {
            cursor.step_next(true)?;
            return Ok(Some(saved.clone()));
        }

        let Some(ancestor) = Self::nearest_non_group(cursor, saved)? else {
            cursor.jump_to(&FormIndex::beginning_of_form())?;
            return Ok(None);
        };

        if cursor.jump_to(&ancestor)? == Event::Repeat {
            cursor.step_next(true)?;
            Ok(Some(ancestor))
        } else {
            Ok(None)
        }
    }

    /// Walk outward from `index` past plain groups.
    fn nearest_non_group(cursor: &dyn FormCursor, index: &FormIndex) -> Result<Option<FormIndex>> {
        let mut ancestor = cursor.step_out(index);
        while let Some(candidate) = ancestor {
            if cursor.event_at(&candidate)? != Event::Group {
                return Ok(Some(candidate));
            }
            ancestor = cursor.step_out(&candidate);
        }
        Ok(None)
    }

    /// Read events until the level ends, folding repeats into headers.
    fn collect_level(
        &self,
        cursor: &mut dyn FormCursor,
        enclosing: &Reference,
    ) -> Result<Vec<HierarchyElement>> {
        let mut elements: Vec<HierarchyElement> = Vec::new();
        // Repeat whose instances are currently being folded under the last header.
        let mut active = Reference::default();

        let mut event = cursor.event();
        while event != Event::End {
            let reference = cursor.current_index().reference();
            match event {
                Event::Question => {
                    if !enclosing.is_empty() && !reference.is_within(enclosing) {
                        break;
                    }
                    if !active.is_empty() && !reference.is_within(&active) {
                        active = Reference::default();
                    }
                    if active.is_empty() {
                        let prompt = cursor.question_prompt()?;
                        if !prompt.read_only || prompt.has_label {
                            elements.push(HierarchyElement::question(prompt));
                        } else {
                            debug!(index = %prompt.index, "omitting unlabelled read-only question");
                        }
                    }
                }
                Event::PromptNewRepeat => {
                    if reference == *enclosing {
                        break;
                    }
                    if reference == active {
                        active = Reference::default();
                    }
                }
                Event::Repeat => {
                    if reference == *enclosing {
                        break;
                    }
                    let caption = cursor.caption_prompt()?;
                    if active.is_empty() && caption.multiplicity == 0 {
                        elements.push(HierarchyElement::repeat_header(&caption));
                        active = reference.clone();
                    }
                    if reference == active {
                        let header = elements
                            .last_mut()
                            .filter(|h| h.is_header())
                            .ok_or_else(|| {
                                HierarchyError::invariant(format!(
                                    "repeat instance {} has no header",
                                    caption.index
                                ))
                            })?;
                        header.children.push(HierarchyElement::repeat_instance(
                            &caption,
                            &self.config.child_indent,
                        ));
                    }
                }
                Event::Begin | Event::Group | Event::End => {}
            }
            event = cursor.step_next(true)?;
        }

        Ok(elements)
    }
}

#[cfg(test)]
#[path = "tests/builder.rs"]
mod tests;
