//! form-hierarchy: collapsible hierarchy navigation for repeat-structured forms.
//!
//! A form engine exposes a forward cursor over events (groups, repeats, questions) and positional
//! indices. This crate projects that stream onto one navigable level at a time: the questions of
//! the enclosing repeat instance, with every nested repeat folded into a header that expands to
//! list its instances. Selecting a row turns back into a jump on the cursor.
//!
//! The core ([`builder`], [`view`], [`dispatch`], [`path`]) only talks to a [`cursor::FormCursor`];
//! [`session`] wires it to a host, [`memory`] provides a cursor over a JSON form outline and
//! [`ui`] draws the screen in a terminal.

pub mod builder;
pub mod config;
pub mod cursor;
pub mod dispatch;
pub mod element;
pub mod error;
pub mod form_index;
pub mod memory;
pub mod path;
pub mod session;
pub mod ui;
pub mod view;

#[cfg(test)]
#[path = "tests/fixtures.rs"]
mod fixtures;
