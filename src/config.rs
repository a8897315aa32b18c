//! Configuration to acknowledge developer preferences as well as set defaults.
//!
//! Specifically, we try to find a form-hierarchy.toml, and if present we load settings from there.
//! This provides the repeat instance indent, the breadcrumb separator and the "up" row options.

use facet::Facet;
use std::fs;
use std::io;
use std::path::Path;

/// File looked up in the working directory when no explicit path is given.
pub const CONFIG_FILE: &str = "form-hierarchy.toml";

const DEFAULT_CHILD_INDENT: &str = "     ";
const DEFAULT_PATH_SEPARATOR: &str = " > ";
const DEFAULT_UP_ROW_LABEL: &str = "..";

#[derive(Facet, Clone, Debug, PartialEq)]
/// User preferences loaded from form-hierarchy.toml or falling back to defaults.
pub struct Config {
    #[facet(default = DEFAULT_CHILD_INDENT.to_string())]
    /// Prefix placed before each repeat instance label.
    pub child_indent: String,
    #[facet(default = DEFAULT_PATH_SEPARATOR.to_string())]
    /// Separator between the captions of the breadcrumb.
    pub path_separator: String,
    #[facet(default = false)]
    /// Prepend a row that ascends one level whenever ascending is possible.
    pub show_up_row: bool,
    #[facet(default = DEFAULT_UP_ROW_LABEL.to_string())]
    /// Label of the ascend row.
    pub up_row_label: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            child_indent: DEFAULT_CHILD_INDENT.to_string(),
            path_separator: DEFAULT_PATH_SEPARATOR.to_string(),
            show_up_row: false,
            up_row_label: DEFAULT_UP_ROW_LABEL.to_string(),
        }
    }
}

impl Config {
    #[must_use]
    /// Load configuration from form-hierarchy.toml if present.
    pub fn load() -> Self {
        Self::load_from(Path::new(CONFIG_FILE))
    }

    #[must_use]
    /// Load configuration from `path`, using defaults when it is missing, unreadable or malformed.
    /// Only a missing file is silent; the other cases log a warning.
    pub fn load_from(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => match facet_toml::from_str::<Self>(&contents) {
                Ok(config) => config,
                Err(e) => {
                    tracing::warn!(path = %path.display(), "ignoring invalid config: {e}");
                    Self::default()
                }
            },
            Err(e) if e.kind() == io::ErrorKind::NotFound => Self::default(),
            Err(e) => {
                tracing::warn!(path = %path.display(), "could not read config: {e}");
                Self::default()
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/config.rs"]
mod tests;
