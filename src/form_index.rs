//! Positions in a form tree and the events a cursor reports at them.
//!
//! A [`FormIndex`] names one node of one filled-in form: the path of node names from the root,
//! with the instance number attached to every step that passes through a repeat. Stripping the
//! instance numbers yields the node's [`Reference`], which is shared by every instance of the
//! same repeat template.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
/// One step of a node path.
pub struct IndexStep {
    /// Node name at this depth.
    pub name: String,
    /// Repeat instance (0-based) when this step enters a repeat.
    pub instance: Option<usize>,
}

impl IndexStep {
    #[must_use]
    /// A step into a plain group or question.
    pub fn node(name: &str) -> Self {
        Self {
            name: name.to_string(),
            instance: None,
        }
    }

    #[must_use]
    /// A step into instance `instance` of a repeat.
    pub fn repeat(name: &str, instance: usize) -> Self {
        Self {
            name: name.to_string(),
            instance: Some(instance),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
/// Position in the form tree, or one of the two sentinels either side of it.
pub enum FormIndex {
    /// Before the first node of the form.
    BeginningOfForm,
    /// After the last node of the form.
    EndOfForm,
    /// A concrete node, addressed by its path from the root.
    Node(Vec<IndexStep>),
}

impl FormIndex {
    #[must_use]
    /// Sentinel placed before the first event of the form.
    pub fn beginning_of_form() -> Self {
        Self::BeginningOfForm
    }

    #[must_use]
    /// Sentinel placed after the last event of the form.
    pub fn end_of_form() -> Self {
        Self::EndOfForm
    }

    #[must_use]
    /// The instance-free path of this index. Sentinels have the empty reference.
    pub fn reference(&self) -> Reference {
        match self {
            Self::Node(steps) => Reference(steps.iter().map(|s| s.name.clone()).collect()),
            Self::BeginningOfForm | Self::EndOfForm => Reference::default(),
        }
    }

    #[must_use]
    /// Instance number of the innermost repeat step, or 0 outside any repeat.
    pub fn multiplicity(&self) -> usize {
        match self {
            Self::Node(steps) => steps.last().and_then(|s| s.instance).unwrap_or(0),
            Self::BeginningOfForm | Self::EndOfForm => 0,
        }
    }

    #[must_use]
    /// The steps of a node index; empty for sentinels.
    pub fn steps(&self) -> &[IndexStep] {
        match self {
            Self::Node(steps) => steps,
            Self::BeginningOfForm | Self::EndOfForm => &[],
        }
    }

    #[must_use]
    /// The same node with the instance number of its last step removed, naming a repeat as a
    /// whole rather than one of its instances.
    pub fn template(&self) -> Self {
        match self {
            Self::Node(steps) => {
                let mut steps = steps.clone();
                if let Some(last) = steps.last_mut() {
                    last.instance = None;
                }
                Self::Node(steps)
            }
            Self::BeginningOfForm | Self::EndOfForm => self.clone(),
        }
    }

    #[must_use]
    /// Index of the node one level up, or `None` at the top level and for sentinels.
    pub fn parent(&self) -> Option<Self> {
        match self {
            Self::Node(steps) if steps.len() > 1 => {
                Some(Self::Node(steps[..steps.len() - 1].to_vec()))
            }
            _ => None,
        }
    }
}

impl fmt::Display for FormIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BeginningOfForm => f.write_str("<beginning>"),
            Self::EndOfForm => f.write_str("<end>"),
            Self::Node(steps) => {
                for step in steps {
                    write!(f, "/{}", step.name)?;
                    if let Some(instance) = step.instance {
                        write!(f, "[{instance}]")?;
                    }
                }
                Ok(())
            }
        }
    }
}

#[derive(Debug, PartialEq, Eq, Error)]
#[error("invalid form index '{0}'")]
/// Returned when a string is not a valid [`FormIndex`].
pub struct ParseIndexError(pub String);

impl FromStr for FormIndex {
    type Err = ParseIndexError;

    /// Parses `/group/repeat[1]/question`, `<beginning>` or `<end>`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "<beginning>" => return Ok(Self::BeginningOfForm),
            "<end>" => return Ok(Self::EndOfForm),
            _ => {}
        }
        let invalid = || ParseIndexError(s.to_string());
        let rest = s.strip_prefix('/').ok_or_else(invalid)?;
        let mut steps = Vec::new();
        for part in rest.split('/') {
            let step = match part.split_once('[') {
                Some((name, tail)) => {
                    let instance = tail
                        .strip_suffix(']')
                        .and_then(|n| n.parse::<usize>().ok())
                        .ok_or_else(invalid)?;
                    IndexStep::repeat(name, instance)
                }
                None => IndexStep::node(part),
            };
            if step.name.is_empty() {
                return Err(invalid());
            }
            steps.push(step);
        }
        Ok(Self::Node(steps))
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
/// Instance-free node path, identical for every instance of a repeat template.
pub struct Reference(Vec<String>);

impl Reference {
    #[must_use]
    /// True for the empty reference (top level, or a sentinel).
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    /// True when `self` is `ancestor` or lies beneath it. Compares whole segments, so `/R` does
    /// not contain `/R2/q`.
    pub fn is_within(&self, ancestor: &Self) -> bool {
        self.0.starts_with(&ancestor.0)
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for name in &self.0 {
            write!(f, "/{name}")?;
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
/// What the cursor is positioned on.
pub enum Event {
    /// The beginning-of-form sentinel.
    Begin,
    /// A non-repeating group.
    Group,
    /// One actual instance of a repeat.
    Repeat,
    /// The trailing pseudo-event offering to add another repeat instance.
    PromptNewRepeat,
    /// A question.
    Question,
    /// The end-of-form sentinel.
    End,
}

#[cfg(test)]
#[path = "tests/form_index.rs"]
mod tests;
