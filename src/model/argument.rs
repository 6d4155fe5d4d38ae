//! Argument definitions
//!
//! One positional argument of a command's usage string.

use serde::{Deserialize, Serialize};

/// A positional argument
///
/// Serialized with a `type` tag, e.g. `{"type": "Required", "name": "player"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Argument {
    /// `<name>`
    Required { name: String },

    /// `[name]` or `[<name>]`
    Optional { name: String },

    /// `(a|b)` or `<a|b>`
    RequiredChoice { name: String, options: Vec<String> },

    /// `[a|b]` or `[<a|b>]`
    OptionalChoice { name: String, options: Vec<String> },
}

impl Argument {
    /// Build a required choice; unlabeled choices are named after their options
    pub fn required_choice(options: Vec<String>) -> Self {
        Argument::RequiredChoice {
            name: options.join("|"),
            options,
        }
    }

    /// Build an optional choice; unlabeled choices are named after their options
    pub fn optional_choice(options: Vec<String>) -> Self {
        Argument::OptionalChoice {
            name: options.join("|"),
            options,
        }
    }

    /// The argument's name
    pub fn name(&self) -> &str {
        match self {
            Argument::Required { name }
            | Argument::Optional { name }
            | Argument::RequiredChoice { name, .. }
            | Argument::OptionalChoice { name, .. } => name,
        }
    }

    /// Fixed options, for choice arguments
    pub fn options(&self) -> Option<&[String]> {
        match self {
            Argument::RequiredChoice { options, .. } | Argument::OptionalChoice { options, .. } => {
                Some(options)
            }
            Argument::Required { .. } | Argument::Optional { .. } => None,
        }
    }

    /// Whether the argument may be left out
    pub fn is_optional(&self) -> bool {
        matches!(self, Argument::Optional { .. } | Argument::OptionalChoice { .. })
    }
}
