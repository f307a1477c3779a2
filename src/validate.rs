//! Validation of user input before it becomes a factory location.

use std::fmt;

use serde::Serialize;

use crate::location::FactoryLocation;

/// Longest branch name that is accepted.
pub const MAX_BRANCH_NAME_LEN: usize = 256;

/// Outcome of validating a single field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Validated {
    Success,
    Error,
}

impl Validated {
    pub fn is_ok(self) -> bool {
        self == Validated::Success
    }

    fn from_bool(valid: bool) -> Self {
        if valid {
            Validated::Success
        } else {
            Validated::Error
        }
    }
}

impl fmt::Display for Validated {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Validated::Success => write!(f, "success"),
            Validated::Error => write!(f, "error"),
        }
    }
}

/// An http(s) location is always valid, an ssh location only if the user
/// has ssh keys to clone it with.
pub fn validate_location(location: &str, has_ssh_keys: bool) -> Validated {
    let location = location.trim();
    let valid = FactoryLocation::is_http_location(location)
        || (has_ssh_keys && FactoryLocation::is_ssh_location(location));
    Validated::from_bool(valid)
}

/// Branch names consist of ascii alphanumerics and `-./_`.
pub fn validate_branch_name(name: &str) -> Validated {
    let valid = (1..=MAX_BRANCH_NAME_LEN).contains(&name.len())
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '/' | '_'));
    Validated::from_bool(valid)
}
