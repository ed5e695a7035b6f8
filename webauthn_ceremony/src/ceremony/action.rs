use serde::Serialize;

use super::errors::CeremonyError;

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Error,
}

/// Outcome of a user-triggered ceremony, ready for display.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ActionResult {
    pub severity: Severity,
    pub message: String,
}

impl ActionResult {
    pub fn registered() -> Self {
        Self {
            severity: Severity::Success,
            message: "Registration Successful! Now try Login.".to_string(),
        }
    }

    pub fn authenticated() -> Self {
        Self {
            severity: Severity::Success,
            message: "Authentication Successful!".to_string(),
        }
    }

    pub fn from_error(error: &CeremonyError) -> Self {
        Self {
            severity: Severity::Error,
            message: error.to_string(),
        }
    }
}
