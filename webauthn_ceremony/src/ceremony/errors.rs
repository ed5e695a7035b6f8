use thiserror::Error;

use crate::client::TransportError;
use crate::storage::StorageError;
use crate::utils::UtilError;

/// Rejections raised by the platform ceremony capability.
///
/// Each variant carries the platform's own description.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PlatformError {
    /// The user dismissed the prompt or the ceremony was aborted
    #[error("{0}")]
    Cancelled(String),

    /// The platform-imposed timeout elapsed
    #[error("{0}")]
    TimedOut(String),

    /// No eligible authenticator or unsupported parameters
    #[error("{0}")]
    NotSupported(String),

    /// Hardware or any other platform failure
    #[error("{0}")]
    Other(String),
}

/// Errors that can occur while running a registration or authentication ceremony.
///
/// The display string of every variant is the single human-readable message
/// handed back to the caller.
#[derive(Debug, Error)]
pub enum CeremonyError {
    /// The platform ceremony capability rejected the request
    #[error("{0}")]
    Platform(#[from] PlatformError),

    /// Malformed binary/text input
    #[error("Encoding error: {0}")]
    Encoding(#[from] UtilError),

    /// The known-credential record could not be written
    #[error("{0}")]
    Storage(#[from] StorageError),

    /// The remote verifier rejected the envelope or could not be reached
    #[error("{0}")]
    Transport(#[from] TransportError),

    /// Missing or invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Caller-supplied ceremony parameters are unusable
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
