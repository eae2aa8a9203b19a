//! Domain models for the patient record client.

mod diagnosis;
mod entry;
mod patient;

pub use diagnosis::*;
pub use entry::*;
pub use patient::*;

use thiserror::Error;

/// Errors raised while constructing domain values from untyped input.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    #[error("Unknown entry type: {0}")]
    UnknownEntryType(String),

    #[error("Health check rating out of range: {0}")]
    InvalidHealthCheckRating(u8),
}
