//! Validation error for domain constructors.

use derive_more::{Display, Error};

/// Rejected input for a rule set or lineup, with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("Validation error: {} at {}:{}", message, file, line)]
pub struct ValidationError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ValidationError {
    /// Creates a new validation error with caller location tracking.
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}
