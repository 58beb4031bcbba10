//! CLI error types
//!
//! Every failure becomes a stable snake_case code plus a message, so the
//! JSON error output is scriptable. Store failures keep the code from
//! `StoreError::code`; validation failures additionally carry their
//! violation list as structured details.

use std::fmt;
use std::io;

use serde_json::Value;

use crate::config::ConfigError;
use crate::domain::StoreError;

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;

/// CLI error: a stable code, a human message, optional structured details.
#[derive(Debug)]
pub struct CliError {
    code: String,
    message: String,
    details: Option<Value>,
}

impl CliError {
    /// Create a new CLI error
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Attach structured details to the error
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Configuration problem
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::new("config_error", message)
    }

    /// stdin/stdout problem
    pub fn io_error(message: impl Into<String>) -> Self {
        Self::new("io_error", message)
    }

    /// Get the error code
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the structured details, if any
    pub fn details(&self) -> Option<&Value> {
        self.details.as_ref()
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for CliError {}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::io_error(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::io_error(format!("JSON error: {}", e))
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        Self::config_error(e.to_string())
    }
}

impl From<StoreError> for CliError {
    fn from(e: StoreError) -> Self {
        let mut error = Self::new(e.code(), e.to_string());
        if let Some(violations) = e.violations() {
            if let Ok(details) = serde_json::to_value(violations) {
                error = error.with_details(details);
            }
        }
        error
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Violation;
    use serde_json::json;

    #[test]
    fn test_store_errors_keep_their_code() {
        let err: CliError = StoreError::VersionConflict {
            expected: 1,
            actual: 2,
        }
        .into();
        assert_eq!(err.code(), "version_conflict");
        assert!(err.details().is_none());
    }

    #[test]
    fn test_validation_failure_carries_violations_as_details() {
        let err: CliError = StoreError::ValidationFailed(vec![Violation::new(
            "Missing required field: title",
            vec!["title".into()],
            "required",
            json!(["title"]),
        )])
        .into();

        assert_eq!(err.code(), "validation_failed");
        let details = err.details().expect("details");
        assert_eq!(details[0]["rule"], "required");
    }

    #[test]
    fn test_display_is_code_and_message() {
        let err = CliError::config_error("bad config");
        assert_eq!(format!("{}", err), "config_error: bad config");
    }
}
