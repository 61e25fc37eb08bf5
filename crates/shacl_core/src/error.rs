//! Error types for the SHACL engine.
//!
//! Errors only ever surface when a constraint is built from malformed
//! configuration, or when a report is exported. Evaluation itself never fails:
//! problems with the data are reported as validation results.

use thiserror::Error;

/// Result type for SHACL operations.
pub type Result<T> = std::result::Result<T, ShaclError>;

/// Main error type for SHACL operations.
#[derive(Error, Debug)]
pub enum ShaclError {
    /// A constraint could not be built
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Raised when a constraint is constructed from missing or malformed
/// configuration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    /// A required parameter was not supplied
    #[error("Cannot create {constraint}: required parameter '{parameter}' is missing")]
    MissingParameter {
        /// Constraint being built
        constraint: &'static str,
        /// Name of the missing parameter
        parameter: &'static str,
    },

    /// The regular expression does not compile
    #[error("Invalid regex pattern '{pattern}': {message}")]
    InvalidPattern {
        /// Pattern source
        pattern: String,
        /// Compiler error
        message: String,
    },

    /// A regex flag has no equivalent in the regex engine
    #[error("Unsupported regex flag '{flag}' (supported flags: i, s, m, x)")]
    UnsupportedFlag {
        /// Offending flag character
        flag: char,
    },

    /// A parameter is present but structurally invalid
    #[error("Invalid value for {constraint}: {message}")]
    InvalidValue {
        /// Constraint being built
        constraint: &'static str,
        /// Description of the problem
        message: String,
    },
}

impl ConfigurationError {
    /// Creates a missing parameter error.
    pub fn missing(constraint: &'static str, parameter: &'static str) -> Self {
        Self::MissingParameter {
            constraint,
            parameter,
        }
    }

    /// Creates an invalid value error.
    pub fn invalid_value(constraint: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            constraint,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = ConfigurationError::missing("PatternConstraint", "pattern");
        assert_eq!(
            err.to_string(),
            "Cannot create PatternConstraint: required parameter 'pattern' is missing"
        );

        let err: ShaclError = ConfigurationError::UnsupportedFlag { flag: 'q' }.into();
        assert!(err.to_string().contains("'q'"));
    }
}
