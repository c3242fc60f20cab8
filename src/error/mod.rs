//! Error definitions
//!
//! This module provides error types for testkit-doubles.
//!
//! Only configuration mistakes and scripted faults are errors. An expectation
//! that was not met is never an error: it shows up as a failed
//! [`Outcome`](crate::report::Outcome) when the double is verified.

use std::convert::Infallible;

use thiserror::Error;

use crate::mock::Fault;

/// Main error type for testkit-doubles
#[derive(Error, Debug, Clone)]
pub enum Error {
    /// An action or expectation named an operation the contract does not have
    #[error("{contract} has no operation named `{operation}`")]
    UnknownOperation {
        /// Name of the contract the double stands in for.
        contract: String,
        /// The operation that was asked for.
        operation: String,
    },

    /// An argument pattern was neither a list nor the match-all sentinel
    #[error("Malformed pattern: expected arguments must be a list, got {0}")]
    MalformedPattern(String),

    /// A regular expression in a pattern expectation failed to compile
    #[error("Invalid pattern expectation: {0}")]
    InvalidPattern(#[from] regex::Error),

    /// A fault scripted on the double
    #[error("{0}")]
    Thrown(Fault),

    /// A real handler behind a partial double failed
    #[error("Handler error: {0}")]
    Handler(String),
}

impl Error {
    /// Create an unknown operation error.
    #[must_use]
    pub fn unknown_operation(contract: impl Into<String>, operation: impl Into<String>) -> Self {
        Self::UnknownOperation {
            contract: contract.into(),
            operation: operation.into(),
        }
    }

    /// Create a malformed pattern error.
    #[must_use]
    pub fn malformed_pattern(found: impl Into<String>) -> Self {
        Self::MalformedPattern(found.into())
    }

    /// Create a handler error.
    #[must_use]
    pub fn handler(message: impl Into<String>) -> Self {
        Self::Handler(message.into())
    }

    /// Returns the scripted fault if this error carries one.
    #[must_use]
    pub fn as_fault(&self) -> Option<&Fault> {
        match self {
            Self::Thrown(fault) => Some(fault),
            _ => None,
        }
    }

    /// Returns true for errors raised while configuring a double.
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::UnknownOperation { .. } | Self::MalformedPattern(_) | Self::InvalidPattern(_)
        )
    }
}

impl From<Infallible> for Error {
    fn from(never: Infallible) -> Self {
        match never {}
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_operation_message() {
        let err = Error::unknown_operation("Dummy", "a_missing_method");
        assert_eq!(
            err.to_string(),
            "Dummy has no operation named `a_missing_method`"
        );
        assert!(err.is_configuration());
    }

    #[test]
    fn test_thrown_is_not_configuration() {
        let err = Error::Thrown(Fault::new("Ouch"));
        assert!(!err.is_configuration());
        assert_eq!(err.as_fault().map(Fault::message), Some("Ouch".to_string()));
        assert_eq!(err.to_string(), "Ouch");
    }

    #[test]
    fn test_invalid_regex_converts() {
        let err: Error = regex::Regex::new("(").unwrap_err().into();
        assert!(matches!(err, Error::InvalidPattern(_)));
        assert!(err.is_configuration());
    }
}
