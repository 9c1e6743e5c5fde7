use crate::{catalog::PartitionError, codec::DecodeError, config::ConfigError};
use std::fmt;
use thiserror::Error as ThisError;

///
/// InternalError
///
/// Structured construction error with a stable internal classification.
/// Every error surfaced by plan construction is an upstream planning bug or a
/// broken environment, never a user SQL error.
///

#[derive(Debug, ThisError)]
#[error("{message}")]
pub struct InternalError {
    pub class: ErrorClass,
    pub origin: ErrorOrigin,
    pub message: String,

    /// Optional structured error detail.
    /// The variant (if present) must correspond to `origin`.
    pub detail: Option<ErrorDetail>,
}

impl InternalError {
    /// Construct an InternalError without origin-specific detail.
    pub fn new(class: ErrorClass, origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self {
            class,
            origin,
            message: message.into(),
            detail: None,
        }
    }

    /// Construct a plan-origin invariant violation.
    pub(crate) fn plan_invariant(message: impl Into<String>) -> Self {
        Self::new(
            ErrorClass::InvariantViolation,
            ErrorOrigin::Plan,
            message.into(),
        )
    }

    /// Construct a route-origin invariant violation.
    pub(crate) fn route_invariant(message: impl Into<String>) -> Self {
        Self::new(
            ErrorClass::InvariantViolation,
            ErrorOrigin::Route,
            message.into(),
        )
    }

    #[must_use]
    pub const fn is_invariant_violation(&self) -> bool {
        matches!(self.class, ErrorClass::InvariantViolation)
    }

    #[must_use]
    pub fn display_with_class(&self) -> String {
        format!("{}:{}: {}", self.origin, self.class, self.message)
    }
}

///
/// ErrorDetail
///
/// Structured, origin-specific error detail carried by [`InternalError`].
///

#[derive(Debug, ThisError)]
pub enum ErrorDetail {
    #[error("{0}")]
    Codec(DecodeError),
    #[error("{0}")]
    Partition(PartitionError),
    #[error("{0}")]
    Config(ConfigError),
}

impl From<DecodeError> for InternalError {
    fn from(err: DecodeError) -> Self {
        Self {
            class: ErrorClass::Corruption,
            origin: ErrorOrigin::Codec,
            message: err.to_string(),
            detail: Some(ErrorDetail::Codec(err)),
        }
    }
}

impl From<PartitionError> for InternalError {
    fn from(err: PartitionError) -> Self {
        Self {
            class: ErrorClass::Unsupported,
            origin: ErrorOrigin::Partition,
            message: err.to_string(),
            detail: Some(ErrorDetail::Partition(err)),
        }
    }
}

impl From<ConfigError> for InternalError {
    fn from(err: ConfigError) -> Self {
        Self {
            class: ErrorClass::Internal,
            origin: ErrorOrigin::Config,
            message: err.to_string(),
            detail: Some(ErrorDetail::Config(err)),
        }
    }
}

///
/// ErrorClass
/// Internal error taxonomy for construction-time classification.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorClass {
    Corruption,
    Internal,
    Unsupported,
    InvariantViolation,
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Corruption => "corruption",
            Self::Internal => "internal",
            Self::Unsupported => "unsupported",
            Self::InvariantViolation => "invariant_violation",
        };
        write!(f, "{label}")
    }
}

///
/// ErrorOrigin
/// Internal origin taxonomy for construction-time classification.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorOrigin {
    Plan,
    Route,
    Partition,
    Codec,
    Config,
}

impl fmt::Display for ErrorOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Plan => "plan",
            Self::Route => "route",
            Self::Partition => "partition",
            Self::Codec => "codec",
            Self::Config => "config",
        };
        write!(f, "{label}")
    }
}
