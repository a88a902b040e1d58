//! Error types for argument resolution and execution

use crate::executor::HookError;
use crate::value::ValueError;
use std::sync::Arc;
use thiserror::Error;

/// Result type for argbind operations
pub type ArgsResult<T> = Result<T, ArgsError>;

/// Errors reported while resolving an argument vector or running hooks.
///
/// Schema-definition mistakes (bad short names, global collisions, duplicate
/// flags) are not represented here: they panic at registration time.
#[derive(Debug, Error)]
pub enum ArgsError {
    /// The argument vector was empty
    #[error("missing program name")]
    MissingProgramName,

    /// Unknown root or subcommand
    #[error("command not found: {0}")]
    CommandNotFound(String),

    /// Unknown flag for the current command
    #[error("no such flag: {0}")]
    FlagNotFound(String),

    /// A flag expecting a value was the last token
    #[error("missing value for flag: {0}")]
    MissingValue(String),

    /// More values than a fixed-length array can hold
    #[error("array over capacity: {flag} accepts at most {capacity} values")]
    ArrayOverCapacity {
        /// Long flag name
        flag: String,
        /// Declared array length
        capacity: usize,
    },

    /// A required flag was never supplied
    #[error("required flag not set: {0}")]
    RequiredFlagMissing(String),

    /// A positional token with no argument to bind it to
    #[error("unexpected argument: {0}")]
    UnexpectedArgument(String),

    /// Malformed text for a scalar or element
    #[error("invalid value {value:?} for {flag}: {reason}")]
    InvalidValue {
        /// Long flag name
        flag: String,
        /// Raw text supplied
        value: String,
        /// Why the conversion failed
        reason: String,
    },

    /// Label not present in the enum table of the flag's type
    #[error("invalid value {value:?} for {flag}: expected one of {expected}")]
    InvalidEnumValue {
        /// Long flag name
        flag: String,
        /// Raw text supplied
        value: String,
        /// Accepted labels, comma separated
        expected: String,
    },

    /// A custom text parser rejected its input
    #[error("failed to parse {flag}: {source}")]
    TextParse {
        /// Long flag name
        flag: String,
        /// Error returned by the parser
        #[source]
        source: anyhow::Error,
    },

    /// A path could not be followed into the bound record
    #[error("field binding failed: {0}")]
    Unbound(String),

    /// A lifecycle hook failed
    #[error("{0}")]
    Hook(Arc<HookError>),

    /// Parser configuration could not be loaded
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ArgsError {
    /// Create a config error with context
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    /// Create an unbound-field error with context
    pub fn unbound<S: Into<String>>(msg: S) -> Self {
        Self::Unbound(msg.into())
    }

    /// Create an invalid-value error for `flag`
    pub fn invalid_value(flag: &str, value: &str, reason: impl std::fmt::Display) -> Self {
        Self::InvalidValue {
            flag: flag.to_string(),
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Map a value conversion failure onto the flag that caused it
    pub(crate) fn from_value(flag: &str, value: &str, err: ValueError) -> Self {
        match err {
            ValueError::Capacity(capacity) => Self::ArrayOverCapacity {
                flag: flag.to_string(),
                capacity,
            },
            other => Self::invalid_value(flag, value, other),
        }
    }

    /// The hook failure, if this error came from the execution engine
    pub fn as_hook(&self) -> Option<&HookError> {
        match self {
            Self::Hook(err) => Some(err),
            _ => None,
        }
    }
}

impl From<toml::de::Error> for ArgsError {
    fn from(err: toml::de::Error) -> Self {
        ArgsError::Config(err.to_string())
    }
}
