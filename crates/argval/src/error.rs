//! Error taxonomy.
//!
//! Every failure aborts the current `parse()` call. Misconfiguration is
//! reported when a declaration is registered, never deferred to parsing.

use std::fmt;
use thiserror::Error;

/// Malformed argv, detected while tokenizing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenizeError {
    #[error("option given without value: {option}")]
    MissingValue { option: String },
}

/// An invalid declaration, reported at registration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MisconfigurationError {
    #[error("identifier must not be empty")]
    EmptyIdentifier,

    #[error("ambiguous identifier '{identifier}': already declared by '{existing}'")]
    AmbiguousIdentifier { identifier: String, existing: String },

    #[error("argument '{identifier}' is variadic, but '{existing}' already is")]
    DuplicateVariadic { identifier: String, existing: String },

    #[error(
        "argument '{identifier}' at position {position} would follow variadic argument '{variadic}' at position {variadic_position}"
    )]
    ArgumentAfterVariadic {
        identifier: String,
        position: usize,
        variadic: String,
        variadic_position: usize,
    },

    #[error("arguments '{identifier}' and '{existing}' share position {position}")]
    DuplicatePosition {
        identifier: String,
        existing: String,
        position: usize,
    },

    #[error("set filter needs at least one allowed value")]
    EmptySet,

    #[error("any filter needs at least one child filter")]
    EmptyAny,

    #[error("split filter needs a non-empty separator")]
    EmptySeparator,

    #[error("radix {0} is not within 2..=36")]
    InvalidRadix(u32),

    #[error("lower bound {min} exceeds upper bound {max}")]
    InvalidBounds { min: String, max: String },

    #[error("invalid pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    #[error("pattern '{pattern}' has no capture group {group}")]
    InvalidGroup { pattern: String, group: usize },

    #[error("invalid environment: {0}")]
    InvalidEnvironment(String),

    #[error("rule references unknown identifier '{0}'")]
    UnknownIdentifier(String),

    #[error("{0} rule needs at least one child rule")]
    EmptyCombinator(&'static str),

    #[error("command '{name}' conflicts with '{existing}'")]
    DuplicateCommand { name: String, existing: String },
}

/// What kind of constraint a raw value violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// Wrong shape (not a number, not UTF-8 digits in the radix, ...).
    Format,
    /// Well formed, but outside the accepted window.
    Range,
    /// Did not match a pattern.
    NoMatch,
    /// Not one of the allowed values.
    NotAllowed,
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Format => write!(f, "format"),
            Self::Range => write!(f, "range"),
            Self::NoMatch => write!(f, "no-match"),
            Self::NotAllowed => write!(f, "not-allowed"),
        }
    }
}

/// A raw value rejected by a [`Filter`](crate::filter::Filter).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub message: String,
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn format(message: impl Into<String>) -> Self {
        Self::new(ParseErrorKind::Format, message)
    }

    pub fn range(message: impl Into<String>) -> Self {
        Self::new(ParseErrorKind::Range, message)
    }
}

/// A missing value or a failed cross-field rule.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("value required: {identifier}")]
    MissingValue { identifier: String },

    #[error("unknown flag: {0}")]
    UnknownFlag(String),

    #[error("unknown option: {0}")]
    UnknownOption(String),

    #[error("unexpected argument: {0}")]
    UnexpectedArgument(String),

    #[error("no command given")]
    MissingCommand,

    #[error("unknown command: {0}")]
    UnknownCommand(String),

    #[error("{message}")]
    Rule {
        message: String,
        #[source]
        cause: Option<Box<ValidationError>>,
    },
}

impl ValidationError {
    pub fn rule(message: impl Into<String>) -> Self {
        Self::Rule {
            message: message.into(),
            cause: None,
        }
    }

    pub fn rule_caused_by(message: impl Into<String>, cause: ValidationError) -> Self {
        Self::Rule {
            message: message.into(),
            cause: Some(Box::new(cause)),
        }
    }
}

/// Any failure surfaced by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error(transparent)]
    Tokenize(#[from] TokenizeError),

    #[error(transparent)]
    Misconfiguration(#[from] MisconfigurationError),

    #[error("invalid value '{value}' for '{identifier}': {source}")]
    Filter {
        identifier: String,
        value: String,
        #[source]
        source: ParseError,
    },

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
