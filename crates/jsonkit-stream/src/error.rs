//! Parse and generation errors.

use std::io;

use jsonkit_value::ValueError;
use thiserror::Error;

use crate::generator::GeneratorState;
use crate::source::Location;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("SYNTAX: {message} at {location}")]
    Syntax { message: String, location: Location },
    #[error("UNEXPECTED_EOF at {location}")]
    UnexpectedEof { location: Location },
    #[error("UNKNOWN_KEYWORD: {keyword:?} at {location}")]
    UnknownKeyword { keyword: String, location: Location },
    #[error("NO_MORE_EVENTS")]
    NoMoreEvents,
    /// Raised while materializing a value, e.g. a duplicate key under
    /// [`DuplicateKeyPolicy::None`](jsonkit_value::DuplicateKeyPolicy::None).
    #[error(transparent)]
    Value(#[from] ValueError),
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl ParseError {
    pub(crate) fn syntax(message: impl Into<String>, location: Location) -> Self {
        ParseError::Syntax {
            message: message.into(),
            location,
        }
    }

    /// Where the error was detected, when known.
    pub fn location(&self) -> Option<Location> {
        match self {
            ParseError::Syntax { location, .. }
            | ParseError::UnexpectedEof { location }
            | ParseError::UnknownKeyword { location, .. } => Some(*location),
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("INVALID_STATE: {operation} in state {state}")]
    InvalidState {
        operation: &'static str,
        state: GeneratorState,
    },
    #[error("NOT_FINITE")]
    NotFinite,
    #[error(transparent)]
    Io(#[from] io::Error),
}
