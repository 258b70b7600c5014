//! Typed failures raised by the glean pipeline.
//!
//! Everything else (filesystem, invoked-method failures, factory failures) travels as a
//! plain `anyhow::Error` so the original error stays downcastable at the top level.

use thiserror::Error;

/// Command input rejected before anything is invoked.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("The 'name' option must have a value")]
    MissingName,
}

/// Class or method lookup failures.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResolutionError {
    #[error("Class {0} does not exist")]
    UnknownClass(String),

    #[error("Method {class}::{method}() does not exist")]
    UnknownMethod { class: String, method: String },

    #[error("Target [{0}] is not instantiable")]
    NotInstantiable(String),

    /// The container produced an instance of a different type than the method expects.
    #[error("Container binding for [{0}] produced an instance of the wrong type")]
    ReceiverType(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SerializeError {
    #[error("The format \"{0}\" is not supported for serialization")]
    UnsupportedFormat(String),

    #[error("character U+{0:04X} cannot be represented in XML 1.0")]
    XmlChar(u32),
}

/// Parse failures when reading a native literal fixture back.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LiteralError {
    #[error("missing `<?php` open tag")]
    MissingOpenTag,

    #[error("expected {expected} at offset {offset}")]
    Expected {
        expected: &'static str,
        offset: usize,
    },

    #[error("unterminated string starting at offset {0}")]
    UnterminatedString(usize),

    #[error("invalid number `{text}` at offset {offset}")]
    InvalidNumber { text: String, offset: usize },

    #[error("`.` can only join strings (offset {0})")]
    ConcatNonString(usize),

    #[error("cannot append at offset {0}: the next array index is already occupied")]
    NextIndexOccupied(usize),

    #[error("trailing input at offset {0}")]
    TrailingInput(usize),
}
