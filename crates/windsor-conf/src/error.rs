//! Error types for loading configurations.
//!
//! This module provides the main error type [`WindsorConfError`] which wraps
//! the failures that can occur while reading, parsing, or rendering a
//! configuration.

use std::io;

use thiserror::Error;

use windsor_conf_parser::{OptionsError, error::ParseError};

/// The main error type for configuration loading.
///
/// # Diagnostic Variants
///
/// The `Parse` variant keeps the source text next to the diagnostics so the
/// spans can be rendered against it.
#[derive(Debug, Error)]
pub enum WindsorConfError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("{err}")]
    Parse { err: ParseError, src: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Render error: {0}")]
    Render(#[from] serde_json::Error),
}

impl From<OptionsError> for WindsorConfError {
    fn from(error: OptionsError) -> Self {
        Self::Config(error.to_string())
    }
}

impl WindsorConfError {
    /// Create a new `Parse` error with the associated source code.
    pub fn new_parse_error(err: ParseError, src: impl Into<String>) -> Self {
        Self::Parse {
            err,
            src: src.into(),
        }
    }
}
