//! The ParseError type for wrapping parsing diagnostics.

use std::fmt;

use crate::error::{Diagnostic, ErrorKind};

/// Error returned by [`parse`](crate::parse).
///
/// Wraps one or more diagnostics. Lexing may report several bad characters
/// and tree building several duplicate keys at once; indentation and
/// grammar errors stop at the first one.
#[derive(Debug)]
pub struct ParseError {
    diagnostics: Vec<Diagnostic>,
}

impl ParseError {
    /// Create a new parse error from diagnostics.
    pub fn new(diagnostics: Vec<Diagnostic>) -> Self {
        Self { diagnostics }
    }

    /// Get all diagnostics in this error.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// The phase of the first error diagnostic.
    pub fn kind(&self) -> Option<ErrorKind> {
        self.diagnostics
            .iter()
            .filter(|diag| diag.severity().is_error())
            .find_map(|diag| diag.code())
            .map(|code| code.kind())
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(first) = self.diagnostics.first() {
            write!(f, "{}", first)?;
            if self.diagnostics.len() > 1 {
                write!(f, " (+{} more)", self.diagnostics.len() - 1)?;
            }
        }
        Ok(())
    }
}

impl std::error::Error for ParseError {}

impl From<Diagnostic> for ParseError {
    fn from(diagnostic: Diagnostic) -> Self {
        Self {
            diagnostics: vec![diagnostic],
        }
    }
}

impl From<Vec<Diagnostic>> for ParseError {
    fn from(diagnostics: Vec<Diagnostic>) -> Self {
        Self { diagnostics }
    }
}
