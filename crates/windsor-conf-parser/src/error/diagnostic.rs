//! The core diagnostic type.
//!
//! A [`Diagnostic`] represents a single error or warning with optional
//! error code, multiple labeled source spans, help text, and the line/column
//! of its primary location.

use std::fmt;

use crate::{
    error::{ErrorCode, Severity, label::Label},
    position::{LineIndex, Position},
    span::Span,
};

/// A rich diagnostic message with source location information.
///
/// # Example
///
/// ```text
/// error[E202]: key `item` is defined multiple times
///   --> castle.conf:3:3
///    |
///  2 |   item: value
///    |   ---- first defined here
///  3 |   item: other
///    |   ^^^^ duplicate definition
///    |
///    = help: remove the duplicate or use a different name
/// ```
#[derive(Debug, Clone)]
pub struct Diagnostic {
    severity: Severity,
    code: Option<ErrorCode>,
    message: String,
    labels: Vec<Label>,
    help: Option<String>,
    position: Option<Position>,
}

impl Diagnostic {
    /// Create an error diagnostic.
    ///
    /// # Example
    ///
    /// ```
    /// # use windsor_conf_parser::error::{Diagnostic, ErrorCode};
    /// # use windsor_conf_parser::Span;
    ///
    /// let diag = Diagnostic::error("expected `:` after `container`")
    ///     .with_code(ErrorCode::E201)
    ///     .with_label(Span::new(0..9), "missing colon")
    ///     .with_help("write `container:`");
    /// ```
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }

    /// Create a warning diagnostic.
    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message)
    }

    /// Get the severity of this diagnostic.
    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// Get the error code, if any.
    pub fn code(&self) -> Option<ErrorCode> {
        self.code
    }

    /// Get the primary message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get all labels attached to this diagnostic.
    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    /// Get the span of the first primary label, if any.
    pub fn primary_span(&self) -> Option<Span> {
        self.labels
            .iter()
            .find(|label| label.is_primary())
            .map(Label::span)
    }

    /// Get the help text, if any.
    pub fn help(&self) -> Option<&str> {
        self.help.as_deref()
    }

    /// Get the line/column of the primary location, if known.
    pub fn position(&self) -> Option<Position> {
        self.position
    }

    /// Set the error code.
    pub fn with_code(mut self, code: ErrorCode) -> Self {
        self.code = Some(code);
        self
    }

    /// Add a primary label to this diagnostic.
    pub fn with_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(Label::primary(span, message));
        self
    }

    /// Point at an earlier location this diagnostic relates to.
    pub fn with_related_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(Label::related(span, message));
        self
    }

    /// Set the help text.
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Set the line/column of the primary location.
    pub fn with_position(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }

    /// Resolve line/column positions for the diagnostic and every label.
    ///
    /// An explicit position set with [`with_position`](Self::with_position)
    /// is kept.
    pub(crate) fn locate(mut self, index: &LineIndex<'_>) -> Self {
        if self.position.is_none() {
            self.position = self.primary_span().map(|span| index.position(span.start()));
        }
        for label in &mut self.labels {
            label.locate(index.position(label.span().start()));
        }
        self
    }

    fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            code: None,
            message: message.into(),
            labels: Vec::new(),
            help: None,
            position: None,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Format: "error[E202]: message at 3:3; first defined here at 2:3"
        write!(f, "{}", self.severity)?;
        if let Some(code) = self.code {
            write!(f, "[{}]", code)?;
        }
        write!(f, ": {}", self.message)?;
        if let Some(position) = self.position {
            write!(f, " at {position}")?;
        }
        for label in self.labels.iter().filter(|label| !label.is_primary()) {
            if label.position().is_some() {
                write!(f, "; {label}")?;
            }
        }
        Ok(())
    }
}

impl std::error::Error for Diagnostic {}
