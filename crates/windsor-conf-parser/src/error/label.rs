//! Labeled source spans for diagnostic messages.

use std::fmt;

use crate::{position::Position, span::Span};

/// What a label points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelRole {
    /// The offending text itself.
    Primary,
    /// An earlier definition the problem relates to: the first occurrence of
    /// a duplicated key, or the first block ahead of a late import.
    Related,
}

/// A labeled span in source code.
///
/// Related labels usually sit on another line than the primary one, so they
/// carry their own [`Position`] once the diagnostic has been located against
/// the source.
#[derive(Debug, Clone)]
pub struct Label {
    span: Span,
    message: String,
    role: LabelRole,
    position: Option<Position>,
}

impl Label {
    pub fn primary(span: Span, message: impl Into<String>) -> Self {
        Self::new(span, message, LabelRole::Primary)
    }

    pub fn related(span: Span, message: impl Into<String>) -> Self {
        Self::new(span, message, LabelRole::Related)
    }

    fn new(span: Span, message: impl Into<String>, role: LabelRole) -> Self {
        Self {
            span,
            message: message.into(),
            role,
            position: None,
        }
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn role(&self) -> LabelRole {
        self.role
    }

    pub fn is_primary(&self) -> bool {
        self.role == LabelRole::Primary
    }

    /// Line/column of the start of the span, once located.
    pub fn position(&self) -> Option<Position> {
        self.position
    }

    pub(crate) fn locate(&mut self, position: Position) {
        self.position = Some(position);
    }
}

/// `first defined here at 2:3`
impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)?;
        if let Some(position) = self.position {
            write!(f, " at {position}")?;
        }
        Ok(())
    }
}
