use std::fmt;

use crate::{position::Position, span::Span};

/// Token types for the Windsor configuration language
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token<'src> {
    // Keywords
    Import,
    In,

    // Names and values
    Identifier(&'src str),
    Value(&'src str), // rest of line after `:`, trimmed

    Colon,

    // Trivia
    LineComment(&'src str), // // comment
    Whitespace(&'src str),  // spaces and tabs
    Newline,

    // Structure, synthesized by the indentation tokenizer
    Indent,
    Dedent,
    Eof,
}

impl Token<'_> {
    /// Returns `true` for tokens the parser never sees.
    pub fn is_trivia(&self) -> bool {
        matches!(self, Token::Whitespace(_) | Token::LineComment(_))
    }
}

/// A token with its source location
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionedToken<'src> {
    pub token: Token<'src>,
    pub span: Span,
    pub position: Position,
}

impl<'src> PositionedToken<'src> {
    pub fn new(token: Token<'src>, span: Span, position: Position) -> Self {
        Self {
            token,
            span,
            position,
        }
    }
}

impl<'src> std::ops::Deref for PositionedToken<'src> {
    type Target = Token<'src>;

    fn deref(&self) -> &Self::Target {
        &self.token
    }
}

impl fmt::Display for PositionedToken<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.token.fmt(f)
    }
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Import => write!(f, "import"),
            Token::In => write!(f, "in"),

            Token::Identifier(name) => write!(f, "{name}"),
            Token::Value(value) => write!(f, "{value}"),

            Token::Colon => write!(f, ":"),

            Token::LineComment(comment) => write!(f, "//{comment}"),
            Token::Whitespace(ws) => write!(f, "{ws}"),
            Token::Newline => write!(f, "\\n"),

            Token::Indent => write!(f, "<indent>"),
            Token::Dedent => write!(f, "<dedent>"),
            Token::Eof => write!(f, "<end of input>"),
        }
    }
}
