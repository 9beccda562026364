//! Error codes for the Windsor configuration diagnostic system.
//!
//! Error codes are organized by phase:
//! - `E0xx` - Lexer errors
//! - `E1xx` - Indentation errors
//! - `E2xx` - Parser errors
//! - `W1xx` - Indentation warnings

use std::fmt;

/// The phase a diagnostic comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Unrecognized input characters.
    Lex,
    /// Indentation that does not line up with an enclosing block.
    Indentation,
    /// Structural grammar violations.
    Parse,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Lex => write!(f, "lex error"),
            ErrorKind::Indentation => write!(f, "indentation error"),
            ErrorKind::Parse => write!(f, "parse error"),
        }
    }
}

/// Error codes for categorizing diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // =========================================================================
    // Lexer Errors (E0xx)
    // =========================================================================
    /// Unexpected character.
    ///
    /// A character was found where no token can start, e.g. `=` or `#` in a
    /// key position.
    E001,

    /// Stray carriage return.
    ///
    /// A `\r` that is not part of a `\r\n` line ending.
    E002,

    // =========================================================================
    // Indentation Errors (E1xx)
    // =========================================================================
    /// Inconsistent dedent.
    ///
    /// A line is indented less than the previous one but its width does not
    /// match any enclosing block.
    E100,

    // =========================================================================
    // Parser Errors (E2xx)
    // =========================================================================
    /// Unexpected token.
    ///
    /// The parser encountered a token it did not expect at this position.
    E200,

    /// Missing colon.
    ///
    /// A key or node name is not followed by `:`.
    E201,

    /// Duplicate key.
    ///
    /// A key is used twice among the attributes and children of one block.
    E202,

    /// Unexpected indentation.
    ///
    /// A line is indented deeper than the previous one, but the previous
    /// line is not a block header (`name:` with nothing after the colon).
    E203,

    /// Misplaced import.
    ///
    /// An `import` declaration appears after the first block.
    E204,

    /// Top-level attribute.
    ///
    /// A top-level entry does not open an indented block.
    E205,

    // =========================================================================
    // Indentation Warnings (W1xx)
    // =========================================================================
    /// Mixed indentation.
    ///
    /// A line's indentation mixes tabs and spaces.
    W100,
}

impl ErrorCode {
    /// Returns the code as a string (e.g., "E001").
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E001 => "E001",
            ErrorCode::E002 => "E002",
            ErrorCode::E100 => "E100",
            ErrorCode::E200 => "E200",
            ErrorCode::E201 => "E201",
            ErrorCode::E202 => "E202",
            ErrorCode::E203 => "E203",
            ErrorCode::E204 => "E204",
            ErrorCode::E205 => "E205",
            ErrorCode::W100 => "W100",
        }
    }

    /// Returns a short description of what this error code means.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::E001 => "unexpected character",
            ErrorCode::E002 => "stray carriage return",
            ErrorCode::E100 => "inconsistent dedent",
            ErrorCode::E200 => "unexpected token",
            ErrorCode::E201 => "missing colon",
            ErrorCode::E202 => "duplicate key",
            ErrorCode::E203 => "unexpected indentation",
            ErrorCode::E204 => "misplaced import",
            ErrorCode::E205 => "top-level attribute",
            ErrorCode::W100 => "mixed indentation",
        }
    }

    /// Returns the phase this code belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ErrorCode::E001 | ErrorCode::E002 => ErrorKind::Lex,
            ErrorCode::E100 | ErrorCode::W100 => ErrorKind::Indentation,
            ErrorCode::E200
            | ErrorCode::E201
            | ErrorCode::E202
            | ErrorCode::E203
            | ErrorCode::E204
            | ErrorCode::E205 => ErrorKind::Parse,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
