//! Error and diagnostic system for the Windsor configuration parser.
//!
//! This module provides an error handling system with:
//! - Error codes grouped by the phase that raised them ([`ErrorKind`])
//! - Multiple labeled spans for rich error context
//! - Line/column positions for plain-text reporting
//! - Diagnostic collector for accumulating multiple errors
//!
//! # Overview
//!
//! The error system is built around the [`Diagnostic`] type, which represents
//! a single error or warning message with optional error code, multiple source
//! locations, and help text. Multiple diagnostics are wrapped in [`ParseError`]
//! for returning from [`parse`](crate::parse).
//!
//! # Example
//!
//! ```
//! # use windsor_conf_parser::error::{Diagnostic, ErrorCode};
//! # use windsor_conf_parser::Span;
//!
//! let span = Span::new(40..44);
//! let original_span = Span::new(12..16);
//!
//! let diag = Diagnostic::error("key `item` is defined multiple times")
//!     .with_code(ErrorCode::E202)
//!     .with_label(span, "duplicate definition")
//!     .with_related_label(original_span, "first defined here")
//!     .with_help("remove the duplicate or use a different name");
//! ```

mod collector;
mod diagnostic;
mod error_code;
mod label;
mod parse_error;
mod severity;

pub(crate) use collector::DiagnosticCollector;

pub use diagnostic::Diagnostic;
pub use error_code::{ErrorCode, ErrorKind};
pub use label::{Label, LabelRole};
pub use parse_error::ParseError;
pub use severity::Severity;
