//! Miette rendering for errors and warnings.
//!
//! The library reports problems with its own [`Diagnostic`] type. The CLI
//! wraps each one in a [`Reportable`] implementing [`MietteDiagnostic`] so it
//! renders with a source snippet: the primary label under the offending
//! text, related labels under the earlier definition it clashes with.
//!
//! A [`windsor_conf::ParseError`] carrying several diagnostics yields one
//! reportable per diagnostic. Warnings from a successful parse go through the
//! same path with warning severity.

use std::fmt;

use miette::{
    Diagnostic as MietteDiagnostic, GraphicalReportHandler, LabeledSpan, Severity, SourceSpan,
};

use windsor_conf::WindsorConfError;
use windsor_conf_parser::{
    Span,
    error::{Diagnostic, Label, LabelRole},
};

/// One renderable problem.
#[derive(Debug)]
pub enum Reportable<'a> {
    /// A diagnostic located in `src`.
    Located { diag: &'a Diagnostic, src: &'a str },
    /// A failure with no source location: I/O, settings, rendering.
    Unlocated(&'a WindsorConfError),
}

impl<'a> Reportable<'a> {
    pub fn located(diag: &'a Diagnostic, src: &'a str) -> Self {
        Reportable::Located { diag, src }
    }

    pub fn is_warning(&self) -> bool {
        matches!(self, Reportable::Located { diag, .. } if diag.severity().is_warning())
    }
}

impl fmt::Display for Reportable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reportable::Located { diag, .. } => f.write_str(diag.message()),
            Reportable::Unlocated(err) => fmt::Display::fmt(err, f),
        }
    }
}

impl std::error::Error for Reportable<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Reportable::Located { .. } => None,
            Reportable::Unlocated(err) => err.source(),
        }
    }
}

impl MietteDiagnostic for Reportable<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code: Box<dyn fmt::Display + 'a> = match self {
            Reportable::Located { diag, .. } => Box::new(diag.code()?),
            Reportable::Unlocated(WindsorConfError::Io(_)) => Box::new("windsor_conf::io"),
            Reportable::Unlocated(WindsorConfError::Config(_)) => Box::new("windsor_conf::config"),
            Reportable::Unlocated(WindsorConfError::Render(_)) => Box::new("windsor_conf::render"),
            // Parse errors are always split into located diagnostics
            Reportable::Unlocated(WindsorConfError::Parse { .. }) => return None,
        };
        Some(code)
    }

    fn severity(&self) -> Option<Severity> {
        match self {
            Reportable::Located { diag, .. } if diag.severity().is_warning() => {
                Some(Severity::Warning)
            }
            _ => Some(Severity::Error),
        }
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Located { diag, .. } => diag
                .help()
                .map(|help| Box::new(help) as Box<dyn fmt::Display + 'a>),
            Reportable::Unlocated(_) => None,
        }
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        match self {
            Reportable::Located { src, .. } => Some(src as &dyn miette::SourceCode),
            Reportable::Unlocated(_) => None,
        }
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let Reportable::Located { diag, .. } = self else {
            return None;
        };
        if diag.labels().is_empty() {
            return None;
        }
        Some(Box::new(diag.labels().iter().map(to_labeled_span)))
    }
}

fn to_labeled_span(label: &Label) -> LabeledSpan {
    let span = span_to_miette(label.span());
    let message = Some(label.message().to_string());
    match label.role() {
        LabelRole::Primary => LabeledSpan::new_primary_with_span(message, span),
        LabelRole::Related => LabeledSpan::new_with_span(message, span),
    }
}

fn span_to_miette(span: Span) -> SourceSpan {
    SourceSpan::new(span.start().into(), span.len())
}

/// Split a [`WindsorConfError`] into reportables.
///
/// [`WindsorConfError::Parse`] yields one [`Reportable`] per diagnostic;
/// every other variant yields exactly one.
pub fn to_reportables(err: &WindsorConfError) -> Vec<Reportable<'_>> {
    match err {
        WindsorConfError::Parse { err, src } => err
            .diagnostics()
            .iter()
            .map(|diag| Reportable::located(diag, src))
            .collect(),
        _ => vec![Reportable::Unlocated(err)],
    }
}

/// Reportables for the warnings of a successful parse of `src`.
pub fn warnings_to_reportables<'a>(
    warnings: &'a [Diagnostic],
    src: &'a str,
) -> Vec<Reportable<'a>> {
    warnings
        .iter()
        .map(|diag| Reportable::located(diag, src))
        .collect()
}

/// Render a reportable with miette's graphical handler.
///
/// Falls back to the one-line message if rendering fails.
pub fn render(reportable: &Reportable<'_>) -> String {
    let mut out = String::new();
    match GraphicalReportHandler::new().render_report(&mut out, reportable) {
        Ok(()) => out,
        Err(_) => reportable.to_string(),
    }
}
