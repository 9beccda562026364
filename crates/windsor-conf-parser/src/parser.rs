//! Parser for indentation-bracketed tokens.
//!
//! This module transforms the token stream produced by the
//! [`indent`](super::indent) tokenizer into the syntax tree defined in
//! [`parser_types`](super::parser_types). The public entry point is
//! [`build_document`].
//!
//! Grammar:
//!
//! ```text
//! document  := statement* EOF
//! statement := import | entry
//! import    := IMPORT name (IN name)? NEWLINE
//! entry     := name ':' ( VALUE NEWLINE
//!                       | NEWLINE INDENT statement+ DEDENT
//!                       | NEWLINE )
//! name      := IDENTIFIER | IMPORT | IN
//! ```
//!
//! Imports are accepted at any depth here; the tree builder reports the
//! ones that are out of place.

use log::{debug, trace};
use winnow::{
    Parser as _,
    combinator::{alt, repeat},
    error::{ContextError, ErrMode},
    stream::{Stream, TokenSlice},
    token::any,
};

use crate::{
    error::{Diagnostic, ErrorCode},
    parser_types as types,
    span::{Span, Spanned},
    tokens::{PositionedToken, Token},
};

/// Context type for parser errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Context {
    /// Error code to report
    Code(ErrorCode),
    /// Description of what was expected at the failure point
    Expected(&'static str),
    /// Remaining token count (`eof_offset()`) at the offending token
    ///
    /// The token index is `tokens.len() - offset`.
    Offset(usize),
}

type Input<'src> = WindsorTokenSlice<'src>;
type IResult<O> = std::result::Result<O, ErrMode<ContextError<Context>>>;
/// Type alias for winnow TokenSlice with our positioned tokens
type WindsorTokenSlice<'src> = TokenSlice<'src, PositionedToken<'src>>;

/// Cut error pointing at the next token of `input`.
fn unexpected(
    input: &Input<'_>,
    code: ErrorCode,
    expected: &'static str,
) -> ErrMode<ContextError<Context>> {
    let mut e = ContextError::new();
    e.push(Context::Code(code));
    e.push(Context::Expected(expected));
    e.push(Context::Offset(input.eof_offset()));
    ErrMode::Cut(e)
}

fn backtrack() -> ErrMode<ContextError<Context>> {
    ErrMode::Backtrack(ContextError::new())
}

/// Look at the next token without consuming it.
fn peek<'src>(input: &mut Input<'src>) -> Option<&'src PositionedToken<'src>> {
    let checkpoint = input.checkpoint();
    let token = input.next_token();
    input.reset(&checkpoint);
    token
}

/// Consume the next token if it equals `kind`, otherwise fail with `code`.
fn expect<'src>(
    input: &mut Input<'src>,
    kind: &Token<'_>,
    code: ErrorCode,
    expected: &'static str,
) -> IResult<&'src PositionedToken<'src>> {
    match peek(input) {
        Some(token) if token.token == *kind => {
            input.next_token();
            Ok(token)
        }
        _ => Err(unexpected(input, code, expected)),
    }
}

/// Parse a key or dotted name.
///
/// Keywords are plain names everywhere a name is expected.
fn name<'src>(input: &mut Input<'src>) -> IResult<Spanned<&'src str>> {
    any.verify_map(|token: &PositionedToken<'src>| match token.token {
        Token::Identifier(name) => Some(Spanned::new(name, token.span)),
        Token::Import => Some(Spanned::new("import", token.span)),
        Token::In => Some(Spanned::new("in", token.span)),
        _ => None,
    })
    .parse_next(input)
}

/// Parse an import declaration: `import Namespace.Name [in Assembly.Name]`
///
/// Backtracks when `import` is used as a key (`import: value`).
fn import_declaration<'src>(input: &mut Input<'src>) -> IResult<types::Import<'src>> {
    let keyword = any
        .verify_map(|token: &PositionedToken<'src>| {
            matches!(token.token, Token::Import).then_some(token.span)
        })
        .parse_next(input)?;

    if matches!(peek(input).map(|t| &t.token), Some(Token::Colon)) {
        return Err(backtrack());
    }

    let namespace = name
        .parse_next(input)
        .map_err(|_| unexpected(input, ErrorCode::E200, "a namespace after `import`"))?;

    let assembly = if matches!(peek(input).map(|t| &t.token), Some(Token::In)) {
        input.next_token();
        let assembly = name
            .parse_next(input)
            .map_err(|_| unexpected(input, ErrorCode::E200, "an assembly name after `in`"))?;
        Some(assembly)
    } else {
        None
    };

    expect(input, &Token::Newline, ErrorCode::E200, "end of line after the import")?;

    Ok(types::Import {
        keyword,
        namespace,
        assembly,
    })
}

/// Parse an entry: an attribute or a block header with its block
///
/// Examples:
/// - `key: value` - attribute
/// - `key:` followed by deeper lines - block
/// - `key:` followed by a line at the same or a shallower depth - attribute
///   with an empty value
fn entry<'src>(input: &mut Input<'src>) -> IResult<types::Entry<'src>> {
    let key = name.parse_next(input)?;
    let colon = expect(input, &Token::Colon, ErrorCode::E201, "`:` after the key")?;

    let Some(next) = peek(input) else {
        return Err(unexpected(input, ErrorCode::E200, "a value or end of line"));
    };

    match next.token {
        Token::Value(value) => {
            input.next_token();
            expect(input, &Token::Newline, ErrorCode::E200, "end of line after the value")?;
            Ok(types::Entry {
                key,
                body: types::EntryBody::Attribute(Spanned::new(value, next.span)),
            })
        }
        Token::Newline => {
            input.next_token();

            // One token of lookahead decides between block and empty attribute
            if !matches!(peek(input).map(|t| &t.token), Some(Token::Indent)) {
                let value = Spanned::new("", Span::empty(colon.span.end()));
                return Ok(types::Entry {
                    key,
                    body: types::EntryBody::Attribute(value),
                });
            }
            input.next_token();

            let statements: Vec<_> = repeat(0.., statement).parse_next(input)?;
            expect(input, &Token::Dedent, ErrorCode::E200, "a key or the end of the block")?;

            Ok(types::Entry {
                key,
                body: types::EntryBody::Block(statements),
            })
        }
        _ => Err(unexpected(input, ErrorCode::E200, "a value or end of line")),
    }
}

/// Parse one line-level statement
///
/// An `Indent` here has no block header in front of it.
fn statement<'src>(input: &mut Input<'src>) -> IResult<types::Statement<'src>> {
    let statement = match peek(input).map(|t| &t.token) {
        Some(Token::Indent) => Err(unexpected(
            input,
            ErrorCode::E203,
            "a line at the enclosing indentation",
        )),
        Some(Token::Import) => alt((
            import_declaration.map(types::Statement::Import),
            entry.map(types::Statement::Entry),
        ))
        .parse_next(input),
        Some(Token::Identifier(_) | Token::In) => {
            entry.map(types::Statement::Entry).parse_next(input)
        }
        _ => Err(backtrack()),
    }?;
    trace!(statement:%; "Statement parsed");
    Ok(statement)
}

fn document<'src>(input: &mut Input<'src>) -> IResult<types::Document<'src>> {
    let statements: Vec<_> = repeat(0.., statement).parse_next(input)?;
    expect(
        input,
        &Token::Eof,
        ErrorCode::E200,
        "a key or `import` at the start of a line",
    )?;
    Ok(types::Document { statements })
}

/// Human readable name of a token for error messages.
fn describe(token: &Token<'_>) -> String {
    match token {
        Token::Identifier(name) => format!("`{name}`"),
        Token::Value(value) => format!("value `{value}`"),
        Token::Import | Token::In => format!("keyword `{token}`"),
        Token::Colon => "`:`".to_string(),
        Token::Newline => "end of line".to_string(),
        Token::Indent => "indentation".to_string(),
        Token::Dedent => "end of block".to_string(),
        Token::Eof => "end of input".to_string(),
        Token::LineComment(_) | Token::Whitespace(_) => format!("`{token}`"),
    }
}

/// Utility function to convert winnow errors to our custom error format
///
/// Locates the offending token from the `Offset` context (or the position
/// the parser stopped at) and builds a diagnostic for the recorded code.
fn convert_error(
    error: ErrMode<ContextError<Context>>,
    tokens: &[PositionedToken],
    current_remaining: usize,
) -> Diagnostic {
    let (code, expected, remaining) = match &error {
        ErrMode::Backtrack(e) | ErrMode::Cut(e) => (
            e.context()
                .find_map(|ctx| match ctx {
                    Context::Code(code) => Some(*code),
                    _ => None,
                })
                .unwrap_or(ErrorCode::E200),
            e.context().find_map(|ctx| match ctx {
                Context::Expected(expected) => Some(*expected),
                _ => None,
            }),
            e.context()
                .find_map(|ctx| match ctx {
                    Context::Offset(n) => Some(*n),
                    _ => None,
                })
                .unwrap_or(current_remaining),
        ),
        // Not produced for complete input
        ErrMode::Incomplete(_) => (ErrorCode::E200, None, current_remaining),
    };

    let index = tokens.len().saturating_sub(remaining);
    let Some(token) = tokens.get(index).or_else(|| tokens.last()) else {
        return Diagnostic::error("unexpected end of input").with_code(code);
    };
    let found = describe(&token.token);

    let diagnostic = match code {
        ErrorCode::E201 => {
            let key_span = index
                .checked_sub(1)
                .and_then(|i| tokens.get(i))
                .map_or(token.span, |key| key.span);
            Diagnostic::error(format!("missing `:` after key, found {found}"))
                .with_label(key_span, "expected `:` after this key")
                .with_help("write `key: value`, or `key:` to open a block")
        }
        ErrorCode::E203 => Diagnostic::error("unexpected indentation")
            .with_label(token.span, "indented deeper than the line above")
            .with_help("only a `key:` header without a value can open an indented block"),
        _ => {
            let message = match expected {
                Some(expected) => format!("unexpected {found}, expected {expected}"),
                None => format!("unexpected {found}"),
            };
            Diagnostic::error(message)
                .with_label(token.span, "unexpected token")
                .with_help("each line holds an `import`, a `key: value` pair, or a `key:` header")
        }
    };

    diagnostic.with_code(code).with_position(token.position)
}

/// Build a syntax tree from indentation-bracketed tokens
pub fn build_document<'src>(
    tokens: &'src [PositionedToken<'src>],
) -> Result<types::Document<'src>, Diagnostic> {
    let mut token_slice = TokenSlice::new(tokens);

    match document.parse_next(&mut token_slice) {
        Ok(document) => {
            debug!(statements_count = document.statements.len(); "Document parsed");
            Ok(document)
        }
        Err(e) => {
            let current_remaining = token_slice.eof_offset();
            Err(convert_error(e, tokens, current_remaining))
        }
    }
}
