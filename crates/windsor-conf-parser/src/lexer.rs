//! Lexical analyzer for Windsor configuration source text.
//!
//! The lexer converts source text into a flat stream of [`Token`]s. It does
//! not interpret indentation: leading whitespace comes out as an ordinary
//! [`Token::Whitespace`] run and is measured later by the
//! [`indent`](super::indent) module.
//!
//! The lexer is line aware in one respect. After a `:` everything up to the
//! end of the line is a single [`Token::Value`] (or a trailing comment), so
//! values may contain dots, colons, slashes and spaces.
//!
//! The public entry point is [`tokenize`], which performs error-recovering
//! lexical analysis and collects all diagnostics in a single pass.

use log::{debug, trace};
use winnow::{
    Parser as _,
    combinator::{alt, not, peek, preceded, terminated},
    error::ModalResult,
    stream::{LocatingSlice, Location, Stream},
    token::{literal, one_of, take_till, take_while},
};

use crate::{
    error::{Diagnostic, DiagnosticCollector, ErrorCode, ParseError},
    position::LineIndex,
    span::Span,
    tokens::{PositionedToken, Token},
};

type Input<'a> = LocatingSlice<&'a str>;
type IResult<O> = ModalResult<O>;

/// What the lexer expects next on the current line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    /// Indentation, keys, keywords and colons.
    Line,
    /// The remainder of a line after a colon.
    Value,
}

/// Characters allowed in keys and node names.
fn is_identifier_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '-' | '.')
}

/// Parse line comment starting with '//'
fn line_comment<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    preceded("//", take_till(0.., ['\r', '\n']))
        .map(Token::LineComment)
        .parse_next(input)
}

/// Parse keywords with word boundary checking
fn keyword<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    terminated(
        alt((literal("import"), literal("in"))),
        peek(not(one_of(is_identifier_char))),
    )
    .map(|keyword: &str| match keyword {
        "import" => Token::Import,
        _ => Token::In,
    })
    .parse_next(input)
}

/// Parse identifiers. Dots are ordinary characters: `item.1`, `sub.sub`.
fn identifier<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    take_while(1.., is_identifier_char)
        .map(Token::Identifier)
        .parse_next(input)
}

fn colon<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    ':'.value(Token::Colon).parse_next(input)
}

/// Parse a run of spaces and tabs
fn whitespace<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    take_while(1.., [' ', '\t'])
        .map(Token::Whitespace)
        .parse_next(input)
}

/// Parse newline, normalizing `\r\n`
fn newline<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    alt(("\r\n", "\n")).value(Token::Newline).parse_next(input)
}

/// Parse the rest of a line as a value, dropping trailing whitespace
fn value<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    take_till(1.., ['\r', '\n'])
        .map(|raw: &str| Token::Value(raw.trim_end()))
        .parse_next(input)
}

/// Parse a single token and its span
fn spanned_token<'a>(input: &mut Input<'a>, mode: Mode) -> IResult<(Token<'a>, Span)> {
    let start_pos = input.current_token_start();

    let token = match mode {
        Mode::Line => alt((
            line_comment, // Must come before any other token
            newline,      // Must come before whitespace
            whitespace,
            keyword,    // Must come before identifier
            identifier, // Must come before single chars
            colon,
        ))
        .parse_next(input)?,
        Mode::Value => alt((
            newline,
            whitespace,
            line_comment, // Must come before value
            value,
        ))
        .parse_next(input)?,
    };

    // A value's span stops at its last non-blank character
    let end_pos = match token {
        Token::Value(text) => start_pos + text.len(),
        _ => input.current_token_start(),
    };

    Ok((token, Span::new(start_pos..end_pos)))
}

/// Lexer that accumulates tokens and diagnostics during tokenization.
struct Lexer<'a> {
    tokens: Vec<PositionedToken<'a>>,
    diagnostics: DiagnosticCollector,
    index: LineIndex<'a>,
    mode: Mode,
}

impl<'a> Lexer<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            tokens: Vec::new(),
            diagnostics: DiagnosticCollector::new(),
            index: LineIndex::new(source),
            mode: Mode::Line,
        }
    }

    /// Tokenize the input, collecting tokens and errors.
    fn tokenize(&mut self, mut input: Input<'a>) {
        if input.starts_with('\u{feff}') {
            input.next_token();
        }

        while !input.is_empty() {
            let checkpoint = input.checkpoint();
            match spanned_token(&mut input, self.mode) {
                Ok((token, span)) => {
                    match token {
                        Token::Colon => self.mode = Mode::Value,
                        Token::Newline => self.mode = Mode::Line,
                        _ => {}
                    }
                    let position = self.index.position(span.start());
                    self.tokens.push(PositionedToken::new(token, span, position));
                }
                Err(_) => {
                    input.reset(&checkpoint);
                    let error_pos = input.current_token_start();
                    let diagnostic = self.unexpected_character(input.chars().next(), error_pos);
                    self.diagnostics.emit(diagnostic);

                    // Skip the offending character and keep going
                    input.next_token();
                }
            }
        }

        let end_pos = input.current_token_start();
        let position = self.index.position(end_pos);
        self.tokens
            .push(PositionedToken::new(Token::Eof, Span::empty(end_pos), position));
    }

    /// Finish lexing and return tokens or collected errors.
    fn finish(self) -> Result<Vec<PositionedToken<'a>>, ParseError> {
        self.diagnostics.finish().map(|_| self.tokens)
    }

    fn unexpected_character(&self, ch: Option<char>, error_pos: usize) -> Diagnostic {
        let len = ch.map_or(1, char::len_utf8);
        let span = Span::new(error_pos..error_pos + len);
        let position = self.index.position(error_pos);

        match ch {
            Some('\r') => Diagnostic::error("stray carriage return")
                .with_code(ErrorCode::E002)
                .with_label(span, ErrorCode::E002.description())
                .with_help("lines must end with `\\n` or `\\r\\n`")
                .with_position(position),
            other => {
                let shown = other.map_or_else(String::new, |c| c.escape_debug().to_string());
                Diagnostic::error(format!("unexpected character `{shown}`"))
                    .with_code(ErrorCode::E001)
                    .with_label(span, ErrorCode::E001.description())
                    .with_help("keys may contain letters, digits, `_`, `-` and `.`")
                    .with_position(position)
            }
        }
    }
}

/// Tokenize source text, collecting every lexical error.
///
/// The token list always ends with [`Token::Eof`]. A leading byte order
/// mark is skipped. Spans always refer to the
/// original text.
///
/// # Returns
///
/// - `Ok(tokens)` - All tokens successfully lexed
/// - `Err(ParseError)` - One or more unexpected characters; contains all diagnostics
pub fn tokenize(source: &str) -> Result<Vec<PositionedToken<'_>>, ParseError> {
    let mut lexer = Lexer::new(source);
    lexer.tokenize(LocatingSlice::new(source));
    let tokens = lexer.finish()?;

    debug!(tokens_count = tokens.len(); "Lexing completed");
    trace!(tokens:?; "Lexed tokens");

    Ok(tokens)
}
