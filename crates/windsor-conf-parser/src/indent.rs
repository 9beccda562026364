//! Indentation tokenizer.
//!
//! Turns the lexer's flat token stream into a bracketed one: leading
//! whitespace is measured and replaced by [`Token::Indent`] and
//! [`Token::Dedent`], every content line ends with exactly one
//! [`Token::Newline`], and trivia (inline whitespace, comments) is dropped.
//!
//! # Algorithm
//!
//! The tokenizer keeps a stack of indentation widths that starts as `[0]`.
//! For each line that has content:
//!
//! 1. Measure the leading whitespace. A space advances one column, a tab
//!    advances to the next multiple of the tab width.
//! 2. Deeper than the top of the stack: push the width, emit `Indent`.
//! 3. Shallower: pop and emit one `Dedent` per level until the top equals
//!    the width. If no level matches exactly, fail with `E100`.
//! 4. Same width: nothing structural.
//!
//! Blank lines and comment-only lines are skipped whatever their
//! indentation. At end of input one `Dedent` is emitted per open level,
//! followed by `Eof`.
//!
//! # Example
//!
//! ```text
//! container:          Identifier Colon Newline
//!   item: value       Indent Identifier Colon Value Newline
//!   sub:              Identifier Colon Newline
//!     other: x        Indent Identifier Colon Value Newline
//!                     Dedent Dedent Eof
//! ```

use std::{
    cmp::Ordering,
    collections::VecDeque,
    iter::{Fuse, Peekable},
};

use log::{debug, trace};

use crate::{
    error::{Diagnostic, ErrorCode},
    options::ParseOptions,
    position::Position,
    span::Span,
    tokens::{PositionedToken, Token},
};

/// Iterator adapter producing the bracketed token stream.
///
/// Yields `Err` at most once, for an inconsistent dedent, and then stops.
pub struct IndentTokenizer<'src, I>
where
    I: Iterator<Item = PositionedToken<'src>>,
{
    tokens: Peekable<Fuse<I>>,
    stack: Vec<usize>,
    pending: VecDeque<PositionedToken<'src>>,
    tab_width: usize,
    warnings: Vec<Diagnostic>,
    done: bool,
}

impl<'src, I> IndentTokenizer<'src, I>
where
    I: Iterator<Item = PositionedToken<'src>>,
{
    pub fn new<T>(tokens: T, options: &ParseOptions) -> Self
    where
        T: IntoIterator<Item = PositionedToken<'src>, IntoIter = I>,
    {
        Self {
            tokens: tokens.into_iter().fuse().peekable(),
            stack: vec![0],
            pending: VecDeque::new(),
            tab_width: options.tab_width(),
            warnings: Vec::new(),
            done: false,
        }
    }

    /// Width of the innermost open block.
    fn current_width(&self) -> usize {
        self.stack.last().copied().unwrap_or(0)
    }

    /// Indentation width of a whitespace run.
    ///
    /// Saturates instead of overflowing; a saturated width still compares
    /// consistently against the stack.
    fn measure(&self, indentation: &str) -> usize {
        indentation.chars().fold(0, |width: usize, c| match c {
            '\t' => (width / self.tab_width)
                .saturating_add(1)
                .saturating_mul(self.tab_width),
            _ => width.saturating_add(1),
        })
    }

    /// Take one physical line, up to and including its newline.
    ///
    /// Never consumes `Eof`, so an empty result means the input is exhausted.
    fn next_line(&mut self) -> Vec<PositionedToken<'src>> {
        let mut line = Vec::new();
        while let Some(token) = self.tokens.next_if(|t| t.token != Token::Eof) {
            let is_newline = token.token == Token::Newline;
            line.push(token);
            if is_newline {
                break;
            }
        }
        line
    }

    /// Queue the tokens for the next content line, or the closing sequence.
    fn fill(&mut self) -> Result<(), Diagnostic> {
        loop {
            let line = self.next_line();
            if line.is_empty() {
                self.close();
                return Ok(());
            }

            let mut line = line.into_iter().peekable();
            let indentation = line.next_if(|t| matches!(t.token, Token::Whitespace(_)));

            let mut content = Vec::new();
            let mut newline = None;
            for token in line {
                match token.token {
                    Token::Newline => newline = Some(token),
                    _ if token.is_trivia() => {}
                    _ => content.push(token),
                }
            }

            // Blank and comment-only lines do not take part in indentation
            let Some(first) = content.first() else {
                continue;
            };

            let (width, line_start, line_position) = match indentation {
                Some(PositionedToken {
                    token: Token::Whitespace(text),
                    span,
                    position,
                }) => {
                    self.check_mixed(text, span, position);
                    (self.measure(text), span, position)
                }
                _ => (0, first.span, first.position),
            };

            match width.cmp(&self.current_width()) {
                Ordering::Greater => {
                    self.stack.push(width);
                    trace!(width = width, depth = self.stack.len() - 1; "Indent");
                    self.pending
                        .push_back(PositionedToken::new(Token::Indent, line_start, line_position));
                }
                Ordering::Less => {
                    self.dedent_to(width, line_start, line_position)?;
                }
                Ordering::Equal => {}
            }

            let newline = newline.unwrap_or_else(|| self.synthetic_newline());
            self.pending.extend(content);
            self.pending.push_back(newline);
            return Ok(());
        }
    }

    /// Pop levels until the top of the stack equals `width`.
    fn dedent_to(
        &mut self,
        width: usize,
        line_start: Span,
        position: Position,
    ) -> Result<(), Diagnostic> {
        let open_widths = self.stack.clone();
        let at = Span::empty(line_start.start());

        while self.current_width() > width {
            self.stack.pop();
            trace!(width = width, depth = self.stack.len() - 1; "Dedent");
            self.pending
                .push_back(PositionedToken::new(Token::Dedent, at, position));
        }

        if self.current_width() != width {
            let expected = open_widths
                .iter()
                .map(usize::to_string)
                .collect::<Vec<_>>()
                .join(", ");
            return Err(Diagnostic::error(format!(
                "inconsistent dedent: width {width} does not match any enclosing block"
            ))
            .with_code(ErrorCode::E100)
            .with_label(line_start, ErrorCode::E100.description())
            .with_help(format!(
                "align this line with an enclosing block (open widths: {expected})"
            ))
            .with_position(position));
        }
        Ok(())
    }

    /// Close every open level and pass `Eof` through.
    fn close(&mut self) {
        let eof = self.tokens.next().unwrap_or_else(|| {
            PositionedToken::new(Token::Eof, Span::default(), Position::default())
        });

        debug!(open_levels = self.stack.len() - 1; "Closing indentation levels");
        while self.stack.len() > 1 {
            self.stack.pop();
            self.pending
                .push_back(PositionedToken::new(Token::Dedent, eof.span, eof.position));
        }
        self.pending.push_back(eof);
        self.done = true;
    }

    /// Newline for a last line that has no line break.
    fn synthetic_newline(&mut self) -> PositionedToken<'src> {
        let (span, position) = self
            .tokens
            .peek()
            .map_or((Span::default(), Position::default()), |eof| {
                (eof.span, eof.position)
            });
        PositionedToken::new(Token::Newline, span, position)
    }

    fn check_mixed(&mut self, indentation: &str, span: Span, position: Position) {
        if indentation.contains(' ') && indentation.contains('\t') {
            self.warnings.push(
                Diagnostic::warning("indentation mixes tabs and spaces")
                    .with_code(ErrorCode::W100)
                    .with_label(span, ErrorCode::W100.description())
                    .with_help("indent with either tabs or spaces")
                    .with_position(position),
            );
        }
    }
}

impl<'src, I> Iterator for IndentTokenizer<'src, I>
where
    I: Iterator<Item = PositionedToken<'src>>,
{
    type Item = Result<PositionedToken<'src>, Diagnostic>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(token) = self.pending.pop_front() {
                return Some(Ok(token));
            }
            if self.done {
                return None;
            }
            if let Err(diagnostic) = self.fill() {
                self.done = true;
                self.pending.clear();
                return Some(Err(diagnostic));
            }
        }
    }
}

/// Run the indentation tokenizer over `tokens` and collect its output.
///
/// Returns the bracketed tokens together with any warnings.
pub fn process<'src>(
    tokens: Vec<PositionedToken<'src>>,
    options: &ParseOptions,
) -> Result<(Vec<PositionedToken<'src>>, Vec<Diagnostic>), Diagnostic> {
    let mut tokenizer = IndentTokenizer::new(tokens, options);
    let tokens = tokenizer.by_ref().collect::<Result<Vec<_>, _>>()?;

    debug!(tokens_count = tokens.len(); "Indentation processed");
    Ok((tokens, tokenizer.warnings))
}
