//! # Windsor Configuration Parser
//!
//! Parser for the indentation-based Windsor configuration language. This
//! crate provides the pipeline from source text to a
//! [`ConfigurationDefinition`].
//!
//! ## Usage
//!
//! ```
//! # use windsor_conf_parser::{parse, ParseError, ParseOptions};
//!
//! fn main() -> Result<(), ParseError> {
//!     let source = "\
//! import Castle.Facilities.Logging in Castle.Facilities.Logging.dll
//! nodeName:
//!   attrKey: attrValue
//!   childNode:
//!     nestedAttr: nestedValue
//! ";
//!
//!     let definition = parse(source, ParseOptions::default())?;
//!     let node = definition.root().child("nodeName").unwrap();
//!     assert_eq!(node.attribute("attrKey"), Some("attrValue"));
//!     Ok(())
//! }
//! ```

mod elaborate;
pub mod error;
mod indent;
mod lexer;
mod options;
mod parser;
#[cfg(test)]
mod parser_tests;
mod parser_types;
mod position;
mod span;
mod tokens;

pub use error::{Diagnostic, ParseError};
pub use options::{DEFAULT_TAB_WIDTH, MAX_TAB_WIDTH, OptionsError, ParseOptions};
pub use position::Position;
pub use span::Span;

use log::warn;

use windsor_conf_core::ConfigurationDefinition;

use elaborate::Builder;

/// Parse source text into a configuration tree.
///
/// This is the main entry point for parsing Windsor configuration text.
/// It orchestrates the complete parsing pipeline:
///
/// 1. **Tokenize** - Convert source text to tokens
/// 2. **Indent** - Replace leading whitespace with indent/dedent tokens
/// 3. **Parse** - Build a syntax tree from tokens
/// 4. **Elaborate** - Check sibling keys and imports, build the tree
///
/// Warnings (mixed tabs and spaces) are logged; use
/// [`parse_with_warnings`] to receive them instead.
///
/// The function is pure: it keeps no state between calls and can run on
/// several inputs concurrently.
///
/// # Arguments
///
/// * `source` - The configuration text to parse
/// * `options` - Parser settings (tab stop width)
///
/// # Returns
///
/// Returns the parsed [`ConfigurationDefinition`] on success, or a
/// [`ParseError`] holding every diagnostic of the failing phase.
///
/// # Example
///
/// ```
/// # use windsor_conf_parser::{parse, ParseError, ParseOptions};
///
/// fn main() -> Result<(), ParseError> {
///     let definition = parse("a:\n  b: c\n", ParseOptions::default())?;
///     assert_eq!(definition.root().child_count(), 1);
///     Ok(())
/// }
/// ```
pub fn parse(
    source: &str,
    options: ParseOptions,
) -> Result<ConfigurationDefinition, ParseError> {
    let (definition, warnings) = parse_with_warnings(source, options)?;
    for warning in &warnings {
        warn!("{warning}");
    }
    Ok(definition)
}

/// Parse source text, returning the tree together with its warnings.
///
/// Warnings never fail a parse. Each one carries its code, span and
/// position, so it can be rendered like an error.
///
/// # Errors
///
/// Same as [`parse`].
pub fn parse_with_warnings(
    source: &str,
    options: ParseOptions,
) -> Result<(ConfigurationDefinition, Vec<Diagnostic>), ParseError> {
    // Step 1: Tokenize
    let tokens = lexer::tokenize(source)?;

    // Step 2: Indentation
    let (tokens, warnings) = indent::process(tokens, &options)?;

    // Step 3: Parse
    let document = parser::build_document(&tokens)?;

    // Step 4: Elaborate
    let definition = Builder::new(source).build(&document)?;
    Ok((definition, warnings))
}
