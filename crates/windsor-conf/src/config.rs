//! Configuration types for loading Windsor configuration files.
//!
//! This module provides configuration structures that control how
//! configuration text is parsed and rendered. All types implement
//! [`serde::Deserialize`] for flexible loading from external sources.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level application configuration combining parser and output settings.
//! - [`ParserConfig`] - Controls the tab stop used when measuring indentation.
//! - [`OutputConfig`] - Selects the default [`OutputFormat`].
//!
//! # Example
//!
//! ```
//! # use windsor_conf::config::{AppConfig, OutputFormat};
//! // Use default configuration
//! let config = AppConfig::default();
//! assert_eq!(config.parser().tab_width(), 2);
//! assert_eq!(config.output().format(), OutputFormat::Text);
//! ```

use std::fmt;

use serde::Deserialize;

use windsor_conf_parser::{DEFAULT_TAB_WIDTH, OptionsError, ParseOptions};

/// Top-level application configuration combining parser and output settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Parser configuration section.
    #[serde(default)]
    parser: ParserConfig,

    /// Output configuration section.
    #[serde(default)]
    output: OutputConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] with the specified parser and output configurations.
    pub fn new(parser: ParserConfig, output: OutputConfig) -> Self {
        Self { parser, output }
    }

    /// Returns the parser configuration.
    pub fn parser(&self) -> &ParserConfig {
        &self.parser
    }

    /// Returns the output configuration.
    pub fn output(&self) -> &OutputConfig {
        &self.output
    }
}

/// Parser settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ParserConfig {
    /// Columns a tab advances to, as a tab stop.
    #[serde(default = "default_tab_width")]
    tab_width: usize,
}

fn default_tab_width() -> usize {
    DEFAULT_TAB_WIDTH
}

impl ParserConfig {
    pub fn new(tab_width: usize) -> Self {
        Self { tab_width }
    }

    pub fn tab_width(&self) -> usize {
        self.tab_width
    }

    /// Returns validated [`ParseOptions`].
    ///
    /// # Errors
    ///
    /// Returns an error if the tab width is zero or above
    /// [`MAX_TAB_WIDTH`](windsor_conf_parser::MAX_TAB_WIDTH).
    pub fn options(&self) -> Result<ParseOptions, OptionsError> {
        ParseOptions::new(self.tab_width)
    }
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            tab_width: DEFAULT_TAB_WIDTH,
        }
    }
}

/// Output settings.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct OutputConfig {
    /// Default [`OutputFormat`] when none is requested explicitly.
    #[serde(default)]
    format: OutputFormat,
}

impl OutputConfig {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }
}

/// How a parsed configuration is rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Canonical configuration text, two spaces per level.
    #[default]
    Text,
    /// Pretty-printed JSON of the whole definition.
    Json,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}
