//! Windsor configuration language.
//!
//! Loading and rendering for the indentation-based configuration language
//! used to describe Windsor container setups: imports, named blocks,
//! attributes and nested blocks.

pub mod config;

mod error;

pub use windsor_conf_core::{
    ConfigurationDefinition, ConfigurationNode, DuplicateKeyError, Import, NodeBuilder, writer,
};
pub use windsor_conf_parser::{Diagnostic, ParseOptions, Position, Span, error::ParseError};

pub use error::WindsorConfError;

use std::{fs, path::Path};

use log::{debug, info, trace, warn};

use config::{AppConfig, OutputFormat};

/// Loader for parsing and rendering Windsor configurations.
///
/// # Examples
///
/// ```rust
/// use windsor_conf::{ConfigurationLoader, config::AppConfig};
///
/// let source = "container:\n  item: value\n";
///
/// // With custom config
/// let config = AppConfig::default();
/// let loader = ConfigurationLoader::new(config);
///
/// let definition = loader.parse(source)
///     .expect("Failed to parse");
/// assert_eq!(
///     definition.root().child("container").and_then(|c| c.attribute("item")),
///     Some("value"),
/// );
///
/// // Or use default config
/// let loader = ConfigurationLoader::default();
/// ```
#[derive(Debug, Default)]
pub struct ConfigurationLoader {
    config: AppConfig,
}

impl ConfigurationLoader {
    /// Create a new loader with the given configuration.
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Parse configuration text into a definition.
    ///
    /// # Errors
    ///
    /// Returns [`WindsorConfError::Config`] if the parser settings are
    /// invalid, and [`WindsorConfError::Parse`] with every diagnostic of the
    /// failing phase for malformed input.
    pub fn parse(&self, source: &str) -> Result<ConfigurationDefinition, WindsorConfError> {
        let (definition, warnings) = self.parse_with_warnings(source)?;
        for warning in &warnings {
            warn!("{warning}");
        }
        Ok(definition)
    }

    /// Parse configuration text, handing back warnings instead of logging
    /// them.
    ///
    /// # Errors
    ///
    /// Same as [`parse`](Self::parse).
    pub fn parse_with_warnings(
        &self,
        source: &str,
    ) -> Result<(ConfigurationDefinition, Vec<Diagnostic>), WindsorConfError> {
        info!("Parsing configuration");

        let options = self.config.parser().options()?;
        let (definition, warnings) = windsor_conf_parser::parse_with_warnings(source, options)
            .map_err(|err| WindsorConfError::new_parse_error(err, source))?;

        debug!(
            imports_count = definition.imports().len(),
            blocks_count = definition.root().child_count(),
            warnings_count = warnings.len();
            "Configuration parsed successfully",
        );
        trace!(definition:?; "Parsed configuration");

        Ok((definition, warnings))
    }

    /// Read and parse a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`WindsorConfError::Io`] if the file cannot be read, otherwise
    /// the same errors as [`parse`](Self::parse).
    pub fn load_file(
        &self,
        path: impl AsRef<Path>,
    ) -> Result<ConfigurationDefinition, WindsorConfError> {
        let path = path.as_ref();
        info!(path:? = path; "Reading configuration file");

        let source = fs::read_to_string(path)?;
        self.parse(&source)
    }

    /// Render a definition in the given format.
    ///
    /// # Errors
    ///
    /// Returns [`WindsorConfError::Render`] if JSON serialization fails.
    pub fn render(
        &self,
        definition: &ConfigurationDefinition,
        format: OutputFormat,
    ) -> Result<String, WindsorConfError> {
        debug!(format:% = format; "Rendering configuration");
        match format {
            OutputFormat::Text => Ok(definition.to_string()),
            OutputFormat::Json => Ok(serde_json::to_string_pretty(definition)?),
        }
    }

    /// Render a definition in the configured default format.
    ///
    /// # Errors
    ///
    /// Same as [`render`](Self::render).
    pub fn render_default(
        &self,
        definition: &ConfigurationDefinition,
    ) -> Result<String, WindsorConfError> {
        self.render(definition, self.config.output().format())
    }
}
