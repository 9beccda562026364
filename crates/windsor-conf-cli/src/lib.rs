//! CLI logic for the Windsor configuration tool.
//!
//! Reads a configuration file, validates it, and writes it back out either
//! in canonical text form or as JSON.

pub mod error_adapter;

mod args;
mod config;

pub use args::{Args, Format};

use std::{fs, io::Write};

use log::{info, warn};

use windsor_conf::{ConfigurationLoader, WindsorConfError, config::OutputFormat};

use error_adapter::{render, warnings_to_reportables};

/// Run the Windsor configuration CLI
///
/// Loads the input file, renders it in the requested format, and writes the
/// result to the output file or stdout. Warnings such as mixed indentation are
/// logged with their source snippet and do not fail the run.
///
/// # Errors
///
/// Returns `WindsorConfError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Parsing errors
/// - Rendering errors
pub fn run(args: &Args) -> Result<(), WindsorConfError> {
    info!(
        input_path = args.input,
        output_path:? = args.output;
        "Processing configuration"
    );

    let app_config = config::load_config(args.config.as_ref())?;
    let format = args
        .format
        .map(OutputFormat::from)
        .unwrap_or_else(|| app_config.output().format());

    let loader = ConfigurationLoader::new(app_config);
    let source = fs::read_to_string(&args.input)?;
    let (definition, warnings) = loader.parse_with_warnings(&source)?;
    for reportable in warnings_to_reportables(&warnings, &source) {
        warn!("{}", render(&reportable));
    }

    let mut rendered = loader.render(&definition, format)?;
    if !rendered.is_empty() && !rendered.ends_with('\n') {
        rendered.push('\n');
    }

    match &args.output {
        Some(output) => {
            fs::write(output, rendered)?;
            info!(output_file = output.as_str(), format:% = format; "Configuration written");
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(rendered.as_bytes())?;
            stdout.flush()?;
        }
    }

    Ok(())
}
