//! `docdantic process` command implementation.

use std::io::Write;
use std::path::PathBuf;

use clap::Args;
use docdantic_config::{CliSettings, Config};

use super::{pipeline, render_document};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the process command.
#[derive(Args)]
pub(crate) struct ProcessArgs {
    /// Markdown file to process.
    input: PathBuf,

    /// Write the result here instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Render the processed document to HTML.
    #[arg(long)]
    html: bool,

    /// Path to configuration file (default: auto-discover docdantic.toml).
    #[arg(short, long, env = "DOCDANTIC_CONFIG")]
    config: Option<PathBuf>,

    /// Additional model schema file (repeatable).
    #[arg(short = 'm', long = "models")]
    models: Vec<PathBuf>,
}

impl ProcessArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let cli_settings = CliSettings {
            html: self.html.then_some(true),
            schemas: self.models,
            ..CliSettings::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        let pipeline = pipeline(&config)?;

        let markdown = std::fs::read_to_string(&self.input)?;
        let rendered = render_document(&pipeline, &markdown, config.render.html, &self.input)?;

        match self.output {
            Some(path) => {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    std::fs::create_dir_all(parent)?;
                }
                std::fs::write(&path, rendered)?;
                Output::new().success(&format!("Wrote {}", path.display()));
            }
            None => {
                let mut stdout = std::io::stdout().lock();
                stdout.write_all(rendered.as_bytes())?;
                stdout.flush()?;
            }
        }
        Ok(())
    }
}
