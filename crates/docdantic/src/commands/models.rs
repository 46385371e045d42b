//! `docdantic models` command implementation.

use std::io::Write;
use std::path::PathBuf;

use clap::Args;
use docdantic_config::{CliSettings, Config};
use docdantic_model::ModelRegistry;

use super::load_registry;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the models command.
#[derive(Args)]
pub(crate) struct ModelsArgs {
    /// Path to configuration file (default: auto-discover docdantic.toml).
    #[arg(short, long, env = "DOCDANTIC_CONFIG")]
    config: Option<PathBuf>,

    /// Additional model schema file (repeatable).
    #[arg(short = 'm', long = "models")]
    models: Vec<PathBuf>,
}

impl ModelsArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let cli_settings = CliSettings {
            schemas: self.models,
            ..CliSettings::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        let registry = load_registry(&config)?;

        if registry.is_empty() {
            Output::new().warning("No models registered");
            return Ok(());
        }

        let mut stdout = std::io::stdout().lock();
        for line in listing(&registry) {
            writeln!(stdout, "{line}")?;
        }
        Ok(())
    }
}

/// One line per model: dotted path and field count.
fn listing(registry: &ModelRegistry) -> Vec<String> {
    registry
        .iter()
        .map(|model| {
            let count = model.fields.len();
            let noun = if count == 1 { "field" } else { "fields" };
            format!("{} ({count} {noun})", model.reference().path())
        })
        .collect()
}
