//! CLI command implementations.

pub(crate) mod build;
pub(crate) mod models;
pub(crate) mod process;

use std::path::Path;
use std::sync::Arc;

use docdantic_config::Config;
use docdantic_model::ModelRegistry;
use docdantic_renderer::{DocdanticPreprocessor, MarkdownPipeline, RenderOptions};

use crate::error::CliError;

pub(crate) use build::BuildArgs;
pub(crate) use models::ModelsArgs;
pub(crate) use process::ProcessArgs;

/// Load every schema file the configuration names into one registry.
fn load_registry(config: &Config) -> Result<ModelRegistry, CliError> {
    let mut registry = ModelRegistry::new();
    let files = config.schema_files()?;
    for path in &files {
        registry.load_file(path)?;
    }
    tracing::info!(
        files = files.len(),
        models = registry.len(),
        "Loaded model schemas"
    );
    Ok(registry)
}

/// Build the markdown pipeline for a loaded configuration.
fn pipeline(config: &Config) -> Result<MarkdownPipeline, CliError> {
    let registry = Arc::new(load_registry(config)?);
    let preprocessor = DocdanticPreprocessor::new(registry).with_options(RenderOptions {
        heading_level: config.render.heading_level,
    });
    Ok(MarkdownPipeline::new().with_preprocessor(preprocessor, DocdanticPreprocessor::PRIORITY))
}

/// Run `pipeline` over one document, producing markdown or HTML.
fn render_document(
    pipeline: &MarkdownPipeline,
    markdown: &str,
    html: bool,
    origin: &Path,
) -> Result<String, CliError> {
    let result = if html {
        pipeline.render_html(markdown)
    } else {
        pipeline.preprocess(markdown)
    };
    result.map_err(|source| CliError::Render {
        path: origin.display().to_string(),
        source,
    })
}
