//! `docdantic build` command implementation.

use std::path::{Path, PathBuf};

use clap::Args;
use docdantic_config::{CliSettings, Config};

use super::{pipeline, render_document};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the build command.
#[derive(Args)]
pub(crate) struct BuildArgs {
    /// Markdown source directory (overrides config).
    #[arg(short, long)]
    source_dir: Option<PathBuf>,

    /// Output directory for processed documents (overrides config).
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Render processed documents to HTML.
    #[arg(long)]
    html: bool,

    /// Path to configuration file (default: auto-discover docdantic.toml).
    #[arg(short, long, env = "DOCDANTIC_CONFIG")]
    config: Option<PathBuf>,
}

impl BuildArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            source_dir: self.source_dir,
            output_dir: self.output_dir,
            html: self.html.then_some(true),
            ..CliSettings::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        let source_dir = &config.docs_resolved.source_dir;
        let output_dir = &config.docs_resolved.output_dir;

        if !source_dir.is_dir() {
            return Err(CliError::Validation(format!(
                "source directory not found: {}",
                source_dir.display()
            )));
        }

        output.info(&format!("Source: {}", source_dir.display()));
        output.info(&format!("Output: {}", output_dir.display()));

        let pipeline = pipeline(&config)?;
        let sources = markdown_files(source_dir, output_dir)?;
        if sources.is_empty() {
            output.warning("No markdown files found");
            return Ok(());
        }

        for source in &sources {
            let target = target_path(source_dir, output_dir, source, config.render.html);
            let markdown = std::fs::read_to_string(source)?;
            let rendered = render_document(&pipeline, &markdown, config.render.html, source)?;

            if let Some(parent) = target.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&target, rendered)?;
            tracing::info!(source = %source.display(), target = %target.display(), "Processed document");
        }

        output.success(&format!(
            "Processed {} documents to {}",
            sources.len(),
            output_dir.display()
        ));
        Ok(())
    }
}

/// All `*.md` files below `source_dir`, sorted.
///
/// Files under `output_dir` are skipped so an output directory nested in the
/// sources is not processed again on the next run.
fn markdown_files(source_dir: &Path, output_dir: &Path) -> Result<Vec<PathBuf>, CliError> {
    let output_dir = output_dir.canonicalize().ok();
    let pattern = format!(
        "{}/**/*.md",
        glob::Pattern::escape(&source_dir.to_string_lossy())
    );
    let mut files = Vec::new();
    for entry in glob::glob(&pattern)? {
        let path = entry.map_err(glob::GlobError::into_error)?;
        let generated = output_dir
            .as_deref()
            .is_some_and(|out| path.canonicalize().is_ok_and(|p| p.starts_with(out)));
        if generated {
            tracing::debug!(path = %path.display(), "Skipping file in output directory");
            continue;
        }
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Mirror `source` from `source_dir` into `output_dir`.
fn target_path(source_dir: &Path, output_dir: &Path, source: &Path, html: bool) -> PathBuf {
    let relative = source.strip_prefix(source_dir).unwrap_or(source);
    let target = output_dir.join(relative);
    if html {
        target.with_extension("html")
    } else {
        target
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_target_path() {
        let source = Path::new("/docs/guide/config.md");
        assert_eq!(
            target_path(Path::new("/docs"), Path::new("/site"), source, false),
            PathBuf::from("/site/guide/config.md")
        );
        assert_eq!(
            target_path(Path::new("/docs"), Path::new("/site"), source, true),
            PathBuf::from("/site/guide/config.html")
        );
    }

    #[test]
    fn test_markdown_files_recursive_and_sorted() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("b/nested")).unwrap();
        std::fs::write(dir.path().join("index.md"), "").unwrap();
        std::fs::write(dir.path().join("b/nested/deep.md"), "").unwrap();
        std::fs::write(dir.path().join("b/notes.txt"), "").unwrap();
        std::fs::write(dir.path().join("a.md"), "").unwrap();

        let files = markdown_files(dir.path(), &dir.path().join("site")).unwrap();
        assert_eq!(
            files,
            vec![
                dir.path().join("a.md"),
                dir.path().join("b/nested/deep.md"),
                dir.path().join("index.md"),
            ]
        );
    }

    #[test]
    fn test_markdown_files_skip_output_dir() {
        let dir = tempfile::tempdir().unwrap();
        let docs = dir.path().join("docs");
        std::fs::create_dir_all(docs.join("site/guide")).unwrap();
        std::fs::write(docs.join("index.md"), "").unwrap();
        std::fs::write(docs.join("site/index.md"), "").unwrap();
        std::fs::write(docs.join("site/guide/config.md"), "").unwrap();

        let files = markdown_files(&docs, &docs.join("site")).unwrap();
        assert_eq!(files, vec![docs.join("index.md")]);
    }
}
