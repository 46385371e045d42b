//! Line preprocessor replacing directives with rendered tables.

use std::sync::Arc;

use docdantic_model::ModelRegistry;

use crate::directive::{extract_configuration, parse_directive};
use crate::error::RenderError;
use crate::fence::FenceTracker;
use crate::pipeline::Preprocessor;
use crate::table::{RenderOptions, render_table};

/// Preprocessor that expands `!docdantic:` directives.
///
/// Single forward pass over the document: ordinary lines are copied, each
/// directive and its configuration block are replaced by the rendered
/// tables. Directives inside fenced code blocks are left alone.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use docdantic_model::{FieldSchema, ModelRegistry, ModelSchema, TypeAnnotation};
/// use docdantic_renderer::DocdanticPreprocessor;
///
/// let mut registry = ModelRegistry::new();
/// registry
///     .register(
///         ModelSchema::new("app", "User")
///             .with_field(FieldSchema::new("name", TypeAnnotation::primitive("str"))),
///     )
///     .unwrap();
///
/// let preprocessor = DocdanticPreprocessor::new(Arc::new(registry));
/// let output = preprocessor.process("# Users\n\n!docdantic: app.User\n").unwrap();
///
/// assert!(output.contains("| **name** | str | True | ... |  |"));
/// assert!(!output.contains("!docdantic"));
/// ```
pub struct DocdanticPreprocessor {
    registry: Arc<ModelRegistry>,
    options: RenderOptions,
}

impl DocdanticPreprocessor {
    /// Default priority when registered in a [`MarkdownPipeline`](crate::MarkdownPipeline).
    pub const PRIORITY: i32 = 30;

    /// Create a preprocessor with default render options.
    #[must_use]
    pub fn new(registry: Arc<ModelRegistry>) -> Self {
        Self {
            registry,
            options: RenderOptions::default(),
        }
    }

    /// Set render options.
    #[must_use]
    pub fn with_options(mut self, options: RenderOptions) -> Self {
        self.options = options;
        self
    }

    /// Process the line at `index`.
    ///
    /// For a directive, returns the rendered tables and the index after its
    /// configuration block. Any other line is returned unchanged with
    /// `index + 1`.
    ///
    /// # Errors
    ///
    /// Fails if the directive's configuration block is not valid JSON.
    pub fn process_line(
        &self,
        index: usize,
        lines: &[impl AsRef<str>],
    ) -> Result<(String, usize), RenderError> {
        match self.expand(index, lines)? {
            Some(expanded) => Ok(expanded),
            None => Ok((
                lines
                    .get(index)
                    .map(|l| l.as_ref().to_owned())
                    .unwrap_or_default(),
                index + 1,
            )),
        }
    }

    /// Process a full document given as lines.
    ///
    /// Each expanded directive is followed by a blank line so the table does
    /// not run into the next block, unless the next input line is already
    /// blank.
    ///
    /// # Errors
    ///
    /// Fails on the first directive with an invalid configuration block.
    pub fn process_lines(&self, lines: &[impl AsRef<str>]) -> Result<Vec<String>, RenderError> {
        let mut fence = FenceTracker::new();
        let mut output = Vec::with_capacity(lines.len());
        let mut index = 0;

        while let Some(line) = lines.get(index).map(|l| l.as_ref()) {
            fence.update(line);
            if fence.in_fence() {
                output.push(line.to_owned());
                index += 1;
                continue;
            }

            match self.expand(index, lines)? {
                Some((rendered, next)) => {
                    output.extend(rendered.lines().map(str::to_owned));
                    if !lines.get(next).is_some_and(|l| l.as_ref().trim().is_empty()) {
                        output.push(String::new());
                    }
                    index = next;
                }
                None => {
                    output.push(line.to_owned());
                    index += 1;
                }
            }
        }

        Ok(output)
    }

    /// Process markdown text, preserving a trailing newline.
    ///
    /// # Errors
    ///
    /// Same as [`process_lines`](Self::process_lines).
    pub fn process(&self, markdown: &str) -> Result<String, RenderError> {
        let lines: Vec<&str> = markdown.lines().collect();
        let mut output = self.process_lines(&lines)?.join("\n");
        if markdown.ends_with('\n') {
            output.push('\n');
        }
        Ok(output)
    }

    fn expand(
        &self,
        index: usize,
        lines: &[impl AsRef<str>],
    ) -> Result<Option<(String, usize)>, RenderError> {
        let Some(path) = lines.get(index).and_then(|l| parse_directive(l.as_ref())) else {
            return Ok(None);
        };

        let (config, next) = extract_configuration(index, lines)?;
        tracing::debug!(path = %path, line = index + 1, "Expanding directive");
        let rendered = render_table(&self.registry, path, &config, &self.options);
        Ok(Some((rendered, next)))
    }
}

impl Preprocessor for DocdanticPreprocessor {
    fn name(&self) -> &str {
        "docdantic"
    }

    fn run(&self, lines: Vec<String>) -> Result<Vec<String>, RenderError> {
        self.process_lines(&lines)
    }
}
