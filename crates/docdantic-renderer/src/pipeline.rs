//! Markdown pipeline with pluggable line preprocessors.
//!
//! Preprocessors see the raw document as a list of lines and return a
//! replacement list. They run in priority order (highest first) before the
//! result is handed to pulldown-cmark.

use pulldown_cmark::{Options, Parser, html};

use crate::error::RenderError;

/// Pre-parse transform over the raw lines of a document.
pub trait Preprocessor {
    /// Name used in logs.
    fn name(&self) -> &str;

    /// Transform the full line list.
    fn run(&self, lines: Vec<String>) -> Result<Vec<String>, RenderError>;
}

struct Registered {
    priority: i32,
    preprocessor: Box<dyn Preprocessor>,
}

/// Markdown-to-HTML pipeline.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use docdantic_model::{FieldSchema, ModelRegistry, ModelSchema, TypeAnnotation};
/// use docdantic_renderer::{DocdanticPreprocessor, MarkdownPipeline};
///
/// let mut registry = ModelRegistry::new();
/// registry
///     .register(
///         ModelSchema::new("app", "User")
///             .with_field(FieldSchema::new("name", TypeAnnotation::primitive("str"))),
///     )
///     .unwrap();
///
/// let pipeline = MarkdownPipeline::new().with_preprocessor(
///     DocdanticPreprocessor::new(Arc::new(registry)),
///     DocdanticPreprocessor::PRIORITY,
/// );
/// let html = pipeline.render_html("!docdantic: app.User\n").unwrap();
///
/// assert!(html.contains(r#"<h3 id="user">User</h3>"#));
/// assert!(html.contains("<table>"));
/// ```
pub struct MarkdownPipeline {
    preprocessors: Vec<Registered>,
}

impl MarkdownPipeline {
    /// Create a pipeline without preprocessors.
    #[must_use]
    pub fn new() -> Self {
        Self {
            preprocessors: Vec::new(),
        }
    }

    /// Add a preprocessor (builder form of [`register`](Self::register)).
    #[must_use]
    pub fn with_preprocessor(
        mut self,
        preprocessor: impl Preprocessor + 'static,
        priority: i32,
    ) -> Self {
        self.register(preprocessor, priority);
        self
    }

    /// Add a preprocessor. Equal priorities keep registration order.
    pub fn register(&mut self, preprocessor: impl Preprocessor + 'static, priority: i32) {
        let position = self
            .preprocessors
            .iter()
            .position(|r| r.priority < priority)
            .unwrap_or(self.preprocessors.len());
        self.preprocessors.insert(
            position,
            Registered {
                priority,
                preprocessor: Box::new(preprocessor),
            },
        );
    }

    /// Preprocessor names in execution order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.preprocessors.iter().map(|r| r.preprocessor.name())
    }

    /// Parser options: GFM tables plus `{#id}` heading attributes.
    #[must_use]
    pub fn parser_options() -> Options {
        Options::ENABLE_TABLES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS
            | Options::ENABLE_HEADING_ATTRIBUTES
    }

    /// Run all preprocessors over `markdown`.
    ///
    /// # Errors
    ///
    /// Returns the first preprocessor error.
    pub fn preprocess(&self, markdown: &str) -> Result<String, RenderError> {
        let mut lines: Vec<String> = markdown.lines().map(str::to_owned).collect();
        for registered in &self.preprocessors {
            tracing::debug!(
                preprocessor = registered.preprocessor.name(),
                lines = lines.len(),
                "Running preprocessor"
            );
            lines = registered.preprocessor.run(lines)?;
        }

        let mut output = lines.join("\n");
        if markdown.ends_with('\n') {
            output.push('\n');
        }
        Ok(output)
    }

    /// Preprocess and render `markdown` to HTML.
    ///
    /// # Errors
    ///
    /// Returns the first preprocessor error.
    pub fn render_html(&self, markdown: &str) -> Result<String, RenderError> {
        let text = self.preprocess(markdown)?;
        let parser = Parser::new_ext(&text, Self::parser_options());
        let mut output = String::with_capacity(text.len() * 3 / 2);
        html::push_html(&mut output, parser);
        Ok(output)
    }
}

impl Default for MarkdownPipeline {
    fn default() -> Self {
        Self::new()
    }
}
