//! Markdown table rendering for extracted model documentation.

use std::fmt::Write;

use docdantic_model::ModelRegistry;

use crate::directive::DirectiveConfig;
use crate::fields::{ClassDoc, DocMapping, FieldDescriptor, get_field_info};

/// Column headers of a rendered table.
const HEADER: &str = "| Name | Type | Required | Default | Description |";
const SEPARATOR: &str = "|------|------|----------|---------|-------------|";

/// Options controlling table output.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderOptions {
    /// Markdown heading level (1-6) for each class heading.
    pub heading_level: u8,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self { heading_level: 3 }
    }
}

/// Render the tables for the model at `path`.
///
/// Returns an empty string when the model is not registered; the failure is
/// logged rather than surfaced to the document.
#[must_use]
pub fn render_table(
    registry: &ModelRegistry,
    path: &str,
    config: &DirectiveConfig,
    options: &RenderOptions,
) -> String {
    let Some(model) = registry.import_class(path) else {
        tracing::warn!(path = %path, "Model not found, skipping directive");
        return String::new();
    };

    let mut mapping = get_field_info(registry, model);
    apply_exclusions(&mut mapping, config);
    render_mapping(&mapping, options)
}

/// Drop excluded fields from their classes.
pub(crate) fn apply_exclusions(mapping: &mut DocMapping, config: &DirectiveConfig) {
    for (class, fields) in &config.exclude {
        let Some(doc) = mapping.get(class) else {
            tracing::debug!(class = %class, "Exclusion names a class not in this table");
            continue;
        };
        for field in fields {
            if !doc.fields.iter().any(|f| f.field_name() == field) {
                tracing::debug!(class = %class, field = %field, "Excluded field does not exist");
            }
        }
    }

    for doc in mapping.iter_mut() {
        if let Some(excluded) = config.exclude.get(&doc.name) {
            doc.fields
                .retain(|f| !excluded.iter().any(|name| name == f.field_name()));
        }
    }
}

/// Render every class in the mapping, separated by blank lines.
#[must_use]
pub fn render_mapping(mapping: &DocMapping, options: &RenderOptions) -> String {
    mapping
        .iter()
        .map(|doc| render_class(doc, options))
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn render_class(doc: &ClassDoc, options: &RenderOptions) -> String {
    let level = usize::from(options.heading_level.clamp(1, 6));
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} {} {{#{}}}",
        "#".repeat(level),
        doc.name,
        doc.name.to_lowercase()
    );
    out.push('\n');

    if let Some(text) = doc.doc.as_deref().map(str::trim).filter(|d| !d.is_empty()) {
        out.push_str(text);
        out.push_str("\n\n");
    }

    out.push_str(HEADER);
    out.push('\n');
    out.push_str(SEPARATOR);
    for field in &doc.fields {
        out.push('\n');
        out.push_str(&render_row(field));
    }
    out
}

fn render_row(field: &FieldDescriptor) -> String {
    format!(
        "| {} | {} | {} | {} | {} |",
        escape_cell(&field.name),
        escape_cell(&field.r#type),
        escape_cell(&field.required),
        escape_cell(&field.default),
        escape_cell(&field.description),
    )
}

/// Keep cell text on one line and escape column separators.
fn escape_cell(text: &str) -> String {
    text.split(['\r', '\n'])
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
        .replace('|', "\\|")
}
