//! Directive syntax and its configuration block.
//!
//! ```markdown
//! !docdantic: app.settings.Settings
//!   {"exclude": {"Settings": ["secret_key"]}}
//! ```
//!
//! The configuration is optional. When present it is JSON spread over one or
//! more indented lines directly below the directive.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;

use crate::error::RenderError;

static DIRECTIVE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^!docdantic:\s*([A-Za-z_][A-Za-z0-9_]*(?:(?:\.|::)[A-Za-z_][A-Za-z0-9_]*)*)\s*$")
        .unwrap()
});

/// Per-directive configuration.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DirectiveConfig {
    /// Class name → field names to leave out of that class's table.
    pub exclude: HashMap<String, Vec<String>>,
}

/// Return the model path if `line` is a directive.
#[must_use]
pub fn parse_directive(line: &str) -> Option<&str> {
    DIRECTIVE_RE
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Parse the configuration block following the directive at `index`.
///
/// Consumes consecutive non-blank lines that start with whitespace. Returns
/// the configuration and the index of the first line after the block, which
/// is `index + 1` when there is no block.
///
/// # Errors
///
/// Returns [`RenderError::Configuration`] if the block is not valid JSON.
pub fn extract_configuration(
    index: usize,
    lines: &[impl AsRef<str>],
) -> Result<(DirectiveConfig, usize), RenderError> {
    let mut end = index + 1;
    let mut block = String::new();
    while let Some(line) = lines.get(end).map(|l| l.as_ref()) {
        if !is_continuation(line) {
            break;
        }
        block.push_str(line.trim());
        block.push('\n');
        end += 1;
    }

    if block.is_empty() {
        return Ok((DirectiveConfig::default(), end));
    }

    let config = serde_json::from_str(&block).map_err(|source| RenderError::Configuration {
        line: index + 1,
        source,
    })?;
    Ok((config, end))
}

fn is_continuation(line: &str) -> bool {
    line.starts_with(char::is_whitespace) && !line.trim().is_empty()
}
