//! Configuration management for docdantic.
//!
//! Parses `docdantic.toml` with serde and auto-discovers it in the current
//! directory or its parents. CLI settings are applied after loading via
//! [`CliSettings`].
//!
//! ```toml
//! [models]
//! schemas = ["models/*.yaml"]
//!
//! [docs]
//! source_dir = "docs"
//! output_dir = "site"
//!
//! [render]
//! heading_level = 3
//! html = false
//! ```
//!
//! ## Environment Variable Expansion
//!
//! `models.schemas`, `docs.source_dir` and `docs.output_dir` support
//! `${VAR}` and `${VAR:-default}`.

mod expand;

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "docdantic.toml";

/// CLI settings that override configuration file values.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override markdown source directory.
    pub source_dir: Option<PathBuf>,
    /// Override output directory.
    pub output_dir: Option<PathBuf>,
    /// Override HTML rendering.
    pub html: Option<bool>,
    /// Extra schema files, loaded after the configured ones.
    pub schemas: Vec<PathBuf>,
}

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Model schema sources.
    models: ModelsConfigRaw,
    /// Document locations (relative strings from TOML).
    docs: DocsConfigRaw,
    /// Table rendering options.
    pub render: RenderConfig,

    /// Resolved model schema sources (set after loading).
    #[serde(skip)]
    pub models_resolved: ModelsConfig,
    /// Resolved document locations (set after loading).
    #[serde(skip)]
    pub docs_resolved: DocsConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
struct ModelsConfigRaw {
    schemas: Vec<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
struct DocsConfigRaw {
    source_dir: Option<String>,
    output_dir: Option<String>,
}

/// Resolved model schema sources.
#[derive(Debug, Default)]
pub struct ModelsConfig {
    /// Absolute glob patterns for schema files.
    pub patterns: Vec<String>,
    /// Schema files given explicitly on the command line.
    pub files: Vec<PathBuf>,
}

/// Resolved document locations.
#[derive(Debug, Default)]
pub struct DocsConfig {
    /// Directory scanned for markdown sources.
    pub source_dir: PathBuf,
    /// Directory processed documents are written to.
    pub output_dir: PathBuf,
}

/// Table rendering configuration.
#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderConfig {
    /// Heading level for class headings (1-6).
    pub heading_level: u8,
    /// Render processed documents to HTML.
    pub html: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            heading_level: 3,
            html: false,
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Invalid glob pattern.
    #[error("Invalid schema pattern: {0}")]
    Pattern(#[from] glob::PatternError),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`docs.source_dir`").
        field: String,
        /// Error message (e.g., "${`DOCS_DIR`} not set").
        message: String,
    },
}

impl Config {
    /// Load configuration with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file. Otherwise searches
    /// for `docdantic.toml` in the current directory and its parents, falling
    /// back to defaults relative to the current directory.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist or parsing fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        Ok(config)
    }

    /// Schema files to load: configured glob matches (sorted per pattern),
    /// then explicit files. Duplicates are dropped.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Pattern` for a malformed pattern and
    /// `ConfigError::Validation` for a literal path that does not exist.
    pub fn schema_files(&self) -> Result<Vec<PathBuf>, ConfigError> {
        let mut files: Vec<PathBuf> = Vec::new();
        for pattern in &self.models_resolved.patterns {
            let mut matches: Vec<PathBuf> = glob::glob(pattern)?
                .filter_map(Result::ok)
                .filter(|p| p.is_file())
                .collect();
            if matches.is_empty() && !is_glob(pattern) {
                return Err(ConfigError::Validation(format!(
                    "schema file not found: {pattern}"
                )));
            }
            matches.sort();
            for path in matches {
                if !files.contains(&path) {
                    files.push(path);
                }
            }
        }
        for path in &self.models_resolved.files {
            if !files.contains(path) {
                files.push(path.clone());
            }
        }
        Ok(files)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=6).contains(&self.render.heading_level) {
            return Err(ConfigError::Validation(
                "render.heading_level must be between 1 and 6".to_owned(),
            ));
        }
        if self.models.schemas.iter().any(|s| s.trim().is_empty()) {
            return Err(ConfigError::Validation(
                "models.schemas entries cannot be empty".to_owned(),
            ));
        }
        Ok(())
    }

    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(source_dir) = &settings.source_dir {
            self.docs_resolved.source_dir.clone_from(source_dir);
        }
        if let Some(output_dir) = &settings.output_dir {
            self.docs_resolved.output_dir.clone_from(output_dir);
        }
        if let Some(html) = settings.html {
            self.render.html = html;
        }
        self.models_resolved
            .files
            .extend(settings.schemas.iter().cloned());
    }

    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    fn default_with_base(base: &Path) -> Self {
        Self {
            models: ModelsConfigRaw::default(),
            docs: DocsConfigRaw::default(),
            render: RenderConfig::default(),
            models_resolved: ModelsConfig::default(),
            docs_resolved: DocsConfig {
                source_dir: base.join("docs"),
                output_dir: base.join("site"),
            },
            config_path: None,
        }
    }

    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        for schema in &mut self.models.schemas {
            *schema = expand::expand_env(schema, "models.schemas")?;
        }
        if let Some(ref dir) = self.docs.source_dir {
            self.docs.source_dir = Some(expand::expand_env(dir, "docs.source_dir")?);
        }
        if let Some(ref dir) = self.docs.output_dir {
            self.docs.output_dir = Some(expand::expand_env(dir, "docs.output_dir")?);
        }
        Ok(())
    }

    /// Resolve relative paths and patterns against the config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let resolve = |path: Option<&str>, default: &str| config_dir.join(path.unwrap_or(default));

        self.docs_resolved = DocsConfig {
            source_dir: resolve(self.docs.source_dir.as_deref(), "docs"),
            output_dir: resolve(self.docs.output_dir.as_deref(), "site"),
        };

        self.models_resolved.patterns = self
            .models
            .schemas
            .iter()
            .map(|pattern| config_dir.join(pattern).to_string_lossy().into_owned())
            .collect();
    }
}

fn is_glob(pattern: &str) -> bool {
    pattern.contains(['*', '?', '['])
}
