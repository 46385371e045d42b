//! Loading model declarations from YAML or JSON schema files.
//!
//! ```yaml
//! module: app.settings
//! models:
//!   - name: Settings
//!     doc: Application settings.
//!     fields:
//!       - name: servers
//!         type: List[Server]
//!         default_factory: list
//!   - name: Server
//!     fields:
//!       - name: port
//!         type: int
//!         default: 8080
//! ```
//!
//! A field without `default` or `default_factory` is required; `default: null`
//! is an explicit `None` default. Bare type names matching a model declared in
//! the same file refer to that model.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::annotation::{ModelRef, TypeAnnotation};
use crate::error::ModelError;
use crate::parse::{default_resolver, parse_annotation_with};
use crate::registry::ModelRegistry;
use crate::schema::{FieldDefault, FieldSchema, ModelSchema};

/// Schema file encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaFormat {
    /// YAML document.
    Yaml,
    /// JSON document.
    Json,
}

impl SchemaFormat {
    /// Pick the format from a file extension; anything but `.json` is YAML.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Yaml,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SchemaFile {
    #[serde(default)]
    module: String,
    #[serde(default)]
    models: Vec<ModelEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ModelEntry {
    name: String,
    #[serde(default)]
    doc: Option<String>,
    #[serde(default)]
    fields: Vec<FieldEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FieldEntry {
    name: String,
    #[serde(rename = "type", default)]
    annotation: Option<String>,
    #[serde(default, deserialize_with = "present")]
    default: Option<Value>,
    #[serde(default)]
    default_factory: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

/// Distinguish `default: null` (Some(Null)) from an absent key (None).
fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

impl ModelRegistry {
    /// Load every model declared in a schema file.
    ///
    /// Returns the number of models registered.
    ///
    /// # Errors
    ///
    /// Fails on I/O errors, malformed documents, invalid annotations and
    /// duplicate model paths.
    pub fn load_file(&mut self, path: &Path) -> Result<usize, ModelError> {
        let content = std::fs::read_to_string(path).map_err(|source| ModelError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let count = self.load_str(&content, SchemaFormat::from_path(path), path)?;
        tracing::info!(path = %path.display(), models = count, "Loaded schema file");
        Ok(count)
    }

    /// Load models from schema text. `origin` is only used in error messages.
    ///
    /// # Errors
    ///
    /// Same as [`load_file`](Self::load_file).
    pub fn load_str(
        &mut self,
        content: &str,
        format: SchemaFormat,
        origin: &Path,
    ) -> Result<usize, ModelError> {
        let file: SchemaFile = match format {
            SchemaFormat::Yaml => {
                serde_yaml::from_str(content).map_err(|source| ModelError::Yaml {
                    path: origin.to_path_buf(),
                    source,
                })?
            }
            SchemaFormat::Json => {
                serde_json::from_str(content).map_err(|source| ModelError::Json {
                    path: origin.to_path_buf(),
                    source,
                })?
            }
        };

        let schemas = build_schemas(file)?;
        let count = schemas.len();
        for schema in schemas {
            self.register(schema)?;
        }
        Ok(count)
    }
}

fn build_schemas(file: SchemaFile) -> Result<Vec<ModelSchema>, ModelError> {
    let local: HashSet<&str> = file.models.iter().map(|m| m.name.as_str()).collect();
    let module = file.module.as_str();
    let resolve = |name: &str| {
        if local.contains(name) {
            TypeAnnotation::Model(ModelRef::from_parts(module, name))
        } else {
            default_resolver(name)
        }
    };

    let mut schemas = Vec::with_capacity(file.models.len());
    for entry in &file.models {
        let mut schema = ModelSchema::new(module, entry.name.clone());
        schema.doc = entry
            .doc
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(str::to_owned);

        for field in &entry.fields {
            let annotation = match field.annotation.as_deref() {
                Some(text) => {
                    parse_annotation_with(text, &resolve).map_err(|source| {
                        ModelError::Annotation {
                            model: entry.name.clone(),
                            field: field.name.clone(),
                            source,
                        }
                    })?
                }
                None => TypeAnnotation::None,
            };
            let default = match (&field.default, &field.default_factory) {
                (Some(_), Some(_)) => {
                    return Err(ModelError::ConflictingDefault {
                        model: entry.name.clone(),
                        field: field.name.clone(),
                    });
                }
                (Some(value), None) => FieldDefault::Value(value.clone()),
                (None, Some(factory)) => FieldDefault::Factory(factory.clone()),
                (None, None) => FieldDefault::Undefined,
            };
            schema.fields.push(FieldSchema {
                name: field.name.clone(),
                annotation,
                default,
                description: field.description.clone(),
            });
        }
        schemas.push(schema);
    }
    Ok(schemas)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    const SETTINGS: &str = r"
module: app.settings
models:
  - name: Settings
    doc: |
      Application settings.
    fields:
      - name: host
        type: str
        default: localhost
        description: Bind address.
      - name: servers
        type: List[Server]
        default_factory: list
      - name: fallback
        type: Optional[Server]
        default: null
      - name: mode
        type: Literal['dev', 'prod']
  - name: Server
    fields:
      - name: port
        type: int
";

    fn load(content: &str, format: SchemaFormat) -> Result<ModelRegistry, ModelError> {
        let mut registry = ModelRegistry::new();
        registry.load_str(content, format, Path::new("models.yaml"))?;
        Ok(registry)
    }

    #[test]
    fn test_load_yaml() {
        let registry = load(SETTINGS, SchemaFormat::Yaml).unwrap();
        assert_eq!(registry.len(), 2);

        let settings = registry.import_class("app.settings.Settings").unwrap();
        assert_eq!(settings.doc.as_deref(), Some("Application settings."));
        assert_eq!(settings.fields.len(), 4);

        let host = &settings.fields[0];
        assert_eq!(host.annotation, TypeAnnotation::primitive("str"));
        assert_eq!(host.default, FieldDefault::Value(json!("localhost")));
        assert_eq!(host.description.as_deref(), Some("Bind address."));

        let servers = &settings.fields[1];
        assert_eq!(
            servers.annotation,
            TypeAnnotation::list(TypeAnnotation::model("app.settings.Server"))
        );
        assert_eq!(servers.default, FieldDefault::Factory("list".to_owned()));

        let fallback = &settings.fields[2];
        assert_eq!(fallback.default, FieldDefault::Value(Value::Null));
        assert_eq!(fallback.annotation.to_string(), "Optional[[Server](#server)]");

        let mode = &settings.fields[3];
        assert!(mode.annotation.is_literal());
        assert_eq!(mode.default, FieldDefault::Undefined);
    }

    #[test]
    fn test_load_json() {
        let content = r#"{
            "module": "tests",
            "models": [
                {"name": "DummyModel", "fields": [{"name": "field", "type": "int", "default": 1}]}
            ]
        }"#;
        let registry = load(content, SchemaFormat::Json).unwrap();
        let model = registry.import_class("tests.DummyModel").unwrap();
        assert_eq!(model.doc, None);
        assert_eq!(model.fields[0].default, FieldDefault::Value(json!(1)));
    }

    #[test]
    fn test_missing_type_is_none() {
        let registry = load(
            "module: m\nmodels:\n  - name: A\n    fields:\n      - name: x\n",
            SchemaFormat::Yaml,
        )
        .unwrap();
        let model = registry.import_class("m.A").unwrap();
        assert_eq!(model.fields[0].annotation, TypeAnnotation::None);
    }

    #[test]
    fn test_invalid_annotation() {
        let err = load(
            "module: m\nmodels:\n  - name: A\n    fields:\n      - name: x\n        type: List[int\n",
            SchemaFormat::Yaml,
        )
        .unwrap_err();
        assert!(matches!(err, ModelError::Annotation { ref field, .. } if field == "x"));
        assert!(err.to_string().contains("A.x"));
    }

    #[test]
    fn test_tuple_and_set_fields() {
        let registry = load(
            "module: m\nmodels:\n  - name: A\n    fields:\n      - name: pair\n        type: Tuple[int, str]\n      - name: many\n        type: Tuple[A, ...]\n      - name: tags\n        type: Set[str]\n",
            SchemaFormat::Yaml,
        )
        .unwrap();
        let model = registry.import_class("m.A").unwrap();
        let types: Vec<String> = model
            .fields
            .iter()
            .map(|f| f.annotation.to_string())
            .collect();
        assert_eq!(types, vec!["Tuple[int, str]", "Tuple[[A](#a), ...]", "Set[str]"]);
    }

    #[test]
    fn test_conflicting_default() {
        let err = load(
            "models:\n  - name: A\n    fields:\n      - name: x\n        default: []\n        default_factory: list\n",
            SchemaFormat::Yaml,
        )
        .unwrap_err();
        assert!(matches!(err, ModelError::ConflictingDefault { .. }));
    }

    #[test]
    fn test_unknown_key_rejected() {
        let err = load("models:\n  - name: A\n    fieldz: []\n", SchemaFormat::Yaml).unwrap_err();
        assert!(matches!(err, ModelError::Yaml { .. }));
    }

    #[test]
    fn test_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.yaml");
        std::fs::write(&path, SETTINGS).unwrap();

        let mut registry = ModelRegistry::new();
        assert_eq!(registry.load_file(&path).unwrap(), 2);

        // Loading the same file twice collides
        assert!(matches!(
            registry.load_file(&path),
            Err(ModelError::Duplicate(_))
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let mut registry = ModelRegistry::new();
        let err = registry
            .load_file(Path::new("/nonexistent/models.yaml"))
            .unwrap_err();
        assert!(matches!(err, ModelError::Io { .. }));
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(SchemaFormat::from_path(Path::new("a.json")), SchemaFormat::Json);
        assert_eq!(SchemaFormat::from_path(Path::new("a.JSON")), SchemaFormat::Json);
        assert_eq!(SchemaFormat::from_path(Path::new("a.yml")), SchemaFormat::Yaml);
        assert_eq!(SchemaFormat::from_path(Path::new("a")), SchemaFormat::Yaml);
    }
}
