//! Registry of documented models, addressed by dotted path.

use std::collections::BTreeMap;

use crate::annotation::{ModelRef, normalize_path};
use crate::error::ModelError;
use crate::schema::{Model, ModelSchema};

/// Registered models grouped by module.
///
/// Lookups never fail loudly: an unknown module or class yields `None`.
///
/// # Example
///
/// ```
/// use docdantic_model::{FieldSchema, ModelRegistry, ModelSchema, TypeAnnotation};
///
/// let mut registry = ModelRegistry::new();
/// registry
///     .register(
///         ModelSchema::new("app.models", "User")
///             .with_field(FieldSchema::new("name", TypeAnnotation::primitive("str"))),
///     )
///     .unwrap();
///
/// assert!(registry.import_class("app.models.User").is_some());
/// assert!(registry.import_class("app.models.Missing").is_none());
/// assert!(registry.import_class("missing.User").is_none());
/// ```
#[derive(Debug, Default)]
pub struct ModelRegistry {
    modules: BTreeMap<String, BTreeMap<String, ModelSchema>>,
}

impl ModelRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a model schema.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::Duplicate`] if the path is already taken and
    /// [`ModelError::InvalidPath`] if the class name is empty or contains a
    /// path separator.
    pub fn register(&mut self, schema: ModelSchema) -> Result<(), ModelError> {
        let path = schema.reference().path().to_owned();
        let name = schema.name.as_str();
        if name.trim().is_empty() || name.contains('.') || name.contains("::") {
            return Err(ModelError::InvalidPath(path));
        }

        let module = self
            .modules
            .entry(normalize_path(&schema.module))
            .or_default();
        if module.contains_key(&schema.name) {
            return Err(ModelError::Duplicate(path));
        }

        tracing::debug!(path = %path, fields = schema.fields.len(), "Registered model");
        module.insert(schema.name.clone(), schema);
        Ok(())
    }

    /// Register a Rust type implementing [`Model`].
    ///
    /// # Errors
    ///
    /// Same as [`register`](Self::register).
    pub fn register_model<M: Model>(&mut self) -> Result<(), ModelError> {
        self.register(M::schema())
    }

    /// Resolve a dotted path (`module.path.ClassName`) to a model.
    ///
    /// `::` separators are accepted. Returns `None` for a missing module, a
    /// missing class, or a malformed path.
    #[must_use]
    pub fn import_class(&self, path: &str) -> Option<&ModelSchema> {
        let path = normalize_path(path);
        if path.is_empty() {
            return None;
        }
        let (module, name) = match path.rsplit_once('.') {
            Some((module, name)) => (module, name),
            None => ("", path.as_str()),
        };

        let Some(models) = self.modules.get(module) else {
            tracing::debug!(path = %path, "Module not found");
            return None;
        };
        let schema = models.get(name);
        if schema.is_none() {
            tracing::debug!(path = %path, "Model not found in module");
        }
        schema
    }

    /// Resolve a model reference.
    #[must_use]
    pub fn resolve(&self, reference: &ModelRef) -> Option<&ModelSchema> {
        self.import_class(reference.path())
    }

    /// Number of registered models.
    #[must_use]
    pub fn len(&self) -> usize {
        self.modules.values().map(BTreeMap::len).sum()
    }

    /// Whether no models are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate over all models ordered by module, then class name.
    pub fn iter(&self) -> impl Iterator<Item = &ModelSchema> {
        self.modules.values().flat_map(BTreeMap::values)
    }
}
