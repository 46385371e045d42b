//! Model and field declarations.

use serde_json::Value;

use crate::annotation::{ModelRef, TypeAnnotation};
use crate::value;

/// Display form of a missing default.
pub const NO_DEFAULT: &str = "...";

/// Default value of a field.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum FieldDefault {
    /// No default; the field is required.
    #[default]
    Undefined,
    /// Literal default value. `Value::Null` is a real `None` default.
    Value(Value),
    /// Default produced by a factory (e.g. `list`); the field is optional
    /// but has no literal to display.
    Factory(String),
}

impl FieldDefault {
    /// Whether a field with this default must be supplied.
    #[must_use]
    pub fn is_required(&self) -> bool {
        matches!(self, Self::Undefined)
    }
}

/// Display string for a field default.
///
/// Returns [`NO_DEFAULT`] when there is no literal default.
#[must_use]
pub fn get_default_string(default: &FieldDefault) -> String {
    match default {
        FieldDefault::Undefined | FieldDefault::Factory(_) => NO_DEFAULT.to_owned(),
        FieldDefault::Value(v) => value::display(v),
    }
}

/// Declaration of a single model field.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldSchema {
    /// Declared field name.
    pub name: String,
    /// Type annotation.
    pub annotation: TypeAnnotation,
    /// Default value or the no-default sentinel.
    pub default: FieldDefault,
    /// Field documentation.
    pub description: Option<String>,
}

impl FieldSchema {
    /// Create a required field without documentation.
    pub fn new(name: impl Into<String>, annotation: TypeAnnotation) -> Self {
        Self {
            name: name.into(),
            annotation,
            default: FieldDefault::Undefined,
            description: None,
        }
    }

    /// Set a literal default.
    #[must_use]
    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = FieldDefault::Value(default.into());
        self
    }

    /// Set a default factory.
    #[must_use]
    pub fn with_default_factory(mut self, factory: impl Into<String>) -> Self {
        self.default = FieldDefault::Factory(factory.into());
        self
    }

    /// Set the field description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Declaration of a model: its location, docstring and ordered fields.
#[derive(Clone, Debug, PartialEq)]
pub struct ModelSchema {
    /// Dotted module path (may be empty).
    pub module: String,
    /// Class name.
    pub name: String,
    /// Class documentation.
    pub doc: Option<String>,
    /// Fields in declaration order.
    pub fields: Vec<FieldSchema>,
}

impl ModelSchema {
    /// Create an empty model.
    pub fn new(module: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            name: name.into(),
            doc: None,
            fields: Vec::new(),
        }
    }

    /// Set the class documentation.
    #[must_use]
    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    /// Append a field.
    #[must_use]
    pub fn with_field(mut self, field: FieldSchema) -> Self {
        self.fields.push(field);
        self
    }

    /// Reference to this model.
    #[must_use]
    pub fn reference(&self) -> ModelRef {
        ModelRef::from_parts(&self.module, &self.name)
    }
}

/// A Rust type that can describe its own fields.
///
/// Implementations are registered with
/// [`ModelRegistry::register_model`](crate::ModelRegistry::register_model)
/// and can be referenced from other models with
/// [`TypeAnnotation::model_of`].
///
/// # Example
///
/// ```
/// use docdantic_model::{FieldSchema, Model, TypeAnnotation};
///
/// struct Server;
///
/// impl Model for Server {
///     const MODULE: &'static str = "app.config";
///     const NAME: &'static str = "Server";
///
///     fn fields() -> Vec<FieldSchema> {
///         vec![FieldSchema::new("port", TypeAnnotation::primitive("int")).with_default(8080)]
///     }
/// }
///
/// let schema = Server::schema();
/// assert_eq!(schema.reference().path(), "app.config.Server");
/// ```
pub trait Model {
    /// Dotted module path.
    const MODULE: &'static str;
    /// Class name.
    const NAME: &'static str;

    /// Field declarations in order.
    fn fields() -> Vec<FieldSchema>;

    /// Class documentation.
    fn doc() -> Option<&'static str> {
        None
    }

    /// Full schema for this model.
    fn schema() -> ModelSchema {
        ModelSchema {
            module: Self::MODULE.to_owned(),
            name: Self::NAME.to_owned(),
            doc: Self::doc().map(str::to_owned),
            fields: Self::fields(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_get_default_string() {
        assert_eq!(get_default_string(&FieldDefault::Undefined), "...");
        assert_eq!(
            get_default_string(&FieldDefault::Value(json!("test_default"))),
            "test_default"
        );
        assert_eq!(get_default_string(&FieldDefault::Value(json!(1))), "1");
        assert_eq!(get_default_string(&FieldDefault::Value(json!(null))), "None");
        assert_eq!(
            get_default_string(&FieldDefault::Factory("list".to_owned())),
            "..."
        );
    }

    #[test]
    fn test_required() {
        assert!(FieldDefault::Undefined.is_required());
        assert!(!FieldDefault::Value(json!(null)).is_required());
        assert!(!FieldDefault::Factory("dict".to_owned()).is_required());
    }

    #[test]
    fn test_field_builder() {
        let field = FieldSchema::new("tags", TypeAnnotation::list(TypeAnnotation::primitive("str")))
            .with_default_factory("list")
            .with_description("Free-form tags.");

        assert_eq!(field.name, "tags");
        assert_eq!(field.default, FieldDefault::Factory("list".to_owned()));
        assert_eq!(field.description.as_deref(), Some("Free-form tags."));
    }

    struct Dummy;

    impl Model for Dummy {
        const MODULE: &'static str = "tests";
        const NAME: &'static str = "Dummy";

        fn fields() -> Vec<FieldSchema> {
            vec![FieldSchema::new("field", TypeAnnotation::primitive("int")).with_default(1)]
        }

        fn doc() -> Option<&'static str> {
            Some("A dummy model.")
        }
    }

    #[test]
    fn test_model_trait_schema() {
        let schema = Dummy::schema();
        assert_eq!(schema.name, "Dummy");
        assert_eq!(schema.module, "tests");
        assert_eq!(schema.doc.as_deref(), Some("A dummy model."));
        assert_eq!(schema.fields.len(), 1);
        assert_eq!(schema.reference().path(), "tests.Dummy");
        assert_eq!(
            TypeAnnotation::model_of::<Dummy>(),
            TypeAnnotation::model("tests.Dummy")
        );
    }
}
