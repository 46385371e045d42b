//! Model declarations for docdantic.
//!
//! This crate describes the data models whose fields are rendered into
//! documentation tables:
//!
//! - [`TypeAnnotation`]: recursive field type (primitive, model reference,
//!   list, dict, union, literal) with a display form used in tables
//! - [`ModelSchema`] / [`FieldSchema`]: ordered field declarations with
//!   defaults and descriptions
//! - [`Model`]: trait for Rust types that describe their own fields
//! - [`ModelRegistry`]: dotted-path lookup of models, populated from Rust
//!   types or from YAML/JSON schema files
//!
//! # Example
//!
//! ```
//! use docdantic_model::{ModelRegistry, SchemaFormat};
//! use std::path::Path;
//!
//! let mut registry = ModelRegistry::new();
//! registry
//!     .load_str(
//!         "module: app\nmodels:\n  - name: User\n    fields:\n      - name: tags\n        type: List[str]\n",
//!         SchemaFormat::Yaml,
//!         Path::new("inline.yaml"),
//!     )
//!     .unwrap();
//!
//! let user = registry.import_class("app.User").unwrap();
//! assert_eq!(user.fields[0].annotation.to_string(), "List[str]");
//! ```

mod annotation;
mod error;
mod loader;
mod parse;
mod registry;
mod schema;
pub mod value;

pub use annotation::{ModelRef, TypeAnnotation, get_annotation_string, normalize_path, submodel_link};
pub use error::{AnnotationError, ModelError};
pub use loader::SchemaFormat;
pub use parse::{parse_annotation, parse_annotation_with};
pub use registry::ModelRegistry;
pub use schema::{FieldDefault, FieldSchema, Model, ModelSchema, NO_DEFAULT, get_default_string};
