//! Markdown preprocessor that renders model field tables.
//!
//! Documents reference models with a directive line:
//!
//! ```markdown
//! !docdantic: app.settings.Settings
//!   {"exclude": {"Settings": ["secret_key"]}}
//! ```
//!
//! The directive (and its optional JSON configuration block) is replaced by
//! one table per model: the referenced model first, then every nested model
//! it mentions.
//!
//! # Architecture
//!
//! - [`get_field_info`]: model declaration → ordered [`DocMapping`]
//! - [`render_table`]: dotted path → markdown tables, with exclusions applied
//! - [`extract_configuration`]: directive configuration block parsing
//! - [`DocdanticPreprocessor`]: single-pass line transform over a document
//! - [`MarkdownPipeline`]: ordered [`Preprocessor`]s followed by HTML
//!   rendering with pulldown-cmark
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use docdantic_model::{FieldSchema, ModelRegistry, ModelSchema, TypeAnnotation};
//! use docdantic_renderer::{DirectiveConfig, RenderOptions, render_table};
//!
//! let mut registry = ModelRegistry::new();
//! registry
//!     .register(
//!         ModelSchema::new("tests", "DummyModel")
//!             .with_field(FieldSchema::new("field", TypeAnnotation::primitive("int")).with_default(1)),
//!     )
//!     .unwrap();
//!
//! let table = render_table(
//!     &registry,
//!     "tests.DummyModel",
//!     &DirectiveConfig::default(),
//!     &RenderOptions::default(),
//! );
//! assert!(table.contains("| **field** | int | False | 1 |  |"));
//! ```

mod directive;
mod error;
mod fence;
mod fields;
mod pipeline;
mod preprocessor;
mod table;

pub use directive::{DirectiveConfig, extract_configuration, parse_directive};
pub use error::RenderError;
pub use fields::{ClassDoc, DocMapping, FieldDescriptor, get_field_info, highlight_name};
pub use pipeline::{MarkdownPipeline, Preprocessor};
pub use preprocessor::DocdanticPreprocessor;
pub use table::{RenderOptions, render_mapping, render_table};
