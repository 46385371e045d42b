//! Error types for schema loading and annotation parsing.

use std::path::PathBuf;

/// Error while parsing a type annotation expression.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AnnotationError {
    /// Input ended in the middle of an expression.
    #[error("unexpected end of annotation")]
    UnexpectedEnd,
    /// A character that cannot start or continue the expression.
    #[error("unexpected '{found}' at offset {offset}")]
    UnexpectedChar {
        /// Offending character.
        found: char,
        /// Byte offset into the annotation.
        offset: usize,
    },
    /// Subscripted name that is not a known generic.
    #[error("unknown generic type '{0}'")]
    UnknownGeneric(String),
    /// Generic given the wrong number of arguments.
    #[error("{name} expects {expected} argument(s), found {found}")]
    Arity {
        /// Generic name as written.
        name: String,
        /// Expected argument count description.
        expected: &'static str,
        /// Number of arguments given.
        found: usize,
    },
    /// `Literal[...]` member that is not a literal value.
    #[error("invalid literal value '{0}'")]
    InvalidLiteral(String),
}

/// Error while building the model registry.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// I/O error reading a schema file.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        /// Schema file path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
    /// YAML schema file could not be parsed.
    #[error("invalid schema file {}: {source}", path.display())]
    Yaml {
        /// Schema file path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: serde_yaml::Error,
    },
    /// JSON schema file could not be parsed.
    #[error("invalid schema file {}: {source}", path.display())]
    Json {
        /// Schema file path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: serde_json::Error,
    },
    /// Field annotation could not be parsed.
    #[error("invalid annotation for {model}.{field}: {source}")]
    Annotation {
        /// Model name.
        model: String,
        /// Field name.
        field: String,
        /// Parse failure.
        #[source]
        source: AnnotationError,
    },
    /// Field declares both a default and a default factory.
    #[error("{model}.{field} declares both default and default_factory")]
    ConflictingDefault {
        /// Model name.
        model: String,
        /// Field name.
        field: String,
    },
    /// Model path is not a valid dotted path.
    #[error("invalid model path '{0}'")]
    InvalidPath(String),
    /// Model registered twice under the same path.
    #[error("model '{0}' is already registered")]
    Duplicate(String),
}
