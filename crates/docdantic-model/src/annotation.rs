//! Type annotations attached to model fields.
//!
//! An annotation is a small recursive tree: primitives and model references
//! at the leaves, `List`/`Set`/`Tuple`/`Dict`/`Union`/`Literal` as
//! containers. Its
//! [`Display`](std::fmt::Display) implementation produces the string shown in
//! the "Type" column of a rendered table, with nested models rendered as
//! cross-reference links.

use std::fmt;

use serde_json::Value;

use crate::value;

/// Reference to a model by its dotted path (`module.path.ClassName`).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ModelRef {
    path: String,
}

impl ModelRef {
    /// Create a reference from a dotted (or `::`-separated) path.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: normalize_path(&path.into()),
        }
    }

    /// Create a reference from a module path and a class name.
    #[must_use]
    pub fn from_parts(module: &str, name: &str) -> Self {
        if module.is_empty() {
            Self::new(name)
        } else {
            Self::new(format!("{module}.{name}"))
        }
    }

    /// Full dotted path.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Class name (last path segment).
    #[must_use]
    pub fn name(&self) -> &str {
        self.path.rsplit('.').next().unwrap_or(&self.path)
    }
}

/// Normalize `a::b::C` to `a.b.C`.
#[must_use]
pub fn normalize_path(path: &str) -> String {
    path.trim().replace("::", ".")
}

/// Type annotation of a model field.
#[derive(Clone, Debug, PartialEq)]
pub enum TypeAnnotation {
    /// Absent annotation or the `None` type.
    None,
    /// Plain named type such as `int` or `str`.
    Primitive(String),
    /// Another model, documented in its own table.
    Model(ModelRef),
    /// Homogeneous sequence.
    List(Box<TypeAnnotation>),
    /// Unordered collection of unique items.
    Set(Box<TypeAnnotation>),
    /// Fixed-length positional sequence, or `Tuple[X, ...]` when `variadic`.
    Tuple {
        /// Item types in position order (a single item when variadic).
        items: Vec<TypeAnnotation>,
        /// Any number of `items[0]`.
        variadic: bool,
    },
    /// Mapping from key type to value type.
    Dict(Box<TypeAnnotation>, Box<TypeAnnotation>),
    /// Any of several types.
    Union(Vec<TypeAnnotation>),
    /// One of a fixed set of literal values.
    Literal(Vec<Value>),
}

impl TypeAnnotation {
    /// Primitive type by name.
    pub fn primitive(name: impl Into<String>) -> Self {
        Self::Primitive(name.into())
    }

    /// Reference to a model by dotted path.
    pub fn model(path: impl Into<String>) -> Self {
        Self::Model(ModelRef::new(path))
    }

    /// Reference to a Rust type implementing [`Model`](crate::Model).
    #[must_use]
    pub fn model_of<M: crate::Model>() -> Self {
        Self::Model(ModelRef::from_parts(M::MODULE, M::NAME))
    }

    /// `List[inner]`.
    #[must_use]
    pub fn list(inner: Self) -> Self {
        Self::List(Box::new(inner))
    }

    /// `Set[inner]`.
    #[must_use]
    pub fn set(inner: Self) -> Self {
        Self::Set(Box::new(inner))
    }

    /// `Tuple[items...]`.
    #[must_use]
    pub fn tuple(items: Vec<Self>) -> Self {
        Self::Tuple {
            items,
            variadic: false,
        }
    }

    /// `Tuple[item, ...]`.
    #[must_use]
    pub fn variadic_tuple(item: Self) -> Self {
        Self::Tuple {
            items: vec![item],
            variadic: true,
        }
    }

    /// `Dict[key, value]`.
    #[must_use]
    pub fn dict(key: Self, value: Self) -> Self {
        Self::Dict(Box::new(key), Box::new(value))
    }

    /// `Union[members...]`.
    #[must_use]
    pub fn union(members: Vec<Self>) -> Self {
        Self::Union(members)
    }

    /// `Optional[inner]`, i.e. `Union[inner, None]`.
    #[must_use]
    pub fn optional(inner: Self) -> Self {
        Self::Union(vec![inner, Self::None])
    }

    /// `Literal[values...]`.
    #[must_use]
    pub fn literal(values: Vec<Value>) -> Self {
        Self::Literal(values)
    }

    /// Whether this is a `Literal[...]` annotation.
    #[must_use]
    pub fn is_literal(&self) -> bool {
        matches!(self, Self::Literal(_))
    }

    /// Whether this is a `Union[...]` annotation.
    #[must_use]
    pub fn is_union(&self) -> bool {
        matches!(self, Self::Union(_))
    }

    /// Whether this is a sequence annotation (`List`, `Set` or `Tuple`).
    #[must_use]
    pub fn is_list(&self) -> bool {
        matches!(self, Self::List(_) | Self::Set(_) | Self::Tuple { .. })
    }

    /// Whether this is a mapping annotation.
    #[must_use]
    pub fn is_dict(&self) -> bool {
        matches!(self, Self::Dict(..))
    }

    /// Whether this is a direct model reference.
    #[must_use]
    pub fn is_model(&self) -> bool {
        matches!(self, Self::Model(_))
    }

    /// All model references in this annotation, in left-to-right order.
    ///
    /// Duplicates are kept; callers deduplicate by name.
    #[must_use]
    pub fn model_refs(&self) -> Vec<&ModelRef> {
        let mut refs = Vec::new();
        self.collect_model_refs(&mut refs);
        refs
    }

    fn collect_model_refs<'a>(&'a self, refs: &mut Vec<&'a ModelRef>) {
        match self {
            Self::Model(r) => refs.push(r),
            Self::List(inner) | Self::Set(inner) => inner.collect_model_refs(refs),
            Self::Tuple { items, .. } => {
                for item in items {
                    item.collect_model_refs(refs);
                }
            }
            Self::Dict(key, value) => {
                key.collect_model_refs(refs);
                value.collect_model_refs(refs);
            }
            Self::Union(members) => {
                for member in members {
                    member.collect_model_refs(refs);
                }
            }
            Self::None | Self::Primitive(_) | Self::Literal(_) => {}
        }
    }
}

impl fmt::Display for TypeAnnotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("None"),
            Self::Primitive(name) => f.write_str(name),
            Self::Model(r) => f.write_str(&submodel_link(r.name())),
            Self::List(inner) => write!(f, "List[{inner}]"),
            Self::Set(inner) => write!(f, "Set[{inner}]"),
            Self::Tuple { items, variadic } => {
                f.write_str("Tuple[")?;
                write_joined(f, items.iter().map(ToString::to_string))?;
                if *variadic {
                    f.write_str(", ...")?;
                }
                f.write_str("]")
            }
            Self::Dict(key, value) => write!(f, "Dict[{key}, {value}]"),
            Self::Union(members) => match members.as_slice() {
                [inner, Self::None] | [Self::None, inner] => write!(f, "Optional[{inner}]"),
                _ => {
                    f.write_str("Union[")?;
                    write_joined(f, members.iter().map(ToString::to_string))?;
                    f.write_str("]")
                }
            },
            Self::Literal(values) => {
                f.write_str("Literal[")?;
                write_joined(f, values.iter().map(value::repr))?;
                f.write_str("]")
            }
        }
    }
}

fn write_joined(f: &mut fmt::Formatter<'_>, items: impl Iterator<Item = String>) -> fmt::Result {
    for (i, item) in items.enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        f.write_str(&item)?;
    }
    Ok(())
}

/// Display string for an optional annotation; `None` renders as `"None"`.
#[must_use]
pub fn get_annotation_string(annotation: Option<&TypeAnnotation>) -> String {
    annotation.map_or_else(|| "None".to_owned(), ToString::to_string)
}

/// Markdown link to the table of a nested model.
///
/// The anchor is the lowercased class name, matching the heading anchor
/// emitted by the table renderer.
#[must_use]
pub fn submodel_link(name: &str) -> String {
    format!("[{name}](#{})", name.to_lowercase())
}
