//! Field extraction: from a model declaration to display-ready descriptors.

use std::collections::HashSet;

use docdantic_model::{FieldSchema, ModelRegistry, ModelSchema, get_default_string};

/// One table row describing a model field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Emphasized field name (`**name**`).
    pub name: String,
    /// Annotation display string, possibly containing links.
    pub r#type: String,
    /// `"True"` or `"False"`.
    pub required: String,
    /// Default display string, `"..."` when there is none.
    pub default: String,
    /// Field documentation, empty when absent.
    pub description: String,
    field: String,
}

impl FieldDescriptor {
    /// Build the descriptor for a declared field.
    #[must_use]
    pub fn from_schema(field: &FieldSchema) -> Self {
        let required = if field.default.is_required() {
            "True"
        } else {
            "False"
        };
        Self {
            name: highlight_name(&field.name),
            r#type: field.annotation.to_string(),
            required: required.to_owned(),
            default: get_default_string(&field.default),
            description: field.description.clone().unwrap_or_default(),
            field: field.name.clone(),
        }
    }

    /// Declared field name without emphasis.
    #[must_use]
    pub fn field_name(&self) -> &str {
        &self.field
    }
}

/// Documentation for one model: docstring and field rows.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClassDoc {
    /// Class display name.
    pub name: String,
    /// Class docstring.
    pub doc: Option<String>,
    /// Field rows in declaration order.
    pub fields: Vec<FieldDescriptor>,
}

/// Ordered mapping from class name to its documentation.
///
/// The owning model comes first, followed by nested models in the order they
/// were first encountered.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DocMapping {
    entries: Vec<ClassDoc>,
}

impl DocMapping {
    /// Number of class entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the mapping has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether an entry exists for `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Entry for `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ClassDoc> {
        self.entries.iter().find(|entry| entry.name == name)
    }

    /// Class names in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.name.as_str())
    }

    /// Entries in order.
    pub fn iter(&self) -> impl Iterator<Item = &ClassDoc> {
        self.entries.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut ClassDoc> {
        self.entries.iter_mut()
    }
}

impl<'a> IntoIterator for &'a DocMapping {
    type Item = &'a ClassDoc;
    type IntoIter = std::slice::Iter<'a, ClassDoc>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Wrap a field name in markdown emphasis.
#[must_use]
pub fn highlight_name(name: &str) -> String {
    format!("**{name}**")
}

/// Extract documentation for `model` and every model it references.
///
/// Nested models are looked up in `registry` and each distinct class name is
/// processed once. References that cannot be resolved keep their link in the
/// type column but get no entry of their own.
#[must_use]
pub fn get_field_info(registry: &ModelRegistry, model: &ModelSchema) -> DocMapping {
    let mut mapping = DocMapping::default();
    let mut seen = HashSet::new();
    visit(registry, model, &mut mapping, &mut seen);
    mapping
}

fn visit<'a>(
    registry: &'a ModelRegistry,
    model: &'a ModelSchema,
    mapping: &mut DocMapping,
    seen: &mut HashSet<&'a str>,
) {
    if !seen.insert(model.name.as_str()) {
        return;
    }

    mapping.entries.push(ClassDoc {
        name: model.name.clone(),
        doc: model.doc.clone(),
        fields: model.fields.iter().map(FieldDescriptor::from_schema).collect(),
    });

    for field in &model.fields {
        for reference in field.annotation.model_refs() {
            if seen.contains(reference.name()) {
                continue;
            }
            match registry.resolve(reference) {
                Some(nested) => visit(registry, nested, mapping, seen),
                None => {
                    tracing::warn!(
                        model = %model.name,
                        field = %field.name,
                        reference = %reference.path(),
                        "Nested model not registered"
                    );
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docdantic_model::{FieldSchema, TypeAnnotation};
    use pretty_assertions::assert_eq;

    fn dummy_model() -> ModelSchema {
        ModelSchema::new("tests", "DummyModel")
            .with_field(FieldSchema::new("field", TypeAnnotation::primitive("int")).with_default(1))
    }

    fn collection_model() -> ModelSchema {
        ModelSchema::new("tests", "DummyCollectionModel").with_field(
            FieldSchema::new(
                "field",
                TypeAnnotation::list(TypeAnnotation::model("tests.DummyModel")),
            )
            .with_default(serde_json::json!([])),
        )
    }

    fn registry() -> ModelRegistry {
        let mut registry = ModelRegistry::new();
        registry.register(dummy_model()).unwrap();
        registry.register(collection_model()).unwrap();
        registry
    }

    #[test]
    fn test_highlight_name() {
        assert_eq!(highlight_name("field_name"), "**field_name**");
    }

    #[test]
    fn test_get_field_info() {
        let registry = registry();
        let info = get_field_info(&registry, &dummy_model());

        assert_eq!(info.len(), 1);
        assert!(info.contains("DummyModel"));
        let entry = info.get("DummyModel").unwrap();
        assert_eq!(entry.doc, None);
        let field = &entry.fields[0];
        assert_eq!(field.name, "**field**");
        assert_eq!(field.r#type, "int");
        assert_eq!(field.required, "False");
        assert_eq!(field.default, "1");
        assert_eq!(field.description, "");
        assert_eq!(field.field_name(), "field");
    }

    #[test]
    fn test_get_field_info_nested_list() {
        let registry = registry();
        let info = get_field_info(&registry, &collection_model());

        assert_eq!(info.len(), 2);
        assert!(info.contains("DummyModel"));
        assert_eq!(
            info.names().collect::<Vec<_>>(),
            vec!["DummyCollectionModel", "DummyModel"]
        );

        let entry = info.get("DummyCollectionModel").unwrap();
        assert_eq!(entry.doc, None);
        let field = &entry.fields[0];
        assert_eq!(field.name, "**field**");
        assert_eq!(field.r#type, "List[[DummyModel](#dummymodel)]");
        assert_eq!(field.required, "False");
        assert_eq!(field.default, "[]");
        assert_eq!(field.description, "");
    }

    #[test]
    fn test_required_field() {
        let model = ModelSchema::new("m", "A").with_field(
            FieldSchema::new("name", TypeAnnotation::primitive("str"))
                .with_description("Display name."),
        );
        let info = get_field_info(&ModelRegistry::new(), &model);
        let field = &info.get("A").unwrap().fields[0];
        assert_eq!(field.required, "True");
        assert_eq!(field.default, "...");
        assert_eq!(field.description, "Display name.");
    }

    #[test]
    fn test_nested_models_visited_once_in_discovery_order() {
        let mut registry = ModelRegistry::new();
        let leaf = ModelSchema::new("m", "Leaf")
            .with_field(FieldSchema::new("v", TypeAnnotation::primitive("int")));
        let left = ModelSchema::new("m", "Left")
            .with_field(FieldSchema::new("leaf", TypeAnnotation::model("m.Leaf")));
        let right = ModelSchema::new("m", "Right").with_field(FieldSchema::new(
            "leaves",
            TypeAnnotation::dict(
                TypeAnnotation::primitive("str"),
                TypeAnnotation::model("m.Leaf"),
            ),
        ));
        let root = ModelSchema::new("m", "Root")
            .with_field(FieldSchema::new(
                "either",
                TypeAnnotation::union(vec![
                    TypeAnnotation::model("m.Left"),
                    TypeAnnotation::model("m.Right"),
                ]),
            ))
            .with_field(FieldSchema::new(
                "again",
                TypeAnnotation::optional(TypeAnnotation::model("m.Leaf")),
            ));
        for schema in [leaf, left, right, root.clone()] {
            registry.register(schema).unwrap();
        }

        let info = get_field_info(&registry, &root);
        assert_eq!(
            info.names().collect::<Vec<_>>(),
            vec!["Root", "Left", "Leaf", "Right"]
        );
    }

    #[test]
    fn test_self_reference_terminates() {
        let node = ModelSchema::new("m", "Node").with_field(
            FieldSchema::new("children", TypeAnnotation::list(TypeAnnotation::model("m.Node")))
                .with_default_factory("list"),
        );
        let mut registry = ModelRegistry::new();
        registry.register(node.clone()).unwrap();

        let info = get_field_info(&registry, &node);
        assert_eq!(info.len(), 1);
        assert_eq!(info.get("Node").unwrap().fields[0].required, "False");
    }

    #[test]
    fn test_unresolved_nested_model_keeps_link() {
        let model = ModelSchema::new("m", "A")
            .with_field(FieldSchema::new("b", TypeAnnotation::model("elsewhere.B")));
        let info = get_field_info(&ModelRegistry::new(), &model);
        assert_eq!(info.len(), 1);
        assert_eq!(info.get("A").unwrap().fields[0].r#type, "[B](#b)");
    }
}
