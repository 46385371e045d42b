//! Recursive descent parser for annotation expressions.
//!
//! Accepts the notation model authors write in schema files:
//!
//! ```text
//! expr    := term ('|' term)*
//! term    := literal | name ('[' expr (',' expr)* ']')?
//! name    := ident ('.' ident | '::' ident)*
//! ```
//!
//! `Tuple` also takes a trailing `...` (`Tuple[int, ...]`).
//!
//! Bare names are handed to a resolver that decides between primitives and
//! model references.

use serde_json::Value;

use crate::annotation::TypeAnnotation;
use crate::error::AnnotationError;

/// Parse an annotation using the default name resolution.
///
/// `None` maps to [`TypeAnnotation::None`], dotted names to model references,
/// anything else to a primitive.
pub fn parse_annotation(input: &str) -> Result<TypeAnnotation, AnnotationError> {
    parse_annotation_with(input, &default_resolver)
}

/// Parse an annotation, resolving bare names with `resolve`.
pub fn parse_annotation_with(
    input: &str,
    resolve: &dyn Fn(&str) -> TypeAnnotation,
) -> Result<TypeAnnotation, AnnotationError> {
    let mut parser = Parser {
        input,
        pos: 0,
        resolve,
    };
    let annotation = parser.expr()?;
    parser.skip_ws();
    match parser.peek() {
        None => Ok(annotation),
        Some(found) => Err(AnnotationError::UnexpectedChar {
            found,
            offset: parser.pos,
        }),
    }
}

/// Resolution used when no model names are known.
pub(crate) fn default_resolver(name: &str) -> TypeAnnotation {
    if name == "None" {
        TypeAnnotation::None
    } else if name.contains('.') {
        TypeAnnotation::model(name)
    } else {
        TypeAnnotation::primitive(name)
    }
}

/// Generic type constructors recognised in subscript position.
///
/// `Literal` and `Tuple` are handled separately since their arguments are
/// values or may end in `...`.
enum Generic {
    List,
    Set,
    Dict,
    Union,
    Optional,
}

impl Generic {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "List" | "list" | "Sequence" => Some(Self::List),
            "Set" | "set" | "FrozenSet" | "frozenset" => Some(Self::Set),
            "Dict" | "dict" | "Mapping" => Some(Self::Dict),
            "Union" => Some(Self::Union),
            "Optional" => Some(Self::Optional),
            _ => None,
        }
    }
}

enum TupleItem {
    Type(TypeAnnotation),
    /// `...` at this byte offset.
    Ellipsis(usize),
}

struct Parser<'a> {
    input: &'a str,
    pos: usize,
    resolve: &'a dyn Fn(&str) -> TypeAnnotation,
}

impl Parser<'_> {
    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    fn expr(&mut self) -> Result<TypeAnnotation, AnnotationError> {
        let first = self.term()?;
        let mut members = vec![first];
        loop {
            self.skip_ws();
            if self.peek() != Some('|') {
                break;
            }
            self.bump();
            members.push(self.term()?);
        }
        if members.len() == 1 {
            Ok(members.remove(0))
        } else {
            Ok(TypeAnnotation::Union(members))
        }
    }

    fn term(&mut self) -> Result<TypeAnnotation, AnnotationError> {
        self.skip_ws();
        match self.peek() {
            None => Err(AnnotationError::UnexpectedEnd),
            // Quoted names are forward references
            Some(quote @ ('\'' | '"')) => {
                let name = self.quoted(quote)?;
                parse_annotation_with(&name, self.resolve)
            }
            Some(ch) if is_ident_start(ch) => {
                let name = self.name()?;
                self.skip_ws();
                if self.peek() == Some('[') {
                    self.bump();
                    self.generic(&name)
                } else {
                    Ok((self.resolve)(&name))
                }
            }
            Some(found) => Err(AnnotationError::UnexpectedChar {
                found,
                offset: self.pos,
            }),
        }
    }

    fn name(&mut self) -> Result<String, AnnotationError> {
        let start = self.pos;
        loop {
            while self.peek().is_some_and(is_ident_continue) {
                self.bump();
            }
            let rest = &self.input[self.pos..];
            let sep = if rest.starts_with("::") {
                2
            } else if rest.starts_with('.') {
                1
            } else {
                break;
            };
            self.pos += sep;
            match self.peek() {
                Some(ch) if is_ident_start(ch) => {}
                Some(found) => {
                    return Err(AnnotationError::UnexpectedChar {
                        found,
                        offset: self.pos,
                    });
                }
                None => return Err(AnnotationError::UnexpectedEnd),
            }
        }
        Ok(self.input[start..self.pos].replace("::", "."))
    }

    fn generic(&mut self, name: &str) -> Result<TypeAnnotation, AnnotationError> {
        if name == "Literal" {
            let values = self.list_of(Self::literal)?;
            if values.is_empty() {
                return Err(arity(name, "at least 1", 0));
            }
            return Ok(TypeAnnotation::Literal(values));
        }
        if matches!(name, "Tuple" | "tuple") {
            return self.tuple(name);
        }

        let kind = Generic::from_name(name)
            .ok_or_else(|| AnnotationError::UnknownGeneric(name.to_owned()))?;

        let mut args = self.list_of(Self::expr)?;
        match (kind, args.len()) {
            (Generic::List, 1) => Ok(TypeAnnotation::list(args.remove(0))),
            (Generic::Set, 1) => Ok(TypeAnnotation::set(args.remove(0))),
            (Generic::List | Generic::Set, n) => Err(arity(name, "1", n)),
            (Generic::Dict, 2) => {
                let value = args.remove(1);
                let key = args.remove(0);
                Ok(TypeAnnotation::dict(key, value))
            }
            (Generic::Dict, n) => Err(arity(name, "2", n)),
            (Generic::Optional, 1) => Ok(TypeAnnotation::optional(args.remove(0))),
            (Generic::Optional, n) => Err(arity(name, "1", n)),
            (Generic::Union, 0) => Err(arity(name, "at least 1", 0)),
            (Generic::Union, 1) => Ok(args.remove(0)),
            (Generic::Union, _) => Ok(TypeAnnotation::Union(args)),
        }
    }

    /// `Tuple[A, B]` or `Tuple[A, ...]`; `...` is only valid second and last.
    fn tuple(&mut self, name: &str) -> Result<TypeAnnotation, AnnotationError> {
        let mut items = self.list_of(Self::tuple_item)?;
        let variadic = matches!(
            items.as_slice(),
            [TupleItem::Type(_), TupleItem::Ellipsis(_)]
        );
        if variadic {
            items.pop();
        }

        let mut types = Vec::with_capacity(items.len());
        for item in items {
            match item {
                TupleItem::Type(annotation) => types.push(annotation),
                TupleItem::Ellipsis(offset) => {
                    return Err(AnnotationError::UnexpectedChar { found: '.', offset });
                }
            }
        }

        match (types.len(), variadic) {
            (0, _) => Err(arity(name, "at least 1", 0)),
            (_, true) => Ok(TypeAnnotation::variadic_tuple(types.remove(0))),
            (_, false) => Ok(TypeAnnotation::tuple(types)),
        }
    }

    fn tuple_item(&mut self) -> Result<TupleItem, AnnotationError> {
        self.skip_ws();
        if self.input[self.pos..].starts_with("...") {
            let offset = self.pos;
            self.pos += 3;
            return Ok(TupleItem::Ellipsis(offset));
        }
        self.expr().map(TupleItem::Type)
    }

    /// Parse comma-separated items up to the closing `]`.
    fn list_of<T>(
        &mut self,
        mut item: impl FnMut(&mut Self) -> Result<T, AnnotationError>,
    ) -> Result<Vec<T>, AnnotationError> {
        let mut items = Vec::new();
        loop {
            self.skip_ws();
            match self.peek() {
                Some(']') => {
                    self.bump();
                    return Ok(items);
                }
                None => return Err(AnnotationError::UnexpectedEnd),
                _ => {}
            }
            items.push(item(self)?);
            self.skip_ws();
            match self.peek() {
                Some(',') => {
                    self.bump();
                }
                Some(']') => {}
                Some(found) => {
                    return Err(AnnotationError::UnexpectedChar {
                        found,
                        offset: self.pos,
                    });
                }
                None => return Err(AnnotationError::UnexpectedEnd),
            }
        }
    }

    fn literal(&mut self) -> Result<Value, AnnotationError> {
        self.skip_ws();
        match self.peek() {
            None => Err(AnnotationError::UnexpectedEnd),
            Some(quote @ ('\'' | '"')) => Ok(Value::String(self.quoted(quote)?)),
            Some(_) => {
                let start = self.pos;
                while self
                    .peek()
                    .is_some_and(|c| !matches!(c, ',' | ']') && !c.is_whitespace())
                {
                    self.bump();
                }
                let token = &self.input[start..self.pos];
                match token {
                    "True" => Ok(Value::Bool(true)),
                    "False" => Ok(Value::Bool(false)),
                    "None" => Ok(Value::Null),
                    _ => serde_json::from_str::<serde_json::Number>(token)
                        .map(Value::Number)
                        .map_err(|_| AnnotationError::InvalidLiteral(token.to_owned())),
                }
            }
        }
    }

    fn quoted(&mut self, quote: char) -> Result<String, AnnotationError> {
        self.bump();
        let mut text = String::new();
        loop {
            match self.bump() {
                None => return Err(AnnotationError::UnexpectedEnd),
                Some('\\') => match self.bump() {
                    Some(escaped) => text.push(escaped),
                    None => return Err(AnnotationError::UnexpectedEnd),
                },
                Some(ch) if ch == quote => return Ok(text),
                Some(ch) => text.push(ch),
            }
        }
    }
}

fn arity(name: &str, expected: &'static str, found: usize) -> AnnotationError {
    AnnotationError::Arity {
        name: name.to_owned(),
        expected,
        found,
    }
}

fn is_ident_start(ch: char) -> bool {
    ch.is_alphabetic() || ch == '_'
}

fn is_ident_continue(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn parse(input: &str) -> TypeAnnotation {
        parse_annotation(input).unwrap()
    }

    #[test]
    fn test_primitives() {
        assert_eq!(parse("int"), TypeAnnotation::primitive("int"));
        assert_eq!(parse("  str "), TypeAnnotation::primitive("str"));
        assert_eq!(parse("None"), TypeAnnotation::None);
    }

    #[test]
    fn test_dotted_name_is_model() {
        assert_eq!(parse("app.models.User"), TypeAnnotation::model("app.models.User"));
        assert_eq!(parse("app::models::User"), TypeAnnotation::model("app.models.User"));
    }

    #[test]
    fn test_containers() {
        assert_eq!(
            parse("List[str]"),
            TypeAnnotation::list(TypeAnnotation::primitive("str"))
        );
        assert_eq!(
            parse("dict[str, List[int]]"),
            TypeAnnotation::dict(
                TypeAnnotation::primitive("str"),
                TypeAnnotation::list(TypeAnnotation::primitive("int"))
            )
        );
        assert_eq!(parse("Sequence[str]").to_string(), "List[str]");
    }

    #[test]
    fn test_sets_keep_their_kind() {
        assert_eq!(parse("Set[int]"), TypeAnnotation::set(TypeAnnotation::primitive("int")));
        assert_eq!(parse("frozenset[str]").to_string(), "Set[str]");
        assert!(matches!(
            parse_annotation("Set[int, str]"),
            Err(AnnotationError::Arity { found: 2, .. })
        ));
    }

    #[test]
    fn test_tuples() {
        let int = || TypeAnnotation::primitive("int");
        let str_ = || TypeAnnotation::primitive("str");

        assert_eq!(parse("Tuple[int, str]"), TypeAnnotation::tuple(vec![int(), str_()]));
        assert_eq!(parse("Tuple[int, str]").to_string(), "Tuple[int, str]");
        assert_eq!(parse("tuple[int]"), TypeAnnotation::tuple(vec![int()]));
        assert_eq!(parse("Tuple[int, ...]"), TypeAnnotation::variadic_tuple(int()));
        assert_eq!(parse("Tuple[int, ...]").to_string(), "Tuple[int, ...]");
        assert_eq!(
            parse("Tuple[app.User, Optional[int]]").to_string(),
            "Tuple[[User](#user), Optional[int]]"
        );
    }

    #[test]
    fn test_tuple_errors() {
        assert!(matches!(
            parse_annotation("Tuple[]"),
            Err(AnnotationError::Arity { found: 0, .. })
        ));
        assert_eq!(
            parse_annotation("Tuple[..., int]"),
            Err(AnnotationError::UnexpectedChar { found: '.', offset: 6 })
        );
        assert_eq!(
            parse_annotation("Tuple[int, str, ...]"),
            Err(AnnotationError::UnexpectedChar { found: '.', offset: 16 })
        );
        assert!(parse_annotation("List[...]").is_err());
    }

    #[test]
    fn test_unions() {
        assert_eq!(parse("Union[float, int]").to_string(), "Union[float, int]");
        assert_eq!(parse("Optional[int]").to_string(), "Optional[int]");
        assert_eq!(parse("int | None").to_string(), "Optional[int]");
        assert_eq!(parse("int | str | None").to_string(), "Union[int, str, None]");
        assert_eq!(parse("Union[int]"), TypeAnnotation::primitive("int"));
    }

    #[test]
    fn test_literal() {
        assert_eq!(
            parse("Literal['dev', \"prod\", 3, 1.5, True, None]"),
            TypeAnnotation::literal(vec![
                json!("dev"),
                json!("prod"),
                json!(3),
                json!(1.5),
                json!(true),
                json!(null)
            ])
        );
    }

    #[test]
    fn test_forward_reference() {
        assert_eq!(parse("List['app.Node']").to_string(), "List[[Node](#node)]");
    }

    #[test]
    fn test_custom_resolver() {
        let resolve = |name: &str| {
            if name == "Server" {
                TypeAnnotation::model("app.Server")
            } else {
                default_resolver(name)
            }
        };
        let annotation = parse_annotation_with("List[Server]", &resolve).unwrap();
        assert_eq!(annotation.to_string(), "List[[Server](#server)]");
    }

    #[test]
    fn test_errors() {
        assert_eq!(parse_annotation(""), Err(AnnotationError::UnexpectedEnd));
        assert_eq!(parse_annotation("List[int"), Err(AnnotationError::UnexpectedEnd));
        assert_eq!(
            parse_annotation("Foo[int]"),
            Err(AnnotationError::UnknownGeneric("Foo".to_owned()))
        );
        assert!(matches!(
            parse_annotation("Dict[str]"),
            Err(AnnotationError::Arity { found: 1, .. })
        ));
        assert!(matches!(
            parse_annotation("Literal[int]"),
            Err(AnnotationError::InvalidLiteral(_))
        ));
        assert!(matches!(
            parse_annotation("int]"),
            Err(AnnotationError::UnexpectedChar { found: ']', offset: 3 })
        ));
    }
}
