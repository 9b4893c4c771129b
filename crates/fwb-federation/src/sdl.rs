//! Service SDL: syntax tree and parser.
//!
//! Supported subset:
//!
//! ```text
//! scalar DateTime
//!
//! type Product @key(fields: "upc") {
//!   upc: String!
//!   price(currency: String): Int
//! }
//!
//! extend type Product @key(fields: "upc") {
//!   upc: String! @external
//!   reviews: [Review]
//! }
//! ```

use std::fmt;

use fwb_model::Location;

use crate::error::ParseError;
use crate::lexer::{Cursor, MAX_DEPTH, tokenize};

/// A field type reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeRef {
    Named(String),
    List(Box<TypeRef>),
    NonNull(Box<TypeRef>),
}

impl TypeRef {
    /// The innermost named type.
    pub fn base_name(&self) -> &str {
        match self {
            Self::Named(name) => name,
            Self::List(inner) | Self::NonNull(inner) => inner.base_name(),
        }
    }

    /// Whether a list wraps the named type at any depth.
    pub fn is_list(&self) -> bool {
        match self {
            Self::Named(_) => false,
            Self::List(_) => true,
            Self::NonNull(inner) => inner.is_list(),
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(name) => f.write_str(name),
            Self::List(inner) => write!(f, "[{inner}]"),
            Self::NonNull(inner) => write!(f, "{inner}!"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgumentDef {
    pub name: String,
    pub ty: TypeRef,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDef {
    pub name: String,
    pub arguments: Vec<ArgumentDef>,
    pub ty: TypeRef,
    /// Declared `@external`: owned by another service.
    pub external: bool,
    pub location: Location,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectTypeDef {
    pub name: String,
    pub extension: bool,
    /// Field sets from `@key(fields: "...")`, split on whitespace.
    pub keys: Vec<Vec<String>>,
    pub fields: Vec<FieldDef>,
    pub location: Location,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScalarDef {
    pub name: String,
    pub location: Location,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Definition {
    Object(ObjectTypeDef),
    Scalar(ScalarDef),
}

/// One parsed service document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceDocument {
    pub definitions: Vec<Definition>,
}

/// Parse service SDL. An empty document is a syntax error.
pub fn parse_document(source: &str) -> Result<ServiceDocument, ParseError> {
    let mut cursor = Cursor::new(tokenize(source)?);
    let mut definitions = Vec::new();

    if cursor.at_eof() {
        return Err(cursor.unexpected("Definition"));
    }

    while !cursor.at_eof() {
        definitions.push(parse_definition(&mut cursor)?);
    }

    Ok(ServiceDocument { definitions })
}

fn parse_definition(cursor: &mut Cursor) -> Result<Definition, ParseError> {
    let start = cursor.peek().clone();
    let location = Location::new(start.line, start.column);

    let extension = cursor.is_keyword("extend");
    if extension {
        cursor.next();
    }

    if cursor.is_keyword("scalar") && !extension {
        cursor.next();
        let (name, _) = cursor.expect_name()?;
        // Directives on scalars carry no meaning here.
        parse_directives(cursor)?;
        return Ok(Definition::Scalar(ScalarDef { name, location }));
    }

    if !cursor.is_keyword("type") {
        return Err(cursor.unexpected(if extension { "\"type\"" } else { "Definition" }));
    }
    cursor.next();

    let (name, _) = cursor.expect_name()?;
    if cursor.is_keyword("implements") {
        let token = cursor.peek();
        return Err(ParseError::new(
            "Syntax Error: Interfaces are not supported.",
            token.line,
            token.column,
        ));
    }

    let directives = parse_directives(cursor)?;
    let keys = directives
        .iter()
        .filter(|d| d.name == "key")
        .filter_map(|d| d.argument("fields"))
        .map(|fields| fields.split_whitespace().map(str::to_string).collect())
        .collect();

    cursor.expect_punct('{')?;
    let mut fields = Vec::new();
    while !cursor.eat_punct('}') {
        fields.push(parse_field(cursor)?);
    }

    Ok(Definition::Object(ObjectTypeDef {
        name,
        extension,
        keys,
        fields,
        location,
    }))
}

fn parse_field(cursor: &mut Cursor) -> Result<FieldDef, ParseError> {
    let (name, token) = cursor.expect_name()?;
    let location = Location::new(token.line, token.column);

    let mut arguments = Vec::new();
    if cursor.eat_punct('(') {
        while !cursor.eat_punct(')') {
            let (arg_name, _) = cursor.expect_name()?;
            cursor.expect_punct(':')?;
            let ty = parse_type(cursor, 0)?;
            arguments.push(ArgumentDef { name: arg_name, ty });
        }
    }

    cursor.expect_punct(':')?;
    let ty = parse_type(cursor, 0)?;
    let directives = parse_directives(cursor)?;
    let external = directives.iter().any(|d| d.name == "external");

    Ok(FieldDef {
        name,
        arguments,
        ty,
        external,
        location,
    })
}

fn parse_type(cursor: &mut Cursor, depth: usize) -> Result<TypeRef, ParseError> {
    let inner = if cursor.is_punct('[') {
        if depth >= MAX_DEPTH {
            return Err(cursor.too_deep());
        }
        cursor.next();
        let item = parse_type(cursor, depth + 1)?;
        cursor.expect_punct(']')?;
        TypeRef::List(Box::new(item))
    } else {
        let (name, _) = cursor.expect_name()?;
        TypeRef::Named(name)
    };

    if cursor.eat_punct('!') {
        Ok(TypeRef::NonNull(Box::new(inner)))
    } else {
        Ok(inner)
    }
}

struct Directive {
    name: String,
    arguments: Vec<(String, String)>,
}

impl Directive {
    fn argument(&self, name: &str) -> Option<&str> {
        self.arguments
            .iter()
            .find(|(arg, _)| arg == name)
            .map(|(_, value)| value.as_str())
    }
}

fn parse_directives(cursor: &mut Cursor) -> Result<Vec<Directive>, ParseError> {
    let mut directives = Vec::new();
    while cursor.eat_punct('@') {
        let (name, _) = cursor.expect_name()?;
        let mut arguments = Vec::new();
        if cursor.eat_punct('(') {
            while !cursor.eat_punct(')') {
                let (arg, _) = cursor.expect_name()?;
                cursor.expect_punct(':')?;
                let value = match cursor.expect_string() {
                    Ok(value) => value,
                    Err(_) => cursor.expect_name()?.0,
                };
                arguments.push((arg, value));
            }
        }
        directives.push(Directive { name, arguments });
    }
    Ok(directives)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn object(doc: &ServiceDocument, index: usize) -> &ObjectTypeDef {
        match &doc.definitions[index] {
            Definition::Object(object) => object,
            other => panic!("expected object type, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_entity_with_key() {
        let doc = parse_document(
            r#"
            type Product @key(fields: "upc") {
              upc: String!
              name: String
              price(currency: String): Int
            }
            "#,
        )
        .unwrap();

        let product = object(&doc, 0);
        assert_eq!(product.name, "Product");
        assert!(!product.extension);
        assert_eq!(product.keys, vec![vec!["upc".to_string()]]);
        assert_eq!(product.fields.len(), 3);
        assert_eq!(product.fields[0].ty.to_string(), "String!");
        assert_eq!(product.fields[2].arguments[0].name, "currency");
        assert_eq!(product.location, Location::new(2, 13));
    }

    #[test]
    fn test_parse_extension_with_external_field() {
        let doc = parse_document(
            "extend type Product @key(fields: \"upc\") {\n  upc: String! @external\n  reviews: [Review!]!\n}",
        )
        .unwrap();

        let product = object(&doc, 0);
        assert!(product.extension);
        assert!(product.fields[0].external);
        assert!(product.fields[1].ty.is_list());
        assert_eq!(product.fields[1].ty.base_name(), "Review");
        assert_eq!(product.fields[1].location, Location::new(3, 3));
    }

    #[test]
    fn test_parse_scalar() {
        let doc = parse_document("scalar DateTime\ntype Query { now: DateTime }").unwrap();
        assert!(matches!(&doc.definitions[0], Definition::Scalar(s) if s.name == "DateTime"));
    }

    #[test]
    fn test_empty_document_is_an_error() {
        let err = parse_document("   # only a comment\n").unwrap_err();
        assert_eq!(err.message, "Syntax Error: Unexpected <EOF>.");
    }

    #[test]
    fn test_missing_colon_reports_position() {
        let err = parse_document("type Query {\n  me User\n}").unwrap_err();
        assert_eq!(err.message, "Syntax Error: Expected \":\", found Name \"User\".");
        assert_eq!((err.line, err.column), (2, 6));
    }

    #[test]
    fn test_unclosed_type_is_an_error() {
        let err = parse_document("type Query { me: User").unwrap_err();
        assert_eq!(err.message, "Syntax Error: Unexpected <EOF>.");
    }

    #[test]
    fn test_list_nesting_limit() {
        let nested = |depth: usize| {
            format!(
                "type Query {{ a: {}Int{} }}",
                "[".repeat(depth),
                "]".repeat(depth)
            )
        };

        let doc = parse_document(&nested(MAX_DEPTH)).unwrap();
        assert_eq!(object(&doc, 0).fields[0].ty.base_name(), "Int");

        let err = parse_document(&nested(MAX_DEPTH + 1)).unwrap_err();
        assert_eq!(err.message, "Syntax Error: Nesting exceeds 256 levels.");
        assert_eq!((err.line, err.column), (1, 17 + MAX_DEPTH));

        assert!(parse_document(&nested(200_000)).is_err());
    }
}
