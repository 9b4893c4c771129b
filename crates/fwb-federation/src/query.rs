//! Query operations: syntax tree and parser.

use fwb_model::Location;

use crate::error::ParseError;
use crate::lexer::{Cursor, MAX_DEPTH, tokenize};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSelection {
    pub name: String,
    pub selections: Vec<FieldSelection>,
    pub location: Location,
}

/// A parsed `query` operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operation {
    pub name: Option<String>,
    pub selections: Vec<FieldSelection>,
}

/// Parse `query Name? { ... }` or an anonymous `{ ... }`.
///
/// Arguments, aliases, variables and fragments are not supported.
pub fn parse_operation(source: &str) -> Result<Operation, ParseError> {
    let mut cursor = Cursor::new(tokenize(source)?);

    let mut name = None;
    if cursor.is_keyword("query") {
        cursor.next();
        if !cursor.is_punct('{') {
            name = Some(cursor.expect_name()?.0);
        }
    } else if !cursor.is_punct('{') {
        return Err(cursor.unexpected("\"{\""));
    }

    let selections = parse_selection_set(&mut cursor, 1)?;
    if !cursor.at_eof() {
        return Err(cursor.unexpected("<EOF>"));
    }

    Ok(Operation { name, selections })
}

fn parse_selection_set(
    cursor: &mut Cursor,
    depth: usize,
) -> Result<Vec<FieldSelection>, ParseError> {
    if depth > MAX_DEPTH {
        return Err(cursor.too_deep());
    }
    cursor.expect_punct('{')?;
    let mut selections = Vec::new();
    // A selection set holds at least one field.
    loop {
        let (name, token) = cursor.expect_name()?;
        let nested = if cursor.is_punct('{') {
            parse_selection_set(cursor, depth + 1)?
        } else {
            Vec::new()
        };
        selections.push(FieldSelection {
            name,
            selections: nested,
            location: Location::new(token.line, token.column),
        });
        if cursor.eat_punct('}') {
            return Ok(selections);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_named_operation() {
        let op = parse_operation("query Top { topProducts { upc name } }").unwrap();
        assert_eq!(op.name.as_deref(), Some("Top"));
        assert_eq!(op.selections.len(), 1);
        assert_eq!(op.selections[0].name, "topProducts");
        assert_eq!(op.selections[0].selections.len(), 2);
    }

    #[test]
    fn test_parse_anonymous_operation() {
        let op = parse_operation("{ me }").unwrap();
        assert!(op.name.is_none());
        assert_eq!(op.selections[0].name, "me");
    }

    #[test]
    fn test_empty_selection_set_is_an_error() {
        assert!(parse_operation("{ }").is_err());
        assert!(parse_operation("query { me { } }").is_err());
    }

    #[test]
    fn test_empty_text_is_an_error() {
        let err = parse_operation("").unwrap_err();
        assert_eq!(err.message, "Syntax Error: Unexpected <EOF>.");
    }

    #[test]
    fn test_trailing_tokens_are_an_error() {
        assert!(parse_operation("{ me } }").is_err());
    }

    #[test]
    fn test_nesting_limit() {
        let nested = |depth: usize| format!("{}{}", "{ a ".repeat(depth), "}".repeat(depth));

        let op = parse_operation(&nested(MAX_DEPTH)).unwrap();
        assert_eq!(op.selections[0].name, "a");

        let err = parse_operation(&nested(MAX_DEPTH + 1)).unwrap_err();
        assert_eq!(err.message, "Syntax Error: Nesting exceeds 256 levels.");
        assert_eq!((err.line, err.column), (1, MAX_DEPTH * 4 + 1));

        assert!(parse_operation(&nested(20_000)).is_err());
    }
}
