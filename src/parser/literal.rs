//! Literal token recognition: NULL/TRUE/FALSE barewords, quoted
//! strings with no escape processing, and integer/floating numerics.

use crate::error::{EngineError, Result};
use crate::parser::ast::Literal;
use crate::value::Value;

pub fn parse_literal(token: &str) -> Result<Literal> {
    let t = token.trim();
    if t.is_empty() {
        return Err(EngineError::Syntax("empty literal".to_string()));
    }
    if t.eq_ignore_ascii_case("null") {
        return Ok(Literal::Null);
    }
    if t.eq_ignore_ascii_case("true") {
        return Ok(Literal::Boolean(true));
    }
    if t.eq_ignore_ascii_case("false") {
        return Ok(Literal::Boolean(false));
    }
    if t.len() >= 2 {
        let bytes = t.as_bytes();
        let quoted_single = bytes[0] == b'\'' && bytes[bytes.len() - 1] == b'\'';
        let quoted_double = bytes[0] == b'"' && bytes[bytes.len() - 1] == b'"';
        if quoted_single || quoted_double {
            return Ok(Literal::Text(t[1..t.len() - 1].to_string()));
        }
    }
    if !t.contains('.') {
        if let Ok(i) = t.parse::<i64>() {
            return Ok(Literal::Integer(i));
        }
    }
    if let Ok(f) = t.parse::<f64>() {
        return Ok(Literal::Float(f));
    }
    Err(EngineError::Syntax(format!("invalid literal: {token}")))
}

impl Literal {
    /// Converts this literal to a cell value without regard to any
    /// column's declared type — used for WHERE/assignment right-hand
    /// sides, which are compared against whatever kind a row's cell
    /// actually holds. `Float` has no matching cell kind (see the
    /// type's doc comment); it falls back to its string rendering, so
    /// it behaves the way any other cross-kind literal would:
    /// equality and ordering against it simply never holds for a
    /// representable column.
    #[must_use]
    pub fn to_loose_value(&self) -> Value {
        match self {
            Literal::Integer(i) => Value::Integer(*i),
            Literal::Float(f) => Value::Text(f.to_string()),
            Literal::Text(s) => Value::Text(s.clone()),
            Literal::Boolean(b) => Value::Boolean(*b),
            Literal::Null => Value::Null,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_barewords_case_insensitively() {
        assert_eq!(parse_literal("NuLL").unwrap(), Literal::Null);
        assert_eq!(parse_literal("True").unwrap(), Literal::Boolean(true));
        assert_eq!(parse_literal("FALSE").unwrap(), Literal::Boolean(false));
    }

    #[test]
    fn quoted_strings_keep_content_verbatim() {
        assert_eq!(
            parse_literal("'it''s'").unwrap(),
            Literal::Text("it''s".to_string())
        );
        assert_eq!(
            parse_literal("\"double\"").unwrap(),
            Literal::Text("double".to_string())
        );
    }

    #[test]
    fn integers_and_floats_are_distinguished_by_decimal_point() {
        assert_eq!(parse_literal("42").unwrap(), Literal::Integer(42));
        assert_eq!(parse_literal("-7").unwrap(), Literal::Integer(-7));
        assert_eq!(parse_literal("3.5").unwrap(), Literal::Float(3.5));
    }

    #[test]
    fn garbage_is_a_syntax_error() {
        assert!(parse_literal("not_a_literal_or_string").is_err());
    }
}
