//! Cell values and the total order over them.

use std::cmp::Ordering;
use std::fmt;

use chrono::{DateTime, Utc};

/// A single typed datum stored in a row.
///
/// This is the closed set of representable kinds: everything that
/// flows through the parser, the executor, or an index key is one of
/// these five variants. There is no `Float` variant — a numeric
/// literal with a decimal point is representable only transiently, as
/// a [`crate::parser::ast::Literal::Float`], and is rejected the
/// moment it would need to become a stored cell against an integer
/// column (see [`crate::executor::insert`]).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Value {
    /// A 64-bit signed integer.
    Integer(i64),
    /// A UTF-8 string.
    Text(String),
    /// A boolean.
    Boolean(bool),
    /// An instant in time.
    ///
    /// The parser never constructs this variant directly: a quoted
    /// literal destined for a `TIMESTAMP` column is stored as
    /// [`Value::Text`] without further parsing, per the data model.
    /// This variant exists so embedders that build rows directly (not
    /// through `execute`) can supply a real instant and still sort
    /// correctly against other timestamps.
    Timestamp(DateTime<Utc>),
    /// The absence of a value.
    Null,
}

impl Value {
    /// The short name of this value's kind, used in error messages.
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Integer(_) => "integer",
            Self::Text(_) => "text",
            Self::Boolean(_) => "boolean",
            Self::Timestamp(_) => "timestamp",
            Self::Null => "null",
        }
    }

    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Strict cell-equality: same kind and same value, no coercion.
    ///
    /// Null never equals anything, including another null. This is
    /// the equality used by `=`/`!=` WHERE conditions and by JOIN ON
    /// predicates — a deliberately different notion from
    /// [`Value::total_cmp`], which treats null as equal to null so it
    /// has a well-defined place in the index and in ORDER BY.
    #[must_use]
    pub fn cell_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Self::Integer(a), Self::Integer(b)) => a == b,
            (Self::Text(a), Self::Text(b)) => a == b,
            (Self::Boolean(a), Self::Boolean(b)) => a == b,
            (Self::Timestamp(a), Self::Timestamp(b)) => a == b,
            _ => false,
        }
    }

    /// Ordering defined only within a shared kind, used by the `<`,
    /// `>`, `<=`, `>=` condition operators. Returns `None` (which the
    /// caller must treat as "false") for a null operand or a
    /// cross-kind comparison.
    #[must_use]
    pub fn natural_cmp(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Self::Integer(a), Self::Integer(b)) => Some(a.cmp(b)),
            (Self::Timestamp(a), Self::Timestamp(b)) => Some(a.cmp(b)),
            (Self::Text(a), Self::Text(b)) => Some(a.to_lowercase().cmp(&b.to_lowercase())),
            (Self::Boolean(a), Self::Boolean(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }

    /// The total order used by the index and ORDER BY.
    ///
    /// Null compares equal to null and less than any non-null value.
    /// Two integers compare numerically, two timestamps
    /// chronologically. Every other pair — including any cross-kind
    /// pair — falls back to a locale-insensitive (ASCII/Unicode
    /// lowercase) lexicographic comparison of each operand's string
    /// rendering. This is a fixed policy, not an accident of
    /// implementation: it gives every value a place in the B-tree
    /// regardless of kind.
    #[must_use]
    pub fn total_cmp(&self, other: &Value) -> Ordering {
        match (self, other) {
            (Self::Null, Self::Null) => Ordering::Equal,
            (Self::Null, _) => Ordering::Less,
            (_, Self::Null) => Ordering::Greater,
            (Self::Integer(a), Self::Integer(b)) => a.cmp(b),
            (Self::Timestamp(a), Self::Timestamp(b)) => a.cmp(b),
            _ => self.collation_key().cmp(&other.collation_key()),
        }
    }

    fn collation_key(&self) -> String {
        match self {
            Self::Null => String::new(),
            Self::Integer(i) => i.to_string(),
            Self::Text(s) => s.to_lowercase(),
            Self::Boolean(b) => b.to_string(),
            Self::Timestamp(t) => t.to_rfc3339(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(i) => write!(f, "{i}"),
            Self::Text(s) => write!(f, "{s}"),
            Self::Boolean(b) => write!(f, "{b}"),
            Self::Timestamp(t) => write!(f, "{}", t.to_rfc3339()),
            Self::Null => write!(f, "NULL"),
        }
    }
}
