//! The parsed-query record: a closed, tagged sum over the six
//! statement kinds the parser recognizes.

use crate::schema::ColumnDef;

/// A literal as written in a query string, before it is checked
/// against a column's declared type. Deliberately mirrors the set a
/// hand-written SQL parser would produce — note the `Float` variant,
/// which has no counterpart in [`crate::value::Value`]: a numeric
/// literal with a decimal point is only ever valid transiently, and is
/// rejected the moment it is checked against a column (integer columns
/// reject it outright; every other column kind also rejects it, since
/// none of them are numeric).
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Integer(i64),
    Float(f64),
    Text(String),
    Boolean(bool),
    Null,
}

/// A column reference, optionally qualified with a table/alias name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ColumnRef {
    pub table: Option<String>,
    pub column: String,
}

impl ColumnRef {
    #[must_use]
    pub fn unqualified(column: impl Into<String>) -> Self {
        Self {
            table: None,
            column: column.into(),
        }
    }

    #[must_use]
    pub fn qualified(table: impl Into<String>, column: impl Into<String>) -> Self {
        Self {
            table: Some(table.into()),
            column: column.into(),
        }
    }
}

/// The comma-separated column list after `SELECT`.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectColumns {
    /// The bare `*` token.
    Star,
    Named(Vec<ColumnRef>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    Inner,
    Left,
    Right,
}

/// A single `[INNER|LEFT|RIGHT] JOIN t [AS alias] ON a.c = b.c` clause.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinSpec {
    pub kind: JoinKind,
    pub table: String,
    pub alias: Option<String>,
    pub left: ColumnRef,
    pub right: ColumnRef,
}

impl JoinSpec {
    /// The name the joined rows are exposed under for `joined_table.column`
    /// keys — the alias if one was given, otherwise the table name.
    #[must_use]
    pub fn exposed_name(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.table)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    NotEq,
    Lt,
    Gt,
    LtEq,
    GtEq,
    Like,
}

/// A single WHERE condition: `<column> <op> <literal>`.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub left: ColumnRef,
    pub op: CompareOp,
    pub right: Literal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connective {
    And,
    Or,
}

/// One entry in the flat WHERE sequence: the condition, plus the
/// connective that joined it to the previous entry (`None` only for
/// the first entry). Evaluation folds this sequence strictly
/// left-to-right with no operator precedence — see
/// [`crate::executor::select::evaluate_where`].
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionTerm {
    pub connective: Option<Connective>,
    pub condition: Condition,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrderDirection {
    #[default]
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreateTable {
    pub table: String,
    pub columns: Vec<ColumnDef>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InsertInto {
    pub table: String,
    pub columns: Vec<String>,
    pub values: Vec<Literal>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SelectQuery {
    pub columns: SelectColumns,
    pub table: String,
    pub joins: Vec<JoinSpec>,
    pub where_clause: Vec<ConditionTerm>,
    pub order_by: Option<(ColumnRef, OrderDirection)>,
    pub limit: Option<usize>,
}

impl Default for SelectColumns {
    fn default() -> Self {
        Self::Star
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UpdateQuery {
    pub table: String,
    pub assignments: Vec<(String, Literal)>,
    pub where_clause: Vec<ConditionTerm>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeleteQuery {
    pub table: String,
    pub where_clause: Vec<ConditionTerm>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DropTable {
    pub table: String,
}

/// The parsed-query record produced by [`crate::parser::parse_statement`].
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Create(CreateTable),
    Insert(InsertInto),
    Select(SelectQuery),
    Update(UpdateQuery),
    Delete(DeleteQuery),
    Drop(DropTable),
}
