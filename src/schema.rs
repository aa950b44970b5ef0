//! Table schema: column definitions, types, and constraint flags.

use std::collections::HashSet;

use crate::error::{EngineError, Result};

/// A column's declared SQL type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    /// `INT`.
    Integer,
    /// `VARCHAR[(n)]`.
    Varchar,
    /// `BOOLEAN`.
    Boolean,
    /// `TIMESTAMP`.
    Timestamp,
}

impl DataType {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Integer => "INT",
            Self::Varchar => "VARCHAR",
            Self::Boolean => "BOOLEAN",
            Self::Timestamp => "TIMESTAMP",
        }
    }
}

/// A single column definition, as extracted by `CREATE TABLE`.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDef {
    /// Case-preserved, matched case-sensitively everywhere else.
    pub name: String,
    pub data_type: DataType,
    /// Only meaningful for `Varchar` columns.
    pub max_length: Option<usize>,
    pub primary_key: bool,
    pub unique: bool,
    pub not_null: bool,
}

impl ColumnDef {
    #[must_use]
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
            max_length: None,
            primary_key: false,
            unique: false,
            not_null: false,
        }
    }

    /// Primary key implies not-null and unique (§3).
    #[must_use]
    pub const fn is_effectively_unique(&self) -> bool {
        self.unique || self.primary_key
    }

    #[must_use]
    pub const fn is_effectively_not_null(&self) -> bool {
        self.not_null || self.primary_key
    }
}

/// The schema of a table: its name, ordered columns, and the derived
/// primary-key / unique-column sets.
#[derive(Debug, Clone, PartialEq)]
pub struct TableSchema {
    pub name: String,
    pub columns: Vec<ColumnDef>,
    pub primary_key: Option<String>,
    pub unique_columns: HashSet<String>,
}

impl TableSchema {
    /// Builds a schema from a column list, enforcing "at most one
    /// primary-key column" (§3's invariant on table schemas).
    pub fn new(name: impl Into<String>, columns: Vec<ColumnDef>) -> Result<Self> {
        let mut primary_key = None;
        let mut unique_columns = HashSet::new();
        for col in &columns {
            if col.primary_key {
                if primary_key.is_some() {
                    return Err(EngineError::Schema(format!(
                        "table has more than one primary key column: {}",
                        col.name
                    )));
                }
                primary_key = Some(col.name.clone());
            }
            if col.is_effectively_unique() {
                unique_columns.insert(col.name.clone());
            }
        }
        Ok(Self {
            name: name.into(),
            columns,
            primary_key,
            unique_columns,
        })
    }

    #[must_use]
    pub fn column(&self, name: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|c| c.name == name)
    }

    #[must_use]
    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primary_key_implies_unique_and_not_null() {
        let mut col = ColumnDef::new("id", DataType::Integer);
        col.primary_key = true;
        assert!(col.is_effectively_unique());
        assert!(col.is_effectively_not_null());
    }

    #[test]
    fn duplicate_primary_keys_are_rejected() {
        let mut a = ColumnDef::new("id", DataType::Integer);
        a.primary_key = true;
        let mut b = ColumnDef::new("other_id", DataType::Integer);
        b.primary_key = true;
        let err = TableSchema::new("t", vec![a, b]).unwrap_err();
        assert!(matches!(err, EngineError::Schema(_)));
    }
}
