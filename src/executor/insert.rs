//! The INSERT path: candidate-row construction, type/constraint
//! checking, auto-increment assignment, and index maintenance.

use std::collections::HashMap;

use crate::catalog::{Catalog, Row};
use crate::error::{EngineError, Result};
use crate::executor::ResultRecord;
use crate::parser::ast::{InsertInto, Literal};
use crate::schema::{ColumnDef, DataType};
use crate::value::Value;

pub fn execute(catalog: &mut Catalog, insert: InsertInto) -> Result<ResultRecord> {
    if insert.columns.len() != insert.values.len() {
        return Err(EngineError::Value(format!(
            "column count ({}) does not match value count ({})",
            insert.columns.len(),
            insert.values.len()
        )));
    }

    let schema = catalog.require_table(&insert.table)?.schema.clone();
    for name in &insert.columns {
        if !schema.has_column(name) {
            return Err(EngineError::Schema(format!(
                "unknown column '{name}' on table '{}'",
                schema.name
            )));
        }
    }

    let mut row: Row = HashMap::new();
    for (name, literal) in insert.columns.iter().zip(insert.values.iter()) {
        let column = schema.column(name).expect("checked above");
        row.insert(name.clone(), coerce_literal(literal, column)?);
    }
    for column in &schema.columns {
        row.entry(column.name.clone()).or_insert(Value::Null);
    }

    // The assigned value is only computed here; the counter itself is
    // not bumped until every check below passes (I5 counts the
    // counter as part of table state — a rejected insert must leave
    // it untouched, not just the row vector and indexes).
    let mut auto_increment_assignment = None;
    if let Some(pk) = &schema.primary_key {
        let pk_is_integer = schema.column(pk).is_some_and(|c| c.data_type == DataType::Integer);
        let pk_missing = matches!(row.get(pk), Some(Value::Null) | None);
        if pk_is_integer && pk_missing {
            let assigned = catalog.require_table(&insert.table)?.next_auto_increment;
            row.insert(pk.clone(), Value::Integer(assigned));
            auto_increment_assignment = Some(assigned);
        }
    }

    for column in &schema.columns {
        let value = row.get(&column.name).unwrap_or(&Value::Null);
        if column.is_effectively_not_null() && value.is_null() {
            return Err(EngineError::Constraint(format!(
                "column '{}' is not-null",
                column.name
            )));
        }
    }

    // Pre-validate every indexed column's uniqueness before touching
    // any index — a mid-insert failure must leave every index and the
    // row vector exactly as they were (§9's rollback requirement,
    // property P3).
    let table = catalog.require_table(&insert.table)?;
    let position = table.rows.len();
    for (col_name, index) in &table.indexes {
        let value = row.get(col_name).unwrap_or(&Value::Null);
        if index.is_unique() && !value.is_null() && !index.search(value).is_empty() {
            return Err(EngineError::Constraint(format!(
                "duplicate value for unique column '{col_name}'"
            )));
        }
    }

    // Every check passed: commit the counter bump (if any) together
    // with the index and row-vector mutations.
    let table = catalog.require_table_mut(&insert.table)?;
    if let Some(assigned) = auto_increment_assignment {
        table.next_auto_increment = assigned + 1;
    }
    for (col_name, index) in &mut table.indexes {
        let value = row.get(col_name).cloned().unwrap_or(Value::Null);
        index.insert(value, position).expect("uniqueness pre-validated above");
    }
    table.rows.push(row);

    Ok(ResultRecord::mutation(format!("1 row inserted into '{}'", insert.table), 1))
}

/// Checks a parsed literal against a column's declared type (§4.5
/// step 2) and produces the cell value to store. `NULL` always
/// passes through untyped; not-null enforcement happens separately
/// once every column's value is known.
pub(crate) fn coerce_literal(literal: &Literal, column: &ColumnDef) -> Result<Value> {
    if matches!(literal, Literal::Null) {
        return Ok(Value::Null);
    }
    match (column.data_type, literal) {
        (DataType::Integer, Literal::Integer(i)) => Ok(Value::Integer(*i)),
        (DataType::Integer, _) => Err(EngineError::Constraint(format!(
            "column '{}' requires an integer value",
            column.name
        ))),
        (DataType::Varchar, Literal::Text(s)) => {
            if let Some(max) = column.max_length {
                if s.chars().count() > max {
                    return Err(EngineError::Constraint(format!(
                        "value for column '{}' exceeds maximum length {max}",
                        column.name
                    )));
                }
            }
            Ok(Value::Text(s.clone()))
        }
        (DataType::Varchar, _) => Err(EngineError::Constraint(format!(
            "column '{}' requires a string value",
            column.name
        ))),
        (DataType::Boolean, Literal::Boolean(b)) => Ok(Value::Boolean(*b)),
        (DataType::Boolean, _) => Err(EngineError::Constraint(format!(
            "column '{}' requires a boolean value",
            column.name
        ))),
        // A TIMESTAMP column accepts a string without further parsing
        // (§4.5 step 2) — the engine never validates its contents.
        (DataType::Timestamp, Literal::Text(s)) => Ok(Value::Text(s.clone())),
        (DataType::Timestamp, _) => Err(EngineError::Constraint(format!(
            "column '{}' requires a timestamp string",
            column.name
        ))),
    }
}
