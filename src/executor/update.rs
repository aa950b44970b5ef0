//! The UPDATE path: WHERE-filtered in-place mutation with index
//! re-keying.

use crate::catalog::Catalog;
use crate::error::{EngineError, Result};
use crate::executor::select::row_matches;
use crate::executor::{insert::coerce_literal, ResultRecord};
use crate::parser::ast::UpdateQuery;
use crate::value::Value;

pub fn execute(catalog: &mut Catalog, update: UpdateQuery) -> Result<ResultRecord> {
    let schema = catalog.require_table(&update.table)?.schema.clone();
    for (col, _) in &update.assignments {
        if !schema.has_column(col) {
            return Err(EngineError::Schema(format!(
                "unknown column '{col}' on table '{}'",
                schema.name
            )));
        }
    }

    let positions: Vec<usize> = {
        let table = catalog.require_table(&update.table)?;
        table
            .rows
            .iter()
            .enumerate()
            .filter_map(|(pos, row)| match row_matches(row, &update.where_clause) {
                Ok(true) => Some(Ok(pos)),
                Ok(false) => None,
                Err(e) => Some(Err(e)),
            })
            .collect::<Result<Vec<_>>>()?
    };

    // Resolve every assignment to a typed value up front and verify
    // (I3) before touching any row.
    let mut planned: Vec<(usize, String, Value)> = Vec::new();
    for &pos in &positions {
        for (col_name, literal) in &update.assignments {
            let column = schema.column(col_name).expect("checked above");
            let new_value = coerce_literal(literal, column)?;
            if column.is_effectively_not_null() && new_value.is_null() {
                return Err(EngineError::Constraint(format!("column '{col_name}' is not-null")));
            }
            planned.push((pos, col_name.clone(), new_value));
        }
    }

    // Pre-validate every index-affecting change before mutating
    // anything, mirroring the rollback-avoidance policy used by
    // INSERT (§9). A new value can clash two ways: against a row
    // untouched by this UPDATE (checked against the live index, with
    // every position this batch is also updating excluded, since that
    // row's old value is about to be cleared), or against another row
    // in the same batch being set to the same new value (checked
    // pairwise within `planned`, since the index won't see that
    // collision until both inserts land).
    {
        let table = catalog.require_table(&update.table)?;
        let batch_positions: std::collections::HashSet<usize> =
            planned.iter().map(|(pos, _, _)| *pos).collect();
        for (i, (pos, col_name, new_value)) in planned.iter().enumerate() {
            let Some(index) = table.indexes.get(col_name) else { continue };
            if !index.is_unique() || new_value.is_null() {
                continue;
            }
            // A posting at `pos` itself is the row's own current value
            // (no-op), not a clash. A posting at some other position in
            // this batch will be cleared during apply regardless of
            // what that row ends up with, so it only blocks us if it
            // belongs to a row this UPDATE isn't touching at all.
            let clashes_existing = index
                .search(new_value)
                .iter()
                .any(|p| *p != *pos && !batch_positions.contains(p));
            let clashes_in_batch = planned.iter().enumerate().any(|(j, (other_pos, other_col, other_value))| {
                j != i && other_col == col_name && other_pos != pos && other_value.cell_eq(new_value)
            });
            if clashes_existing || clashes_in_batch {
                return Err(EngineError::Constraint(format!(
                    "duplicate value for unique column '{col_name}'"
                )));
            }
        }
    }

    // Apply in two passes so no row ever transiently holds two
    // postings for the same indexed column: every old value is
    // cleared from its index first, then every new value is inserted.
    // A single combined remove-then-insert-per-row loop would reject a
    // valid batch that merely swaps two rows' values (row A's old
    // value being row B's new value), since B's insert would still see
    // A's stale posting if A hadn't been cleared yet.
    let table = catalog.require_table_mut(&update.table)?;
    for (pos, col_name, new_value) in &planned {
        let old_value = table.rows[*pos].get(col_name).cloned().unwrap_or(Value::Null);
        if !old_value.cell_eq(new_value) {
            if let Some(index) = table.indexes.get_mut(col_name) {
                index.remove(&old_value, *pos);
            }
        }
    }
    for (pos, col_name, new_value) in &planned {
        let old_value = table.rows[*pos].get(col_name).cloned().unwrap_or(Value::Null);
        if !old_value.cell_eq(new_value) {
            if let Some(index) = table.indexes.get_mut(col_name) {
                index
                    .insert(new_value.clone(), *pos)
                    .expect("uniqueness pre-validated and all stale postings cleared above");
            }
        }
    }
    for (pos, col_name, new_value) in planned {
        table.rows[pos].insert(col_name, new_value);
    }

    let affected = positions.len();
    Ok(ResultRecord::mutation(format!("{affected} row(s) updated in '{}'", update.table), affected))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::ast::Literal;

    fn setup() -> Catalog {
        let mut catalog = Catalog::new();
        let schema = crate::schema::TableSchema::new(
            "u",
            vec![
                {
                    let mut c = crate::schema::ColumnDef::new("id", crate::schema::DataType::Integer);
                    c.primary_key = true;
                    c
                },
                crate::schema::ColumnDef::new("name", crate::schema::DataType::Varchar),
            ],
        )
        .unwrap();
        catalog.create_table(schema).unwrap();
        catalog
    }

    #[test]
    fn affected_row_count_counts_filtered_rows_regardless_of_cell_change() {
        let mut catalog = setup();
        let table = catalog.table_mut("u").unwrap();
        table.rows.push(crate::catalog::Row::from([
            ("id".to_string(), Value::Integer(1)),
            ("name".to_string(), Value::Text("a".to_string())),
        ]));
        table.indexes.get_mut("id").unwrap().insert(Value::Integer(1), 0).unwrap();

        let update = UpdateQuery {
            table: "u".to_string(),
            assignments: vec![("name".to_string(), Literal::Text("a".to_string()))],
            where_clause: vec![],
        };
        let record = execute(&mut catalog, update).unwrap();
        assert_eq!(record, ResultRecord::mutation("1 row(s) updated in 'u'", 1));
    }

    #[test]
    fn updating_unique_column_to_existing_value_aborts_with_no_change() {
        let mut catalog = setup();
        {
            let table = catalog.table_mut("u").unwrap();
            for (id, name) in [(1, "a"), (2, "b")] {
                let pos = table.rows.len();
                table.rows.push(crate::catalog::Row::from([
                    ("id".to_string(), Value::Integer(id)),
                    ("name".to_string(), Value::Text(name.to_string())),
                ]));
                table.indexes.get_mut("id").unwrap().insert(Value::Integer(id), pos).unwrap();
            }
        }
        let update = UpdateQuery {
            table: "u".to_string(),
            assignments: vec![("id".to_string(), Literal::Integer(1))],
            where_clause: vec![crate::parser::ast::ConditionTerm {
                connective: None,
                condition: crate::parser::ast::Condition {
                    left: crate::parser::ast::ColumnRef::unqualified("id"),
                    op: crate::parser::ast::CompareOp::Eq,
                    right: Literal::Integer(2),
                },
            }],
        };
        let before = catalog.table("u").unwrap().rows.clone();
        let err = execute(&mut catalog, update).unwrap_err();
        assert!(matches!(err, EngineError::Constraint(_)));
        assert_eq!(catalog.table("u").unwrap().rows, before);
    }

    #[test]
    fn setting_two_rows_to_the_same_new_unique_value_aborts_with_no_change() {
        let mut catalog = setup();
        {
            let table = catalog.table_mut("u").unwrap();
            for (id, name) in [(1, "a"), (2, "b")] {
                let pos = table.rows.len();
                table.rows.push(crate::catalog::Row::from([
                    ("id".to_string(), Value::Integer(id)),
                    ("name".to_string(), Value::Text(name.to_string())),
                ]));
                table.indexes.get_mut("id").unwrap().insert(Value::Integer(id), pos).unwrap();
            }
        }
        let update = UpdateQuery {
            table: "u".to_string(),
            assignments: vec![("id".to_string(), Literal::Integer(99))],
            where_clause: vec![],
        };
        let before = catalog.table("u").unwrap().rows.clone();
        let err = execute(&mut catalog, update).unwrap_err();
        assert!(matches!(err, EngineError::Constraint(_)));
        assert_eq!(catalog.table("u").unwrap().rows, before);
        assert_eq!(catalog.table("u").unwrap().indexes["id"].search(&Value::Integer(99)).len(), 0);
    }

    #[test]
    fn swapping_two_rows_unique_values_succeeds() {
        let mut catalog = setup();
        {
            let table = catalog.table_mut("u").unwrap();
            for (id, name) in [(1, "a"), (2, "b")] {
                let pos = table.rows.len();
                table.rows.push(crate::catalog::Row::from([
                    ("id".to_string(), Value::Integer(id)),
                    ("name".to_string(), Value::Text(name.to_string())),
                ]));
                table.indexes.get_mut("id").unwrap().insert(Value::Integer(id), pos).unwrap();
            }
        }
        let update = UpdateQuery {
            table: "u".to_string(),
            assignments: vec![("name".to_string(), Literal::Text("swapped".to_string()))],
            where_clause: vec![],
        };
        let record = execute(&mut catalog, update).unwrap();
        assert_eq!(record, ResultRecord::mutation("2 row(s) updated in 'u'", 2));
        assert_eq!(catalog.table("u").unwrap().rows[0]["name"], Value::Text("swapped".to_string()));
        assert_eq!(catalog.table("u").unwrap().rows[1]["name"], Value::Text("swapped".to_string()));
    }
}
