//! The read path: joins, WHERE evaluation, ORDER BY, LIMIT, projection.

use std::cmp::Ordering;

use regex::Regex;

use crate::catalog::{Catalog, Row, TableState};
use crate::error::Result;
use crate::executor::ResultRecord;
use crate::parser::ast::{
    ColumnRef, CompareOp, Condition, Connective, ConditionTerm, JoinKind, JoinSpec,
    OrderDirection, SelectColumns, SelectQuery,
};
use crate::value::Value;

pub fn execute(catalog: &mut Catalog, query: SelectQuery) -> Result<ResultRecord> {
    let base = catalog.require_table(&query.table)?;

    let mut working: Vec<Row> = match find_index_seed(base, &query.where_clause) {
        Some(seed) if query.joins.is_empty() => base.indexes[&seed.column]
            .search(&seed.value)
            .into_iter()
            .filter_map(|pos| base.rows.get(pos).map(|row| qualify_row(&query.table, row)))
            .collect(),
        _ => base.rows.iter().map(|row| qualify_row(&query.table, row)).collect(),
    };

    for join in &query.joins {
        let right_table = catalog.require_table(&join.table)?;
        working = apply_join(&working, join, right_table);
    }

    let mut filtered = Vec::with_capacity(working.len());
    for row in working {
        if row_matches(&row, &query.where_clause)? {
            filtered.push(row);
        }
    }

    if let Some((col, dir)) = &query.order_by {
        let key = column_key(col);
        filtered.sort_by(|a, b| {
            let av = a.get(&key).cloned().unwrap_or(Value::Null);
            let bv = b.get(&key).cloned().unwrap_or(Value::Null);
            let ord = av.total_cmp(&bv);
            if *dir == OrderDirection::Desc {
                ord.reverse()
            } else {
                ord
            }
        });
    }

    if let Some(limit) = query.limit {
        filtered.truncate(limit);
    }

    let projected = filtered.into_iter().map(|row| project(row, &query.columns)).collect();
    Ok(ResultRecord::rows(projected))
}

/// Exposes every column of a row under both its bare name and its
/// `table.column` qualified name, as §4.4.1 requires of the initial
/// (un-joined) row sequence.
fn qualify_row(table_name: &str, row: &Row) -> Row {
    let mut out = Row::with_capacity(row.len() * 2);
    for (col, value) in row {
        out.insert(format!("{table_name}.{col}"), value.clone());
        out.insert(col.clone(), value.clone());
    }
    out
}

pub(crate) fn column_key(col_ref: &ColumnRef) -> String {
    match &col_ref.table {
        Some(t) => format!("{t}.{}", col_ref.column),
        None => col_ref.column.clone(),
    }
}

struct IndexSeed {
    column: String,
    value: Value,
}

/// Finds the first `=` WHERE condition against the un-joined base
/// table whose column carries an index, for the index-assisted
/// lookup of §4.4.2. Only ever consulted when no join is present —
/// once a join runs, positions no longer address the base table.
fn find_index_seed(table: &TableState, where_clause: &[ConditionTerm]) -> Option<IndexSeed> {
    where_clause.iter().find_map(|term| {
        let cond = &term.condition;
        if cond.op != CompareOp::Eq {
            return None;
        }
        if let Some(qualifier) = &cond.left.table {
            if qualifier != &table.schema.name {
                return None;
            }
        }
        if !table.indexes.contains_key(&cond.left.column) {
            return None;
        }
        Some(IndexSeed {
            column: cond.left.column.clone(),
            value: cond.right.to_loose_value(),
        })
    })
}

fn apply_join(working: &[Row], join: &JoinSpec, right_table: &TableState) -> Vec<Row> {
    let left_key = column_key(&join.left);
    let right_key = column_key(&join.right);
    let exposed = join.exposed_name();

    let right_rows: Vec<Row> = right_table
        .rows
        .iter()
        .map(|row| qualify_row(exposed, row))
        .collect();

    let mut output = Vec::new();
    for left_row in working {
        let left_value = left_row.get(&left_key).cloned().unwrap_or(Value::Null);
        let mut matched = false;
        for right_row in &right_rows {
            let right_value = right_row.get(&right_key).cloned().unwrap_or(Value::Null);
            if left_value.cell_eq(&right_value) {
                matched = true;
                output.push(combine_rows(left_row, right_row));
            }
        }
        if !matched && join.kind == JoinKind::Left {
            output.push(combine_with_right_nulls(left_row, right_table, exposed));
        }
    }

    if join.kind == JoinKind::Right {
        // Symmetric of LEFT, per the Open Question resolution: every
        // right row unmatched by any left row is emitted once with
        // every left-side slot null.
        for right_row in &right_rows {
            let right_value = right_row.get(&right_key).cloned().unwrap_or(Value::Null);
            let matched = working.iter().any(|left_row| {
                left_row
                    .get(&left_key)
                    .cloned()
                    .unwrap_or(Value::Null)
                    .cell_eq(&right_value)
            });
            if !matched {
                output.push(combine_with_left_nulls(right_row, working.first()));
            }
        }
    }

    output
}

/// Left keys win unqualified-name collisions; qualified keys from the
/// right are always added (they can't collide — each side's qualified
/// keys are namespaced by its own table/alias).
fn combine_rows(left: &Row, right: &Row) -> Row {
    let mut combined = left.clone();
    for (key, value) in right {
        if key.contains('.') {
            combined.insert(key.clone(), value.clone());
        } else {
            combined.entry(key.clone()).or_insert_with(|| value.clone());
        }
    }
    combined
}

fn combine_with_right_nulls(left_row: &Row, right_table: &TableState, exposed: &str) -> Row {
    let mut combined = left_row.clone();
    for column in &right_table.schema.columns {
        combined.insert(format!("{exposed}.{}", column.name), Value::Null);
        combined.entry(column.name.clone()).or_insert(Value::Null);
    }
    combined
}

/// Builds a RIGHT-join null-filled row for a right row with no left
/// match. `left_shape` supplies the left-side key set (taken from any
/// already-produced row, since every left row shares the same keys);
/// with no left rows at all there is no shape to borrow from, and the
/// row carries only the right side's own keys.
fn combine_with_left_nulls(right_row: &Row, left_shape: Option<&Row>) -> Row {
    let mut combined = Row::new();
    if let Some(shape) = left_shape {
        for key in shape.keys() {
            combined.insert(key.clone(), Value::Null);
        }
    }
    for (key, value) in right_row {
        combined.insert(key.clone(), value.clone());
    }
    combined
}

/// Folds a flat WHERE sequence strictly left-to-right with no
/// operator precedence (§4.4.2's contract). An empty sequence matches
/// every row.
pub(crate) fn row_matches(row: &Row, where_clause: &[ConditionTerm]) -> Result<bool> {
    let mut acc: Option<bool> = None;
    for term in where_clause {
        let value = evaluate_condition(row, &term.condition);
        acc = Some(match (acc, term.connective) {
            (None, _) => value,
            (Some(prev), Some(Connective::Or)) => prev || value,
            (Some(prev), _) => prev && value,
        });
    }
    Ok(acc.unwrap_or(true))
}

fn evaluate_condition(row: &Row, cond: &Condition) -> bool {
    let key = column_key(&cond.left);
    let left = row.get(&key).cloned().unwrap_or(Value::Null);
    let right = cond.right.to_loose_value();
    match cond.op {
        CompareOp::Eq => left.cell_eq(&right),
        CompareOp::NotEq => !left.cell_eq(&right),
        CompareOp::Lt => matches!(left.natural_cmp(&right), Some(Ordering::Less)),
        CompareOp::Gt => matches!(left.natural_cmp(&right), Some(Ordering::Greater)),
        CompareOp::LtEq => matches!(left.natural_cmp(&right), Some(Ordering::Less | Ordering::Equal)),
        CompareOp::GtEq => {
            matches!(left.natural_cmp(&right), Some(Ordering::Greater | Ordering::Equal))
        }
        CompareOp::Like => evaluate_like(&left, &right),
    }
}

/// `%` matches any run of characters, `_` matches exactly one,
/// matching is case-insensitive and anchored at both ends. Only
/// defined when both operands are strings.
fn evaluate_like(left: &Value, right: &Value) -> bool {
    let (Value::Text(haystack), Value::Text(pattern)) = (left, right) else {
        return false;
    };
    let mut pattern_re = String::from("(?is)^");
    for ch in pattern.chars() {
        match ch {
            '%' => pattern_re.push_str(".*"),
            '_' => pattern_re.push('.'),
            other => pattern_re.push_str(&regex::escape(&other.to_string())),
        }
    }
    pattern_re.push('$');
    Regex::new(&pattern_re).is_ok_and(|re| re.is_match(haystack))
}

fn project(row: Row, columns: &SelectColumns) -> Row {
    match columns {
        SelectColumns::Star => row,
        SelectColumns::Named(cols) => {
            let mut out = Row::new();
            for col_ref in cols {
                let key = column_key(col_ref);
                if let Some(value) = row.get(&key) {
                    out.insert(key, value.clone());
                }
            }
            out
        }
    }
}
