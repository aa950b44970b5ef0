#![allow(dead_code)]

use embersql::{Engine, ResultRecord, Value};

pub fn new_engine() -> Engine {
    Engine::new()
}

/// Runs `sql` against `engine`, panicking with the failure message if
/// it didn't succeed.
pub fn exec_ok(engine: &mut Engine, sql: &str) -> ResultRecord {
    let record = engine.execute(sql);
    if let ResultRecord::Failure { error } = &record {
        panic!("expected success for `{sql}`, got error: {error}");
    }
    record
}

/// Runs `sql`, panicking if it unexpectedly succeeded, and returns the
/// error string.
pub fn exec_err(engine: &mut Engine, sql: &str) -> String {
    match engine.execute(sql) {
        ResultRecord::Failure { error } => error,
        ResultRecord::Success { .. } => panic!("expected failure for `{sql}`"),
    }
}

/// Runs a SELECT and returns its projected rows as plain Vec<(key,
/// value)> pairs sorted by key, for order-independent assertions.
pub fn select_rows(engine: &mut Engine, sql: &str) -> Vec<std::collections::HashMap<String, Value>> {
    match exec_ok(engine, sql) {
        ResultRecord::Success { data: Some(rows), .. } => rows,
        other => panic!("expected row data, got {other:?}"),
    }
}

pub fn affected_rows(record: &ResultRecord) -> usize {
    match record {
        ResultRecord::Success { affected_rows: Some(n), .. } => *n,
        other => panic!("expected an affected_rows count, got {other:?}"),
    }
}
