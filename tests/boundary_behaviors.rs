//! Boundary behaviors B1-B4.

mod common;
use common::*;

use embersql::Value;

#[test]
fn like_percent_matches_everything_empty_matches_only_empty_underscore_is_one_char() {
    let mut engine = new_engine();
    exec_ok(&mut engine, "CREATE TABLE t (s VARCHAR(10))");
    exec_ok(&mut engine, "INSERT INTO t (s) VALUES ('')");
    exec_ok(&mut engine, "INSERT INTO t (s) VALUES ('a')");
    exec_ok(&mut engine, "INSERT INTO t (s) VALUES ('ab')");

    assert_eq!(select_rows(&mut engine, "SELECT * FROM t WHERE s LIKE '%'").len(), 3);
    assert_eq!(select_rows(&mut engine, "SELECT * FROM t WHERE s LIKE ''").len(), 1);
    assert_eq!(select_rows(&mut engine, "SELECT * FROM t WHERE s LIKE '_'").len(), 1);
}

#[test]
fn order_by_sorts_nulls_first_ascending_and_last_descending() {
    let mut engine = new_engine();
    exec_ok(&mut engine, "CREATE TABLE t (id INT PRIMARY KEY, n INT)");
    exec_ok(&mut engine, "INSERT INTO t (id, n) VALUES (1, 5)");
    exec_ok(&mut engine, "INSERT INTO t (id) VALUES (2)");
    exec_ok(&mut engine, "INSERT INTO t (id, n) VALUES (3, 1)");

    let asc = select_rows(&mut engine, "SELECT id FROM t ORDER BY n ASC");
    assert_eq!(asc[0]["id"], Value::Integer(2));

    let desc = select_rows(&mut engine, "SELECT id FROM t ORDER BY n DESC");
    assert_eq!(desc[desc.len() - 1]["id"], Value::Integer(2));
}

#[test]
fn limit_zero_is_empty_and_oversized_limit_returns_everything() {
    let mut engine = new_engine();
    exec_ok(&mut engine, "CREATE TABLE t (id INT PRIMARY KEY)");
    for i in 1..=3 {
        exec_ok(&mut engine, &format!("INSERT INTO t (id) VALUES ({i})"));
    }

    assert!(select_rows(&mut engine, "SELECT * FROM t LIMIT 0").is_empty());
    assert_eq!(select_rows(&mut engine, "SELECT * FROM t LIMIT 999").len(), 3);
}

#[test]
fn cross_kind_equality_and_less_than_are_false() {
    let mut engine = new_engine();
    exec_ok(&mut engine, "CREATE TABLE t (n INT)");
    exec_ok(&mut engine, "INSERT INTO t (n) VALUES (1)");

    // The RHS literal '1' is text; comparing it against an integer
    // column must never coerce.
    assert!(select_rows(&mut engine, "SELECT * FROM t WHERE n = '1'").is_empty());
    assert!(select_rows(&mut engine, "SELECT * FROM t WHERE n < '9'").is_empty());
}
