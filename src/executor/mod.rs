//! Dispatches a parsed [`Statement`] against a [`Catalog`] and
//! produces the external-facing [`ResultRecord`] (§6).

pub mod delete;
pub mod insert;
pub mod select;
pub mod update;

use crate::catalog::{Catalog, Row};
use crate::error::{EngineError, Result};
use crate::parser::ast::{CreateTable, DropTable, Statement};
use crate::schema::TableSchema;

/// Exactly one of two shapes, per §6: a success carrying optional row
/// data / message / affected-row count, or a failure carrying a
/// human-readable error string.
#[derive(Debug, Clone, PartialEq)]
pub enum ResultRecord {
    Success {
        data: Option<Vec<Row>>,
        message: Option<String>,
        affected_rows: Option<usize>,
    },
    Failure {
        error: String,
    },
}

impl ResultRecord {
    /// A SELECT result: `data` is set, `affected_rows` is its length.
    #[must_use]
    pub fn rows(data: Vec<Row>) -> Self {
        let affected_rows = data.len();
        Self::Success {
            data: Some(data),
            message: None,
            affected_rows: Some(affected_rows),
        }
    }

    /// A CREATE/INSERT/UPDATE/DELETE/DROP result: `message` and
    /// `affected_rows` are set, `data` is absent.
    #[must_use]
    pub fn mutation(message: impl Into<String>, affected_rows: usize) -> Self {
        Self::Success {
            data: None,
            message: Some(message.into()),
            affected_rows: Some(affected_rows),
        }
    }

    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

impl From<EngineError> for ResultRecord {
    fn from(err: EngineError) -> Self {
        Self::Failure { error: err.to_string() }
    }
}

pub fn execute_statement(catalog: &mut Catalog, statement: Statement) -> ResultRecord {
    let outcome = match statement {
        Statement::Create(create) => create_table(catalog, create),
        Statement::Insert(stmt) => insert::execute(catalog, stmt),
        Statement::Select(stmt) => select::execute(catalog, stmt),
        Statement::Update(stmt) => update::execute(catalog, stmt),
        Statement::Delete(stmt) => delete::execute(catalog, stmt),
        Statement::Drop(drop) => drop_table(catalog, drop),
    };
    outcome.unwrap_or_else(ResultRecord::from)
}

fn create_table(catalog: &mut Catalog, create: CreateTable) -> Result<ResultRecord> {
    let schema = TableSchema::new(create.table.clone(), create.columns)?;
    catalog.create_table(schema)?;
    Ok(ResultRecord::mutation(format!("table '{}' created", create.table), 0))
}

fn drop_table(catalog: &mut Catalog, drop: DropTable) -> Result<ResultRecord> {
    catalog.drop_table(&drop.table)?;
    Ok(ResultRecord::mutation(format!("table '{}' dropped", drop.table), 0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_statement;

    fn run(catalog: &mut Catalog, sql: &str) -> ResultRecord {
        execute_statement(catalog, parse_statement(sql).unwrap())
    }

    #[test]
    fn create_and_drop_report_zero_affected_rows() {
        let mut catalog = Catalog::new();
        assert_eq!(
            run(&mut catalog, "CREATE TABLE t (id INT)"),
            ResultRecord::mutation("table 't' created", 0)
        );
        assert_eq!(
            run(&mut catalog, "DROP TABLE t"),
            ResultRecord::mutation("table 't' dropped", 0)
        );
    }

    #[test]
    fn syntax_error_surfaces_as_failure() {
        let mut catalog = Catalog::new();
        let record = run(&mut catalog, "FROBNICATE t");
        assert!(!record.is_success());
    }

    #[test]
    fn end_to_end_auto_increment_and_projection() {
        let mut catalog = Catalog::new();
        run(&mut catalog, "CREATE TABLE u (id INT PRIMARY KEY, name VARCHAR(10) NOT NULL)");
        run(&mut catalog, "INSERT INTO u (name) VALUES ('a')");
        run(&mut catalog, "INSERT INTO u (name) VALUES ('b')");
        let record = run(&mut catalog, "SELECT id, name FROM u ORDER BY id ASC");
        let ResultRecord::Success { data: Some(rows), .. } = record else {
            panic!("expected row data");
        };
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["id"], crate::value::Value::Integer(1));
        assert_eq!(rows[1]["name"], crate::value::Value::Text("b".to_string()));
    }

    #[test]
    fn left_join_fills_nulls_for_unmatched_left_rows() {
        let mut catalog = Catalog::new();
        run(&mut catalog, "CREATE TABLE a (id INT PRIMARY KEY, x VARCHAR(10))");
        run(&mut catalog, "CREATE TABLE b (aid INT, y VARCHAR(10))");
        run(&mut catalog, "INSERT INTO a (id, x) VALUES (1, 'x')");
        run(&mut catalog, "INSERT INTO a (id, x) VALUES (2, 'y')");
        run(&mut catalog, "INSERT INTO b (aid, y) VALUES (1, 'X')");
        let record = run(&mut catalog, "SELECT * FROM a LEFT JOIN b ON a.id = b.aid");
        let ResultRecord::Success { data: Some(rows), .. } = record else {
            panic!("expected row data");
        };
        assert_eq!(rows.len(), 2);
        let unmatched = rows.iter().find(|r| r["a.id"] == crate::value::Value::Integer(2)).unwrap();
        assert_eq!(unmatched["b.aid"], crate::value::Value::Null);
        assert_eq!(unmatched["b.y"], crate::value::Value::Null);
    }
}
