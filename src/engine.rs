//! The engine surface external collaborators (a terminal UI, a
//! contact-management demo, anything else embedding this crate)
//! consume exclusively through `execute` and the introspection
//! queries (§6). Nothing outside this module ever touches the
//! catalog, the parser, or the executor directly.

use tracing::{debug, warn};

use crate::catalog::Catalog;
use crate::executor::{execute_statement, ResultRecord};
use crate::parser::parse_statement;
use crate::schema::TableSchema;

/// Owns the process-wide table catalog. One `Engine` is meant to live
/// for the life of the embedding process (§5) — there is no teardown
/// protocol and no persistence across instances.
///
/// `CREATE TABLE` accepts a standalone `PRIMARY KEY(col)` clause but
/// ignores it (§4.1, §9's open question): only a `PRIMARY KEY` marking
/// inline on a column definition establishes a primary key. A table
/// written with only the standalone form silently ends up with none.
#[derive(Debug, Default)]
pub struct Engine {
    catalog: Catalog,
}

impl Engine {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The sole query entry point: parses `sql`, dispatches it, and
    /// returns a result record. Never panics on malformed input — any
    /// parse or execution failure comes back as a `Failure` record.
    pub fn execute(&mut self, sql: &str) -> ResultRecord {
        debug!(query = sql, "executing statement");
        let statement = match parse_statement(sql) {
            Ok(statement) => statement,
            Err(err) => {
                warn!(query = sql, error = %err, "statement failed to parse");
                return err.into();
            }
        };
        let record = execute_statement(&mut self.catalog, statement);
        if !record.is_success() {
            warn!(query = sql, "statement execution failed");
        }
        record
    }

    #[must_use]
    pub fn list_table_names(&self) -> Vec<String> {
        self.catalog.list_table_names()
    }

    #[must_use]
    pub fn get_schema(&self, table_name: &str) -> Option<TableSchema> {
        self.catalog.get_schema(table_name)
    }

    #[must_use]
    pub fn get_row_count(&self, table_name: &str) -> usize {
        self.catalog.get_row_count(table_name)
    }
}
