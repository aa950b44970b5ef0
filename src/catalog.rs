//! The process-wide table store: table state, and the catalog that
//! owns every table by name.

use std::collections::HashMap;

use crate::error::{EngineError, Result};
use crate::index::BTreeIndex;
use crate::schema::TableSchema;
use crate::value::Value;

/// A single row: column name to cell value. Row position in the
/// owning table's row vector — not this map — is the row's identity.
pub type Row = HashMap<String, Value>;

/// Everything the engine keeps about one table.
#[derive(Debug, Clone)]
pub struct TableState {
    pub schema: TableSchema,
    pub rows: Vec<Row>,
    /// One index per unique-constrained column (including the
    /// primary key), created at table creation and never added to or
    /// removed from afterward.
    pub indexes: HashMap<String, BTreeIndex>,
    /// Next value to assign to a missing integer primary key.
    /// Initialized to 1; only ever incremented.
    pub next_auto_increment: i64,
}

impl TableState {
    fn new(schema: TableSchema) -> Self {
        let indexes = schema
            .unique_columns
            .iter()
            .map(|col| (col.clone(), BTreeIndex::new(true)))
            .collect();
        Self {
            schema,
            rows: Vec::new(),
            indexes,
            next_auto_increment: 1,
        }
    }
}

/// The process-wide mapping from table name to table state.
///
/// A single `Catalog` is meant to be held by one [`crate::Engine`] for
/// the life of the process (§5) — it has no teardown protocol and no
/// persistence.
#[derive(Debug, Default)]
pub struct Catalog {
    tables: HashMap<String, TableState>,
    insertion_order: Vec<String>,
}

impl Catalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_table(&mut self, schema: TableSchema) -> Result<()> {
        if self.tables.contains_key(&schema.name) {
            return Err(EngineError::Schema(format!(
                "table '{}' already exists",
                schema.name
            )));
        }
        self.insertion_order.push(schema.name.clone());
        self.tables.insert(schema.name.clone(), TableState::new(schema));
        Ok(())
    }

    pub fn drop_table(&mut self, name: &str) -> Result<()> {
        if self.tables.remove(name).is_none() {
            return Err(EngineError::Schema(format!("table '{name}' does not exist")));
        }
        self.insertion_order.retain(|t| t != name);
        Ok(())
    }

    pub fn table(&self, name: &str) -> Option<&TableState> {
        self.tables.get(name)
    }

    pub fn table_mut(&mut self, name: &str) -> Option<&mut TableState> {
        self.tables.get_mut(name)
    }

    pub fn require_table(&self, name: &str) -> Result<&TableState> {
        self.table(name)
            .ok_or_else(|| EngineError::Schema(format!("table '{name}' does not exist")))
    }

    pub fn require_table_mut(&mut self, name: &str) -> Result<&mut TableState> {
        self.table_mut(name)
            .ok_or_else(|| EngineError::Schema(format!("table '{name}' does not exist")))
    }

    #[must_use]
    pub fn list_table_names(&self) -> Vec<String> {
        self.insertion_order.clone()
    }

    #[must_use]
    pub fn get_schema(&self, name: &str) -> Option<TableSchema> {
        self.tables.get(name).map(|t| t.schema.clone())
    }

    #[must_use]
    pub fn get_row_count(&self, name: &str) -> usize {
        self.tables.get(name).map_or(0, |t| t.rows.len())
    }
}
