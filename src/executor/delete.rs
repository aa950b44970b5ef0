//! The DELETE path: WHERE-filtered removal with full index rebuild
//! (§4.5 — row positions shift, so every index is rebuilt rather than
//! patched).

use crate::catalog::Catalog;
use crate::error::Result;
use crate::executor::select::row_matches;
use crate::executor::ResultRecord;
use crate::parser::ast::DeleteQuery;
use crate::value::Value;

pub fn execute(catalog: &mut Catalog, delete: DeleteQuery) -> Result<ResultRecord> {
    let positions: Vec<usize> = {
        let table = catalog.require_table(&delete.table)?;
        table
            .rows
            .iter()
            .enumerate()
            .filter_map(|(pos, row)| match row_matches(row, &delete.where_clause) {
                Ok(true) => Some(Ok(pos)),
                Ok(false) => None,
                Err(e) => Some(Err(e)),
            })
            .collect::<Result<Vec<_>>>()?
    };

    let table = catalog.require_table_mut(&delete.table)?;
    for &pos in positions.iter().rev() {
        table.rows.remove(pos);
    }

    for (col_name, index) in &mut table.indexes {
        let pairs = table
            .rows
            .iter()
            .enumerate()
            .map(|(pos, row)| (row.get(col_name).cloned().unwrap_or(Value::Null), pos));
        index.rebuild(pairs);
    }

    let affected = positions.len();
    Ok(ResultRecord::mutation(
        format!("{affected} row(s) deleted from '{}'", delete.table),
        affected,
    ))
}
