//! Self-migrating schema for the `todos` relation.
//!
//! Migration runs on every open and is idempotent:
//! - the table is created with `IF NOT EXISTS`
//! - `orderIndex` is added (and backfilled from `id`) only when absent
//! - `archived` is added (defaulting to 0) only when absent

use crate::primitives::{ARCHIVED_COLUMN, ORDER_INDEX_COLUMN, TABLE_NAME};
use rusqlite::Connection;

/// DDL for a fresh database.
pub const CREATE_TABLE_SQL: &str = "CREATE TABLE IF NOT EXISTS todos (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    text TEXT NOT NULL,
    completed BOOLEAN DEFAULT 0,
    orderIndex INTEGER,
    archived BOOLEAN DEFAULT 0
)";

const ADD_ORDER_INDEX_SQL: &str = "ALTER TABLE todos ADD COLUMN orderIndex INTEGER";
const BACKFILL_ORDER_INDEX_SQL: &str = "UPDATE todos SET orderIndex = id WHERE orderIndex IS NULL";
const ADD_ARCHIVED_SQL: &str = "ALTER TABLE todos ADD COLUMN archived BOOLEAN DEFAULT 0";

/// What a migration run changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MigrationReport {
    pub added_order_index: bool,
    pub backfilled_rows: usize,
    pub added_archived: bool,
}

impl MigrationReport {
    /// True when the schema was already current.
    #[must_use]
    pub const fn is_noop(&self) -> bool {
        !self.added_order_index && !self.added_archived
    }
}

/// Column names of `table`, in declaration order.
pub fn table_columns(conn: &Connection, table: &str) -> rusqlite::Result<Vec<String>> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table})"))?;
    let names = stmt
        .query_map([], |row| row.get::<_, String>(1))?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(names)
}

/// Bring the `todos` table up to date.
///
/// All steps run in one transaction, so a failure leaves the schema as it was.
pub fn migrate(conn: &mut Connection) -> rusqlite::Result<MigrationReport> {
    let tx = conn.transaction()?;
    tx.execute_batch(CREATE_TABLE_SQL)?;

    let columns = table_columns(&tx, TABLE_NAME)?;
    let has = |name: &str| columns.iter().any(|c| c == name);
    let mut report = MigrationReport::default();

    if !has(ORDER_INDEX_COLUMN) {
        tx.execute(ADD_ORDER_INDEX_SQL, [])?;
        report.added_order_index = true;
        report.backfilled_rows = tx.execute(BACKFILL_ORDER_INDEX_SQL, [])?;
    }

    if !has(ARCHIVED_COLUMN) {
        tx.execute(ADD_ARCHIVED_SQL, [])?;
        report.added_archived = true;
    }

    tx.commit()?;

    if report.is_noop() {
        tracing::debug!("schema already current");
    } else {
        tracing::info!(
            added_order_index = report.added_order_index,
            backfilled_rows = report.backfilled_rows,
            added_archived = report.added_archived,
            "migrated todos table"
        );
    }

    Ok(report)
}
