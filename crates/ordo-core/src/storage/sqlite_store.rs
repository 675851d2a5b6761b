//! # SQLite-backed Item Storage
//!
//! A disk-backed item store using rusqlite.
//!
//! One long-lived connection per store. Every operation except `reorder`
//! is a single statement and therefore atomic on its own; `reorder` runs
//! inside an explicit transaction that is rolled back on the first failure.
//!
//! Runtime defaults:
//! - `journal_mode = WAL` for file databases
//! - `busy_timeout = 5s`

use super::schema;
use crate::primitives::DEFAULT_BUSY_TIMEOUT;
use crate::store::ItemStore;
use crate::{Item, ItemId, OrderIndex, OrdoError, Position};
use rusqlite::{Connection, OptionalExtension, Row, Transaction, params};
use std::path::{Path, PathBuf};

const SELECT_COLUMNS: &str = "SELECT id, text, completed, archived, orderIndex FROM todos";

/// A disk-backed item store.
pub struct SqliteStore {
    conn: Connection,
    path: Option<PathBuf>,
}

impl std::fmt::Debug for SqliteStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteStore")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl SqliteStore {
    /// Open or create a database at the given path and migrate it.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, OrdoError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                OrdoError::Store(format!(
                    "create database directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let conn = Connection::open(path)?;
        let mut store = Self {
            conn,
            path: Some(path.to_path_buf()),
        };
        store.prepare()?;
        tracing::debug!(path = %path.display(), "opened sqlite store");
        Ok(store)
    }

    /// Open a private in-memory database. Contents vanish on drop.
    pub fn open_in_memory() -> Result<Self, OrdoError> {
        let mut store = Self {
            conn: Connection::open_in_memory()?,
            path: None,
        };
        store.prepare()?;
        Ok(store)
    }

    /// Path of the database file, `None` for in-memory stores.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Raw connection access for diagnostics.
    #[must_use]
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    fn prepare(&mut self) -> Result<(), OrdoError> {
        configure_connection(&self.conn)?;
        schema::migrate(&mut self.conn)?;
        Ok(())
    }

    fn apply_positions(tx: &Transaction<'_>, positions: &[Position]) -> rusqlite::Result<()> {
        let mut stmt = tx.prepare_cached("UPDATE todos SET orderIndex = ?1 WHERE id = ?2")?;
        for position in positions {
            stmt.execute(params![position.order_index.value(), position.id.0])?;
        }
        Ok(())
    }
}

fn configure_connection(conn: &Connection) -> rusqlite::Result<()> {
    let _journal_mode: String =
        conn.query_row("PRAGMA journal_mode = WAL", [], |row| row.get(0))?;
    conn.busy_timeout(DEFAULT_BUSY_TIMEOUT)?;
    Ok(())
}

/// Map a row selected with `SELECT_COLUMNS`.
///
/// Legacy rows with a NULL `orderIndex` sort as if it were their id,
/// matching the migration backfill. NULL flags read as false. `list_all`
/// and `add` apply the same fallbacks in SQL.
fn item_from_row(row: &Row<'_>) -> rusqlite::Result<Item> {
    let id: i64 = row.get(0)?;
    let completed: Option<bool> = row.get(2)?;
    let archived: Option<bool> = row.get(3)?;
    let order_index: Option<i64> = row.get(4)?;
    Ok(Item {
        id: ItemId(id),
        text: row.get(1)?,
        completed: completed.unwrap_or(false),
        archived: archived.unwrap_or(false),
        order_index: OrderIndex(order_index.unwrap_or(id)),
    })
}

impl ItemStore for SqliteStore {
    fn list_all(&self) -> Result<Vec<Item>, OrdoError> {
        let sql = format!(
            "{SELECT_COLUMNS} ORDER BY COALESCE(archived, 0) ASC, COALESCE(orderIndex, id) ASC, id ASC"
        );
        let mut stmt = self.conn.prepare_cached(&sql)?;
        let items = stmt
            .query_map([], item_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(items)
    }

    fn get(&self, id: ItemId) -> Result<Option<Item>, OrdoError> {
        let sql = format!("{SELECT_COLUMNS} WHERE id = ?1");
        let item = self
            .conn
            .query_row(&sql, params![id.0], item_from_row)
            .optional()?;
        Ok(item)
    }

    fn add(&mut self, text: &str) -> Result<Item, OrdoError> {
        let (id, order_index): (i64, i64) = self.conn.query_row(
            "INSERT INTO todos (text, completed, orderIndex, archived)
             VALUES (?1, 0, (SELECT COALESCE(MAX(COALESCE(orderIndex, id)), 0) + 1
                            FROM todos WHERE COALESCE(archived, 0) = 0), 0)
             RETURNING id, orderIndex",
            params![text],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;

        tracing::debug!(id, order_index, "added item");
        Ok(Item {
            id: ItemId(id),
            text: text.to_string(),
            completed: false,
            archived: false,
            order_index: OrderIndex(order_index),
        })
    }

    fn delete(&mut self, id: ItemId) -> Result<(), OrdoError> {
        let removed = self
            .conn
            .execute("DELETE FROM todos WHERE id = ?1", params![id.0])?;
        tracing::debug!(id = id.0, removed, "delete");
        Ok(())
    }

    fn set_completed(&mut self, id: ItemId, completed: bool) -> Result<(), OrdoError> {
        let changed = self.conn.execute(
            "UPDATE todos SET completed = ?1 WHERE id = ?2",
            params![completed, id.0],
        )?;
        tracing::debug!(id = id.0, completed, changed, "set completed");
        Ok(())
    }

    fn archive(&mut self, id: ItemId) -> Result<(), OrdoError> {
        let changed = self
            .conn
            .execute("UPDATE todos SET archived = 1 WHERE id = ?1", params![id.0])?;
        tracing::debug!(id = id.0, changed, "archive");
        Ok(())
    }

    fn reorder(&mut self, positions: &[Position]) -> Result<(), OrdoError> {
        let tx = self.conn.transaction()?;

        match Self::apply_positions(&tx, positions) {
            Ok(()) => {
                tx.commit()?;
                tracing::debug!(count = positions.len(), "reorder committed");
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, count = positions.len(), "reorder failed, rolling back");
                if let Err(rollback_err) = tx.rollback() {
                    tracing::error!(error = %rollback_err, "reorder rollback failed");
                }
                Err(e.into())
            }
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(items: &[Item]) -> Vec<i64> {
        items.iter().map(|item| item.id.0).collect()
    }

    /// Make any update that sets `orderIndex` to 999 abort.
    fn install_failing_trigger(store: &SqliteStore) {
        store
            .connection()
            .execute_batch(
                "CREATE TRIGGER fail_on_999 BEFORE UPDATE OF orderIndex ON todos
                 WHEN NEW.orderIndex = 999
                 BEGIN SELECT RAISE(ABORT, 'refused'); END;",
            )
            .expect("create trigger");
    }

    #[test]
    fn add_and_list_roundtrip() {
        let mut store = SqliteStore::open_in_memory().expect("open");
        let a = store.add("Buy milk").expect("add");
        let b = store.add("Walk dog").expect("add");

        assert_eq!(a.order_index, OrderIndex(1));
        assert_eq!(b.order_index, OrderIndex(2));

        let items = store.list_all().expect("list");
        assert_eq!(items, vec![a, b]);
    }

    #[test]
    fn get_missing_returns_none() {
        let store = SqliteStore::open_in_memory().expect("open");
        assert!(store.get(ItemId(5)).expect("get").is_none());
    }

    #[test]
    fn add_after_archiving_last_reuses_its_slot() {
        let mut store = SqliteStore::open_in_memory().expect("open");
        let _a = store.add("a").expect("add");
        let b = store.add("b").expect("add");
        store.archive(b.id).expect("archive");

        let c = store.add("c").expect("add");
        assert_eq!(c.order_index, OrderIndex(2));
        assert_eq!(ids(&store.list_all().expect("list")), vec![1, 3, 2]);
    }

    fn insert_raw(store: &SqliteStore, text: &str, order: Option<i64>, archived: Option<bool>) {
        store
            .connection()
            .execute(
                "INSERT INTO todos (text, completed, orderIndex, archived) VALUES (?1, 0, ?2, ?3)",
                params![text, order, archived],
            )
            .expect("raw insert");
    }

    #[test]
    fn add_goes_after_rows_with_null_order_index() {
        let mut store = SqliteStore::open_in_memory().expect("open");
        store.add("a").expect("add");
        insert_raw(&store, "legacy", None, Some(false));

        let n = store.add("n").expect("add");
        assert_eq!(n.order_index, OrderIndex(3));

        let orders: Vec<(String, i64)> = store
            .list_all()
            .expect("list")
            .into_iter()
            .map(|item| (item.text, item.order_index.value()))
            .collect();
        assert_eq!(
            orders,
            vec![
                ("a".to_string(), 1),
                ("legacy".to_string(), 2),
                ("n".to_string(), 3),
            ]
        );
    }

    #[test]
    fn null_archived_rows_sort_as_active() {
        let mut store = SqliteStore::open_in_memory().expect("open");
        store.add("first").expect("add");
        insert_raw(&store, "second", Some(2), None);
        let archived = store.add("gone").expect("add");
        store.archive(archived.id).expect("archive");

        let items = store.list_all().expect("list");
        assert_eq!(ids(&items), vec![1, 2, archived.id.0]);
        assert!(!items[1].archived);

        let next = store.add("third").expect("add");
        assert_eq!(next.order_index, OrderIndex(3));
    }

    #[test]
    fn autoincrement_ids_survive_delete() {
        let mut store = SqliteStore::open_in_memory().expect("open");
        let a = store.add("a").expect("add");
        store.delete(a.id).expect("delete");
        let b = store.add("b").expect("add");
        assert!(b.id > a.id);
    }

    #[test]
    fn reorder_applies_every_position() {
        let mut store = SqliteStore::open_in_memory().expect("open");
        let a = store.add("a").expect("add");
        let b = store.add("b").expect("add");

        store
            .reorder(&[
                Position::new(b.id, OrderIndex(1)),
                Position::new(a.id, OrderIndex(2)),
            ])
            .expect("reorder");

        assert_eq!(ids(&store.list_all().expect("list")), vec![b.id.0, a.id.0]);
    }

    #[test]
    fn reorder_failure_rolls_back_earlier_writes() {
        let mut store = SqliteStore::open_in_memory().expect("open");
        let a = store.add("a").expect("add");
        let b = store.add("b").expect("add");
        install_failing_trigger(&store);

        let before = store.list_all().expect("list");
        let result = store.reorder(&[
            Position::new(a.id, OrderIndex(5)),
            Position::new(b.id, OrderIndex(999)),
        ]);

        assert!(matches!(result, Err(OrdoError::Store(_))));
        assert_eq!(store.list_all().expect("list"), before);
    }

    #[test]
    fn open_file_database_persists_between_handles() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("todos.db");

        {
            let mut store = SqliteStore::open(&path).expect("open");
            let item = store.add("persist me").expect("add");
            store.set_completed(item.id, true).expect("toggle");
        }

        let store = SqliteStore::open(&path).expect("reopen");
        let items = store.list_all().expect("list");
        assert_eq!(items.len(), 1);
        assert!(items[0].completed);
        assert_eq!(store.path(), Some(path.as_path()));
    }

    #[test]
    fn file_database_uses_wal() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = SqliteStore::open(dir.path().join("todos.db")).expect("open");

        let journal_mode: String = store
            .connection()
            .pragma_query_value(None, "journal_mode", |row| row.get(0))
            .expect("journal_mode");
        assert_eq!(journal_mode.to_ascii_lowercase(), "wal");
    }
}
