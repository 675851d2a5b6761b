//! # Fixed Limits and Names
//!
//! Compile-time constants shared by the stores and the binary.
//!
//! ## Primitives
//!
//! 1. **Table layout**: the single relation and its column names.
//! 2. **Text limits**: what `Board::add` accepts.
//! 3. **Connection defaults**: pragmas applied to every SQLite handle.

use std::time::Duration;

/// Name of the single persisted relation.
pub const TABLE_NAME: &str = "todos";

/// Column holding the position among active items.
///
/// Kept in camelCase so databases created by earlier releases open unchanged.
pub const ORDER_INDEX_COLUMN: &str = "orderIndex";

/// Column holding the archival flag.
pub const ARCHIVED_COLUMN: &str = "archived";

/// Maximum item text length in bytes, after trimming.
///
/// Enforced at the edge (`Board::add` and the HTTP API), never by the store.
pub const MAX_TEXT_LENGTH: usize = 1024;

/// Maximum number of ids accepted in one reorder request.
pub const MAX_REORDER_BATCH: usize = 10_000;

/// Busy timeout used for SQLite connections.
pub const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Default database file name.
pub const DEFAULT_DATABASE: &str = "todos.db";
