//! # CLI Command Implementations
//!
//! This module contains the actual implementations of CLI commands.

use crate::api::{self, ApiSettings};
use crate::config::{BackendKind, Config};
use ordo_core::{Board, BoardCounts, Item, ItemId, MoveOutcome, OrdoError, Partition};
use std::io::{BufRead, Write};
use std::path::Path;

// =============================================================================
// OUTPUT HELPERS
// =============================================================================

fn print_json(value: &serde_json::Value) {
    println!("{}", serde_json::to_string_pretty(value).unwrap_or_default());
}

/// One display line for an item.
pub fn format_item(item: &Item) -> String {
    let mark = if item.completed { 'x' } else { ' ' };
    format!("[{}] {}  (#{})", mark, item.text, item.id)
}

/// Ask a yes/no question. Anything but `y` or `yes` is a no.
pub fn confirm_with<R: BufRead, W: Write>(
    reader: &mut R,
    writer: &mut W,
    prompt: &str,
) -> Result<bool, OrdoError> {
    write!(writer, "{} [y/N] ", prompt).map_err(|e| OrdoError::Io(e.to_string()))?;
    writer.flush().map_err(|e| OrdoError::Io(e.to_string()))?;

    let mut answer = String::new();
    reader
        .read_line(&mut answer)
        .map_err(|e| OrdoError::Io(format!("Cannot read answer: {}", e)))?;
    Ok(matches!(
        answer.trim().to_ascii_lowercase().as_str(),
        "y" | "yes"
    ))
}

/// What to print when a confirmation is declined.
pub fn cancelled_message(json_mode: bool) -> String {
    if json_mode {
        serde_json::json!({ "success": false, "cancelled": true }).to_string()
    } else {
        "Cancelled.".to_string()
    }
}

fn confirm(prompt: &str) -> Result<bool, OrdoError> {
    confirm_with(&mut std::io::stdin().lock(), &mut std::io::stdout(), prompt)
}

// =============================================================================
// SERVER COMMAND
// =============================================================================

/// Start the HTTP server.
pub async fn cmd_server(config: &Config) -> Result<(), OrdoError> {
    let board = config.open_board()?;

    println!("Ordo Server Starting...");
    println!();
    println!("Configuration:");
    println!("  Host:     {}", config.host);
    println!("  Port:     {}", config.port);
    println!("  Backend:  {}", config.backend.as_str());
    if config.backend == BackendKind::Sqlite {
        println!("  Database: {}", config.database.display());
    }
    println!();
    println!("Endpoints:");
    println!("  GET    /items               - List items");
    println!("  POST   /items               - Add an item");
    println!("  GET    /items/{{id}}          - Get an item");
    println!("  DELETE /items/{{id}}          - Delete an item");
    println!("  POST   /items/{{id}}/completed - Set completed");
    println!("  POST   /items/{{id}}/archive   - Archive");
    println!("  POST   /items/move          - Move one item");
    println!("  POST   /items/reorder       - Replace the order");
    println!("  GET    /status              - Item counts");
    println!("  GET    /health              - Health check");
    println!();
    println!("Press Ctrl+C to stop");
    println!();

    api::run_server(&config.bind_address(), board, ApiSettings::from(config)).await
}

// =============================================================================
// LIST COMMAND
// =============================================================================

/// Show active items, and archived ones on request.
pub fn cmd_list(config: &Config, json_mode: bool, show_archived: bool) -> Result<(), OrdoError> {
    let board = config.open_board()?;
    let partition = board.partition()?;

    if json_mode {
        let mut output = serde_json::json!({ "active": partition.active });
        if show_archived {
            output["archived"] = serde_json::json!(partition.archived);
        }
        print_json(&output);
        return Ok(());
    }

    print!("{}", render_partition(&partition, show_archived));
    Ok(())
}

/// Text rendering of a listing.
pub fn render_partition(partition: &Partition, show_archived: bool) -> String {
    let mut out = String::new();
    if partition.active.is_empty() {
        out.push_str("No active items.\n");
    }
    for (rank, item) in partition.active.iter().enumerate() {
        out.push_str(&format!("{:>3}. {}\n", rank, format_item(item)));
    }

    if show_archived {
        out.push_str("\nArchived:\n");
        if partition.archived.is_empty() {
            out.push_str("  (none)\n");
        }
        for item in &partition.archived {
            out.push_str(&format!("     {}\n", format_item(item)));
        }
    }
    out
}

// =============================================================================
// ITEM COMMANDS
// =============================================================================

/// Add an item.
pub fn cmd_add(config: &Config, json_mode: bool, text: &str) -> Result<(), OrdoError> {
    let mut board = config.open_board()?;
    let item = board.add(text)?;

    if json_mode {
        print_json(&serde_json::json!({ "success": true, "item": item }));
    } else {
        println!("Added {}", format_item(&item));
    }
    Ok(())
}

/// Set or clear the completed flag.
pub fn cmd_set_completed(
    config: &Config,
    json_mode: bool,
    id: i64,
    completed: bool,
) -> Result<(), OrdoError> {
    let mut board = config.open_board()?;
    let id = ItemId(id);
    board.get(id)?;
    board.set_completed(id, completed)?;
    let item = board.get(id)?;

    if json_mode {
        print_json(&serde_json::json!({ "success": true, "item": item }));
    } else {
        println!("{}", format_item(&item));
    }
    Ok(())
}

/// Archive a completed item after confirmation.
pub fn cmd_archive(config: &Config, json_mode: bool, id: i64, yes: bool) -> Result<(), OrdoError> {
    let mut board = config.open_board()?;
    let item = board.get(ItemId(id))?;

    if !item.completed {
        return Err(OrdoError::Validation(format!(
            "Item #{} is not completed; only completed items can be archived",
            item.id
        )));
    }
    if !yes && !confirm(&format!("Archive \"{}\"?", item.text))? {
        println!("{}", cancelled_message(json_mode));
        return Ok(());
    }

    board.archive(item.id)?;
    if json_mode {
        print_json(&serde_json::json!({ "success": true, "archived": item.id }));
    } else {
        println!("Archived #{}", item.id);
    }
    Ok(())
}

/// Delete an item after confirmation.
pub fn cmd_delete(config: &Config, json_mode: bool, id: i64, yes: bool) -> Result<(), OrdoError> {
    let mut board = config.open_board()?;
    let item = board.get(ItemId(id))?;

    if !yes && !confirm(&format!("Delete \"{}\"?", item.text))? {
        println!("{}", cancelled_message(json_mode));
        return Ok(());
    }

    board.delete(item.id)?;
    if json_mode {
        print_json(&serde_json::json!({ "success": true, "deleted": item.id }));
    } else {
        println!("Deleted #{}", item.id);
    }
    Ok(())
}

/// Move an active item to a new position.
pub fn cmd_move(config: &Config, json_mode: bool, id: i64, to: usize) -> Result<(), OrdoError> {
    let mut board = config.open_board()?;
    let item = board.get(ItemId(id))?;
    if item.archived {
        return Err(OrdoError::Validation(format!(
            "Item #{} is archived; only active items can be moved",
            item.id
        )));
    }

    let (list, outcome) = board.move_item(item.id, to);
    let outcome = outcome?;

    if json_mode {
        print_json(&serde_json::json!({
            "success": true,
            "applied": outcome.is_applied(),
            "active": list.items(),
        }));
        return Ok(());
    }

    if outcome == MoveOutcome::Skipped {
        println!("Already in place.");
    }
    print!(
        "{}",
        render_partition(
            &Partition {
                active: list.items().to_vec(),
                archived: Vec::new(),
            },
            false,
        )
    );
    Ok(())
}

// =============================================================================
// STATUS COMMAND
// =============================================================================

/// Show item counts.
pub fn cmd_status(config: &Config, json_mode: bool) -> Result<(), OrdoError> {
    let board = config.open_board()?;
    let counts: BoardCounts = board.counts()?;

    if json_mode {
        print_json(&serde_json::json!({
            "database": config.database.to_string_lossy(),
            "backend": config.backend.as_str(),
            "active": counts.active,
            "incomplete": counts.incomplete,
            "completed": counts.completed,
            "archived": counts.archived,
            "total": counts.total(),
        }));
        return Ok(());
    }

    println!("Ordo Status");
    println!("===========");
    println!("Database:   {}", config.database.display());
    println!("Backend:    {}", config.backend.as_str());
    println!();
    println!("Active:     {}", counts.active);
    println!("  To do:    {}", counts.incomplete);
    println!("  Done:     {}", counts.completed);
    println!("Archived:   {}", counts.archived);
    println!("Total:      {}", counts.total());
    Ok(())
}

// =============================================================================
// INIT COMMAND
// =============================================================================

/// Create the database file, or migrate an existing one in place.
pub fn cmd_init(config: &Config, force: bool) -> Result<(), OrdoError> {
    if config.backend == BackendKind::Memory {
        return Err(OrdoError::Validation(
            "init needs the sqlite backend".to_string(),
        ));
    }

    let path = config.database.as_path();
    let existed = path.exists();
    if existed && force {
        remove_database(path)?;
    }

    let board = Board::with_sqlite(path)?;
    let counts = board.counts()?;
    if existed && !force {
        println!(
            "Database at {} is up to date ({} items)",
            path.display(),
            counts.total()
        );
    } else {
        println!("Initialized new database at {}", path.display());
    }
    Ok(())
}

/// Remove a database file and its WAL side files.
fn remove_database(path: &Path) -> Result<(), OrdoError> {
    std::fs::remove_file(path)
        .map_err(|e| OrdoError::Io(format!("Cannot remove {}: {}", path.display(), e)))?;

    for suffix in ["-wal", "-shm"] {
        let mut side = path.as_os_str().to_owned();
        side.push(suffix);
        let side = Path::new(&side);
        if side.exists() {
            std::fs::remove_file(side)
                .map_err(|e| OrdoError::Io(format!("Cannot remove {}: {}", side.display(), e)))?;
        }
    }
    tracing::info!("Removed existing database at {}", path.display());
    Ok(())
}

// =============================================================================
// TESTS
// =============================================================================
