use anyhow::{Context, Result};
use rusqlite::Connection;
use std::path::Path;
use tracing::{debug, info};

use crate::models::Draw;

/// Records written per transaction during bulk operations.
pub const IMPORT_BATCH_SIZE: usize = 100;
/// Upper bound on a single listing.
pub const MAX_LIST: u32 = 5000;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS draws (
    draw_number  INTEGER PRIMARY KEY,
    draw_date    TEXT NOT NULL,
    n1           INTEGER NOT NULL,
    n2           INTEGER NOT NULL,
    n3           INTEGER NOT NULL,
    n4           INTEGER NOT NULL,
    n5           INTEGER NOT NULL,
    n6           INTEGER NOT NULL
);
";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DrawOrder {
    #[default]
    NumberDesc,
    NumberAsc,
    DateAsc,
}

impl DrawOrder {
    fn sql(&self) -> &'static str {
        match self {
            DrawOrder::NumberDesc => "draw_number DESC",
            DrawOrder::NumberAsc => "draw_number ASC",
            DrawOrder::DateAsc => "draw_date ASC, draw_number ASC",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BulkResult {
    pub inserted: u32,
    pub skipped: u32,
}

pub fn db_path() -> std::path::PathBuf {
    let mut path = std::env::current_dir().unwrap_or_default();
    path.push("data");
    path.push("megasena.db");
    path
}

pub fn open_db(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Cannot create directory {:?}", parent))?;
    }
    let conn = Connection::open(path)
        .with_context(|| format!("Cannot open database {:?}", path))?;
    debug!(path = %path.display(), "database opened");
    Ok(conn)
}

pub fn migrate(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA)
        .context("Migration failed")?;
    Ok(())
}

pub fn insert_draw(conn: &Connection, draw: &Draw) -> Result<bool> {
    let n = &draw.numbers;
    let changed = conn.execute(
        "INSERT OR IGNORE INTO draws (draw_number, draw_date, n1, n2, n3, n4, n5, n6)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        rusqlite::params![
            draw.draw_number,
            draw.draw_date,
            n[0],
            n[1],
            n[2],
            n[3],
            n[4],
            n[5],
        ],
    ).with_context(|| format!("Insert of draw {} failed", draw.draw_number))?;
    Ok(changed > 0)
}

/// Inserts draws in sequential batches of [`IMPORT_BATCH_SIZE`], one transaction per batch.
/// Draw numbers already present are left untouched and counted as skipped.
pub fn bulk_create(conn: &Connection, draws: &[Draw]) -> Result<BulkResult> {
    let mut result = BulkResult::default();

    for (i, batch) in draws.chunks(IMPORT_BATCH_SIZE).enumerate() {
        let tx = conn.unchecked_transaction()
            .context("Cannot start transaction")?;
        for draw in batch {
            if insert_draw(&tx, draw)? {
                result.inserted += 1;
            } else {
                result.skipped += 1;
            }
        }
        tx.commit().context("Commit failed")?;
        debug!(batch = i + 1, size = batch.len(), "batch committed");
    }

    info!(inserted = result.inserted, skipped = result.skipped, "bulk create done");
    Ok(result)
}

pub fn list_draws(conn: &Connection, order: DrawOrder, limit: u32) -> Result<Vec<Draw>> {
    let sql = format!(
        "SELECT draw_number, draw_date, n1, n2, n3, n4, n5, n6
         FROM draws ORDER BY {} LIMIT ?1",
        order.sql()
    );
    let mut stmt = conn.prepare(&sql)?;
    let draws = stmt.query_map([limit.min(MAX_LIST)], |row| {
        Ok(Draw {
            draw_number: row.get(0)?,
            draw_date: row.get(1)?,
            numbers: [
                row.get::<_, u8>(2)?,
                row.get::<_, u8>(3)?,
                row.get::<_, u8>(4)?,
                row.get::<_, u8>(5)?,
                row.get::<_, u8>(6)?,
                row.get::<_, u8>(7)?,
            ],
        })
    })?.collect::<Result<Vec<_>, _>>()?;
    Ok(draws)
}

pub fn delete_draw(conn: &Connection, draw_number: u32) -> Result<bool> {
    let changed = conn.execute("DELETE FROM draws WHERE draw_number = ?1", [draw_number])
        .with_context(|| format!("Delete of draw {} failed", draw_number))?;
    Ok(changed > 0)
}

/// Removes every draw, record by record, in batches of [`IMPORT_BATCH_SIZE`].
pub fn delete_all(conn: &Connection) -> Result<u32> {
    let mut stmt = conn.prepare("SELECT draw_number FROM draws ORDER BY draw_number")?;
    let numbers = stmt.query_map([], |row| row.get::<_, u32>(0))?
        .collect::<Result<Vec<_>, _>>()?;

    let mut deleted = 0;
    for batch in numbers.chunks(IMPORT_BATCH_SIZE) {
        let tx = conn.unchecked_transaction()
            .context("Cannot start transaction")?;
        for &n in batch {
            if delete_draw(&tx, n)? {
                deleted += 1;
            }
        }
        tx.commit().context("Commit failed")?;
    }

    info!(deleted, "draws cleared");
    Ok(deleted)
}

pub fn count_draws(conn: &Connection) -> Result<u32> {
    let count: u32 = conn.query_row("SELECT COUNT(*) FROM draws", [], |row| row.get(0))?;
    Ok(count)
}
