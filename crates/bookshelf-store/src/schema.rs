//! Schema manager
//!
//! Drops and recreates the `books` / `reviews` relations plus the
//! `reviews(book_id)` index. Destructive by nature; seeding runs `reset`
//! inside its insert transaction.

#![allow(clippy::result_large_err)]

use crate::errors::{from_rusqlite, integrity_violation, schema_error, Result};
use rusqlite::Connection;
use serde::Serialize;

const RESET_SQL: &str = include_str!("../schema/000_reset.sql");
const CREATE_SQL: &str = include_str!("../schema/001_books_reviews.sql");

/// Drop any existing tables (children first) and create fresh ones
///
/// Runs on whatever transaction `conn` is in; SQLite DDL is transactional,
/// so the caller decides what a failure rolls back to.
pub fn reset(conn: &Connection) -> Result<()> {
    conn.execute_batch(RESET_SQL)
        .map_err(|e| schema_error("drop", e))?;
    conn.execute_batch(CREATE_SQL)
        .map_err(|e| schema_error("create", e))?;
    Ok(())
}

/// Reset the schema in a transaction of its own
pub fn initialize(conn: &mut Connection) -> Result<()> {
    let tx = conn.transaction().map_err(from_rusqlite)?;
    reset(&tx)?;
    tx.commit().map_err(|e| schema_error("commit", e))?;
    Ok(())
}

/// Row counts of both relations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TableCounts {
    pub books: u64,
    pub reviews: u64,
}

/// Count rows in `books` and `reviews`
pub fn table_counts(conn: &Connection) -> Result<TableCounts> {
    let (books, reviews): (i64, i64) = conn
        .query_row(
            "SELECT (SELECT COUNT(*) FROM books), (SELECT COUNT(*) FROM reviews)",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .map_err(from_rusqlite)?;

    Ok(TableCounts {
        books: books.max(0) as u64,
        reviews: reviews.max(0) as u64,
    })
}

/// Fail if any review references a missing book
pub fn check_integrity(conn: &Connection) -> Result<()> {
    let mut stmt = conn
        .prepare("PRAGMA foreign_key_check(reviews)")
        .map_err(from_rusqlite)?;
    let orphans = stmt
        .query_map([], |row| row.get::<_, i64>(1))
        .map_err(from_rusqlite)?
        .count();

    if orphans > 0 {
        return Err(integrity_violation(orphans));
    }
    Ok(())
}
