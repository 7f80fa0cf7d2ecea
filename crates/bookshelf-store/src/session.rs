//! Round-trip accounting
//!
//! Loaders never touch the connection directly; every statement goes through
//! `Session::query`, which counts one round trip per executed statement.

#![allow(clippy::result_large_err)]

use crate::errors::{from_rusqlite, Result};
use rusqlite::{Connection, Params, Row};
use std::cell::Cell;

/// A connection borrowed for one logical read operation
pub struct Session<'c> {
    conn: &'c Connection,
    round_trips: Cell<usize>,
}

impl<'c> Session<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self {
            conn,
            round_trips: Cell::new(0),
        }
    }

    /// Statements executed so far
    pub fn round_trips(&self) -> usize {
        self.round_trips.get()
    }

    /// Execute one statement and map every returned row
    pub fn query<T, P, F>(&self, sql: &str, params: P, f: F) -> Result<Vec<T>>
    where
        P: Params,
        F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
    {
        self.round_trips.set(self.round_trips.get() + 1);

        let mut stmt = self.conn.prepare_cached(sql).map_err(from_rusqlite)?;
        let rows = stmt
            .query_map(params, f)
            .map_err(from_rusqlite)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(from_rusqlite)?;

        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_each_query_counts_once() {
        let conn = Connection::open_in_memory().unwrap();
        let session = Session::new(&conn);
        assert_eq!(session.round_trips(), 0);

        let one: Vec<i64> = session.query("SELECT 1", [], |row| row.get(0)).unwrap();
        assert_eq!(one, vec![1]);
        session
            .query("SELECT ?1", [2i64], |row| row.get::<_, i64>(0))
            .unwrap();
        assert_eq!(session.round_trips(), 2);
    }

    #[test]
    fn test_failed_statement_still_counts() {
        let conn = Connection::open_in_memory().unwrap();
        let session = Session::new(&conn);
        let result = session.query("SELECT * FROM missing_table", [], |row| {
            row.get::<_, i64>(0)
        });
        assert!(result.is_err());
        assert_eq!(session.round_trips(), 1);
    }
}
