//! Aggregate-stats loader
//!
//! The store computes `AVG(rating)` and `COUNT(review)` per book. AVG over an
//! empty group is NULL and is surfaced as an absent average, not zero.

#![allow(clippy::result_large_err)]

use crate::assembler::{book_from_row, stats_from_row, StatsRow};
use crate::errors::Result;
use crate::session::Session;
use bookshelf_core::model::BookStats;

const STATS_SQL: &str = "SELECT b.id, b.title, b.author,
        AVG(r.rating) AS average_rating,
        COUNT(r.id) AS review_count
    FROM books b
    LEFT JOIN reviews r ON r.book_id = b.id
    GROUP BY b.id
    ORDER BY b.id";

/// Load per-book rating statistics in one round trip
pub fn load_aggregate_stats(session: &Session<'_>) -> Result<Vec<BookStats>> {
    let rows = session.query(STATS_SQL, [], |row| {
        Ok(StatsRow {
            book: book_from_row(row)?,
            average_rating: row.get(3)?,
            review_count: row.get(4)?,
        })
    })?;

    rows.into_iter().map(stats_from_row).collect()
}
