//! Query loaders
//!
//! Four strategies share one output contract and differ only in how many
//! statements they send to the store:
//!
//! | Strategy         | Round trips       |
//! |------------------|-------------------|
//! | `Naive`          | `1 + N`           |
//! | `Join`           | 1                 |
//! | `Batched`        | 2 (1 when `N=0`)  |
//! | `AggregateStats` | 1                 |
//!
//! `load_all` is the single entry point; it opens a counting `Session`,
//! dispatches on the closed `LoadStrategy` set and logs the outcome.

#![allow(clippy::result_large_err)]

pub mod batched;
pub mod join;
pub mod naive;
pub mod stats;

use crate::aggregation::ReviewAggregation;
use crate::assembler::book_from_row;
use crate::errors::Result;
use crate::session::Session;
use bookshelf_core::errors::{ExError, ExErrorKind};
use bookshelf_core::model::{Book, BookStats, BookWithReviews};
use bookshelf_core::log_load;
use rusqlite::Connection;
use serde::Serialize;
use std::time::Instant;

pub use batched::load_batched;
pub use join::load_join;
pub use naive::load_naive;
pub use stats::load_aggregate_stats;

const BOOKS_SQL: &str = "SELECT id, title, author FROM books ORDER BY id";

/// Fetch all books in id (insertion) order
pub(crate) fn fetch_books(session: &Session<'_>) -> Result<Vec<Book>> {
    session.query(BOOKS_SQL, [], book_from_row)
}

/// The loading strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoadStrategy {
    Naive,
    Join,
    Batched,
    AggregateStats,
}

impl LoadStrategy {
    pub const ALL: [LoadStrategy; 4] = [
        LoadStrategy::Naive,
        LoadStrategy::Join,
        LoadStrategy::Batched,
        LoadStrategy::AggregateStats,
    ];

    /// Strategies that return full review lists
    pub const REVIEW_LOADERS: [LoadStrategy; 3] = [
        LoadStrategy::Naive,
        LoadStrategy::Join,
        LoadStrategy::Batched,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            LoadStrategy::Naive => "naive",
            LoadStrategy::Join => "join",
            LoadStrategy::Batched => "batched",
            LoadStrategy::AggregateStats => "aggregate_stats",
        }
    }

    /// Operation name used in log events
    pub fn op(&self) -> &'static str {
        match self {
            LoadStrategy::Naive => "load_naive",
            LoadStrategy::Join => "load_join",
            LoadStrategy::Batched => "load_batched",
            LoadStrategy::AggregateStats => "load_aggregate_stats",
        }
    }
}

impl std::fmt::Display for LoadStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for LoadStrategy {
    type Err = ExError;

    fn from_str(s: &str) -> Result<Self> {
        LoadStrategy::ALL
            .into_iter()
            .find(|strategy| strategy.name() == s)
            .ok_or_else(|| {
                ExError::new(ExErrorKind::InvalidInput)
                    .with_op("parse_strategy")
                    .with_message(format!("unknown load strategy '{}'", s))
            })
    }
}

/// What a loader returned
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum LoadedBooks {
    Reviews(Vec<BookWithReviews>),
    Stats(Vec<BookStats>),
}

impl LoadedBooks {
    pub fn len(&self) -> usize {
        match self {
            LoadedBooks::Reviews(books) => books.len(),
            LoadedBooks::Stats(books) => books.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn into_reviews(self) -> Result<Vec<BookWithReviews>> {
        match self {
            LoadedBooks::Reviews(books) => Ok(books),
            LoadedBooks::Stats(_) => Err(shape_mismatch("reviews")),
        }
    }

    pub fn into_stats(self) -> Result<Vec<BookStats>> {
        match self {
            LoadedBooks::Stats(books) => Ok(books),
            LoadedBooks::Reviews(_) => Err(shape_mismatch("stats")),
        }
    }
}

fn shape_mismatch(wanted: &str) -> ExError {
    ExError::new(ExErrorKind::Internal)
        .with_op("load_all")
        .with_message(format!("loader did not return {}", wanted))
}

/// Result of one `load_all` call
#[derive(Debug, Clone, PartialEq)]
pub struct LoadOutcome {
    pub strategy: LoadStrategy,
    pub round_trips: usize,
    pub duration_ms: u64,
    pub data: LoadedBooks,
}

/// Run `strategy` against `conn`
///
/// `aggregation` only affects `LoadStrategy::Join`.
pub fn load_all(
    conn: &Connection,
    strategy: LoadStrategy,
    aggregation: ReviewAggregation,
) -> Result<LoadOutcome> {
    log_load!(start, strategy);
    let start = Instant::now();
    let session = Session::new(conn);

    let result = match strategy {
        LoadStrategy::Naive => load_naive(&session).map(LoadedBooks::Reviews),
        LoadStrategy::Join => load_join(&session, aggregation).map(LoadedBooks::Reviews),
        LoadStrategy::Batched => load_batched(&session).map(LoadedBooks::Reviews),
        LoadStrategy::AggregateStats => load_aggregate_stats(&session).map(LoadedBooks::Stats),
    };

    let elapsed = start.elapsed().as_millis() as u64;
    let round_trips = session.round_trips();
    match &result {
        Ok(data) => log_load!(
            end,
            strategy,
            duration_ms = elapsed,
            round_trips = round_trips,
            book_count = data.len()
        ),
        Err(e) => log_load!(
            error,
            strategy,
            e.clone(),
            duration_ms = elapsed,
            round_trips = round_trips
        ),
    }

    result.map(|data| LoadOutcome {
        strategy,
        round_trips,
        duration_ms: elapsed,
        data,
    })
}
