//! Fixture seeder
//!
//! Rebuilds the schema and inserts a deterministic dataset. Every value is a
//! function of the book ordinal `i` and review ordinal `j` (both 1-based), so
//! repeated seeds produce byte-identical tables and every loader can be
//! checked against the same ground truth.

#![allow(clippy::result_large_err)]

use crate::errors::{from_rusqlite, Result};
use crate::schema::{reset, table_counts, TableCounts};
use bookshelf_core::model::Rating;
use bookshelf_core::{log_op_end, log_op_error, log_op_start};
use rusqlite::Connection;
use serde::Serialize;
use std::time::Instant;

pub const DEFAULT_BOOKS: usize = 200;
pub const DEFAULT_REVIEWS_PER_BOOK: usize = 5;

/// Books sharing one author in the default fixture
const BOOKS_PER_AUTHOR: usize = 10;

/// Size of the generated fixture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixtureSpec {
    pub books: usize,
    pub reviews_per_book: usize,
}

impl Default for FixtureSpec {
    fn default() -> Self {
        Self {
            books: DEFAULT_BOOKS,
            reviews_per_book: DEFAULT_REVIEWS_PER_BOOK,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixtureReview {
    pub rating: Rating,
    pub comment: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixtureBook {
    pub title: String,
    pub author: String,
    pub reviews: Vec<FixtureReview>,
}

/// A complete dataset, inserted in order
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Fixture {
    pub books: Vec<FixtureBook>,
}

impl Fixture {
    /// Derive the deterministic dataset for `spec`
    pub fn generate(spec: FixtureSpec) -> Self {
        let books = (1..=spec.books)
            .map(|i| FixtureBook {
                title: format!("Book {}", i),
                author: format!("Author {}", i.div_ceil(BOOKS_PER_AUTHOR)),
                reviews: (1..=spec.reviews_per_book)
                    .map(|j| FixtureReview {
                        rating: Rating::folded((i + j) as u64),
                        comment: format!("Review {} for book {}", j, i),
                    })
                    .collect(),
            })
            .collect();

        Self { books }
    }

    pub fn book_count(&self) -> usize {
        self.books.len()
    }

    pub fn review_count(&self) -> usize {
        self.books.iter().map(|b| b.reviews.len()).sum()
    }
}

/// Row counts observed after a successful seed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SeedReport {
    pub books: u64,
    pub reviews: u64,
}

impl From<TableCounts> for SeedReport {
    fn from(counts: TableCounts) -> Self {
        Self {
            books: counts.books,
            reviews: counts.reviews,
        }
    }
}

/// Recreate the schema and insert the default-shaped fixture for `spec`
pub fn seed(conn: &mut Connection, spec: FixtureSpec) -> Result<SeedReport> {
    seed_fixture(conn, &Fixture::generate(spec))
}

/// Recreate the schema and insert `fixture` atomically
///
/// The schema reset and every insert share one transaction. If any step
/// fails the transaction is rolled back and the previous dataset, if any,
/// is left exactly as it was.
pub fn seed_fixture(conn: &mut Connection, fixture: &Fixture) -> Result<SeedReport> {
    log_op_start!(
        "seed",
        book_count = fixture.book_count() as u64,
        review_count = fixture.review_count() as u64
    );
    let start = Instant::now();

    let result = (|| -> Result<SeedReport> {
        // Dropping an uncommitted transaction rolls it back
        let tx = conn.transaction().map_err(from_rusqlite)?;
        reset(&tx)?;
        insert_fixture(&tx, fixture)?;
        let counts = table_counts(&tx)?;
        tx.commit().map_err(from_rusqlite)?;
        Ok(counts.into())
    })();

    let elapsed = start.elapsed().as_millis() as u64;
    match &result {
        Ok(report) => log_op_end!(
            "seed",
            duration_ms = elapsed,
            book_count = report.books,
            review_count = report.reviews
        ),
        Err(e) => log_op_error!("seed", e.clone(), duration_ms = elapsed),
    }
    result
}

fn insert_fixture(conn: &Connection, fixture: &Fixture) -> Result<()> {
    let mut insert_book = conn
        .prepare("INSERT INTO books (title, author) VALUES (?1, ?2)")
        .map_err(from_rusqlite)?;
    let mut insert_review = conn
        .prepare("INSERT INTO reviews (book_id, rating, comment) VALUES (?1, ?2, ?3)")
        .map_err(from_rusqlite)?;

    for book in &fixture.books {
        let book_id = insert_book
            .insert(rusqlite::params![book.title, book.author])
            .map_err(from_rusqlite)?;

        for review in &book.reviews {
            insert_review
                .execute(rusqlite::params![
                    book_id,
                    i64::from(review.rating),
                    review.comment
                ])
                .map_err(from_rusqlite)?;
        }
    }

    Ok(())
}
