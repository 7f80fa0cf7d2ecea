//! Result assembler
//!
//! Turns raw rows into the uniform `BookWithReviews` / `BookStats` shapes.
//! A NULL comment from the store is normalized to the empty string here.

#![allow(clippy::result_large_err)]

use crate::errors::Result;
use bookshelf_core::errors::{BookshelfError, ExError};
use bookshelf_core::model::{Book, BookStats, BookWithReviews, Rating, Review};
use rusqlite::Row;
use std::collections::HashMap;

/// One `reviews` row as fetched by the naive and batched loaders
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewRow {
    pub book_id: i64,
    pub rating: i64,
    pub comment: Option<String>,
}

impl ReviewRow {
    /// Map `book_id, rating, comment`
    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            book_id: row.get(0)?,
            rating: row.get(1)?,
            comment: row.get(2)?,
        })
    }
}

/// One row of the aggregate-stats query
#[derive(Debug, Clone, PartialEq)]
pub struct StatsRow {
    pub book: Book,
    pub average_rating: Option<f64>,
    pub review_count: i64,
}

/// Map the leading `id, title, author` columns
pub(crate) fn book_from_row(row: &Row<'_>) -> rusqlite::Result<Book> {
    Ok(Book::new(row.get(0)?, row.get::<_, String>(1)?, row.get::<_, String>(2)?))
}

/// Build one review, checking the rating domain
pub fn review_from_parts(book_id: i64, rating: i64, comment: Option<String>) -> Result<Review> {
    let rating = Rating::try_from(rating).map_err(|e| ExError::from(e).with_book_id(book_id))?;
    Ok(Review::new(rating, comment.unwrap_or_default()))
}

/// Convert rows that already belong to one book
pub fn reviews_from_rows(rows: Vec<ReviewRow>) -> Result<Vec<Review>> {
    rows.into_iter()
        .map(|row| review_from_parts(row.book_id, row.rating, row.comment))
        .collect()
}

/// Group review rows under their books, preserving book order
///
/// Every fetched book starts with an empty group, so books without reviews
/// come back with an empty sequence rather than going missing.
pub fn group_reviews(books: Vec<Book>, rows: Vec<ReviewRow>) -> Result<Vec<BookWithReviews>> {
    let mut groups: HashMap<i64, Vec<Review>> =
        books.iter().map(|book| (book.id, Vec::new())).collect();

    for row in rows {
        let book_id = row.book_id;
        let review = review_from_parts(book_id, row.rating, row.comment)?;
        groups
            .get_mut(&book_id)
            .ok_or(BookshelfError::UnknownBook { book_id })?
            .push(review);
    }

    Ok(books
        .into_iter()
        .map(|book| {
            let reviews = groups.remove(&book.id).unwrap_or_default();
            BookWithReviews::new(book, reviews)
        })
        .collect())
}

/// Convert one aggregate row; an absent average stays absent
pub fn stats_from_row(row: StatsRow) -> Result<BookStats> {
    let book_id = row.book.id;
    let review_count = u64::try_from(row.review_count).map_err(|_| {
        ExError::new(bookshelf_core::ExErrorKind::Internal)
            .with_op("assemble_stats")
            .with_book_id(book_id)
            .with_message(format!("negative review count {}", row.review_count))
    })?;

    Ok(BookStats::new(row.book, row.average_rating, review_count))
}
