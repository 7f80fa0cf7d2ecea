//! Join-aggregate loader
//!
//! A single `books LEFT JOIN reviews ... GROUP BY` statement; the store folds
//! each book's reviews into one row and `ReviewAggregation` decodes them.

#![allow(clippy::result_large_err)]

use crate::aggregation::ReviewAggregation;
use crate::errors::Result;
use crate::session::Session;
use bookshelf_core::model::BookWithReviews;

/// Load every book with its reviews in one round trip
pub fn load_join(
    session: &Session<'_>,
    aggregation: ReviewAggregation,
) -> Result<Vec<BookWithReviews>> {
    let rows = session.query(aggregation.sql(), [], |row| aggregation.map_row(row))?;

    rows.into_iter()
        .map(|row| {
            let reviews = row.payload.decode(row.book.id)?;
            Ok(BookWithReviews::new(row.book, reviews))
        })
        .collect()
}
