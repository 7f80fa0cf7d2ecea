//! Per-book review aggregation for the join loader
//!
//! The join loader fetches every book and its reviews in one statement by
//! letting the store fold each book's reviews into a single column. How the
//! reviews are folded, and how they are decoded again, is chosen here:
//!
//! - `Delimited`: `GROUP_CONCAT` of ratings and of comments as two separate
//!   comma-joined strings, re-zipped by position after splitting.
//! - `Json`: `json_group_array(json_object(...))`, one structured array.
//!
//! # Delimiter hazard
//!
//! `Delimited` cannot tell a comma inside a comment from the separator. A
//! comment containing `,` splits into extra tokens, shifting every later
//! comment against its rating. The decoder notices the token counts differ
//! and fails with `AggregationParse` for that book; it never truncates or
//! pads. `Json` has no such hazard and is a drop-in replacement.

#![allow(clippy::result_large_err)]

use crate::assembler::{book_from_row, review_from_parts};
use crate::errors::Result;
use bookshelf_core::errors::BookshelfError;
use bookshelf_core::model::{Book, Review};
use rusqlite::Row;
use serde::Deserialize;

/// Separator used by `GROUP_CONCAT` in the delimited form
pub const DELIMITER: char = ',';

// Each aggregate orders its own input by review id; ratings and comments are
// folded in the same order so positions always agree. COALESCE keeps a NULL
// comment from being skipped, which would shift them.
const DELIMITED_SQL: &str = "SELECT b.id, b.title, b.author,
        GROUP_CONCAT(r.rating, ',' ORDER BY r.id) AS ratings,
        GROUP_CONCAT(COALESCE(r.comment, ''), ',' ORDER BY r.id) AS comments
    FROM books b
    LEFT JOIN reviews r ON r.book_id = b.id
    GROUP BY b.id
    ORDER BY b.id";

const JSON_SQL: &str = "SELECT b.id, b.title, b.author,
        json_group_array(json_object('rating', r.rating, 'comment', r.comment) ORDER BY r.id)
            FILTER (WHERE r.id IS NOT NULL) AS reviews
    FROM books b
    LEFT JOIN reviews r ON r.book_id = b.id
    GROUP BY b.id
    ORDER BY b.id";

/// How the join loader folds reviews into one row per book
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReviewAggregation {
    #[default]
    Delimited,
    Json,
}

impl ReviewAggregation {
    pub fn name(&self) -> &'static str {
        match self {
            ReviewAggregation::Delimited => "delimited",
            ReviewAggregation::Json => "json",
        }
    }

    pub(crate) fn sql(&self) -> &'static str {
        match self {
            ReviewAggregation::Delimited => DELIMITED_SQL,
            ReviewAggregation::Json => JSON_SQL,
        }
    }

    pub(crate) fn map_row(&self, row: &Row<'_>) -> rusqlite::Result<AggregatedRow> {
        let book = book_from_row(row)?;
        let payload = match self {
            ReviewAggregation::Delimited => AggregatePayload::Delimited {
                ratings: row.get(3)?,
                comments: row.get(4)?,
            },
            ReviewAggregation::Json => AggregatePayload::Json(row.get(3)?),
        };
        Ok(AggregatedRow { book, payload })
    }
}

impl std::fmt::Display for ReviewAggregation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// The folded review column(s) of one book
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AggregatePayload {
    Delimited {
        ratings: Option<String>,
        comments: Option<String>,
    },
    Json(Option<String>),
}

impl AggregatePayload {
    /// Reconstruct the book's reviews
    pub fn decode(&self, book_id: i64) -> Result<Vec<Review>> {
        match self {
            AggregatePayload::Delimited { ratings, comments } => {
                split_delimited(book_id, ratings.as_deref(), comments.as_deref())
            }
            AggregatePayload::Json(json) => decode_json(book_id, json.as_deref()),
        }
    }
}

/// One row of the join query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregatedRow {
    pub book: Book,
    pub payload: AggregatePayload,
}

/// Split both concatenations and re-zip them by position
///
/// NULL ratings means the LEFT JOIN found no review for the book, which
/// yields an empty sequence rather than one placeholder entry.
pub fn split_delimited(
    book_id: i64,
    ratings: Option<&str>,
    comments: Option<&str>,
) -> Result<Vec<Review>> {
    let Some(ratings) = ratings else {
        return Ok(Vec::new());
    };

    let rating_tokens: Vec<&str> = ratings.split(DELIMITER).collect();
    let comment_tokens: Vec<&str> = comments
        .map(|c| c.split(DELIMITER).collect())
        .unwrap_or_default();

    if rating_tokens.len() != comment_tokens.len() {
        return Err(BookshelfError::AggregateCountMismatch {
            book_id,
            ratings: rating_tokens.len(),
            comments: comment_tokens.len(),
        }
        .into());
    }

    rating_tokens
        .into_iter()
        .zip(comment_tokens)
        .map(|(rating, comment)| {
            let value: i64 =
                rating
                    .trim()
                    .parse()
                    .map_err(|_| BookshelfError::AggregateToken {
                        book_id,
                        token: rating.to_string(),
                    })?;
            review_from_parts(book_id, value, Some(comment.to_string()))
        })
        .collect()
}

#[derive(Deserialize)]
struct JsonReview {
    rating: i64,
    comment: Option<String>,
}

/// Decode the `json_group_array` column
pub fn decode_json(book_id: i64, json: Option<&str>) -> Result<Vec<Review>> {
    let Some(json) = json else {
        return Ok(Vec::new());
    };

    let items: Vec<JsonReview> =
        serde_json::from_str(json).map_err(|e| BookshelfError::AggregateJson {
            book_id,
            reason: e.to_string(),
        })?;

    items
        .into_iter()
        .map(|item| review_from_parts(book_id, item.rating, item.comment))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use bookshelf_core::ExErrorKind;

    fn ratings_of(reviews: &[Review]) -> Vec<u8> {
        reviews.iter().map(|r| r.rating.value()).collect()
    }

    #[test]
    fn test_split_rezips_by_position() {
        let reviews = split_delimited(1, Some("2,4,5"), Some("a,b,c")).unwrap();
        assert_eq!(ratings_of(&reviews), vec![2, 4, 5]);
        assert_eq!(reviews[1].comment, "b");
    }

    #[test]
    fn test_split_null_ratings_is_empty() {
        assert!(split_delimited(1, None, None).unwrap().is_empty());
    }

    #[test]
    fn test_split_keeps_empty_comments() {
        let reviews = split_delimited(1, Some("3,1"), Some(",")).unwrap();
        assert_eq!(reviews.len(), 2);
        assert!(reviews.iter().all(|r| r.comment.is_empty()));

        let single = split_delimited(1, Some("3"), Some("")).unwrap();
        assert_eq!(single.len(), 1);
    }

    #[test]
    fn test_comment_with_delimiter_is_count_mismatch() {
        let err = split_delimited(8, Some("5,3"), Some("great, really,meh")).unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::AggregationParse);
        assert_eq!(err.book_id(), Some(8));
    }

    #[test]
    fn test_bad_rating_token() {
        let err = split_delimited(2, Some("x"), Some("c")).unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::AggregationParse);
    }

    #[test]
    fn test_decode_json() {
        let json = r#"[{"rating":4,"comment":"fine, really"},{"rating":1,"comment":null}]"#;
        let reviews = decode_json(3, Some(json)).unwrap();
        assert_eq!(ratings_of(&reviews), vec![4, 1]);
        assert_eq!(reviews[0].comment, "fine, really");
        assert_eq!(reviews[1].comment, "");
    }

    #[test]
    fn test_decode_json_empty_array() {
        assert!(decode_json(3, Some("[]")).unwrap().is_empty());
    }

    #[test]
    fn test_decode_json_garbage() {
        let err = decode_json(3, Some("not json")).unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::AggregationParse);
    }

    #[test]
    fn test_payload_dispatch() {
        let payload = AggregatePayload::Delimited {
            ratings: Some("1".into()),
            comments: Some("x".into()),
        };
        assert_eq!(payload.decode(1).unwrap().len(), 1);
        assert!(AggregatePayload::Json(None).decode(1).unwrap().is_empty());
    }
}
