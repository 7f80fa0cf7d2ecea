//! Uniform shapes returned by every loader
//!
//! The three review loaders produce `BookWithReviews`; the aggregate loader
//! produces `BookStats`. Field names serialize in camelCase.

use serde::{Deserialize, Serialize};

use super::book::Book;
use super::review::Review;

/// A book together with all of its reviews
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookWithReviews {
    pub book_id: i64,
    pub title: String,
    pub author: String,
    pub reviews: Vec<Review>,
}

impl BookWithReviews {
    /// Attach a (possibly empty) review sequence to a book
    pub fn new(book: Book, reviews: Vec<Review>) -> Self {
        Self {
            book_id: book.id,
            title: book.title,
            author: book.author,
            reviews,
        }
    }

    /// Reviews in a canonical order, for comparisons that ignore fetch order
    pub fn sorted_reviews(&self) -> Vec<Review> {
        let mut reviews = self.reviews.clone();
        reviews.sort();
        reviews
    }
}

/// Server-side aggregate over a book's reviews
///
/// `average_rating` is `None` when the book has no reviews; "no reviews" is
/// not the same as an average of zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookStats {
    pub book_id: i64,
    pub title: String,
    pub author: String,
    pub average_rating: Option<f64>,
    pub review_count: u64,
}

impl BookStats {
    pub fn new(book: Book, average_rating: Option<f64>, review_count: u64) -> Self {
        Self {
            book_id: book.id,
            title: book.title,
            author: book.author,
            average_rating,
            review_count,
        }
    }
}
