//! Strategy equivalence
//!
//! Two review loaders agree when they return the same books in the same
//! order and, per book, the same multiset of reviews. Review order inside a
//! book is not part of the contract.

use crate::loaders::LoadStrategy;
use bookshelf_core::model::{BookWithReviews, Review};
use serde::Serialize;

/// Per-strategy measurements from a comparison run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StrategyRun {
    pub strategy: String,
    pub round_trips: usize,
    pub duration_ms: u64,
    pub book_count: usize,
}

/// Outcome of running every review loader against the same data
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Comparison {
    pub runs: Vec<StrategyRun>,
    pub equivalent: bool,
    /// Strategies that disagree with the naive baseline, with the first
    /// diverging book id (`None` when the book lists differ in length)
    pub mismatches: Vec<Mismatch>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Mismatch {
    pub strategy: String,
    pub book_id: Option<i64>,
}

fn canonical(book: &BookWithReviews) -> (i64, &str, &str, Vec<Review>) {
    (
        book.book_id,
        book.title.as_str(),
        book.author.as_str(),
        book.sorted_reviews(),
    )
}

/// First book where `candidate` disagrees with `baseline`
///
/// Returns `Some(None)` when the lists have different lengths.
pub fn first_divergence(
    baseline: &[BookWithReviews],
    candidate: &[BookWithReviews],
) -> Option<Option<i64>> {
    if baseline.len() != candidate.len() {
        return Some(None);
    }
    baseline
        .iter()
        .zip(candidate)
        .find(|(a, b)| canonical(a) != canonical(b))
        .map(|(a, _)| Some(a.book_id))
}

/// Whether two loader outputs are equivalent
pub fn shelves_equivalent(a: &[BookWithReviews], b: &[BookWithReviews]) -> bool {
    first_divergence(a, b).is_none()
}

/// Compare every candidate against `baseline`
pub(crate) fn build_comparison(
    baseline: &[BookWithReviews],
    candidates: &[(LoadStrategy, Vec<BookWithReviews>)],
    runs: Vec<StrategyRun>,
) -> Comparison {
    let mismatches: Vec<Mismatch> = candidates
        .iter()
        .filter_map(|(strategy, shelf)| {
            first_divergence(baseline, shelf).map(|book_id| Mismatch {
                strategy: strategy.name().to_string(),
                book_id,
            })
        })
        .collect();

    Comparison {
        runs,
        equivalent: mismatches.is_empty(),
        mismatches,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bookshelf_core::model::{Book, Rating};

    fn shelf(reviews: &[(u64, &str)]) -> Vec<BookWithReviews> {
        vec![BookWithReviews::new(
            Book::new(1, "Book 1", "Author 1"),
            reviews
                .iter()
                .map(|(n, c)| Review::new(Rating::folded(*n), *c))
                .collect(),
        )]
    }

    #[test]
    fn test_review_order_is_ignored() {
        let a = shelf(&[(0, "x"), (1, "y")]);
        let b = shelf(&[(1, "y"), (0, "x")]);
        assert!(shelves_equivalent(&a, &b));
    }

    #[test]
    fn test_divergent_review_detected() {
        let a = shelf(&[(0, "x")]);
        let b = shelf(&[(0, "z")]);
        assert_eq!(first_divergence(&a, &b), Some(Some(1)));
    }

    #[test]
    fn test_length_mismatch_detected() {
        let a = shelf(&[]);
        assert_eq!(first_divergence(&a, &[]), Some(None));
    }
}
