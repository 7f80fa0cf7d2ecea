#![allow(dead_code)]

use bookshelf_core::model::Rating;
use bookshelf_store::{Bookshelf, Fixture, FixtureBook, FixtureReview, StoreConfig};

/// Open an in-memory shelf and seed it with `fixture`
pub fn seeded_shelf(fixture: &Fixture) -> Bookshelf {
    let shelf = Bookshelf::open(&StoreConfig::in_memory()).unwrap();
    shelf.seed_fixture(fixture).unwrap();
    shelf
}

pub fn book(title: &str, reviews: &[(i64, &str)]) -> FixtureBook {
    FixtureBook {
        title: title.to_string(),
        author: "Author 1".to_string(),
        reviews: reviews
            .iter()
            .map(|(rating, comment)| FixtureReview {
                rating: Rating::try_from(*rating).unwrap(),
                comment: comment.to_string(),
            })
            .collect(),
    }
}

/// Two books: the first with three reviews, the second with none
pub fn mixed_fixture() -> Fixture {
    Fixture {
        books: vec![
            book("Reviewed", &[(5, "superb"), (3, "fine"), (1, "dull")]),
            book("Unreviewed", &[]),
        ],
    }
}
