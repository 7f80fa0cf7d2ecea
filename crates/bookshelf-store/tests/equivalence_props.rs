// Property tests: every review loader agrees with the naive baseline

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use bookshelf_core::model::Rating;
use bookshelf_store::compare::shelves_equivalent;
use bookshelf_store::{Fixture, FixtureBook, FixtureReview, LoadStrategy, ReviewAggregation};
use common::seeded_shelf;
use proptest::prelude::*;

fn review_strategy() -> impl Strategy<Value = FixtureReview> {
    // No delimiter in comments; that case is covered separately
    (1i64..=5, "[a-z ]{0,12}").prop_map(|(rating, comment)| FixtureReview {
        rating: Rating::try_from(rating).unwrap(),
        comment,
    })
}

fn fixture_strategy() -> impl Strategy<Value = Fixture> {
    prop::collection::vec(
        ("[A-Z][a-z]{1,8}", prop::collection::vec(review_strategy(), 0..6)),
        0..12,
    )
    .prop_map(|books| Fixture {
        books: books
            .into_iter()
            .map(|(title, reviews)| FixtureBook {
                author: format!("{} author", title),
                title,
                reviews,
            })
            .collect(),
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn prop_review_loaders_equivalent(fixture in fixture_strategy()) {
        for aggregation in [ReviewAggregation::Delimited, ReviewAggregation::Json] {
            let shelf = seeded_shelf(&fixture).with_aggregation(aggregation);
            let baseline = shelf.load_naive().unwrap();
            prop_assert_eq!(baseline.len(), fixture.book_count());

            for strategy in [LoadStrategy::Join, LoadStrategy::Batched] {
                let loaded = shelf.load(strategy).unwrap().data.into_reviews().unwrap();
                prop_assert!(shelves_equivalent(&baseline, &loaded));
            }
        }
    }

    #[test]
    fn prop_stats_counts_match_fixture(fixture in fixture_strategy()) {
        let shelf = seeded_shelf(&fixture);
        let stats = shelf.load_aggregate_stats().unwrap();

        prop_assert_eq!(stats.len(), fixture.book_count());
        for (s, b) in stats.iter().zip(&fixture.books) {
            prop_assert_eq!(s.review_count, b.reviews.len() as u64);
            prop_assert_eq!(s.average_rating.is_none(), b.reviews.is_empty());
        }
    }
}
