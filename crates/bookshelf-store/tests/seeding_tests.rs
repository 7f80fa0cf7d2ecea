// Integration tests for the schema manager and fixture seeder

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use bookshelf_core::ExErrorKind;
use bookshelf_store::schema::TableCounts;
use bookshelf_store::{Bookshelf, Fixture, FixtureSpec, SeedReport, StoreConfig};
use common::book;

#[test]
fn test_default_seed_counts() {
    // Given: A fresh in-memory store
    let shelf = Bookshelf::open(&StoreConfig::in_memory()).unwrap();

    // When: We seed with the default fixture
    let report = shelf.seed().unwrap();

    // Then: 200 books and 1000 reviews exist
    assert_eq!(
        report,
        SeedReport {
            books: 200,
            reviews: 1000
        }
    );
    assert_eq!(
        shelf.counts().unwrap(),
        TableCounts {
            books: 200,
            reviews: 1000
        }
    );
}

#[test]
fn test_seed_is_idempotent() {
    // Given: A store that has already been seeded
    let shelf = Bookshelf::open(&StoreConfig::in_memory()).unwrap();
    shelf.seed().unwrap();
    let first = shelf.load_naive().unwrap();

    // When: We seed again
    let report = shelf.seed().unwrap();

    // Then: Counts are unchanged and the data is identical, ids included
    assert_eq!(report.books, 200);
    assert_eq!(report.reviews, 1000);
    assert_eq!(shelf.load_naive().unwrap(), first);
    assert_eq!(first[0].book_id, 1);
}

#[test]
fn test_custom_fixture_spec() {
    let shelf = Bookshelf::open(&StoreConfig::in_memory())
        .unwrap()
        .with_fixture(FixtureSpec {
            books: 12,
            reviews_per_book: 0,
        });

    let report = shelf.seed().unwrap();

    assert_eq!(report.books, 12);
    assert_eq!(report.reviews, 0);
}

#[test]
fn test_failed_seed_keeps_previous_dataset() {
    // Given: A store holding the default fixture
    let shelf = Bookshelf::open(&StoreConfig::in_memory()).unwrap();
    shelf.seed().unwrap();
    let before = shelf.load_naive().unwrap();

    // And: A fixture whose second book violates the non-empty title rule
    let fixture = Fixture {
        books: vec![book("Fine", &[(4, "ok")]), book("", &[(2, "never stored")])],
    };

    // When: We seed it
    let err = shelf.seed_fixture(&fixture).unwrap_err();

    // Then: The seed fails with a constraint violation
    assert_eq!(err.kind(), ExErrorKind::ConstraintViolation);

    // And: The schema reset was rolled back with the inserts
    assert_eq!(
        shelf.counts().unwrap(),
        TableCounts {
            books: 200,
            reviews: 1000
        }
    );
    assert_eq!(shelf.load_naive().unwrap(), before);
}

#[test]
fn test_failed_first_seed_leaves_no_tables() {
    // Given: A store that was never seeded
    let shelf = Bookshelf::open(&StoreConfig::in_memory()).unwrap();
    let fixture = Fixture {
        books: vec![book("", &[])],
    };

    // When: The first seed fails
    assert!(shelf.seed_fixture(&fixture).is_err());

    // Then: Not even the empty tables were left behind
    assert!(shelf.counts().is_err());
}

#[test]
fn test_orphan_review_rejected_by_store() {
    // Given: A seeded store
    let shelf = Bookshelf::open(&StoreConfig::in_memory()).unwrap();
    shelf.seed().unwrap();

    // When: A review referencing a missing book is inserted directly
    let conn = shelf.pool().acquire().unwrap();
    let result = conn.execute(
        "INSERT INTO reviews (book_id, rating, comment) VALUES (9999, 3, 'orphan')",
        [],
    );

    // Then: The foreign key rejects it as a constraint violation
    let err = bookshelf_store::errors::from_rusqlite(result.unwrap_err());
    assert_eq!(err.kind(), ExErrorKind::ConstraintViolation);
    drop(conn);

    // And: Integrity still holds
    shelf.check_integrity().unwrap();
}

#[test]
fn test_out_of_range_rating_rejected_by_store() {
    let shelf = Bookshelf::open(&StoreConfig::in_memory()).unwrap();
    shelf.seed().unwrap();

    let conn = shelf.pool().acquire().unwrap();
    let result = conn.execute(
        "INSERT INTO reviews (book_id, rating, comment) VALUES (1, 6, '')",
        [],
    );

    let err = bookshelf_store::errors::from_rusqlite(result.unwrap_err());
    assert_eq!(err.kind(), ExErrorKind::ConstraintViolation);
}

#[test]
fn test_file_store_persists_between_opens() {
    // Given: A file-backed store seeded once
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("nested").join("store.db");
    {
        let shelf = Bookshelf::open(&StoreConfig::file(&path)).unwrap();
        shelf.seed().unwrap();
    }

    // When: The store is reopened
    let shelf = Bookshelf::open(&StoreConfig::file(&path).with_pool_size(1)).unwrap();

    // Then: The seeded rows are still there
    assert_eq!(shelf.counts().unwrap().books, 200);
}
