//! Bookshelf Store - SQLite persistence and the four loading strategies
//!
//! Provides:
//! - A configured SQLite connection pool with scoped acquisition
//! - The schema manager and deterministic fixture seeder
//! - Naive, join-aggregate, batched and aggregate-stats loaders with
//!   round-trip accounting
//! - The `Bookshelf` facade that serializes seeding against loads

pub mod aggregation;
pub mod assembler;
pub mod compare;
pub mod db;
pub mod errors;
pub mod loaders;
pub mod schema;
pub mod seed;
pub mod session;
pub mod shelf;

// Re-export key types
pub use aggregation::ReviewAggregation;
pub use compare::Comparison;
pub use db::{StoreConfig, StoreLocation, StorePool};
pub use errors::Result;
pub use loaders::{load_all, LoadOutcome, LoadStrategy, LoadedBooks};
pub use seed::{Fixture, FixtureBook, FixtureReview, FixtureSpec, SeedReport};
pub use shelf::Bookshelf;
