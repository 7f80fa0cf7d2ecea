//! The `Bookshelf` facade
//!
//! Owns the connection pool and the seed/load gate. Loads take the gate
//! shared and may run concurrently; seeding takes it exclusively, so no
//! loader ever observes a half-built fixture.

#![allow(clippy::result_large_err)]

use crate::aggregation::ReviewAggregation;
use crate::compare::{build_comparison, Comparison, StrategyRun};
use crate::db::{PooledConnection, StoreConfig, StorePool};
use crate::errors::{poisoned, Result};
use crate::loaders::{load_all, LoadOutcome, LoadStrategy};
use crate::schema::{self, TableCounts};
use crate::seed::{self, Fixture, FixtureSpec, SeedReport};
use bookshelf_core::model::{BookStats, BookWithReviews};
use std::sync::RwLock;

pub struct Bookshelf {
    pool: StorePool,
    gate: RwLock<()>,
    aggregation: ReviewAggregation,
    fixture: FixtureSpec,
}

impl Bookshelf {
    /// Open the store described by `config`
    ///
    /// Does not touch the schema; call `seed` before loading.
    pub fn open(config: &StoreConfig) -> Result<Self> {
        Ok(Self {
            pool: StorePool::open(config)?,
            gate: RwLock::new(()),
            aggregation: ReviewAggregation::default(),
            fixture: FixtureSpec::default(),
        })
    }

    /// Choose how the join loader folds reviews
    pub fn with_aggregation(mut self, aggregation: ReviewAggregation) -> Self {
        self.aggregation = aggregation;
        self
    }

    /// Choose the fixture size used by `seed`
    pub fn with_fixture(mut self, fixture: FixtureSpec) -> Self {
        self.fixture = fixture;
        self
    }

    pub fn aggregation(&self) -> ReviewAggregation {
        self.aggregation
    }

    pub fn pool(&self) -> &StorePool {
        &self.pool
    }

    /// Recreate the schema and insert the configured fixture
    pub fn seed(&self) -> Result<SeedReport> {
        let _exclusive = self.gate.write().map_err(|_| poisoned("seed gate"))?;
        let mut conn = self.pool.acquire()?;
        seed::seed(&mut conn, self.fixture)
    }

    /// Recreate the schema and insert an explicit fixture
    pub fn seed_fixture(&self, fixture: &Fixture) -> Result<SeedReport> {
        let _exclusive = self.gate.write().map_err(|_| poisoned("seed gate"))?;
        let mut conn = self.pool.acquire()?;
        seed::seed_fixture(&mut conn, fixture)
    }

    fn read<T>(&self, f: impl FnOnce(&PooledConnection) -> Result<T>) -> Result<T> {
        let _shared = self.gate.read().map_err(|_| poisoned("seed gate"))?;
        let conn = self.pool.acquire()?;
        f(&conn)
    }

    /// Run one strategy and report its round trips and timing
    pub fn load(&self, strategy: LoadStrategy) -> Result<LoadOutcome> {
        self.read(|conn| load_all(conn, strategy, self.aggregation))
    }

    pub fn load_naive(&self) -> Result<Vec<BookWithReviews>> {
        self.load(LoadStrategy::Naive)?.data.into_reviews()
    }

    pub fn load_join(&self) -> Result<Vec<BookWithReviews>> {
        self.load(LoadStrategy::Join)?.data.into_reviews()
    }

    pub fn load_batched(&self) -> Result<Vec<BookWithReviews>> {
        self.load(LoadStrategy::Batched)?.data.into_reviews()
    }

    pub fn load_aggregate_stats(&self) -> Result<Vec<BookStats>> {
        self.load(LoadStrategy::AggregateStats)?.data.into_stats()
    }

    /// Run every review loader on one consistent snapshot and compare them
    /// against the naive baseline
    pub fn compare(&self) -> Result<Comparison> {
        self.read(|conn| {
            let mut runs = Vec::new();
            let mut shelves = Vec::new();

            for strategy in LoadStrategy::REVIEW_LOADERS {
                let outcome = load_all(conn, strategy, self.aggregation)?;
                let shelf = outcome.data.into_reviews()?;
                runs.push(StrategyRun {
                    strategy: strategy.name().to_string(),
                    round_trips: outcome.round_trips,
                    duration_ms: outcome.duration_ms,
                    book_count: shelf.len(),
                });
                shelves.push((strategy, shelf));
            }

            let (_, baseline) = shelves.remove(0);
            Ok(build_comparison(&baseline, &shelves, runs))
        })
    }

    pub fn counts(&self) -> Result<TableCounts> {
        self.read(|conn| schema::table_counts(conn))
    }

    pub fn check_integrity(&self) -> Result<()> {
        self.read(|conn| schema::check_integrity(conn))
    }
}
