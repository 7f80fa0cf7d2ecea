//! Subcommands and the flags they share

pub mod compare;
pub mod load;
pub mod seed;

use bookshelf_core::ExError;
use bookshelf_store::db::{DEFAULT_DB_PATH, DEFAULT_POOL_SIZE};
use bookshelf_store::{Bookshelf, ReviewAggregation, StoreConfig};
use clap::{Args, ValueEnum};
use serde::Serialize;
use std::path::PathBuf;

/// Store location flags, accepted before or after the subcommand
#[derive(Debug, Args)]
pub struct StoreArgs {
    /// SQLite database file
    #[arg(long, global = true, env = "BOOKSHELF_DB", default_value = DEFAULT_DB_PATH)]
    pub db: PathBuf,

    /// Connections kept open in the pool
    #[arg(long, global = true, default_value_t = DEFAULT_POOL_SIZE)]
    pub pool_size: usize,
}

impl StoreArgs {
    pub fn config(&self) -> StoreConfig {
        StoreConfig::file(&self.db).with_pool_size(self.pool_size)
    }
}

/// How the join strategy folds reviews
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum AggregationArg {
    #[default]
    Delimited,
    Json,
}

impl From<AggregationArg> for ReviewAggregation {
    fn from(arg: AggregationArg) -> Self {
        match arg {
            AggregationArg::Delimited => ReviewAggregation::Delimited,
            AggregationArg::Json => ReviewAggregation::Json,
        }
    }
}

pub fn open_shelf(store: &StoreArgs, aggregation: AggregationArg) -> Result<Bookshelf, ExError> {
    Ok(Bookshelf::open(&store.config())?.with_aggregation(aggregation.into()))
}

pub fn print_json<T: Serialize>(value: &T) -> Result<(), ExError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
