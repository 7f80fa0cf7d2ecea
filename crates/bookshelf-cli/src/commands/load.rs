//! Load command
//!
//! Usage: bookshelf load <naive|join|batched|aggregate-stats> [--aggregation delimited|json]

use super::{open_shelf, print_json, AggregationArg, StoreArgs};
use bookshelf_core::ExError;
use bookshelf_store::{LoadStrategy, LoadedBooks};
use clap::{Args, ValueEnum};
use serde::Serialize;
use std::process::ExitCode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StrategyArg {
    Naive,
    Join,
    Batched,
    AggregateStats,
}

impl From<StrategyArg> for LoadStrategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Naive => LoadStrategy::Naive,
            StrategyArg::Join => LoadStrategy::Join,
            StrategyArg::Batched => LoadStrategy::Batched,
            StrategyArg::AggregateStats => LoadStrategy::AggregateStats,
        }
    }
}

#[derive(Debug, Args)]
pub struct LoadArgs {
    /// Loading strategy
    #[arg(value_enum)]
    pub strategy: StrategyArg,

    /// Review folding used by the join strategy
    #[arg(long, value_enum, default_value_t = AggregationArg::Delimited)]
    pub aggregation: AggregationArg,
}

#[derive(Serialize)]
struct LoadEnvelope<'a> {
    count: usize,
    data: &'a LoadedBooks,
    strategy: &'static str,
    round_trips: usize,
    duration_ms: u64,
}

pub fn execute(store: &StoreArgs, args: LoadArgs) -> Result<ExitCode, ExError> {
    let shelf = open_shelf(store, args.aggregation)?;
    let outcome = shelf.load(args.strategy.into())?;

    print_json(&LoadEnvelope {
        count: outcome.data.len(),
        data: &outcome.data,
        strategy: outcome.strategy.name(),
        round_trips: outcome.round_trips,
        duration_ms: outcome.duration_ms,
    })?;
    Ok(ExitCode::SUCCESS)
}
