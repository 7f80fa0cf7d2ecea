//! Compare command
//!
//! Runs naive, join and batched against one snapshot; exits with status 2
//! when their outputs disagree.

use super::{open_shelf, print_json, AggregationArg, StoreArgs};
use bookshelf_core::ExError;
use clap::Args;
use std::process::ExitCode;

#[derive(Debug, Args)]
pub struct CompareArgs {
    /// Review folding used by the join strategy
    #[arg(long, value_enum, default_value_t = AggregationArg::Delimited)]
    pub aggregation: AggregationArg,
}

pub fn execute(store: &StoreArgs, args: CompareArgs) -> Result<ExitCode, ExError> {
    let shelf = open_shelf(store, args.aggregation)?;
    let comparison = shelf.compare()?;

    print_json(&comparison)?;

    if comparison.equivalent {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::from(2))
    }
}
