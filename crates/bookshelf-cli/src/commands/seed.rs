//! Seed command
//!
//! Usage: bookshelf seed [--books N] [--reviews-per-book C]

use super::{print_json, StoreArgs};
use bookshelf_core::ExError;
use bookshelf_store::seed::{DEFAULT_BOOKS, DEFAULT_REVIEWS_PER_BOOK};
use bookshelf_store::{Bookshelf, FixtureSpec};
use clap::Args;
use serde::Serialize;
use std::process::ExitCode;

#[derive(Debug, Args)]
pub struct SeedArgs {
    /// Number of books to generate
    #[arg(long, default_value_t = DEFAULT_BOOKS)]
    pub books: usize,

    /// Reviews generated for every book
    #[arg(long, default_value_t = DEFAULT_REVIEWS_PER_BOOK)]
    pub reviews_per_book: usize,
}

#[derive(Serialize)]
struct SeedOutput {
    message: &'static str,
    books: u64,
    reviews: u64,
}

pub fn execute(store: &StoreArgs, args: SeedArgs) -> Result<ExitCode, ExError> {
    let shelf = Bookshelf::open(&store.config())?.with_fixture(FixtureSpec {
        books: args.books,
        reviews_per_book: args.reviews_per_book,
    });

    let report = shelf.seed()?;

    print_json(&SeedOutput {
        message: "Seeded database",
        books: report.books,
        reviews: report.reviews,
    })?;
    Ok(ExitCode::SUCCESS)
}
