//! Bookshelf CLI
//!
//! Seeds the bookshelf store and runs the loading strategies against it,
//! printing JSON on stdout. Logs go to stderr.

use bookshelf_core::logging_facility::{init, Profile};
use bookshelf_core_types::RequestId;
use clap::{Parser, Subcommand, ValueEnum};
use std::process::ExitCode;

mod commands;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "bookshelf")]
#[command(about = "Bookshelf - compare N+1, join, batched and aggregate loading", long_about = None)]
struct Cli {
    #[command(flatten)]
    store: commands::StoreArgs,

    /// Log output format
    #[arg(long, global = true, value_enum, env = "BOOKSHELF_LOG", default_value = "pretty")]
    log_format: LogFormat,

    /// Emit operation logs on stderr
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Recreate the schema and insert the fixture
    Seed(commands::seed::SeedArgs),
    /// Load the shelf with one strategy
    Load(commands::load::LoadArgs),
    /// Run every review loader and check they agree
    Compare(commands::compare::CompareArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.verbose || std::env::var_os("RUST_LOG").is_some() {
        init(match cli.log_format {
            LogFormat::Pretty => Profile::Development,
            LogFormat::Json => Profile::Production,
        });
    }

    let request_id = RequestId::new();
    let span = tracing::info_span!("bookshelf", request_id = %request_id);
    let _entered = span.enter();

    let result = match cli.command {
        Commands::Seed(args) => commands::seed::execute(&cli.store, args),
        Commands::Load(args) => commands::load::execute(&cli.store, args),
        Commands::Compare(args) => commands::compare::execute(&cli.store, args),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            let e = e.with_request_id(request_id);
            let envelope = serde_json::json!({
                "error": e.message(),
                "code": e.code(),
                "request_id": e.request_id().map(|id| id.as_str()),
            });
            eprintln!("{}", envelope);
            ExitCode::FAILURE
        }
    }
}
