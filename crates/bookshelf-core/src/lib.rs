//! Bookshelf Core - domain model, error facility and logging facility
//!
//! This crate provides the pieces shared by every other bookshelf crate:
//! - `Book` / `Review` / `Rating` and the uniform loader output shapes
//!   (`BookWithReviews`, `BookStats`)
//! - The structured error facility (`ExError`, `ExErrorKind`) and the
//!   domain error enum (`BookshelfError`)
//! - The structured logging facility (`init`, `log_op_*` and `log_load!` macros, test capture)

pub mod errors;
pub mod logging_facility;
pub mod model;

// Paths the logging macros expand to, so callers need no direct deps
#[doc(hidden)]
pub use bookshelf_core_types as __types;
#[doc(hidden)]
pub use tracing as __tracing;

// Re-export commonly used types
pub use errors::{BookshelfError, ExError, ExErrorKind, Result};
pub use model::{Book, BookStats, BookWithReviews, Rating, Review};
