//! Structured logging for the bookshelf crates
//!
//! Events are plain `tracing` events with a fixed vocabulary (see
//! `bookshelf_core_types::schema`). `init` picks the output format once per
//! process; `test_capture` swaps the output for an in-memory buffer so
//! tests can assert on what a load or seed emitted.
//!
//! ```rust
//! use bookshelf_core::logging_facility::{init, Profile};
//!
//! init(Profile::Development);
//! ```

pub mod init;
pub mod macros;
pub mod test_capture;

pub use init::{init, Profile};
pub use test_capture::{init_test_capture, CapturedEvent, TestCapture};
