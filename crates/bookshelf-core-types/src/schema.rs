//! Canonical schema constants for structured logging and events
//!
//! These constants keep field names consistent between the logging macros,
//! the loaders and the test capture assertions.

// Canonical field keys for structured logging
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";
pub const FIELD_REQUEST_ID: &str = "request_id";

// Loader fields
pub const FIELD_STRATEGY: &str = "strategy";
pub const FIELD_ROUND_TRIPS: &str = "round_trips";
pub const FIELD_BOOK_ID: &str = "book_id";

// Collection sizes
pub const FIELD_BOOK_COUNT: &str = "book_count";
pub const FIELD_REVIEW_COUNT: &str = "review_count";

// Error fields
pub const FIELD_ERR_KIND: &str = "err_kind";
pub const FIELD_ERR_CODE: &str = "err_code";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
