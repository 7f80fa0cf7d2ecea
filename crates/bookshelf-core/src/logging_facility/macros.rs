//! Operation logging macros
//!
//! Every seed and load brackets its work with one `start` event and exactly
//! one `end` or `end_error` event. All of them funnel through
//! `__op_event!`, which stamps `component`, `op` and `event`; the public
//! macros only choose the level and the event name.
//!
//! Loaders use `log_load!`, which derives `op` and `strategy` from the
//! strategy value and always records `round_trips`.

#[doc(hidden)]
#[macro_export]
macro_rules! __op_event {
    ($level:ident, $op:expr, $event:expr $(, $($field:tt)*)?) => {
        $crate::__tracing::$level!(
            component = module_path!(),
            op = $op,
            event = $event
            $(, $($field)*)?
        )
    };
}

/// Log the start of an operation
///
/// ```
/// # use bookshelf_core::log_op_start;
/// log_op_start!("seed");
/// log_op_start!("seed", book_count = 200u64);
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr $(, $($field:tt)*)?) => {
        $crate::__op_event!(
            info,
            $op,
            $crate::__types::schema::EVENT_START
            $(, $($field)*)?
        )
    };
}

/// Log the successful end of an operation; `duration_ms` is mandatory
///
/// ```
/// # use bookshelf_core::log_op_end;
/// log_op_end!("seed", duration_ms = 42u64);
/// log_op_end!("seed", duration_ms = 42u64, book_count = 200u64);
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, duration_ms = $duration:expr $(, $($field:tt)*)?) => {
        $crate::__op_event!(
            info,
            $op,
            $crate::__types::schema::EVENT_END,
            duration_ms = $duration
            $(, $($field)*)?
        )
    };
}

/// Log a failed operation
///
/// Anything convertible into `ExError` is accepted; the event always carries
/// `err_kind` and the stable `err_code`.
///
/// ```
/// # use bookshelf_core::{log_op_error, errors::BookshelfError};
/// let err = BookshelfError::UnknownBook { book_id: 9 };
/// log_op_error!("load_batched", err, duration_ms = 10u64);
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr, duration_ms = $duration:expr $(, $($field:tt)*)?) => {{
        let ex_err: $crate::errors::ExError = $err.into();
        $crate::__op_event!(
            error,
            $op,
            $crate::__types::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err_kind = ?ex_err.kind(),
            err_code = ex_err.code()
            $(, $($field)*)?
        )
    }};
}

/// Log one phase of a load
///
/// `$strategy` is anything with `op()` and `name()` returning `&str`, so the
/// operation name and the `strategy` field can never disagree.
///
/// ```ignore
/// log_load!(start, strategy);
/// log_load!(end, strategy, duration_ms = 3, round_trips = 2, book_count = 200);
/// log_load!(error, strategy, err, duration_ms = 3, round_trips = 1);
/// ```
#[macro_export]
macro_rules! log_load {
    (start, $strategy:expr) => {
        $crate::log_op_start!($strategy.op(), strategy = $strategy.name())
    };
    (end, $strategy:expr, duration_ms = $duration:expr, round_trips = $round_trips:expr, book_count = $books:expr) => {
        $crate::log_op_end!(
            $strategy.op(),
            duration_ms = $duration,
            strategy = $strategy.name(),
            round_trips = $round_trips as u64,
            book_count = $books as u64
        )
    };
    (error, $strategy:expr, $err:expr, duration_ms = $duration:expr, round_trips = $round_trips:expr) => {
        $crate::log_op_error!(
            $strategy.op(),
            $err,
            duration_ms = $duration,
            strategy = $strategy.name(),
            round_trips = $round_trips as u64
        )
    };
}
