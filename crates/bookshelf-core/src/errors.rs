use bookshelf_core_types::RequestId;
use thiserror::Error;

/// Result type alias using BookshelfError
pub type Result<T> = std::result::Result<T, BookshelfError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Every failure surfaced by the bookshelf crates is classified into one of
/// these kinds. Each kind maps to a stable error code that callers (and the
/// CLI's JSON error envelope) can match on without parsing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Caller input
    InvalidInput,

    // Store
    /// DDL failed while (re)creating the schema; fatal for seeding
    Schema,
    /// A store-level constraint (foreign key, CHECK, NOT NULL) rejected a row
    ConstraintViolation,
    /// The store could not be reached or is busy; the caller may retry
    StoreUnavailable,
    /// Any other failure reported by the store
    Persistence,

    // Loading
    /// The join-aggregate split/re-zip produced inconsistent tokens
    AggregationParse,

    // Integration/IO
    Io,
    Serialization,
    Concurrency,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::Schema => "ERR_SCHEMA",
            ExErrorKind::ConstraintViolation => "ERR_CONSTRAINT_VIOLATION",
            ExErrorKind::StoreUnavailable => "ERR_STORE_UNAVAILABLE",
            ExErrorKind::Persistence => "ERR_PERSISTENCE",
            ExErrorKind::AggregationParse => "ERR_AGGREGATION_PARSE",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Concurrency => "ERR_CONCURRENCY",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }

    /// Whether a caller may reasonably retry the failed operation.
    ///
    /// Nothing in this workspace retries internally.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ExErrorKind::StoreUnavailable)
    }
}

/// Canonical structured error type
///
/// Carries the classification fields used for programmatic handling plus the
/// context (operation, book id, request id) needed to debug a failure.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    book_id: Option<i64>,
    request_id: Option<RequestId>,
    message: String,
    source: Option<Box<ExError>>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            book_id: None,
            request_id: None,
            message: String::new(),
            source: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add book ID context
    pub fn with_book_id(mut self, book_id: i64) -> Self {
        self.book_id = Some(book_id);
        self
    }

    /// Add request ID context
    pub fn with_request_id(mut self, request_id: RequestId) -> Self {
        self.request_id = Some(request_id);
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Add source error
    pub fn with_source(mut self, source: ExError) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Whether the caller may retry
    pub fn is_retryable(&self) -> bool {
        self.kind.is_retryable()
    }

    /// Get the operation context, if any
    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    /// Get the book ID context, if any
    pub fn book_id(&self) -> Option<i64> {
        self.book_id
    }

    /// Get the request ID context, if any
    pub fn request_id(&self) -> Option<&RequestId> {
        self.request_id.as_ref()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the source error, if any
    pub fn source_error(&self) -> Option<&ExError> {
        self.source.as_deref()
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(book_id) = self.book_id {
            write!(f, " (book_id: {})", book_id)?;
        }
        if let Some(request_id) = &self.request_id {
            write!(f, " (request_id: {})", request_id)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

// ========== End Error Facility ==========

/// Domain errors raised while validating or assembling bookshelf data
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BookshelfError {
    /// Rating outside the 1..=5 domain
    #[error("Rating {value} is outside 1..=5")]
    RatingOutOfRange { value: i64 },

    /// Delimited ratings and comments split into different token counts
    #[error(
        "Book {book_id}: aggregated ratings split into {ratings} tokens but comments into {comments}"
    )]
    AggregateCountMismatch {
        book_id: i64,
        ratings: usize,
        comments: usize,
    },

    /// A rating token could not be parsed as an integer
    #[error("Book {book_id}: rating token '{token}' is not an integer")]
    AggregateToken { book_id: i64, token: String },

    /// The structured (JSON) aggregate could not be decoded
    #[error("Book {book_id}: review aggregate is not valid JSON: {reason}")]
    AggregateJson { book_id: i64, reason: String },

    /// A review row referenced a book that was not part of the fetched set
    #[error("Review row references book {book_id} which was not fetched")]
    UnknownBook { book_id: i64 },
}

/// Conversion from BookshelfError to ExError
impl From<BookshelfError> for ExError {
    fn from(err: BookshelfError) -> Self {
        let message = err.to_string();
        match err {
            BookshelfError::RatingOutOfRange { .. } => {
                ExError::new(ExErrorKind::ConstraintViolation)
                    .with_op("validate_rating")
                    .with_message(message)
            }

            BookshelfError::AggregateCountMismatch { book_id, .. }
            | BookshelfError::AggregateToken { book_id, .. }
            | BookshelfError::AggregateJson { book_id, .. } => {
                ExError::new(ExErrorKind::AggregationParse)
                    .with_op("decode_review_aggregate")
                    .with_book_id(book_id)
                    .with_message(message)
            }

            BookshelfError::UnknownBook { book_id } => {
                ExError::new(ExErrorKind::ConstraintViolation)
                    .with_op("group_reviews")
                    .with_book_id(book_id)
                    .with_message(message)
            }
        }
    }
}

impl From<serde_json::Error> for ExError {
    fn from(err: serde_json::Error) -> Self {
        ExError::new(ExErrorKind::Serialization).with_message(err.to_string())
    }
}
