use bookshelf_core::errors::{BookshelfError, ExError, ExErrorKind};
use bookshelf_core_types::RequestId;

#[test]
fn test_count_mismatch_maps_to_aggregation_parse() {
    let err = BookshelfError::AggregateCountMismatch {
        book_id: 12,
        ratings: 5,
        comments: 6,
    };

    let ex_err: ExError = err.into();

    assert_eq!(ex_err.kind(), ExErrorKind::AggregationParse);
    assert_eq!(ex_err.code(), "ERR_AGGREGATION_PARSE");
    assert_eq!(ex_err.book_id(), Some(12));
    assert!(ex_err.message().contains("5 tokens"));
}

#[test]
fn test_bad_token_maps_to_aggregation_parse() {
    let ex_err: ExError = BookshelfError::AggregateToken {
        book_id: 3,
        token: "x".to_string(),
    }
    .into();

    assert_eq!(ex_err.kind(), ExErrorKind::AggregationParse);
    assert_eq!(ex_err.op(), Some("decode_review_aggregate"));
}

#[test]
fn test_rating_out_of_range_is_constraint_violation() {
    let ex_err: ExError = BookshelfError::RatingOutOfRange { value: 0 }.into();
    assert_eq!(ex_err.kind(), ExErrorKind::ConstraintViolation);
    assert!(!ex_err.is_retryable());
}

#[test]
fn test_unknown_book_is_constraint_violation() {
    let ex_err: ExError = BookshelfError::UnknownBook { book_id: 99 }.into();
    assert_eq!(ex_err.kind(), ExErrorKind::ConstraintViolation);
    assert_eq!(ex_err.book_id(), Some(99));
}

#[test]
fn test_request_id_is_carried() {
    let request_id = RequestId::from_string("req-42".to_string());
    let ex_err = ExError::new(ExErrorKind::StoreUnavailable).with_request_id(request_id.clone());

    assert_eq!(ex_err.request_id(), Some(&request_id));
    assert!(ex_err.is_retryable());
    assert!(ex_err.to_string().contains("req-42"));
}

#[test]
fn test_error_codes_are_unique() {
    let kinds = [
        ExErrorKind::InvalidInput,
        ExErrorKind::Schema,
        ExErrorKind::ConstraintViolation,
        ExErrorKind::StoreUnavailable,
        ExErrorKind::Persistence,
        ExErrorKind::AggregationParse,
        ExErrorKind::Io,
        ExErrorKind::Serialization,
        ExErrorKind::Concurrency,
        ExErrorKind::Internal,
    ];
    let mut codes: Vec<&str> = kinds.iter().map(|k| k.code()).collect();
    codes.sort();
    codes.dedup();
    assert_eq!(codes.len(), kinds.len());
    assert!(codes.iter().all(|c| c.starts_with("ERR_")));
}
