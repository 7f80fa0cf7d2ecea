pub mod book;
pub mod loaded;
pub mod review;

pub use book::Book;
pub use loaded::{BookStats, BookWithReviews};
pub use review::{Rating, Review};
