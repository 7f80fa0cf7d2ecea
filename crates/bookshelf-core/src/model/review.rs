use serde::{Deserialize, Serialize};

use crate::errors::BookshelfError;

/// A review rating, always within 1..=5
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Rating(u8);

impl Rating {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    /// Get the numeric value
    pub fn value(self) -> u8 {
        self.0
    }

    /// Fold an arbitrary integer into the rating domain (`1 + n mod 5`)
    pub fn folded(n: u64) -> Self {
        Self(Self::MIN + (n % u64::from(Self::MAX)) as u8)
    }
}

impl TryFrom<i64> for Rating {
    type Error = BookshelfError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        if (i64::from(Self::MIN)..=i64::from(Self::MAX)).contains(&value) {
            Ok(Self(value as u8))
        } else {
            Err(BookshelfError::RatingOutOfRange { value })
        }
    }
}

impl From<Rating> for i64 {
    fn from(rating: Rating) -> Self {
        i64::from(rating.0)
    }
}

impl std::fmt::Display for Rating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Review - the child side of the one-to-many relationship
///
/// `comment` is never absent: "no comment" is the empty string.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Review {
    pub rating: Rating,
    pub comment: String,
}

impl Review {
    pub fn new(rating: Rating, comment: impl Into<String>) -> Self {
        Self {
            rating,
            comment: comment.into(),
        }
    }
}
