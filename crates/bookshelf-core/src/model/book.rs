use serde::{Deserialize, Serialize};

/// Book - the parent side of the one-to-many relationship
///
/// Books are created only by the fixture seeder and are immutable once
/// stored. `id` is assigned by the store and increases monotonically in
/// insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    /// Store-assigned identifier
    pub id: i64,

    /// Non-empty title
    pub title: String,

    /// Non-empty author name
    pub author: String,
}

impl Book {
    /// Create a Book from stored values
    pub fn new(id: i64, title: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            author: author.into(),
        }
    }
}
