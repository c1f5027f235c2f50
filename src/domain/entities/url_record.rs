//! URL record entity representing one shortened URL mapping.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A persisted mapping from a short identifier to the URL it stands for.
///
/// `id` doubles as the primary key and `short_url` always equals `id`; the
/// duplicate field is kept because it is part of the stored document layout.
/// Records are written once and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlRecord {
    #[serde(rename = "_id")]
    pub id: String,
    pub original_url: String,
    pub short_url: String,
    pub creation_date: DateTime<Utc>,
}

impl UrlRecord {
    /// Creates a record whose `short_url` mirrors `id`.
    pub fn new(id: String, original_url: String, creation_date: DateTime<Utc>) -> Self {
        Self {
            short_url: id.clone(),
            id,
            original_url,
            creation_date,
        }
    }
}
