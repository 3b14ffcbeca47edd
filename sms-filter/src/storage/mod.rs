//! Collection storage module
//!
//! Provides the persistence backends behind the keyword store:
//! - [`json`]: one JSON file per collection, replaced atomically on save
//! - [`memory`]: in-process storage for tests and embedding

pub mod json;
pub mod memory;

pub use json::JsonFileStore;
pub use memory::MemoryStore;

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The persisted collections owned by a `KeywordStore`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    /// Keyword -> score reference table
    Keywords,
    /// Reported spam message -> cached score
    ReportedSpam,
    /// Messages the user confirmed as good
    KnownGood,
}

impl Collection {
    /// Stable name used as the storage key
    pub fn name(&self) -> &'static str {
        match self {
            Collection::Keywords => "keywords",
            Collection::ReportedSpam => "spam_messages",
            Collection::KnownGood => "good_messages",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Write-through repository for the engine's collections.
///
/// Records are handed over as raw JSON values so that the caller can
/// decide per record whether it parses. `load` returns `Ok(None)` when the
/// collection has never been written.
#[async_trait::async_trait]
pub trait CollectionStore: Send + Sync {
    /// Load every record of a collection
    async fn load(&self, collection: Collection) -> Result<Option<Vec<serde_json::Value>>>;

    /// Replace a collection with the given records
    async fn save(&self, collection: Collection, records: Vec<serde_json::Value>) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collection_names() {
        assert_eq!(Collection::Keywords.name(), "keywords");
        assert_eq!(Collection::ReportedSpam.to_string(), "spam_messages");
        assert_eq!(Collection::KnownGood.to_string(), "good_messages");
    }
}
