use std::fmt;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::error::{StoreError, StoreResult};

/// Names of the whole documents the ledger persists.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DocumentKey {
    Teams,
    Events,
    Categories,
    PublishedScores,
}

impl DocumentKey {
    pub const ALL: [DocumentKey; 4] = [
        Self::Teams,
        Self::Events,
        Self::Categories,
        Self::PublishedScores,
    ];

    /// Storage name of the document.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Teams => "teams",
            Self::Events => "events",
            Self::Categories => "categories",
            Self::PublishedScores => "publishedScores",
        }
    }
}

impl fmt::Display for DocumentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Key-value store of whole documents.
///
/// All implementations must satisfy these invariants:
/// - A document is read and written as a unit; there are no partial updates.
/// - `save` replaces any previous contents of the key.
/// - The store never interprets document contents.
pub trait DocumentStore: Send + Sync {
    /// Read a document.
    ///
    /// Returns `Ok(None)` if the document does not exist.
    fn load(&self, key: DocumentKey) -> StoreResult<Option<String>>;

    /// Write a document, replacing any previous contents.
    fn save(&self, key: DocumentKey, contents: &str) -> StoreResult<()>;
}

/// Load and decode a JSON document.
///
/// Returns `Ok(None)` if the document does not exist and
/// `Err(StoreError::Serialization)` if it exists but does not decode as `T`.
pub fn load_json<T: DeserializeOwned>(
    store: &dyn DocumentStore,
    key: DocumentKey,
) -> StoreResult<Option<T>> {
    let Some(raw) = store.load(key)? else {
        debug!(%key, "document not present");
        return Ok(None);
    };
    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|e| StoreError::Serialization(format!("{key}: {e}")))
}

/// Encode a value as JSON and save it under `key`.
pub fn save_json<T: Serialize + ?Sized>(
    store: &dyn DocumentStore,
    key: DocumentKey,
    value: &T,
) -> StoreResult<()> {
    let encoded =
        serde_json::to_string(value).map_err(|e| StoreError::Serialization(e.to_string()))?;
    store.save(key, &encoded)
}
