use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

use crate::error::{StoreError, StoreResult};
use crate::traits::{DocumentKey, DocumentStore};

/// In-memory, HashMap-based document store.
///
/// Intended for tests and embedding. Documents are held behind a `RwLock`
/// and cloned on read. The store can be flipped read-only to simulate an
/// unavailable backend: loads keep working, saves fail.
pub struct InMemoryDocumentStore {
    documents: RwLock<HashMap<DocumentKey, String>>,
    read_only: AtomicBool,
}

impl InMemoryDocumentStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            documents: RwLock::new(HashMap::new()),
            read_only: AtomicBool::new(false),
        }
    }

    /// Create a store pre-populated with raw documents.
    pub fn with_documents<I, S>(documents: I) -> Self
    where
        I: IntoIterator<Item = (DocumentKey, S)>,
        S: Into<String>,
    {
        let store = Self::new();
        {
            let mut map = store.documents.write().expect("lock poisoned");
            for (key, contents) in documents {
                map.insert(key, contents.into());
            }
        }
        store
    }

    /// Make subsequent saves fail with [`StoreError::ReadOnly`].
    pub fn set_read_only(&self, read_only: bool) {
        self.read_only.store(read_only, Ordering::SeqCst);
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only.load(Ordering::SeqCst)
    }

    /// Number of documents currently stored.
    pub fn len(&self) -> usize {
        self.documents.read().expect("lock poisoned").len()
    }

    /// Returns `true` if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.documents.read().expect("lock poisoned").is_empty()
    }

    /// Remove all documents from the store.
    pub fn clear(&self) {
        self.documents.write().expect("lock poisoned").clear();
    }
}

impl Default for InMemoryDocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentStore for InMemoryDocumentStore {
    fn load(&self, key: DocumentKey) -> StoreResult<Option<String>> {
        let map = self.documents.read().expect("lock poisoned");
        Ok(map.get(&key).cloned())
    }

    fn save(&self, key: DocumentKey, contents: &str) -> StoreResult<()> {
        if self.is_read_only() {
            return Err(StoreError::ReadOnly);
        }
        let mut map = self.documents.write().expect("lock poisoned");
        map.insert(key, contents.to_string());
        Ok(())
    }
}

impl std::fmt::Debug for InMemoryDocumentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryDocumentStore")
            .field("document_count", &self.len())
            .field("read_only", &self.is_read_only())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::{load_json, save_json};

    #[test]
    fn save_and_load() {
        let store = InMemoryDocumentStore::new();
        store.save(DocumentKey::Teams, "[]").unwrap();
        assert_eq!(store.load(DocumentKey::Teams).unwrap().as_deref(), Some("[]"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn load_missing_returns_none() {
        let store = InMemoryDocumentStore::new();
        assert!(store.load(DocumentKey::Events).unwrap().is_none());
    }

    #[test]
    fn save_replaces_previous_document() {
        let store = InMemoryDocumentStore::new();
        store.save(DocumentKey::Categories, "[1]").unwrap();
        store.save(DocumentKey::Categories, "[2]").unwrap();
        assert_eq!(
            store.load(DocumentKey::Categories).unwrap().as_deref(),
            Some("[2]")
        );
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn read_only_rejects_writes_but_serves_reads() {
        let store = InMemoryDocumentStore::with_documents([(DocumentKey::Teams, "[]")]);
        store.set_read_only(true);

        assert!(matches!(
            store.save(DocumentKey::Teams, "[1]"),
            Err(StoreError::ReadOnly)
        ));
        assert_eq!(store.load(DocumentKey::Teams).unwrap().as_deref(), Some("[]"));

        store.set_read_only(false);
        store.save(DocumentKey::Teams, "[1]").unwrap();
    }

    #[test]
    fn json_helpers_roundtrip() {
        let store = InMemoryDocumentStore::new();
        save_json(&store, DocumentKey::Events, &vec![1u32, 2, 3]).unwrap();
        let loaded: Option<Vec<u32>> = load_json(&store, DocumentKey::Events).unwrap();
        assert_eq!(loaded, Some(vec![1, 2, 3]));
    }

    #[test]
    fn malformed_json_is_a_serialization_error() {
        let store = InMemoryDocumentStore::with_documents([(DocumentKey::Teams, "{not json")]);
        let err = load_json::<Vec<u32>>(&store, DocumentKey::Teams).unwrap_err();
        assert!(matches!(err, StoreError::Serialization(msg) if msg.starts_with("teams")));
    }

    #[test]
    fn clear_removes_all() {
        let store = InMemoryDocumentStore::new();
        for key in DocumentKey::ALL {
            store.save(key, "null").unwrap();
        }
        assert_eq!(store.len(), 4);
        store.clear();
        assert!(store.is_empty());
    }

    #[test]
    fn debug_format() {
        let store = InMemoryDocumentStore::new();
        let debug = format!("{store:?}");
        assert!(debug.contains("InMemoryDocumentStore"));
        assert!(debug.contains("document_count"));
    }
}
