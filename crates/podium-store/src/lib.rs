//! Document persistence for the Podium standings ledger.
//!
//! The ledger persists four whole documents (`teams`, `events`,
//! `categories`, `publishedScores`) through the [`DocumentStore`] trait. The
//! store is a plain key-value adapter: it never interprets what it holds.
//!
//! # Storage Backends
//!
//! - [`InMemoryDocumentStore`] -- `HashMap`-based store for tests and embedding
//! - [`FileDocumentStore`] -- one JSON file per document under a directory
//!
//! # Design Rules
//!
//! 1. Documents are replaced whole on save, never patched.
//! 2. A missing document is `Ok(None)`, not an error.
//! 3. Decoding failures surface as [`StoreError::Serialization`]; deciding
//!    what to do with a malformed document is the caller's business.

pub mod error;
pub mod file;
pub mod memory;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use file::FileDocumentStore;
pub use memory::InMemoryDocumentStore;
pub use traits::{load_json, save_json, DocumentKey, DocumentStore};
