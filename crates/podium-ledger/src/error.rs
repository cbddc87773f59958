use podium_store::{DocumentKey, StoreError};
use podium_types::{CategoryId, EventId, TeamId};

/// Errors produced by ledger operations.
///
/// A failed operation never changes ledger state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    #[error("team not found: {0}")]
    TeamNotFound(TeamId),

    #[error("event not found: {0}")]
    EventNotFound(EventId),

    #[error("category not found: {0}")]
    CategoryNotFound(CategoryId),

    #[error("category {category} is used by {events} event(s)")]
    CategoryInUse { category: CategoryId, events: usize },

    #[error("ledger lock poisoned")]
    LockPoisoned,
}

impl LedgerError {
    /// Returns `true` for the three not-found kinds.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::TeamNotFound(_) | Self::EventNotFound(_) | Self::CategoryNotFound(_)
        )
    }
}

/// A document that could not be saved after a committed mutation.
///
/// Soft error: the in-memory mutation stands regardless.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("failed to persist {key}: {reason}")]
pub struct PersistenceFailure {
    pub key: DocumentKey,
    pub reason: String,
}

impl PersistenceFailure {
    pub fn new(key: DocumentKey, error: &StoreError) -> Self {
        Self {
            key,
            reason: error.to_string(),
        }
    }
}
