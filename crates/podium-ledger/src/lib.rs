//! Scoring ledger for Podium.
//!
//! This crate owns the live festival state. It provides:
//! - `Scoreboard`, the lock-guarded ledger that keeps team tallies in step
//!   with event results and saves touched documents after each mutation
//! - `LedgerWriter` / `LedgerReader` trait boundaries
//! - Stable ranking by total points
//! - Dashboard projections (summary, medal boards)
//! - Tally validation against the recorded results
//! - Advisory notices for user-facing feedback

mod collection;
pub mod error;
pub mod notice;
pub mod projection;
pub mod ranking;
pub mod scoreboard;
pub mod traits;
pub mod validation;

pub use error::{LedgerError, PersistenceFailure};
pub use notice::{CollectingNotices, Notice, NoticeLevel, NoticeSink, SilentNotices};
pub use projection::{
    has_unpublished_changes, EventPodium, MedalBoard, MedalBoardEntry, PodiumPlace, ProjectionBuilder,
    ScoreboardSummary,
};
pub use ranking::rank;
pub use scoreboard::{Committed, ResultChange, Scoreboard};
pub use traits::{LedgerReader, LedgerWriter};
pub use validation::{
    expected_tallies, ExpectedTally, TallyReport, TallyValidator, TallyViolation, ViolationKind,
};
