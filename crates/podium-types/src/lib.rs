//! Foundation types for Podium, a festival standings ledger.
//!
//! This crate provides the identifiers, placements, scoring rules, and
//! entity shapes shared by every other Podium crate.
//!
//! # Key Types
//!
//! - [`TeamId`], [`EventId`], [`CategoryId`] -- UUID v7 identifiers
//! - [`Placement`] -- Gold / Silver / Bronze / Non-winner / No Entry
//! - [`points_for`] -- the scoring rule (10 / 7 / 5 / 1 / 0)
//! - [`MedalTally`] -- per-placement result counts for a team
//! - [`Team`], [`Category`], [`Event`], [`EventResult`] -- ledger entities
//! - [`PublishedScores`] -- the public snapshot

pub mod error;
pub mod event;
pub mod id;
pub mod medals;
pub mod placement;
pub mod published;
pub mod team;

pub use error::TypeError;
pub use event::{Event, EventResult};
pub use id::{CategoryId, EventId, TeamId};
pub use medals::MedalTally;
pub use placement::{points_for, points_for_label, Placement};
pub use published::PublishedScores;
pub use team::{Category, Team};
