use podium_types::{
    Category, CategoryId, Event, EventId, EventResult, Placement, PublishedScores, Team, TeamId,
};

use crate::error::LedgerError;
use crate::projection::{EventPodium, MedalBoard, ProjectionBuilder, ScoreboardSummary};
use crate::ranking::rank;
use crate::scoreboard::{Committed, ResultChange};
use crate::validation::{TallyReport, TallyValidator};

/// Write boundary for ledger mutations.
///
/// Every operation is atomic: it either applies fully or returns an error
/// and leaves the ledger untouched. Successful operations report documents
/// that failed to persist through [`Committed::persistence`] instead of
/// failing.
pub trait LedgerWriter: Send + Sync {
    fn add_team(&self, name: &str, logo: &str) -> Result<Committed<Team>, LedgerError>;

    fn update_team(
        &self,
        id: &TeamId,
        name: &str,
        logo: &str,
    ) -> Result<Committed<Team>, LedgerError>;

    /// Delete a team together with every result that references it.
    fn remove_team(&self, id: &TeamId) -> Result<Committed<Team>, LedgerError>;

    fn add_category(&self, name: &str) -> Result<Committed<Category>, LedgerError>;

    /// Delete a category no event references.
    fn remove_category(&self, id: &CategoryId) -> Result<Committed<Category>, LedgerError>;

    /// Create an event. The category reference is not checked.
    fn add_event(&self, name: &str, category: CategoryId) -> Result<Committed<Event>, LedgerError>;

    /// Delete an event, withdrawing its results from the teams' tallies.
    fn remove_event(&self, id: &EventId) -> Result<Committed<Event>, LedgerError>;

    /// Record or replace a team's placement in an event.
    fn set_result(
        &self,
        event: &EventId,
        team: &TeamId,
        placement: Placement,
    ) -> Result<Committed<ResultChange>, LedgerError>;

    /// Withdraw a team's result from an event. Returns the removed result,
    /// or `None` if the team had no result there.
    fn remove_result(
        &self,
        event: &EventId,
        team: &TeamId,
    ) -> Result<Committed<Option<EventResult>>, LedgerError>;

    /// Replace the published snapshot with a copy of the live ledger.
    fn publish(&self) -> Result<Committed<PublishedScores>, LedgerError>;
}

/// Read boundary for ledger queries.
///
/// Collections come back as owned copies in insertion order.
pub trait LedgerReader: Send + Sync {
    fn teams(&self) -> Result<Vec<Team>, LedgerError>;

    fn team(&self, id: &TeamId) -> Result<Option<Team>, LedgerError>;

    fn events(&self) -> Result<Vec<Event>, LedgerError>;

    fn event(&self, id: &EventId) -> Result<Option<Event>, LedgerError>;

    fn categories(&self) -> Result<Vec<Category>, LedgerError>;

    fn category(&self, id: &CategoryId) -> Result<Option<Category>, LedgerError>;

    fn published(&self) -> Result<PublishedScores, LedgerError>;

    fn events_in_category(&self, id: &CategoryId) -> Result<Vec<Event>, LedgerError> {
        Ok(self
            .events()?
            .into_iter()
            .filter(|e| &e.category == id)
            .collect())
    }

    /// Live teams, highest total first.
    fn ranked_teams(&self) -> Result<Vec<Team>, LedgerError> {
        Ok(rank(&self.teams()?))
    }

    /// Published teams, highest total first.
    fn published_ranking(&self) -> Result<Vec<Team>, LedgerError> {
        Ok(rank(&self.published()?.teams))
    }

    fn summary(&self) -> Result<ScoreboardSummary, LedgerError> {
        Ok(ProjectionBuilder::summary(
            &self.teams()?,
            &self.events()?,
            &self.categories()?,
            &self.published()?,
        ))
    }

    fn medal_board(&self, placement: Placement) -> Result<MedalBoard, LedgerError> {
        Ok(ProjectionBuilder::medal_board(
            placement,
            &self.teams()?,
            &self.events()?,
            &self.categories()?,
        ))
    }

    /// Holders of `placement` in the published snapshot. Category names come
    /// from the live ledger since the snapshot does not carry categories.
    fn published_medal_board(&self, placement: Placement) -> Result<MedalBoard, LedgerError> {
        let published = self.published()?;
        Ok(ProjectionBuilder::medal_board(
            placement,
            &published.teams,
            &published.events,
            &self.categories()?,
        ))
    }

    /// Per-event podiums from the published snapshot.
    fn published_podiums(&self) -> Result<Vec<EventPodium>, LedgerError> {
        let published = self.published()?;
        Ok(ProjectionBuilder::podiums(&published.teams, &published.events))
    }

    /// Check every team's tallies against the live results.
    fn verify(&self) -> Result<TallyReport, LedgerError> {
        Ok(TallyValidator::validate(&self.teams()?, &self.events()?))
    }
}
