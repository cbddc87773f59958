use std::collections::HashSet;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::Utc;
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use podium_store::{load_json, save_json, DocumentKey, DocumentStore, InMemoryDocumentStore};
use podium_types::{
    points_for, Category, CategoryId, Event, EventId, EventResult, Placement, PublishedScores,
    Team, TeamId,
};

use crate::collection::Registry;
use crate::error::{LedgerError, PersistenceFailure};
use crate::notice::{Notice, NoticeSink, SilentNotices};
use crate::traits::{LedgerReader, LedgerWriter};
use crate::validation::expected_tallies;

/// Outcome of a successful mutation.
///
/// `persistence` lists documents that could not be saved afterwards. The
/// mutation itself stands either way.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Committed<T> {
    pub value: T,
    pub persistence: Vec<PersistenceFailure>,
}

impl<T> Committed<T> {
    /// Returns `true` if every touched document was saved.
    pub fn is_persisted(&self) -> bool {
        self.persistence.is_empty()
    }

    pub fn into_value(self) -> T {
        self.value
    }
}

/// What `set_result` did to a team's standing in one event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResultChange {
    /// The result that was replaced, if the team already had one.
    pub previous: Option<EventResult>,
    pub current: EventResult,
}

impl ResultChange {
    /// Net change applied to the team's total.
    pub fn point_delta(&self) -> i64 {
        i64::from(self.current.points) - self.previous.as_ref().map_or(0, |r| i64::from(r.points))
    }
}

/// The live scoring ledger.
///
/// Owns teams, events, categories, and the published snapshot. Every team's
/// `total_points` and `medals` always equal the aggregate of the results
/// that reference it. Mutations are serialized through a write lock; after
/// each committed mutation the touched documents are saved to the injected
/// [`DocumentStore`].
pub struct Scoreboard {
    inner: RwLock<LedgerState>,
    store: Arc<dyn DocumentStore>,
    notices: Arc<dyn NoticeSink>,
}

#[derive(Default)]
struct LedgerState {
    teams: Registry<TeamId, Team>,
    events: Registry<EventId, Event>,
    categories: Registry<CategoryId, Category>,
    published: PublishedScores,
}

impl LedgerState {
    /// Drop duplicate results and rebuild tallies from the results.
    /// Returns the number of teams whose tallies changed.
    fn reconcile(&mut self) -> usize {
        for event in self.events.values_mut() {
            let mut seen = HashSet::new();
            let before = event.results.len();
            event.results.retain(|r| seen.insert(r.team_id.clone()));
            if event.results.len() != before {
                warn!(
                    event = %event.id,
                    dropped = before - event.results.len(),
                    "dropped duplicate results"
                );
            }
        }

        let expected = expected_tallies(self.events.values());
        let mut repaired = 0;
        for team in self.teams.values_mut() {
            let want = expected.get(&team.id).copied().unwrap_or_default();
            if team.total_points != want.total_points || team.medals != want.medals {
                warn!(
                    team = %team.id,
                    stored = team.total_points,
                    computed = want.total_points,
                    "repaired team tally"
                );
                team.total_points = want.total_points;
                team.medals = want.medals;
                repaired += 1;
            }
        }
        repaired
    }
}

impl Scoreboard {
    /// Load the ledger from `store`.
    ///
    /// Missing or unreadable documents start empty; loading never fails.
    /// Team tallies are rebuilt from the loaded results if they disagree.
    pub fn open(store: Arc<dyn DocumentStore>, notices: Arc<dyn NoticeSink>) -> Self {
        let teams: Vec<Team> = load_or_default(store.as_ref(), DocumentKey::Teams);
        let events: Vec<Event> = load_or_default(store.as_ref(), DocumentKey::Events);
        let categories: Vec<Category> = load_or_default(store.as_ref(), DocumentKey::Categories);
        let published: PublishedScores =
            load_or_default(store.as_ref(), DocumentKey::PublishedScores);

        let mut state = LedgerState {
            teams: Registry::from_pairs(teams.into_iter().map(|t| (t.id.clone(), t))),
            events: Registry::from_pairs(events.into_iter().map(|e| (e.id.clone(), e))),
            categories: Registry::from_pairs(categories.into_iter().map(|c| (c.id.clone(), c))),
            published,
        };
        let repaired = state.reconcile();
        info!(
            teams = state.teams.len(),
            events = state.events.len(),
            categories = state.categories.len(),
            repaired,
            "scoreboard loaded"
        );

        Self {
            inner: RwLock::new(state),
            store,
            notices,
        }
    }

    /// An empty ledger backed by an in-memory store, with notices discarded.
    pub fn in_memory() -> Self {
        Self::open(
            Arc::new(InMemoryDocumentStore::new()),
            Arc::new(SilentNotices),
        )
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, LedgerState>, LedgerError> {
        self.inner.read().map_err(|_| LedgerError::LockPoisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, LedgerState>, LedgerError> {
        self.inner.write().map_err(|_| LedgerError::LockPoisoned)
    }

    fn persist(&self, state: &LedgerState, keys: &[DocumentKey]) -> Vec<PersistenceFailure> {
        let store = self.store.as_ref();
        keys.iter()
            .filter_map(|&key| {
                let saved = match key {
                    DocumentKey::Teams => {
                        save_json(store, key, &state.teams.values().collect::<Vec<_>>())
                    }
                    DocumentKey::Events => {
                        save_json(store, key, &state.events.values().collect::<Vec<_>>())
                    }
                    DocumentKey::Categories => {
                        save_json(store, key, &state.categories.values().collect::<Vec<_>>())
                    }
                    DocumentKey::PublishedScores => save_json(store, key, &state.published),
                };
                match saved {
                    Ok(()) => None,
                    Err(e) => {
                        warn!(%key, error = %e, "failed to persist document");
                        Some(PersistenceFailure::new(key, &e))
                    }
                }
            })
            .collect()
    }

    fn commit<T>(
        &self,
        state: &LedgerState,
        keys: &[DocumentKey],
        value: T,
        notice: Notice,
    ) -> Committed<T> {
        let persistence = self.persist(state, keys);
        self.notices.notify(notice);
        for failure in &persistence {
            self.notices
                .notify(Notice::error(format!("Could not save {}", failure.key)));
        }
        Committed { value, persistence }
    }

    fn reject<T>(&self, error: LedgerError, message: impl Into<String>) -> Result<T, LedgerError> {
        debug!(%error, "operation rejected");
        self.notices.notify(Notice::error(message));
        Err(error)
    }
}

impl LedgerWriter for Scoreboard {
    fn add_team(&self, name: &str, logo: &str) -> Result<Committed<Team>, LedgerError> {
        let mut state = self.write()?;
        let team = Team::new(name, logo);
        state.teams.insert(team.id.clone(), team.clone());
        info!(team = %team.id, name, "team added");

        let notice = Notice::success(format!("Team {name} added!"));
        Ok(self.commit(&state, &[DocumentKey::Teams], team, notice))
    }

    fn update_team(
        &self,
        id: &TeamId,
        name: &str,
        logo: &str,
    ) -> Result<Committed<Team>, LedgerError> {
        let mut state = self.write()?;
        let Some(team) = state.teams.get_mut(id) else {
            return self.reject(LedgerError::TeamNotFound(id.clone()), "Team not found");
        };
        team.name = name.to_string();
        team.logo = logo.to_string();
        let team = team.clone();
        info!(team = %id, name, "team updated");

        let notice = Notice::success(format!("Team {name} updated!"));
        Ok(self.commit(&state, &[DocumentKey::Teams], team, notice))
    }

    fn remove_team(&self, id: &TeamId) -> Result<Committed<Team>, LedgerError> {
        let mut state = self.write()?;
        let Some(team) = state.teams.remove(id) else {
            return self.reject(LedgerError::TeamNotFound(id.clone()), "Team not found");
        };

        let mut cascaded = 0;
        for event in state.events.values_mut() {
            let before = event.results.len();
            event.results.retain(|r| &r.team_id != id);
            cascaded += before - event.results.len();
        }
        info!(team = %id, cascaded, "team removed");

        let notice = Notice::success(format!("Team {} removed", team.name));
        Ok(self.commit(
            &state,
            &[DocumentKey::Teams, DocumentKey::Events],
            team,
            notice,
        ))
    }

    fn add_category(&self, name: &str) -> Result<Committed<Category>, LedgerError> {
        let mut state = self.write()?;
        let category = Category::new(name);
        state.categories.insert(category.id.clone(), category.clone());
        info!(category = %category.id, name, "category added");

        let notice = Notice::success(format!("Category {name} added!"));
        Ok(self.commit(&state, &[DocumentKey::Categories], category, notice))
    }

    fn remove_category(&self, id: &CategoryId) -> Result<Committed<Category>, LedgerError> {
        let mut state = self.write()?;
        let Some(category) = state.categories.get(id).cloned() else {
            return self.reject(LedgerError::CategoryNotFound(id.clone()), "Category not found");
        };

        let in_use = state.events.values().filter(|e| &e.category == id).count();
        if in_use > 0 {
            return self.reject(
                LedgerError::CategoryInUse {
                    category: id.clone(),
                    events: in_use,
                },
                format!(
                    "Cannot remove category {} as it is used by events",
                    category.name
                ),
            );
        }

        state.categories.remove(id);
        info!(category = %id, "category removed");

        let notice = Notice::success(format!("Category {} removed", category.name));
        Ok(self.commit(&state, &[DocumentKey::Categories], category, notice))
    }

    fn add_event(&self, name: &str, category: CategoryId) -> Result<Committed<Event>, LedgerError> {
        let mut state = self.write()?;
        if !state.categories.contains(&category) {
            debug!(%category, "event references an unknown category");
        }
        let event = Event::new(name, category);
        state.events.insert(event.id.clone(), event.clone());
        info!(event = %event.id, name, category = %event.category, "event added");

        let notice = Notice::success(format!("Event {name} added!"));
        Ok(self.commit(&state, &[DocumentKey::Events], event, notice))
    }

    fn remove_event(&self, id: &EventId) -> Result<Committed<Event>, LedgerError> {
        let mut state = self.write()?;
        let Some(event) = state.events.remove(id) else {
            return self.reject(LedgerError::EventNotFound(id.clone()), "Event not found");
        };

        for result in &event.results {
            if let Some(team) = state.teams.get_mut(&result.team_id) {
                team.medals.retract(result.placement);
                team.total_points = team.total_points.saturating_sub(result.points);
            }
        }
        info!(event = %id, results = event.results.len(), "event removed");

        let notice = Notice::success(format!("Event {} removed", event.name));
        Ok(self.commit(
            &state,
            &[DocumentKey::Teams, DocumentKey::Events],
            event,
            notice,
        ))
    }

    fn set_result(
        &self,
        event_id: &EventId,
        team_id: &TeamId,
        placement: Placement,
    ) -> Result<Committed<ResultChange>, LedgerError> {
        let mut state = self.write()?;
        let LedgerState { teams, events, .. } = &mut *state;

        let Some(event) = events.get_mut(event_id) else {
            return self.reject(
                LedgerError::EventNotFound(event_id.clone()),
                "Event or team not found",
            );
        };
        let Some(team) = teams.get_mut(team_id) else {
            return self.reject(
                LedgerError::TeamNotFound(team_id.clone()),
                "Event or team not found",
            );
        };

        let current = EventResult {
            team_id: team_id.clone(),
            placement,
            points: points_for(placement),
        };
        let previous = match event.results.iter_mut().find(|r| &r.team_id == team_id) {
            Some(slot) => Some(std::mem::replace(slot, current.clone())),
            None => {
                event.results.push(current.clone());
                None
            }
        };

        if let Some(old) = &previous {
            team.medals.retract(old.placement);
            team.total_points = team.total_points.saturating_sub(old.points);
        }
        team.medals.record(placement);
        team.total_points = team.total_points.saturating_add(current.points);

        let message = format!("Result updated for {} in {}", team.name, event.name);
        info!(event = %event_id, team = %team_id, %placement, "result recorded");

        let change = ResultChange { previous, current };
        Ok(self.commit(
            &state,
            &[DocumentKey::Teams, DocumentKey::Events],
            change,
            Notice::success(message),
        ))
    }

    fn remove_result(
        &self,
        event_id: &EventId,
        team_id: &TeamId,
    ) -> Result<Committed<Option<EventResult>>, LedgerError> {
        let mut state = self.write()?;
        let LedgerState { teams, events, .. } = &mut *state;

        let Some(event) = events.get_mut(event_id) else {
            return self.reject(
                LedgerError::EventNotFound(event_id.clone()),
                "Event or team not found",
            );
        };
        let Some(team) = teams.get_mut(team_id) else {
            return self.reject(
                LedgerError::TeamNotFound(team_id.clone()),
                "Event or team not found",
            );
        };

        let Some(index) = event.results.iter().position(|r| &r.team_id == team_id) else {
            debug!(event = %event_id, team = %team_id, "no result to remove");
            self.notices.notify(Notice::info(format!(
                "No result recorded for {} in {}",
                team.name, event.name
            )));
            return Ok(Committed {
                value: None,
                persistence: Vec::new(),
            });
        };

        let removed = event.results.remove(index);
        team.medals.retract(removed.placement);
        team.total_points = team.total_points.saturating_sub(removed.points);

        let message = format!("Result removed for {} in {}", team.name, event.name);
        info!(event = %event_id, team = %team_id, "result removed");

        Ok(self.commit(
            &state,
            &[DocumentKey::Teams, DocumentKey::Events],
            Some(removed),
            Notice::success(message),
        ))
    }

    fn publish(&self) -> Result<Committed<PublishedScores>, LedgerError> {
        let mut state = self.write()?;
        let snapshot = PublishedScores::new(state.teams.to_vec(), state.events.to_vec(), Utc::now());
        state.published = snapshot.clone();
        info!(
            teams = snapshot.teams.len(),
            events = snapshot.events.len(),
            "scores published"
        );

        Ok(self.commit(
            &state,
            &[DocumentKey::PublishedScores],
            snapshot,
            Notice::success("Scores published!"),
        ))
    }
}

impl LedgerReader for Scoreboard {
    fn teams(&self) -> Result<Vec<Team>, LedgerError> {
        Ok(self.read()?.teams.to_vec())
    }

    fn team(&self, id: &TeamId) -> Result<Option<Team>, LedgerError> {
        Ok(self.read()?.teams.get(id).cloned())
    }

    fn events(&self) -> Result<Vec<Event>, LedgerError> {
        Ok(self.read()?.events.to_vec())
    }

    fn event(&self, id: &EventId) -> Result<Option<Event>, LedgerError> {
        Ok(self.read()?.events.get(id).cloned())
    }

    fn categories(&self) -> Result<Vec<Category>, LedgerError> {
        Ok(self.read()?.categories.to_vec())
    }

    fn category(&self, id: &CategoryId) -> Result<Option<Category>, LedgerError> {
        Ok(self.read()?.categories.get(id).cloned())
    }

    fn published(&self) -> Result<PublishedScores, LedgerError> {
        Ok(self.read()?.published.clone())
    }
}

impl std::fmt::Debug for Scoreboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut out = f.debug_struct("Scoreboard");
        if let Ok(state) = self.inner.read() {
            out.field("teams", &state.teams.len())
                .field("events", &state.events.len())
                .field("categories", &state.categories.len());
        }
        out.finish_non_exhaustive()
    }
}

fn load_or_default<T: DeserializeOwned + Default>(store: &dyn DocumentStore, key: DocumentKey) -> T {
    match load_json(store, key) {
        Ok(Some(value)) => value,
        Ok(None) => T::default(),
        Err(e) => {
            warn!(%key, error = %e, "discarding unreadable document");
            T::default()
        }
    }
}
