use std::sync::Arc;

use anyhow::{bail, Context};
use colored::Colorize;
use serde::Serialize;
use serde_json::json;

use podium_ledger::{
    Committed, EventPodium, LedgerReader, LedgerWriter, MedalBoard, Notice, NoticeLevel, NoticeSink,
    PersistenceFailure, Scoreboard, SilentNotices,
};
use podium_store::FileDocumentStore;
use podium_types::{Category, CategoryId, Event, Placement, PublishedScores, Team};

use crate::access::{Action, Session};
use crate::cli::*;
use crate::config::CliConfig;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = CliConfig::load(cli.config.as_deref())?.with_overrides(cli.data_dir, cli.editor);
    let store = FileDocumentStore::open(&config.data_dir)
        .with_context(|| format!("cannot open data directory {}", config.data_dir.display()))?;
    let notices: Arc<dyn NoticeSink> = match cli.format {
        OutputFormat::Text => Arc::new(ConsoleNotices),
        OutputFormat::Json => Arc::new(SilentNotices),
    };

    let app = App {
        board: Scoreboard::open(Arc::new(store), notices),
        session: Session::new(config.editor),
        format: cli.format,
    };

    match cli.command {
        Command::Team(args) => app.team(args.action),
        Command::Category(args) => app.category(args.action),
        Command::Event(args) => app.event(args.action),
        Command::Result(args) => app.result(args.action),
        Command::Publish => app.publish(),
        Command::Standings(args) => app.standings(args.published),
        Command::Medals(args) => app.medals(args.placement, args.published),
        Command::Summary => app.summary(),
        Command::Verify => app.verify(),
    }
}

/// Prints ledger notices as they arrive.
struct ConsoleNotices;

impl NoticeSink for ConsoleNotices {
    fn notify(&self, notice: Notice) {
        match notice.level {
            NoticeLevel::Success => println!("{} {}", "✓".green().bold(), notice.message),
            NoticeLevel::Info => println!("{} {}", "•".cyan(), notice.message),
            NoticeLevel::Error => eprintln!("{} {}", "✗".red().bold(), notice.message.red()),
        }
    }
}

struct App {
    board: Scoreboard,
    session: Session,
    format: OutputFormat,
}

impl App {
    /// Viewers only ever see the published snapshot.
    fn published_view(&self, requested: bool) -> bool {
        requested || !self.session.is_editor()
    }

    fn standings_teams(&self, published: bool) -> anyhow::Result<Vec<Team>> {
        let ranked = if published {
            self.board.published_ranking()?
        } else {
            self.board.ranked_teams()?
        };
        Ok(ranked)
    }

    fn event_podiums(&self, category: Option<&CategoryId>) -> anyhow::Result<Vec<EventPodium>> {
        let podiums = self.board.published_podiums()?;
        let Some(category) = category else {
            return Ok(podiums);
        };
        let snapshot = self.board.published()?;
        Ok(podiums
            .into_iter()
            .filter(|podium| {
                snapshot
                    .events
                    .iter()
                    .any(|e| e.id == podium.event_id && &e.category == category)
            })
            .collect())
    }

    fn placement_board(&self, placement: Placement, published: bool) -> anyhow::Result<MedalBoard> {
        let board = if published {
            self.board.published_medal_board(placement)?
        } else {
            self.board.medal_board(placement)?
        };
        Ok(board)
    }

    fn emit<T: Serialize + ?Sized>(&self, value: &T, text: impl FnOnce()) -> anyhow::Result<()> {
        match self.format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(value)?),
            OutputFormat::Text => text(),
        }
        Ok(())
    }

    fn finish<T: Serialize>(&self, committed: Committed<T>, text: impl FnOnce(&T)) -> anyhow::Result<()> {
        warn_persistence(&committed.persistence);
        let value = committed.into_value();
        self.emit(&value, || text(&value))
    }

    fn team(&self, action: TeamAction) -> anyhow::Result<()> {
        match action {
            TeamAction::Add { name, logo } => {
                self.session.authorize(Action::ManageTeams)?;
                let committed = self.board.add_team(&name, &logo)?;
                self.finish(committed, |team| println!("  id: {}", team.id.to_string().dimmed()))
            }
            TeamAction::Update { team, name, logo } => {
                self.session.authorize(Action::ManageTeams)?;
                let teams = self.board.teams()?;
                let current = resolve_team(&teams, &team)?;
                let name = name.unwrap_or_else(|| current.name.clone());
                let logo = logo.unwrap_or_else(|| current.logo.clone());
                let committed = self.board.update_team(&current.id, &name, &logo)?;
                self.finish(committed, |_| {})
            }
            TeamAction::Remove { team } => {
                self.session.authorize(Action::ManageTeams)?;
                let teams = self.board.teams()?;
                let id = &resolve_team(&teams, &team)?.id;
                let committed = self.board.remove_team(id)?;
                self.finish(committed, |_| {})
            }
            TeamAction::List { published } => {
                let teams = if self.published_view(published) {
                    self.board.published()?.teams
                } else {
                    self.board.teams()?
                };
                self.emit(&teams, || {
                    if teams.is_empty() {
                        println!("No teams.");
                    }
                    for team in &teams {
                        println!(
                            "{}  {:<24} {:>5} pts  {}  {}",
                            team.id.short_id().dimmed(),
                            team.name.bold(),
                            team.total_points,
                            medal_line(team),
                            format!("({} medals)", team.medals.medal_count()).dimmed()
                        );
                    }
                })
            }
        }
    }

    fn category(&self, action: CategoryAction) -> anyhow::Result<()> {
        match action {
            CategoryAction::Add { name } => {
                self.session.authorize(Action::ManageCategories)?;
                let committed = self.board.add_category(&name)?;
                self.finish(committed, |c| println!("  id: {}", c.id.to_string().dimmed()))
            }
            CategoryAction::Remove { category } => {
                self.session.authorize(Action::ManageCategories)?;
                let categories = self.board.categories()?;
                let id = &resolve_category(&categories, &category)?.id;
                let committed = self.board.remove_category(id)?;
                self.finish(committed, |_| {})
            }
            CategoryAction::List => {
                let categories = self.board.categories()?;
                let events = if self.published_view(false) {
                    self.board.published()?.events
                } else {
                    self.board.events()?
                };
                self.emit(&categories, || {
                    if categories.is_empty() {
                        println!("No categories.");
                    }
                    for category in &categories {
                        let used = events.iter().filter(|e| e.category == category.id).count();
                        println!(
                            "{}  {:<24} {} event(s)",
                            category.id.short_id().dimmed(),
                            category.name.bold(),
                            used
                        );
                    }
                })
            }
        }
    }

    fn event(&self, action: EventAction) -> anyhow::Result<()> {
        match action {
            EventAction::Add { name, category } => {
                self.session.authorize(Action::ManageEvents)?;
                let categories = self.board.categories()?;
                let category = resolve_category(&categories, &category)?.id.clone();
                let committed = self.board.add_event(&name, category)?;
                self.finish(committed, |e| println!("  id: {}", e.id.to_string().dimmed()))
            }
            EventAction::Remove { event } => {
                self.session.authorize(Action::ManageEvents)?;
                let events = self.board.events()?;
                let id = &resolve_event(&events, &event)?.id;
                let committed = self.board.remove_event(id)?;
                self.finish(committed, |e| {
                    println!("  {} result(s) withdrawn", e.results.len());
                })
            }
            EventAction::List { category, published } => {
                let categories = self.board.categories()?;
                let category = match category {
                    Some(input) => Some(&resolve_category(&categories, &input)?.id),
                    None => None,
                };
                if self.published_view(published) {
                    return self.published_events(category);
                }
                let events = match category {
                    Some(id) => self.board.events_in_category(id)?,
                    None => self.board.events()?,
                };
                self.emit(&events, || {
                    if events.is_empty() {
                        println!("No events.");
                    }
                    for event in &events {
                        let category = categories
                            .iter()
                            .find(|c| c.id == event.category)
                            .map_or("Unknown Category", |c| c.name.as_str());
                        println!(
                            "{}  {:<24} {:<16} {} result(s)",
                            event.id.short_id().dimmed(),
                            event.name.bold(),
                            category.cyan(),
                            event.results.len()
                        );
                    }
                })
            }
        }
    }

    fn result(&self, action: ResultAction) -> anyhow::Result<()> {
        self.session.authorize(Action::RecordResults)?;
        let events = self.board.events()?;
        let teams = self.board.teams()?;
        match action {
            ResultAction::Set {
                event,
                team,
                placement,
            } => {
                let event = &resolve_event(&events, &event)?.id;
                let team = &resolve_team(&teams, &team)?.id;
                let committed = self.board.set_result(event, team, placement)?;
                warn_persistence(&committed.persistence);
                let change = committed.into_value();
                self.emit(&change.current, || {
                    let delta = change.point_delta();
                    println!(
                        "  {} ({} pts, {}{} total)",
                        change.current.placement.to_string().yellow(),
                        change.current.points,
                        if delta >= 0 { "+" } else { "" },
                        delta
                    );
                })
            }
            ResultAction::Remove { event, team } => {
                let event = &resolve_event(&events, &event)?.id;
                let team = &resolve_team(&teams, &team)?.id;
                let committed = self.board.remove_result(event, team)?;
                self.finish(committed, |_| {})
            }
        }
    }

    fn published_events(&self, category: Option<&CategoryId>) -> anyhow::Result<()> {
        let snapshot = self.board.published()?;
        let podiums = self.event_podiums(category)?;
        self.emit(&podiums, || {
            if !published_header(&snapshot) {
                return;
            }
            if podiums.is_empty() {
                println!("No events.");
            }
            for podium in &podiums {
                println!("{}", podium.event_name.bold());
                if podium.result_count == 0 {
                    println!("  {}", "No results recorded yet.".dimmed());
                }
                for place in &podium.places {
                    println!("  {:<7} {}", place.placement.label(), place.team_name.cyan());
                }
            }
        })
    }

    fn publish(&self) -> anyhow::Result<()> {
        self.session.authorize(Action::Publish)?;
        let committed = self.board.publish()?;
        self.finish(committed, |snapshot| {
            println!(
                "  {} team(s), {} event(s)",
                snapshot.teams.len(),
                snapshot.events.len()
            );
        })
    }

    fn standings(&self, requested: bool) -> anyhow::Result<()> {
        let published = self.published_view(requested);
        let ranked = self.standings_teams(published)?;
        let snapshot = if published {
            Some(self.board.published()?)
        } else {
            None
        };

        self.emit(&ranked, || {
            if let Some(snapshot) = &snapshot {
                if !published_header(snapshot) {
                    return;
                }
            }
            if ranked.is_empty() {
                println!("No teams.");
            }
            for (position, team) in competition_positions(&ranked).into_iter().zip(&ranked) {
                let place = format!("{position:>2}.");
                let place = match position {
                    1 => place.yellow().bold(),
                    2 | 3 => place.bold(),
                    _ => place.normal(),
                };
                println!(
                    "{place} {:<24} {:>5} pts  {}",
                    team.name,
                    team.total_points.to_string().bold(),
                    medal_line(team)
                );
            }
        })
    }

    fn medals(&self, placement: Placement, requested: bool) -> anyhow::Result<()> {
        let board = self.placement_board(placement, self.published_view(requested))?;
        self.emit(&board, || {
            println!("{}", placement.label().bold());
            if board.entries.is_empty() {
                println!("  none");
            }
            for entry in &board.entries {
                println!(
                    "  {} {} {}",
                    entry.event_name,
                    format!("({})", entry.category_name).dimmed(),
                    entry.team_name.cyan()
                );
            }
        })
    }

    fn summary(&self) -> anyhow::Result<()> {
        self.session.authorize(Action::ViewDrafts)?;
        let summary = self.board.summary()?;
        self.emit(&summary, || {
            println!("Teams:       {}", summary.team_count.to_string().bold());
            println!("Events:      {}", summary.event_count.to_string().bold());
            println!("Categories:  {}", summary.category_count.to_string().bold());
            println!("Medals:      {}", summary.medals_awarded.to_string().bold());
            match summary.last_published {
                Some(at) => println!("Published:   {}", at.format("%Y-%m-%d %H:%M UTC")),
                None => println!("Published:   {}", "never".dimmed()),
            }
            if summary.unpublished_changes {
                println!("{}", "There are unpublished changes.".yellow());
            }
        })
    }

    fn verify(&self) -> anyhow::Result<()> {
        self.session.authorize(Action::ViewDrafts)?;
        let report = self.board.verify()?;
        let descriptions: Vec<&str> = report
            .violations
            .iter()
            .map(|v| v.description.as_str())
            .collect();
        let body = json!({
            "teamsChecked": report.teams_checked,
            "resultsChecked": report.results_checked,
            "violations": descriptions,
        });
        self.emit(&body, || {
            if report.is_consistent() {
                println!(
                    "{} Tallies consistent: {} team(s), {} result(s)",
                    "✓".green().bold(),
                    report.teams_checked,
                    report.results_checked
                );
            }
            for violation in &report.violations {
                println!("{} {}", "✗".red().bold(), violation.description);
            }
        })?;
        if !report.is_consistent() {
            bail!("{} tally violation(s)", report.violations.len());
        }
        Ok(())
    }
}

fn warn_persistence(failures: &[PersistenceFailure]) {
    for failure in failures {
        eprintln!("{} {failure}", "warning:".yellow().bold());
    }
}

/// Prints when the snapshot was taken. Returns `false` if it never was.
fn published_header(snapshot: &PublishedScores) -> bool {
    if snapshot.is_unpublished() {
        println!("Scores have not been published yet.");
        return false;
    }
    if let Some(at) = snapshot.last_updated {
        println!("Published {}", at.format("%Y-%m-%d %H:%M UTC").to_string().dimmed());
    }
    true
}

fn medal_line(team: &Team) -> String {
    format!(
        "{} {}  {} {}  {} {}",
        "G".yellow(),
        team.medals.gold,
        "S".white(),
        team.medals.silver,
        "B".red(),
        team.medals.bronze
    )
}

/// 1-based positions where equal totals share a place ("1, 2, 2, 4").
fn competition_positions(ranked: &[Team]) -> Vec<usize> {
    let mut positions = Vec::with_capacity(ranked.len());
    for (index, team) in ranked.iter().enumerate() {
        let position = match (index.checked_sub(1), positions.last()) {
            (Some(prev), Some(&last)) if ranked[prev].total_points == team.total_points => last,
            _ => index + 1,
        };
        positions.push(position);
    }
    positions
}

fn resolve_team<'a>(teams: &'a [Team], input: &str) -> anyhow::Result<&'a Team> {
    resolve("team", teams, input, |t| t.id.to_string())
}

fn resolve_event<'a>(events: &'a [Event], input: &str) -> anyhow::Result<&'a Event> {
    resolve("event", events, input, |e| e.id.to_string())
}

fn resolve_category<'a>(categories: &'a [Category], input: &str) -> anyhow::Result<&'a Category> {
    resolve("category", categories, input, |c| c.id.to_string())
}

/// Find the item whose id equals `input` or is the only one starting with it.
fn resolve<'a, T>(
    kind: &str,
    items: &'a [T],
    input: &str,
    id_of: impl Fn(&T) -> String,
) -> anyhow::Result<&'a T> {
    let needle = input.trim().to_ascii_lowercase();
    if needle.is_empty() {
        bail!("empty {kind} id");
    }
    let id_of = |item: &T| id_of(item).to_ascii_lowercase();
    if let Some(exact) = items.iter().find(|item| id_of(item) == needle) {
        return Ok(exact);
    }
    let matches: Vec<&T> = items
        .iter()
        .filter(|item| id_of(item).starts_with(&needle))
        .collect();
    match matches.as_slice() {
        [only] => Ok(*only),
        [] => bail!("no {kind} matches '{input}'"),
        many => bail!(
            "'{input}' matches {} {kind} ids, use a longer prefix",
            many.len()
        ),
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use clap::Parser;

    use super::*;

    fn run(dir: &Path, args: &[&str]) -> anyhow::Result<()> {
        let dir = dir.to_str().unwrap();
        let mut argv = vec!["podium", "--data-dir", dir];
        argv.extend_from_slice(args);
        run_command(Cli::try_parse_from(argv).unwrap())
    }

    fn reopen(dir: &Path) -> Scoreboard {
        let store = FileDocumentStore::open(dir).unwrap();
        Scoreboard::open(Arc::new(store), Arc::new(SilentNotices))
    }

    fn app(dir: &Path, editor: bool) -> App {
        App {
            board: reopen(dir),
            session: Session::new(editor),
            format: OutputFormat::Json,
        }
    }

    /// Two teams and one "Solo" event; returns (team a, team b, event) ids.
    fn seed(path: &Path) -> (String, String, String) {
        run(path, &["--editor", "team", "add", "Falcons"]).unwrap();
        run(path, &["--editor", "team", "add", "Hawks"]).unwrap();
        run(path, &["--editor", "category", "add", "Dance"]).unwrap();
        let board = reopen(path);
        let category = board.categories().unwrap()[0].id.to_string();
        run(path, &["--editor", "event", "add", "Solo", "--category", &category]).unwrap();

        let board = reopen(path);
        let teams = board.teams().unwrap();
        let event = board.events().unwrap()[0].id.to_string();
        (teams[0].id.to_string(), teams[1].id.to_string(), event)
    }

    #[test]
    fn resolve_exact_and_prefix() {
        let ids = vec!["abc-1".to_string(), "abd-2".to_string()];
        let by_id = |s: &String| s.clone();
        assert_eq!(resolve("team", &ids, "abc-1", by_id).unwrap(), "abc-1");
        assert_eq!(resolve("team", &ids, "ABD", by_id).unwrap(), "abd-2");
    }

    #[test]
    fn resolve_rejects_ambiguous_and_missing() {
        let ids = vec!["abc-1".to_string(), "abd-2".to_string()];
        let by_id = |s: &String| s.clone();
        let err = resolve("team", &ids, "ab", by_id).unwrap_err();
        assert!(err.to_string().contains("matches 2"));
        assert!(resolve("team", &ids, "zz", by_id).is_err());
        assert!(resolve("team", &ids, "  ", by_id).is_err());
    }

    #[test]
    fn tied_teams_share_a_position() {
        let points = [25, 10, 10, 7];
        let teams: Vec<Team> = points
            .iter()
            .map(|&p| {
                let mut t = Team::new("T", "");
                t.total_points = p;
                t
            })
            .collect();
        assert_eq!(competition_positions(&teams), vec![1, 2, 2, 4]);
    }

    #[test]
    fn writes_require_editor() {
        let dir = tempfile::tempdir().unwrap();
        let err = run(dir.path(), &["team", "add", "Falcons"]).unwrap_err();
        assert!(err.to_string().contains("editor access required"));
        assert!(reopen(dir.path()).teams().unwrap().is_empty());
    }

    #[test]
    fn public_reads_do_not_require_editor() {
        let dir = tempfile::tempdir().unwrap();
        run(dir.path(), &["standings"]).unwrap();
        run(dir.path(), &["event", "list", "--format", "json"]).unwrap();
        run(dir.path(), &["medals", "gold"]).unwrap();
    }

    #[test]
    fn dashboard_reads_require_editor() {
        let dir = tempfile::tempdir().unwrap();
        let err = run(dir.path(), &["summary"]).unwrap_err();
        assert!(err.to_string().contains("view unpublished scores"));
        assert!(run(dir.path(), &["verify"]).is_err());
        run(dir.path(), &["--editor", "summary", "--format", "json"]).unwrap();
    }

    #[test]
    fn viewer_standings_ignore_unpublished_results() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path();
        let (falcons, _, event) = seed(path);
        run(path, &["--editor", "publish"]).unwrap();
        run(path, &["--editor", "result", "set", &event, &falcons, "gold"]).unwrap();
        run(path, &["standings"]).unwrap();

        let viewer = app(path, false);
        assert_eq!(viewer.standings_teams(viewer.published_view(false)).unwrap()[0].total_points, 0);
        assert!(viewer
            .placement_board(Placement::Gold, viewer.published_view(false))
            .unwrap()
            .entries
            .is_empty());

        let editor = app(path, true);
        assert_eq!(editor.standings_teams(editor.published_view(false)).unwrap()[0].total_points, 10);
        assert_eq!(editor.standings_teams(editor.published_view(true)).unwrap()[0].total_points, 0);
    }

    #[test]
    fn published_event_list_shows_podiums() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path();
        let (falcons, hawks, event) = seed(path);
        run(path, &["--editor", "result", "set", &event, &falcons, "gold"]).unwrap();
        run(path, &["--editor", "result", "set", &event, &hawks, "silver"]).unwrap();
        run(path, &["--editor", "publish"]).unwrap();
        run(path, &["--editor", "result", "remove", &event, &hawks]).unwrap();

        run(path, &["event", "list"]).unwrap();
        run(path, &["--editor", "event", "list", "--published"]).unwrap();
        run(path, &["medals", "silver", "--published"]).unwrap();

        let viewer = app(path, false);
        let podiums = viewer.event_podiums(None).unwrap();
        assert_eq!(podiums.len(), 1);
        let names: Vec<&str> = podiums[0].places.iter().map(|p| p.team_name.as_str()).collect();
        assert_eq!(names, ["Falcons", "Hawks"]);
        assert_eq!(podiums[0].places[1].placement, Placement::Silver);

        let board = reopen(path);
        let other = CategoryId::new();
        assert!(viewer.event_podiums(Some(&other)).unwrap().is_empty());
        let dance = &board.categories().unwrap()[0].id;
        assert_eq!(viewer.event_podiums(Some(dance)).unwrap().len(), 1);

        let editor = app(path, true);
        assert_eq!(viewer.placement_board(Placement::Silver, true).unwrap().entries.len(), 1);
        assert!(editor.placement_board(Placement::Silver, false).unwrap().entries.is_empty());
    }

    #[test]
    fn record_and_publish_flow() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path();
        run(path, &["--editor", "team", "add", "Falcons"]).unwrap();
        run(path, &["--editor", "category", "add", "Dance"]).unwrap();

        let category = reopen(path).categories().unwrap()[0].id.to_string();
        run(path, &["--editor", "event", "add", "Solo", "--category", &category[..8]]).unwrap();

        let board = reopen(path);
        let team = board.teams().unwrap()[0].id.to_string();
        let event = board.events().unwrap()[0].id.to_string();
        run(path, &["--editor", "result", "set", &event, &team, "gold"]).unwrap();
        run(path, &["--editor", "publish"]).unwrap();
        run(path, &["--editor", "verify"]).unwrap();

        let board = reopen(path);
        assert_eq!(board.teams().unwrap()[0].total_points, 10);
        assert_eq!(board.published().unwrap().teams[0].total_points, 10);
    }

    #[test]
    fn category_in_use_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path();
        run(path, &["--editor", "category", "add", "Music"]).unwrap();
        let category = reopen(path).categories().unwrap()[0].id.to_string();
        run(path, &["--editor", "event", "add", "Choir", "--category", &category]).unwrap();

        assert!(run(path, &["--editor", "category", "remove", &category]).is_err());
        assert_eq!(reopen(path).categories().unwrap().len(), 1);
    }

    #[test]
    fn event_add_requires_known_category() {
        let dir = tempfile::tempdir().unwrap();
        let orphan = CategoryId::new().to_string();
        let err = run(dir.path(), &["--editor", "event", "add", "Mystery", "--category", &orphan]).unwrap_err();
        assert!(err.to_string().contains("no category matches"));
        assert!(reopen(dir.path()).events().unwrap().is_empty());
    }
}
