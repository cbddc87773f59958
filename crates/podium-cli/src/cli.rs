use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use podium_types::Placement;

#[derive(Parser)]
#[command(
    name = "podium",
    about = "Podium: festival scoring ledger with medal tallies and published standings",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Directory holding the scoreboard documents
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Configuration file (defaults to ./podium.toml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Act as an editor; required for every change
    #[arg(long, global = true)]
    pub editor: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Add, update, remove, or list teams
    Team(TeamArgs),
    /// Add, remove, or list categories
    Category(CategoryArgs),
    /// Add, remove, or list events
    Event(EventArgs),
    /// Record or withdraw a team's placement in an event
    Result(ResultArgs),
    /// Publish the current standings
    Publish,
    /// Show teams ranked by total points
    Standings(StandingsArgs),
    /// List every holder of a placement
    Medals(MedalsArgs),
    /// Show dashboard counts
    Summary,
    /// Check team tallies against recorded results
    Verify,
}

#[derive(Args)]
pub struct TeamArgs {
    #[command(subcommand)]
    pub action: TeamAction,
}

#[derive(Subcommand)]
pub enum TeamAction {
    Add {
        name: String,
        #[arg(long, default_value = "")]
        logo: String,
    },
    Update {
        team: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        logo: Option<String>,
    },
    Remove {
        team: String,
    },
    List {
        /// List the published snapshot instead of the live ledger
        #[arg(long)]
        published: bool,
    },
}

#[derive(Args)]
pub struct CategoryArgs {
    #[command(subcommand)]
    pub action: CategoryAction,
}

#[derive(Subcommand)]
pub enum CategoryAction {
    Add { name: String },
    Remove { category: String },
    List,
}

#[derive(Args)]
pub struct EventArgs {
    #[command(subcommand)]
    pub action: EventAction,
}

#[derive(Subcommand)]
pub enum EventAction {
    Add {
        name: String,
        #[arg(long)]
        category: String,
    },
    Remove {
        event: String,
    },
    List {
        #[arg(long)]
        category: Option<String>,
        /// Show each event's published podium
        #[arg(long)]
        published: bool,
    },
}

#[derive(Args)]
pub struct ResultArgs {
    #[command(subcommand)]
    pub action: ResultAction,
}

#[derive(Subcommand)]
pub enum ResultAction {
    Set {
        event: String,
        team: String,
        /// gold, silver, bronze, non-winner, or no-entry
        placement: Placement,
    },
    Remove {
        event: String,
        team: String,
    },
}

#[derive(Args)]
pub struct StandingsArgs {
    /// Rank the published snapshot instead of the live ledger
    #[arg(long)]
    pub published: bool,
}

#[derive(Args)]
pub struct MedalsArgs {
    pub placement: Placement,
    /// Read the published snapshot instead of the live ledger
    #[arg(long)]
    pub published: bool,
}
