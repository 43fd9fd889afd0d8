use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod cli;

use cli::board::ScorecardView;

#[derive(Parser)]
#[command(name = "beltboard")]
#[command(about = "Belt scorecards - points, levels, leaderboards and year-end archives")]
#[command(version)]
struct Cli {
    /// Path to the scoring document (defaults to ~/.beltboard/database.json)
    #[arg(short, long, global = true)]
    data: Option<PathBuf>,

    /// Path to the config file (defaults to ~/.beltboard/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the default config and an empty scoring document
    Init {
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },

    /// Register a new user at the base level
    Register {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        geo: Option<String>,
        /// Extra attributes as key=value
        #[arg(long = "attr")]
        attributes: Vec<String>,
    },

    /// Add (or with a negative value, remove) points in a pool
    Increment {
        user: String,
        pool: String,
        #[arg(default_value_t = 1, allow_negative_numbers = true)]
        points: i64,
        /// Link parameters as key=value (id, linkId, org, board, rowId, pool)
        #[arg(long)]
        link: Vec<String>,
        /// Award key; the increment is skipped when it was already claimed
        #[arg(long)]
        once: Option<String>,
    },

    /// Print the leaderboard chart
    Leaderboard {
        /// Include base-level users and emit at most this many rows
        #[arg(long)]
        max: Option<usize>,
    },

    /// Print one user's scorecard
    Scorecard {
        user: String,
        #[arg(long, value_enum, default_value_t)]
        view: ScorecardView,
    },

    /// Print every user's scorecard as a table
    Scorecards,

    /// Update a user's display name or external ids (key=value)
    UpdateUser { id: String, values: Vec<String> },

    /// Set pool points or properties on a user (key=value)
    SetPoints { id: String, values: Vec<String> },

    /// Users missing an external id attribute
    Missing { attribute: String },

    /// Add a task, or list tasks when no title is given
    Task {
        title: Option<String>,
        #[arg(long)]
        user: Option<String>,
    },

    /// Print the event log
    Events {
        /// Only the newest N events
        #[arg(long)]
        tail: Option<usize>,
    },

    /// Print the level table
    Levels {
        /// Fail when the configured thresholds are malformed
        #[arg(long)]
        check: bool,
        /// Promote users whose totals reached a higher level
        #[arg(long)]
        refresh: bool,
    },

    /// Archive the year's standings and reset, or print history without a year
    Archive { year: Option<String> },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let data = cli.data.as_deref();
    let config = cli.config.as_deref();

    match cli.command {
        Commands::Init { force } => {
            cli::init::init_command(data, config, force).await?;
        }
        Commands::Register {
            id,
            name,
            geo,
            attributes,
        } => {
            cli::user::register_command(data, config, &id, name, geo, &attributes).await?;
        }
        Commands::Increment {
            user,
            pool,
            points,
            link,
            once,
        } => {
            cli::points::increment_command(
                data,
                config,
                &user,
                &pool,
                points,
                &link,
                once.as_deref(),
            )
            .await?;
        }
        Commands::Leaderboard { max } => {
            cli::board::leaderboard_command(data, config, max).await?;
        }
        Commands::Scorecard { user, view } => {
            cli::board::scorecard_command(data, config, &user, view).await?;
        }
        Commands::Scorecards => {
            cli::board::scorecards_command(data, config).await?;
        }
        Commands::UpdateUser { id, values } => {
            cli::user::update_user_command(data, config, &id, &values).await?;
        }
        Commands::SetPoints { id, values } => {
            cli::user::set_points_command(data, config, &id, &values).await?;
        }
        Commands::Missing { attribute } => {
            cli::user::missing_command(data, config, &attribute).await?;
        }
        Commands::Task { title, user } => {
            cli::task::task_command(data, config, title.as_deref(), user.as_deref()).await?;
        }
        Commands::Events { tail } => {
            cli::board::events_command(data, config, tail).await?;
        }
        Commands::Levels { check, refresh } => {
            cli::board::levels_command(data, config, check, refresh).await?;
        }
        Commands::Archive { year } => {
            cli::archive::archive_command(data, config, year.as_deref()).await?;
        }
    }

    Ok(())
}
