mod commands;
mod parse;
mod render;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use daybook_core::{DaybookConfig, EventStore, FileBackend, VideoType};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser)]
#[command(name = "daybook")]
#[command(about = "Create, edit and view your calendar events by day or week")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Schedule a new event
    New {
        /// Event title (defaults to the configured title)
        title: Option<String>,

        /// Start date/time (e.g. "2025-03-20T15:00" or "tomorrow 3pm").
        /// Defaults to now, rounded up to the next few minutes
        #[arg(short, long)]
        start: Option<String>,

        /// Duration in minutes, or e.g. "1h 30m"
        #[arg(short, long)]
        duration: Option<String>,

        /// Add an attendee (repeatable)
        #[arg(short, long = "attendee")]
        attendees: Vec<String>,

        /// Video call: none, zoom or meet
        #[arg(long)]
        video: Option<VideoType>,
    },
    /// Change fields of an existing event
    Edit {
        id: String,

        #[arg(short, long)]
        title: Option<String>,

        #[arg(short, long)]
        start: Option<String>,

        #[arg(short, long)]
        duration: Option<String>,

        /// Replace the attendee list (repeatable)
        #[arg(short, long = "attendee")]
        attendees: Vec<String>,

        /// Remove every attendee
        #[arg(long, conflicts_with = "attendees")]
        clear_attendees: bool,

        #[arg(long)]
        video: Option<VideoType>,
    },
    /// Delete an event
    Delete { id: String },
    /// Show one day's timeline
    Day {
        /// Date (YYYY-MM-DD, "today", "tomorrow", ...). Defaults to today
        date: Option<String>,

        /// Print the layout as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the Sunday-to-Saturday week containing a date
    Week {
        /// Any date in the week. Defaults to today
        date: Option<String>,
    },
}

fn main() -> Result<()> {
    init_logging()?;

    let cli = Cli::parse();
    let config = DaybookConfig::load()?;
    let mut store = open_store(&config)?;

    match cli.command {
        Commands::New {
            title,
            start,
            duration,
            attendees,
            video,
        } => commands::new::run(
            &mut store,
            &config,
            commands::new::NewArgs {
                title,
                start,
                duration,
                attendees,
                video,
            },
        ),
        Commands::Edit {
            id,
            title,
            start,
            duration,
            attendees,
            clear_attendees,
            video,
        } => commands::edit::run(
            &mut store,
            &id,
            commands::edit::EditArgs {
                title,
                start,
                duration,
                attendees,
                clear_attendees,
                video,
            },
        ),
        Commands::Delete { id } => commands::delete::run(&mut store, &id),
        Commands::Day { date, json } => {
            let date = parse::parse_date(date.as_deref())?;
            commands::day::run(&store, &config, date, json)
        }
        Commands::Week { date } => {
            let date = parse::parse_date(date.as_deref())?;
            commands::week::run(&store, date)
        }
    }
}

/// Log to stderr, filtered by RUST_LOG (warnings only by default).
fn init_logging() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set up logging")?;

    Ok(())
}

fn open_store(config: &DaybookConfig) -> Result<EventStore<FileBackend>> {
    let data_path = config.data_path();
    EventStore::open(FileBackend::new(&data_path))
        .with_context(|| format!("Failed to load events from {}", data_path.display()))
}
