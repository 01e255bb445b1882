mod commands;
mod db;
mod models;
mod store;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use db::Desk;

#[derive(Parser)]
#[command(name = "officehub")]
#[command(about = "A local-first support desk: ticket chats, unread tracking, service ratings")]
#[command(version)]
struct Cli {
    /// Simulated backend latency in milliseconds before every read/write
    #[arg(long, global = true, env = "OFFICEHUB_LATENCY_MS", default_value_t = 0)]
    latency_ms: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize officehub in the current directory
    Init,

    /// Open a new support ticket
    Open {
        /// Ticket subject
        subject: String,
        /// Client the ticket belongs to
        #[arg(short, long)]
        client: String,
        /// Ticket description (seeds the first message for client tickets)
        #[arg(short, long, default_value = "")]
        description: String,
        /// Priority (low, medium, high, critical)
        #[arg(short, long, default_value = "medium")]
        priority: String,
        /// Who opens the ticket (support, client)
        #[arg(short, long, default_value = "support")]
        actor: String,
    },

    /// List tickets, most recently updated first
    List {
        /// Case-insensitive substring match on client name or subject
        #[arg(short, long)]
        search: Option<String>,
        /// Filter by status (open, in_progress, done, cancelled, all)
        #[arg(long)]
        status: Option<String>,
    },

    /// Show a ticket's conversation and mark the viewer's side read
    Show {
        /// Ticket id
        id: String,
        /// Which side is looking (support, client)
        #[arg(short, long, default_value = "support")]
        viewer: String,
    },

    /// Append a message to a ticket
    Reply {
        /// Ticket id
        id: String,
        /// Message text
        text: String,
        /// Sender side (support, client)
        #[arg(short = 'a', long = "as", default_value = "support")]
        sender: String,
    },

    /// Move an open ticket to in progress
    Start {
        /// Ticket id
        id: String,
    },

    /// Finish an in-progress ticket
    Done {
        /// Ticket id
        id: String,
    },

    /// Cancel an open or in-progress ticket
    Cancel {
        /// Ticket id
        id: String,
    },

    /// Reopen a done or cancelled ticket
    Reopen {
        /// Ticket id
        id: String,
    },

    /// Delete a ticket and its messages
    Delete {
        /// Ticket id
        id: String,
        /// Skip confirmation
        #[arg(short, long)]
        force: bool,
    },

    /// Record a service rating (1-5)
    Rate {
        /// Satisfaction score, 1 to 5
        score: u8,
        /// Client the rating came from
        #[arg(short, long)]
        client: String,
        /// Ticket the rating refers to
        #[arg(short, long)]
        ticket: Option<String>,
        /// Free-form comment
        #[arg(long)]
        comment: Option<String>,
    },

    /// List ratings, newest first, with NPS bands
    Ratings,

    /// Dump all tables as a JSON backup
    Export {
        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Restore tables from a JSON backup
    Import {
        /// Backup file produced by export
        file: String,
    },
}

fn find_officehub_dir() -> Result<PathBuf> {
    let mut current = env::current_dir()?;

    loop {
        let candidate = current.join(".officehub");
        if candidate.exists() && candidate.is_dir() {
            return Ok(candidate);
        }

        if !current.pop() {
            bail!("Not an officehub directory (or any parent). Run 'officehub init' first.");
        }
    }
}

fn get_desk(latency_ms: u64) -> Result<Desk> {
    let officehub_dir = find_officehub_dir()?;
    let mut desk =
        Desk::open(&officehub_dir.join("local.db")).context("Failed to open local store")?;
    desk.store_mut()
        .set_latency(Duration::from_millis(latency_ms));
    Ok(desk)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init => {
            let cwd = env::current_dir()?;
            commands::init::run(&cwd)
        }

        Commands::Open {
            subject,
            client,
            description,
            priority,
            actor,
        } => {
            let desk = get_desk(cli.latency_ms)?;
            commands::open::run(&desk, &actor, &client, &subject, &description, &priority)
        }

        Commands::List { search, status } => {
            let desk = get_desk(cli.latency_ms)?;
            commands::list::run(&desk, search.as_deref(), status.as_deref())
        }

        Commands::Show { id, viewer } => {
            let desk = get_desk(cli.latency_ms)?;
            commands::show::run(&desk, &id, &viewer)
        }

        Commands::Reply { id, text, sender } => {
            let desk = get_desk(cli.latency_ms)?;
            commands::reply::run(&desk, &id, &sender, &text)
        }

        Commands::Start { id } => {
            let desk = get_desk(cli.latency_ms)?;
            commands::status::start(&desk, &id)
        }

        Commands::Done { id } => {
            let desk = get_desk(cli.latency_ms)?;
            commands::status::done(&desk, &id)
        }

        Commands::Cancel { id } => {
            let desk = get_desk(cli.latency_ms)?;
            commands::status::cancel(&desk, &id)
        }

        Commands::Reopen { id } => {
            let desk = get_desk(cli.latency_ms)?;
            commands::status::reopen(&desk, &id)
        }

        Commands::Delete { id, force } => {
            let desk = get_desk(cli.latency_ms)?;
            commands::delete::run(&desk, &id, force)
        }

        Commands::Rate {
            score,
            client,
            ticket,
            comment,
        } => {
            let desk = get_desk(cli.latency_ms)?;
            commands::rate::add(&desk, score, &client, ticket.as_deref(), comment.as_deref())
        }

        Commands::Ratings => {
            let desk = get_desk(cli.latency_ms)?;
            commands::rate::list(&desk)
        }

        Commands::Export { output } => {
            let desk = get_desk(cli.latency_ms)?;
            commands::export::run_export(&desk, output.as_deref())
        }

        Commands::Import { file } => {
            let desk = get_desk(cli.latency_ms)?;
            commands::export::run_import(&desk, &file)
        }
    }
}
