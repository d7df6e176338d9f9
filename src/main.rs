use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{TimeZone, Utc};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use testimonials::{FileStore, Review, ReviewStore, Storage};

#[derive(Parser)]
#[command(name = "testimonials")]
#[command(about = "Moderated site testimonials: submit, approve, publish")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Directory holding the persisted review collections
    #[arg(long, env = "TESTIMONIALS_DATA_DIR", default_value = ".testimonials")]
    data_dir: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Submit a review into the moderation queue
    Submit {
        /// Review text
        text: String,

        /// Display name to store with the review
        #[arg(long)]
        name: Option<String>,

        /// Attribute the review publicly instead of posting it anonymously
        #[arg(long)]
        signed: bool,
    },

    /// List reviews awaiting moderation
    Pending,

    /// Approve a pending review for public display
    Approve {
        /// Review id
        id: String,
    },

    /// Reject a pending review, removing it permanently
    Reject {
        /// Review id
        id: String,
    },

    /// Show the reviews the site currently displays
    Latest,

    /// Moderate the pending queue interactively
    Admin,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("testimonials=info".parse()?))
        .init();

    let cli = Cli::parse();

    let storage = FileStore::open(&cli.data_dir)
        .with_context(|| format!("Failed to open data directory: {}", cli.data_dir.display()))?;
    let mut store = ReviewStore::load(storage);

    match cli.command {
        Commands::Submit { text, name, signed } => {
            let review = store.submit(&text, name.as_deref(), !signed);
            println!("Queued for moderation (id: {})", review.id);
        }
        Commands::Pending => {
            list_pending(&store);
        }
        Commands::Approve { id } => {
            if store.approve(&id) {
                println!("Approved {}", id);
            } else {
                println!("No pending review with id {}", id);
            }
        }
        Commands::Reject { id } => {
            if store.reject(&id) {
                println!("Rejected {}", id);
            } else {
                println!("No pending review with id {}", id);
            }
        }
        Commands::Latest => {
            let latest = store.latest_approved();
            if latest.is_empty() {
                println!("No reviews to display.");
            }
            for review in latest {
                println!("{}", format_review(&review));
            }
        }
        Commands::Admin => {
            run_admin(&mut store)?;
        }
    }

    Ok(())
}

fn list_pending<S: Storage>(store: &ReviewStore<S>) {
    if store.pending_count() == 0 {
        println!("No pending reviews.");
        return;
    }

    println!("Pending reviews:\n");
    for review in store.pending() {
        println!("  {}", format_review(review));
        println!("    id: {}", review.id);
        println!();
    }
}

/// Interactive moderation loop over the pending queue. Runs while the
/// admin panel flag is open; `quit` or end of input closes it.
fn run_admin<S: Storage>(store: &mut ReviewStore<S>) -> Result<()> {
    store.open_admin();

    while store.is_admin_open() {
        if store.pending_count() == 0 {
            println!("No pending reviews.");
        } else {
            for (position, review) in store.pending().iter().enumerate() {
                println!("  [{}] {}", position + 1, format_review(review));
            }
        }

        print!("approve <n> | reject <n> | quit> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if io::stdin().read_line(&mut line)? == 0 {
            store.close_admin();
            continue;
        }

        let mut parts = line.split_whitespace();
        match (parts.next(), parts.next()) {
            (Some("approve" | "a"), Some(position)) => match pending_id_at(store, position) {
                Some(id) => {
                    if store.approve(&id) {
                        println!("Approved {}", id);
                    }
                }
                None => println!("No pending review at position {}", position),
            },
            (Some("reject" | "r"), Some(position)) => match pending_id_at(store, position) {
                Some(id) => {
                    if store.reject(&id) {
                        println!("Rejected {}", id);
                    }
                }
                None => println!("No pending review at position {}", position),
            },
            (Some("quit" | "q"), _) => store.close_admin(),
            (None, _) => {}
            _ => println!("Commands: approve <n>, reject <n>, quit"),
        }
    }

    Ok(())
}

/// Map a 1-based queue position to the id of the pending review there.
fn pending_id_at<S: Storage>(store: &ReviewStore<S>, position: &str) -> Option<String> {
    let position: usize = position.parse().ok()?;
    let index = position.checked_sub(1)?;
    store.pending().get(index).map(|review| review.id.clone())
}

fn format_review(review: &Review) -> String {
    let when = Utc
        .timestamp_millis_opt(review.created_at)
        .single()
        .map(|stamp| stamp.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| review.created_at.to_string());

    let who = if review.anonymous {
        "anonymous".to_string()
    } else {
        review.name.clone().unwrap_or_else(|| "unsigned".to_string())
    };

    format!("{} ({}, {})", review.text, who, when)
}
