use std::io::Write;
use std::process::ExitCode;

use anyhow::Result;
use auth::LoginCredentials;
use clap::{Parser, Subcommand};
use common::ClientConfig;
use common::telemetry::init_tracing;
use tracing::info;

use posts::controllers;
use posts::{AppState, BrowseRequest, ListQuery, NewPost, PostChanges};

/// Command line client for the edublog platform
#[derive(Debug, Parser)]
#[command(name = "edublog", version, about)]
struct Cli {
    /// Override the API base URL from the configuration
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Sign in with a demo account
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Sign out
    Logout,
    /// Show who is signed in
    Whoami,
    /// List posts
    List {
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long)]
        limit: Option<u32>,
        #[arg(long)]
        author: Option<String>,
        #[arg(long)]
        subject: Option<String>,
    },
    /// Search posts; a blank term lists everything
    Search {
        term: String,
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Show one post
    Show { id: String },
    /// Create a post (professors only)
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        author: String,
        #[arg(long)]
        content: String,
        #[arg(long)]
        subject: Option<String>,
        #[arg(long = "tag")]
        tags: Vec<String>,
    },
    /// Edit a post (professors only)
    Edit {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        author: Option<String>,
        #[arg(long)]
        content: Option<String>,
        #[arg(long)]
        subject: Option<String>,
        #[arg(long = "tag")]
        tags: Vec<String>,
    },
    /// Delete a post, then show the administration page again (professors only)
    Delete {
        id: String,
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// List posts with their IDs (professors only)
    Admin {
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Check that the backend is reachable
    Health,
}

/// Blank form fields are sent as absent
fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn non_empty(tags: Vec<String>) -> Option<Vec<String>> {
    (!tags.is_empty()).then_some(tags)
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    init_tracing("warn");

    let cli = Cli::parse();
    let mut config = ClientConfig::from_env()?;
    if let Some(api_url) = cli.api_url {
        config.api_url = api_url;
    }
    info!("Using API at {}", config.api_url);

    let mut state = AppState::from_config(&config).await?;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let page_size = state.page_size;

    let outcome = match cli.command {
        Command::Login { email, password } => {
            controllers::login(&mut state, &mut out, &LoginCredentials::new(email, password))
                .await?
        }
        Command::Logout => controllers::logout(&mut state, &mut out).await?,
        Command::Whoami => controllers::whoami(&state, &mut out)?,
        Command::List {
            page,
            limit,
            author,
            subject,
        } => {
            let query = ListQuery {
                page,
                page_size: limit.unwrap_or(page_size),
                author: non_blank(author),
                subject: non_blank(subject),
            };
            controllers::list_posts(&state, &mut out, &query).await?
        }
        Command::Search { term, page, limit } => {
            let request = BrowseRequest::new(term, page, limit.unwrap_or(page_size));
            controllers::search_posts(&state, &mut out, &request).await?
        }
        Command::Show { id } => controllers::show_post(&state, &mut out, &id).await?,
        Command::Create {
            title,
            author,
            content,
            subject,
            tags,
        } => {
            let post = NewPost {
                title,
                content,
                author,
                subject: non_blank(subject),
                tags: non_empty(tags),
            };
            controllers::create_post(&state, &mut out, &post).await?
        }
        Command::Edit {
            id,
            title,
            author,
            content,
            subject,
            tags,
        } => {
            let changes = PostChanges {
                title,
                content,
                author,
                subject: non_blank(subject),
                tags: non_empty(tags),
            };
            controllers::edit_post(&state, &mut out, &id, &changes).await?
        }
        Command::Delete { id, page } => {
            controllers::delete_post(&state, &mut out, &id, page).await?
        }
        Command::Admin { page } => controllers::admin_posts(&state, &mut out, page).await?,
        Command::Health => controllers::health(&state, &mut out).await?,
    };
    out.flush()?;

    Ok(if outcome.is_done() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
