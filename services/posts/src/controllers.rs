//! View controllers for the command line front end
//!
//! Each controller runs one user action against the client and renders the
//! outcome. Failures are rendered, never propagated: connectivity problems
//! get a retry hint, validation problems one line per field.

use std::io::{self, Write};

use auth::{Access, AuthError, AuthProvider, LoginCredentials, Role};
use common::KeyValueStore;
use tracing::error;

use crate::browse::BrowseRequest;
use crate::error::PostError;
use crate::models::{ListQuery, NewPost, PageResult, Post, PostChanges};
use crate::state::AppState;

/// Whether the action completed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Done,
    Failed,
}

impl Outcome {
    /// Whether the action completed
    pub fn is_done(&self) -> bool {
        *self == Outcome::Done
    }
}

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Render one page of posts with its pagination footer
pub fn render_page(out: &mut impl Write, page: &PageResult, with_ids: bool) -> io::Result<()> {
    if let Some(term) = &page.search_term {
        writeln!(out, "Results for \"{}\"", term)?;
    }

    if page.is_empty() {
        if page.search_term.is_some() {
            writeln!(out, "No posts match your search.")?;
        } else {
            writeln!(out, "No posts yet.")?;
        }
        return Ok(());
    }

    for post in &page.items {
        if with_ids {
            writeln!(out, "[{}] {}", post.id, post.title)?;
        } else {
            writeln!(out, "{}", post.title)?;
        }
        writeln!(out, "  {}", byline(post))?;
    }

    writeln!(
        out,
        "Page {} of {} ({} posts)",
        page.current_page, page.total_pages, page.total_items
    )?;
    Ok(())
}

/// Render a single post in full
pub fn render_post(out: &mut impl Write, post: &Post) -> io::Result<()> {
    writeln!(out, "{}", post.title)?;
    writeln!(out, "{}", byline(post))?;
    if post.updated_at != post.created_at {
        writeln!(out, "Updated {}", post.updated_at.format(DATE_FORMAT))?;
    }
    if let Some(tags) = post.tags.as_ref().filter(|tags| !tags.is_empty()) {
        writeln!(out, "Tags: {}", tags.join(", "))?;
    }
    writeln!(out)?;
    writeln!(out, "{}", post.content)?;
    Ok(())
}

fn byline(post: &Post) -> String {
    let mut line = format!("by {}", post.author);
    if let Some(subject) = post.subject.as_deref().filter(|s| !s.is_empty()) {
        line.push_str(&format!(" · {}", subject));
    }
    line.push_str(&format!(" · {}", post.created_at.format(DATE_FORMAT)));
    line
}

/// Render a failed operation
pub fn report_error(out: &mut impl Write, err: &PostError) -> io::Result<()> {
    match err {
        PostError::Connectivity { .. } => {
            error!("{}", err);
            writeln!(
                out,
                "Could not reach the server. Check that the backend is running and try again."
            )
        }
        PostError::Validation(messages) => {
            writeln!(out, "Please fix the following:")?;
            for message in messages {
                writeln!(out, "  - {}", message)?;
            }
            Ok(())
        }
        PostError::NotFound(_) => writeln!(out, "Post not found."),
        PostError::Rejected(message) => writeln!(out, "{}", message),
    }
}

/// Render an access decision; returns whether the view may proceed
pub fn report_access(
    out: &mut impl Write,
    access: Access,
    required: Option<Role>,
) -> io::Result<bool> {
    match access {
        Access::Allow => Ok(true),
        Access::Pending => {
            writeln!(out, "Checking authentication...")?;
            Ok(false)
        }
        Access::RedirectToLogin => {
            writeln!(out, "You need to sign in first: run `edublog login`.")?;
            Ok(false)
        }
        Access::Deny => {
            write!(out, "Access denied. You do not have permission to open this page.")?;
            if required == Some(Role::Professor) {
                write!(out, " Only professors can access this area.")?;
            }
            writeln!(out)?;
            Ok(false)
        }
    }
}

fn guard<S: KeyValueStore, P: AuthProvider>(
    state: &AppState<S, P>,
    out: &mut impl Write,
    required: Option<Role>,
) -> io::Result<bool> {
    report_access(out, state.gate.authorize(required), required)
}

/// Home listing, optionally filtered by author or subject
pub async fn list_posts<S: KeyValueStore, P: AuthProvider>(
    state: &AppState<S, P>,
    out: &mut impl Write,
    query: &ListQuery,
) -> io::Result<Outcome> {
    match state.client.list(query).await {
        Ok(page) => {
            render_page(out, &page, false)?;
            Ok(Outcome::Done)
        }
        Err(e) => {
            report_error(out, &e)?;
            Ok(Outcome::Failed)
        }
    }
}

/// Search, falling back to the plain listing for blank terms
pub async fn search_posts<S: KeyValueStore, P: AuthProvider>(
    state: &AppState<S, P>,
    out: &mut impl Write,
    request: &BrowseRequest,
) -> io::Result<Outcome> {
    match state.feed.load(&state.client, request).await {
        Ok(Some(page)) => {
            render_page(out, &page, false)?;
            Ok(Outcome::Done)
        }
        // A newer query owns the display.
        Ok(None) => Ok(Outcome::Done),
        Err(e) => {
            report_error(out, &e)?;
            Ok(Outcome::Failed)
        }
    }
}

/// Post detail
pub async fn show_post<S: KeyValueStore, P: AuthProvider>(
    state: &AppState<S, P>,
    out: &mut impl Write,
    id: &str,
) -> io::Result<Outcome> {
    match state.client.get_by_id(id).await {
        Ok(post) => {
            render_post(out, &post)?;
            Ok(Outcome::Done)
        }
        Err(e) => {
            report_error(out, &e)?;
            Ok(Outcome::Failed)
        }
    }
}

/// Create a post (professors only)
pub async fn create_post<S: KeyValueStore, P: AuthProvider>(
    state: &AppState<S, P>,
    out: &mut impl Write,
    post: &NewPost,
) -> io::Result<Outcome> {
    if !guard(state, out, Some(Role::Professor))? {
        return Ok(Outcome::Failed);
    }

    match state.authorized_client().create(post).await {
        Ok(created) => {
            writeln!(out, "Created post {}", created.id)?;
            render_post(out, &created)?;
            Ok(Outcome::Done)
        }
        Err(e) => {
            report_error(out, &e)?;
            Ok(Outcome::Failed)
        }
    }
}

/// Edit a post (professors only)
pub async fn edit_post<S: KeyValueStore, P: AuthProvider>(
    state: &AppState<S, P>,
    out: &mut impl Write,
    id: &str,
    changes: &PostChanges,
) -> io::Result<Outcome> {
    if !guard(state, out, Some(Role::Professor))? {
        return Ok(Outcome::Failed);
    }

    match state.authorized_client().update(id, changes).await {
        Ok(updated) => {
            writeln!(out, "Updated post {}", updated.id)?;
            render_post(out, &updated)?;
            Ok(Outcome::Done)
        }
        Err(e) => {
            report_error(out, &e)?;
            Ok(Outcome::Failed)
        }
    }
}

/// Administration listing with post IDs (professors only)
pub async fn admin_posts<S: KeyValueStore, P: AuthProvider>(
    state: &AppState<S, P>,
    out: &mut impl Write,
    page: u32,
) -> io::Result<Outcome> {
    if !guard(state, out, Some(Role::Professor))? {
        return Ok(Outcome::Failed);
    }
    admin_listing(state, out, page).await
}

async fn admin_listing<S: KeyValueStore, P: AuthProvider>(
    state: &AppState<S, P>,
    out: &mut impl Write,
    page: u32,
) -> io::Result<Outcome> {
    match state
        .authorized_client()
        .list(&ListQuery::page(page, state.page_size))
        .await
    {
        Ok(result) => {
            render_page(out, &result, true)?;
            Ok(Outcome::Done)
        }
        Err(e) => {
            report_error(out, &e)?;
            Ok(Outcome::Failed)
        }
    }
}

/// Delete a post, then re-fetch the administration page it was on
pub async fn delete_post<S: KeyValueStore, P: AuthProvider>(
    state: &AppState<S, P>,
    out: &mut impl Write,
    id: &str,
    page: u32,
) -> io::Result<Outcome> {
    if !guard(state, out, Some(Role::Professor))? {
        return Ok(Outcome::Failed);
    }

    if let Err(e) = state.authorized_client().delete(id).await {
        report_error(out, &e)?;
        return Ok(Outcome::Failed);
    }

    writeln!(out, "Deleted post {}", id)?;
    admin_listing(state, out, page).await
}

/// Sign in; an active session is reported instead of replaced
pub async fn login<S: KeyValueStore, P: AuthProvider>(
    state: &mut AppState<S, P>,
    out: &mut impl Write,
    credentials: &LoginCredentials,
) -> io::Result<Outcome> {
    if let Some(session) = state.gate.session() {
        writeln!(
            out,
            "Already signed in as {} ({}).",
            session.name, session.role
        )?;
        return Ok(Outcome::Done);
    }

    match state.gate.login(credentials).await {
        Ok(session) => {
            writeln!(out, "Welcome, {} ({}).", session.name, session.role)?;
            Ok(Outcome::Done)
        }
        Err(AuthError::InvalidInput(message)) => {
            writeln!(out, "{}", message)?;
            Ok(Outcome::Failed)
        }
        Err(AuthError::InvalidCredentials) => {
            writeln!(out, "Invalid email or password.")?;
            Ok(Outcome::Failed)
        }
        Err(e) => {
            error!("Login failed: {}", e);
            writeln!(out, "Could not sign in. Please try again.")?;
            Ok(Outcome::Failed)
        }
    }
}

/// Sign out
pub async fn logout<S: KeyValueStore, P: AuthProvider>(
    state: &mut AppState<S, P>,
    out: &mut impl Write,
) -> io::Result<Outcome> {
    if !state.gate.is_authenticated() {
        writeln!(out, "Not signed in.")?;
        return Ok(Outcome::Done);
    }

    match state.gate.logout().await {
        Ok(()) => {
            writeln!(out, "Signed out.")?;
            Ok(Outcome::Done)
        }
        Err(e) => {
            error!("Failed to clear session: {}", e);
            writeln!(out, "Signed out, but the saved session could not be removed.")?;
            Ok(Outcome::Failed)
        }
    }
}

/// Show who is signed in
pub fn whoami<S: KeyValueStore, P: AuthProvider>(
    state: &AppState<S, P>,
    out: &mut impl Write,
) -> io::Result<Outcome> {
    match state.gate.session() {
        Some(session) => {
            writeln!(
                out,
                "{} <{}> ({})",
                session.name, session.email, session.role
            )?;
        }
        None => writeln!(out, "Not signed in.")?,
    }
    Ok(Outcome::Done)
}

/// Report whether the backend is reachable
pub async fn health<S: KeyValueStore, P: AuthProvider>(
    state: &AppState<S, P>,
    out: &mut impl Write,
) -> io::Result<Outcome> {
    match state.client.health().await {
        Ok(true) => {
            writeln!(out, "Backend at {} is up.", state.client.base_url())?;
            Ok(Outcome::Done)
        }
        Ok(false) => {
            writeln!(out, "Backend at {} is not healthy.", state.client.base_url())?;
            Ok(Outcome::Failed)
        }
        Err(e) => {
            report_error(out, &e)?;
            Ok(Outcome::Failed)
        }
    }
}
