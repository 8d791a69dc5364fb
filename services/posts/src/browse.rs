//! Browsing policy shared by the listing views
//!
//! Blank search terms fall back to a plain listing, and when queries overlap
//! only the most recently issued one is allowed to replace the page on
//! display.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::Mutex;
use tracing::debug;

use crate::client::PostClient;
use crate::error::PostResult;
use crate::models::{ListQuery, PageResult};

/// What the user asked to browse
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowseRequest {
    pub term: String,
    pub page: u32,
    pub page_size: u32,
}

impl BrowseRequest {
    /// Create a new browse request
    pub fn new(term: impl Into<String>, page: u32, page_size: u32) -> Self {
        Self {
            term: term.into(),
            page,
            page_size,
        }
    }

    /// Trimmed search term, or `None` when the request is a plain listing
    pub fn search_term(&self) -> Option<&str> {
        let term = self.term.trim();
        (!term.is_empty()).then_some(term)
    }
}

/// Run a browse request, searching only when there is a term to search for
pub async fn browse(client: &PostClient, request: &BrowseRequest) -> PostResult<PageResult> {
    match request.search_term() {
        Some(term) => client.search(term, request.page, request.page_size).await,
        None => {
            client
                .list(&ListQuery::page(request.page, request.page_size))
                .await
        }
    }
}

/// Sequence number handed out for each issued query
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

/// The page currently on display
///
/// Each query takes a [`Ticket`] before it is sent. A result is only shown
/// if no newer ticket has been issued in the meantime, so the last request
/// issued wins regardless of the order in which responses arrive.
#[derive(Debug, Clone, Default)]
pub struct PageFeed {
    issued: Arc<AtomicU64>,
    current: Arc<Mutex<Option<PageResult>>>,
}

impl PageFeed {
    /// Create an empty feed
    pub fn new() -> Self {
        Self::default()
    }

    /// Take a ticket for a query about to be sent
    pub fn issue(&self) -> Ticket {
        Ticket(self.issued.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Whether `ticket` belongs to the most recently issued query
    pub fn is_latest(&self, ticket: Ticket) -> bool {
        self.issued.load(Ordering::SeqCst) == ticket.0
    }

    /// Offer a resolved page; returns whether it replaced the displayed one
    pub async fn accept(&self, ticket: Ticket, page: PageResult) -> bool {
        let mut current = self.current.lock().await;
        if !self.is_latest(ticket) {
            debug!("Discarding superseded page result (ticket {})", ticket.0);
            return false;
        }
        *current = Some(page);
        true
    }

    /// The page currently on display
    pub async fn current(&self) -> Option<PageResult> {
        self.current.lock().await.clone()
    }

    /// Issue, run and offer a browse request in one step
    ///
    /// Returns the page when it was accepted, `None` when a newer request
    /// superseded it while it was in flight.
    pub async fn load(
        &self,
        client: &PostClient,
        request: &BrowseRequest,
    ) -> PostResult<Option<PageResult>> {
        let ticket = self.issue();
        let page = browse(client, request).await?;
        if self.accept(ticket, page.clone()).await {
            Ok(Some(page))
        } else {
            Ok(None)
        }
    }
}
