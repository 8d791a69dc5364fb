//! Application state handed to the view controllers

use auth::{AuthGate, AuthProvider, DemoAuthProvider, SessionStore};
use common::{ClientConfig, FileStore, KeyValueStore};

use crate::browse::PageFeed;
use crate::client::PostClient;

/// Application state shared across controllers
pub struct AppState<S, P> {
    pub client: PostClient,
    pub gate: AuthGate<S, P>,
    pub feed: PageFeed,
    pub page_size: u32,
}

impl<S: KeyValueStore, P: AuthProvider> AppState<S, P> {
    /// Assemble the state from its parts, resolving the persisted session
    pub async fn new(
        client: PostClient,
        sessions: SessionStore<S>,
        provider: P,
        page_size: u32,
    ) -> Self {
        Self {
            client,
            gate: AuthGate::load(sessions, provider).await,
            feed: PageFeed::new(),
            page_size,
        }
    }

    /// Client carrying the active session's token, if there is one
    pub fn authorized_client(&self) -> PostClient {
        match self.gate.session() {
            Some(session) => self.client.clone().with_token(session.token.clone()),
            None => self.client.clone(),
        }
    }
}

impl AppState<FileStore, DemoAuthProvider> {
    /// Build the state used by the command line front end
    pub async fn from_config(config: &ClientConfig) -> anyhow::Result<Self> {
        let client = PostClient::from_config(config)?;
        let sessions = SessionStore::new(FileStore::new(config.session_path()));
        let provider = DemoAuthProvider::new();

        Ok(Self::new(client, sessions, provider, config.page_size).await)
    }
}
