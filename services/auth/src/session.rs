//! Session persistence on top of a key-value store

use common::{KeyValueStore, StorageResult};
use tracing::{debug, info, warn};

use crate::models::{Session, StoredUser};

/// Key holding the serialized user record
pub const USER_KEY: &str = "user";
/// Key holding the opaque session token
pub const TOKEN_KEY: &str = "token";

/// Session store for persisting the signed-in session
///
/// A session only exists when both the user record and the token are
/// present; anything less reads back as no session.
#[derive(Debug, Clone)]
pub struct SessionStore<S> {
    store: S,
}

impl<S: KeyValueStore> SessionStore<S> {
    /// Create a new session store
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Access the underlying key-value store
    pub fn inner(&self) -> &S {
        &self.store
    }

    /// Read the persisted session, if any
    ///
    /// Never fails: unreadable or malformed data is reported as no session.
    pub async fn load(&self) -> Option<Session> {
        let user = match self.store.get(USER_KEY).await {
            Ok(user) => user,
            Err(e) => {
                warn!("Failed to read persisted user: {}", e);
                return None;
            }
        };
        let token = match self.store.get(TOKEN_KEY).await {
            Ok(token) => token,
            Err(e) => {
                warn!("Failed to read persisted token: {}", e);
                return None;
            }
        };

        let (Some(user), Some(token)) = (user, token) else {
            debug!("No complete session persisted");
            return None;
        };

        match serde_json::from_str::<StoredUser>(&user) {
            Ok(user) => {
                info!("Loaded session for user: {}", user.id);
                Some(Session::from_parts(user, token))
            }
            Err(e) => {
                warn!("Ignoring malformed persisted user record: {}", e);
                None
            }
        }
    }

    /// Persist a session, replacing whatever was stored before
    ///
    /// If the token cannot be written the user record is removed again so
    /// the partial write is never loaded.
    pub async fn save(&self, session: &Session) -> StorageResult<()> {
        info!("Saving session for user: {}", session.user_id);

        let user = serde_json::to_string(&session.user())?;
        self.store.set(USER_KEY, &user).await?;

        if let Err(e) = self.store.set(TOKEN_KEY, &session.token).await {
            warn!("Failed to persist token, rolling back user record: {}", e);
            if let Err(rollback) = self.store.delete(USER_KEY).await {
                warn!("Failed to roll back user record: {}", rollback);
            }
            return Err(e);
        }

        Ok(())
    }

    /// Remove the persisted session
    ///
    /// Safe to call when nothing is stored.
    pub async fn clear(&self) -> StorageResult<()> {
        info!("Clearing persisted session");

        self.store.delete(USER_KEY).await?;
        self.store.delete(TOKEN_KEY).await?;

        Ok(())
    }
}
