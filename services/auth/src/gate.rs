//! Authentication state machine and route access decisions

use common::KeyValueStore;
use tracing::{info, warn};

use crate::error::{AuthError, AuthResult};
use crate::models::{LoginCredentials, Role, Session};
use crate::provider::AuthProvider;
use crate::session::SessionStore;
use crate::validation::{validate_email, validate_password};

/// Authentication state held by the gate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthState {
    /// The persisted session has not been read yet
    Unknown,
    /// Nobody is signed in
    Anonymous,
    /// A session is active
    Authenticated(Session),
}

/// Outcome of an access check for a protected view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// The session has not been resolved yet; show a pending indicator
    Pending,
    /// The view may render
    Allow,
    /// Nobody is signed in; send the user to the login view
    RedirectToLogin,
    /// Signed in with the wrong role; render an access-denied message in place
    Deny,
}

impl AuthState {
    /// Decide whether a protected view requiring `required` may render
    pub fn authorize(&self, required: Option<Role>) -> Access {
        match (self, required) {
            (AuthState::Unknown, _) => Access::Pending,
            (AuthState::Anonymous, _) => Access::RedirectToLogin,
            (AuthState::Authenticated(_), None) => Access::Allow,
            (AuthState::Authenticated(session), Some(role)) if session.has_role(role) => {
                Access::Allow
            }
            (AuthState::Authenticated(_), Some(_)) => Access::Deny,
        }
    }
}

/// Gate deciding who is signed in and what they may open
///
/// Consumers receive the gate explicitly; there is no ambient auth context.
pub struct AuthGate<S, P> {
    sessions: SessionStore<S>,
    provider: P,
    state: AuthState,
}

impl<S: KeyValueStore, P: AuthProvider> AuthGate<S, P> {
    /// Create a new gate in the `Unknown` state
    pub fn new(sessions: SessionStore<S>, provider: P) -> Self {
        Self {
            sessions,
            provider,
            state: AuthState::Unknown,
        }
    }

    /// Create a gate and resolve the persisted session straight away
    pub async fn load(sessions: SessionStore<S>, provider: P) -> Self {
        let mut gate = Self::new(sessions, provider);
        gate.initialize().await;
        gate
    }

    /// Resolve the initial state from the persisted session
    ///
    /// Only the first call has an effect.
    pub async fn initialize(&mut self) {
        if self.state != AuthState::Unknown {
            return;
        }

        self.state = match self.sessions.load().await {
            Some(session) => AuthState::Authenticated(session),
            None => AuthState::Anonymous,
        };
    }

    /// Current state
    pub fn state(&self) -> &AuthState {
        &self.state
    }

    /// Active session, if any
    pub fn session(&self) -> Option<&Session> {
        match &self.state {
            AuthState::Authenticated(session) => Some(session),
            _ => None,
        }
    }

    /// Whether a session is active
    pub fn is_authenticated(&self) -> bool {
        self.session().is_some()
    }

    /// Whether the initial session load is still outstanding
    pub fn is_loading(&self) -> bool {
        self.state == AuthState::Unknown
    }

    /// Decide whether a protected view requiring `required` may render
    pub fn authorize(&self, required: Option<Role>) -> Access {
        self.state.authorize(required)
    }

    /// Sign in with the given credentials
    ///
    /// On any failure the gate is left `Anonymous`.
    pub async fn login(&mut self, credentials: &LoginCredentials) -> AuthResult<Session> {
        if self.is_authenticated() {
            return Err(AuthError::AlreadyAuthenticated);
        }
        self.state = AuthState::Anonymous;

        validate_email(&credentials.email).map_err(AuthError::InvalidInput)?;
        validate_password(&credentials.password).map_err(AuthError::InvalidInput)?;

        let session = match self.provider.authenticate(credentials).await {
            Ok(session) => session,
            Err(e) => {
                warn!("Login failed for {}: {}", credentials.email, e);
                return Err(e);
            }
        };

        self.sessions.save(&session).await?;
        info!("User {} signed in as {}", session.user_id, session.role);

        self.state = AuthState::Authenticated(session.clone());
        Ok(session)
    }

    /// Sign out and forget the persisted session
    ///
    /// The gate is `Anonymous` afterwards even if the store reports an error.
    pub async fn logout(&mut self) -> AuthResult<()> {
        if let Some(session) = self.session() {
            info!("User {} signed out", session.user_id);
        }
        self.state = AuthState::Anonymous;
        self.sessions.clear().await?;
        Ok(())
    }
}
