//! Authentication for the edublog client
//!
//! Holds the signed-in session ([`SessionStore`]), verifies credentials
//! through an [`AuthProvider`] and decides access to protected views with
//! the [`AuthGate`].

pub mod error;
pub mod gate;
pub mod models;
pub mod provider;
pub mod session;
pub mod validation;

pub use error::{AuthError, AuthResult};
pub use gate::{Access, AuthGate, AuthState};
pub use models::{LoginCredentials, Role, Session, StoredUser};
pub use provider::{AuthProvider, DemoAuthProvider};
pub use session::SessionStore;
