//! Session model and related functionality

use serde::{Deserialize, Serialize};

use super::{Role, StoredUser};

/// A signed-in identity together with its opaque token
///
/// Sessions are replaced as a whole; there are no partial updates.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Session {
    pub user_id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub token: String,
}

impl Session {
    /// Rebuild a session from its persisted halves
    pub fn from_parts(user: StoredUser, token: String) -> Self {
        Self {
            user_id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            token,
        }
    }

    /// The user record persisted alongside the token
    pub fn user(&self) -> StoredUser {
        StoredUser {
            id: self.user_id.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
            role: self.role,
        }
    }

    /// Whether the session holds the given role
    pub fn has_role(&self, role: Role) -> bool {
        self.role == role
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("user_id", &self.user_id)
            .field("name", &self.name)
            .field("email", &self.email)
            .field("role", &self.role)
            .field("token", &"<redacted>")
            .finish()
    }
}
