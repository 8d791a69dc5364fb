//! Credential verification
//!
//! The gate only ever talks to [`AuthProvider`]; swapping the demo accounts
//! for a real verification service means providing another implementation.

use std::future::Future;

use anyhow::Result;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString};
use tokio::sync::OnceCell;
use tracing::{debug, info};

use crate::error::{AuthError, AuthResult};
use crate::models::{LoginCredentials, Role, Session};

/// Verifies credentials and issues sessions
pub trait AuthProvider {
    /// Check the credentials, returning the session to persist on success
    fn authenticate(
        &self,
        credentials: &LoginCredentials,
    ) -> impl Future<Output = AuthResult<Session>> + Send;
}

/// Account known to the demo provider
struct DemoAccount {
    email: &'static str,
    password_hash: String,
    session: Session,
}

/// Provider backed by two fixed demo accounts, one per role
///
/// Password hashes are computed on the first authentication, so commands
/// that never sign in do not pay for them.
#[derive(Default)]
pub struct DemoAuthProvider {
    accounts: OnceCell<Vec<DemoAccount>>,
}

impl DemoAuthProvider {
    /// Email of the demo professor account
    pub const PROFESSOR_EMAIL: &'static str = "professor@blog.com";
    /// Email of the demo student account
    pub const STUDENT_EMAIL: &'static str = "aluno@blog.com";

    /// Create a new demo provider
    pub fn new() -> Self {
        Self::default()
    }

    async fn accounts(&self) -> AuthResult<&[DemoAccount]> {
        let accounts = self
            .accounts
            .get_or_try_init(|| async {
                demo_accounts().map_err(|e| AuthError::Provider(e.to_string()))
            })
            .await?;
        Ok(accounts.as_slice())
    }
}

fn demo_accounts() -> Result<Vec<DemoAccount>> {
    debug!("Hashing demo account passwords");
    Ok(vec![
        DemoAccount {
            email: DemoAuthProvider::PROFESSOR_EMAIL,
            password_hash: hash_password("professor123")?,
            session: Session {
                user_id: "1".to_string(),
                name: "Professor Demo".to_string(),
                email: DemoAuthProvider::PROFESSOR_EMAIL.to_string(),
                role: Role::Professor,
                token: "mock-jwt-token".to_string(),
            },
        },
        DemoAccount {
            email: DemoAuthProvider::STUDENT_EMAIL,
            password_hash: hash_password("aluno123")?,
            session: Session {
                user_id: "2".to_string(),
                name: "Aluno Demo".to_string(),
                email: DemoAuthProvider::STUDENT_EMAIL.to_string(),
                role: Role::Student,
                token: "mock-jwt-token-student".to_string(),
            },
        },
    ])
}

impl AuthProvider for DemoAuthProvider {
    async fn authenticate(&self, credentials: &LoginCredentials) -> AuthResult<Session> {
        info!("Authenticating user: {}", credentials.email);

        let account = self
            .accounts()
            .await?
            .iter()
            .find(|account| account.email == credentials.email)
            .ok_or(AuthError::InvalidCredentials)?;

        if !verify_password(&account.password_hash, &credentials.password)? {
            return Err(AuthError::InvalidCredentials);
        }

        Ok(account.session.clone())
    }
}

fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut rand::thread_rng());
    let argon2 = Argon2::default();
    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?
        .to_string();

    Ok(password_hash)
}

fn verify_password(password_hash: &str, password: &str) -> AuthResult<bool> {
    let parsed_hash = PasswordHash::new(password_hash)
        .map_err(|e| AuthError::Provider(format!("Failed to parse password hash: {}", e)))?;

    let argon2 = Argon2::default();
    let result = argon2.verify_password(password.as_bytes(), &parsed_hash);

    Ok(result.is_ok())
}
