//! Common library for the edublog client
//!
//! This crate provides functionality shared by the client crates: key-value
//! persistence for local state, configuration loading, error types and
//! tracing setup.
//!
//! ```rust,no_run
//! use common::{ClientConfig, FileStore, KeyValueStore};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ClientConfig::from_env()?;
//!     let store = FileStore::new(config.session_path());
//!     let token = store.get("token").await?;
//!     println!("Stored token present: {}", token.is_some());
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod storage;
pub mod telemetry;

pub use config::ClientConfig;
pub use error::{SettingsError, SettingsResult, StorageError, StorageResult};
pub use storage::{FileStore, KeyValueStore, MemoryStore};
