//! Posts client for the edublog platform
//!
//! [`PostClient`] talks to the posts REST API, [`browse`] holds the listing
//! policy shared by the views, and [`controllers`] renders each user action
//! for the `edublog` command line front end.

pub mod browse;
pub mod client;
pub mod controllers;
pub mod error;
pub mod models;
pub mod state;
pub mod validation;

pub use browse::{BrowseRequest, PageFeed};
pub use client::PostClient;
pub use error::{PostError, PostResult};
pub use models::{ListQuery, NewPost, PageResult, Post, PostChanges};
pub use state::AppState;
