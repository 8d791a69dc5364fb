//! Post models and REST wire formats

pub mod post;
pub mod wire;

pub use post::{ListQuery, NewPost, PageResult, Post, PostChanges};
