//! Post models for the client

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Post as returned by the backend
///
/// `subject: None` and `tags: None` mean the field is absent, which is not
/// the same as an empty string or an empty list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Post {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "conteudo")]
    pub content: String,
    #[serde(rename = "autor")]
    pub author: String,
    #[serde(rename = "disciplina", default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(rename = "dataCriacao")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "dataAtualizacao")]
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// Whether the timestamps are ordered (`updated_at >= created_at`)
    pub fn has_consistent_timestamps(&self) -> bool {
        self.updated_at >= self.created_at
    }
}

/// New post creation payload
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct NewPost {
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "conteudo")]
    pub content: String,
    #[serde(rename = "autor")]
    pub author: String,
    #[serde(rename = "disciplina", default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

/// Post update payload
///
/// Only the fields that are set are sent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct PostChanges {
    #[serde(rename = "titulo", default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(rename = "conteudo", default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(rename = "autor", default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(rename = "disciplina", default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

impl PostChanges {
    /// Whether no field is set
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.content.is_none()
            && self.author.is_none()
            && self.subject.is_none()
            && self.tags.is_none()
    }
}

/// Parameters for listing posts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    /// Page number (1-based)
    pub page: u32,
    /// Number of items per page
    pub page_size: u32,
    /// Filter by author
    pub author: Option<String>,
    /// Filter by subject
    pub subject: Option<String>,
}

impl ListQuery {
    /// Unfiltered listing of one page
    pub fn page(page: u32, page_size: u32) -> Self {
        Self {
            page,
            page_size,
            author: None,
            subject: None,
        }
    }

    /// Restrict the listing to one author
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    /// Restrict the listing to one subject
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Query string pairs, in the backend's parameter names
    pub(crate) fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("page", self.page.to_string()),
            ("limit", self.page_size.to_string()),
        ];
        if let Some(author) = &self.author {
            params.push(("autor", author.clone()));
        }
        if let Some(subject) = &self.subject {
            params.push(("disciplina", subject.clone()));
        }
        params
    }
}

/// One page of posts plus pagination metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageResult {
    pub items: Vec<Post>,
    pub current_page: u32,
    pub total_pages: u32,
    pub total_items: u64,
    pub page_size: u32,
    pub search_term: Option<String>,
}

impl PageResult {
    /// Whether the page holds no posts
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether a later page exists
    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }

    /// Whether an earlier page exists
    pub fn has_previous(&self) -> bool {
        self.current_page > 1 && self.total_pages > 0
    }
}
