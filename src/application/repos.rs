//! Repository traits describing the managed backend.

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::domain::entities::PostRecord;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("persistence error: {0}")]
    Persistence(String),
    #[error("resource not found")]
    NotFound,
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
    #[error("backend timeout")]
    Timeout,
    #[error("malformed backend response: {0}")]
    Decode(String),
}

impl RepoError {
    pub fn from_persistence(err: impl std::fmt::Display) -> Self {
        Self::Persistence(err.to_string())
    }
}

/// Columns written by the editor. `id`, `created_at` and `order_index` are
/// owned by the backend and never sent from here.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostWriteParams {
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    pub project_link: String,
    pub content: String,
    pub cover_image: String,
    pub published: bool,
    #[serde(rename = "type")]
    pub post_type: String,
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_id: Option<String>,
}

#[async_trait]
pub trait PostsRepo: Send + Sync {
    /// Every post, ordered `order_index` ascending then `created_at` descending.
    async fn fetch_initial(&self) -> Result<Vec<PostRecord>, RepoError>;

    /// Published non-project posts in listing order.
    async fn list_published_posts(&self) -> Result<Vec<PostRecord>, RepoError>;

    /// Published projects, newest first.
    async fn list_published_projects(&self) -> Result<Vec<PostRecord>, RepoError>;

    async fn find_by_slug(&self, slug: &str) -> Result<Option<PostRecord>, RepoError>;

    async fn find_by_id(&self, id: &str) -> Result<Option<PostRecord>, RepoError>;
}

#[async_trait]
pub trait PostsWriteRepo: Send + Sync {
    async fn update_order_index(&self, id: &str, order_index: i64) -> Result<(), RepoError>;

    async fn delete_post(&self, id: &str) -> Result<(), RepoError>;

    async fn create_post(&self, params: PostWriteParams) -> Result<PostRecord, RepoError>;

    async fn update_post(
        &self,
        id: &str,
        params: PostWriteParams,
    ) -> Result<PostRecord, RepoError>;
}
