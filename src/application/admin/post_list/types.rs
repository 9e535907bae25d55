use serde::Serialize;
use thiserror::Error;

use crate::application::pagination::PageWindow;
use crate::domain::{entities::PostRecord, posts::Bucket};

use super::reorder::OrderUpdate;

pub const DELETE_PROMPT: &str =
    "Are you sure you want to delete this post? This action cannot be undone.";
pub const DELETE_FAILED_ALERT: &str = "Failed to delete post. Please refresh.";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AdminPostListError {
    #[error("post `{0}` is not in the working list")]
    UnknownPost(String),
    #[error("post `{0}` is not on the rendered page")]
    TargetNotVisible(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BucketCount {
    pub bucket: Bucket,
    pub count: usize,
}

/// Snapshot of what the list currently renders.
#[derive(Debug, Clone)]
pub struct VisiblePosts {
    pub bucket: Bucket,
    pub search: String,
    pub items: Vec<PostRecord>,
    pub window: PageWindow,
    pub counts: Vec<BucketCount>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReorderOutcome {
    /// No target, or the record was dropped onto itself.
    Unchanged,
    /// Local order applied; one persistence write dispatched per update.
    Applied { updates: Vec<OrderUpdate> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Declined,
    Deleted,
    /// Removed from the working list but the backend rejected the delete.
    RemovedLocallyOnly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoveDirection {
    Up,
    Down,
}

/// Blocking yes/no prompt shown before a destructive action.
pub trait Confirmation: Send + Sync {
    fn confirm(&self, prompt: &str) -> bool;
}

/// Blocking user-facing alert.
pub trait Notifier: Send + Sync {
    fn alert(&self, message: &str);
}

impl Confirmation for bool {
    fn confirm(&self, _prompt: &str) -> bool {
        *self
    }
}
