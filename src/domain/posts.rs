//! Post classification, search matching and canonical ordering.

use std::{cmp::Ordering, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::domain::{entities::PostRecord, error::DomainError};

pub const PROJECT_TYPE: &str = "project";
pub const DEFAULT_POST_TYPE: &str = "post";
pub const STRAIGHT_TALK_CATEGORY: &str = "Straight Talk";
pub const PROJECTS_CATEGORY: &str = "Projects";
pub const DEFAULT_CATEGORY: &str = "Tech & Thoughts";

/// One of the three fixed partitions of the admin post list.
///
/// Membership is a pure function of `(type, category)` and every record
/// lands in exactly one bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Bucket {
    #[default]
    Blogs,
    StraightTalk,
    Projects,
}

impl Bucket {
    pub const ALL: [Bucket; 3] = [Bucket::Blogs, Bucket::StraightTalk, Bucket::Projects];

    pub fn as_str(self) -> &'static str {
        match self {
            Bucket::Blogs => "blogs",
            Bucket::StraightTalk => "straight-talk",
            Bucket::Projects => "projects",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Bucket::Blogs => "Blogs",
            Bucket::StraightTalk => STRAIGHT_TALK_CATEGORY,
            Bucket::Projects => PROJECTS_CATEGORY,
        }
    }

    pub fn of(post: &PostRecord) -> Bucket {
        if is_project(post) || post.category_str() == Some(PROJECTS_CATEGORY) {
            Bucket::Projects
        } else if post.category_str() == Some(STRAIGHT_TALK_CATEGORY) {
            Bucket::StraightTalk
        } else {
            Bucket::Blogs
        }
    }

    pub fn contains(self, post: &PostRecord) -> bool {
        Bucket::of(post) == self
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Bucket {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "blogs" => Ok(Bucket::Blogs),
            "straight-talk" => Ok(Bucket::StraightTalk),
            "projects" => Ok(Bucket::Projects),
            other => Err(DomainError::validation(
                "bucket",
                format!("unknown bucket `{other}`"),
            )),
        }
    }
}

pub fn is_project(post: &PostRecord) -> bool {
    post.type_str() == Some(PROJECT_TYPE)
}

/// Lowercased search needle; `None` when the query is empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchNeedle(String);

impl SearchNeedle {
    pub fn new(query: &str) -> Option<Self> {
        if query.is_empty() {
            None
        } else {
            Some(Self(query.to_lowercase()))
        }
    }

    /// Case-insensitive substring match against title and excerpt.
    pub fn matches(&self, post: &PostRecord) -> bool {
        post.title.to_lowercase().contains(&self.0)
            || post.excerpt_or_empty().to_lowercase().contains(&self.0)
    }
}

/// `order_index` ascending, newest `created_at` first on ties.
pub fn listing_order(left: &PostRecord, right: &PostRecord) -> Ordering {
    left.order_index
        .cmp(&right.order_index)
        .then_with(|| right.created_at.cmp(&left.created_at))
}

pub fn sort_for_listing(posts: &mut [PostRecord]) {
    posts.sort_by(listing_order);
}
