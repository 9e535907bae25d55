//! Public site services: home feed sections, the projects carousel, post
//! detail pages and the about page.

use std::sync::Arc;

use thiserror::Error;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

use crate::application::repos::{PostsRepo, RepoError};
use crate::domain::entities::PostRecord;
use crate::domain::posts::{PROJECTS_CATEGORY, STRAIGHT_TALK_CATEGORY, is_project};

pub const FALLBACK_PROJECT_COVER: &str =
    "https://images.unsplash.com/photo-1550745165-9bc0b252726f";
const SIDEBAR_LEN: usize = 3;
const SECTION_HEAD_LEN: usize = 1 + SIDEBAR_LEN;

#[derive(Debug, Error)]
pub enum SiteError {
    #[error("post not found")]
    NotFound,
    #[error(transparent)]
    Repo(#[from] RepoError),
}

/// Author details shown on the about page and in post metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteProfile {
    pub author: String,
    pub about: String,
}

#[derive(Debug, Clone, Default)]
pub struct HomeSection {
    pub featured: Option<PostRecord>,
    pub sidebar: Vec<PostRecord>,
    pub all: Vec<PostRecord>,
}

impl HomeSection {
    fn from_posts(posts: Vec<PostRecord>) -> Self {
        Self {
            featured: posts.first().cloned(),
            sidebar: posts.iter().skip(1).take(SIDEBAR_LEN).cloned().collect(),
            all: posts,
        }
    }

    fn overflow(&self) -> impl Iterator<Item = &PostRecord> {
        self.all.iter().skip(SECTION_HEAD_LEN)
    }

    pub fn is_empty(&self) -> bool {
        self.all.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct HomeFeed {
    pub straight_talk: HomeSection,
    pub blogs: HomeSection,
    /// Everything past the featured and sidebar slots of both sections,
    /// newest first.
    pub grid: Vec<PostRecord>,
}

/// Split published posts (already in listing order) into the home sections.
pub fn build_home_feed(posts: Vec<PostRecord>) -> HomeFeed {
    let (straight_talk, blogs): (Vec<_>, Vec<_>) = posts
        .into_iter()
        .filter(|post| !is_project(post))
        .filter(|post| post.category_str() != Some(PROJECTS_CATEGORY))
        .partition(|post| post.category_str() == Some(STRAIGHT_TALK_CATEGORY));

    let straight_talk = HomeSection::from_posts(straight_talk);
    let blogs = HomeSection::from_posts(blogs);

    let mut grid: Vec<PostRecord> = straight_talk
        .overflow()
        .chain(blogs.overflow())
        .cloned()
        .collect();
    grid.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    HomeFeed {
        straight_talk,
        blogs,
        grid,
    }
}

#[derive(Debug, Clone)]
pub struct ProjectsCarousel {
    pub projects: Vec<PostRecord>,
    pub current: usize,
}

impl ProjectsCarousel {
    /// Any requested index wraps around the number of projects.
    pub fn new(projects: Vec<PostRecord>, requested: Option<i64>) -> Self {
        let current = match (projects.len(), requested) {
            (0, _) | (_, None) => 0,
            (len, Some(index)) => index.rem_euclid(len as i64) as usize,
        };
        Self { projects, current }
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }

    pub fn current(&self) -> Option<&PostRecord> {
        self.projects.get(self.current)
    }

    pub fn next_index(&self) -> usize {
        match self.projects.len() {
            0 => 0,
            len => (self.current + 1) % len,
        }
    }

    pub fn previous_index(&self) -> usize {
        match self.projects.len() {
            0 => 0,
            len => (self.current + len - 1) % len,
        }
    }
}

pub fn cover_or_fallback(post: &PostRecord) -> &str {
    post.cover_image
        .as_deref()
        .filter(|url| !url.trim().is_empty())
        .unwrap_or(FALLBACK_PROJECT_COVER)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostMetadata {
    pub title: String,
    pub description: String,
    pub og_type: &'static str,
    pub published_time: String,
    pub image: Option<String>,
}

#[derive(Debug, Clone)]
pub struct PostPage {
    pub post: PostRecord,
    pub body_html: String,
    pub metadata: PostMetadata,
    pub back_link: &'static str,
}

#[derive(Clone)]
pub struct SiteService {
    posts: Arc<dyn PostsRepo>,
    profile: SiteProfile,
    sanitizer: Arc<ammonia::Builder<'static>>,
}

impl SiteService {
    pub fn new(posts: Arc<dyn PostsRepo>, profile: SiteProfile) -> Self {
        let mut sanitizer = ammonia::Builder::default();
        sanitizer.add_tags(&["figure", "figcaption", "mark", "s", "u"]);
        Self {
            posts,
            profile,
            sanitizer: Arc::new(sanitizer),
        }
    }

    pub fn profile(&self) -> &SiteProfile {
        &self.profile
    }

    pub async fn home(&self) -> Result<HomeFeed, SiteError> {
        let posts = self.posts.list_published_posts().await?;
        Ok(build_home_feed(posts))
    }

    pub async fn projects(&self, requested: Option<i64>) -> Result<ProjectsCarousel, SiteError> {
        let projects = self.posts.list_published_projects().await?;
        Ok(ProjectsCarousel::new(projects, requested))
    }

    pub async fn post(&self, slug: &str) -> Result<PostPage, SiteError> {
        let post = self
            .posts
            .find_by_slug(slug)
            .await?
            .ok_or(SiteError::NotFound)?;

        let body_html = self
            .sanitizer
            .clean(post.content.as_deref().unwrap_or_default())
            .to_string();
        let metadata = self.metadata_for(&post);
        let back_link = if is_project(&post) { "/projects" } else { "/" };

        Ok(PostPage {
            post,
            body_html,
            metadata,
            back_link,
        })
    }

    pub fn metadata_for(&self, post: &PostRecord) -> PostMetadata {
        let author = &self.profile.author;
        let description = post
            .excerpt
            .as_deref()
            .filter(|excerpt| !excerpt.trim().is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| format!("Read {} on {author}'s blog.", post.title));

        PostMetadata {
            title: format!("{} | {author}", post.title),
            description,
            og_type: "article",
            published_time: format_timestamp(post.created_at),
            image: post
                .cover_image
                .clone()
                .filter(|url| !url.trim().is_empty()),
        }
    }
}

fn format_timestamp(value: OffsetDateTime) -> String {
    value.format(&Rfc3339).unwrap_or_default()
}
