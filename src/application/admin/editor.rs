use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::application::repos::{PostWriteParams, PostsRepo, PostsWriteRepo, RepoError};
use crate::domain::entities::PostRecord;
use crate::domain::posts::{DEFAULT_CATEGORY, DEFAULT_POST_TYPE};
use crate::domain::slug::derive_slug;

#[derive(Debug, Error)]
pub enum AdminEditorError {
    #[error("missing or invalid {0}")]
    ConstraintViolation(&'static str),
    #[error("post not found")]
    NotFound,
    #[error(transparent)]
    Repo(#[from] RepoError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorTarget {
    New,
    Existing(String),
}

impl EditorTarget {
    /// `"new"` opens a blank editor; anything else is a post id.
    pub fn parse(raw: &str) -> Self {
        if raw == "new" {
            Self::New
        } else {
            Self::Existing(raw.to_string())
        }
    }
}

/// Editable fields of a post as the editor form holds them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostDraft {
    pub title: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub excerpt: String,
    #[serde(default)]
    pub project_link: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub cover_image: String,
    #[serde(default)]
    pub published: bool,
    #[serde(default, rename = "type")]
    pub post_type: String,
    #[serde(default)]
    pub category: String,
}

impl Default for PostDraft {
    fn default() -> Self {
        Self {
            title: String::new(),
            slug: String::new(),
            excerpt: String::new(),
            project_link: String::new(),
            content: String::new(),
            cover_image: String::new(),
            published: false,
            post_type: DEFAULT_POST_TYPE.to_string(),
            category: DEFAULT_CATEGORY.to_string(),
        }
    }
}

impl From<PostRecord> for PostDraft {
    fn from(record: PostRecord) -> Self {
        Self {
            title: record.title,
            slug: record.slug,
            excerpt: record.excerpt.unwrap_or_default(),
            project_link: record.project_link.unwrap_or_default(),
            content: record.content.unwrap_or_default(),
            cover_image: record.cover_image.unwrap_or_default(),
            published: record.published,
            post_type: non_blank_or(record.post_type, DEFAULT_POST_TYPE),
            category: non_blank_or(record.category, DEFAULT_CATEGORY),
        }
    }
}

fn non_blank_or(value: Option<String>, fallback: &str) -> String {
    value
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| fallback.to_string())
}

#[derive(Clone)]
pub struct AdminEditorService {
    reader: Arc<dyn PostsRepo>,
    writer: Arc<dyn PostsWriteRepo>,
    author_id: Option<String>,
}

impl AdminEditorService {
    pub fn new(
        reader: Arc<dyn PostsRepo>,
        writer: Arc<dyn PostsWriteRepo>,
        author_id: Option<String>,
    ) -> Self {
        Self {
            reader,
            writer,
            author_id,
        }
    }

    /// Draft for the editor form; a new post starts from the defaults.
    pub async fn load(&self, target: &EditorTarget) -> Result<PostDraft, AdminEditorError> {
        match target {
            EditorTarget::New => Ok(PostDraft::default()),
            EditorTarget::Existing(id) => self
                .reader
                .find_by_id(id)
                .await?
                .map(PostDraft::from)
                .ok_or(AdminEditorError::NotFound),
        }
    }

    pub async fn save(
        &self,
        target: &EditorTarget,
        draft: PostDraft,
    ) -> Result<PostRecord, AdminEditorError> {
        if draft.title.trim().is_empty() {
            return Err(AdminEditorError::ConstraintViolation("title"));
        }

        let slug = match target {
            EditorTarget::New if draft.slug.trim().is_empty() => {
                derive_slug(&draft.title).map_err(|_| AdminEditorError::ConstraintViolation("slug"))?
            }
            _ => draft.slug.trim().to_string(),
        };
        if slug.is_empty() {
            return Err(AdminEditorError::ConstraintViolation("slug"));
        }

        let params = PostWriteParams {
            title: draft.title,
            slug,
            excerpt: draft.excerpt,
            project_link: draft.project_link,
            content: draft.content,
            cover_image: draft.cover_image,
            published: draft.published,
            post_type: non_blank_or(Some(draft.post_type), DEFAULT_POST_TYPE),
            category: non_blank_or(Some(draft.category), DEFAULT_CATEGORY),
            author_id: self.author_id.clone(),
        };

        let post = match target {
            EditorTarget::New => self.writer.create_post(params).await?,
            EditorTarget::Existing(id) => match self.writer.update_post(id, params).await {
                Err(RepoError::NotFound) => return Err(AdminEditorError::NotFound),
                other => other?,
            },
        };

        info!(
            target = "folio::admin::editor",
            post_id = %post.id,
            slug = %post.slug,
            created = matches!(target, EditorTarget::New),
            "Post saved"
        );
        Ok(post)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::domain::posts::fixtures::post;
    use crate::util::lock::mutex_lock;

    #[derive(Default)]
    struct MemoryRepo {
        posts: Mutex<Vec<PostRecord>>,
        writes: Mutex<Vec<(Option<String>, PostWriteParams)>>,
    }

    fn apply(record: &mut PostRecord, params: &PostWriteParams) {
        record.title = params.title.clone();
        record.slug = params.slug.clone();
        record.excerpt = Some(params.excerpt.clone());
        record.published = params.published;
        record.post_type = Some(params.post_type.clone());
        record.category = Some(params.category.clone());
        record.author_id = params.author_id.clone();
    }

    #[async_trait]
    impl PostsRepo for MemoryRepo {
        async fn fetch_initial(&self) -> Result<Vec<PostRecord>, RepoError> {
            Ok(mutex_lock(&self.posts, "tests", "fetch").clone())
        }

        async fn list_published_posts(&self) -> Result<Vec<PostRecord>, RepoError> {
            Ok(Vec::new())
        }

        async fn list_published_projects(&self) -> Result<Vec<PostRecord>, RepoError> {
            Ok(Vec::new())
        }

        async fn find_by_slug(&self, slug: &str) -> Result<Option<PostRecord>, RepoError> {
            Ok(mutex_lock(&self.posts, "tests", "slug")
                .iter()
                .find(|p| p.slug == slug)
                .cloned())
        }

        async fn find_by_id(&self, id: &str) -> Result<Option<PostRecord>, RepoError> {
            Ok(mutex_lock(&self.posts, "tests", "id")
                .iter()
                .find(|p| p.id == id)
                .cloned())
        }
    }

    #[async_trait]
    impl PostsWriteRepo for MemoryRepo {
        async fn update_order_index(&self, _id: &str, _order_index: i64) -> Result<(), RepoError> {
            Ok(())
        }

        async fn delete_post(&self, _id: &str) -> Result<(), RepoError> {
            Ok(())
        }

        async fn create_post(&self, params: PostWriteParams) -> Result<PostRecord, RepoError> {
            let mut record = post("created", 0);
            apply(&mut record, &params);
            mutex_lock(&self.writes, "tests", "create").push((None, params));
            Ok(record)
        }

        async fn update_post(
            &self,
            id: &str,
            params: PostWriteParams,
        ) -> Result<PostRecord, RepoError> {
            let mut posts = mutex_lock(&self.posts, "tests", "update");
            let record = posts
                .iter_mut()
                .find(|p| p.id == id)
                .ok_or(RepoError::NotFound)?;
            apply(record, &params);
            let updated = record.clone();
            mutex_lock(&self.writes, "tests", "update").push((Some(id.to_string()), params));
            Ok(updated)
        }
    }

    fn service(repo: Arc<MemoryRepo>) -> AdminEditorService {
        AdminEditorService::new(repo.clone(), repo, Some("author-1".into()))
    }

    fn draft(title: &str) -> PostDraft {
        PostDraft {
            title: title.to_string(),
            ..PostDraft::default()
        }
    }

    #[test]
    fn target_parses_new_keyword() {
        assert_eq!(EditorTarget::parse("new"), EditorTarget::New);
        assert_eq!(
            EditorTarget::parse("abc"),
            EditorTarget::Existing("abc".into())
        );
    }

    #[tokio::test]
    async fn new_post_derives_slug_and_applies_defaults() {
        let repo = Arc::new(MemoryRepo::default());
        let saved = service(repo.clone())
            .save(&EditorTarget::New, draft("Hello, World!"))
            .await
            .expect("saved");

        assert_eq!(saved.slug, "hello-world");
        let writes = mutex_lock(&repo.writes, "tests", "read");
        let (id, params) = &writes[0];
        assert!(id.is_none());
        assert_eq!(params.post_type, DEFAULT_POST_TYPE);
        assert_eq!(params.category, DEFAULT_CATEGORY);
        assert_eq!(params.author_id.as_deref(), Some("author-1"));
    }

    #[tokio::test]
    async fn existing_post_keeps_its_slug() {
        let repo = Arc::new(MemoryRepo::default());
        mutex_lock(&repo.posts, "tests", "seed").push(post("p1", 0));

        let mut edit = draft("Renamed");
        edit.slug = "p1".into();
        let saved = service(repo)
            .save(&EditorTarget::Existing("p1".into()), edit)
            .await
            .expect("saved");
        assert_eq!(saved.slug, "p1");
        assert_eq!(saved.title, "Renamed");
    }

    #[tokio::test]
    async fn blank_title_is_rejected() {
        let repo = Arc::new(MemoryRepo::default());
        let err = service(repo)
            .save(&EditorTarget::New, draft("   "))
            .await
            .expect_err("blank title");
        assert!(matches!(err, AdminEditorError::ConstraintViolation("title")));
    }

    #[tokio::test]
    async fn title_without_slug_characters_is_rejected() {
        let repo = Arc::new(MemoryRepo::default());
        let err = service(repo)
            .save(&EditorTarget::New, draft("!!!"))
            .await
            .expect_err("no slug");
        assert!(matches!(err, AdminEditorError::ConstraintViolation("slug")));
    }

    #[tokio::test]
    async fn unknown_post_is_not_found() {
        let repo = Arc::new(MemoryRepo::default());
        let service = service(repo);

        let err = service
            .load(&EditorTarget::Existing("missing".into()))
            .await
            .expect_err("missing");
        assert!(matches!(err, AdminEditorError::NotFound));

        let mut edit = draft("Title");
        edit.slug = "title".into();
        let err = service
            .save(&EditorTarget::Existing("missing".into()), edit)
            .await
            .expect_err("missing");
        assert!(matches!(err, AdminEditorError::NotFound));
    }

    #[tokio::test]
    async fn load_fills_blank_columns_with_defaults() {
        let repo = Arc::new(MemoryRepo::default());
        let mut record = post("p1", 0);
        record.post_type = None;
        record.category = Some(String::new());
        mutex_lock(&repo.posts, "tests", "seed").push(record);

        let loaded = service(repo)
            .load(&EditorTarget::Existing("p1".into()))
            .await
            .expect("loaded");
        assert_eq!(loaded.post_type, DEFAULT_POST_TYPE);
        assert_eq!(loaded.category, DEFAULT_CATEGORY);
        assert_eq!(loaded.excerpt, "About p1");
    }
}
