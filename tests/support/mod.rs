#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{body::Body, http::Request, response::Response};
use folio::application::repos::{PostWriteParams, PostsRepo, PostsWriteRepo, RepoError};
use folio::domain::{
    entities::PostRecord,
    posts::{is_project, sort_for_listing},
};
use http_body_util::BodyExt;
use time::{Duration, OffsetDateTime, macros::datetime};

pub const EPOCH: OffsetDateTime = datetime!(2024-01-01 0:00 UTC);

pub fn record(id: &str, order_index: i64) -> PostRecord {
    PostRecord {
        id: id.to_string(),
        title: format!("Post {id}"),
        excerpt: Some(format!("About {id}")),
        cover_image: None,
        created_at: EPOCH + Duration::days(order_index),
        slug: format!("post-{id}"),
        published: true,
        category: Some("Tech & Thoughts".to_string()),
        post_type: Some("post".to_string()),
        order_index,
        content: Some(format!("<p>Body of {id}</p>")),
        project_link: None,
        author_id: None,
    }
}

pub fn in_category(mut post: PostRecord, category: &str) -> PostRecord {
    post.category = Some(category.to_string());
    post
}

pub fn as_project(mut post: PostRecord) -> PostRecord {
    post.post_type = Some("project".to_string());
    post.category = Some("Projects".to_string());
    post
}

/// In-memory stand-in for the managed backend.
#[derive(Default)]
pub struct MemoryBackend {
    posts: Mutex<Vec<PostRecord>>,
    order_writes: Mutex<Vec<(String, i64)>>,
    deletes: Mutex<Vec<String>>,
    fail_deletes: bool,
}

impl MemoryBackend {
    pub fn with_posts(posts: Vec<PostRecord>) -> Arc<Self> {
        Arc::new(Self {
            posts: Mutex::new(posts),
            ..Self::default()
        })
    }

    pub fn failing_deletes(posts: Vec<PostRecord>) -> Arc<Self> {
        Arc::new(Self {
            posts: Mutex::new(posts),
            fail_deletes: true,
            ..Self::default()
        })
    }

    pub fn order_writes(&self) -> Vec<(String, i64)> {
        self.order_writes.lock().expect("order writes").clone()
    }

    pub fn deletes(&self) -> Vec<String> {
        self.deletes.lock().expect("deletes").clone()
    }

    fn snapshot(&self) -> Vec<PostRecord> {
        self.posts.lock().expect("posts").clone()
    }
}

fn apply(record: &mut PostRecord, params: PostWriteParams) {
    record.title = params.title;
    record.slug = params.slug;
    record.excerpt = Some(params.excerpt);
    record.project_link = Some(params.project_link);
    record.content = Some(params.content);
    record.cover_image = Some(params.cover_image);
    record.published = params.published;
    record.post_type = Some(params.post_type);
    record.category = Some(params.category);
    record.author_id = params.author_id;
}

#[async_trait]
impl PostsRepo for MemoryBackend {
    async fn fetch_initial(&self) -> Result<Vec<PostRecord>, RepoError> {
        let mut posts = self.snapshot();
        sort_for_listing(&mut posts);
        Ok(posts)
    }

    async fn list_published_posts(&self) -> Result<Vec<PostRecord>, RepoError> {
        let mut posts: Vec<_> = self
            .snapshot()
            .into_iter()
            .filter(|post| post.published && !is_project(post))
            .collect();
        sort_for_listing(&mut posts);
        Ok(posts)
    }

    async fn list_published_projects(&self) -> Result<Vec<PostRecord>, RepoError> {
        let mut projects: Vec<_> = self
            .snapshot()
            .into_iter()
            .filter(|post| post.published && is_project(post))
            .collect();
        projects.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(projects)
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<PostRecord>, RepoError> {
        Ok(self.snapshot().into_iter().find(|post| post.slug == slug))
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<PostRecord>, RepoError> {
        Ok(self.snapshot().into_iter().find(|post| post.id == id))
    }
}

#[async_trait]
impl PostsWriteRepo for MemoryBackend {
    async fn update_order_index(&self, id: &str, order_index: i64) -> Result<(), RepoError> {
        self.order_writes
            .lock()
            .expect("order writes")
            .push((id.to_string(), order_index));
        let mut posts = self.posts.lock().expect("posts");
        if let Some(post) = posts.iter_mut().find(|post| post.id == id) {
            post.order_index = order_index;
        }
        Ok(())
    }

    async fn delete_post(&self, id: &str) -> Result<(), RepoError> {
        self.deletes.lock().expect("deletes").push(id.to_string());
        if self.fail_deletes {
            return Err(RepoError::Persistence("delete rejected".into()));
        }
        self.posts.lock().expect("posts").retain(|post| post.id != id);
        Ok(())
    }

    async fn create_post(&self, params: PostWriteParams) -> Result<PostRecord, RepoError> {
        let mut posts = self.posts.lock().expect("posts");
        let mut created = record(&format!("created-{}", posts.len()), 0);
        apply(&mut created, params);
        posts.push(created.clone());
        Ok(created)
    }

    async fn update_post(
        &self,
        id: &str,
        params: PostWriteParams,
    ) -> Result<PostRecord, RepoError> {
        let mut posts = self.posts.lock().expect("posts");
        let post = posts
            .iter_mut()
            .find(|post| post.id == id)
            .ok_or(RepoError::NotFound)?;
        apply(post, params);
        Ok(post.clone())
    }
}

pub fn form(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .expect("form request")
}

pub fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("json request")
}

pub fn get_json(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header("accept", "application/json")
        .body(Body::empty())
        .expect("get request")
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("get request")
}

pub async fn body_text(response: Response) -> String {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("response body")
        .to_bytes();
    String::from_utf8(bytes.to_vec()).expect("utf-8 body")
}
