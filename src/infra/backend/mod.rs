//! REST client for the managed posts table.
//!
//! The backend speaks the PostgREST dialect: filters travel as query pairs
//! (`id=eq.<id>`), ordering as `order=col.dir,...`, and writes that need the
//! stored row back send `Prefer: return=representation`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode, Url, header};
use serde::Serialize;
use serde_json::json;
use tracing::{debug, warn};

use crate::application::repos::{PostWriteParams, PostsRepo, PostsWriteRepo, RepoError};
use crate::config::BackendSettings;
use crate::domain::entities::PostRecord;
use crate::infra::error::InfraError;

const REST_PREFIX: &str = "rest/v1/";
const LISTING_ORDER: &str = "order_index.asc,created_at.desc";
const NEWEST_FIRST: &str = "created_at.desc";
const RETURN_REPRESENTATION: &str = "return=representation";

#[derive(Clone, Debug)]
pub struct BackendClient {
    http: Client,
    table_url: Url,
    api_key: String,
}

impl BackendClient {
    pub fn new(
        base: &Url,
        api_key: &str,
        table: &str,
        timeout: Duration,
    ) -> Result<Self, RepoError> {
        let mut base = base.clone();
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let table_url = base
            .join(REST_PREFIX)
            .and_then(|rest| rest.join(table))
            .map_err(|err| RepoError::InvalidInput {
                message: format!("invalid backend url: {err}"),
            })?;

        let http = Client::builder()
            .user_agent(concat!("folio/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(RepoError::from_persistence)?;

        Ok(Self {
            http,
            table_url,
            api_key: api_key.to_string(),
        })
    }

    pub fn from_settings(settings: &BackendSettings) -> Result<Self, InfraError> {
        let (url, api_key) = settings.credentials().map_err(|key| {
            InfraError::configuration(format!("`{key}` is required to serve"))
        })?;
        Self::new(url, api_key, &settings.table, settings.timeout).map_err(InfraError::from)
    }

    pub fn table_url(&self) -> &Url {
        &self.table_url
    }

    fn url(&self, query: &[(&str, &str)]) -> Url {
        let mut url = self.table_url.clone();
        {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }
        url
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.http
            .request(method, url)
            .header("apikey", &self.api_key)
            .header(header::AUTHORIZATION, format!("Bearer {}", self.api_key))
    }

    async fn send(&self, op: &'static str, request: RequestBuilder) -> Result<Response, RepoError> {
        let response = request.send().await.map_err(|err| {
            warn!(target = "folio::backend", op, error = %err, "Backend request failed");
            if err.is_timeout() {
                RepoError::Timeout
            } else {
                RepoError::from_persistence(err)
            }
        })?;

        let status = response.status();
        debug!(target = "folio::backend", op, status = status.as_u16(), "Backend responded");
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        warn!(
            target = "folio::backend",
            op,
            status = status.as_u16(),
            body = %body,
            "Backend rejected request"
        );
        Err(map_status(status, body))
    }

    async fn rows(
        &self,
        op: &'static str,
        request: RequestBuilder,
    ) -> Result<Vec<PostRecord>, RepoError> {
        let response = self.send(op, request).await?;
        let bytes = response.bytes().await.map_err(|err| {
            if err.is_timeout() {
                RepoError::Timeout
            } else {
                RepoError::from_persistence(err)
            }
        })?;
        serde_json::from_slice(&bytes).map_err(|err| RepoError::Decode(err.to_string()))
    }

    async fn select(
        &self,
        op: &'static str,
        query: &[(&str, &str)],
    ) -> Result<Vec<PostRecord>, RepoError> {
        let url = self.url(query);
        self.rows(op, self.request(Method::GET, url)).await
    }

    async fn write_returning<B: Serialize + ?Sized>(
        &self,
        op: &'static str,
        method: Method,
        url: Url,
        body: &B,
    ) -> Result<PostRecord, RepoError> {
        let request = self
            .request(method, url)
            .header("Prefer", RETURN_REPRESENTATION)
            .json(body);
        self.rows(op, request)
            .await?
            .into_iter()
            .next()
            .ok_or(RepoError::NotFound)
    }
}

fn map_status(status: StatusCode, body: String) -> RepoError {
    match status {
        StatusCode::NOT_FOUND => RepoError::NotFound,
        StatusCode::BAD_REQUEST | StatusCode::CONFLICT | StatusCode::UNPROCESSABLE_ENTITY => {
            RepoError::InvalidInput { message: body }
        }
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => RepoError::Timeout,
        other => RepoError::Persistence(format!("status {other}: {body}")),
    }
}

fn eq(value: &str) -> String {
    format!("eq.{value}")
}

#[async_trait]
impl PostsRepo for BackendClient {
    async fn fetch_initial(&self) -> Result<Vec<PostRecord>, RepoError> {
        self.select("fetch_initial", &[("select", "*"), ("order", LISTING_ORDER)])
            .await
    }

    async fn list_published_posts(&self) -> Result<Vec<PostRecord>, RepoError> {
        self.select(
            "list_published_posts",
            &[
                ("select", "*"),
                ("published", "eq.true"),
                ("type", "neq.project"),
                ("order", LISTING_ORDER),
            ],
        )
        .await
    }

    async fn list_published_projects(&self) -> Result<Vec<PostRecord>, RepoError> {
        self.select(
            "list_published_projects",
            &[
                ("select", "*"),
                ("published", "eq.true"),
                ("type", "eq.project"),
                ("order", NEWEST_FIRST),
            ],
        )
        .await
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<PostRecord>, RepoError> {
        let filter = eq(slug);
        let rows = self
            .select(
                "find_by_slug",
                &[("select", "*"), ("slug", filter.as_str()), ("limit", "1")],
            )
            .await?;
        Ok(rows.into_iter().next())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<PostRecord>, RepoError> {
        let filter = eq(id);
        let rows = self
            .select(
                "find_by_id",
                &[("select", "*"), ("id", filter.as_str()), ("limit", "1")],
            )
            .await?;
        Ok(rows.into_iter().next())
    }
}

#[async_trait]
impl PostsWriteRepo for BackendClient {
    async fn update_order_index(&self, id: &str, order_index: i64) -> Result<(), RepoError> {
        let filter = eq(id);
        let url = self.url(&[("id", filter.as_str())]);
        let request = self
            .request(Method::PATCH, url)
            .json(&json!({ "order_index": order_index }));
        self.send("update_order_index", request).await?;
        Ok(())
    }

    async fn delete_post(&self, id: &str) -> Result<(), RepoError> {
        let filter = eq(id);
        let url = self.url(&[("id", filter.as_str())]);
        self.send("delete_post", self.request(Method::DELETE, url))
            .await?;
        Ok(())
    }

    async fn create_post(&self, params: PostWriteParams) -> Result<PostRecord, RepoError> {
        let url = self.url(&[]);
        self.write_returning("create_post", Method::POST, url, &params)
            .await
    }

    async fn update_post(
        &self,
        id: &str,
        params: PostWriteParams,
    ) -> Result<PostRecord, RepoError> {
        let filter = eq(id);
        let url = self.url(&[("id", filter.as_str())]);
        self.write_returning("update_post", Method::PATCH, url, &params)
            .await
    }
}
