use std::sync::Arc;

use axum::{
    Router,
    extract::{Path, Query, State},
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Deserialize;

use crate::{
    application::{
        error::HttpError,
        site::{SiteError, SiteService},
    },
    presentation::views::{
        AboutTemplate, AboutView, HomeTemplate, HomeView, LayoutContext, PageMetaView,
        PostDetailView, PostTemplate, ProjectsTemplate, ProjectsView, SiteChrome,
        render_not_found_response, render_template_response,
    },
};

use super::middleware::trace_requests;

#[derive(Clone)]
pub struct HttpState {
    pub site: Arc<SiteService>,
}

impl HttpState {
    fn chrome(&self, active_path: &str) -> SiteChrome {
        SiteChrome::new(self.site.profile(), active_path)
    }
}

pub fn build_router(state: HttpState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/projects", get(projects))
        .route("/blog/{slug}", get(post_detail))
        .route("/about", get(about))
        .route("/_health", get(health))
        .fallback(fallback_router)
        .with_state(state)
        .layer(middleware::from_fn(trace_requests))
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ProjectsQuery {
    index: Option<i64>,
}

async fn index(State(state): State<HttpState>) -> Response {
    let feed = match state.site.home().await {
        Ok(feed) => feed,
        Err(err) => return HttpError::from(err).into_response(),
    };

    let author = &state.site.profile().author;
    let meta = PageMetaView {
        title: author.clone(),
        description: format!("Writing and projects by {author}"),
        ..PageMetaView::default()
    };
    let view = LayoutContext::new(state.chrome("/"), meta, HomeView::from(&feed));
    render_template_response(HomeTemplate { view }, StatusCode::OK)
}

async fn projects(
    State(state): State<HttpState>,
    Query(query): Query<ProjectsQuery>,
) -> Response {
    let carousel = match state.site.projects(query.index).await {
        Ok(carousel) => carousel,
        Err(err) => return HttpError::from(err).into_response(),
    };

    let meta = PageMetaView::titled(format!("Projects | {}", state.site.profile().author));
    let view = LayoutContext::new(
        state.chrome("/projects"),
        meta,
        ProjectsView::from(&carousel),
    );
    render_template_response(ProjectsTemplate { view }, StatusCode::OK)
}

async fn post_detail(State(state): State<HttpState>, Path(slug): Path<String>) -> Response {
    let page = match state.site.post(&slug).await {
        Ok(page) => page,
        Err(SiteError::NotFound) => return render_not_found_response(state.chrome("")),
        Err(err) => return HttpError::from(err).into_response(),
    };

    let view = LayoutContext::new(
        state.chrome(page.back_link),
        PostDetailView::meta(&page),
        PostDetailView::from_page(&page),
    );
    render_template_response(PostTemplate { view }, StatusCode::OK)
}

async fn about(State(state): State<HttpState>) -> Response {
    let profile = state.site.profile();
    let meta = PageMetaView::titled(format!("About | {}", profile.author));
    let view = LayoutContext::new(state.chrome("/about"), meta, AboutView::from(profile));
    render_template_response(AboutTemplate { view }, StatusCode::OK)
}

async fn health() -> StatusCode {
    StatusCode::NO_CONTENT
}

async fn fallback_router(State(state): State<HttpState>) -> Response {
    render_not_found_response(state.chrome(""))
}
