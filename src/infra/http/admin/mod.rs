mod editor;
mod health;
mod posts;
mod state;
mod toasts;

pub use state::AdminState;

use axum::{
    Router, middleware,
    routing::{get, post},
};

use super::middleware::trace_requests;

pub fn build_admin_router(state: AdminState) -> Router {
    Router::new()
        .route("/", get(posts::admin_posts))
        .route("/posts", get(posts::admin_posts))
        .route("/posts/panel", post(posts::admin_posts_panel))
        .route("/posts/reorder", post(posts::admin_posts_reorder))
        .route("/posts/drop", post(posts::admin_post_drop))
        .route("/posts/reload", post(posts::admin_posts_reload))
        .route("/posts/{id}", post(editor::admin_post_save))
        .route("/posts/{id}/edit", get(editor::admin_post_edit))
        .route("/posts/{id}/move", post(posts::admin_post_move))
        .route("/posts/{id}/delete", post(posts::admin_post_delete))
        .route("/health", get(health::admin_health))
        .with_state(state)
        .layer(middleware::from_fn(trace_requests))
}
