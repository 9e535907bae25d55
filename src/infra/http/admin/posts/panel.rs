use askama::Template;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::{
    application::error::HttpError,
    infra::http::admin::{AdminState, toasts::ToastNotifier},
    presentation::{
        admin::views::{AdminPostListView, AdminPostsPanelTemplate, AdminToastItem},
        views::TemplateRenderError,
    },
};

pub(super) fn build_post_list_view(
    state: &AdminState,
    toasts: Vec<AdminToastItem>,
) -> AdminPostListView {
    AdminPostListView::from_visible(&state.list.visible(), toasts)
}

pub(super) fn render_post_panel(
    state: &AdminState,
    toasts: Vec<AdminToastItem>,
    source: &'static str,
) -> Response {
    let content = build_post_list_view(state, toasts);
    match (AdminPostsPanelTemplate { content }).render() {
        Ok(html) => (StatusCode::OK, Html(html)).into_response(),
        Err(err) => HttpError::from(TemplateRenderError::new(
            source,
            "Failed to render posts panel",
            err,
        ))
        .into_response(),
    }
}

pub(super) fn respond_with_panel_notice(
    state: &AdminState,
    notifier: ToastNotifier,
    source: &'static str,
) -> Response {
    render_post_panel(state, notifier.into_toasts(), source)
}

/// Replace the working list with a fresh backend snapshot. Failures become
/// an error toast and leave the current list in place.
pub(crate) async fn reload_working_list(state: &AdminState, notifier: &ToastNotifier) {
    match state.posts.fetch_initial().await {
        Ok(records) => state.list.replace(records),
        Err(err) => {
            tracing::warn!(
                target = "folio::admin::post_list",
                error = %err,
                "Failed to reload posts"
            );
            notifier.push_error(format!("Failed to reload posts: {err}"));
        }
    }
}
