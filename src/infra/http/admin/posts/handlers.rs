use std::str::FromStr;

use axum::{
    Json,
    extract::{Form, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::debug;

use crate::{
    application::{
        admin::post_list::AdminPostListError,
        error::{AppError, HttpError},
    },
    domain::posts::Bucket,
    infra::http::admin::{AdminState, toasts::ToastNotifier},
    presentation::{admin::views as admin_views, views::render_template_response},
};

use super::{
    forms::{
        AdminPostDeleteForm, AdminPostDropRequest, AdminPostMoveForm, AdminPostPanelForm,
        AdminPostReorderForm,
    },
    panel::{
        build_post_list_view, reload_working_list, render_post_panel, respond_with_panel_notice,
    },
};

pub(crate) async fn admin_posts(State(state): State<AdminState>) -> Response {
    let content = build_post_list_view(&state, Vec::new());
    let view = admin_views::AdminLayout::new("Posts", content);
    render_template_response(admin_views::AdminPostsTemplate { view }, StatusCode::OK)
}

pub(crate) async fn admin_posts_panel(
    State(state): State<AdminState>,
    Form(form): Form<AdminPostPanelForm>,
) -> Response {
    if let Some(raw) = form.bucket.as_deref().filter(|raw| !raw.trim().is_empty()) {
        let bucket = match Bucket::from_str(raw) {
            Ok(bucket) => bucket,
            Err(err) => return AppError::from(err).into_response(),
        };
        if bucket != state.list.active_bucket() {
            state.list.select_bucket(bucket);
        }
    }

    let search = if form.clear.is_some() {
        Some(String::new())
    } else {
        form.search
    };
    if let Some(query) = search
        && query != state.list.search_query()
    {
        state.list.search(query);
    }

    if let Some(page) = form.page {
        state.list.set_page(page);
    }

    match form.step.as_deref() {
        Some("next") => state.list.next_page(),
        Some("previous") => state.list.previous_page(),
        Some(other) => {
            return HttpError::new(
                "infra::http::admin_posts_panel",
                StatusCode::BAD_REQUEST,
                "Invalid page step",
                format!("Unsupported page step `{other}`"),
            )
            .into_response();
        }
        None => {}
    }

    render_post_panel(&state, Vec::new(), "infra::http::admin_posts_panel")
}

pub(crate) async fn admin_posts_reorder(
    State(state): State<AdminState>,
    Form(form): Form<AdminPostReorderForm>,
) -> Response {
    reorder_response(
        &state,
        state.list.reorder(&form.moved, &form.target),
        "infra::http::admin_posts_reorder",
    )
}

pub(crate) async fn admin_post_drop(
    State(state): State<AdminState>,
    Json(request): Json<AdminPostDropRequest>,
) -> Response {
    reorder_response(
        &state,
        state
            .list
            .drop_at(&request.moved, request.pointer, &request.rects),
        "infra::http::admin_post_drop",
    )
}

pub(crate) async fn admin_post_move(
    State(state): State<AdminState>,
    Path(id): Path<String>,
    Form(form): Form<AdminPostMoveForm>,
) -> Response {
    reorder_response(
        &state,
        state.list.move_by_keyboard(&id, form.direction),
        "infra::http::admin_post_move",
    )
}

fn reorder_response<T>(
    state: &AdminState,
    result: Result<T, AdminPostListError>,
    source: &'static str,
) -> Response {
    match result {
        Ok(_) => render_post_panel(state, Vec::new(), source),
        Err(err) => HttpError::from(err).into_response(),
    }
}

pub(crate) async fn admin_post_delete(
    State(state): State<AdminState>,
    Path(id): Path<String>,
    Form(form): Form<AdminPostDeleteForm>,
) -> Response {
    let notifier = ToastNotifier::default();
    let outcome = state.list.delete(&id, &form.confirmed(), &notifier).await;
    debug!(
        target = "folio::admin::delete",
        post_id = %id,
        outcome = ?outcome,
        "Delete request handled"
    );

    respond_with_panel_notice(&state, notifier, "infra::http::admin_post_delete")
}

pub(crate) async fn admin_posts_reload(State(state): State<AdminState>) -> Response {
    let notifier = ToastNotifier::default();
    reload_working_list(&state, &notifier).await;
    respond_with_panel_notice(&state, notifier, "infra::http::admin_posts_reload")
}
