use axum::{
    Json,
    extract::{Form, FromRequest, Path, Request, State},
    http::{
        HeaderMap, StatusCode,
        header::{ACCEPT, CONTENT_TYPE},
    },
    response::{IntoResponse, Response},
};
use tracing::warn;

use crate::{
    application::{
        admin::{EditorTarget, PostDraft},
        error::HttpError,
    },
    domain::entities::PostRecord,
    presentation::{
        admin::views::{AdminLayout, AdminPostEditorTemplate, AdminPostEditorView, AdminToastItem},
        views::render_template_response,
    },
};

use super::{
    AdminState,
    posts::{AdminPostEditorForm, reload_working_list},
    toasts::ToastNotifier,
};

const SAVED_NOTICE: &str = "Post saved successfully!";

fn wants_json(headers: &HeaderMap) -> bool {
    headers
        .get(ACCEPT)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|accept| accept.contains("application/json"))
}

fn sends_json(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|content_type| content_type.starts_with("application/json"))
}

fn render_editor(
    target: &EditorTarget,
    draft: PostDraft,
    toasts: Vec<AdminToastItem>,
    status: StatusCode,
) -> Response {
    let content = AdminPostEditorView::new(target, draft, toasts);
    let view = AdminLayout::new(content.heading, content);
    render_template_response(AdminPostEditorTemplate { view }, status)
}

pub(super) async fn admin_post_edit(
    State(state): State<AdminState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    let target = EditorTarget::parse(&id);
    let draft = match state.editor.load(&target).await {
        Ok(draft) => draft,
        Err(err) => return HttpError::from(err).into_response(),
    };

    if wants_json(&headers) {
        Json(draft).into_response()
    } else {
        render_editor(&target, draft, Vec::new(), StatusCode::OK)
    }
}

/// Save a post from either the editor page (form body) or an API client
/// (JSON body), then refresh the working list so the record shows up in its
/// bucket.
pub(super) async fn admin_post_save(
    State(state): State<AdminState>,
    Path(id): Path<String>,
    request: Request,
) -> Response {
    let target = EditorTarget::parse(&id);

    if sends_json(request.headers()) {
        return match Json::<PostDraft>::from_request(request, &state).await {
            Ok(Json(draft)) => save_json(&state, &target, draft).await,
            Err(rejection) => rejection.into_response(),
        };
    }

    match Form::<AdminPostEditorForm>::from_request(request, &state).await {
        Ok(Form(form)) => save_form(&state, &target, form.into_draft()).await,
        Err(rejection) => rejection.into_response(),
    }
}

async fn save_json(state: &AdminState, target: &EditorTarget, draft: PostDraft) -> Response {
    match state.editor.save(target, draft).await {
        Ok(saved) => {
            refresh_after_save(state, &saved).await;
            (saved_status(target), Json(saved)).into_response()
        }
        Err(err) => HttpError::from(err).into_response(),
    }
}

async fn save_form(state: &AdminState, target: &EditorTarget, draft: PostDraft) -> Response {
    let notifier = ToastNotifier::default();
    match state.editor.save(target, draft.clone()).await {
        Ok(saved) => {
            refresh_after_save(state, &saved).await;
            notifier.push_success(SAVED_NOTICE);
            let status = saved_status(target);
            let target = EditorTarget::Existing(saved.id.clone());
            render_editor(&target, PostDraft::from(saved), notifier.into_toasts(), status)
        }
        Err(err) => {
            notifier.push_error(format!("Failed to save post: {err}"));
            let error = HttpError::from(err);
            let status = error.status();
            let mut response = render_editor(target, draft, notifier.into_toasts(), status);
            error.into_report().attach(&mut response);
            response
        }
    }
}

fn saved_status(target: &EditorTarget) -> StatusCode {
    match target {
        EditorTarget::New => StatusCode::CREATED,
        EditorTarget::Existing(_) => StatusCode::OK,
    }
}

async fn refresh_after_save(state: &AdminState, saved: &PostRecord) {
    let notifier = ToastNotifier::default();
    reload_working_list(state, &notifier).await;
    for toast in notifier.into_toasts() {
        warn!(
            target = "folio::admin::editor",
            post_id = %saved.id,
            notice = %toast.text,
            "Saved post but the working list is stale"
        );
    }
}
