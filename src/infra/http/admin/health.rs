use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::application::error::ErrorReport;

use super::AdminState;

const HEALTH_PROBE_ID: &str = "00000000-0000-0000-0000-000000000000";

/// Reports whether the admin surface can read the working list's source.
pub(super) async fn admin_health(State(state): State<AdminState>) -> Response {
    match state.posts.find_by_id(HEALTH_PROBE_ID).await {
        Ok(_) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => {
            let mut response = StatusCode::SERVICE_UNAVAILABLE.into_response();
            ErrorReport::from_error(
                "infra::http::admin_health",
                StatusCode::SERVICE_UNAVAILABLE,
                &err,
            )
            .attach(&mut response);
            response
        }
    }
}
