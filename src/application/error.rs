use std::error::Error as StdError;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::{
    application::{
        admin::{AdminEditorError, post_list::AdminPostListError},
        repos::RepoError,
        site::SiteError,
    },
    domain::error::DomainError,
    infra::error::InfraError,
};

#[derive(Debug, Clone)]
pub struct ErrorReport {
    pub source: &'static str,
    pub status: StatusCode,
    pub messages: Vec<String>,
}

impl ErrorReport {
    pub fn from_error(source: &'static str, status: StatusCode, error: &dyn StdError) -> Self {
        let mut messages = vec![error.to_string()];
        let mut current = error.source();
        while let Some(inner) = current {
            messages.push(inner.to_string());
            current = inner.source();
        }
        Self {
            source,
            status,
            messages,
        }
    }

    pub fn from_message(
        source: &'static str,
        status: StatusCode,
        message: impl Into<String>,
    ) -> Self {
        Self {
            source,
            status,
            messages: vec![message.into()],
        }
    }

    pub fn attach(self, response: &mut Response) {
        response.extensions_mut().insert(self);
    }
}

#[derive(Debug)]
pub struct HttpError {
    status: StatusCode,
    public_message: &'static str,
    report: ErrorReport,
}

impl HttpError {
    pub fn new(
        source: &'static str,
        status: StatusCode,
        public_message: &'static str,
        detail: impl Into<String>,
    ) -> Self {
        let report = ErrorReport::from_message(source, status, detail);
        Self {
            status,
            public_message,
            report,
        }
    }

    pub fn from_error(
        source: &'static str,
        status: StatusCode,
        public_message: &'static str,
        error: &dyn StdError,
    ) -> Self {
        let report = ErrorReport::from_error(source, status, error);
        Self {
            status,
            public_message,
            report,
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Diagnostic for handlers that render their own error body.
    pub fn into_report(self) -> ErrorReport {
        self.report
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let mut response = (self.status, self.public_message).into_response();
        self.report.attach(&mut response);
        response
    }
}

fn repo_status(error: &RepoError) -> (StatusCode, &'static str) {
    match error {
        RepoError::NotFound => (StatusCode::NOT_FOUND, "Resource not found"),
        RepoError::InvalidInput { .. } => {
            (StatusCode::UNPROCESSABLE_ENTITY, "Backend rejected the request")
        }
        RepoError::Timeout => (StatusCode::GATEWAY_TIMEOUT, "Backend timed out"),
        RepoError::Persistence(_) | RepoError::Decode(_) => {
            (StatusCode::BAD_GATEWAY, "Backend unavailable")
        }
    }
}

impl From<RepoError> for HttpError {
    fn from(error: RepoError) -> Self {
        let (status, message) = repo_status(&error);
        HttpError::from_error(
            "infra::http::repo_error_to_http_error",
            status,
            message,
            &error,
        )
    }
}

impl From<SiteError> for HttpError {
    fn from(error: SiteError) -> Self {
        match error {
            SiteError::NotFound => HttpError::new(
                "infra::http::site_error_to_http_error",
                StatusCode::NOT_FOUND,
                "Post not found",
                "No published post matches the requested slug",
            ),
            SiteError::Repo(err) => err.into(),
        }
    }
}

impl From<AdminPostListError> for HttpError {
    fn from(error: AdminPostListError) -> Self {
        let (status, message) = match &error {
            AdminPostListError::UnknownPost(_) => (StatusCode::NOT_FOUND, "Unknown post"),
            AdminPostListError::TargetNotVisible(_) => (
                StatusCode::CONFLICT,
                "Drop target is not on the current page",
            ),
        };
        HttpError::from_error(
            "infra::http::admin_post_list_error_to_http_error",
            status,
            message,
            &error,
        )
    }
}

impl From<AdminEditorError> for HttpError {
    fn from(error: AdminEditorError) -> Self {
        match error {
            AdminEditorError::ConstraintViolation(field) => HttpError::new(
                "infra::http::admin_editor_error_to_http_error",
                StatusCode::BAD_REQUEST,
                "Post could not be saved",
                format!("Field `{field}` is missing or invalid"),
            ),
            AdminEditorError::NotFound => HttpError::new(
                "infra::http::admin_editor_error_to_http_error",
                StatusCode::NOT_FOUND,
                "Post not found",
                "Editor target does not exist",
            ),
            AdminEditorError::Repo(err) => err.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error(transparent)]
    Infra(#[from] InfraError),
    #[error("unexpected error: {0}")]
    Unexpected(String),
}

impl AppError {
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::Unexpected(message.into())
    }

    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Domain(DomainError::Validation { .. }) => StatusCode::BAD_REQUEST,
            AppError::Infra(InfraError::Backend(err)) => repo_status(err).0,
            AppError::Infra(InfraError::Configuration { .. })
            | AppError::Infra(InfraError::Telemetry(_))
            | AppError::Infra(InfraError::Io(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn presentation_message(&self) -> &'static str {
        match self {
            AppError::Domain(DomainError::Validation { .. }) => "Request could not be processed",
            AppError::Infra(InfraError::Backend(err)) => repo_status(err).1,
            AppError::Infra(InfraError::Configuration { .. }) => "Service misconfigured",
            AppError::Infra(InfraError::Telemetry(_)) => "Logging subsystem could not start",
            AppError::Infra(InfraError::Io(_)) => "I/O failure during request",
            AppError::Unexpected(_) => "Unexpected error occurred",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.presentation_message();
        let report = ErrorReport::from_error("application::error::AppError", status, &self);
        let mut response = (status, message).into_response();
        report.attach(&mut response);
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_collects_the_source_chain() {
        let error = InfraError::Backend(RepoError::Timeout);
        let report = ErrorReport::from_error("tests", StatusCode::BAD_GATEWAY, &error);
        assert_eq!(
            report.messages,
            vec!["backend error: backend timeout", "backend timeout"]
        );
    }

    #[test]
    fn repo_errors_map_to_gateway_statuses() {
        let response = HttpError::from(RepoError::Timeout).into_response();
        assert_eq!(response.status(), StatusCode::GATEWAY_TIMEOUT);
        assert!(response.extensions().get::<ErrorReport>().is_some());

        let response = HttpError::from(RepoError::Persistence("boom".into())).into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn hidden_drop_target_is_a_conflict() {
        let error = HttpError::from(AdminPostListError::TargetNotVisible("p9".into()));
        assert_eq!(error.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn app_error_maps_domain_validation_to_bad_request() {
        let response =
            AppError::from(DomainError::validation("bucket", "unknown bucket")).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let report = response.extensions().get::<ErrorReport>().expect("report");
        assert_eq!(report.messages[0], "invalid bucket: unknown bucket");
    }
}
