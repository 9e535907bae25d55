use std::time::Instant;

use axum::{
    body::Body,
    extract::MatchedPath,
    http::{HeaderValue, Method, Request},
    middleware::Next,
    response::Response,
};
use tracing::{debug, error, warn};
use uuid::Uuid;

use crate::application::error::ErrorReport;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// What the access log knows about a request: its id, the route template it
/// matched and the post it addresses, if any.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub request_id: String,
    pub route: Option<String>,
    pub subject: Option<String>,
}

impl RequestContext {
    fn capture(request: &Request<Body>) -> Self {
        let route = request
            .extensions()
            .get::<MatchedPath>()
            .map(|matched| matched.as_str().to_string());
        let subject = route
            .as_deref()
            .and_then(|template| route_subject(template, request.uri().path()))
            .map(str::to_string);

        Self {
            request_id: Uuid::new_v4().to_string(),
            route,
            subject,
        }
    }

    fn route_label(&self) -> &str {
        self.route.as_deref().unwrap_or("<unmatched>")
    }
}

/// Value bound to the `{id}` or `{slug}` segment of `template` in `path`.
fn route_subject<'a>(template: &str, path: &'a str) -> Option<&'a str> {
    let mut template_segments = template.split('/');
    let mut path_segments = path.split('/');
    loop {
        match (template_segments.next(), path_segments.next()) {
            (Some("{id}" | "{slug}"), Some(value)) if !value.is_empty() => return Some(value),
            (Some(_), Some(_)) => continue,
            _ => return None,
        }
    }
}

/// Tag every request with a [`RequestContext`], echo its id back in
/// `x-request-id`, and log the outcome: failures with the attached
/// [`ErrorReport`] chain, successes at debug.
pub async fn trace_requests(mut request: Request<Body>, next: Next) -> Response {
    let ctx = RequestContext::capture(&request);
    request.extensions_mut().insert(ctx.clone());

    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let start = Instant::now();

    let mut response = next.run(request).await;

    if let Ok(value) = HeaderValue::from_str(&ctx.request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    log_outcome(&ctx, &method, &path, start, &mut response);
    response.extensions_mut().insert(ctx);
    response
}

fn log_outcome(
    ctx: &RequestContext,
    method: &Method,
    path: &str,
    start: Instant,
    response: &mut Response,
) {
    let status = response.status();
    let elapsed_ms = start.elapsed().as_millis();
    let subject = ctx.subject.as_deref().unwrap_or("");

    if !status.is_client_error() && !status.is_server_error() {
        debug!(
            target = "folio::http::response",
            status = status.as_u16(),
            method = %method,
            route = ctx.route_label(),
            subject,
            elapsed_ms,
            request_id = %ctx.request_id,
            "request served",
        );
        return;
    }

    let (source, messages) = match response.extensions_mut().remove::<ErrorReport>() {
        Some(report) => (report.source, report.messages),
        None => ("unknown", Vec::new()),
    };
    let detail = messages
        .first()
        .map(String::as_str)
        .unwrap_or("no diagnostic available");

    if status.is_server_error() {
        error!(
            target = "folio::http::response",
            status = status.as_u16(),
            method = %method,
            route = ctx.route_label(),
            path,
            subject,
            elapsed_ms,
            source,
            detail,
            chain = ?messages,
            request_id = %ctx.request_id,
            "request failed",
        );
    } else {
        warn!(
            target = "folio::http::response",
            status = status.as_u16(),
            method = %method,
            route = ctx.route_label(),
            path,
            subject,
            elapsed_ms,
            source,
            detail,
            chain = ?messages,
            request_id = %ctx.request_id,
            "request rejected",
        );
    }
}
