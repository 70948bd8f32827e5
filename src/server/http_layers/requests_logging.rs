//! Request logging middleware

use super::super::state::ServerState;
use axum::extract::State;
use axum::{
    body::{Body, Bytes},
    http::{header::HeaderMap, Method, Request, Response, StatusCode},
    middleware::Next,
    response::IntoResponse,
};
use std::time::Instant;
use tracing::{error, info};

#[derive(PartialEq, PartialOrd, Clone, Debug, Default, clap::ValueEnum)]
pub enum RequestsLoggingLevel {
    None,
    #[default]
    Path,
    Headers,
    Body,
}

impl std::fmt::Display for RequestsLoggingLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

const MAX_LOGGABLE_BODY_LENGTH: usize = 1024;

/// Header values that carry admin credentials.
const REDACTED_HEADERS: &[&str] = &["x-auth-token", "authorization", "cookie", "set-cookie"];

/// Requests whose bodies hold a plain password.
fn is_credentials_request(method: &Method, path: &str) -> bool {
    method == Method::POST && matches!(path, "/api/admin" | "/api/admin/register")
}

fn log_headers(label: &str, headers: &HeaderMap) {
    info!("  {} Headers:", label);
    for (name, value) in headers.iter() {
        if REDACTED_HEADERS.contains(&name.as_str()) {
            info!("    {:?}: <redacted>", name);
        } else {
            info!("    {:?}: {:?}", name, value);
        }
    }
}

fn content_length(headers: &HeaderMap) -> Result<usize, &'static str> {
    headers
        .get("content-length")
        .ok_or("Content-length not set.")?
        .to_str()
        .map_err(|_| "Could not get Content-length string value.")?
        .parse::<usize>()
        .map_err(|_| "Could not parse Content-length numeric value.")
}

/// Logs a small body and hands back an equivalent one. `None` means the
/// body could not be read.
async fn log_body(label: &str, headers: &HeaderMap, body: Body) -> Option<Body> {
    let size = match content_length(headers) {
        Ok(size) => size,
        Err(reason) => {
            info!("  {} Body: {}", label, reason);
            return Some(body);
        }
    };
    if size >= MAX_LOGGABLE_BODY_LENGTH {
        info!(
            "  {} Body: Too big to log ({:#})",
            label,
            byte_unit::Byte::from(size)
        );
        return Some(body);
    }

    let bytes: Bytes = match axum::body::to_bytes(body, size).await {
        Ok(bytes) => bytes,
        Err(err) => {
            error!("Failed to read {} body: {:?}", label.to_lowercase(), err);
            return None;
        }
    };
    info!("  {} Body:\n{}", label, String::from_utf8_lossy(&bytes));
    Some(Body::from(bytes))
}

fn internal_error() -> Response<Body> {
    (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
}

pub async fn log_requests(
    State(state): State<ServerState>,
    request: Request<Body>,
    next: Next,
) -> impl IntoResponse {
    let level = state.config.requests_logging_level.clone();
    if level == RequestsLoggingLevel::None {
        return next.run(request).await;
    }

    let start = Instant::now();
    let hide_body = is_credentials_request(request.method(), request.uri().path());
    info!(">>> {} {}", request.method(), request.uri());

    let (parts, body) = request.into_parts();
    if level >= RequestsLoggingLevel::Headers {
        log_headers("Req", &parts.headers);
    }
    let body = if level >= RequestsLoggingLevel::Body && !hide_body {
        match log_body("Req", &parts.headers, body).await {
            Some(body) => body,
            None => return internal_error(),
        }
    } else {
        body
    };

    let response = next.run(Request::from_parts(parts, body)).await;

    let (parts, body) = response.into_parts();
    if level >= RequestsLoggingLevel::Headers {
        log_headers("Resp", &parts.headers);
    }
    let body = if level >= RequestsLoggingLevel::Body && !hide_body {
        match log_body("Resp", &parts.headers, body).await {
            Some(body) => body,
            None => return internal_error(),
        }
    } else {
        body
    };

    info!(
        "<<< {} ({}ms)",
        parts.status.as_u16(),
        start.elapsed().as_millis()
    );
    Response::from_parts(parts, body)
}
