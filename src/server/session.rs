use super::error::ApiError;
use super::state::ServerState;
use crate::admin::AdminIdentity;

use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use tracing::debug;

pub const COOKIE_SESSION_TOKEN_KEY: &str = "session_token";
pub const HEADER_AUTH_TOKEN_KEY: &str = "x-auth-token";
pub const HEADER_AUTHORIZATION_KEY: &str = "Authorization";

/// A request that carried a valid admin token.
#[derive(Debug)]
pub struct AdminSession {
    pub admin: AdminIdentity,
    pub token: String,
}

fn header_value(parts: &Parts, key: &str) -> Option<String> {
    parts
        .headers
        .get(key)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn extract_token_from_headers(parts: &Parts) -> Option<String> {
    header_value(parts, HEADER_AUTH_TOKEN_KEY).or_else(|| {
        header_value(parts, HEADER_AUTHORIZATION_KEY).map(|value| {
            value
                .strip_prefix("Bearer ")
                .map(|t| t.trim().to_string())
                .unwrap_or(value)
        })
    })
}

fn extract_token_from_cookies(parts: &Parts) -> Option<String> {
    CookieJar::from_headers(&parts.headers)
        .get(COOKIE_SESSION_TOKEN_KEY)
        .map(Cookie::value)
        .map(|s| s.to_string())
}

impl FromRequestParts<ServerState> for AdminSession {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        ctx: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        let token = match extract_token_from_headers(parts)
            .or_else(|| extract_token_from_cookies(parts))
        {
            Some(token) => token,
            None => {
                debug!("No admin token in headers nor cookies.");
                return Err(ApiError::unauthorized());
            }
        };

        let admin = ctx.auth_gate.verify(&token)?;
        Ok(AdminSession { admin, token })
    }
}
