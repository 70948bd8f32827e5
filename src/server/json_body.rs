//! JSON request bodies that fail with the API error shape.

use super::error::ApiError;
use axum::{
    extract::{rejection::JsonRejection, FromRequest, Request},
    http::StatusCode,
    Json,
};
use serde::de::DeserializeOwned;
use tracing::debug;

/// Like [`Json`], but a body that is not valid JSON, or does not match the
/// expected field types, is answered with 400 `ValidationFailure`.
#[derive(Debug)]
pub struct JsonBody<T>(pub T);

impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(JsonBody(value)),
            Err(rejection) => Err(rejection.into()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        debug!("Rejected request body: {}", rejection.body_text());
        let msg = match rejection {
            JsonRejection::MissingJsonContentType(_) => {
                "Expected a JSON body with content-type application/json".to_string()
            }
            other => other.body_text(),
        };
        ApiError::new(StatusCode::BAD_REQUEST, "ValidationFailure", msg)
    }
}
