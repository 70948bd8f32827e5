use crate::admin::AuthError;
use crate::catalog_service::CatalogError;
use crate::catalog_store::validation::{FieldErrors, ReferenceError};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::error;

pub const SERVER_ERROR_MESSAGE: &str = "Server Error";

#[derive(Debug, Serialize)]
pub struct ErrorEntry {
    pub msg: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub param: Option<&'static str>,
}

/// `{"kind": ..., "errors": [{"msg": ..., "param": ...}]}`
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub kind: &'static str,
    pub errors: Vec<ErrorEntry>,
}

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: ErrorBody,
}

impl ApiError {
    pub fn new(status: StatusCode, kind: &'static str, msg: impl Into<String>) -> Self {
        ApiError {
            status,
            body: ErrorBody {
                kind,
                errors: vec![ErrorEntry {
                    msg: msg.into(),
                    param: None,
                }],
            },
        }
    }

    pub fn validation(errors: FieldErrors) -> Self {
        ApiError {
            status: StatusCode::BAD_REQUEST,
            body: ErrorBody {
                kind: "ValidationFailure",
                errors: errors
                    .0
                    .into_iter()
                    .map(|e| ErrorEntry {
                        msg: e.msg,
                        param: Some(e.param),
                    })
                    .collect(),
            },
        }
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, "NotFound", msg)
    }

    pub fn unauthorized() -> Self {
        Self::new(
            StatusCode::UNAUTHORIZED,
            "Unauthorized",
            "No token, authorization denied",
        )
    }

    /// Logs the cause and answers with the generic message.
    pub fn server_error(cause: &dyn std::fmt::Display) -> Self {
        error!("{}", cause);
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "StoreFailure",
            SERVER_ERROR_MESSAGE,
        )
    }
}

impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::Validation(errors) => ApiError::validation(errors),
            CatalogError::Reference(reference) => {
                let msg = reference.to_string();
                match reference {
                    ReferenceError::DuplicateGenre(_) | ReferenceError::DuplicateFeature(_) => {
                        ApiError::new(StatusCode::BAD_REQUEST, "DuplicateReference", msg)
                    }
                    ReferenceError::SelfFeature(_) => {
                        ApiError::new(StatusCode::BAD_REQUEST, "SelfReferenceViolation", msg)
                    }
                    ReferenceError::GenreNotFound(_) | ReferenceError::FeatureNotFound(_) => {
                        ApiError::new(StatusCode::NOT_FOUND, "ReferenceNotFound", msg)
                    }
                    ReferenceError::Store(store_err) => ApiError::server_error(&store_err),
                }
            }
            err @ CatalogError::ArtistNotFound(_) => {
                ApiError::new(StatusCode::NOT_FOUND, "ReferenceNotFound", err.to_string())
            }
            err @ CatalogError::NotFound { .. } => ApiError::not_found(err.to_string()),
            err @ CatalogError::OwnershipMismatch { .. } => {
                ApiError::new(StatusCode::NOT_FOUND, "OwnershipMismatch", err.to_string())
            }
            CatalogError::Store(store_err) => ApiError::server_error(&store_err),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Validation(errors) => ApiError::validation(errors),
            AuthError::InvalidCredentials => ApiError::new(
                StatusCode::BAD_REQUEST,
                "InvalidCredentials",
                err.to_string(),
            ),
            AuthError::AdminAlreadyExists => ApiError::new(
                StatusCode::BAD_REQUEST,
                "AdminAlreadyExists",
                err.to_string(),
            ),
            AuthError::RegistrationDisabled => ApiError::new(
                StatusCode::FORBIDDEN,
                "RegistrationDisabled",
                err.to_string(),
            ),
            AuthError::Unauthorized => ApiError::unauthorized(),
            AuthError::Internal(cause) => ApiError::server_error(&cause),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

pub type ApiResult<T> = Result<Json<T>, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog_store::{EntityKind, StoreError};

    #[test]
    fn maps_catalog_errors_to_statuses() {
        let cases = vec![
            (
                CatalogError::Reference(ReferenceError::DuplicateGenre("g".into())),
                StatusCode::BAD_REQUEST,
                "DuplicateReference",
            ),
            (
                CatalogError::Reference(ReferenceError::SelfFeature("a".into())),
                StatusCode::BAD_REQUEST,
                "SelfReferenceViolation",
            ),
            (
                CatalogError::Reference(ReferenceError::FeatureNotFound("a".into())),
                StatusCode::NOT_FOUND,
                "ReferenceNotFound",
            ),
            (
                CatalogError::ArtistNotFound("a".into()),
                StatusCode::NOT_FOUND,
                "ReferenceNotFound",
            ),
            (
                CatalogError::OwnershipMismatch {
                    kind: EntityKind::Album,
                    id: "x".into(),
                    artist_id: "a".into(),
                },
                StatusCode::NOT_FOUND,
                "OwnershipMismatch",
            ),
            (
                CatalogError::Store(StoreError::Constraint("UNIQUE".into())),
                StatusCode::INTERNAL_SERVER_ERROR,
                "StoreFailure",
            ),
        ];

        for (err, status, kind) in cases {
            let api_error = ApiError::from(err);
            assert_eq!(api_error.status, status);
            assert_eq!(api_error.body.kind, kind);
        }
    }

    #[test]
    fn store_failures_hide_details() {
        let api_error = ApiError::from(CatalogError::Store(StoreError::Constraint(
            "UNIQUE constraint failed: genres.name".into(),
        )));
        assert_eq!(api_error.body.errors[0].msg, SERVER_ERROR_MESSAGE);
    }

    #[test]
    fn validation_keeps_params() {
        let api_error = ApiError::from(AuthError::Validation(FieldErrors::single(
            "email",
            "Please include a valid email",
        )));
        let json = serde_json::to_value(&api_error.body).unwrap();
        assert_eq!(json["kind"], "ValidationFailure");
        assert_eq!(json["errors"][0]["param"], "email");

        let json = serde_json::to_value(&ApiError::unauthorized().body).unwrap();
        assert!(json["errors"][0].get("param").is_none());
    }
}
