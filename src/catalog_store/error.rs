use super::models::{CascadeReport, EntityKind};
use rusqlite::ErrorCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{kind} '{id}' not found")]
    NotFound { kind: EntityKind, id: String },

    #[error("Constraint violation: {0}")]
    Constraint(String),

    /// An artist cascade stopped after removing some dependents.
    #[error("Artist cascade for '{artist_id}' stopped after deleting {completed:?}: {source}")]
    PartialCascade {
        artist_id: String,
        completed: CascadeReport,
        #[source]
        source: Box<StoreError>,
    },

    #[error("Database error: {0}")]
    Database(#[source] rusqlite::Error),

    #[error("Catalog store connection lock poisoned")]
    Poisoned,
}

impl StoreError {
    pub fn not_found(kind: EntityKind, id: &str) -> Self {
        StoreError::NotFound {
            kind,
            id: id.to_string(),
        }
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(failure, message)
                if failure.code == ErrorCode::ConstraintViolation =>
            {
                StoreError::Constraint(
                    message
                        .clone()
                        .unwrap_or_else(|| failure.to_string()),
                )
            }
            _ => StoreError::Database(err),
        }
    }
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;
