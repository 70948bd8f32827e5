use crate::catalog_store::validation::{FieldErrors, ReferenceError};
use crate::catalog_store::{EntityKind, StoreError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Invalid fields: {0}")]
    Validation(FieldErrors),

    #[error(transparent)]
    Reference(ReferenceError),

    /// The owning artist named in the request path does not exist.
    #[error("Artist {0} does not exist")]
    ArtistNotFound(String),

    #[error("{kind} not found")]
    NotFound { kind: EntityKind, id: String },

    #[error("{kind} {id} does not belong to artist {artist_id}")]
    OwnershipMismatch {
        kind: EntityKind,
        id: String,
        artist_id: String,
    },

    #[error(transparent)]
    Store(StoreError),
}

impl From<FieldErrors> for CatalogError {
    fn from(errors: FieldErrors) -> Self {
        CatalogError::Validation(errors)
    }
}

impl From<StoreError> for CatalogError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { kind, id } => CatalogError::NotFound { kind, id },
            other => CatalogError::Store(other),
        }
    }
}

impl From<ReferenceError> for CatalogError {
    fn from(err: ReferenceError) -> Self {
        match err {
            ReferenceError::Store(store_err) => CatalogError::Store(store_err),
            other => CatalogError::Reference(other),
        }
    }
}

pub type CatalogResult<T> = std::result::Result<T, CatalogError>;
