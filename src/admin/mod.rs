mod admin_models;
mod admin_store;
pub mod auth;
mod auth_gate;
mod sqlite_admin_store;

pub use admin_models::{Admin, AdminIdentity, LoginInput, RegisterInput, TokenResponse};
pub use admin_store::AdminStore;
pub use auth::{CatalogHasher, TokenCodec};
pub use auth_gate::{is_valid_email, AuthError, AuthGate, MIN_PASSWORD_LENGTH};
pub use sqlite_admin_store::{SqliteAdminStore, ADMIN_VERSIONED_SCHEMAS};
