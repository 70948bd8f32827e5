use super::admin_models::{AdminIdentity, LoginInput, RegisterInput};
use super::admin_store::AdminStore;
use super::auth::{CatalogHasher, TokenCodec};
use crate::catalog_store::validation::{FieldError, FieldErrors};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

pub const MIN_PASSWORD_LENGTH: usize = 6;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid Credentials")]
    InvalidCredentials,

    #[error("Admin already exists")]
    AdminAlreadyExists,

    #[error("Registration is disabled")]
    RegistrationDisabled,

    #[error("No valid admin token")]
    Unauthorized,

    #[error("{0}")]
    Validation(FieldErrors),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

/// Something shaped like `local@domain.tld`, without whitespace.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}

fn push_error(errors: &mut Vec<FieldError>, param: &'static str, msg: &str) {
    errors.push(FieldError {
        msg: msg.to_string(),
        param,
    });
}

/// Issues admin credentials and checks them on every admin request.
pub struct AuthGate {
    store: Arc<dyn AdminStore>,
    codec: TokenCodec,
    registration_enabled: bool,
}

impl AuthGate {
    pub fn new(store: Arc<dyn AdminStore>, codec: TokenCodec, registration_enabled: bool) -> Self {
        AuthGate {
            store,
            codec,
            registration_enabled,
        }
    }

    pub fn token_ttl_sec(&self) -> i64 {
        self.codec.ttl_sec()
    }

    /// Returns a fresh token. Unknown email and wrong password fail the same way.
    pub fn authenticate(&self, input: &LoginInput) -> Result<String, AuthError> {
        let mut errors = Vec::new();
        let email = input.email.as_deref().unwrap_or_default();
        if !is_valid_email(email) {
            push_error(&mut errors, "email", "Please include a valid email");
        }
        let password = input.password.as_deref().unwrap_or_default();
        if password.is_empty() {
            push_error(&mut errors, "password", "Password is required");
        }
        if !errors.is_empty() {
            return Err(AuthError::Validation(FieldErrors(errors)));
        }

        let Some(admin) = self.store.get_admin_by_email(email)? else {
            debug!("Login attempt for unknown admin email");
            return Err(AuthError::InvalidCredentials);
        };
        if !admin.hasher.verify(password, &admin.password_hash)? {
            debug!("Wrong password for admin {}", admin.id);
            return Err(AuthError::InvalidCredentials);
        }

        self.store.touch_last_login(&admin.id)?;
        info!("Admin {} logged in", admin.id);
        Ok(self.codec.issue(&admin.id)?)
    }

    /// Creates an admin account and logs it in.
    pub fn register(&self, input: &RegisterInput) -> Result<String, AuthError> {
        if !self.registration_enabled {
            return Err(AuthError::RegistrationDisabled);
        }

        let mut errors = Vec::new();
        let name = input.name.as_deref().unwrap_or_default().trim();
        if name.is_empty() {
            push_error(&mut errors, "name", "Name is required");
        }
        let email = input.email.as_deref().unwrap_or_default();
        if !is_valid_email(email) {
            push_error(&mut errors, "email", "Please include a valid email");
        }
        let password = input.password.as_deref().unwrap_or_default();
        if password.chars().count() < MIN_PASSWORD_LENGTH {
            push_error(
                &mut errors,
                "password",
                "Please enter a password with 6 or more characters",
            );
        }
        if !errors.is_empty() {
            return Err(AuthError::Validation(FieldErrors(errors)));
        }

        if self.store.get_admin_by_email(email)?.is_some() {
            return Err(AuthError::AdminAlreadyExists);
        }

        let hasher = CatalogHasher::Argon2;
        let hash = hasher.hash(password)?;
        let admin = self.store.create_admin(name, email, &hash, hasher)?;
        info!("Registered admin {}", admin.id);
        Ok(self.codec.issue(&admin.id)?)
    }

    pub fn verify(&self, token: &str) -> Result<AdminIdentity, AuthError> {
        let claims = self.codec.decode(token).map_err(|err| {
            debug!("{}", err);
            AuthError::Unauthorized
        })?;
        match self.store.get_admin(&claims.admin.id)? {
            Some(admin) => Ok(AdminIdentity::from(&admin)),
            None => {
                debug!("Token for deleted admin {}", claims.admin.id);
                Err(AuthError::Unauthorized)
            }
        }
    }
}
