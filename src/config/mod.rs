mod file_config;

pub use file_config::{AuthConfig, FileConfig};

use crate::server::RequestsLoggingLevel;
use anyhow::{bail, Result};
use clap::ValueEnum;
use std::path::PathBuf;

pub const MIN_JWT_SECRET_LENGTH: usize = 16;

/// CLI arguments that can be used for config resolution.
/// This struct mirrors the CLI arguments that can be overridden by TOML config.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub db_dir: Option<PathBuf>,
    pub port: u16,
    pub logging_level: RequestsLoggingLevel,
    pub frontend_dir_path: Option<String>,
    pub read_pool_size: usize,
    pub jwt_secret: Option<String>,
    pub token_ttl_sec: u64,
    pub disable_registration: bool,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub db_dir: PathBuf,
    pub port: u16,
    pub logging_level: RequestsLoggingLevel,
    pub frontend_dir_path: Option<String>,
    pub read_pool_size: usize,

    pub auth: AuthSettings,
}

#[derive(Clone)]
pub struct AuthSettings {
    pub jwt_secret: String,
    pub token_ttl_sec: u64,
    pub registration_enabled: bool,
}

impl std::fmt::Debug for AuthSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthSettings")
            .field("jwt_secret", &"<redacted>")
            .field("token_ttl_sec", &self.token_ttl_sec)
            .field("registration_enabled", &self.registration_enabled)
            .finish()
    }
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let db_dir = file
            .db_dir
            .map(PathBuf::from)
            .or_else(|| cli.db_dir.clone())
            .ok_or_else(|| {
                anyhow::anyhow!("db_dir must be specified via --db-dir or in config file")
            })?;

        if !db_dir.exists() {
            bail!("Database directory does not exist: {:?}", db_dir);
        }
        if !db_dir.is_dir() {
            bail!("db_dir is not a directory: {:?}", db_dir);
        }

        let port = file.port.unwrap_or(cli.port);

        let logging_level = file
            .logging_level
            .and_then(|s| parse_logging_level(&s))
            .unwrap_or_else(|| cli.logging_level.clone());

        let frontend_dir_path = file
            .frontend_dir_path
            .or_else(|| cli.frontend_dir_path.clone());

        let read_pool_size = file.read_pool_size.unwrap_or(cli.read_pool_size);
        if read_pool_size == 0 {
            bail!("read_pool_size must be at least 1");
        }

        let auth_file = file.auth.unwrap_or_default();
        let jwt_secret = auth_file
            .jwt_secret
            .or_else(|| cli.jwt_secret.clone())
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "A JWT secret must be specified via --jwt-secret, JWT_SECRET or in config file"
                )
            })?;
        if jwt_secret.len() < MIN_JWT_SECRET_LENGTH {
            bail!(
                "JWT secret must be at least {} bytes long",
                MIN_JWT_SECRET_LENGTH
            );
        }

        let token_ttl_sec = auth_file.token_ttl_sec.unwrap_or(cli.token_ttl_sec);
        if token_ttl_sec == 0 {
            bail!("token_ttl_sec must be positive");
        }

        let registration_enabled = auth_file
            .registration_enabled
            .unwrap_or(!cli.disable_registration);

        Ok(Self {
            db_dir,
            port,
            logging_level,
            frontend_dir_path,
            read_pool_size,
            auth: AuthSettings {
                jwt_secret,
                token_ttl_sec,
                registration_enabled,
            },
        })
    }

    pub fn catalog_db_path(&self) -> PathBuf {
        self.db_dir.join("catalog.db")
    }

    pub fn admin_db_path(&self) -> PathBuf {
        self.db_dir.join("admin.db")
    }
}

/// Parses a logging level string into RequestsLoggingLevel.
/// Uses clap's ValueEnum trait for parsing.
fn parse_logging_level(s: &str) -> Option<RequestsLoggingLevel> {
    RequestsLoggingLevel::from_str(s, true).ok()
}
