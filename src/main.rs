use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use std::path::PathBuf;
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use music_catalog_server::config::{AppConfig, CliConfig, FileConfig};
use music_catalog_server::{
    run_server, AuthGate, CatalogService, CatalogStore, RequestsLoggingLevel, ServerConfig,
    ServerState, SqliteAdminStore, SqliteCatalogStore, TokenCodec,
};

fn parse_path(s: &str) -> Result<PathBuf> {
    let path_buf = PathBuf::from(s);
    let original_path = match path_buf.canonicalize() {
        Ok(path) => path,
        Err(msg) => {
            if msg.kind() == std::io::ErrorKind::NotFound {
                path_buf
            } else {
                return Err(msg).with_context(|| format!("Error resolving path: {}", s));
            }
        }
    };
    if original_path.is_absolute() {
        return Ok(original_path);
    }
    let cwd = std::env::current_dir()?;
    Ok(cwd.join(original_path))
}

#[derive(Parser, Debug)]
struct CliArgs {
    /// Directory holding catalog.db and admin.db.
    #[clap(long, value_parser = parse_path)]
    pub db_dir: Option<PathBuf>,

    /// The port to listen on.
    #[clap(short, long, default_value_t = 5000)]
    pub port: u16,

    /// The level of logging to perform on each request.
    #[clap(long, default_value = "path")]
    pub logging_level: RequestsLoggingLevel,

    /// Secret used to sign admin tokens, at least 16 bytes.
    #[clap(long, env = "JWT_SECRET", hide_env_values = true)]
    pub jwt_secret: Option<String>,

    /// Lifetime of an admin token in seconds.
    #[clap(long, default_value_t = 360000)]
    pub token_ttl_sec: u64,

    /// Number of read-only catalog connections.
    #[clap(long, default_value_t = 4)]
    pub read_pool_size: usize,

    /// Path to the frontend directory to be statically served.
    #[clap(long)]
    pub frontend_dir_path: Option<String>,

    /// Turns off POST /api/admin/register.
    #[clap(long)]
    pub disable_registration: bool,

    /// Optional TOML file whose values override the flags above.
    #[clap(long, value_parser = parse_path)]
    pub config: Option<PathBuf>,
}

impl CliArgs {
    fn to_cli_config(&self) -> CliConfig {
        CliConfig {
            db_dir: self.db_dir.clone(),
            port: self.port,
            logging_level: self.logging_level.clone(),
            frontend_dir_path: self.frontend_dir_path.clone(),
            read_pool_size: self.read_pool_size,
            jwt_secret: self.jwt_secret.clone(),
            token_ttl_sec: self.token_ttl_sec,
            disable_registration: self.disable_registration,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .context("Failed to initialize logging")?;

    let file_config = match &cli_args.config {
        Some(path) => {
            info!("Loading config file {:?}", path);
            Some(FileConfig::load(path)?)
        }
        None => None,
    };
    let config = AppConfig::resolve(&cli_args.to_cli_config(), file_config)?;

    info!(
        "Opening SQLite catalog database at {:?}...",
        config.catalog_db_path()
    );
    let catalog_store = Arc::new(SqliteCatalogStore::new(
        config.catalog_db_path(),
        config.read_pool_size,
    )?);
    let catalog_store: Arc<dyn CatalogStore> = catalog_store;

    info!(
        "Opening SQLite admin database at {:?}...",
        config.admin_db_path()
    );
    let admin_store = Arc::new(SqliteAdminStore::new(config.admin_db_path())?);

    let auth_gate = AuthGate::new(
        admin_store,
        TokenCodec::new(config.auth.jwt_secret.as_bytes(), config.auth.token_ttl_sec),
        config.auth.registration_enabled,
    );
    if !config.auth.registration_enabled {
        info!("Admin registration is disabled");
    }

    let server_config = ServerConfig {
        requests_logging_level: config.logging_level.clone(),
        port: config.port,
        frontend_dir_path: config.frontend_dir_path.clone(),
    };
    let state = ServerState::new(server_config, CatalogService::new(catalog_store), auth_gate);

    info!("Ready to serve at port {}!", config.port);
    run_server(state).await
}
