use axum::extract::FromRef;

use crate::admin::AuthGate;
use crate::catalog_service::CatalogService;
use std::sync::Arc;
use std::time::Instant;

use super::ServerConfig;

pub type GuardedCatalogService = Arc<CatalogService>;
pub type GuardedAuthGate = Arc<AuthGate>;

#[derive(Clone)]
pub struct ServerState {
    pub config: ServerConfig,
    pub start_time: Instant,
    pub catalog: GuardedCatalogService,
    pub auth_gate: GuardedAuthGate,
}

impl ServerState {
    pub fn new(config: ServerConfig, catalog: CatalogService, auth_gate: AuthGate) -> Self {
        ServerState {
            config,
            start_time: Instant::now(),
            catalog: Arc::new(catalog),
            auth_gate: Arc::new(auth_gate),
        }
    }
}

impl FromRef<ServerState> for GuardedCatalogService {
    fn from_ref(input: &ServerState) -> Self {
        input.catalog.clone()
    }
}

impl FromRef<ServerState> for GuardedAuthGate {
    fn from_ref(input: &ServerState) -> Self {
        input.auth_gate.clone()
    }
}

impl FromRef<ServerState> for ServerConfig {
    fn from_ref(input: &ServerState) -> Self {
        input.config.clone()
    }
}
