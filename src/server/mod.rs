mod admin_routes;
mod browse_routes;
pub mod config;
pub mod error;
mod http_layers;
mod json_body;
#[allow(clippy::module_inception)]
pub mod server;
pub(self) mod session;
pub mod state;

pub use config::ServerConfig;
pub use http_layers::*;
pub use server::{make_app, run_server, run_server_with_shutdown};
pub use state::ServerState;
