pub mod config;
pub mod dto;
pub mod error;
pub mod gateway;
pub mod models;
pub mod services;

use std::sync::Arc;

use uuid::Uuid;

use crate::config::Config;
use crate::dto::auth_dto::{LoginPayload, TokenResponse};
use crate::error::Result;
use crate::gateway::http::HttpGateway;
use crate::gateway::Gateway;
use crate::services::selection_service::ScreenCoordinator;

/// Explicit application context: configuration plus the authenticated
/// gateway. Created once at startup, dropped on logout; nothing in the crate
/// reads global state.
#[derive(Clone)]
pub struct AppContext {
    pub config: Config,
    gateway: Arc<HttpGateway>,
}

impl AppContext {
    pub fn from_env() -> Result<Self> {
        let config = Config::from_env()?;
        Self::new(config)
    }

    pub fn new(config: Config) -> Result<Self> {
        let gateway = Arc::new(HttpGateway::new(&config)?);
        Ok(Self { config, gateway })
    }

    pub fn gateway(&self) -> Arc<dyn Gateway> {
        self.gateway.clone()
    }

    pub async fn login(&self, payload: &LoginPayload) -> Result<TokenResponse> {
        self.gateway.login(payload).await
    }

    /// Drops the session token; a later 401 would have the same effect on
    /// the caller's side.
    pub fn logout(&self) {
        self.gateway.clear_session();
    }

    pub fn is_authenticated(&self) -> bool {
        self.gateway.has_session()
    }

    /// Opens a listing screen over one job's candidates. Each screen owns
    /// its list; screens never share candidate state.
    pub async fn open_screen(&self, job_id: Uuid) -> Result<ScreenCoordinator> {
        ScreenCoordinator::load(self.gateway(), job_id).await
    }
}

/// Structured logging for binaries and tests embedding this crate.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();
}
