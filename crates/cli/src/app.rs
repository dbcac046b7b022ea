//! Wiring: settings → token store → per-group clients → session

use anyhow::{Context, Result};
use banquet_core::{FileTokenStore, Settings, TokenStore};
use banquet_http::client::{ApiClientBuilder, AuthClient, ResourceClient, ResourceKind};
use banquet_session::{RouteGuard, RouteTargets, Session};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

pub struct App {
    pub settings: Settings,
    pub session: Session,
    pub routes: RouteTargets,
    clients: ApiClientBuilder,
}

impl App {
    pub fn new(settings: &Settings, token_dir: Option<PathBuf>) -> Result<Self> {
        let token_dir = token_dir.or_else(|| settings.storage.token_dir.clone());
        let store = FileTokenStore::resolve(token_dir.as_deref())
            .context("Failed to locate token storage")?;
        debug!(path = %store.path().display(), "Using token store");
        let tokens: Arc<dyn TokenStore> = Arc::new(store);

        let clients = ApiClientBuilder::from_settings(&settings.api).token_store(tokens.clone());
        let auth = AuthClient::new(clients.clone().build()?);

        Ok(Self {
            settings: settings.clone(),
            session: Session::new(Arc::new(auth), tokens),
            routes: RouteTargets::from(&settings.routes),
            clients,
        })
    }

    /// Build the client for one resource group
    pub fn resource(&self, kind: ResourceKind) -> Result<ResourceClient> {
        let client = self.clients.clone().build()?;
        Ok(ResourceClient::new(client, kind))
    }

    pub fn guard(&self) -> RouteGuard {
        RouteGuard::new(self.routes.clone())
    }
}
