mod handlers;
mod router;

use anyhow::Result;
use async_trait::async_trait;
use tracing::info;

use crate::core::lifecycle::LifecycleComponent;
use crate::core::pipeline::bus::EventBus;
use crate::core::store::StateStore;

pub struct ApiServerConfig {
    pub bus: EventBus,
    pub store: StateStore,
    pub log_tx: tokio::sync::broadcast::Sender<String>,
    pub api_host: String,
    pub api_port: u16,
}

pub struct ApiServer {
    bus: EventBus,
    store: StateStore,
    log_tx: tokio::sync::broadcast::Sender<String>,
    api_host: String,
    api_port: u16,
}

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) bus: EventBus,
    pub(crate) store: StateStore,
    pub(crate) log_tx: tokio::sync::broadcast::Sender<String>,
    pub(crate) api_port: u16,
}

impl ApiServer {
    pub fn new(config: ApiServerConfig) -> Self {
        Self {
            bus: config.bus,
            store: config.store,
            log_tx: config.log_tx,
            api_host: config.api_host,
            api_port: config.api_port,
        }
    }
}

#[async_trait]
impl LifecycleComponent for ApiServer {
    async fn on_init(&mut self) -> Result<()> {
        info!("API Server Interface initializing...");
        Ok(())
    }

    async fn on_start(&mut self) -> Result<()> {
        let state = AppState {
            bus: self.bus.clone(),
            store: self.store.clone(),
            log_tx: self.log_tx.clone(),
            api_port: self.api_port,
        };
        let addr = format!("{}:{}", self.api_host, self.api_port);

        tokio::spawn(async move {
            let app = router::build_api_router(state);
            match tokio::net::TcpListener::bind(&addr).await {
                Ok(listener) => {
                    info!("API Server running at http://{addr}");
                    if let Err(e) = axum::serve(listener, app).await {
                        tracing::error!("API Server crashed: {}", e);
                    }
                }
                Err(e) => tracing::error!("API Server failed to bind {}: {}", addr, e),
            }
        });
        Ok(())
    }

    async fn on_shutdown(&mut self) -> Result<()> {
        info!("API Server Interface shutting down...");
        Ok(())
    }
}
