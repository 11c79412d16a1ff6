pub mod envelope;
pub mod handlers;
mod routes;

pub use routes::{create_router, scrape_path};

use std::sync::Arc;
use tokio::net::TcpListener;

use crate::adapters::{JustdialAdapter, OverpassClient, UpstreamClient, WikipediaAdapter};
use crate::core::dispatcher::ScraperDispatcher;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{GatewayError, Result};

/// Web 伺服器共用的唯讀狀態
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<ScraperDispatcher>,
    pub overpass: Arc<OverpassClient>,
}

impl AppState {
    pub fn new(dispatcher: ScraperDispatcher, overpass: OverpassClient) -> Self {
        Self {
            dispatcher: Arc::new(dispatcher),
            overpass: Arc::new(overpass),
        }
    }

    /// 依設定組裝上游 client、站點 adapter 與地理資料 client
    pub fn from_config<C: ConfigProvider + ?Sized>(config: &C) -> Result<Self> {
        let upstream = UpstreamClient::from_config(config)?;

        let dispatcher = ScraperDispatcher::builder()
            .register(Arc::new(WikipediaAdapter::new(
                upstream.clone(),
                config.wikipedia_base_url(),
            )))
            .register(Arc::new(JustdialAdapter::new(
                upstream.clone(),
                config.justdial_base_url(),
                config.max_concurrent_requests(),
            )))
            .build()?;

        let overpass = OverpassClient::new(upstream, config.overpass_endpoint());

        Ok(Self::new(dispatcher, overpass))
    }
}

/// 啟動 Web 伺服器，直到收到 Ctrl-C
pub async fn serve<C: ConfigProvider + ?Sized>(config: &C) -> Result<()> {
    let state = AppState::from_config(config)?;
    let app = create_router(state);

    let address = config.bind_address();
    let listener = TcpListener::bind(&address)
        .await
        .map_err(|e| GatewayError::BindError {
            address: address.clone(),
            message: e.to_string(),
        })?;

    tracing::info!("🚀 Listening on http://{}", address);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Shutdown signal received"),
        Err(e) => {
            tracing::error!("Failed to listen for shutdown signal: {}", e);
            std::future::pending::<()>().await;
        }
    }
}
