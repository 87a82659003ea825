use std::sync::Arc;

use strata_page::ContentPage;
use tokio::net::TcpListener;

use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::router::build_router;

/// Strata content server.
pub struct StrataServer {
    config: ServerConfig,
    page: Arc<ContentPage>,
}

impl StrataServer {
    /// Build the page described by `config.page`.
    pub fn new(config: ServerConfig) -> ServerResult<Self> {
        let page = config.page.build()?;
        Ok(Self::with_page(config, page))
    }

    /// Serve an already built page. `config.page` is ignored.
    pub fn with_page(config: ServerConfig, page: ContentPage) -> Self {
        Self {
            config,
            page: Arc::new(page),
        }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn page(&self) -> &ContentPage {
        &self.page
    }

    /// Build the router (useful for testing).
    pub fn router(&self) -> axum::Router {
        build_router(Arc::clone(&self.page))
    }

    /// Start serving requests.
    pub async fn serve(self) -> ServerResult<()> {
        let app = self.router();
        let listener = TcpListener::bind(self.config.bind_addr).await?;
        tracing::info!(
            root = %self.config.page.root.display(),
            "Strata server listening on {}",
            self.config.bind_addr
        );
        axum::serve(listener, app)
            .await
            .map_err(|e| ServerError::Internal(e.to_string()))
    }
}
