//! REST wrapper around the scraper
//!
//! - `GET /health`: liveness
//! - `POST /scrape`: run one gated session and return its data
//!
//! At most one scrape runs at a time; a concurrent request gets `429`.

mod handlers;
mod routes;

pub use handlers::{BUSY_DETAIL, ErrorBody, ScrapeRequest, ScrapeResponse};
pub use routes::create_router;

use std::net::SocketAddr;
use std::sync::Arc;

use crate::config::ScrapeConfig;
use crate::scrape_engine::ScrapeRunner;

/// Shared state for the service
#[derive(Clone)]
pub struct AppState {
    pub runner: ScrapeRunner,
    /// Settings applied to every request before its own overrides
    pub defaults: Arc<ScrapeConfig>,
}

impl AppState {
    #[must_use]
    pub fn new(runner: ScrapeRunner, defaults: ScrapeConfig) -> Self {
        Self {
            runner,
            defaults: Arc::new(defaults),
        }
    }
}

/// Bind `addr` and serve until the process stops
pub async fn serve(state: AppState, addr: SocketAddr) -> anyhow::Result<()> {
    let app = create_router(state);
    tracing::info!("Starting scrape service at http://{addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
