use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::{handlers, state::AppState};

pub struct ApiServer {
    state: AppState,
    allowed_origins: Vec<String>,
}

impl ApiServer {
    #[must_use]
    pub fn new(state: AppState, allowed_origins: Vec<String>) -> Self {
        Self {
            state,
            allowed_origins,
        }
    }

    pub fn router(&self) -> Router {
        let origins: Vec<HeaderValue> = self
            .allowed_origins
            .iter()
            .filter_map(|origin| match origin.parse::<HeaderValue>() {
                Ok(value) => Some(value),
                Err(_) => {
                    warn!("Ignoring invalid CORS origin: {}", origin);
                    None
                }
            })
            .collect();

        let cors = CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods([Method::GET, Method::POST])
            .allow_headers([header::CONTENT_TYPE]);

        Router::new()
            .route("/api/health", get(handlers::health))
            .route("/api/backtest/run", post(handlers::run_backtest))
            .route("/api/backtest/compare", post(handlers::compare_strategies))
            .layer(cors)
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Starts the web server listening on the specified address.
    ///
    /// # Errors
    /// Returns an error if the server fails to bind to the address or serve requests.
    pub async fn serve(self, addr: &str) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!("Backtest API listening on {}", addr);

        axum::serve(listener, self.router()).await?;

        Ok(())
    }
}
