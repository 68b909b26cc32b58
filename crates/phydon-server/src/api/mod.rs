//! HTTP routes
//!
//! | route          | purpose                                        |
//! |----------------|------------------------------------------------|
//! | `/`            | service name, version and usage                |
//! | `/health`      | per-rank table availability and build manifest |
//! | `/levels`      | accepted `level` and `stat` values             |
//! | `/growth_rate` | the lookup itself                              |

use std::future::IntoFuture;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use phydon_common::manifest::BuildManifest;
use phydon_common::storage::TableStore;
use phydon_common::{Rank, Statistic};
use phydon_lookup::{AggregateIndex, ApproximateMatcher, LookupResolver};
use serde::Deserialize;
use serde_json::json;
use tokio::signal;
use tokio::sync::Notify;
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use tracing::{info, warn};

use crate::config::Config;
use crate::error::ApiError;
use crate::middleware;

/// Error message for a request without a usable `query`
pub const MISSING_QUERY_MESSAGE: &str = "Missing 'query' parameter.";

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub resolver: Arc<LookupResolver>,
    pub tables: TableStore,
}

impl AppState {
    /// State over the tables in the configured cache directory
    pub fn from_config(config: &Config) -> Self {
        let tables = TableStore::new(&config.lookup.cache_dir);
        let index = Arc::new(AggregateIndex::new(tables.clone()));
        let resolver =
            LookupResolver::new(index).with_matcher(ApproximateMatcher::new(config.lookup.score_cutoff));

        Self {
            resolver: Arc::new(resolver),
            tables,
        }
    }
}

/// Query string of `/growth_rate`
#[derive(Debug, Deserialize)]
pub struct GrowthRateParams {
    pub query: Option<String>,
    pub level: Option<String>,
    pub stat: Option<String>,
}

/// Run the server until Ctrl-C or SIGTERM
pub async fn serve(config: Config) -> anyhow::Result<()> {
    config.validate()?;
    let state = AppState::from_config(&config);

    if config.lookup.preload {
        let resolver = state.resolver.clone();
        tokio::task::spawn_blocking(move || resolver.index().preload()).await??;
        info!("Preloaded all rank tables");
    }

    let app = create_router(state, &config);

    let listener = tokio::net::TcpListener::bind(config.bind_address()).await?;
    info!(
        addr = %listener.local_addr()?,
        cache_dir = %config.lookup.cache_dir.display(),
        "Server listening"
    );

    let shutdown_started = Arc::new(Notify::new());
    let signal = {
        let shutdown_started = shutdown_started.clone();
        async move {
            shutdown_signal().await;
            shutdown_started.notify_one();
        }
    };

    let server = axum::serve(listener, app)
        .with_graceful_shutdown(signal)
        .into_future();
    let timeout = Duration::from_secs(config.server.shutdown_timeout_secs);

    tokio::select! {
        result = server => result?,
        _ = async {
            shutdown_started.notified().await;
            info!("Waiting up to {} seconds for connections to close", timeout.as_secs());
            tokio::time::sleep(timeout).await;
        } => {
            warn!("Shutdown timeout elapsed, closing remaining connections");
        },
    }

    info!("Server shut down");
    Ok(())
}

/// Create the application router with all routes and middleware
pub fn create_router(state: AppState, config: &Config) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/levels", get(levels))
        .route("/growth_rate", get(growth_rate))
        .with_state(state)
        // outermost first
        .layer(
            ServiceBuilder::new()
                .layer(middleware::cors_layer(&config.cors))
                .layer(middleware::tracing_layer())
                .layer(CompressionLayer::new()),
        )
}

async fn root() -> impl IntoResponse {
    Json(json!({
        "service": "Phydon Growth Rate Lookup API",
        "version": env!("CARGO_PKG_VERSION"),
        "usage": "GET /growth_rate?query=<name>&level=<level>&stat=<stat>",
    }))
}

async fn levels() -> impl IntoResponse {
    Json(json!({
        "levels": Rank::names(),
        "stats": Statistic::names(),
    }))
}

/// Reports which rank tables exist on disk and which are already in memory
async fn health(State(state): State<AppState>) -> Response {
    let index = state.resolver.index();
    let ranks: Vec<_> = Rank::ALL
        .into_iter()
        .map(|rank| {
            json!({
                "rank": rank,
                "available": state.tables.exists(rank),
                "loaded": index.is_loaded(rank),
            })
        })
        .collect();
    let ready = Rank::ALL
        .into_iter()
        .all(|rank| index.is_loaded(rank) || state.tables.exists(rank));

    let manifest = match BuildManifest::load(state.tables.dir()) {
        Ok(manifest) => manifest,
        Err(e) => {
            warn!("Unreadable build manifest: {}", e);
            None
        },
    };

    let (status, label) = if ready {
        (StatusCode::OK, "healthy")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "not_built")
    };

    (
        status,
        Json(json!({
            "status": label,
            "ranks": ranks,
            "manifest": manifest,
        })),
    )
        .into_response()
}

async fn growth_rate(
    State(state): State<AppState>,
    Query(params): Query<GrowthRateParams>,
) -> Result<Response, ApiError> {
    let query = params
        .query
        .filter(|query| !query.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest(MISSING_QUERY_MESSAGE.to_string()))?;

    // a first lookup may read Parquet from disk
    let resolver = state.resolver.clone();
    let response = tokio::task::spawn_blocking(move || {
        resolver.lookup(&query, params.level.as_deref(), params.stat.as_deref())
    })
    .await
    .map_err(|e| ApiError::Internal(format!("lookup task failed: {}", e)))??;

    let status = if response.is_match() {
        StatusCode::OK
    } else {
        StatusCode::NOT_FOUND
    };
    Ok((status, Json(response)).into_response())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            },
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, starting graceful shutdown");
        },
        _ = terminate => {
            info!("Received terminate signal, starting graceful shutdown");
        },
    }
}
