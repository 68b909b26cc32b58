//! Phydon Server Library
//!
//! HTTP adapter over the lookup engine.
//!
//! - **API Endpoints**: `/growth_rate` lookups plus service discovery and health
//! - **Configuration**: Environment-based configuration management
//! - **Middleware**: CORS, request tracing and response compression
//!
//! Lookups run on tokio's blocking pool because the first request for a
//! rank reads its table from disk.
//!
//! # Example
//!
//! ```no_run
//! use phydon_server::{api, config::Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load()?;
//!     api::serve(config).await?;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod middleware;

pub use api::{create_router, serve, AppState};
pub use config::Config;
pub use error::ApiError;
