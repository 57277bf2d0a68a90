//! realeader Server - HTTP REST API for therapist matching
//!
//! This crate exposes the realeader matching pipeline over HTTP:
//!
//! - **Directory**: therapists and communities from the in-memory store
//! - **Matching**: free-text, raw-vector, similar-therapist and intake-form matching
//! - **Analytics**: dashboard figures
//! - **Health & Metrics**: liveness/readiness probes and Prometheus metrics
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use server::ServerConfig;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ServerConfig::load()?;
//!     server::start_server(config).await?;
//!     Ok(())
//! }
//! ```
//!
//! # API Endpoints
//!
//! - `GET /` - API information
//! - `GET /health` - Liveness probe
//! - `GET /ready` - Readiness probe
//! - `GET /metrics` - Prometheus metrics
//! - `GET /api/therapists` - All therapists
//! - `GET /api/therapists/{id}` - One therapist
//! - `POST /api/match/search` - `{query, limit?, metric?}`
//! - `POST /api/match/vector` - `{vector, limit?, metric?}`
//! - `POST /api/match/similar/{id}` - `{limit?}`
//! - `POST /api/match/form` - `{feeling, prevTherapy, goals, preferences?}`
//! - `GET /api/communities` - All communities
//! - `GET /api/analytics` - Dashboard figures
//!
//! Errors are returned as `{"error": {"code": "...", "message": "..."}}`.

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod state;
pub mod telemetry;

pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use server::{build_router, start_server};
pub use state::ServerState;
