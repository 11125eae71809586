//! # School Analytics API
//!
//! HTTP service exposing student- and teacher-performance reports.
//!
//! ## Endpoints
//!
//! - `GET /api/v1/analytics/student-performance`: summary, grade bands,
//!   leaderboard, at-risk list, breakdowns and recent assessments
//!   (JSON, or Markdown with `Accept: text/markdown`)
//! - `GET /api/v1/analytics/teacher-performance`: per-teacher rollup
//! - `GET /health`
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Axum HTTP Server                         │
//! │        (CallerIdentity from X-User-Id / X-User-Role)        │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    ApiContext                               │
//! │           (SharedRecordStore, AnalyticsEngine)              │
//! └─────────────────────────────────────────────────────────────┘
//!                    │                   │
//!                    ▼                   ▼
//! ┌─────────────────────────┐   ┌──────────────────────────────┐
//! │     Record Store        │   │     school-analytics         │
//! │  (fetch per window)     │   │   (pure report assembly)     │
//! └─────────────────────────┘   └──────────────────────────────┘
//! ```

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod context;
pub mod error;
pub mod extract;
pub mod handlers;

use axum::http::{HeaderValue, Method};
use axum::routing::get;
use axum::Router;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use config::Config;
pub use context::{load_dataset, ApiContext};
pub use error::{ApiError, ApiResult};
pub use extract::CallerIdentity;

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allow_origin = if origins.iter().any(|o| o == "*") {
        AllowOrigin::from(Any)
    } else {
        AllowOrigin::list(
            origins
                .iter()
                .filter_map(|o| HeaderValue::from_str(o).ok()),
        )
    };

    CorsLayer::new()
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_origin(allow_origin)
        .allow_headers(Any)
}

/// Build the Axum router
pub fn build_router(ctx: ApiContext, cors_origins: &[String]) -> Router {
    Router::new()
        .route(
            "/api/v1/analytics/student-performance",
            get(handlers::student_performance),
        )
        .route(
            "/api/v1/analytics/teacher-performance",
            get(handlers::teacher_performance),
        )
        // Health check
        .route("/health", get(handlers::health_check))
        .route("/", get(|| async { "School Performance Analytics API" }))
        // State and middleware
        .with_state(ctx)
        .layer(cors_layer(cors_origins))
        .layer(TraceLayer::new_for_http())
}

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
