//! HTTP surface of the merge service.
//!
//! Routes:
//! - `GET /health`
//! - `POST /api/merge` (multipart field `files`, one part per PDF)
//!
//! Cross-origin access is limited to the configured origin, and the raw
//! request body is capped before multipart decoding starts. Both are layers
//! around the router; the handler never sees a request they reject.

pub mod handler;
pub mod response;

use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{Method, header},
    routing::{get, post},
};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::compress::Compressor;
use crate::config::{Config, SizeLimits};
use crate::merge::MergeEngine;
use crate::validation::SizeGuard;

pub use handler::{FILES_FIELD, MERGED_FILENAME};
pub use response::{ApiError, ErrorBody, ErrorKind};

/// Shared, read-only state for every request.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Limits applied to uploads.
    pub limits: SizeLimits,
    /// Size validation for uploads.
    pub guard: SizeGuard,
    /// Where per-request temp files are created.
    pub temp_dir: PathBuf,
    /// PDF merge step.
    pub engine: MergeEngine,
    /// Compression step.
    pub compressor: Compressor,
}

impl AppState {
    /// Build state from configuration.
    pub fn new(config: &Config) -> Self {
        Self {
            limits: config.limits,
            guard: SizeGuard::new(config.limits),
            temp_dir: config.temp_dir.clone(),
            engine: MergeEngine::new(),
            compressor: Compressor::new(),
        }
    }

    /// Replace the compression step.
    pub fn with_compressor(mut self, compressor: Compressor) -> Self {
        self.compressor = compressor;
        self
    }
}

/// Build the application router from configuration.
pub fn router(config: &Config) -> Router {
    router_with_state(config, AppState::new(config))
}

/// Build the application router around existing state.
pub fn router_with_state(config: &Config, state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list([config.allowed_origin.clone()]))
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers(Any)
        .expose_headers([header::CONTENT_DISPOSITION]);

    Router::new()
        .route("/health", get(handler::health))
        .route("/api/merge", post(handler::merge_pdfs))
        .layer(DefaultBodyLimit::max(state.limits.body_limit_bytes()))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(Arc::new(state))
}
