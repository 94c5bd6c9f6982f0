//! MA3 Scribble HTTP Server
//!
//! Converts traced SVG documents into MA3 scribble XML.
//!
//! ## Endpoints
//!
//! ```text
//! POST /api/v1/svg-to-ma3-scribble?ma3_scribble_name=Logo
//!      &ma3_scribble_stroke_thickness=0.5&ma3_scribble_stroke_color=FFFFFFFF
//!      body: <svg ...>...</svg>
//! POST /api/v1/svg-to-ma3-scribble/preview?ma3_scribble_stroke_color=FF0000FF
//!      body: <svg ...>...</svg>
//! GET  /health
//! ```
//!
//! Every request runs under a deadline and is answered with 408 when it
//! expires.
//!
//! Errors are returned as `{ "kind": "...", "message": "..." }` with status
//! 400 for bad input and 500 for internal failures.

use axum::{
    Json, Router,
    body::Bytes,
    extract::{DefaultBodyLimit, Query},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use ma3_scribble_core::{ScribbleConfig, ScribbleError, ScribbleResult, StrokeColor};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::time::Duration;
use thiserror::Error;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};
use tracing::{error, info, info_span, warn};
use uuid::Uuid;

const ENV_LISTEN_ADDR: &str = "HTTP_API_LISTEN_ADDR";
const ENV_LOG_LEVEL: &str = "LOG_LEVEL";
const ENV_MAX_BODY_BYTES: &str = "MAX_BODY_BYTES";
const ENV_REQUEST_TIMEOUT_SECS: &str = "REQUEST_TIMEOUT_SECS";

const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:3030";
const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_MAX_BODY_BYTES: usize = 10 * 1024 * 1024;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

const PREVIEW_CONTENT_TYPE: &str = "image/xml+svg";

/// Startup errors.
#[derive(Debug, Error)]
enum ServerError {
    #[error("Invalid environment variable {var}={value:?}: {reason}")]
    InvalidEnv {
        var: &'static str,
        value: String,
        reason: String,
    },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Server configuration read from the environment.
#[derive(Debug, Clone, PartialEq)]
struct ServerConfig {
    listen_addr: SocketAddr,
    log_level: String,
    max_body_bytes: usize,
    request_timeout: Duration,
}

impl ServerConfig {
    fn from_env() -> Result<Self, ServerError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ServerError> {
        let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());

        let listen_addr = get(ENV_LISTEN_ADDR).unwrap_or_else(|| DEFAULT_LISTEN_ADDR.to_string());
        let listen_addr: SocketAddr = listen_addr
            .trim()
            .parse()
            .map_err(|e: std::net::AddrParseError| ServerError::InvalidEnv {
                var: ENV_LISTEN_ADDR,
                value: listen_addr.clone(),
                reason: e.to_string(),
            })?;

        let log_level = get(ENV_LOG_LEVEL).unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string());
        if !matches!(
            log_level.to_ascii_lowercase().as_str(),
            "trace" | "debug" | "info" | "warn" | "error" | "off"
        ) {
            return Err(ServerError::InvalidEnv {
                var: ENV_LOG_LEVEL,
                value: log_level,
                reason: "expected one of trace, debug, info, warn, error, off".to_string(),
            });
        }

        let max_body_bytes: usize = match get(ENV_MAX_BODY_BYTES) {
            Some(raw) => raw.trim().parse().map_err(|e: std::num::ParseIntError| {
                ServerError::InvalidEnv {
                    var: ENV_MAX_BODY_BYTES,
                    value: raw.clone(),
                    reason: e.to_string(),
                }
            })?,
            None => DEFAULT_MAX_BODY_BYTES,
        };

        let timeout_secs: u64 = match get(ENV_REQUEST_TIMEOUT_SECS) {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => secs,
                Ok(_) => {
                    return Err(ServerError::InvalidEnv {
                        var: ENV_REQUEST_TIMEOUT_SECS,
                        value: raw.clone(),
                        reason: "must be positive".to_string(),
                    });
                }
                Err(e) => {
                    return Err(ServerError::InvalidEnv {
                        var: ENV_REQUEST_TIMEOUT_SECS,
                        value: raw.clone(),
                        reason: e.to_string(),
                    });
                }
            },
            None => DEFAULT_REQUEST_TIMEOUT_SECS,
        };

        Ok(Self {
            listen_addr,
            log_level: log_level.to_ascii_lowercase(),
            max_body_bytes,
            request_timeout: Duration::from_secs(timeout_secs),
        })
    }

    /// Filter used when `RUST_LOG` is not set.
    fn default_filter(&self) -> String {
        format!(
            "ma3_scribble_server={0},ma3_scribble_core={0},tower_http={0}",
            self.log_level
        )
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], 3030)),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }
}

/// Query parameters of the conversion endpoint. Empty values count as unset.
#[derive(Debug, Default, Deserialize)]
struct ScribbleQuery {
    ma3_scribble_name: Option<String>,
    ma3_scribble_stroke_thickness: Option<String>,
    ma3_scribble_stroke_color: Option<String>,
}

impl ScribbleQuery {
    fn into_config(self) -> ScribbleResult<ScribbleConfig> {
        let mut config = ScribbleConfig::default();

        if let Some(name) = self.ma3_scribble_name.filter(|v| !v.is_empty()) {
            config = config.with_name(name)?;
        }

        if let Some(raw) = self.ma3_scribble_stroke_thickness.filter(|v| !v.is_empty()) {
            let thickness = raw
                .trim()
                .parse::<f64>()
                .map_err(|e| ScribbleError::InvalidOption {
                    field: "stroke_thickness",
                    value: raw.clone(),
                    reason: e.to_string(),
                })?;
            config = config.with_stroke_thickness(thickness)?;
        }

        if let Some(raw) = self.ma3_scribble_stroke_color.filter(|v| !v.is_empty()) {
            config = config.with_stroke_color(StrokeColor::parse_hex(&raw)?);
        }

        Ok(config)
    }
}

/// Error response body.
#[derive(Debug, Serialize, Deserialize)]
struct ErrorBody {
    kind: String,
    message: String,
}

/// Conversion error mapped onto an HTTP response.
#[derive(Debug)]
struct ApiError(ScribbleError);

impl From<ScribbleError> for ApiError {
    fn from(err: ScribbleError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = if self.0.is_client_fault() {
            warn!("Rejected conversion: {}", self.0);
            StatusCode::BAD_REQUEST
        } else {
            error!("Conversion failed: {}", self.0);
            StatusCode::INTERNAL_SERVER_ERROR
        };
        let body = ErrorBody {
            kind: self.0.kind().to_string(),
            message: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

#[tokio::main]
async fn main() -> Result<(), ServerError> {
    let config = ServerConfig::from_env()?;

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.default_filter().into()),
        )
        .init();

    let app = router(&config);

    info!("MA3 scribble server listening on {}", config.listen_addr);
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("Shutdown complete");

    Ok(())
}

fn router(config: &ServerConfig) -> Router {
    let routes = Router::new()
        .route("/health", get(health))
        .route("/api/v1/svg-to-ma3-scribble", post(convert))
        .route("/api/v1/svg-to-ma3-scribble/preview", post(preview));
    with_layers(routes, config)
}

/// Body limit, request deadline, tracing and CORS around `routes`.
fn with_layers(routes: Router, config: &ServerConfig) -> Router {
    routes
        .layer(DefaultBodyLimit::max(config.max_body_bytes))
        .layer(TimeoutLayer::new(config.request_timeout))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Health check
async fn health() -> &'static str {
    "ok"
}

/// Convert the SVG request body into scribble XML.
async fn convert(Query(query): Query<ScribbleQuery>, body: Bytes) -> Result<Response, ApiError> {
    let request_id = Uuid::new_v4();
    let span = info_span!("convert", %request_id, svg_bytes = body.len());

    span.in_scope(|| -> Result<Response, ApiError> {
        let config = query.into_config()?;
        info!("Converting svg to scribble {:?}", config.name);
        let xml = ma3_scribble_core::encode_svg_bytes_to_scribble(&config, &body)?;
        info!("Conversion done, {} bytes of xml", xml.len());

        Ok(([(header::CONTENT_TYPE, "application/xml")], xml).into_response())
    })
}

/// Rewrite the traced fills of the SVG request body into colored strokes.
async fn preview(Query(query): Query<ScribbleQuery>, body: Bytes) -> Result<Response, ApiError> {
    let request_id = Uuid::new_v4();
    let span = info_span!("preview", %request_id, svg_bytes = body.len());

    span.in_scope(|| -> Result<Response, ApiError> {
        let config = query.into_config()?;
        let svg = ma3_scribble_core::preview_svg_bytes(&config, &body)?;
        info!("Preview done, {} bytes of svg", svg.len());

        Ok(([(header::CONTENT_TYPE, PREVIEW_CONTENT_TYPE)], svg).into_response())
    })
}

/// Resolves on Ctrl-C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
    info!("Shutdown signal received");
}
