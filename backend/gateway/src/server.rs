//! Main HTTP Gateway Server.

use anyhow::Result;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use filekit_config::{
    defaults::{DEFAULT_DOWNLOAD_DIR, DEFAULT_PORT, DEFAULT_UPLOAD_DIR},
    FileKitConfig, UploadConfig, DEFAULT_JSON_MAX_BYTES,
};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tokio::net::TcpListener;
use tracing::{info, instrument};

use crate::{health_api, json_api, upload_api};

/// Application state shared across routes.
#[derive(Clone)]
pub struct GatewayState {
    pub upload: Arc<UploadConfig>,
    pub upload_dir: Arc<PathBuf>,
    pub rename: bool,
    pub download_dir: Arc<PathBuf>,
    pub json_max_bytes: usize,
    pub allow_unknown_fields: bool,
    /// Where `/remote-service` forwards its payload.
    pub remote_url: Arc<str>,
    pub http: reqwest::Client,
    pub started_at: Instant,
}

impl GatewayState {
    /// Build state from a config; sections left unset fall back to defaults.
    pub fn from_config(config: &FileKitConfig) -> Self {
        let upload = config.upload.clone().unwrap_or_default();
        let json = config.json.clone().unwrap_or_default();
        let gateway = config.gateway.clone().unwrap_or_default();

        let upload_dir = upload
            .destination_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_UPLOAD_DIR));
        let port = gateway.port.unwrap_or(DEFAULT_PORT);
        let remote_url = gateway
            .remote_url
            .unwrap_or_else(|| format!("http://127.0.0.1:{port}/simulated-service"));

        Self {
            rename: upload.rename.unwrap_or(true),
            upload_dir: Arc::new(upload_dir),
            upload: Arc::new(upload),
            download_dir: Arc::new(
                gateway
                    .download_dir
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_DOWNLOAD_DIR)),
            ),
            json_max_bytes: json.max_bytes.unwrap_or(DEFAULT_JSON_MAX_BYTES),
            allow_unknown_fields: json.allow_unknown_fields.unwrap_or(false),
            remote_url: remote_url.into(),
            http: reqwest::Client::new(),
            started_at: Instant::now(),
        }
    }
}

/// Assemble every gateway route.
pub fn build_router(state: GatewayState) -> Router {
    let download_dir = state.download_dir.as_ref().clone();

    Router::new()
        // Upload endpoints; the multipart reader enforces its own limit.
        .route("/upload", post(upload_api::upload_files))
        .route("/upload-one", post(upload_api::upload_one_file))
        .layer(DefaultBodyLimit::disable())
        // JSON endpoints
        .route("/receive-post", post(json_api::receive_post))
        .route("/remote-service", post(json_api::remote_service))
        .route("/simulated-service", post(json_api::simulated_service))
        .route("/api/health", get(health_api::get_health))
        .with_state(state)
        .merge(filekit_media::media_router(download_dir))
}

/// Starts the main Axum HTTP server for the gateway.
#[instrument(skip(state))]
pub async fn start_server(addr: SocketAddr, state: GatewayState) -> Result<()> {
    let app = build_router(state);

    info!("Gateway HTTP server listening on {}", addr);
    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutdown signal received");
        })
        .await?;

    Ok(())
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use axum::body::Body;
    use axum::http::Response;
    use filekit_config::{GatewayConfig, JsonConfig};
    use serde_json::Value;
    use std::path::Path;

    pub fn state_for(upload_dir: &Path, download_dir: &Path, upload: UploadConfig) -> GatewayState {
        let config = FileKitConfig {
            upload: Some(UploadConfig {
                destination_dir: Some(upload_dir.to_path_buf()),
                ..upload
            }),
            json: Some(JsonConfig {
                max_bytes: Some(1024),
                allow_unknown_fields: Some(false),
            }),
            gateway: Some(GatewayConfig {
                download_dir: Some(download_dir.to_path_buf()),
                ..Default::default()
            }),
            ..Default::default()
        };
        GatewayState::from_config(&config)
    }

    pub async fn json_body(response: Response<Body>) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use tower::ServiceExt;

    #[test]
    fn state_defaults_when_sections_missing() {
        let state = GatewayState::from_config(&FileKitConfig::default());
        assert!(state.rename);
        assert_eq!(*state.upload_dir, PathBuf::from(DEFAULT_UPLOAD_DIR));
        assert_eq!(state.json_max_bytes, DEFAULT_JSON_MAX_BYTES);
        assert_eq!(&*state.remote_url, "http://127.0.0.1:8080/simulated-service");
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let dir = tempfile::tempdir().unwrap();
        let app = build_router(state_for(dir.path(), dir.path(), UploadConfig::default()));

        let response = app
            .oneshot(Request::get("/api/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["status"], "ok");
        assert!(body["timestamp"].is_string());
    }

    #[tokio::test]
    async fn download_route_is_mounted() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("report.pdf"), b"%PDF-1.4").unwrap();
        let app = build_router(state_for(dir.path(), dir.path(), UploadConfig::default()));

        let response = app
            .oneshot(
                Request::get("/download/report.pdf?name=Q3.pdf")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"Q3.pdf\""
        );
    }
}
