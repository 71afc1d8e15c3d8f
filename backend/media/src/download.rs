//! Static-file download responder.
//!
//! Serves a file from a local directory as an attachment, so browsers save it
//! under a display name instead of rendering it inline.

use axum::{
    body::Body,
    extract::{Path, Query, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde::Deserialize;
use std::{path::PathBuf, sync::Arc};
use tokio::fs;
use tokio_util::io::ReaderStream;
use tracing::{debug, warn};

use crate::mime_detect::content_type_for_path;

/// State shared by download routes.
#[derive(Clone)]
pub struct DownloadState {
    pub download_dir: Arc<PathBuf>,
}

#[derive(Debug, Deserialize)]
pub struct DownloadQuery {
    /// Name the browser should save the file as; defaults to the stored name.
    pub name: Option<String>,
}

/// Build the download router.
///
/// Mount anywhere:
///   GET /download/:file?name=<display name>
pub fn media_router(download_dir: PathBuf) -> Router {
    let state = DownloadState {
        download_dir: Arc::new(download_dir),
    };
    Router::new()
        .route("/download/:file", get(serve_download))
        .with_state(state)
}

async fn serve_download(
    Path(file): Path<String>,
    Query(query): Query<DownloadQuery>,
    State(state): State<DownloadState>,
) -> Response {
    let display_name = query.name.unwrap_or_else(|| file.clone());
    download_static_file(&state.download_dir, &file, &display_name).await
}

/// Serve `dir/file` with `Content-Disposition: attachment; filename="<display_name>"`.
pub async fn download_static_file(dir: &std::path::Path, file: &str, display_name: &str) -> Response {
    if file.is_empty() || file.contains("..") || file.contains('/') || file.contains('\\') {
        warn!(file = %file, "Rejected suspicious download path");
        return (StatusCode::BAD_REQUEST, "Invalid filename").into_response();
    }

    let path = dir.join(file);
    debug!(path = %path.display(), "Serving download");

    let file = match fs::File::open(&path).await {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return (StatusCode::NOT_FOUND, "File not found").into_response();
        }
        Err(e) => return read_failure(&path, e),
    };
    let len = match file.metadata().await {
        Ok(meta) if meta.is_file() => meta.len(),
        Ok(_) => return (StatusCode::NOT_FOUND, "File not found").into_response(),
        Err(e) => return read_failure(&path, e),
    };

    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static(content_type_for_path(&path)),
    );
    headers.insert(header::CONTENT_DISPOSITION, attachment_header(display_name));
    headers.insert(header::CONTENT_LENGTH, HeaderValue::from(len));

    let body = Body::from_stream(ReaderStream::new(file));
    (StatusCode::OK, headers, body).into_response()
}

fn read_failure(path: &std::path::Path, e: std::io::Error) -> Response {
    warn!(path = %path.display(), error = %e, "Failed to read download");
    (StatusCode::INTERNAL_SERVER_ERROR, "Failed to read file").into_response()
}

/// `attachment; filename="..."` with characters a quoted header value cannot hold replaced.
fn attachment_header(display_name: &str) -> HeaderValue {
    let safe: String = display_name
        .chars()
        .map(|c| match c {
            '"' | '\\' => '_',
            c if c.is_ascii_graphic() || c == ' ' => c,
            _ => '_',
        })
        .collect();

    HeaderValue::from_str(&format!("attachment; filename=\"{safe}\""))
        .unwrap_or_else(|_| HeaderValue::from_static("attachment"))
}
