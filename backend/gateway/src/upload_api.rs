//! Multipart upload endpoints.

use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    response::Response,
};
use filekit_tools::{write_json, JsonResponse};
use filekit_upload::{upload_batch, upload_single, MultipartRequest};
use tracing::info;

use crate::error::ApiError;
use crate::server::GatewayState;

/// `POST /upload`: store every file part of the form.
pub async fn upload_files(
    State(state): State<GatewayState>,
    request: Request,
) -> Result<Response, ApiError> {
    let uploaded = upload_batch(
        multipart_request(request),
        &state.upload_dir,
        state.rename,
        &state.upload,
    )
    .await?;

    info!("Stored {} uploaded file(s)", uploaded.len());
    let message = format!("{} file(s) uploaded", uploaded.len());
    Ok(write_json(StatusCode::OK, &JsonResponse::ok(message, Some(uploaded)), None)?)
}

/// `POST /upload-one`: store the form's first file part.
pub async fn upload_one_file(
    State(state): State<GatewayState>,
    request: Request,
) -> Result<Response, ApiError> {
    let uploaded = upload_single(
        multipart_request(request),
        &state.upload_dir,
        state.rename,
        &state.upload,
    )
    .await?;

    let message = format!("uploaded {}", uploaded.new_file_name);
    Ok(write_json(StatusCode::OK, &JsonResponse::ok(message, Some(uploaded)), None)?)
}

fn multipart_request(request: Request) -> MultipartRequest {
    let content_type = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    MultipartRequest::new(content_type, request.into_body().into_data_stream())
}

#[cfg(test)]
mod tests {
    use crate::server::build_router;
    use crate::server::test_support::*;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use filekit_config::UploadConfig;
    use filekit_upload::MultipartFormBuilder;
    use tower::ServiceExt;

    const PNG_HEADER: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR";

    fn post(uri: &str, form: MultipartFormBuilder) -> Request<Body> {
        let (content_type, body) = form.finish();
        Request::post(uri)
            .header(header::CONTENT_TYPE, content_type)
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn upload_returns_records() {
        let dir = tempfile::tempdir().unwrap();
        let app = build_router(state_for(dir.path(), dir.path(), UploadConfig::default()));
        let form = MultipartFormBuilder::new()
            .file("files", "one.png", "image/png", PNG_HEADER)
            .file("files", "two.txt", "text/plain", "two");

        let response = app.oneshot(post("/upload", form)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["error"], false);
        assert_eq!(body["data"].as_array().unwrap().len(), 2);
        assert_eq!(body["data"][0]["originalFileName"], "one.png");
        assert_eq!(body["data"][1]["sizeBytes"], 3);
    }

    #[tokio::test]
    async fn disallowed_type_is_415() {
        let dir = tempfile::tempdir().unwrap();
        let config = UploadConfig::default().with_allowed_types(["image/jpeg"]);
        let app = build_router(state_for(dir.path(), dir.path(), config));
        let form = MultipartFormBuilder::new().file("f", "x.png", "image/png", PNG_HEADER);

        let response = app.oneshot(post("/upload-one", form)).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
        let body = json_body(response).await;
        assert_eq!(body["error"], true);
        assert_eq!(body["message"], "file type [image/png] is not allowed");
    }

    #[tokio::test]
    async fn oversized_form_is_413() {
        let dir = tempfile::tempdir().unwrap();
        let config = UploadConfig::default().with_max_batch_size(64);
        let app = build_router(state_for(dir.path(), dir.path(), config));
        let form = MultipartFormBuilder::new().file("f", "big.bin", "application/octet-stream", vec![7u8; 4096]);

        let response = app.oneshot(post("/upload", form)).await.unwrap();

        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn upload_one_without_files_is_400() {
        let dir = tempfile::tempdir().unwrap();
        let app = build_router(state_for(dir.path(), dir.path(), UploadConfig::default()));
        let form = MultipartFormBuilder::new().text("note", "nothing attached");

        let response = app.oneshot(post("/upload-one", form)).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["message"], "no files were submitted");
    }

    #[tokio::test]
    async fn non_multipart_request_is_400() {
        let dir = tempfile::tempdir().unwrap();
        let app = build_router(state_for(dir.path(), dir.path(), UploadConfig::default()));

        let request = Request::post("/upload")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{}"))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
