//! JSON demo endpoints: echo, forward to a remote service, and a stand-in
//! remote service.

use axum::{
    extract::{Request, State},
    http::StatusCode,
    response::Response,
};
use filekit_tools::{push_json_to_remote, read_json, write_json};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ApiError;
use crate::server::GatewayState;

#[derive(Debug, Serialize, Deserialize)]
pub struct RequestPayload {
    pub action: String,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ResponsePayload {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
}

async fn read_payload(state: &GatewayState, request: Request) -> Result<RequestPayload, ApiError> {
    Ok(read_json(request.into_body(), state.json_max_bytes, state.allow_unknown_fields).await?)
}

/// `POST /receive-post`
pub async fn receive_post(
    State(state): State<GatewayState>,
    request: Request,
) -> Result<Response, ApiError> {
    let payload = read_payload(&state, request).await?;
    debug!(action = %payload.action, "Received JSON post");

    let response = ResponsePayload {
        message: "hit handler".into(),
        status_code: None,
    };
    Ok(write_json(StatusCode::OK, &response, None)?)
}

/// `POST /remote-service`: forward the payload and relay the remote status.
pub async fn remote_service(
    State(state): State<GatewayState>,
    request: Request,
) -> Result<Response, ApiError> {
    let payload = read_payload(&state, request).await?;
    let (status, _) = push_json_to_remote(&state.remote_url, &payload, Some(&state.http)).await?;

    let response = ResponsePayload {
        message: "hit handler, sending response".into(),
        status_code: Some(status.as_u16()),
    };
    Ok(write_json(status, &response, None)?)
}

/// `POST /simulated-service`
pub async fn simulated_service() -> Result<Response, ApiError> {
    let response = ResponsePayload {
        message: "ok".into(),
        status_code: None,
    };
    Ok(write_json(StatusCode::OK, &response, None)?)
}
