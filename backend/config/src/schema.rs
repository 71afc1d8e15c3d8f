//! FileKit configuration schema.
//!
//! Every section and field is optional so a partial YAML file (or none at
//! all) deserializes cleanly; [`crate::defaults`] fills the gaps.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::PathBuf;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Root configuration for FileKit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileKitConfig {
    /// Multipart upload pipeline
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upload: Option<UploadConfig>,

    /// JSON request/response codec
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub json: Option<JsonConfig>,

    /// Demo HTTP gateway
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gateway: Option<GatewayConfig>,

    /// Logging configuration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logging: Option<LoggingConfig>,
}

// ---------------------------------------------------------------------------
// Upload
// ---------------------------------------------------------------------------

/// Upload limits and policy as the caller supplied them.
///
/// The upload core never mutates this value. It is turned into an
/// [`EffectiveUploadConfig`] by [`crate::resolve_upload_config`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadConfig {
    /// Bound on the whole multipart payload of one call. `None` or `0` means 1 GiB.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_batch_size_bytes: Option<u64>,

    /// Exact sniffed content types accepted. Empty allows anything.
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub allowed_content_types: BTreeSet<String>,

    /// Directory uploads are written to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination_dir: Option<PathBuf>,

    /// Replace client file names with generated ones
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rename: Option<bool>,
}

impl UploadConfig {
    pub fn with_max_batch_size(mut self, bytes: u64) -> Self {
        self.max_batch_size_bytes = Some(bytes);
        self
    }

    pub fn with_allowed_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_content_types = types.into_iter().map(Into::into).collect();
        self
    }
}

/// Fully-resolved upload settings consumed by the upload pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffectiveUploadConfig {
    pub max_batch_size_bytes: u64,
    pub allowed_content_types: BTreeSet<String>,
}

// ---------------------------------------------------------------------------
// JSON codec
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonConfig {
    /// Maximum request body read by the JSON decoder
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_bytes: Option<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_unknown_fields: Option<bool>,
}

// ---------------------------------------------------------------------------
// Gateway
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bind: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,

    /// Directory served by the download route
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_dir: Option<PathBuf>,

    /// Target of the remote-service demo route
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_url: Option<String>,
}

// ---------------------------------------------------------------------------
// Logging
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,

    /// Directory for the rolling NDJSON log; console only when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
}
