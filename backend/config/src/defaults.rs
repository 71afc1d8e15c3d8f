//! Config defaults: applies sensible default values to parsed config.
//!
//! All functions here are pure: they consume or borrow a config and return a
//! new value, never writing back into a caller's copy.

use std::path::PathBuf;

use crate::schema::{
    EffectiveUploadConfig, FileKitConfig, GatewayConfig, JsonConfig, LoggingConfig, UploadConfig,
};

/// Default bound on one multipart payload (1 GiB).
pub const DEFAULT_MAX_BATCH_SIZE_BYTES: u64 = 1 << 30;

/// Default bound on one JSON request body (1 MiB).
pub const DEFAULT_JSON_MAX_BYTES: usize = 1 << 20;

pub const DEFAULT_UPLOAD_DIR: &str = "./uploads";
pub const DEFAULT_DOWNLOAD_DIR: &str = "./files";
pub const DEFAULT_BIND: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Resolve the settings the upload pipeline actually runs with.
///
/// An unset or zero size limit becomes [`DEFAULT_MAX_BATCH_SIZE_BYTES`].
pub fn resolve_upload_config(config: &UploadConfig) -> EffectiveUploadConfig {
    EffectiveUploadConfig {
        max_batch_size_bytes: config
            .max_batch_size_bytes
            .filter(|&limit| limit > 0)
            .unwrap_or(DEFAULT_MAX_BATCH_SIZE_BYTES),
        allowed_content_types: config.allowed_content_types.clone(),
    }
}

/// Apply all defaults to a freshly loaded config.
pub fn apply_all_defaults(config: FileKitConfig) -> FileKitConfig {
    let config = apply_upload_defaults(config);
    let config = apply_json_defaults(config);
    let config = apply_gateway_defaults(config);
    apply_logging_defaults(config)
}

/// Destination and rename policy. The size limit stays as written; it is
/// resolved per call by [`resolve_upload_config`].
fn apply_upload_defaults(mut config: FileKitConfig) -> FileKitConfig {
    let upload = config.upload.get_or_insert_with(UploadConfig::default);
    if upload.destination_dir.is_none() {
        upload.destination_dir = Some(PathBuf::from(DEFAULT_UPLOAD_DIR));
    }
    if upload.rename.is_none() {
        upload.rename = Some(true);
    }
    config
}

fn apply_json_defaults(mut config: FileKitConfig) -> FileKitConfig {
    let json = config.json.get_or_insert_with(JsonConfig::default);
    if json.max_bytes.is_none() {
        json.max_bytes = Some(DEFAULT_JSON_MAX_BYTES);
    }
    if json.allow_unknown_fields.is_none() {
        json.allow_unknown_fields = Some(false);
    }
    config
}

fn apply_gateway_defaults(mut config: FileKitConfig) -> FileKitConfig {
    let gateway = config.gateway.get_or_insert_with(GatewayConfig::default);
    if gateway.bind.is_none() {
        gateway.bind = Some(DEFAULT_BIND.to_string());
    }
    if gateway.port.is_none() {
        gateway.port = Some(DEFAULT_PORT);
    }
    if gateway.download_dir.is_none() {
        gateway.download_dir = Some(PathBuf::from(DEFAULT_DOWNLOAD_DIR));
    }
    config
}

fn apply_logging_defaults(mut config: FileKitConfig) -> FileKitConfig {
    let logging = config.logging.get_or_insert_with(LoggingConfig::default);
    if logging.level.is_none() {
        logging.level = Some(DEFAULT_LOG_LEVEL.to_string());
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_limit_resolves_to_one_gib() {
        let effective = resolve_upload_config(&UploadConfig::default());
        assert_eq!(effective.max_batch_size_bytes, 1024 * 1024 * 1024);
        assert!(effective.allowed_content_types.is_empty());
    }

    #[test]
    fn zero_limit_resolves_without_touching_input() {
        let input = UploadConfig::default().with_max_batch_size(0);
        let effective = resolve_upload_config(&input);
        assert_eq!(effective.max_batch_size_bytes, DEFAULT_MAX_BATCH_SIZE_BYTES);
        assert_eq!(input.max_batch_size_bytes, Some(0));
    }

    #[test]
    fn explicit_limit_and_types_carry_over() {
        let input = UploadConfig::default()
            .with_max_batch_size(4096)
            .with_allowed_types(["image/png"]);
        let effective = resolve_upload_config(&input);
        assert_eq!(effective.max_batch_size_bytes, 4096);
        assert!(effective.allowed_content_types.contains("image/png"));
    }

    #[test]
    fn applies_section_defaults() {
        let cfg = apply_all_defaults(FileKitConfig::default());
        let upload = cfg.upload.unwrap();
        assert_eq!(upload.rename, Some(true));
        assert_eq!(upload.destination_dir.unwrap(), PathBuf::from(DEFAULT_UPLOAD_DIR));
        assert_eq!(cfg.json.unwrap().max_bytes, Some(DEFAULT_JSON_MAX_BYTES));
        assert_eq!(cfg.gateway.unwrap().port, Some(DEFAULT_PORT));
        assert_eq!(cfg.logging.unwrap().level.as_deref(), Some("info"));
    }

    #[test]
    fn does_not_override_user_set_values() {
        let cfg = FileKitConfig {
            upload: Some(UploadConfig {
                rename: Some(false),
                ..Default::default()
            }),
            gateway: Some(GatewayConfig {
                port: Some(9000),
                ..Default::default()
            }),
            ..Default::default()
        };
        let cfg = apply_all_defaults(cfg);
        assert_eq!(cfg.upload.unwrap().rename, Some(false));
        assert_eq!(cfg.gateway.unwrap().port, Some(9000));
    }
}
