//! Config validation: schema checks with user-friendly error messages.

use crate::schema::FileKitConfig;
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

/// `type/subtype` with an optional `; charset=...` parameter, as produced by
/// the content sniffer.
static MIME_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-z0-9][a-z0-9!#$&^_.+-]*/[a-z0-9][a-z0-9!#$&^_.+-]*(; charset=[a-z0-9-]+)?$")
        .unwrap()
});

/// A config validation error with field path and message.
#[derive(Debug, Error)]
#[error("Config validation error at '{path}': {message}")]
pub struct ConfigValidationError {
    pub path: String,
    pub message: String,
}

/// A collection of validation errors found in one pass.
#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }

    fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }
}

/// Validate the config and return a report of all errors and warnings.
pub fn validate(config: &FileKitConfig) -> ValidationReport {
    let mut report = ValidationReport::default();
    validate_upload(config, &mut report);
    validate_json(config, &mut report);
    validate_gateway(config, &mut report);
    report
}

fn validate_upload(config: &FileKitConfig, report: &mut ValidationReport) {
    let Some(upload) = &config.upload else { return };

    if upload.max_batch_size_bytes == Some(0) {
        report.warn(
            "upload.maxBatchSizeBytes",
            "0 is treated as unset; the 1 GiB default applies",
        );
    }
    for ct in &upload.allowed_content_types {
        if !MIME_PATTERN.is_match(ct) {
            report.error(
                "upload.allowedContentTypes",
                format!("'{ct}' is not a lowercase type/subtype; it can never match a sniffed type"),
            );
        }
    }
    if let Some(dir) = &upload.destination_dir {
        if dir.as_os_str().is_empty() {
            report.error("upload.destinationDir", "Destination directory cannot be empty");
        }
    }
}

fn validate_json(config: &FileKitConfig, report: &mut ValidationReport) {
    let Some(json) = &config.json else { return };
    if json.max_bytes == Some(0) {
        report.error("json.maxBytes", "maxBytes must be > 0");
    }
}

fn validate_gateway(config: &FileKitConfig, report: &mut ValidationReport) {
    let Some(gw) = &config.gateway else { return };
    if let Some(port) = gw.port {
        if port < 1024 && port != 80 && port != 443 {
            report.warn(
                "gateway.port",
                format!("Port {port} requires elevated privileges; consider using a port >= 1024"),
            );
        }
    }
    if let Some(url) = &gw.remote_url {
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            report.error("gateway.remoteUrl", format!("'{url}' is not an http(s) URL"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{GatewayConfig, JsonConfig, UploadConfig};

    #[test]
    fn empty_config_is_valid() {
        let report = validate(&FileKitConfig::default());
        assert!(report.is_valid(), "errors: {:?}", report.errors);
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn defaulted_config_is_valid() {
        let report = validate(&crate::apply_all_defaults(FileKitConfig::default()));
        assert!(report.is_valid(), "errors: {:?}", report.errors);
    }

    #[test]
    fn rejects_wildcard_and_uppercase_types() {
        let cfg = FileKitConfig {
            upload: Some(UploadConfig::default().with_allowed_types([
                "image/*",
                "Image/PNG",
                "image/png",
                "text/plain; charset=utf-8",
            ])),
            ..Default::default()
        };
        let report = validate(&cfg);
        assert_eq!(report.errors.len(), 2);
        assert!(report.errors.iter().all(|e| e.path == "upload.allowedContentTypes"));
    }

    #[test]
    fn zero_upload_limit_is_only_a_warning() {
        let cfg = FileKitConfig {
            upload: Some(UploadConfig::default().with_max_batch_size(0)),
            ..Default::default()
        };
        let report = validate(&cfg);
        assert!(report.is_valid());
        assert_eq!(report.warnings.len(), 1);
    }

    #[test]
    fn zero_json_limit_and_bad_remote_are_errors() {
        let cfg = FileKitConfig {
            json: Some(JsonConfig {
                max_bytes: Some(0),
                ..Default::default()
            }),
            gateway: Some(GatewayConfig {
                remote_url: Some("localhost:8081".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        };
        let report = validate(&cfg);
        assert_eq!(report.errors.len(), 2);
    }
}
