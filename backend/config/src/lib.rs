//! `filekit-config`: FileKit configuration management.
//!
//! Provides:
//! - Typed config schema (upload, JSON codec, gateway, logging)
//! - YAML read/write
//! - `${ENV_VAR}` substitution and `FILEKIT_*` overrides
//! - Pure default application and upload-limit resolution
//! - Schema validation

pub mod defaults;
pub mod env;
pub mod io;
pub mod schema;
pub mod validation;

// Re-export most-used types at crate root.
pub use defaults::{
    apply_all_defaults, resolve_upload_config, DEFAULT_JSON_MAX_BYTES,
    DEFAULT_MAX_BATCH_SIZE_BYTES,
};
pub use env::{apply_env_overrides, apply_env_overrides_with, resolve_env_vars, MissingEnvVarError};
pub use io::{config_dir, config_file_path, load_config, parse_config, write_config};
pub use schema::{
    EffectiveUploadConfig, FileKitConfig, GatewayConfig, JsonConfig, LoggingConfig, UploadConfig,
};
pub use validation::{validate, ConfigValidationError, ValidationReport};

use anyhow::Result;
use std::path::Path;

/// Load, apply env overrides and defaults, and validate a config file.
///
/// This is the main entry point for loading a config at runtime. Validation
/// findings are logged; errors make the call fail.
pub async fn load_and_prepare(path: &Path) -> Result<FileKitConfig> {
    let config = load_config(path).await?;
    let config = apply_env_overrides(config)?;
    let config = apply_all_defaults(config);

    let report = validate(&config);
    for warning in &report.warnings {
        tracing::warn!(path = %warning.path, message = %warning.message, "Config warning");
    }
    for error in &report.errors {
        tracing::error!(path = %error.path, message = %error.message, "Config error");
    }
    if let Some(first) = report.errors.into_iter().next() {
        return Err(first.into());
    }

    Ok(config)
}
