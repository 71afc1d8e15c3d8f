//! Environment handling for config values.
//!
//! Two mechanisms:
//! - `${VAR_NAME}` references inside string values, resolved at load time.
//!   Only uppercase `[A-Z_][A-Z0-9_]*` names are matched.
//! - `FILEKIT_*` variables that override individual fields after loading.

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use std::collections::HashMap;
use std::path::PathBuf;

use crate::schema::{FileKitConfig, GatewayConfig, LoggingConfig, UploadConfig};

static ENV_VAR_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").expect("valid env var pattern"));

/// Error returned for missing env vars.
#[derive(Debug, thiserror::Error)]
#[error("Missing env var \"{var_name}\" referenced at config path: {config_path}")]
pub struct MissingEnvVarError {
    pub var_name: String,
    pub config_path: String,
}

/// Substitute `${VAR}` references in a config JSON value tree.
///
/// Only string leaves are processed. A referenced variable that is unset or
/// empty is an error.
pub fn resolve_env_vars(value: &Value) -> Result<Value> {
    resolve_env_vars_with(value, &std::env::vars().collect())
}

/// Substitute env vars using a provided map (useful for testing).
pub fn resolve_env_vars_with(value: &Value, env: &HashMap<String, String>) -> Result<Value> {
    substitute_value(value, env, "")
}

fn substitute_value(value: &Value, env: &HashMap<String, String>, path: &str) -> Result<Value> {
    match value {
        Value::String(s) => Ok(Value::String(substitute_string(s, env, path)?)),
        Value::Array(arr) => arr
            .iter()
            .enumerate()
            .map(|(i, v)| substitute_value(v, env, &format!("{path}[{i}]")))
            .collect::<Result<Vec<_>>>()
            .map(Value::Array),
        Value::Object(map) => {
            let mut result = serde_json::Map::new();
            for (k, v) in map {
                let child_path = if path.is_empty() {
                    k.clone()
                } else {
                    format!("{path}.{k}")
                };
                result.insert(k.clone(), substitute_value(v, env, &child_path)?);
            }
            Ok(Value::Object(result))
        }
        other => Ok(other.clone()),
    }
}

fn substitute_string(s: &str, env: &HashMap<String, String>, path: &str) -> Result<String> {
    let mut out = String::with_capacity(s.len());
    let mut last = 0;
    for caps in ENV_VAR_PATTERN.captures_iter(s) {
        let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let name = name.as_str();
        let value = env
            .get(name)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| MissingEnvVarError {
                var_name: name.to_string(),
                config_path: path.to_string(),
            })?;
        out.push_str(&s[last..whole.start()]);
        out.push_str(value);
        last = whole.end();
    }
    out.push_str(&s[last..]);
    Ok(out)
}

/// Apply `FILEKIT_*` overrides from the process environment.
pub fn apply_env_overrides(config: FileKitConfig) -> Result<FileKitConfig> {
    apply_env_overrides_with(config, |name| std::env::var(name).ok())
}

/// Apply `FILEKIT_*` overrides using a provided lookup (useful for testing).
///
/// | Variable | Field |
/// |---|---|
/// | `FILEKIT_UPLOAD_DIR` | `upload.destinationDir` |
/// | `FILEKIT_MAX_UPLOAD_BYTES` | `upload.maxBatchSizeBytes` |
/// | `FILEKIT_ALLOWED_TYPES` | `upload.allowedContentTypes` (comma-separated) |
/// | `FILEKIT_BIND` | `gateway.bind` |
/// | `FILEKIT_PORT` | `gateway.port` |
/// | `FILEKIT_LOG_LEVEL` | `logging.level` |
pub fn apply_env_overrides_with<F>(mut config: FileKitConfig, lookup: F) -> Result<FileKitConfig>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(dir) = lookup("FILEKIT_UPLOAD_DIR") {
        upload_section(&mut config).destination_dir = Some(PathBuf::from(dir));
    }
    if let Some(raw) = lookup("FILEKIT_MAX_UPLOAD_BYTES") {
        let limit = raw
            .trim()
            .parse::<u64>()
            .with_context(|| format!("FILEKIT_MAX_UPLOAD_BYTES is not a byte count: {raw}"))?;
        upload_section(&mut config).max_batch_size_bytes = Some(limit);
    }
    if let Some(raw) = lookup("FILEKIT_ALLOWED_TYPES") {
        upload_section(&mut config).allowed_content_types = raw
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect();
    }
    if let Some(bind) = lookup("FILEKIT_BIND") {
        config.gateway.get_or_insert_with(GatewayConfig::default).bind = Some(bind);
    }
    if let Some(raw) = lookup("FILEKIT_PORT") {
        let port = raw
            .trim()
            .parse::<u16>()
            .with_context(|| format!("FILEKIT_PORT is not a port number: {raw}"))?;
        config.gateway.get_or_insert_with(GatewayConfig::default).port = Some(port);
    }
    if let Some(level) = lookup("FILEKIT_LOG_LEVEL") {
        config.logging.get_or_insert_with(LoggingConfig::default).level = Some(level);
    }
    Ok(config)
}

fn upload_section(config: &mut FileKitConfig) -> &mut UploadConfig {
    config.upload.get_or_insert_with(UploadConfig::default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn substitutes_nested_var() {
        let value = json!({ "upload": { "destinationDir": "${DATA_ROOT}/uploads" } });
        let out = resolve_env_vars_with(&value, &env(&[("DATA_ROOT", "/srv")])).unwrap();
        assert_eq!(out["upload"]["destinationDir"], "/srv/uploads");
    }

    #[test]
    fn error_on_missing_var() {
        let value = json!({ "gateway": { "bind": "${NOPE}" } });
        let err = resolve_env_vars_with(&value, &env(&[])).unwrap_err();
        assert!(err.to_string().contains("NOPE"));
        assert!(err.to_string().contains("gateway.bind"));
    }

    #[test]
    fn passthrough_non_var_strings() {
        let value = json!(["$lowercase", "plain", 3]);
        let out = resolve_env_vars_with(&value, &env(&[])).unwrap();
        assert_eq!(out, value);
    }

    #[test]
    fn overrides_apply_to_missing_sections() {
        let vars = env(&[
            ("FILEKIT_PORT", "9090"),
            ("FILEKIT_ALLOWED_TYPES", "image/png, image/jpeg ,"),
            ("FILEKIT_MAX_UPLOAD_BYTES", "2048"),
        ]);
        let cfg = apply_env_overrides_with(FileKitConfig::default(), |k| vars.get(k).cloned()).unwrap();

        assert_eq!(cfg.gateway.unwrap().port, Some(9090));
        let upload = cfg.upload.unwrap();
        assert_eq!(upload.max_batch_size_bytes, Some(2048));
        assert_eq!(upload.allowed_content_types.len(), 2);
        assert!(upload.allowed_content_types.contains("image/jpeg"));
    }

    #[test]
    fn bad_port_override_is_an_error() {
        let err = apply_env_overrides_with(FileKitConfig::default(), |k| {
            (k == "FILEKIT_PORT").then(|| "eighty".to_string())
        })
        .unwrap_err();
        assert!(err.to_string().contains("FILEKIT_PORT"));
    }
}
