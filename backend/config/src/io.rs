//! Config file read/write.

use crate::schema::FileKitConfig;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

/// Default config file name within the config directory.
const CONFIG_FILE_NAME: &str = "filekit.yaml";

/// Resolve the FileKit config directory.
/// Priority: `FILEKIT_CONFIG_DIR` env > `~/.filekit/` > `./.filekit`
pub fn config_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("FILEKIT_CONFIG_DIR") {
        return PathBuf::from(dir);
    }
    match dirs::home_dir() {
        Some(home) => home.join(".filekit"),
        None => PathBuf::from(".filekit"),
    }
}

/// Resolve the full path to the main config file.
pub fn config_file_path(config_dir: &Path) -> PathBuf {
    config_dir.join(CONFIG_FILE_NAME)
}

/// Load and parse the config from disk.
///
/// Returns `Ok(Default::default())` if the file doesn't exist (first run).
pub async fn load_config(path: &Path) -> Result<FileKitConfig> {
    if !fs::try_exists(path).await.unwrap_or(false) {
        debug!(path = %path.display(), "Config file does not exist; using defaults");
        return Ok(FileKitConfig::default());
    }

    let raw = fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config = parse_config(&raw)
        .with_context(|| format!("Failed to parse config YAML at: {}", path.display()))?;

    info!(path = %path.display(), "Loaded config");
    Ok(config)
}

/// Parse YAML text, resolving `${VAR}` references on the way.
pub fn parse_config(raw: &str) -> Result<FileKitConfig> {
    if raw.trim().is_empty() {
        return Ok(FileKitConfig::default());
    }
    let value: serde_json::Value = serde_yaml::from_str(raw)?;
    let value = if value.is_null() {
        serde_json::Value::Object(Default::default())
    } else {
        crate::env::resolve_env_vars(&value)?
    };
    Ok(serde_json::from_value(value)?)
}

/// Write config to disk atomically (write to temp file, rename).
pub async fn write_config(config: &FileKitConfig, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).await.with_context(|| {
            format!("Failed to create config directory: {}", parent.display())
        })?;
    }

    let yaml = serde_yaml::to_string(config).context("Failed to serialize config to YAML")?;

    let tmp_path = path.with_extension("yaml.tmp");
    fs::write(&tmp_path, yaml.as_bytes())
        .await
        .with_context(|| format!("Failed to write temp config: {}", tmp_path.display()))?;

    fs::rename(&tmp_path, path).await.with_context(|| {
        format!("Failed to rename temp config to: {}", path.display())
    })?;

    info!(path = %path.display(), "Wrote config");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config(&dir.path().join("absent.yaml")).await.unwrap();
        assert_eq!(cfg, FileKitConfig::default());
    }

    #[test]
    fn parses_camel_case_yaml() {
        let cfg = parse_config(
            "upload:\n  maxBatchSizeBytes: 1048576\n  allowedContentTypes: [image/png, image/gif]\n  rename: false\n",
        )
        .unwrap();
        let upload = cfg.upload.unwrap();
        assert_eq!(upload.max_batch_size_bytes, Some(1_048_576));
        assert_eq!(upload.rename, Some(false));
        assert!(upload.allowed_content_types.contains("image/gif"));
    }

    #[test]
    fn empty_document_is_default() {
        assert_eq!(parse_config("").unwrap(), FileKitConfig::default());
    }

    #[tokio::test]
    async fn written_config_loads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE_NAME);
        let cfg = crate::apply_all_defaults(FileKitConfig::default());

        write_config(&cfg, &path).await.unwrap();

        assert_eq!(load_config(&path).await.unwrap(), cfg);
        assert!(!path.with_extension("yaml.tmp").exists());
    }
}
