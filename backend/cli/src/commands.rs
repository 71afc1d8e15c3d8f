use std::net::SocketAddr;
use std::path::Path;

use anyhow::{bail, Context, Result};
use filekit_config::{
    apply_all_defaults, apply_env_overrides,
    defaults::{DEFAULT_BIND, DEFAULT_LOG_LEVEL, DEFAULT_PORT},
    load_and_prepare, load_config, validate, write_config, FileKitConfig,
};
use filekit_gateway::{start_server, GatewayState};
use tracing::info;

/// File config with env overrides and defaults applied, not yet validated.
async fn load_effective(config_path: &Path) -> Result<FileKitConfig> {
    Ok(apply_all_defaults(apply_env_overrides(
        load_config(config_path).await?,
    )?))
}

pub async fn serve(config_path: &Path, port: Option<u16>) -> Result<()> {
    let logging = load_effective(config_path).await?.logging.unwrap_or_default();
    filekit_logging::init_logger(
        logging.dir.as_deref(),
        logging.level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL),
    );

    let mut config = load_and_prepare(config_path).await?;
    let gateway = config.gateway.get_or_insert_with(Default::default);
    if port.is_some() {
        gateway.port = port;
    }

    let bind = gateway.bind.clone().unwrap_or_else(|| DEFAULT_BIND.to_string());
    let port = gateway.port.unwrap_or(DEFAULT_PORT);
    let addr: SocketAddr = format!("{bind}:{port}")
        .parse()
        .with_context(|| format!("Invalid bind address {bind}:{port}"))?;

    let state = GatewayState::from_config(&config);
    info!(
        %addr,
        upload_dir = %state.upload_dir.display(),
        download_dir = %state.download_dir.display(),
        rename = state.rename,
        "Starting FileKit gateway"
    );
    start_server(addr, state).await
}

pub async fn status(config_path: &Path) -> Result<()> {
    let port = load_effective(config_path)
        .await?
        .gateway
        .and_then(|g| g.port)
        .unwrap_or(DEFAULT_PORT);

    println!("FileKit status: checking...");
    let client = reqwest::Client::new();
    match client
        .get(format!("http://localhost:{port}/api/health"))
        .send()
        .await
    {
        Ok(resp) => {
            let body: serde_json::Value = resp.json().await?;
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
        Err(_) => {
            println!("FileKit is not running on port {port}");
        }
    }
    Ok(())
}

pub async fn check_config(config_path: &Path) -> Result<()> {
    let config = load_effective(config_path).await?;
    let report = validate(&config);

    println!("Config: {}", config_path.display());
    for warning in &report.warnings {
        println!("  warning  {}: {}", warning.path, warning.message);
    }
    for error in &report.errors {
        println!("  error    {}: {}", error.path, error.message);
    }
    if !report.is_valid() {
        bail!("{} config error(s)", report.errors.len());
    }
    println!("OK");
    Ok(())
}

pub async fn init_config(config_path: &Path, force: bool) -> Result<()> {
    if !force && tokio::fs::try_exists(config_path).await.unwrap_or(false) {
        bail!(
            "{} already exists; pass --force to overwrite",
            config_path.display()
        );
    }
    write_config(&apply_all_defaults(FileKitConfig::default()), config_path).await?;
    println!("Wrote {}", config_path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn init_then_check() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("filekit.yaml");

        init_config(&path, false).await.unwrap();
        assert!(path.exists());
        check_config(&path).await.unwrap();

        assert!(init_config(&path, false).await.is_err());
        init_config(&path, true).await.unwrap();
    }

    #[tokio::test]
    async fn invalid_config_fails_check() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("filekit.yaml");
        tokio::fs::write(&path, "json:\n  maxBytes: 0\n").await.unwrap();

        assert!(check_config(&path).await.is_err());
    }
}
