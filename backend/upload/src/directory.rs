use std::io;
use std::path::Path;

use tokio::fs;
use tracing::debug;

use crate::error::{UploadError, UploadResult};

/// Ensure `path` exists as a directory, creating it (and missing parents) if absent.
///
/// An existing directory is left untouched. A non-directory at `path` is an
/// I/O error. New directories get mode `0755` on Unix.
pub async fn ensure_dir(path: &Path) -> UploadResult<()> {
    match fs::metadata(path).await {
        Ok(meta) if meta.is_dir() => return Ok(()),
        Ok(_) => {
            return Err(UploadError::io(
                format!("{} exists and is not a directory", path.display()),
                io::Error::new(io::ErrorKind::AlreadyExists, "not a directory"),
            ));
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => {
            return Err(UploadError::io(format!("failed to inspect {}", path.display()), e));
        }
    }

    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    builder.mode(0o755);

    builder
        .create(path)
        .await
        .map_err(|e| UploadError::io(format!("failed to create {}", path.display()), e))?;

    debug!(path = %path.display(), "Created upload directory");
    Ok(())
}
