use std::path::Path;

use tokio::fs::{self, File};
use tokio::io::{AsyncRead, AsyncWriteExt};
use tracing::warn;

use crate::error::{UploadError, UploadResult};

/// Create `destination` and stream `source` into it, returning the bytes written.
///
/// The count comes from the copy itself, never from a declared length. The
/// destination handle is closed on every path; if the copy fails partway the
/// incomplete file is removed (best-effort).
pub async fn copy_to_file<R>(source: &mut R, destination: &Path) -> UploadResult<u64>
where
    R: AsyncRead + Unpin + ?Sized,
{
    let mut file = File::create(destination).await.map_err(|e| {
        UploadError::io(format!("failed to create {}", destination.display()), e)
    })?;

    let result = copy_and_flush(source, &mut file).await;
    drop(file);

    match result {
        Ok(written) => Ok(written),
        Err(e) => {
            if let Err(cleanup) = fs::remove_file(destination).await {
                warn!(path = %destination.display(), error = %cleanup, "Failed to remove partial upload");
            }
            Err(UploadError::io(format!("failed to write {}", destination.display()), e))
        }
    }
}

async fn copy_and_flush<R>(source: &mut R, file: &mut File) -> std::io::Result<u64>
where
    R: AsyncRead + Unpin + ?Sized,
{
    let written = tokio::io::copy(source, file).await?;
    file.flush().await?;
    Ok(written)
}
