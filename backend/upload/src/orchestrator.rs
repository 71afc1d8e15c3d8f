//! The upload pipeline: parse, spool, sniff, validate, name and persist.

use std::collections::BTreeMap;
use std::io::SeekFrom;
use std::path::Path;

use filekit_config::{resolve_upload_config, UploadConfig};
use filekit_logging::redact_file_name;
use filekit_media::sniff_reader;
use multer::{Constraints, Multipart, SizeLimit};
use tokio::fs::File;
use tokio::io::{AsyncSeekExt, AsyncWriteExt};
use tracing::{debug, info, instrument, warn};

use crate::copy::copy_to_file;
use crate::directory::ensure_dir;
use crate::error::{UploadError, UploadResult};
use crate::names::{generate, GENERATED_NAME_LEN};
use crate::request::MultipartRequest;
use crate::types::UploadedFile;
use crate::validate::is_allowed;

/// A file part held in an anonymous temp file until it is persisted.
struct SpooledPart {
    original_file_name: String,
    file: File,
}

/// Persist every file part of `request` into `destination_dir`.
///
/// The whole body is read (bounded by the configured batch size) before the
/// destination is touched. Parts are then processed sequentially, ordered by
/// field name and by arrival within a field. Processing stops at the first
/// failure; files already written stay on disk, and a content-type rejection
/// reports them through [`UploadError::uploaded`].
#[instrument(skip_all, fields(destination = %destination_dir.display(), rename = rename))]
pub async fn upload_batch(
    request: MultipartRequest,
    destination_dir: &Path,
    rename: bool,
    config: &UploadConfig,
) -> UploadResult<Vec<UploadedFile>> {
    let effective = resolve_upload_config(config);
    let parts = spool_parts(request, effective.max_batch_size_bytes).await?;

    ensure_dir(destination_dir).await?;

    let mut uploaded = Vec::new();
    for SpooledPart {
        original_file_name,
        mut file,
    } in parts.into_values().flatten()
    {
        let content_type = sniff_reader(&mut file)
            .await
            .map_err(|e| UploadError::io("failed to read spooled part", e))?;

        if !is_allowed(content_type, &effective.allowed_content_types) {
            warn!(
                file = %redact_file_name(&original_file_name),
                content_type,
                "Rejected upload with disallowed content type"
            );
            return Err(UploadError::Validation {
                content_type: content_type.to_string(),
                uploaded,
            });
        }

        let new_file_name = destination_name(&original_file_name, rename)?;
        let size_bytes = copy_to_file(&mut file, &destination_dir.join(&new_file_name)).await?;

        info!(
            file = %redact_file_name(&original_file_name),
            stored_as = %new_file_name,
            content_type,
            size_bytes,
            "Stored upload"
        );
        uploaded.push(UploadedFile {
            original_file_name: base_name(&original_file_name).to_string(),
            new_file_name,
            size_bytes,
        });
    }

    info!(count = uploaded.len(), "Upload batch complete");
    Ok(uploaded)
}

/// Like [`upload_batch`] but returns only the first stored file.
pub async fn upload_single(
    request: MultipartRequest,
    destination_dir: &Path,
    rename: bool,
    config: &UploadConfig,
) -> UploadResult<UploadedFile> {
    upload_batch(request, destination_dir, rename, config)
        .await?
        .into_iter()
        .next()
        .ok_or(UploadError::NoFilesSubmitted)
}

async fn spool_parts(
    request: MultipartRequest,
    limit: u64,
) -> UploadResult<BTreeMap<String, Vec<SpooledPart>>> {
    let (content_type, body) = request.into_parts();
    let boundary = multer::parse_boundary(&content_type).map_err(multipart_error)?;
    let constraints = Constraints::new().size_limit(SizeLimit::new().whole_stream(limit));
    let mut multipart = Multipart::with_constraints(body, boundary, constraints);

    let mut parts: BTreeMap<String, Vec<SpooledPart>> = BTreeMap::new();
    while let Some(mut field) = multipart.next_field().await.map_err(multipart_error)? {
        let field_name = field.name().unwrap_or_default().to_string();
        let Some(original_file_name) = field
            .file_name()
            .filter(|name| !name.is_empty())
            .map(str::to_string)
        else {
            // Plain form value.
            while field.chunk().await.map_err(multipart_error)?.is_some() {}
            continue;
        };

        let mut file = File::from_std(
            tempfile::tempfile().map_err(|e| UploadError::io("failed to create spool file", e))?,
        );
        let mut spooled = 0u64;
        while let Some(chunk) = field.chunk().await.map_err(multipart_error)? {
            file.write_all(&chunk)
                .await
                .map_err(|e| UploadError::io("failed to spool upload", e))?;
            spooled += chunk.len() as u64;
        }
        file.flush()
            .await
            .map_err(|e| UploadError::io("failed to spool upload", e))?;
        file.seek(SeekFrom::Start(0))
            .await
            .map_err(|e| UploadError::io("failed to rewind spool file", e))?;

        debug!(
            field = %field_name,
            file = %redact_file_name(&original_file_name),
            spooled,
            "Spooled file part"
        );
        parts.entry(field_name).or_default().push(SpooledPart {
            original_file_name,
            file,
        });
    }

    Ok(parts)
}

fn multipart_error(err: multer::Error) -> UploadError {
    match err {
        multer::Error::StreamSizeExceeded { limit } => UploadError::SizeLimitExceeded { limit },
        other => UploadError::Parse(other.to_string()),
    }
}

/// Strip every directory component, accepting both `/` and `\` separators.
fn base_name(name: &str) -> &str {
    let trimmed = name.trim_end_matches(['/', '\\']);
    trimmed.rsplit(['/', '\\']).next().unwrap_or_default()
}

fn is_usable(base: &str) -> bool {
    !matches!(base, "" | "." | "..")
}

/// Suffix from the last `.` of the base name, dot included.
fn extension(base: &str) -> &str {
    if !is_usable(base) {
        return "";
    }
    base.rfind('.').map_or("", |idx| &base[idx..])
}

fn destination_name(original: &str, rename: bool) -> UploadResult<String> {
    let base = base_name(original);
    if rename {
        return Ok(format!("{}{}", generate(GENERATED_NAME_LEN)?, extension(base)));
    }
    if !is_usable(base) {
        return Err(UploadError::InvalidFileName(original.to_string()));
    }
    Ok(base.to_string())
}
