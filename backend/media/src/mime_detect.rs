//! Extension-based MIME lookup.
//!
//! Only used to label files we serve back out. Uploads are never classified
//! by extension; see [`crate::sniff`] for that.

use std::path::Path;

/// Content type for a path, judged by its extension alone.
pub fn content_type_for_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png"          => "image/png",
        "gif"          => "image/gif",
        "webp"         => "image/webp",
        "bmp"          => "image/bmp",
        "ico"          => "image/x-icon",
        "svg"          => "image/svg+xml",

        "mp3"          => "audio/mpeg",
        "ogg"          => "application/ogg",
        "wav"          => "audio/wave",
        "mid" | "midi" => "audio/midi",
        "mp4"          => "video/mp4",
        "webm"         => "video/webm",
        "avi"          => "video/avi",

        "pdf"          => "application/pdf",
        "ps"           => "application/postscript",
        "zip"          => "application/zip",
        "gz"           => "application/x-gzip",
        "rar"          => "application/x-rar-compressed",
        "wasm"         => "application/wasm",
        "json"         => "application/json",

        "txt" | "md"   => "text/plain; charset=utf-8",
        "html" | "htm" => "text/html; charset=utf-8",
        "xml"          => "text/xml; charset=utf-8",
        "csv"          => "text/csv; charset=utf-8",

        _              => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_known_extensions() {
        assert_eq!(content_type_for_path(Path::new("puppy.JPG")), "image/jpeg");
        assert_eq!(content_type_for_path(Path::new("a/b/report.pdf")), "application/pdf");
    }

    #[test]
    fn unknown_extension_fallback() {
        assert_eq!(content_type_for_path(Path::new("file.xyz")), "application/octet-stream");
        assert_eq!(content_type_for_path(Path::new("Makefile")), "application/octet-stream");
    }
}
