//! `filekit-media`: content typing and file serving.
//!
//! Provides:
//! - Magic-byte content sniffing for untrusted uploads
//! - Extension-based labelling for files served back out
//! - An attachment download responder and its axum router

pub mod download;
pub mod mime_detect;
pub mod sniff;

pub use download::{download_static_file, media_router, DownloadState};
pub use mime_detect::content_type_for_path;
pub use sniff::{sniff, sniff_reader, OCTET_STREAM, SNIFF_LEN, TEXT_PLAIN};
