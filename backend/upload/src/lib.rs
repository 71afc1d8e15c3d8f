//! `filekit-upload`: receive multipart uploads and persist them to disk.
//!
//! Each file part is sniffed from its leading bytes, checked against an
//! allow-list and written to a destination directory under either its own
//! base name or a freshly generated one.

pub mod copy;
pub mod directory;
pub mod error;
pub mod form;
pub mod names;
pub mod orchestrator;
pub mod request;
pub mod types;
pub mod validate;

pub use copy::copy_to_file;
pub use directory::ensure_dir;
pub use error::{UploadError, UploadResult};
pub use form::MultipartFormBuilder;
pub use names::{generate, generate_with, ALPHABET, GENERATED_NAME_LEN};
pub use orchestrator::{upload_batch, upload_single};
pub use request::{BoxError, MultipartRequest};
pub use types::UploadedFile;
pub use validate::is_allowed;
