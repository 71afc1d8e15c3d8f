pub mod json;
pub mod slug;

pub use json::{
    decode_json, error_json, push_json_to_remote, read_json, write_json, JsonError, JsonResponse,
    DEFAULT_MAX_BYTES,
};
pub use slug::{slugify, SlugError};
