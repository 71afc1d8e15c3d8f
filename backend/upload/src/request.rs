use std::convert::Infallible;

use bytes::Bytes;
use futures::stream::{self, BoxStream, Stream, StreamExt};

/// Boxed error type accepted from body streams.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// An inbound `multipart/form-data` request: the `Content-Type` header value
/// (which carries the boundary) and the raw body as a byte stream.
pub struct MultipartRequest {
    content_type: String,
    body: BoxStream<'static, Result<Bytes, BoxError>>,
}

impl MultipartRequest {
    pub fn new<S, O, E>(content_type: impl Into<String>, body: S) -> Self
    where
        S: Stream<Item = Result<O, E>> + Send + 'static,
        O: Into<Bytes> + 'static,
        E: Into<BoxError> + 'static,
    {
        Self {
            content_type: content_type.into(),
            body: body
                .map(|item| item.map(Into::<Bytes>::into).map_err(Into::<BoxError>::into))
                .boxed(),
        }
    }

    /// A request whose whole body is already in memory.
    pub fn from_bytes(content_type: impl Into<String>, body: impl Into<Bytes>) -> Self {
        Self::new(content_type, stream::iter([Ok::<Bytes, Infallible>(body.into())]))
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub(crate) fn into_parts(self) -> (String, BoxStream<'static, Result<Bytes, BoxError>>) {
        (self.content_type, self.body)
    }
}

impl std::fmt::Debug for MultipartRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MultipartRequest")
            .field("content_type", &self.content_type)
            .finish_non_exhaustive()
    }
}
