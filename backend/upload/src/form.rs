//! Builder for `multipart/form-data` bodies.
//!
//! Used by clients and tests that need to submit files to the pipeline
//! without going through a browser form.

use bytes::Bytes;

use crate::names::generate;
use crate::request::MultipartRequest;

#[derive(Debug, Clone)]
struct Part {
    headers: String,
    data: Vec<u8>,
}

#[derive(Debug, Default, Clone)]
pub struct MultipartFormBuilder {
    parts: Vec<Part>,
}

impl MultipartFormBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a file part.
    pub fn file(
        mut self,
        field: &str,
        file_name: &str,
        content_type: &str,
        data: impl AsRef<[u8]>,
    ) -> Self {
        self.parts.push(Part {
            headers: format!(
                "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}\r\n",
                escape(field),
                escape(file_name),
                content_type.replace(['\r', '\n'], "")
            ),
            data: data.as_ref().to_vec(),
        });
        self
    }

    /// Append a plain form field.
    pub fn text(mut self, field: &str, value: &str) -> Self {
        self.parts.push(Part {
            headers: format!("Content-Disposition: form-data; name=\"{}\"\r\n", escape(field)),
            data: value.as_bytes().to_vec(),
        });
        self
    }

    /// Close the form; returns the `Content-Type` value and the body.
    ///
    /// The boundary is random and never occurs inside any part's data.
    pub fn finish(self) -> (String, Bytes) {
        let boundary = self.boundary();

        let mut body = Vec::new();
        for part in &self.parts {
            body.extend_from_slice(format!("--{boundary}\r\n{}\r\n", part.headers).as_bytes());
            body.extend_from_slice(&part.data);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());

        (
            format!("multipart/form-data; boundary={boundary}"),
            Bytes::from(body),
        )
    }

    pub fn into_request(self) -> MultipartRequest {
        let (content_type, body) = self.finish();
        MultipartRequest::from_bytes(content_type, body)
    }

    fn boundary(&self) -> String {
        let suffix = generate(24).unwrap_or_default();
        let mut boundary = format!("filekit-{suffix}");
        // Grows until it fits nowhere, which terminates once it outgrows the data.
        while self.parts.iter().any(|p| contains(&p.data, boundary.as_bytes())) {
            boundary.push('0');
        }
        boundary
    }
}

/// Percent-encode the characters a quoted disposition parameter cannot hold.
fn escape(value: &str) -> String {
    value
        .replace('"', "%22")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|w| w == needle)
}
