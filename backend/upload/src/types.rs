use serde::{Deserialize, Serialize};

/// One persisted upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedFile {
    /// Client-declared name, reduced to its base name.
    pub original_file_name: String,
    /// Name of the file inside the destination directory.
    pub new_file_name: String,
    /// Bytes actually written to disk.
    pub size_bytes: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_camel_case() {
        let record = UploadedFile {
            original_file_name: "cat.png".to_string(),
            new_file_name: "Zx81.png".to_string(),
            size_bytes: 67,
        };
        assert_eq!(
            serde_json::to_value(&record).unwrap(),
            serde_json::json!({
                "originalFileName": "cat.png",
                "newFileName": "Zx81.png",
                "sizeBytes": 67
            })
        );
    }
}
