use serde::{Deserialize, Serialize};

use crate::domain::chunking::DEFAULT_CHUNK_SIZE;

pub const DEFAULT_MAX_SIZE: u64 = 30 * 1024 * 1024;
/// Per-request write ceiling of the backing store.
pub const MAX_BATCH_SIZE: u32 = 500;
/// Fragments stay below the 1 MiB per-record ceiling.
pub const MAX_CHUNK_SIZE: u64 = 1_000_000;
/// Longest accepted category or custom category name, in bytes.
pub const MAX_CATEGORY_LENGTH: usize = 100;
/// Longest accepted attachment description, in bytes.
pub const MAX_DESCRIPTION_LENGTH: usize = 2_000;

pub const PDF: &str = "application/pdf";
pub const XLS: &str = "application/vnd.ms-excel";
pub const XLSX: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
pub const DOC: &str = "application/msword";
pub const DOCX: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct UploadPolicy {
    #[serde(rename = "mimeTypes")]
    pub mime_types: Vec<String>,
    #[serde(rename = "maxSize")]
    pub max_size: u64,
    #[serde(rename = "chunkSize")]
    pub chunk_size: u64,
    #[serde(rename = "batchSize")]
    pub batch_size: u32,
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self {
            mime_types: [PDF, XLS, XLSX, DOC, DOCX]
                .iter()
                .map(|m| m.to_string())
                .collect(),
            max_size: DEFAULT_MAX_SIZE,
            chunk_size: DEFAULT_CHUNK_SIZE as u64,
            batch_size: MAX_BATCH_SIZE,
        }
    }
}

impl UploadPolicy {
    pub fn allows_mime_type(&self, mime_type: &str) -> bool {
        self.mime_types.iter().any(|m| m == mime_type)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.mime_types.is_empty() {
            return Err("at least one MIME type must be allowed".to_string());
        }
        if self.max_size == 0 {
            return Err("maxSize must be positive".to_string());
        }
        if self.chunk_size == 0 || self.chunk_size > MAX_CHUNK_SIZE {
            return Err(format!("chunkSize must be in 1..={}", MAX_CHUNK_SIZE));
        }
        if self.batch_size == 0 || self.batch_size > MAX_BATCH_SIZE {
            return Err(format!("batchSize must be in 1..={}", MAX_BATCH_SIZE));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_accept_office_documents_only() {
        let policy = UploadPolicy::default();
        assert!(policy.validate().is_ok());
        assert_eq!(policy.chunk_size, 800 * 1024);
        assert_eq!(policy.batch_size, 500);
        assert!(policy.allows_mime_type(XLSX));
        assert!(policy.allows_mime_type(DOC));
        assert!(!policy.allows_mime_type("image/png"));
    }

    #[test]
    fn oversized_batches_are_invalid() {
        let policy = UploadPolicy {
            batch_size: 501,
            ..UploadPolicy::default()
        };
        assert!(policy.validate().is_err());
    }

    #[test]
    fn fragments_above_record_ceiling_are_invalid() {
        let policy = UploadPolicy {
            chunk_size: 2 * 1024 * 1024,
            ..UploadPolicy::default()
        };
        assert!(policy.validate().is_err());
    }
}
