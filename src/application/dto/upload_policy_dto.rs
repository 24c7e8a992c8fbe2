use serde::{Deserialize, Serialize};

use crate::domain::config::upload::UploadPolicy;

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct UploadPolicyDTO {
    #[serde(rename = "mimeTypes")]
    pub mime_types: Option<Vec<String>>,
    #[serde(rename = "maxSize")]
    pub max_size: Option<u64>,
    #[serde(rename = "chunkSize")]
    pub chunk_size: Option<u64>,
    #[serde(rename = "batchSize")]
    pub batch_size: Option<u32>,
}

impl UploadPolicyDTO {
    pub fn sanitize(&mut self) {
        if let Some(ref mut mime_types) = self.mime_types {
            mime_types.retain(|s| !s.trim().is_empty());
            for mime_type in mime_types.iter_mut() {
                *mime_type = mime_type.trim().to_string();
            }
        }
        if let Some(max_size) = self.max_size {
            self.max_size = Some(std::cmp::min(max_size, i64::MAX as u64));
        }
        if let Some(chunk_size) = self.chunk_size {
            self.chunk_size = Some(std::cmp::min(chunk_size, i64::MAX as u64));
        }
    }

    pub fn is_empty(&self) -> bool {
        self.mime_types.is_none()
            && self.max_size.is_none()
            && self.chunk_size.is_none()
            && self.batch_size.is_none()
    }

    /// Overlays the fields present in this patch onto `base`.
    pub fn apply_to(self, base: UploadPolicy) -> UploadPolicy {
        UploadPolicy {
            mime_types: self.mime_types.unwrap_or(base.mime_types),
            max_size: self.max_size.unwrap_or(base.max_size),
            chunk_size: self.chunk_size.unwrap_or(base.chunk_size),
            batch_size: self.batch_size.unwrap_or(base.batch_size),
        }
    }
}

impl From<UploadPolicy> for UploadPolicyDTO {
    fn from(value: UploadPolicy) -> Self {
        UploadPolicyDTO {
            mime_types: Some(value.mime_types),
            max_size: Some(value.max_size),
            chunk_size: Some(value.chunk_size),
            batch_size: Some(value.batch_size),
        }
    }
}

impl From<UploadPolicyDTO> for UploadPolicy {
    fn from(value: UploadPolicyDTO) -> Self {
        value.apply_to(UploadPolicy::default())
    }
}
