use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    application::error::ApplicationError,
    domain::models::attachment::{AttachmentMetadata, AttachmentStatus, Category},
};

/// Metadata for a record about to be created. The store assigns `id`,
/// `uploaded_at` and the initial `uploading` status.
#[derive(Debug, Clone)]
pub struct NewAttachmentDTO {
    pub file_name: String,
    pub file_type: String,
    pub file_size: u64,
    pub category: Category,
    pub custom_category: Option<String>,
    pub uploaded_by: String,
    pub uploaded_by_email: String,
    pub description: Option<String>,
    pub total_chunks: u32,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AttachmentFilterDTO {
    /// Exact category label.
    pub category: Option<String>,
    /// Case-insensitive substring of the file name.
    pub search: Option<String>,
    /// `None` matches every status.
    pub status: Option<AttachmentStatus>,
}

impl AttachmentFilterDTO {
    pub fn completed() -> Self {
        Self {
            status: Some(AttachmentStatus::Completed),
            ..Default::default()
        }
    }

    pub fn matches(&self, metadata: &AttachmentMetadata) -> bool {
        if let Some(status) = self.status {
            if metadata.status != status {
                return false;
            }
        }
        if let Some(category) = &self.category {
            if metadata.category.label() != category {
                return false;
            }
        }
        if let Some(search) = &self.search {
            let needle = search.to_lowercase();
            if !metadata.file_name.to_lowercase().contains(&needle) {
                return false;
            }
        }
        true
    }
}

/// Row-shaped view of an attachment as persisted.
#[derive(Debug, Clone)]
pub struct AttachmentDTO {
    pub id: Uuid,
    pub file_name: String,
    pub file_type: String,
    pub file_size: i64,
    pub category: String,
    pub custom_category: Option<String>,
    pub uploaded_by: String,
    pub uploaded_by_email: String,
    pub uploaded_at: DateTime<Utc>,
    pub description: Option<String>,
    pub total_chunks: i32,
    pub status: String,
}

impl TryFrom<AttachmentDTO> for AttachmentMetadata {
    type Error = ApplicationError;

    fn try_from(value: AttachmentDTO) -> Result<Self, Self::Error> {
        let status = value
            .status
            .parse::<AttachmentStatus>()
            .map_err(ApplicationError::DatabaseError)?;

        Ok(AttachmentMetadata {
            id: value.id,
            file_name: value.file_name,
            file_type: value.file_type,
            file_size: value.file_size.max(0) as u64,
            category: Category::from(value.category),
            custom_category: value.custom_category,
            uploaded_by: value.uploaded_by,
            uploaded_by_email: value.uploaded_by_email,
            uploaded_at: value.uploaded_at,
            description: value.description,
            total_chunks: value.total_chunks.max(0) as u32,
            status,
        })
    }
}
