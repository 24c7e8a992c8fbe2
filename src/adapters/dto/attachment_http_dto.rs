use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    application::dto::attachment_dto::AttachmentFilterDTO,
    domain::models::{
        attachment::{AttachmentMetadata, AttachmentStatus},
        user::Role,
    },
};

#[derive(Debug, Serialize)]
pub struct AttachmentResponse {
    pub id: Uuid,
    #[serde(rename = "fileName")]
    pub file_name: String,
    #[serde(rename = "fileType")]
    pub file_type: String,
    #[serde(rename = "fileSize")]
    pub file_size: u64,
    pub category: String,
    #[serde(rename = "customCategory")]
    pub custom_category: Option<String>,
    #[serde(rename = "uploadedBy")]
    pub uploaded_by: String,
    #[serde(rename = "uploadedByEmail")]
    pub uploaded_by_email: String,
    #[serde(rename = "uploadedAt")]
    pub uploaded_at: DateTime<Utc>,
    pub description: Option<String>,
    #[serde(rename = "totalChunks")]
    pub total_chunks: u32,
    pub status: AttachmentStatus,
}

impl From<AttachmentMetadata> for AttachmentResponse {
    fn from(metadata: AttachmentMetadata) -> Self {
        Self {
            id: metadata.id,
            file_name: metadata.file_name,
            file_type: metadata.file_type,
            file_size: metadata.file_size,
            category: metadata.category.into(),
            custom_category: metadata.custom_category,
            uploaded_by: metadata.uploaded_by,
            uploaded_by_email: metadata.uploaded_by_email,
            uploaded_at: metadata.uploaded_at,
            description: metadata.description,
            total_chunks: metadata.total_chunks,
            status: metadata.status,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ListAttachmentsQuery {
    pub category: Option<String>,
    pub search: Option<String>,
    #[serde(rename = "includeIncomplete", default)]
    pub include_incomplete: bool,
}

impl From<ListAttachmentsQuery> for AttachmentFilterDTO {
    fn from(query: ListAttachmentsQuery) -> Self {
        let non_blank = |value: Option<String>| value.filter(|v| !v.trim().is_empty());
        let base = if query.include_incomplete {
            AttachmentFilterDTO::default()
        } else {
            AttachmentFilterDTO::completed()
        };
        AttachmentFilterDTO {
            category: non_blank(query.category).filter(|c| c != "All"),
            search: non_blank(query.search),
            ..base
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateRoleRequest {
    pub role: Role,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_query_lists_completed_only() {
        let filter: AttachmentFilterDTO = ListAttachmentsQuery::default().into();
        assert_eq!(filter.status, Some(AttachmentStatus::Completed));
        assert!(filter.category.is_none());
    }

    #[test]
    fn all_category_and_blank_search_are_ignored() {
        let filter: AttachmentFilterDTO = ListAttachmentsQuery {
            category: Some("All".to_string()),
            search: Some("  ".to_string()),
            include_incomplete: true,
        }
        .into();
        assert!(filter.category.is_none());
        assert!(filter.search.is_none());
        assert!(filter.status.is_none());
    }
}
