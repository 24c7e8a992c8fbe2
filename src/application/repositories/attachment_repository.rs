use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::{
    application::{
        dto::attachment_dto::{AttachmentFilterDTO, NewAttachmentDTO},
        error::ApplicationError,
    },
    domain::models::attachment::{
        AttachmentChunk, AttachmentId, AttachmentMetadata, AttachmentSnapshot,
    },
};

/// Keyed store for attachment metadata and its fragments.
///
/// Implementations must commit each `insert_chunks` call and each
/// `delete_attachment` call atomically, and must serve `load_snapshot` from a
/// single consistent view so a concurrent delete is either fully visible or
/// not visible at all.
#[async_trait]
pub trait AttachmentRepository: Send + Sync {
    /// Persists a new metadata record with status `uploading`.
    async fn create_metadata(
        &self,
        attachment: NewAttachmentDTO,
    ) -> Result<AttachmentMetadata, ApplicationError>;

    /// Writes one batch of fragments in a single atomic group.
    async fn insert_chunks(
        &self,
        id: AttachmentId,
        chunks: &[AttachmentChunk],
    ) -> Result<(), ApplicationError>;

    async fn mark_completed(&self, id: AttachmentId)
        -> Result<AttachmentMetadata, ApplicationError>;

    async fn get_metadata(&self, id: AttachmentId) -> Result<AttachmentMetadata, ApplicationError>;

    /// Metadata matching `filter`, newest first.
    async fn list_metadata(
        &self,
        filter: &AttachmentFilterDTO,
    ) -> Result<Vec<AttachmentMetadata>, ApplicationError>;

    /// Metadata and fragments ordered by index, read together.
    async fn load_snapshot(&self, id: AttachmentId)
        -> Result<AttachmentSnapshot, ApplicationError>;

    /// Removes every fragment and the metadata record in one atomic group.
    /// Returns the removed metadata and the number of fragments removed.
    async fn delete_attachment(
        &self,
        id: AttachmentId,
    ) -> Result<(AttachmentMetadata, u64), ApplicationError>;

    /// `uploading` records created at or before `cutoff`.
    async fn list_stale_uploads(
        &self,
        cutoff: DateTime<Utc>,
    ) -> Result<Vec<AttachmentMetadata>, ApplicationError>;

    /// Deletes `id` like `delete_attachment`, but only while it is still
    /// `uploading` and created at or before `cutoff`. The check and the
    /// delete happen atomically; `None` means the record no longer qualifies.
    async fn delete_stale_upload(
        &self,
        id: AttachmentId,
        cutoff: DateTime<Utc>,
    ) -> Result<Option<(AttachmentMetadata, u64)>, ApplicationError>;
}
