use std::{sync::Arc, time::Duration};

use chrono::Utc;
use futures::{Stream, StreamExt};
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

use crate::{
    application::{
        dto::attachment_dto::{AttachmentFilterDTO, NewAttachmentDTO},
        error::ApplicationError,
        repositories::attachment_repository::AttachmentRepository,
        services::ChangeFeed,
    },
    domain::{
        chunking::{join_chunks, split_into_chunks},
        config::upload::{UploadPolicy, MAX_CATEGORY_LENGTH, MAX_DESCRIPTION_LENGTH},
        models::{
            attachment::{
                AttachmentChunk, AttachmentId, AttachmentListing, AttachmentMetadata,
                AttachmentSnapshot, Category,
            },
            user::User,
        },
        payload::{decode_data_url, encode_data_url},
    },
};

#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub file_name: String,
    pub mime_type: String,
    pub content: Vec<u8>,
    pub category: Category,
    pub description: Option<String>,
}

#[derive(Debug, Clone)]
pub struct DownloadedAttachment {
    pub metadata: AttachmentMetadata,
    pub mime_type: String,
    pub content: Vec<u8>,
}

#[derive(Debug, Default, Serialize)]
pub struct ReapReport {
    #[serde(rename = "deletedCount")]
    pub deleted: usize,
    pub errors: Vec<String>,
}

/// Chunked attachment storage on top of an [`AttachmentRepository`].
#[derive(Clone)]
pub struct AttachmentStore {
    repository: Arc<dyn AttachmentRepository>,
    policy: Arc<RwLock<UploadPolicy>>,
    events: ChangeFeed,
}

impl AttachmentStore {
    pub fn new(
        repository: Arc<dyn AttachmentRepository>,
        policy: UploadPolicy,
        events: ChangeFeed,
    ) -> Self {
        Self {
            repository,
            policy: Arc::new(RwLock::new(policy)),
            events,
        }
    }

    pub async fn policy(&self) -> UploadPolicy {
        self.policy.read().await.clone()
    }

    pub async fn replace_policy(&self, policy: UploadPolicy) {
        *self.policy.write().await = policy;
    }

    pub fn validate_upload(
        policy: &UploadPolicy,
        request: &UploadRequest,
    ) -> Result<(), ApplicationError> {
        if request.file_name.trim().is_empty() {
            return Err(ApplicationError::BadRequest("File name is required".to_string()));
        }
        if request.content.is_empty() {
            return Err(ApplicationError::BadRequest("File is empty".to_string()));
        }
        if request.content.len() as u64 > policy.max_size {
            return Err(ApplicationError::PayloadTooLarge);
        }
        if !policy.allows_mime_type(&request.mime_type) {
            return Err(ApplicationError::UnsupportedMediaType(request.mime_type.clone()));
        }
        if request.category.label().trim().is_empty() {
            return Err(ApplicationError::BadRequest("Category is required".to_string()));
        }
        if request.category.label().len() > MAX_CATEGORY_LENGTH {
            return Err(ApplicationError::BadRequest("Category is too long".to_string()));
        }
        if request
            .description
            .as_ref()
            .is_some_and(|d| d.len() > MAX_DESCRIPTION_LENGTH)
        {
            return Err(ApplicationError::BadRequest("Description is too long".to_string()));
        }
        Ok(())
    }

    /// Validates and stores an uploaded file on behalf of `uploader`.
    pub async fn upload(
        &self,
        request: UploadRequest,
        uploader: &User,
    ) -> Result<AttachmentMetadata, ApplicationError> {
        let policy = self.policy().await;
        Self::validate_upload(&policy, &request)?;

        let payload = encode_data_url(&request.mime_type, &request.content);
        let custom_category = request
            .category
            .is_custom()
            .then(|| request.category.label().to_string());

        let attachment = NewAttachmentDTO {
            file_name: request.file_name,
            file_type: request.mime_type,
            file_size: request.content.len() as u64,
            category: request.category,
            custom_category,
            uploaded_by: uploader.uid.clone(),
            uploaded_by_email: uploader.email.clone(),
            description: request.description.filter(|d| !d.trim().is_empty()),
            total_chunks: 0,
        };

        self.write(attachment, &payload).await
    }

    /// Persists `payload` as a metadata record plus fragments. The record is
    /// flipped to `completed` only after every batch has been committed; a
    /// failed batch leaves it `uploading` for the reaper.
    pub async fn write(
        &self,
        mut attachment: NewAttachmentDTO,
        payload: &str,
    ) -> Result<AttachmentMetadata, ApplicationError> {
        let policy = self.policy().await;
        let chunk_size = usize::try_from(policy.chunk_size)
            .map_err(|_| ApplicationError::InternalError("chunk size overflow".to_string()))?;
        let batch_size = policy.batch_size.max(1) as usize;

        let fragments = split_into_chunks(payload, chunk_size);
        attachment.total_chunks = u32::try_from(fragments.len())
            .map_err(|_| ApplicationError::PayloadTooLarge)?;

        let metadata = self.repository.create_metadata(attachment).await?;
        let id = metadata.id;
        info!(
            "Created attachment {} ({} fragments, {} bytes)",
            id, metadata.total_chunks, metadata.file_size
        );
        self.events.notify();

        let mut next_index: u32 = 0;
        let mut fragments = fragments.into_iter().peekable();
        while fragments.peek().is_some() {
            let batch: Vec<AttachmentChunk> = fragments
                .by_ref()
                .take(batch_size)
                .map(|data| {
                    let chunk = AttachmentChunk {
                        attachment_id: id,
                        index: next_index,
                        data,
                    };
                    next_index += 1;
                    chunk
                })
                .collect();

            if let Err(e) = self.repository.insert_chunks(id, &batch).await {
                error!(
                    "Fragment batch ending at {} failed for attachment {}, left uploading: {:?}",
                    next_index, id, e
                );
                return Err(e);
            }
            debug!("Committed fragments up to {} for attachment {}", next_index, id);
        }

        let completed = self.repository.mark_completed(id).await?;
        info!("Attachment {} completed", id);
        self.events.notify();
        Ok(completed)
    }

    /// Reconstructs the original bytes. Fails unless the record is
    /// `completed` and every fragment in `0..total_chunks` is present.
    pub async fn read(&self, id: AttachmentId) -> Result<DownloadedAttachment, ApplicationError> {
        let AttachmentSnapshot { metadata, chunks } = self.repository.load_snapshot(id).await?;

        if !metadata.is_completed() {
            warn!("Refusing read of attachment {} in status {}", id, metadata.status);
            return Err(ApplicationError::AttachmentUnavailable(format!(
                "attachment {} is still {}",
                id, metadata.status
            )));
        }

        if chunks.is_empty() {
            warn!("Attachment {} has no stored fragments", id);
            return Err(ApplicationError::AttachmentUnavailable(format!(
                "attachment {} has no data",
                id
            )));
        }

        let contiguous = chunks
            .iter()
            .enumerate()
            .all(|(position, chunk)| chunk.index as usize == position);
        if chunks.len() != metadata.total_chunks as usize || !contiguous {
            warn!(
                "Attachment {} has {} of {} fragments",
                id,
                chunks.len(),
                metadata.total_chunks
            );
            return Err(ApplicationError::AttachmentUnavailable(format!(
                "attachment {} is incomplete",
                id
            )));
        }

        let payload = join_chunks(&chunks);
        let decoded = decode_data_url(&payload)?;

        Ok(DownloadedAttachment {
            mime_type: decoded
                .mime_type
                .unwrap_or_else(|| metadata.file_type.clone()),
            content: decoded.bytes,
            metadata,
        })
    }

    pub async fn get(&self, id: AttachmentId) -> Result<AttachmentMetadata, ApplicationError> {
        self.repository.get_metadata(id).await
    }

    pub async fn list(
        &self,
        filter: &AttachmentFilterDTO,
    ) -> Result<Vec<AttachmentMetadata>, ApplicationError> {
        self.repository.list_metadata(filter).await
    }

    /// Removes every fragment and the metadata record together.
    pub async fn delete(&self, id: AttachmentId) -> Result<AttachmentMetadata, ApplicationError> {
        let (metadata, removed) = self.repository.delete_attachment(id).await?;
        info!("Deleted attachment {} and {} fragments", id, removed);
        self.events.notify();
        Ok(metadata)
    }

    /// Deletes `uploading` records older than `timeout`.
    pub async fn reap_stale(&self, timeout: Duration) -> Result<ReapReport, ApplicationError> {
        let timeout = chrono::Duration::from_std(timeout)
            .map_err(|e| ApplicationError::InternalError(e.to_string()))?;
        let cutoff = Utc::now() - timeout;

        let stale = self.repository.list_stale_uploads(cutoff).await?;
        let mut report = ReapReport::default();

        for metadata in stale {
            match self.repository.delete_stale_upload(metadata.id, cutoff).await {
                Ok(Some((_, removed))) => {
                    info!(
                        "Reaped stale upload {} ({} fragments)",
                        metadata.id, removed
                    );
                    report.deleted += 1;
                }
                Ok(None) => debug!("Upload {} is no longer stale, skipping", metadata.id),
                Err(e) => report.errors.push(format!(
                    "Error deleting stale upload {}: {:?}",
                    metadata.id, e
                )),
            }
        }

        if report.deleted > 0 {
            self.events.notify();
        }
        Ok(report)
    }

    pub fn subscribe(
        &self,
        filter: AttachmentFilterDTO,
    ) -> impl Stream<Item = Result<AttachmentListing, ApplicationError>> + Send + 'static {
        let repository = self.repository.clone();
        let filter = Arc::new(filter);
        self.events
            .listen(move || {
                let repository = repository.clone();
                let filter = filter.clone();
                async move { repository.list_metadata(&filter).await }
            })
            .map(|view| {
                view.map(|(revision, attachments)| AttachmentListing {
                    revision,
                    emitted_at: Utc::now(),
                    attachments,
                })
            })
    }
}
