use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    application::{
        dto::attachment_dto::{AttachmentFilterDTO, NewAttachmentDTO},
        error::ApplicationError,
        repositories::attachment_repository::AttachmentRepository,
    },
    domain::models::attachment::{
        AttachmentChunk, AttachmentId, AttachmentMetadata, AttachmentSnapshot, AttachmentStatus,
    },
};

#[derive(Default)]
struct Collections {
    attachments: HashMap<AttachmentId, AttachmentMetadata>,
    chunks: BTreeMap<(AttachmentId, u32), String>,
}

impl Collections {
    fn chunks_of(&self, id: AttachmentId) -> impl Iterator<Item = (&(AttachmentId, u32), &String)> {
        self.chunks.range((id, 0)..=(id, u32::MAX))
    }

    fn remove(&mut self, id: AttachmentId) -> Option<(AttachmentMetadata, u64)> {
        let metadata = self.attachments.remove(&id)?;
        let keys: Vec<(AttachmentId, u32)> = self.chunks_of(id).map(|(key, _)| *key).collect();
        for key in &keys {
            self.chunks.remove(key);
        }
        Some((metadata, keys.len() as u64))
    }
}

/// Process-local backend. One lock guards both collections, so grouped
/// writes and snapshot reads are atomic.
#[derive(Default)]
pub struct MemoryAttachmentRepository {
    collections: RwLock<Collections>,
}

impl MemoryAttachmentRepository {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub async fn chunk_count(&self, id: AttachmentId) -> usize {
        self.collections.read().await.chunks_of(id).count()
    }
}

#[async_trait]
impl AttachmentRepository for MemoryAttachmentRepository {
    async fn create_metadata(
        &self,
        attachment: NewAttachmentDTO,
    ) -> Result<AttachmentMetadata, ApplicationError> {
        let metadata = AttachmentMetadata {
            id: Uuid::new_v4(),
            file_name: attachment.file_name,
            file_type: attachment.file_type,
            file_size: attachment.file_size,
            category: attachment.category,
            custom_category: attachment.custom_category,
            uploaded_by: attachment.uploaded_by,
            uploaded_by_email: attachment.uploaded_by_email,
            uploaded_at: Utc::now(),
            description: attachment.description,
            total_chunks: attachment.total_chunks,
            status: AttachmentStatus::Uploading,
        };

        self.collections
            .write()
            .await
            .attachments
            .insert(metadata.id, metadata.clone());
        Ok(metadata)
    }

    async fn insert_chunks(
        &self,
        id: AttachmentId,
        chunks: &[AttachmentChunk],
    ) -> Result<(), ApplicationError> {
        let mut collections = self.collections.write().await;
        if !collections.attachments.contains_key(&id) {
            return Err(ApplicationError::NotFound);
        }
        if let Some(stray) = chunks.iter().find(|c| c.attachment_id != id) {
            return Err(ApplicationError::BadRequest(format!(
                "fragment {} belongs to attachment {}",
                stray.index, stray.attachment_id
            )));
        }
        for chunk in chunks {
            collections
                .chunks
                .insert((id, chunk.index), chunk.data.clone());
        }
        Ok(())
    }

    async fn mark_completed(
        &self,
        id: AttachmentId,
    ) -> Result<AttachmentMetadata, ApplicationError> {
        let mut collections = self.collections.write().await;
        let metadata = collections
            .attachments
            .get_mut(&id)
            .ok_or(ApplicationError::NotFound)?;
        metadata.status = AttachmentStatus::Completed;
        Ok(metadata.clone())
    }

    async fn get_metadata(&self, id: AttachmentId) -> Result<AttachmentMetadata, ApplicationError> {
        self.collections
            .read()
            .await
            .attachments
            .get(&id)
            .cloned()
            .ok_or(ApplicationError::NotFound)
    }

    async fn list_metadata(
        &self,
        filter: &AttachmentFilterDTO,
    ) -> Result<Vec<AttachmentMetadata>, ApplicationError> {
        let collections = self.collections.read().await;
        let mut matching: Vec<AttachmentMetadata> = collections
            .attachments
            .values()
            .filter(|m| filter.matches(m))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.uploaded_at.cmp(&a.uploaded_at));
        Ok(matching)
    }

    async fn load_snapshot(
        &self,
        id: AttachmentId,
    ) -> Result<AttachmentSnapshot, ApplicationError> {
        let collections = self.collections.read().await;
        let metadata = collections
            .attachments
            .get(&id)
            .cloned()
            .ok_or(ApplicationError::NotFound)?;
        let chunks = collections
            .chunks_of(id)
            .map(|(&(attachment_id, index), data)| AttachmentChunk {
                attachment_id,
                index,
                data: data.clone(),
            })
            .collect();

        Ok(AttachmentSnapshot { metadata, chunks })
    }

    async fn delete_attachment(
        &self,
        id: AttachmentId,
    ) -> Result<(AttachmentMetadata, u64), ApplicationError> {
        self.collections
            .write()
            .await
            .remove(id)
            .ok_or(ApplicationError::NotFound)
    }

    async fn delete_stale_upload(
        &self,
        id: AttachmentId,
        cutoff: DateTime<Utc>,
    ) -> Result<Option<(AttachmentMetadata, u64)>, ApplicationError> {
        let mut collections = self.collections.write().await;
        let still_stale = collections
            .attachments
            .get(&id)
            .is_some_and(|m| m.status == AttachmentStatus::Uploading && m.uploaded_at <= cutoff);
        if !still_stale {
            return Ok(None);
        }
        Ok(collections.remove(id))
    }

    async fn list_stale_uploads(
        &self,
        cutoff: DateTime<Utc>,
    ) -> Result<Vec<AttachmentMetadata>, ApplicationError> {
        let collections = self.collections.read().await;
        Ok(collections
            .attachments
            .values()
            .filter(|m| m.status == AttachmentStatus::Uploading && m.uploaded_at <= cutoff)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::attachment::Category;

    fn new_attachment(name: &str, category: Category) -> NewAttachmentDTO {
        NewAttachmentDTO {
            file_name: name.to_string(),
            file_type: "application/pdf".to_string(),
            file_size: 10,
            category,
            custom_category: None,
            uploaded_by: "u-1".to_string(),
            uploaded_by_email: "u1@example.com".to_string(),
            description: None,
            total_chunks: 1,
        }
    }

    #[tokio::test]
    async fn fragments_of_other_attachments_are_untouched() {
        let repository = MemoryAttachmentRepository::new();
        let a = repository
            .create_metadata(new_attachment("a.pdf", Category::Ptw))
            .await
            .unwrap();
        let b = repository
            .create_metadata(new_attachment("b.pdf", Category::Ptw))
            .await
            .unwrap();
        for id in [a.id, b.id] {
            repository
                .insert_chunks(
                    id,
                    &[AttachmentChunk {
                        attachment_id: id,
                        index: 0,
                        data: "payload".to_string(),
                    }],
                )
                .await
                .unwrap();
        }

        repository.delete_attachment(a.id).await.unwrap();

        assert_eq!(repository.chunk_count(a.id).await, 0);
        assert_eq!(repository.chunk_count(b.id).await, 1);
    }

    #[tokio::test]
    async fn fragments_for_unknown_attachment_are_rejected() {
        let repository = MemoryAttachmentRepository::new();
        let id = Uuid::new_v4();
        let err = repository
            .insert_chunks(
                id,
                &[AttachmentChunk {
                    attachment_id: id,
                    index: 0,
                    data: "x".to_string(),
                }],
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::NotFound));
    }

    #[tokio::test]
    async fn listing_filters_by_category_search_and_status() {
        let repository = MemoryAttachmentRepository::new();
        let daily = repository
            .create_metadata(new_attachment("Genset Daily.pdf", Category::LaporanHarian))
            .await
            .unwrap();
        repository.mark_completed(daily.id).await.unwrap();
        repository
            .create_metadata(new_attachment("genset-monthly.pdf", Category::LaporanBulanan))
            .await
            .unwrap();

        let by_search = repository
            .list_metadata(&AttachmentFilterDTO {
                search: Some("GENSET".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(by_search.len(), 2);
        assert!(by_search[0].uploaded_at >= by_search[1].uploaded_at);

        let by_category = repository
            .list_metadata(&AttachmentFilterDTO {
                category: Some("Laporan Bulanan".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(by_category.len(), 1);
        assert_eq!(by_category[0].file_name, "genset-monthly.pdf");

        let completed = repository
            .list_metadata(&AttachmentFilterDTO::completed())
            .await
            .unwrap();
        assert_eq!(completed.len(), 1);
        assert_eq!(completed[0].id, daily.id);
    }

    #[tokio::test]
    async fn stale_delete_skips_completed_and_recent_records() {
        let repository = MemoryAttachmentRepository::new();
        let done = repository
            .create_metadata(new_attachment("done.pdf", Category::Jse))
            .await
            .unwrap();
        repository.mark_completed(done.id).await.unwrap();
        let pending = repository
            .create_metadata(new_attachment("pending.pdf", Category::Jse))
            .await
            .unwrap();

        let past = pending.uploaded_at - chrono::Duration::seconds(1);
        assert!(repository.delete_stale_upload(pending.id, past).await.unwrap().is_none());

        let now = Utc::now();
        assert!(repository.delete_stale_upload(done.id, now).await.unwrap().is_none());
        assert!(repository.get_metadata(done.id).await.is_ok());

        let (removed, _) = repository
            .delete_stale_upload(pending.id, now)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(removed.id, pending.id);
        assert!(repository.delete_stale_upload(pending.id, now).await.unwrap().is_none());
    }
}
