use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    application::{
        dto::report_dto::{NewReportDocumentDTO, ReportFilterDTO},
        error::ApplicationError,
        repositories::report_document_repository::ReportDocumentRepository,
    },
    domain::models::report::{ReportDocument, ReportId, ReportPhoto},
};

#[derive(Default)]
struct Collections {
    /// Insertion order, oldest first.
    documents: Vec<ReportDocument>,
    photos: BTreeMap<(ReportId, u32), ReportPhoto>,
}

#[derive(Default)]
pub struct MemoryReportDocumentRepository {
    collections: RwLock<Collections>,
}

impl MemoryReportDocumentRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ReportDocumentRepository for MemoryReportDocumentRepository {
    async fn create_document(
        &self,
        document: NewReportDocumentDTO,
        created_by: &str,
    ) -> Result<ReportDocument, ApplicationError> {
        let id = Uuid::new_v4();
        let photos_with_image = document.photos.len() as u32;
        let stored = ReportDocument {
            id,
            document_type: document.document_type,
            file_name: document.file_name,
            maintenance_name: document.maintenance_name,
            maintenance_time: document.maintenance_time,
            specific_detail: document.specific_detail,
            created_at: Utc::now(),
            created_by: created_by.to_string(),
            file_size: document.file_size,
            total_photos: document.total_photos.max(photos_with_image),
            photos_with_image,
        };

        let mut collections = self.collections.write().await;
        for photo in document.photos {
            collections.photos.insert(
                (id, photo.index),
                ReportPhoto {
                    document_id: id,
                    index: photo.index,
                    photo_base64: photo.photo_base64,
                    description: photo.description,
                },
            );
        }
        collections.documents.push(stored.clone());
        Ok(stored)
    }

    async fn get_document(&self, id: ReportId) -> Result<ReportDocument, ApplicationError> {
        self.collections
            .read()
            .await
            .documents
            .iter()
            .find(|d| d.id == id)
            .cloned()
            .ok_or(ApplicationError::NotFound)
    }

    async fn list_photos(&self, id: ReportId) -> Result<Vec<ReportPhoto>, ApplicationError> {
        let collections = self.collections.read().await;
        if !collections.documents.iter().any(|d| d.id == id) {
            return Err(ApplicationError::NotFound);
        }
        Ok(collections
            .photos
            .range((id, 0)..=(id, u32::MAX))
            .map(|(_, photo)| photo.clone())
            .collect())
    }

    async fn list_documents(
        &self,
        filter: &ReportFilterDTO,
    ) -> Result<Vec<ReportDocument>, ApplicationError> {
        let mut documents: Vec<ReportDocument> = self
            .collections
            .read()
            .await
            .documents
            .iter()
            .rev()
            .filter(|d| filter.matches(d))
            .cloned()
            .collect();
        documents.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(documents)
    }

    async fn delete_document(
        &self,
        id: ReportId,
    ) -> Result<(ReportDocument, u64), ApplicationError> {
        let mut collections = self.collections.write().await;
        let position = collections
            .documents
            .iter()
            .position(|d| d.id == id)
            .ok_or(ApplicationError::NotFound)?;
        let document = collections.documents.remove(position);
        let keys: Vec<(ReportId, u32)> = collections
            .photos
            .range((id, 0)..=(id, u32::MAX))
            .map(|(key, _)| *key)
            .collect();
        for key in &keys {
            collections.photos.remove(key);
        }
        Ok((document, keys.len() as u64))
    }
}
