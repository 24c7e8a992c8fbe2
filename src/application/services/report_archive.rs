use std::{collections::HashSet, sync::Arc};

use tracing::{info, warn};

use crate::{
    application::{
        dto::report_dto::{NewReportDocumentDTO, ReportFilterDTO},
        error::ApplicationError,
        repositories::report_document_repository::ReportDocumentRepository,
    },
    domain::{
        models::{
            report::{
                maintenance_date, ReportDocument, ReportDocumentDetail, ReportId,
                MAX_PHOTOS_PER_DOCUMENT, MAX_PHOTO_SIZE, MAX_REPORT_TEXT_LENGTH,
            },
            user::User,
        },
        payload::decode_data_url,
    },
};

pub(super) fn require_text(field: &str, value: &str) -> Result<(), ApplicationError> {
    if value.trim().is_empty() {
        return Err(ApplicationError::BadRequest(format!("{} is required", field)));
    }
    limit_text(field, value)
}

pub(super) fn limit_text(field: &str, value: &str) -> Result<(), ApplicationError> {
    if value.len() > MAX_REPORT_TEXT_LENGTH {
        return Err(ApplicationError::BadRequest(format!("{} is too long", field)));
    }
    Ok(())
}

/// Accepts an image data URL whose decoded size fits `MAX_PHOTO_SIZE`.
pub(super) fn validate_photo(field: &str, data_url: &str) -> Result<(), ApplicationError> {
    // Base64 grows by 4/3; reject before decoding anything far too large.
    if data_url.len() > MAX_PHOTO_SIZE / 3 * 4 + 1024 {
        return Err(ApplicationError::PayloadTooLarge);
    }
    let decoded = decode_data_url(data_url).map_err(|e| {
        warn!("Rejecting {}: {}", field, e);
        ApplicationError::BadRequest(format!("{} is not a valid data URL", field))
    })?;
    if !decoded
        .mime_type
        .as_deref()
        .is_some_and(|mime| mime.starts_with("image/"))
    {
        return Err(ApplicationError::UnsupportedMediaType(
            decoded.mime_type.unwrap_or_default(),
        ));
    }
    if decoded.bytes.is_empty() {
        return Err(ApplicationError::BadRequest(format!("{} is empty", field)));
    }
    if decoded.bytes.len() > MAX_PHOTO_SIZE {
        return Err(ApplicationError::PayloadTooLarge);
    }
    Ok(())
}

/// Metadata of generated Excel and PDF maintenance reports. Users see
/// their own documents; admins see everyone's.
#[derive(Clone)]
pub struct ReportArchive {
    repository: Arc<dyn ReportDocumentRepository>,
}

impl ReportArchive {
    pub fn new(repository: Arc<dyn ReportDocumentRepository>) -> Self {
        Self { repository }
    }

    pub fn validate(document: &NewReportDocumentDTO) -> Result<(), ApplicationError> {
        require_text("File name", &document.file_name)?;
        require_text("Maintenance name", &document.maintenance_name)?;
        if maintenance_date(&document.maintenance_time).is_none() {
            return Err(ApplicationError::BadRequest(
                "Maintenance time must start with a YYYY-MM-DD date".to_string(),
            ));
        }
        if let Some(detail) = &document.specific_detail {
            limit_text("Specific detail", detail)?;
        }
        if document.photos.len() > MAX_PHOTOS_PER_DOCUMENT {
            return Err(ApplicationError::BadRequest(format!(
                "At most {} photos per report",
                MAX_PHOTOS_PER_DOCUMENT
            )));
        }

        let mut indexes = HashSet::new();
        for photo in &document.photos {
            if photo.index == 0 || !indexes.insert(photo.index) {
                return Err(ApplicationError::BadRequest(format!(
                    "Photo index {} is invalid or repeated",
                    photo.index
                )));
            }
            limit_text("Photo description", &photo.description)?;
            validate_photo(&format!("Photo {}", photo.index), &photo.photo_base64)?;
        }
        Ok(())
    }

    pub async fn create(
        &self,
        document: NewReportDocumentDTO,
        creator: &User,
    ) -> Result<ReportDocument, ApplicationError> {
        Self::validate(&document)?;
        let photos = document.photos.len();
        let created = self
            .repository
            .create_document(document, &creator.email)
            .await?;
        info!(
            "User {} saved {} report {} ('{}') with {} photos",
            creator.uid, created.document_type, created.id, created.file_name, photos
        );
        Ok(created)
    }

    /// The caller's own documents; any `created_by` in `filter` is replaced.
    pub async fn list_own(
        &self,
        user: &User,
        mut filter: ReportFilterDTO,
    ) -> Result<Vec<ReportDocument>, ApplicationError> {
        filter.created_by = Some(user.email.clone());
        self.repository.list_documents(&filter).await
    }

    /// Documents of every creator. Admin only.
    pub async fn list_all(
        &self,
        user: &User,
        filter: &ReportFilterDTO,
    ) -> Result<Vec<ReportDocument>, ApplicationError> {
        if !user.is_admin() {
            return Err(ApplicationError::Forbidden);
        }
        self.repository.list_documents(filter).await
    }

    async fn get_visible(
        &self,
        user: &User,
        id: ReportId,
    ) -> Result<ReportDocument, ApplicationError> {
        let document = self.repository.get_document(id).await?;
        if !user.is_admin() && !document.is_created_by(&user.email) {
            return Err(ApplicationError::Forbidden);
        }
        Ok(document)
    }

    /// The document with its photos. Creator or admin only.
    pub async fn get(
        &self,
        user: &User,
        id: ReportId,
    ) -> Result<ReportDocumentDetail, ApplicationError> {
        let document = self.get_visible(user, id).await?;
        let photos = self.repository.list_photos(id).await?;
        Ok(ReportDocumentDetail { document, photos })
    }

    /// Removes the document and its photos. Creator or admin only.
    pub async fn delete(
        &self,
        user: &User,
        id: ReportId,
    ) -> Result<ReportDocument, ApplicationError> {
        self.get_visible(user, id).await?;
        let (document, photos) = self.repository.delete_document(id).await?;
        info!(
            "User {} deleted report {} ('{}') and {} photos",
            user.uid, id, document.file_name, photos
        );
        Ok(document)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::{
        adapters::repositories::MemoryReportDocumentRepository,
        application::dto::report_dto::NewReportPhotoDTO,
        domain::{
            models::{
                report::DocumentType,
                user::{CompanyType, Role},
            },
            payload::encode_data_url,
        },
    };

    fn user(uid: &str, email: &str, role: Role) -> User {
        User {
            uid: uid.to_string(),
            email: email.to_string(),
            role,
            company_type: CompanyType::Neutra,
            created_at: Utc::now(),
        }
    }

    fn engineer() -> User {
        user("eng-1", "eng@example.com", Role::Engineer)
    }

    fn colleague() -> User {
        user("eng-2", "colleague@example.com", Role::Engineer)
    }

    fn admin() -> User {
        user("admin-1", "admin@example.com", Role::Admin)
    }

    fn photo(index: u32) -> NewReportPhotoDTO {
        NewReportPhotoDTO {
            index,
            photo_base64: encode_data_url("image/jpeg", &[0xFF, 0xD8, 0xFF, index as u8]),
            description: format!("Panel {}", index),
        }
    }

    fn document(
        name: &str,
        document_type: DocumentType,
        photos: Vec<NewReportPhotoDTO>,
    ) -> NewReportDocumentDTO {
        NewReportDocumentDTO {
            document_type,
            file_name: format!("{}.pdf", name),
            maintenance_name: name.to_string(),
            maintenance_time: "2024-03-05T14:30".to_string(),
            specific_detail: Some("Rack B".to_string()),
            file_size: 2048,
            total_photos: photos.len() as u32,
            photos,
        }
    }

    fn archive() -> ReportArchive {
        ReportArchive::new(Arc::new(MemoryReportDocumentRepository::new()))
    }

    #[tokio::test]
    async fn document_is_saved_with_its_photos() {
        let archive = archive();
        let created = archive
            .create(
                document("Genset check", DocumentType::Pdf, vec![photo(2), photo(1)]),
                &engineer(),
            )
            .await
            .unwrap();

        assert_eq!(created.created_by, "eng@example.com");
        assert_eq!(created.photos_with_image, 2);

        let detail = archive.get(&engineer(), created.id).await.unwrap();
        let indexes: Vec<u32> = detail.photos.iter().map(|p| p.index).collect();
        assert_eq!(indexes, vec![1, 2]);
        assert_eq!(detail.photos[0].description, "Panel 1");
    }

    #[tokio::test]
    async fn invalid_documents_are_rejected() {
        let mut blank = document("Genset check", DocumentType::Pdf, vec![]);
        blank.maintenance_name = " ".to_string();
        assert!(matches!(
            ReportArchive::validate(&blank),
            Err(ApplicationError::BadRequest(_))
        ));

        let mut bad_time = document("Genset check", DocumentType::Pdf, vec![]);
        bad_time.maintenance_time = "yesterday".to_string();
        assert!(matches!(
            ReportArchive::validate(&bad_time),
            Err(ApplicationError::BadRequest(_))
        ));

        let repeated = document("Genset check", DocumentType::Pdf, vec![photo(1), photo(1)]);
        assert!(matches!(
            ReportArchive::validate(&repeated),
            Err(ApplicationError::BadRequest(_))
        ));

        let mut not_image = photo(1);
        not_image.photo_base64 = encode_data_url("application/pdf", b"%PDF");
        let not_image = document("Genset check", DocumentType::Pdf, vec![not_image]);
        assert!(matches!(
            ReportArchive::validate(&not_image),
            Err(ApplicationError::UnsupportedMediaType(_))
        ));

        let mut huge = photo(1);
        huge.photo_base64 = encode_data_url("image/png", &vec![0u8; MAX_PHOTO_SIZE + 1]);
        let huge = document("Genset check", DocumentType::Pdf, vec![huge]);
        assert!(matches!(
            ReportArchive::validate(&huge),
            Err(ApplicationError::PayloadTooLarge)
        ));
    }

    #[tokio::test]
    async fn users_only_list_their_own_documents() {
        let archive = archive();
        archive
            .create(document("Mine", DocumentType::Pdf, vec![]), &engineer())
            .await
            .unwrap();
        archive
            .create(document("Theirs", DocumentType::Excel, vec![]), &colleague())
            .await
            .unwrap();

        let sneaky = ReportFilterDTO {
            created_by: Some("colleague@example.com".to_string()),
            ..Default::default()
        };
        let own = archive.list_own(&engineer(), sneaky).await.unwrap();
        assert_eq!(own.len(), 1);
        assert_eq!(own[0].maintenance_name, "Mine");

        assert!(matches!(
            archive.list_all(&engineer(), &ReportFilterDTO::default()).await,
            Err(ApplicationError::Forbidden)
        ));

        let excel = ReportFilterDTO {
            document_type: Some(DocumentType::Excel),
            ..Default::default()
        };
        let all_excel = archive.list_all(&admin(), &excel).await.unwrap();
        assert_eq!(all_excel.len(), 1);
        assert_eq!(all_excel[0].created_by, "colleague@example.com");

        let everything = archive
            .list_all(&admin(), &ReportFilterDTO::default())
            .await
            .unwrap();
        assert_eq!(everything.len(), 2);
    }

    #[tokio::test]
    async fn only_creator_or_admin_reads_and_deletes() {
        let archive = archive();
        let created = archive
            .create(document("Mine", DocumentType::Pdf, vec![photo(1)]), &engineer())
            .await
            .unwrap();

        assert!(matches!(
            archive.get(&colleague(), created.id).await,
            Err(ApplicationError::Forbidden)
        ));
        assert!(matches!(
            archive.delete(&colleague(), created.id).await,
            Err(ApplicationError::Forbidden)
        ));
        assert!(archive.get(&admin(), created.id).await.is_ok());

        archive.delete(&engineer(), created.id).await.unwrap();
        assert!(matches!(
            archive.get(&admin(), created.id).await,
            Err(ApplicationError::NotFound)
        ));
    }
}
