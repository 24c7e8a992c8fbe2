use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    application::error::ApplicationError,
    domain::models::report::{
        CorrectiveReport, CorrectiveStatus, DocumentType, ReportDocument, ReportPhoto,
    },
};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewReportPhotoDTO {
    pub index: u32,
    pub photo_base64: String,
    #[serde(default)]
    pub description: String,
}

/// A report document as submitted; the store assigns `id`, `created_at`
/// and `created_by`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewReportDocumentDTO {
    #[serde(rename = "type")]
    pub document_type: DocumentType,
    pub file_name: String,
    pub maintenance_name: String,
    pub maintenance_time: String,
    pub specific_detail: Option<String>,
    #[serde(default)]
    pub file_size: u64,
    #[serde(default)]
    pub total_photos: u32,
    #[serde(default)]
    pub photos: Vec<NewReportPhotoDTO>,
}

#[derive(Debug, Clone, Default)]
pub struct ReportFilterDTO {
    /// Creator email, case-insensitive.
    pub created_by: Option<String>,
    pub document_type: Option<DocumentType>,
    /// Date part of `maintenance_time`.
    pub maintenance_date: Option<NaiveDate>,
    /// Inclusive lower bound on `created_at`.
    pub created_from: Option<DateTime<Utc>>,
    /// Exclusive upper bound on `created_at`.
    pub created_before: Option<DateTime<Utc>>,
    /// Case-insensitive substring of the file name, maintenance name or creator.
    pub search: Option<String>,
}

impl ReportFilterDTO {
    pub fn matches(&self, document: &ReportDocument) -> bool {
        if let Some(email) = &self.created_by {
            if !document.is_created_by(email) {
                return false;
            }
        }
        if let Some(document_type) = self.document_type {
            if document.document_type != document_type {
                return false;
            }
        }
        if let Some(date) = self.maintenance_date {
            if document.maintenance_date() != Some(date) {
                return false;
            }
        }
        if let Some(from) = self.created_from {
            if document.created_at < from {
                return false;
            }
        }
        if let Some(before) = self.created_before {
            if document.created_at >= before {
                return false;
            }
        }
        if let Some(search) = &self.search {
            let needle = search.to_lowercase();
            let found = [
                &document.file_name,
                &document.maintenance_name,
                &document.created_by,
            ]
            .iter()
            .any(|field| field.to_lowercase().contains(&needle));
            if !found {
                return false;
            }
        }
        true
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCorrectiveReportDTO {
    pub issue: String,
    pub action_taken: String,
    pub spare_parts: Option<String>,
    #[serde(default)]
    pub status: CorrectiveStatus,
    pub location: String,
    pub photo_base64: String,
    pub photo_description: Option<String>,
}

/// Row-shaped view of a report document as persisted.
#[derive(Debug, Clone)]
pub struct ReportDocumentDTO {
    pub id: Uuid,
    pub document_type: String,
    pub file_name: String,
    pub maintenance_name: String,
    pub maintenance_time: String,
    pub specific_detail: Option<String>,
    pub created_at: DateTime<Utc>,
    pub created_by: String,
    pub file_size: i64,
    pub total_photos: i32,
    pub photos_with_image: i32,
}

impl TryFrom<ReportDocumentDTO> for ReportDocument {
    type Error = ApplicationError;

    fn try_from(value: ReportDocumentDTO) -> Result<Self, Self::Error> {
        let document_type = value
            .document_type
            .parse::<DocumentType>()
            .map_err(ApplicationError::DatabaseError)?;

        Ok(ReportDocument {
            id: value.id,
            document_type,
            file_name: value.file_name,
            maintenance_name: value.maintenance_name,
            maintenance_time: value.maintenance_time,
            specific_detail: value.specific_detail,
            created_at: value.created_at,
            created_by: value.created_by,
            file_size: value.file_size.max(0) as u64,
            total_photos: value.total_photos.max(0) as u32,
            photos_with_image: value.photos_with_image.max(0) as u32,
        })
    }
}

#[derive(Debug, Clone)]
pub struct ReportPhotoDTO {
    pub document_id: Uuid,
    pub photo_index: i32,
    pub photo_base64: String,
    pub description: String,
}

impl From<ReportPhotoDTO> for ReportPhoto {
    fn from(value: ReportPhotoDTO) -> Self {
        ReportPhoto {
            document_id: value.document_id,
            index: value.photo_index.max(0) as u32,
            photo_base64: value.photo_base64,
            description: value.description,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CorrectiveReportDTO {
    pub id: Uuid,
    pub issue: String,
    pub action_taken: String,
    pub spare_parts: Option<String>,
    pub status: String,
    pub location: String,
    pub photo_base64: String,
    pub photo_description: Option<String>,
    pub reported_by: String,
    pub reported_by_email: String,
    pub reported_at: DateTime<Utc>,
}

impl TryFrom<CorrectiveReportDTO> for CorrectiveReport {
    type Error = ApplicationError;

    fn try_from(value: CorrectiveReportDTO) -> Result<Self, Self::Error> {
        let status = value
            .status
            .parse::<CorrectiveStatus>()
            .map_err(ApplicationError::DatabaseError)?;

        Ok(CorrectiveReport {
            id: value.id,
            issue: value.issue,
            action_taken: value.action_taken,
            spare_parts: value.spare_parts,
            status,
            location: value.location,
            photo_base64: value.photo_base64,
            photo_description: value.photo_description,
            reported_by: value.reported_by,
            reported_by_email: value.reported_by_email,
            reported_at: value.reported_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn document() -> ReportDocument {
        ReportDocument {
            id: Uuid::new_v4(),
            document_type: DocumentType::Pdf,
            file_name: "Genset_Check.pdf".to_string(),
            maintenance_name: "Genset check".to_string(),
            maintenance_time: "2024-03-05T14:30".to_string(),
            specific_detail: None,
            created_at: Utc.with_ymd_and_hms(2024, 3, 5, 15, 0, 0).unwrap(),
            created_by: "Eng@Example.com".to_string(),
            file_size: 1024,
            total_photos: 2,
            photos_with_image: 2,
        }
    }

    #[test]
    fn empty_filter_matches_everything() {
        assert!(ReportFilterDTO::default().matches(&document()));
    }

    #[test]
    fn creator_and_search_ignore_case() {
        let filter = ReportFilterDTO {
            created_by: Some("eng@example.com".to_string()),
            search: Some("GENSET".to_string()),
            ..Default::default()
        };
        assert!(filter.matches(&document()));

        let other = ReportFilterDTO {
            created_by: Some("someone@example.com".to_string()),
            ..Default::default()
        };
        assert!(!other.matches(&document()));
    }

    #[test]
    fn type_and_dates_narrow_the_match() {
        let excel = ReportFilterDTO {
            document_type: Some(DocumentType::Excel),
            ..Default::default()
        };
        assert!(!excel.matches(&document()));

        let same_day = ReportFilterDTO {
            maintenance_date: NaiveDate::from_ymd_opt(2024, 3, 5),
            ..Default::default()
        };
        assert!(same_day.matches(&document()));

        let created_after = ReportFilterDTO {
            created_from: Some(Utc.with_ymd_and_hms(2024, 3, 6, 0, 0, 0).unwrap()),
            ..Default::default()
        };
        assert!(!created_after.matches(&document()));

        let created_before = ReportFilterDTO {
            created_before: Some(Utc.with_ymd_and_hms(2024, 3, 5, 15, 0, 0).unwrap()),
            ..Default::default()
        };
        assert!(!created_before.matches(&document()));
    }
}
