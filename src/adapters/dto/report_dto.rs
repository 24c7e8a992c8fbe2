use sqlx::{postgres::PgRow, FromRow, Row};

use crate::application::dto::report_dto::{
    CorrectiveReportDTO, ReportDocumentDTO, ReportPhotoDTO,
};

impl FromRow<'_, PgRow> for ReportDocumentDTO {
    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        Ok(ReportDocumentDTO {
            id: row.try_get("id")?,
            document_type: row.try_get("document_type")?,
            file_name: row.try_get("file_name")?,
            maintenance_name: row.try_get("maintenance_name")?,
            maintenance_time: row.try_get("maintenance_time")?,
            specific_detail: row.try_get("specific_detail")?,
            created_at: row.try_get("created_at")?,
            created_by: row.try_get("created_by")?,
            file_size: row.try_get("file_size")?,
            total_photos: row.try_get("total_photos")?,
            photos_with_image: row.try_get("photos_with_image")?,
        })
    }
}

impl FromRow<'_, PgRow> for ReportPhotoDTO {
    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        Ok(ReportPhotoDTO {
            document_id: row.try_get("document_id")?,
            photo_index: row.try_get("photo_index")?,
            photo_base64: row.try_get("photo_base64")?,
            description: row.try_get("description")?,
        })
    }
}

impl FromRow<'_, PgRow> for CorrectiveReportDTO {
    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        Ok(CorrectiveReportDTO {
            id: row.try_get("id")?,
            issue: row.try_get("issue")?,
            action_taken: row.try_get("action_taken")?,
            spare_parts: row.try_get("spare_parts")?,
            status: row.try_get("status")?,
            location: row.try_get("location")?,
            photo_base64: row.try_get("photo_base64")?,
            photo_description: row.try_get("photo_description")?,
            reported_by: row.try_get("reported_by")?,
            reported_by_email: row.try_get("reported_by_email")?,
            reported_at: row.try_get("reported_at")?,
        })
    }
}
