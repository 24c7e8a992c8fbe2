use sqlx::{postgres::PgRow, FromRow, Row};

use crate::application::dto::attachment_dto::AttachmentDTO;

impl FromRow<'_, PgRow> for AttachmentDTO {
    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        Ok(AttachmentDTO {
            id: row.try_get("id")?,
            file_name: row.try_get("file_name")?,
            file_type: row.try_get("file_type")?,
            file_size: row.try_get("file_size")?,
            category: row.try_get("category")?,
            custom_category: row.try_get("custom_category")?,
            uploaded_by: row.try_get("uploaded_by")?,
            uploaded_by_email: row.try_get("uploaded_by_email")?,
            uploaded_at: row.try_get("uploaded_at")?,
            description: row.try_get("description")?,
            total_chunks: row.try_get("total_chunks")?,
            status: row.try_get("status")?,
        })
    }
}
