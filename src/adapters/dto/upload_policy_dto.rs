use sqlx::{postgres::PgRow, FromRow, Row};

use crate::application::dto::upload_policy_dto::UploadPolicyDTO;

impl FromRow<'_, PgRow> for UploadPolicyDTO {
    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        let mime_types: Vec<String> = row.try_get("mime_types")?;
        let max_size: i64 = row.try_get("max_size")?;
        let chunk_size: i64 = row.try_get("chunk_size")?;
        let batch_size: i32 = row.try_get("batch_size")?;

        Ok(UploadPolicyDTO {
            mime_types: Some(mime_types),
            max_size: Some(max_size.max(0) as u64),
            chunk_size: Some(chunk_size.max(0) as u64),
            batch_size: Some(batch_size.max(0) as u32),
        })
    }
}
