use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{query, query_as, QueryBuilder};
use uuid::Uuid;

use crate::{
    application::{
        dto::attachment_dto::{AttachmentDTO, AttachmentFilterDTO, NewAttachmentDTO},
        error::ApplicationError,
        repositories::attachment_repository::AttachmentRepository,
    },
    domain::models::attachment::{
        AttachmentChunk, AttachmentId, AttachmentMetadata, AttachmentSnapshot, AttachmentStatus,
    },
};

pub struct PgAttachmentRepository {
    pool: sqlx::PgPool,
}

impl PgAttachmentRepository {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

pub(super) fn db_error(e: sqlx::Error) -> ApplicationError {
    match e {
        sqlx::Error::RowNotFound => ApplicationError::NotFound,
        other => ApplicationError::DatabaseError(other.to_string()),
    }
}

pub(super) fn escape_like(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

#[async_trait]
impl AttachmentRepository for PgAttachmentRepository {
    async fn create_metadata(
        &self,
        attachment: NewAttachmentDTO,
    ) -> Result<AttachmentMetadata, ApplicationError> {
        let query = r#"
            INSERT INTO application.attachments (
                id, file_name, file_type, file_size, category, custom_category,
                uploaded_by, uploaded_by_email, uploaded_at, description,
                total_chunks, status
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, NOW(), $9, $10, $11)
            RETURNING *
        "#;

        let created: AttachmentDTO = query_as::<_, AttachmentDTO>(query)
            .bind(Uuid::new_v4())
            .bind(&attachment.file_name)
            .bind(&attachment.file_type)
            .bind(std::cmp::min(attachment.file_size, i64::MAX as u64) as i64)
            .bind(attachment.category.label())
            .bind(&attachment.custom_category)
            .bind(&attachment.uploaded_by)
            .bind(&attachment.uploaded_by_email)
            .bind(&attachment.description)
            .bind(attachment.total_chunks as i32)
            .bind(AttachmentStatus::Uploading.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(db_error)?;

        created.try_into()
    }

    async fn insert_chunks(
        &self,
        id: AttachmentId,
        chunks: &[AttachmentChunk],
    ) -> Result<(), ApplicationError> {
        if chunks.is_empty() {
            return Ok(());
        }

        // One multi-row statement: the batch commits or fails as a unit.
        let mut builder: QueryBuilder<sqlx::Postgres> = QueryBuilder::new(
            "INSERT INTO application.attachment_chunks (attachment_id, chunk_index, data) ",
        );
        builder.push_values(chunks, |mut row, chunk| {
            row.push_bind(id)
                .push_bind(chunk.index as i32)
                .push_bind(&chunk.data);
        });
        builder.push(
            " ON CONFLICT (attachment_id, chunk_index) DO UPDATE SET data = EXCLUDED.data",
        );

        builder
            .build()
            .execute(&self.pool)
            .await
            .map_err(db_error)?;

        Ok(())
    }

    async fn mark_completed(
        &self,
        id: AttachmentId,
    ) -> Result<AttachmentMetadata, ApplicationError> {
        let query = "UPDATE application.attachments SET status = $1 WHERE id = $2 RETURNING *";

        let updated: AttachmentDTO = query_as::<_, AttachmentDTO>(query)
            .bind(AttachmentStatus::Completed.as_str())
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(db_error)?;

        updated.try_into()
    }

    async fn get_metadata(&self, id: AttachmentId) -> Result<AttachmentMetadata, ApplicationError> {
        let query = "SELECT * FROM application.attachments WHERE id = $1";

        let fetched: AttachmentDTO = query_as::<_, AttachmentDTO>(query)
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(db_error)?;

        fetched.try_into()
    }

    async fn list_metadata(
        &self,
        filter: &AttachmentFilterDTO,
    ) -> Result<Vec<AttachmentMetadata>, ApplicationError> {
        let mut builder: QueryBuilder<sqlx::Postgres> =
            QueryBuilder::new("SELECT * FROM application.attachments WHERE TRUE");

        if let Some(status) = filter.status {
            builder.push(" AND status = ");
            builder.push_bind(status.as_str());
        }
        if let Some(category) = &filter.category {
            builder.push(" AND category = ");
            builder.push_bind(category);
        }
        if let Some(search) = &filter.search {
            builder.push(" AND file_name ILIKE ");
            builder.push_bind(format!("%{}%", escape_like(search)));
        }
        builder.push(" ORDER BY uploaded_at DESC");

        let rows: Vec<AttachmentDTO> = builder
            .build_query_as::<AttachmentDTO>()
            .fetch_all(&self.pool)
            .await
            .map_err(db_error)?;

        rows.into_iter().map(AttachmentMetadata::try_from).collect()
    }

    async fn load_snapshot(
        &self,
        id: AttachmentId,
    ) -> Result<AttachmentSnapshot, ApplicationError> {
        let mut tx = self.pool.begin().await.map_err(db_error)?;

        // Both reads see the same snapshot, so a concurrent delete is either
        // wholly visible or not at all.
        query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
            .execute(&mut *tx)
            .await
            .map_err(db_error)?;

        let metadata: AttachmentDTO =
            query_as::<_, AttachmentDTO>("SELECT * FROM application.attachments WHERE id = $1")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await
                .map_err(db_error)?
                .ok_or(ApplicationError::NotFound)?;

        let rows: Vec<(i32, String)> = query_as(
            r#"
            SELECT chunk_index, data FROM application.attachment_chunks
            WHERE attachment_id = $1
            ORDER BY chunk_index ASC
            "#,
        )
        .bind(id)
        .fetch_all(&mut *tx)
        .await
        .map_err(db_error)?;

        tx.commit().await.map_err(db_error)?;

        let chunks = rows
            .into_iter()
            .map(|(index, data)| AttachmentChunk {
                attachment_id: id,
                index: index.max(0) as u32,
                data,
            })
            .collect();

        Ok(AttachmentSnapshot {
            metadata: metadata.try_into()?,
            chunks,
        })
    }

    async fn delete_attachment(
        &self,
        id: AttachmentId,
    ) -> Result<(AttachmentMetadata, u64), ApplicationError> {
        let mut tx = self.pool.begin().await.map_err(db_error)?;

        let removed = query("DELETE FROM application.attachment_chunks WHERE attachment_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(db_error)?
            .rows_affected();

        let deleted: Option<AttachmentDTO> = query_as::<_, AttachmentDTO>(
            "DELETE FROM application.attachments WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(db_error)?;

        let Some(deleted) = deleted else {
            tx.rollback().await.map_err(db_error)?;
            return Err(ApplicationError::NotFound);
        };

        tx.commit().await.map_err(db_error)?;
        Ok((deleted.try_into()?, removed))
    }

    async fn delete_stale_upload(
        &self,
        id: AttachmentId,
        cutoff: DateTime<Utc>,
    ) -> Result<Option<(AttachmentMetadata, u64)>, ApplicationError> {
        let mut tx = self.pool.begin().await.map_err(db_error)?;

        // Row lock: a concurrent mark_completed either commits first and the
        // record no longer matches, or waits until this delete has committed.
        let locked: Option<(Uuid,)> = query_as(
            r#"
            SELECT id FROM application.attachments
            WHERE id = $1 AND status = $2 AND uploaded_at <= $3
            FOR UPDATE
            "#,
        )
        .bind(id)
        .bind(AttachmentStatus::Uploading.as_str())
        .bind(cutoff)
        .fetch_optional(&mut *tx)
        .await
        .map_err(db_error)?;

        if locked.is_none() {
            tx.rollback().await.map_err(db_error)?;
            return Ok(None);
        }

        let removed = query("DELETE FROM application.attachment_chunks WHERE attachment_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(db_error)?
            .rows_affected();

        let deleted: Option<AttachmentDTO> = query_as::<_, AttachmentDTO>(
            r#"
            DELETE FROM application.attachments
            WHERE id = $1 AND status = $2 AND uploaded_at <= $3
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(AttachmentStatus::Uploading.as_str())
        .bind(cutoff)
        .fetch_optional(&mut *tx)
        .await
        .map_err(db_error)?;

        let Some(deleted) = deleted else {
            tx.rollback().await.map_err(db_error)?;
            return Ok(None);
        };

        tx.commit().await.map_err(db_error)?;
        Ok(Some((deleted.try_into()?, removed)))
    }

    async fn list_stale_uploads(
        &self,
        cutoff: DateTime<Utc>,
    ) -> Result<Vec<AttachmentMetadata>, ApplicationError> {
        let query = r#"
            SELECT * FROM application.attachments
            WHERE status = $1 AND uploaded_at <= $2
            ORDER BY uploaded_at ASC
        "#;

        let rows: Vec<AttachmentDTO> = query_as::<_, AttachmentDTO>(query)
            .bind(AttachmentStatus::Uploading.as_str())
            .bind(cutoff)
            .fetch_all(&self.pool)
            .await
            .map_err(db_error)?;

        rows.into_iter().map(AttachmentMetadata::try_from).collect()
    }
}
