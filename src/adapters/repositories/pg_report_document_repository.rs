use async_trait::async_trait;
use sqlx::{query, query_as, QueryBuilder};
use uuid::Uuid;

use super::pg_attachment_repository::{db_error, escape_like};
use crate::{
    application::{
        dto::report_dto::{NewReportDocumentDTO, ReportDocumentDTO, ReportFilterDTO, ReportPhotoDTO},
        error::ApplicationError,
        repositories::report_document_repository::ReportDocumentRepository,
    },
    domain::models::report::{ReportDocument, ReportId, ReportPhoto},
};

pub struct PgReportDocumentRepository {
    pool: sqlx::PgPool,
}

impl PgReportDocumentRepository {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReportDocumentRepository for PgReportDocumentRepository {
    async fn create_document(
        &self,
        document: NewReportDocumentDTO,
        created_by: &str,
    ) -> Result<ReportDocument, ApplicationError> {
        let id = Uuid::new_v4();
        let photos_with_image = document.photos.len() as i32;
        let mut tx = self.pool.begin().await.map_err(db_error)?;

        let query = r#"
            INSERT INTO application.report_documents (
                id, document_type, file_name, maintenance_name, maintenance_time,
                specific_detail, created_at, created_by, file_size, total_photos,
                photos_with_image
            )
            VALUES ($1, $2, $3, $4, $5, $6, NOW(), $7, $8, $9, $10)
            RETURNING *
        "#;

        let created: ReportDocumentDTO = query_as::<_, ReportDocumentDTO>(query)
            .bind(id)
            .bind(document.document_type.as_str())
            .bind(&document.file_name)
            .bind(&document.maintenance_name)
            .bind(&document.maintenance_time)
            .bind(&document.specific_detail)
            .bind(created_by)
            .bind(std::cmp::min(document.file_size, i64::MAX as u64) as i64)
            .bind((document.total_photos as i32).max(photos_with_image))
            .bind(photos_with_image)
            .fetch_one(&mut *tx)
            .await
            .map_err(db_error)?;

        if !document.photos.is_empty() {
            let mut builder: QueryBuilder<sqlx::Postgres> = QueryBuilder::new(
                "INSERT INTO application.report_photos (document_id, photo_index, photo_base64, description) ",
            );
            builder.push_values(&document.photos, |mut row, photo| {
                row.push_bind(id)
                    .push_bind(photo.index as i32)
                    .push_bind(&photo.photo_base64)
                    .push_bind(&photo.description);
            });
            builder
                .build()
                .execute(&mut *tx)
                .await
                .map_err(db_error)?;
        }

        tx.commit().await.map_err(db_error)?;
        created.try_into()
    }

    async fn get_document(&self, id: ReportId) -> Result<ReportDocument, ApplicationError> {
        let fetched: ReportDocumentDTO = query_as::<_, ReportDocumentDTO>(
            "SELECT * FROM application.report_documents WHERE id = $1",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error)?;

        fetched.try_into()
    }

    async fn list_photos(&self, id: ReportId) -> Result<Vec<ReportPhoto>, ApplicationError> {
        let mut tx = self.pool.begin().await.map_err(db_error)?;
        query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
            .execute(&mut *tx)
            .await
            .map_err(db_error)?;

        let exists: Option<(Uuid,)> =
            query_as("SELECT id FROM application.report_documents WHERE id = $1")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await
                .map_err(db_error)?;
        if exists.is_none() {
            tx.rollback().await.map_err(db_error)?;
            return Err(ApplicationError::NotFound);
        }

        let rows: Vec<ReportPhotoDTO> = query_as::<_, ReportPhotoDTO>(
            r#"
            SELECT * FROM application.report_photos
            WHERE document_id = $1
            ORDER BY photo_index ASC
            "#,
        )
        .bind(id)
        .fetch_all(&mut *tx)
        .await
        .map_err(db_error)?;

        tx.commit().await.map_err(db_error)?;
        Ok(rows.into_iter().map(ReportPhoto::from).collect())
    }

    async fn list_documents(
        &self,
        filter: &ReportFilterDTO,
    ) -> Result<Vec<ReportDocument>, ApplicationError> {
        let mut builder: QueryBuilder<sqlx::Postgres> =
            QueryBuilder::new("SELECT * FROM application.report_documents WHERE TRUE");

        if let Some(email) = &filter.created_by {
            builder.push(" AND LOWER(created_by) = LOWER(");
            builder.push_bind(email);
            builder.push(")");
        }
        if let Some(document_type) = filter.document_type {
            builder.push(" AND document_type = ");
            builder.push_bind(document_type.as_str());
        }
        if let Some(date) = filter.maintenance_date {
            builder.push(" AND LEFT(maintenance_time, 10) = ");
            builder.push_bind(date.format("%Y-%m-%d").to_string());
        }
        if let Some(from) = filter.created_from {
            builder.push(" AND created_at >= ");
            builder.push_bind(from);
        }
        if let Some(before) = filter.created_before {
            builder.push(" AND created_at < ");
            builder.push_bind(before);
        }
        if let Some(search) = &filter.search {
            let pattern = format!("%{}%", escape_like(search));
            builder.push(" AND (file_name ILIKE ");
            builder.push_bind(pattern.clone());
            builder.push(" OR maintenance_name ILIKE ");
            builder.push_bind(pattern.clone());
            builder.push(" OR created_by ILIKE ");
            builder.push_bind(pattern);
            builder.push(")");
        }
        builder.push(" ORDER BY created_at DESC");

        let rows: Vec<ReportDocumentDTO> = builder
            .build_query_as::<ReportDocumentDTO>()
            .fetch_all(&self.pool)
            .await
            .map_err(db_error)?;

        rows.into_iter().map(ReportDocument::try_from).collect()
    }

    async fn delete_document(
        &self,
        id: ReportId,
    ) -> Result<(ReportDocument, u64), ApplicationError> {
        let mut tx = self.pool.begin().await.map_err(db_error)?;

        let removed = query("DELETE FROM application.report_photos WHERE document_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(db_error)?
            .rows_affected();

        let deleted: Option<ReportDocumentDTO> = query_as::<_, ReportDocumentDTO>(
            "DELETE FROM application.report_documents WHERE id = $1 RETURNING *",
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
}
