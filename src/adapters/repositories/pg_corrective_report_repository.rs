use async_trait::async_trait;
use sqlx::query_as;
use uuid::Uuid;

use super::pg_attachment_repository::db_error;
use crate::{
    application::{
        dto::report_dto::{CorrectiveReportDTO, NewCorrectiveReportDTO},
        error::ApplicationError,
        repositories::corrective_report_repository::CorrectiveReportRepository,
    },
    domain::models::{
        report::{CorrectiveReport, ReportId},
        user::User,
    },
};

pub struct PgCorrectiveReportRepository {
    pool: sqlx::PgPool,
}

impl PgCorrectiveReportRepository {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CorrectiveReportRepository for PgCorrectiveReportRepository {
    async fn create_report(
        &self,
        report: NewCorrectiveReportDTO,
        reporter: &User,
    ) -> Result<CorrectiveReport, ApplicationError> {
        let query = r#"
            INSERT INTO application.corrective_reports (
                id, issue, action_taken, spare_parts, status, location,
                photo_base64, photo_description, reported_by, reported_by_email,
                reported_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, NOW())
            RETURNING *
        "#;

        let created: CorrectiveReportDTO = query_as::<_, CorrectiveReportDTO>(query)
            .bind(Uuid::new_v4())
            .bind(&report.issue)
            .bind(&report.action_taken)
            .bind(&report.spare_parts)
            .bind(report.status.as_str())
            .bind(&report.location)
            .bind(&report.photo_base64)
            .bind(&report.photo_description)
            .bind(&reporter.uid)
            .bind(&reporter.email)
            .fetch_one(&self.pool)
            .await
            .map_err(db_error)?;

        created.try_into()
    }

    async fn get_report(&self, id: ReportId) -> Result<CorrectiveReport, ApplicationError> {
        let fetched: CorrectiveReportDTO = query_as::<_, CorrectiveReportDTO>(
            "SELECT * FROM application.corrective_reports WHERE id = $1",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error)?;

        fetched.try_into()
    }

    async fn list_reports(&self) -> Result<Vec<CorrectiveReport>, ApplicationError> {
        let rows: Vec<CorrectiveReportDTO> = query_as::<_, CorrectiveReportDTO>(
            "SELECT * FROM application.corrective_reports ORDER BY reported_at DESC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;

        rows.into_iter().map(CorrectiveReport::try_from).collect()
    }

    async fn delete_report(&self, id: ReportId) -> Result<CorrectiveReport, ApplicationError> {
        let deleted: CorrectiveReportDTO = query_as::<_, CorrectiveReportDTO>(
            "DELETE FROM application.corrective_reports WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error)?;

        deleted.try_into()
    }
}
