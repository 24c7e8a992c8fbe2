use async_trait::async_trait;

use crate::{
    application::{dto::report_dto::NewCorrectiveReportDTO, error::ApplicationError},
    domain::models::{
        report::{CorrectiveReport, ReportId},
        user::User,
    },
};

#[async_trait]
pub trait CorrectiveReportRepository: Send + Sync {
    async fn create_report(
        &self,
        report: NewCorrectiveReportDTO,
        reporter: &User,
    ) -> Result<CorrectiveReport, ApplicationError>;

    async fn get_report(&self, id: ReportId) -> Result<CorrectiveReport, ApplicationError>;

    /// Every report, newest first.
    async fn list_reports(&self) -> Result<Vec<CorrectiveReport>, ApplicationError>;

    async fn delete_report(&self, id: ReportId) -> Result<CorrectiveReport, ApplicationError>;
}
