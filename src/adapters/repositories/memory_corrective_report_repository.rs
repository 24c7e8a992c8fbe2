use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    application::{
        dto::report_dto::NewCorrectiveReportDTO, error::ApplicationError,
        repositories::corrective_report_repository::CorrectiveReportRepository,
    },
    domain::models::{
        report::{CorrectiveReport, ReportId},
        user::User,
    },
};

#[derive(Default)]
pub struct MemoryCorrectiveReportRepository {
    /// Insertion order, oldest first.
    reports: RwLock<Vec<CorrectiveReport>>,
}

impl MemoryCorrectiveReportRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CorrectiveReportRepository for MemoryCorrectiveReportRepository {
    async fn create_report(
        &self,
        report: NewCorrectiveReportDTO,
        reporter: &User,
    ) -> Result<CorrectiveReport, ApplicationError> {
        let stored = CorrectiveReport {
            id: Uuid::new_v4(),
            issue: report.issue,
            action_taken: report.action_taken,
            spare_parts: report.spare_parts,
            status: report.status,
            location: report.location,
            photo_base64: report.photo_base64,
            photo_description: report.photo_description,
            reported_by: reporter.uid.clone(),
            reported_by_email: reporter.email.clone(),
            reported_at: Utc::now(),
        };
        self.reports.write().await.push(stored.clone());
        Ok(stored)
    }

    async fn get_report(&self, id: ReportId) -> Result<CorrectiveReport, ApplicationError> {
        self.reports
            .read()
            .await
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or(ApplicationError::NotFound)
    }

    async fn list_reports(&self) -> Result<Vec<CorrectiveReport>, ApplicationError> {
        let mut reports: Vec<CorrectiveReport> =
            self.reports.read().await.iter().rev().cloned().collect();
        reports.sort_by(|a, b| b.reported_at.cmp(&a.reported_at));
        Ok(reports)
    }

    async fn delete_report(&self, id: ReportId) -> Result<CorrectiveReport, ApplicationError> {
        let mut reports = self.reports.write().await;
        let position = reports
            .iter()
            .position(|r| r.id == id)
            .ok_or(ApplicationError::NotFound)?;
        Ok(reports.remove(position))
    }
}
