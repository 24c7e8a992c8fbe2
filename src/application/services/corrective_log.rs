use std::sync::Arc;

use chrono::Utc;
use futures::{Stream, StreamExt};
use tracing::info;

use super::{
    report_archive::{limit_text, require_text, validate_photo},
    ChangeFeed,
};
use crate::{
    application::{
        dto::report_dto::NewCorrectiveReportDTO, error::ApplicationError,
        repositories::corrective_report_repository::CorrectiveReportRepository,
    },
    domain::models::{
        report::{CorrectiveListing, CorrectiveReport, ReportId},
        user::{Role, User},
    },
};

/// Corrective maintenance entries with a live listing. Standby engineers
/// file them; the reporter or an admin removes them.
#[derive(Clone)]
pub struct CorrectiveLog {
    repository: Arc<dyn CorrectiveReportRepository>,
    events: ChangeFeed,
}

impl CorrectiveLog {
    pub fn new(repository: Arc<dyn CorrectiveReportRepository>, events: ChangeFeed) -> Self {
        Self { repository, events }
    }

    pub fn validate(report: &NewCorrectiveReportDTO) -> Result<(), ApplicationError> {
        require_text("Issue", &report.issue)?;
        require_text("Action taken", &report.action_taken)?;
        require_text("Location", &report.location)?;
        if let Some(parts) = &report.spare_parts {
            limit_text("Spare parts", parts)?;
        }
        if let Some(description) = &report.photo_description {
            limit_text("Photo description", description)?;
        }
        if report.photo_base64.trim().is_empty() {
            return Err(ApplicationError::BadRequest("Photo is required".to_string()));
        }
        validate_photo("Photo", &report.photo_base64)
    }

    pub async fn create(
        &self,
        report: NewCorrectiveReportDTO,
        reporter: &User,
    ) -> Result<CorrectiveReport, ApplicationError> {
        if reporter.role != Role::StandbyEngineer {
            return Err(ApplicationError::Forbidden);
        }
        Self::validate(&report)?;
        let created = self.repository.create_report(report, reporter).await?;
        info!(
            "User {} filed corrective report {} at {}",
            reporter.uid, created.id, created.location
        );
        self.events.notify();
        Ok(created)
    }

    pub async fn list(&self) -> Result<Vec<CorrectiveReport>, ApplicationError> {
        self.repository.list_reports().await
    }

    /// Removes a report. Reporter or admin only.
    pub async fn delete(
        &self,
        user: &User,
        id: ReportId,
    ) -> Result<CorrectiveReport, ApplicationError> {
        let report = self.repository.get_report(id).await?;
        if !user.is_admin() && report.reported_by != user.uid {
            return Err(ApplicationError::Forbidden);
        }
        let deleted = self.repository.delete_report(id).await?;
        info!("User {} deleted corrective report {}", user.uid, id);
        self.events.notify();
        Ok(deleted)
    }

    pub fn subscribe(
        &self,
    ) -> impl Stream<Item = Result<CorrectiveListing, ApplicationError>> + Send + 'static {
        let repository = self.repository.clone();
        self.events
            .listen(move || {
                let repository = repository.clone();
                async move { repository.list_reports().await }
            })
            .map(|view| {
                view.map(|(revision, reports)| CorrectiveListing {
                    revision,
                    emitted_at: Utc::now(),
                    reports,
                })
            })
    }
}
