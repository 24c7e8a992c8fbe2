use std::{sync::Arc, time::Duration};

use axum::extract::FromRef;

use crate::{
    application::{
        repositories::upload_policy_repository::UploadPolicyRepository,
        services::{AttachmentStore, CorrectiveLog, ReportArchive, UserDirectory},
    },
    domain::config::{secrets::Secrets, server::Backend},
};

#[derive(Clone, FromRef)]
pub struct AppState {
    pub backend: Backend,
    pub secrets: Arc<Secrets>,
    pub stale_upload_timeout: Duration,
    pub attachment_store: AttachmentStore,
    pub user_directory: UserDirectory,
    pub upload_policy_repository: Arc<dyn UploadPolicyRepository>,
    pub report_archive: ReportArchive,
    pub corrective_log: CorrectiveLog,
}
