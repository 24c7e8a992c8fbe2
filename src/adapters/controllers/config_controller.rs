use std::sync::Arc;

use axum::{extract::State, Extension, Json};
use tracing::info;

use crate::{
    adapters::middleware::require_admin,
    application::{
        dto::upload_policy_dto::UploadPolicyDTO, error::ApplicationError,
        repositories::upload_policy_repository::UploadPolicyRepository,
        services::AttachmentStore,
    },
    domain::{config::upload::UploadPolicy, models::user::User},
};

pub struct ConfigController;

impl ConfigController {
    /// GET /api/v1/config/upload-policy
    pub async fn get_upload_policy(
        State(store): State<AttachmentStore>,
    ) -> Json<UploadPolicy> {
        Json(store.policy().await)
    }

    /// PATCH /api/v1/config/upload-policy
    pub async fn update_upload_policy(
        State(policy_repo): State<Arc<dyn UploadPolicyRepository>>,
        State(store): State<AttachmentStore>,
        Extension(actor): Extension<User>,
        Json(body): Json<UploadPolicyDTO>,
    ) -> Result<Json<UploadPolicy>, ApplicationError> {
        require_admin(&actor)?;
        info!("User {} updating upload policy", actor.uid);

        let policy = policy_repo.upsert_upload_policy(body).await?;
        store.replace_policy(policy.clone()).await;
        info!(
            "Upload policy updated: max_size={}, chunk_size={}, batch_size={}, mime_types={:?}",
            policy.max_size, policy.chunk_size, policy.batch_size, policy.mime_types
        );
        Ok(Json(policy))
    }
}
