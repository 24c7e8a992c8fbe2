use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{
    application::{
        dto::upload_policy_dto::UploadPolicyDTO, error::ApplicationError,
        repositories::upload_policy_repository::UploadPolicyRepository,
    },
    domain::config::upload::UploadPolicy,
};

#[derive(Default)]
pub struct MemoryUploadPolicyRepository {
    policy: RwLock<UploadPolicy>,
}

impl MemoryUploadPolicyRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UploadPolicyRepository for MemoryUploadPolicyRepository {
    async fn get_upload_policy(&self) -> Result<UploadPolicy, ApplicationError> {
        Ok(self.policy.read().await.clone())
    }

    async fn upsert_upload_policy(
        &self,
        policy: UploadPolicyDTO,
    ) -> Result<UploadPolicy, ApplicationError> {
        let mut policy = policy;
        policy.sanitize();

        let mut current = self.policy.write().await;
        let updated = policy.apply_to(current.clone());
        updated.validate().map_err(ApplicationError::BadRequest)?;
        *current = updated.clone();
        Ok(updated)
    }
}
