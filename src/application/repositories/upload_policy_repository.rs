use async_trait::async_trait;

use crate::{
    application::{dto::upload_policy_dto::UploadPolicyDTO, error::ApplicationError},
    domain::config::upload::UploadPolicy,
};

#[async_trait]
pub trait UploadPolicyRepository: Send + Sync {
    async fn get_upload_policy(&self) -> Result<UploadPolicy, ApplicationError>;
    async fn upsert_upload_policy(
        &self,
        policy: UploadPolicyDTO,
    ) -> Result<UploadPolicy, ApplicationError>;
}
