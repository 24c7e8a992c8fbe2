use async_trait::async_trait;
use sqlx::{query_as, QueryBuilder};
use tracing::{debug, info};

use crate::{
    application::{
        dto::upload_policy_dto::UploadPolicyDTO, error::ApplicationError,
        repositories::upload_policy_repository::UploadPolicyRepository,
    },
    domain::config::upload::UploadPolicy,
};

pub struct PgUploadPolicyRepository {
    pool: sqlx::PgPool,
}

impl PgUploadPolicyRepository {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }

    async fn insert_defaults(&self) -> Result<UploadPolicy, ApplicationError> {
        let defaults = UploadPolicy::default();
        let query = r#"
            INSERT INTO config.upload_policy (id, mime_types, max_size, chunk_size, batch_size)
            VALUES (1, $1, $2, $3, $4)
            ON CONFLICT (id) DO UPDATE SET id = EXCLUDED.id
            RETURNING *
        "#;
        let stored: UploadPolicyDTO = query_as::<_, UploadPolicyDTO>(query)
            .bind(&defaults.mime_types)
            .bind(defaults.max_size as i64)
            .bind(defaults.chunk_size as i64)
            .bind(defaults.batch_size as i32)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| ApplicationError::DatabaseError(e.to_string()))?;
        Ok(stored.into())
    }
}

#[async_trait]
impl UploadPolicyRepository for PgUploadPolicyRepository {
    async fn get_upload_policy(&self) -> Result<UploadPolicy, ApplicationError> {
        debug!("Fetching upload policy from database");
        let query = "SELECT * FROM config.upload_policy WHERE id = 1";
        let fetched: Option<UploadPolicyDTO> = query_as::<_, UploadPolicyDTO>(query)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| ApplicationError::DatabaseError(e.to_string()))?;

        let policy = match fetched {
            Some(dto) => dto.into(),
            None => {
                info!("Upload policy not found, storing defaults");
                self.insert_defaults().await?
            }
        };
        info!(
            "Upload policy loaded: max_size={}, chunk_size={}, batch_size={}",
            policy.max_size, policy.chunk_size, policy.batch_size
        );
        Ok(policy)
    }

    async fn upsert_upload_policy(
        &self,
        policy: UploadPolicyDTO,
    ) -> Result<UploadPolicy, ApplicationError> {
        let mut policy = policy;
        policy.sanitize();

        let current = self.get_upload_policy().await?;
        if policy.is_empty() {
            return Ok(current);
        }

        let merged = UploadPolicyDTO {
            mime_types: policy.mime_types.clone(),
            max_size: policy.max_size,
            chunk_size: policy.chunk_size,
            batch_size: policy.batch_size,
        }
        .apply_to(current);
        merged.validate().map_err(ApplicationError::BadRequest)?;

        let mut builder: QueryBuilder<sqlx::Postgres> =
            QueryBuilder::new("UPDATE config.upload_policy SET ");
        let mut separated = builder.separated(", ");

        if let Some(mime_types) = &policy.mime_types {
            separated.push("mime_types = ");
            separated.push_bind_unseparated(mime_types);
        }
        if let Some(max_size) = policy.max_size {
            separated.push("max_size = ");
            separated.push_bind_unseparated(max_size as i64);
        }
        if let Some(chunk_size) = policy.chunk_size {
            separated.push("chunk_size = ");
            separated.push_bind_unseparated(chunk_size as i64);
        }
        if let Some(batch_size) = policy.batch_size {
            separated.push("batch_size = ");
            separated.push_bind_unseparated(batch_size as i32);
        }

        builder.push(" WHERE id = 1 RETURNING *");

        let updated: UploadPolicyDTO = builder
            .build_query_as::<UploadPolicyDTO>()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| ApplicationError::DatabaseError(e.to_string()))?;

        Ok(updated.into())
    }
}
