use async_trait::async_trait;
use sqlx::query_as;

use crate::{
    application::{
        dto::user_dto::UserDTO, error::ApplicationError,
        repositories::user_repository::UserRepository,
    },
    domain::models::user::{Role, User},
};

pub struct PgUserRepository {
    pool: sqlx::PgPool,
}

impl PgUserRepository {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create_user_if_absent(&self, user: UserDTO) -> Result<User, ApplicationError> {
        // The no-op update makes RETURNING yield the existing row on conflict.
        let query = r#"
            INSERT INTO application.users (uid, email, role, company_type, created_at)
            VALUES ($1, $2, $3, $4, NOW())
            ON CONFLICT (uid) DO UPDATE SET uid = EXCLUDED.uid
            RETURNING *
        "#;
        let new_user: User = user.into();
        let stored: UserDTO = query_as::<_, UserDTO>(query)
            .bind(&new_user.uid)
            .bind(&new_user.email)
            .bind(new_user.role.as_str())
            .bind(new_user.company_type.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| ApplicationError::DatabaseError(e.to_string()))?;
        Ok(stored.into())
    }

    async fn find_user(&self, user: UserDTO) -> Result<Option<User>, ApplicationError> {
        let query = "SELECT * FROM application.users WHERE uid = $1";
        let fetched: Option<UserDTO> = query_as::<_, UserDTO>(query)
            .bind(&user.uid)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| ApplicationError::DatabaseError(e.to_string()))?;
        Ok(fetched.map(User::from))
    }

    async fn update_role(&self, user: UserDTO, role: Role) -> Result<User, ApplicationError> {
        let query = "UPDATE application.users SET role = $1 WHERE uid = $2 RETURNING *";
        let updated: Option<UserDTO> = query_as::<_, UserDTO>(query)
            .bind(role.as_str())
            .bind(&user.uid)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| ApplicationError::DatabaseError(e.to_string()))?;
        updated.map(User::from).ok_or(ApplicationError::NotFound)
    }
}
