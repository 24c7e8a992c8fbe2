use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::{
    application::{
        dto::user_dto::UserDTO, error::ApplicationError,
        repositories::user_repository::UserRepository,
    },
    domain::models::user::{Role, User},
};

#[derive(Default)]
pub struct MemoryUserRepository {
    users: RwLock<HashMap<String, User>>,
}

impl MemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn create_user_if_absent(&self, user: UserDTO) -> Result<User, ApplicationError> {
        let mut users = self.users.write().await;
        let stored = users.entry(user.uid.clone()).or_insert_with(|| {
            let mut user: User = user.into();
            user.created_at = Utc::now();
            user
        });
        Ok(stored.clone())
    }

    async fn find_user(&self, user: UserDTO) -> Result<Option<User>, ApplicationError> {
        Ok(self.users.read().await.get(&user.uid).cloned())
    }

    async fn update_role(&self, user: UserDTO, role: Role) -> Result<User, ApplicationError> {
        let mut users = self.users.write().await;
        let stored = users.get_mut(&user.uid).ok_or(ApplicationError::NotFound)?;
        stored.role = role;
        Ok(stored.clone())
    }
}
