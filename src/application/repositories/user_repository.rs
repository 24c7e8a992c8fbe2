use async_trait::async_trait;

use crate::{
    application::{dto::user_dto::UserDTO, error::ApplicationError},
    domain::models::user::{Role, User},
};

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Inserts the user unless one with the same uid exists; returns the
    /// stored record either way.
    async fn create_user_if_absent(&self, user: UserDTO) -> Result<User, ApplicationError>;
    async fn find_user(&self, user: UserDTO) -> Result<Option<User>, ApplicationError>;
    async fn update_role(&self, user: UserDTO, role: Role) -> Result<User, ApplicationError>;
}
