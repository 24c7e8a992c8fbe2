use std::sync::Arc;

use tracing::info;

use crate::{
    application::{
        dto::user_dto::UserDTO, error::ApplicationError,
        repositories::user_repository::UserRepository,
    },
    domain::models::user::{Role, User},
};

/// Resolves authenticated identities to stored users. The default role is
/// decided once, when the user first signs in.
#[derive(Clone)]
pub struct UserDirectory {
    repository: Arc<dyn UserRepository>,
    admin_emails: Arc<Vec<String>>,
}

impl UserDirectory {
    pub fn new(repository: Arc<dyn UserRepository>, admin_emails: &[String]) -> Self {
        Self {
            repository,
            admin_emails: Arc::new(admin_emails.iter().map(|e| e.to_lowercase()).collect()),
        }
    }

    pub fn default_role_for(&self, email: &str) -> Role {
        let email = email.to_lowercase();
        if self.admin_emails.iter().any(|admin| *admin == email) {
            Role::Admin
        } else {
            Role::Engineer
        }
    }

    pub async fn sign_in(&self, uid: &str, email: &str) -> Result<User, ApplicationError> {
        if let Some(user) = self.repository.find_user(UserDTO::for_query(uid)).await? {
            return Ok(user);
        }

        let role = self.default_role_for(email);
        info!("First sign-in for user {}, assigning role {}", uid, role.as_str());
        self.repository
            .create_user_if_absent(UserDTO::for_sign_in(uid, email, role))
            .await
    }

    pub async fn set_role(
        &self,
        actor: &User,
        uid: &str,
        role: Role,
    ) -> Result<User, ApplicationError> {
        if !actor.is_admin() {
            return Err(ApplicationError::Forbidden);
        }
        info!("User {} changing role of {} to {}", actor.uid, uid, role.as_str());
        self.repository
            .update_role(UserDTO::for_query(uid), role)
            .await
    }
}
