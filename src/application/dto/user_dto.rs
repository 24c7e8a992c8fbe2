use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::models::user::{CompanyType, Role, User};

#[derive(Debug, Serialize, Deserialize)]
pub struct UserDTO {
    pub uid: String,
    pub email: Option<String>,
    pub role: Option<Role>,
    #[serde(rename = "companyType")]
    pub company_type: Option<CompanyType>,
    #[serde(rename = "createdAt")]
    pub created_at: Option<DateTime<Utc>>,
}

impl UserDTO {
    /// Builds a UserDTO carrying only the uid, for lookups
    pub fn for_query(uid: &str) -> Self {
        Self {
            uid: uid.to_string(),
            email: None,
            role: None,
            company_type: None,
            created_at: None,
        }
    }

    /// Builds the record created at first sign-in
    pub fn for_sign_in(uid: &str, email: &str, role: Role) -> Self {
        Self {
            uid: uid.to_string(),
            email: Some(email.to_string()),
            role: Some(role),
            company_type: Some(CompanyType::default()),
            created_at: None,
        }
    }
}

impl From<User> for UserDTO {
    fn from(value: User) -> Self {
        UserDTO {
            uid: value.uid,
            email: Some(value.email),
            role: Some(value.role),
            company_type: Some(value.company_type),
            created_at: Some(value.created_at),
        }
    }
}

impl From<UserDTO> for User {
    fn from(value: UserDTO) -> Self {
        User {
            uid: value.uid,
            email: value.email.unwrap_or_default(),
            role: value.role.unwrap_or(Role::Engineer),
            company_type: value.company_type.unwrap_or_default(),
            created_at: value.created_at.unwrap_or_else(Utc::now),
        }
    }
}
