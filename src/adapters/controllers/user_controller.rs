use axum::{
    extract::{Path, State},
    Extension, Json,
};
use tracing::info;

use crate::{
    adapters::dto::attachment_http_dto::UpdateRoleRequest,
    application::{error::ApplicationError, services::UserDirectory},
    domain::models::user::User,
};

pub struct UserController;

impl UserController {
    /// GET /api/v1/me
    pub async fn me(Extension(user): Extension<User>) -> Json<User> {
        Json(user)
    }

    /// PATCH /api/v1/users/{uid}/role
    pub async fn update_role(
        State(users): State<UserDirectory>,
        Extension(actor): Extension<User>,
        Path(uid): Path<String>,
        Json(body): Json<UpdateRoleRequest>,
    ) -> Result<Json<User>, ApplicationError> {
        let user = users.set_role(&actor, &uid, body.role).await?;
        info!("Role of user {} is now {}", user.uid, user.role.as_str());
        Ok(Json(user))
    }
}
