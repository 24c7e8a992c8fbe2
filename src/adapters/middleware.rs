use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{
    adapters::state::AppState,
    application::error::ApplicationError,
    domain::{config::secrets::Secrets, models::user::User},
};

pub const SERVICE_SECRET_HEADER: &str = "X-Service-Secret";

/// Claims carried by the identity provider's HS256 tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthClaims {
    pub sub: String,
    pub email: String,
    pub exp: u64,
}

/// Middleware to validate the X-Service-Secret header
pub async fn validate_service_secret(
    State(secrets): State<Arc<Secrets>>,
    headers: HeaderMap,
    request: Request<Body>,
    next: Next,
) -> Response {
    match headers.get(SERVICE_SECRET_HEADER) {
        Some(header_value) => match header_value.to_str() {
            Ok(provided_secret) => {
                if provided_secret == secrets.service_secret {
                    next.run(request).await
                } else {
                    warn!("Invalid secret provided in {} header", SERVICE_SECRET_HEADER);
                    (StatusCode::UNAUTHORIZED, "Unauthorized").into_response()
                }
            }
            Err(_) => {
                warn!("{} header contains invalid UTF-8", SERVICE_SECRET_HEADER);
                (StatusCode::BAD_REQUEST, "Bad request").into_response()
            }
        },
        None => {
            warn!("{} header is missing", SERVICE_SECRET_HEADER);
            (StatusCode::UNAUTHORIZED, "Unauthorized").into_response()
        }
    }
}

/// Verifies the bearer token, signs the user in and stores the resolved
/// [`User`] as a request extension.
pub async fn authenticate(
    State(app_state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, ApplicationError> {
    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| {
            warn!("Missing bearer token");
            ApplicationError::Unauthorized
        })?;

    let claims = decode_claims(token, &app_state.secrets.auth_jwt_secret)?;
    let user = app_state
        .user_directory
        .sign_in(&claims.sub, &claims.email)
        .await?;
    debug!("Authenticated user {} as {}", user.uid, user.role.as_str());

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

pub fn decode_claims(token: &str, secret: &str) -> Result<AuthClaims, ApplicationError> {
    decode::<AuthClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::new(Algorithm::HS256),
    )
    .map(|data| data.claims)
    .map_err(|e| {
        warn!("Rejected bearer token: {}", e);
        ApplicationError::InvalidToken
    })
}

pub fn require_admin(user: &User) -> Result<(), ApplicationError> {
    if user.is_admin() {
        Ok(())
    } else {
        warn!("User {} attempted an admin operation", user.uid);
        Err(ApplicationError::Forbidden)
    }
}
