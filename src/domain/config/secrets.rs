use serde::{Deserialize, Serialize};

#[derive(Clone, Serialize, Deserialize)]
pub struct Secrets {
    /// HS256 key shared with the identity provider that signs bearer tokens.
    #[serde(rename = "authJwtSecret")]
    pub auth_jwt_secret: String,
    /// Shared secret for operator endpoints (health, stale-upload cleanup).
    #[serde(rename = "serviceSecret")]
    pub service_secret: String,
}

impl std::fmt::Debug for Secrets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Secrets")
            .field("auth_jwt_secret", &"<redacted>")
            .field("service_secret", &"<redacted>")
            .finish()
    }
}
