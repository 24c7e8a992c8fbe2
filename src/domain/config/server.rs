use std::time::Duration;

use thiserror::Error;

use crate::domain::config::secrets::Secrets;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} environment variable must be set")]
    Missing(&'static str),

    #[error("{name} has an invalid value '{value}'")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Postgres,
    Memory,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub backend: Backend,
    pub database_url: Option<String>,
    pub cors_allowed_origins: Option<Vec<String>>,
    pub admin_emails: Vec<String>,
    pub stale_upload_timeout: Duration,
    /// `None` disables the background reaper.
    pub reaper_interval: Option<Duration>,
    pub secrets: Secrets,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&'static str) -> Option<String>,
    {
        let port = parse_or(&lookup, "PORT", 8080u16)?;

        let backend = match lookup("STORAGE_BACKEND").as_deref().map(str::trim) {
            None | Some("") | Some("postgres") => Backend::Postgres,
            Some("memory") => Backend::Memory,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    name: "STORAGE_BACKEND",
                    value: other.to_string(),
                })
            }
        };

        let database_url = lookup("DATABASE_URL").filter(|s| !s.trim().is_empty());
        if backend == Backend::Postgres && database_url.is_none() {
            return Err(ConfigError::Missing("DATABASE_URL"));
        }

        let cors_allowed_origins = lookup("CORS_ALLOWED_ORIGINS").map(|s| split_list(&s));

        let admin_emails = lookup("ADMIN_EMAILS")
            .map(|s| split_list(&s))
            .unwrap_or_default();

        let stale_upload_timeout =
            Duration::from_secs(parse_or(&lookup, "STALE_UPLOAD_TIMEOUT_SECS", 3600u64)?);

        let reaper_secs = parse_or(&lookup, "REAPER_INTERVAL_SECS", 900u64)?;
        let reaper_interval = (reaper_secs > 0).then(|| Duration::from_secs(reaper_secs));

        let secrets = Secrets {
            auth_jwt_secret: required(&lookup, "AUTH_JWT_SECRET")?,
            service_secret: required(&lookup, "SERVICE_SECRET")?,
        };

        Ok(Self {
            port,
            backend,
            database_url,
            cors_allowed_origins,
            admin_emails,
            stale_upload_timeout,
            reaper_interval,
            secrets,
        })
    }
}

fn required<F>(lookup: &F, name: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&'static str) -> Option<String>,
{
    lookup(name)
        .filter(|s| !s.is_empty())
        .ok_or(ConfigError::Missing(name))
}

fn parse_or<F, T>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&'static str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(name) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::Invalid { name, value }),
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
