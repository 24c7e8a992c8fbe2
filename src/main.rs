mod adapters;
mod application;
mod domain;

use std::sync::Arc;

use adapters::{
    repositories::{
        MemoryAttachmentRepository, MemoryCorrectiveReportRepository,
        MemoryReportDocumentRepository, MemoryUploadPolicyRepository, MemoryUserRepository,
        PgAttachmentRepository, PgCorrectiveReportRepository, PgReportDocumentRepository,
        PgUploadPolicyRepository, PgUserRepository,
    },
    router::build_router,
    state::AppState,
};
use application::{
    repositories::{
        attachment_repository::AttachmentRepository,
        corrective_report_repository::CorrectiveReportRepository,
        report_document_repository::ReportDocumentRepository,
        upload_policy_repository::UploadPolicyRepository, user_repository::UserRepository,
    },
    services::{
        spawn_reaper, AttachmentStore, ChangeFeed, CorrectiveLog, ReportArchive, UserDirectory,
    },
};
use domain::config::server::{Backend, ServerConfig};
use tower_http::cors::{Any, CorsLayer};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = ServerConfig::from_env().expect("ERROR: invalid server configuration");

    tracing::info!(
        "Starting attachment-service on port {} with {:?} backend",
        config.port,
        config.backend
    );

    // Configure CORS
    let cors = match &config.cors_allowed_origins {
        Some(allowed_origins) => {
            let origins: Vec<_> = allowed_origins
                .iter()
                .map(|s| s.parse().expect("Invalid CORS origin"))
                .collect();
            CorsLayer::new()
                .allow_origin(origins)
                .allow_methods(Any)
                .allow_headers(Any)
        }
        // Allow all origins if not specified (only for development)
        None => CorsLayer::permissive(),
    };

    let (attachment_repo, user_repo, policy_repo, document_repo, corrective_repo): (
        Arc<dyn AttachmentRepository>,
        Arc<dyn UserRepository>,
        Arc<dyn UploadPolicyRepository>,
        Arc<dyn ReportDocumentRepository>,
        Arc<dyn CorrectiveReportRepository>,
    ) = match config.backend {
        Backend::Postgres => {
            let database_url = config
                .database_url
                .as_deref()
                .expect("ERROR: DATABASE_URL environment variable must be set");

            tracing::info!("Connecting to database...");
            let pool = sqlx::postgres::PgPoolOptions::new()
                .max_connections(5)
                .acquire_timeout(std::time::Duration::from_secs(30))
                .connect(database_url)
                .await
                .expect("ERROR: Failed to connect to PostgreSQL database. Check DATABASE_URL and network connectivity.");
            tracing::info!("Database connection established");

            (
                Arc::new(PgAttachmentRepository::new(pool.clone())) as Arc<dyn AttachmentRepository>,
                Arc::new(PgUserRepository::new(pool.clone())) as Arc<dyn UserRepository>,
                Arc::new(PgUploadPolicyRepository::new(pool.clone()))
                    as Arc<dyn UploadPolicyRepository>,
                Arc::new(PgReportDocumentRepository::new(pool.clone()))
                    as Arc<dyn ReportDocumentRepository>,
                Arc::new(PgCorrectiveReportRepository::new(pool))
                    as Arc<dyn CorrectiveReportRepository>,
            )
        }
        Backend::Memory => {
            tracing::warn!("Using in-memory storage, data is lost on restart");
            (
                Arc::new(MemoryAttachmentRepository::new()) as Arc<dyn AttachmentRepository>,
                Arc::new(MemoryUserRepository::new()) as Arc<dyn UserRepository>,
                Arc::new(MemoryUploadPolicyRepository::new()) as Arc<dyn UploadPolicyRepository>,
                Arc::new(MemoryReportDocumentRepository::new())
                    as Arc<dyn ReportDocumentRepository>,
                Arc::new(MemoryCorrectiveReportRepository::new())
                    as Arc<dyn CorrectiveReportRepository>,
            )
        }
    };

    let policy = policy_repo
        .get_upload_policy()
        .await
        .expect("Failed to load upload policy");

    let attachment_store = AttachmentStore::new(attachment_repo, policy, ChangeFeed::new(64));

    if let Some(every) = config.reaper_interval {
        tracing::info!(
            "Stale upload reaper runs every {}s (timeout {}s)",
            every.as_secs(),
            config.stale_upload_timeout.as_secs()
        );
        spawn_reaper(attachment_store.clone(), every, config.stale_upload_timeout);
    } else {
        tracing::info!("Stale upload reaper disabled");
    }

    let app_state = AppState {
        backend: config.backend,
        secrets: Arc::new(config.secrets),
        stale_upload_timeout: config.stale_upload_timeout,
        attachment_store,
        user_directory: UserDirectory::new(user_repo, &config.admin_emails),
        upload_policy_repository: policy_repo,
        report_archive: ReportArchive::new(document_repo),
        corrective_log: CorrectiveLog::new(corrective_repo, ChangeFeed::new(64)),
    };

    let router = build_router(app_state, cors);

    // Start the server
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port))
        .await
        .expect("Failed to bind to port");

    tracing::info!("Server listening on 0.0.0.0:{}", config.port);

    axum::serve(listener, router)
        .await
        .expect("Failed to start server");
}
