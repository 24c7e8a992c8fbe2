use axum::{extract::State, Json};
use serde::Serialize;
use sysinfo::System;
use tracing::info;

use crate::{adapters::state::AppState, domain::config::server::Backend};

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub backend: String,
    pub policy: HealthPolicyInfo,
    pub metrics: SystemMetrics,
}

#[derive(Debug, Serialize)]
pub struct SystemMetrics {
    #[serde(rename = "cpuUsagePercent")]
    pub cpu_usage_percent: f32,
    #[serde(rename = "memoryUsedBytes")]
    pub memory_used_bytes: u64,
    #[serde(rename = "memoryTotalBytes")]
    pub memory_total_bytes: u64,
    #[serde(rename = "memoryUsagePercent")]
    pub memory_usage_percent: f32,
}

#[derive(Debug, Serialize)]
pub struct HealthPolicyInfo {
    #[serde(rename = "maxSize")]
    pub max_size: u64,
    #[serde(rename = "chunkSize")]
    pub chunk_size: u64,
    #[serde(rename = "batchSize")]
    pub batch_size: u32,
    #[serde(rename = "staleUploadTimeoutSecs")]
    pub stale_upload_timeout_secs: u64,
    #[serde(rename = "allowedMimeTypes")]
    pub allowed_mime_types: Vec<String>,
}

pub struct HealthController;

impl HealthController {
    /// GET /api/v1/health
    pub async fn health_check(State(app_state): State<AppState>) -> Json<HealthResponse> {
        info!("Health check requested");

        let policy = app_state.attachment_store.policy().await;
        let policy_info = HealthPolicyInfo {
            max_size: policy.max_size,
            chunk_size: policy.chunk_size,
            batch_size: policy.batch_size,
            stale_upload_timeout_secs: app_state.stale_upload_timeout.as_secs(),
            allowed_mime_types: policy.mime_types,
        };

        let mut sys = System::new();
        sys.refresh_cpu_usage();
        sys.refresh_memory();

        let memory_used = sys.used_memory();
        let memory_total = sys.total_memory();
        let memory_usage_percent = if memory_total > 0 {
            (memory_used as f32 / memory_total as f32) * 100.0
        } else {
            0.0
        };

        let backend = match app_state.backend {
            Backend::Postgres => "postgres",
            Backend::Memory => "memory",
        };

        Json(HealthResponse {
            status: "healthy".to_string(),
            backend: backend.to_string(),
            policy: policy_info,
            metrics: SystemMetrics {
                cpu_usage_percent: sys.global_cpu_usage(),
                memory_used_bytes: memory_used,
                memory_total_bytes: memory_total,
                memory_usage_percent,
            },
        })
    }
}
