use std::time::Duration;

use tokio::{task::JoinHandle, time::MissedTickBehavior};
use tracing::{error, info, warn};

use crate::application::services::AttachmentStore;

/// Periodically deletes uploads stuck in `uploading` for longer than
/// `stale_after`.
pub fn spawn_reaper(
    store: AttachmentStore,
    every: Duration,
    stale_after: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately; skip it so startup stays quiet.
        ticker.tick().await;

        loop {
            ticker.tick().await;
            match store.reap_stale(stale_after).await {
                Ok(report) if report.deleted > 0 || !report.errors.is_empty() => {
                    info!(
                        "Reaper removed {} stale uploads ({} errors)",
                        report.deleted,
                        report.errors.len()
                    );
                    for e in &report.errors {
                        warn!("{}", e);
                    }
                }
                Ok(_) => {}
                Err(e) => error!("Stale upload sweep failed: {:?}", e),
            }
        }
    })
}
