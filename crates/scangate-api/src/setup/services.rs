//! Collaborator wiring: storage, scanner, and notification queue are chosen
//! from configuration and injected into `AppState` behind their traits.

use crate::state::AppState;
use anyhow::{Context, Result};
use scangate_core::Config;
use scangate_services::{
    ChannelNotificationQueue, ClamAvScanner, DisabledScanner, NotificationQueue, Scanner,
    SqsNotificationQueue,
};
use scangate_storage::{LocalStorage, Storage};
use std::sync::Arc;

pub async fn setup_services(config: Config) -> Result<Arc<AppState>> {
    let storage: Arc<dyn Storage> = Arc::new(
        LocalStorage::new(config.storage_path.clone())
            .await
            .context("Failed to initialize storage")?,
    );

    let scanner: Arc<dyn Scanner> = if config.clamav_enabled {
        tracing::info!(
            host = %config.clamav_host,
            port = config.clamav_port,
            fail_closed = config.clamav_fail_closed,
            "ClamAV scanning enabled"
        );
        Arc::new(ClamAvScanner::with_timeout(
            config.clamav_host.clone(),
            config.clamav_port,
            config.clamav_fail_closed,
            config.clamav_timeout_secs,
        ))
    } else {
        tracing::warn!("ClamAV scanning disabled, all uploads will be treated as clean");
        Arc::new(DisabledScanner)
    };

    let notifications: Arc<dyn NotificationQueue> = match &config.notification_queue_url {
        Some(queue_url) => {
            tracing::info!(queue_url = %queue_url, "Using SQS notification queue");
            Arc::new(SqsNotificationQueue::from_env(queue_url.clone()).await)
        }
        None => {
            tracing::info!("Using in-process notification queue");
            let (queue, rx) = ChannelNotificationQueue::new(config.notification_queue_size);
            ChannelNotificationQueue::spawn_logging_drain(rx);
            Arc::new(queue)
        }
    };

    Ok(Arc::new(AppState::new(
        config,
        storage,
        scanner,
        notifications,
    )))
}
