//! Notification dispatch.
//!
//! The pipeline enqueues exactly one `NotificationEvent` per accepted upload
//! through the `NotificationQueue` trait. The broker behind it is an external
//! collaborator: `SqsNotificationQueue` hands events to an SQS queue, while
//! `ChannelNotificationQueue` is a bounded in-process channel for local runs
//! and embedding consumers.

use async_trait::async_trait;
use scangate_core::NotificationEvent;
use thiserror::Error;
use tokio::sync::mpsc;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("Notification queue is full")]
    QueueFull,

    #[error("Notification queue is closed")]
    QueueClosed,

    #[error("Failed to serialize notification: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Notification dispatch failed: {0}")]
    Dispatch(String),
}

/// Notification dispatch capability.
#[async_trait]
pub trait NotificationQueue: Send + Sync {
    /// Enqueue one event. Callers invoke this exactly once per accepted
    /// upload; an error means the event was NOT handed over.
    async fn enqueue_notification(&self, event: NotificationEvent) -> Result<(), NotifyError>;
}

/// SQS-backed notification queue.
#[derive(Clone)]
pub struct SqsNotificationQueue {
    client: aws_sdk_sqs::Client,
    queue_url: String,
}

impl SqsNotificationQueue {
    pub fn new(client: aws_sdk_sqs::Client, queue_url: String) -> Self {
        Self { client, queue_url }
    }

    /// Build a queue from the ambient AWS environment (credentials chain,
    /// region, endpoint overrides).
    pub async fn from_env(queue_url: String) -> Self {
        let aws_config =
            aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        let client = aws_sdk_sqs::Client::new(&aws_config);
        Self::new(client, queue_url)
    }
}

#[async_trait]
impl NotificationQueue for SqsNotificationQueue {
    async fn enqueue_notification(&self, event: NotificationEvent) -> Result<(), NotifyError> {
        let body = serde_json::to_string(&event)?;

        self.client
            .send_message()
            .queue_url(&self.queue_url)
            .message_body(body)
            .send()
            .await
            .map_err(|e| NotifyError::Dispatch(e.to_string()))?;

        tracing::info!(
            reference = %event.reference(),
            queue_url = %self.queue_url,
            "Notification enqueued"
        );
        Ok(())
    }
}

/// Bounded in-process notification queue.
///
/// `new` returns the queue plus the consuming end; whoever owns the receiver
/// is the "external consumer" in local deployments. `spawn_logging_drain`
/// attaches a worker that logs each event, for runs where nobody else
/// consumes.
#[derive(Clone)]
pub struct ChannelNotificationQueue {
    tx: mpsc::Sender<NotificationEvent>,
}

impl ChannelNotificationQueue {
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<NotificationEvent>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (Self { tx }, rx)
    }

    /// Drain the receiver, logging each event.
    pub fn spawn_logging_drain(mut rx: mpsc::Receiver<NotificationEvent>) {
        tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                match &event {
                    NotificationEvent::UploadedFile {
                        reference,
                        download_url,
                        ..
                    } => tracing::info!(
                        reference = %reference,
                        download_url = %download_url,
                        "Notification: file uploaded"
                    ),
                    NotificationEvent::QuarantinedFile {
                        reference,
                        error_details,
                        ..
                    } => tracing::warn!(
                        reference = %reference,
                        details = %error_details,
                        "Notification: file quarantined"
                    ),
                }
            }
        });
    }
}

#[async_trait]
impl NotificationQueue for ChannelNotificationQueue {
    async fn enqueue_notification(&self, event: NotificationEvent) -> Result<(), NotifyError> {
        self.tx.try_send(event).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => {
                tracing::warn!("Notification queue is full, rejecting event");
                NotifyError::QueueFull
            }
            mpsc::error::TrySendError::Closed(_) => NotifyError::QueueClosed,
        })
    }
}
