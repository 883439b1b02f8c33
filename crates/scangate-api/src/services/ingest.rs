//! The effectful tail of the upload pipeline: store, scan, notify.
//!
//! Steps run strictly in order and none is skipped once storage ran: the
//! scan needs the accepted bytes, the notification needs the verdict, and
//! the verdict never changes the HTTP outcome of the upload call itself.

use crate::state::AppState;
use bytes::Bytes;
use scangate_core::{AppError, NotificationEvent, Reference, ScanVerdict};

/// A form submission that passed field and file-presence validation.
pub struct AcceptedUpload {
    pub reference: Reference,
    pub callback_url: String,
    pub content_type: String,
    pub data: Bytes,
}

/// Run store → scan → enqueue for one accepted upload.
///
/// Returns the verdict for logging; callers respond 204 regardless.
pub async fn ingest(state: &AppState, upload: AcceptedUpload) -> Result<ScanVerdict, AppError> {
    let AcceptedUpload {
        reference,
        callback_url,
        content_type,
        data,
    } = upload;

    // 1. Persist. Runs for every accepted submission, whatever the scan finds.
    state
        .storage
        .put(reference.as_str(), data.clone(), &content_type)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, reference = %reference, "Failed to store upload");
            AppError::Storage(e.to_string())
        })?;

    // 2. Scan. Exactly one verdict per accepted upload.
    let verdict = state.scanner.check_if_clean(&data).await.map_err(|e| {
        tracing::error!(error = %e, reference = %reference, "Scan failed");
        AppError::Scan(e.to_string())
    })?;

    // 3. Build and enqueue exactly one notification.
    let event = match &verdict {
        ScanVerdict::Clean => NotificationEvent::UploadedFile {
            callback_url,
            download_url: state.config.download_url(reference.as_str()),
            reference: reference.clone(),
        },
        ScanVerdict::VirusFound(details) => NotificationEvent::QuarantinedFile {
            callback_url,
            reference: reference.clone(),
            error_details: details.clone(),
        },
    };

    state.notifications.enqueue_notification(event).await.map_err(|e| {
        tracing::error!(error = %e, reference = %reference, "Failed to enqueue notification");
        AppError::Notification(e.to_string())
    })?;

    match &verdict {
        ScanVerdict::Clean => {
            tracing::info!(reference = %reference, "Upload ingested: clean");
        }
        ScanVerdict::VirusFound(details) => {
            tracing::warn!(reference = %reference, details = %details, "Upload ingested: quarantined");
        }
    }

    Ok(verdict)
}
