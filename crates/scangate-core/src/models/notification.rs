//! Notification events describing the final disposition of an upload.

use crate::models::upload::Reference;
use serde::{Deserialize, Serialize};

/// Message dispatched to the external consumer after storage and scanning.
/// Exactly one event is produced per accepted upload, and it is enqueued
/// exactly once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum NotificationEvent {
    #[serde(rename_all = "camelCase")]
    UploadedFile {
        callback_url: String,
        reference: Reference,
        download_url: String,
    },
    #[serde(rename_all = "camelCase")]
    QuarantinedFile {
        callback_url: String,
        reference: Reference,
        error_details: String,
    },
}

impl NotificationEvent {
    pub fn reference(&self) -> &Reference {
        match self {
            NotificationEvent::UploadedFile { reference, .. } => reference,
            NotificationEvent::QuarantinedFile { reference, .. } => reference,
        }
    }

    pub fn callback_url(&self) -> &str {
        match self {
            NotificationEvent::UploadedFile { callback_url, .. } => callback_url,
            NotificationEvent::QuarantinedFile { callback_url, .. } => callback_url,
        }
    }
}
