//! Application state.
//!
//! The gateway itself is stateless across requests; `AppState` only carries
//! the configuration and the injected collaborators (storage, scanner,
//! notification queue) behind their capability traits, so tests can swap in
//! doubles.

use crate::services::authorization::UploadAuthorizationIssuer;
use scangate_core::Config;
use scangate_services::{NotificationQueue, Scanner};
use scangate_storage::Storage;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub issuer: UploadAuthorizationIssuer,
    pub storage: Arc<dyn Storage>,
    pub scanner: Arc<dyn Scanner>,
    pub notifications: Arc<dyn NotificationQueue>,
}

impl AppState {
    pub fn new(
        config: Config,
        storage: Arc<dyn Storage>,
        scanner: Arc<dyn Scanner>,
        notifications: Arc<dyn NotificationQueue>,
    ) -> Self {
        let issuer = UploadAuthorizationIssuer::from_config(&config);
        AppState {
            config,
            issuer,
            storage,
            scanner,
            notifications,
        }
    }
}

fn _assert_app_state_send_sync() {
    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}
    assert_send::<AppState>();
    assert_sync::<AppState>();
}
