//! Test helpers: build AppState and router over test doubles.
//!
//! The collaborators behind the pipeline are capability traits, so tests
//! inject doubles: tempdir-backed storage wrapped in a call counter, a
//! scanner with a programmable verdict, and a queue that records every
//! enqueued event.

use async_trait::async_trait;
use axum_test::TestServer;
use bytes::Bytes;
use scangate_api::setup::routes;
use scangate_api::state::AppState;
use scangate_core::{Config, NotificationEvent, ScanVerdict};
use scangate_services::{NotificationQueue, NotifyError, ScanError, Scanner};
use scangate_storage::{LocalStorage, Storage, StorageResult, StoredFile};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// Storage double: delegates to a real LocalStorage in a tempdir while
/// counting `put` invocations.
pub struct CountingStorage {
    inner: LocalStorage,
    puts: AtomicUsize,
}

impl CountingStorage {
    pub fn put_count(&self) -> usize {
        self.puts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Storage for CountingStorage {
    async fn put(&self, key: &str, data: Bytes, content_type: &str) -> StorageResult<()> {
        self.puts.fetch_add(1, Ordering::SeqCst);
        self.inner.put(key, data, content_type).await
    }

    async fn get(&self, key: &str) -> StorageResult<Option<StoredFile>> {
        self.inner.get(key).await
    }

    async fn exists(&self, key: &str) -> StorageResult<bool> {
        self.inner.exists(key).await
    }
}

/// Scanner double returning a fixed verdict.
pub struct StubScanner {
    verdict: ScanVerdict,
}

#[async_trait]
impl Scanner for StubScanner {
    async fn check_if_clean(&self, _content: &[u8]) -> Result<ScanVerdict, ScanError> {
        Ok(self.verdict.clone())
    }
}

/// Scanner double that always fails.
pub struct FailingScanner;

#[async_trait]
impl Scanner for FailingScanner {
    async fn check_if_clean(&self, _content: &[u8]) -> Result<ScanVerdict, ScanError> {
        Err(ScanError::Engine("scanner unavailable".to_string()))
    }
}

/// Queue double recording every enqueued event.
#[derive(Default)]
pub struct RecordingNotificationQueue {
    events: Mutex<Vec<NotificationEvent>>,
}

impl RecordingNotificationQueue {
    pub fn events(&self) -> Vec<NotificationEvent> {
        self.events.lock().expect("events lock").clone()
    }
}

#[async_trait]
impl NotificationQueue for RecordingNotificationQueue {
    async fn enqueue_notification(&self, event: NotificationEvent) -> Result<(), NotifyError> {
        self.events.lock().expect("events lock").push(event);
        Ok(())
    }
}

/// Queue double that always fails.
pub struct FailingNotificationQueue;

#[async_trait]
impl NotificationQueue for FailingNotificationQueue {
    async fn enqueue_notification(&self, _event: NotificationEvent) -> Result<(), NotifyError> {
        Err(NotifyError::Dispatch("queue unavailable".to_string()))
    }
}

/// Test application: server plus the inspectable doubles.
pub struct TestApp {
    pub server: TestServer,
    pub storage: Arc<CountingStorage>,
    pub notifications: Arc<RecordingNotificationQueue>,
    pub _temp_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }
}

pub fn create_test_config() -> Config {
    Config {
        server_port: 3000,
        environment: "test".to_string(),
        cors_origins: vec!["*".to_string()],
        public_base_url: "http://localhost:3000".to_string(),
        max_file_size_bytes: 10 * 1024 * 1024,
        form_signing_secret: "test-secret-key-min-32-characters-long".to_string(),
        credential_access_key: "ASIAxxxbbcc".to_string(),
        aws_region: "us-east-1".to_string(),
        upload_acl: "private".to_string(),
        storage_path: "/tmp/scangate-test".to_string(),
        clamav_enabled: false,
        clamav_host: "localhost".to_string(),
        clamav_port: 3310,
        clamav_fail_closed: true,
        clamav_timeout_secs: 30,
        notification_queue_url: None,
        notification_queue_size: 16,
    }
}

/// Setup a test app with a clean-verdict scanner.
pub async fn setup_test_app() -> TestApp {
    setup_test_app_with_verdict(ScanVerdict::Clean).await
}

/// Setup a test app with a fixed scan verdict.
pub async fn setup_test_app_with_verdict(verdict: ScanVerdict) -> TestApp {
    setup_test_app_inner(Arc::new(StubScanner { verdict }), None).await
}

/// Setup a test app with a failing scanner.
pub async fn setup_test_app_with_failing_scanner() -> TestApp {
    setup_test_app_inner(Arc::new(FailingScanner), None).await
}

/// Setup a test app whose notification queue rejects every event.
pub async fn setup_test_app_with_failing_queue() -> TestApp {
    setup_test_app_inner(
        Arc::new(StubScanner {
            verdict: ScanVerdict::Clean,
        }),
        Some(Arc::new(FailingNotificationQueue)),
    )
    .await
}

async fn setup_test_app_inner(
    scanner: Arc<dyn Scanner>,
    queue_override: Option<Arc<dyn NotificationQueue>>,
) -> TestApp {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
    let local = LocalStorage::new(temp_dir.path())
        .await
        .expect("Failed to create local storage");
    let storage = Arc::new(CountingStorage {
        inner: local,
        puts: AtomicUsize::new(0),
    });

    let notifications = Arc::new(RecordingNotificationQueue::default());
    let queue: Arc<dyn NotificationQueue> = match queue_override {
        Some(queue) => queue,
        None => notifications.clone(),
    };

    let state = Arc::new(AppState::new(
        create_test_config(),
        storage.clone(),
        scanner,
        queue,
    ));

    let app = routes::setup_routes(state).expect("Failed to setup routes");
    let server = TestServer::new(app.into_make_service()).expect("Failed to create test server");

    TestApp {
        server,
        storage,
        notifications,
        _temp_dir: temp_dir,
    }
}
