//! Integration tests for Daemon-CLI IPC communication.
//!
//! These tests verify end-to-end communication between the CLI client
//! and the daemon IPC server:
//! - timer control via IPC
//! - duration changes with settings persistence
//! - task workflow via IPC
//! - connection error handling

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::{mpsc, Mutex};
use tokio::time::{timeout, Duration};

use porofocus::cli::client::IpcClient;
use porofocus::daemon::ipc::{IpcServer, RequestHandler};
use porofocus::engine::{TimerEngine, TimerEvent};
use porofocus::notify::{Announcer, MockAnnouncer};
use porofocus::settings::SettingsStore;
use porofocus::tasks::TaskList;
use porofocus::types::{TaskIcon, TimerConfig, TimerMode, TimerPhase};

// ============================================================================
// Test Helpers
// ============================================================================

/// Creates a temporary socket path for testing.
fn create_temp_socket_path() -> PathBuf {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("integration_test.sock");
    // Keep the directory so it's not deleted
    std::mem::forget(dir);
    path
}

struct TestDaemon {
    client: IpcClient,
    store_path: PathBuf,
    _rx: mpsc::UnboundedReceiver<TimerEvent>,
    _dir: tempfile::TempDir,
}

/// Spins up a real IPC server with a handler and returns a connected client.
fn start_daemon(config: TimerConfig) -> TestDaemon {
    let dir = tempfile::tempdir().unwrap();
    let store_path = dir.path().join("settings.json");
    let socket_path = create_temp_socket_path();

    let (tx, rx) = mpsc::unbounded_channel();
    let engine = TimerEngine::new(config, tx);
    let handler = RequestHandler::new(
        engine,
        Arc::new(Mutex::new(TaskList::new())),
        Arc::new(Mutex::new(SettingsStore::open(&store_path))),
        Arc::new(MockAnnouncer::new()) as Arc<dyn Announcer>,
    );

    let server = IpcServer::new(&socket_path).unwrap();
    tokio::spawn(async move {
        loop {
            let Ok(mut stream) = server.accept().await else {
                break;
            };
            let handler = handler.clone();
            tokio::spawn(async move {
                if let Ok(request) = IpcServer::receive_request(&mut stream).await {
                    let response = handler.handle(request).await;
                    let _ = IpcServer::send_response(&mut stream, &response).await;
                }
            });
        }
    });

    TestDaemon {
        client: IpcClient::with_socket_path(socket_path),
        store_path,
        _rx: rx,
        _dir: dir,
    }
}

// ============================================================================
// Timer Control Tests
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_toggle_starts_timer_via_ipc() {
    let daemon = start_daemon(TimerConfig::default());

    let response = timeout(Duration::from_secs(5), daemon.client.toggle())
        .await
        .unwrap()
        .unwrap();

    assert_eq!(response.status, "success");
    let data = response.data.unwrap();
    assert_eq!(data.phase, Some(TimerPhase::Running));
    assert_eq!(data.mode, Some(TimerMode::Work));
    assert_eq!(data.remaining_seconds, Some(25 * 60));
}

#[tokio::test]
async fn test_toggle_pauses_running_timer_via_ipc() {
    let daemon = start_daemon(TimerConfig::default());

    daemon.client.toggle().await.unwrap();
    let response = daemon.client.toggle().await.unwrap();

    let data = response.data.unwrap();
    assert_eq!(data.phase, Some(TimerPhase::Paused));
}

#[tokio::test]
async fn test_reset_via_ipc() {
    let daemon = start_daemon(TimerConfig::default());

    daemon.client.mode().await.unwrap();
    daemon.client.toggle().await.unwrap();
    let response = daemon.client.reset().await.unwrap();

    let data = response.data.unwrap();
    assert_eq!(data.phase, Some(TimerPhase::Editing));
    assert_eq!(data.mode, Some(TimerMode::Work));
}

#[tokio::test]
async fn test_status_query_via_ipc() {
    let daemon = start_daemon(TimerConfig::default());

    let response = daemon.client.status().await.unwrap();

    assert_eq!(response.status, "success");
    let data = response.data.unwrap();
    assert_eq!(data.phase, Some(TimerPhase::Editing));
    assert_eq!(data.display_seconds, Some(25 * 60));
    assert_eq!(data.work_minutes, Some(25));
    assert_eq!(data.break_minutes, Some(5));
    assert_eq!(data.sound_enabled, Some(true));
}

// ============================================================================
// Duration and Settings Tests
// ============================================================================

#[tokio::test]
async fn test_work_duration_change_via_ipc() {
    let daemon = start_daemon(TimerConfig::default());

    let response = daemon.client.work(45).await.unwrap();

    let data = response.data.unwrap();
    assert_eq!(data.work_minutes, Some(45));
    assert_eq!(data.mode, Some(TimerMode::Work));
    assert_eq!(data.display_seconds, Some(45 * 60));

    // Durable settings must reflect the change
    let store = SettingsStore::open(&daemon.store_path);
    assert_eq!(store.load_config().work_minutes, 45);
}

#[tokio::test]
async fn test_break_duration_change_selects_break_mode() {
    let daemon = start_daemon(TimerConfig::default());

    let response = daemon.client.break_time(15).await.unwrap();

    let data = response.data.unwrap();
    assert_eq!(data.break_minutes, Some(15));
    assert_eq!(data.mode, Some(TimerMode::Break));
    assert_eq!(data.display_seconds, Some(15 * 60));
}

#[tokio::test]
async fn test_out_of_range_duration_rejected() {
    let daemon = start_daemon(TimerConfig::default());

    let result = daemon.client.work(200).await;

    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("5-90"));
}

#[tokio::test]
async fn test_sound_setting_round_trip() {
    let daemon = start_daemon(TimerConfig::default());

    let response = daemon.client.sound(false).await.unwrap();
    assert_eq!(response.data.unwrap().sound_enabled, Some(false));

    let store = SettingsStore::open(&daemon.store_path);
    assert!(!store.load_config().sound_enabled);
}

// ============================================================================
// Task Workflow Tests
// ============================================================================

#[tokio::test]
async fn test_task_workflow_via_ipc() {
    let daemon = start_daemon(TimerConfig::default());

    daemon
        .client
        .task_add("Write report".to_string(), TaskIcon::Work)
        .await
        .unwrap();
    let response = daemon
        .client
        .task_add("Stretch".to_string(), TaskIcon::Exercise)
        .await
        .unwrap();

    let tasks = response.data.unwrap().tasks.unwrap();
    assert_eq!(tasks.len(), 2);
    let first_id = tasks[0].id.clone();

    // Mark the first task done; the focus view must hide it
    daemon.client.task_done(first_id.clone()).await.unwrap();

    let response = daemon.client.task_list(true).await.unwrap();
    let visible = response.data.unwrap().tasks.unwrap();
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].title, "Stretch");

    // The unfiltered view still shows both
    let response = daemon.client.task_list(false).await.unwrap();
    assert_eq!(response.data.unwrap().tasks.unwrap().len(), 2);

    // Removal shrinks the list and persists
    daemon.client.task_remove(first_id).await.unwrap();
    let store = SettingsStore::open(&daemon.store_path);
    assert_eq!(store.load_tasks().len(), 1);
}

#[tokio::test]
async fn test_task_done_unknown_id_is_error() {
    let daemon = start_daemon(TimerConfig::default());

    let result = daemon.client.task_done("nope".to_string()).await;

    assert!(result.is_err());
}

// ============================================================================
// Connection Error Tests
// ============================================================================

#[tokio::test]
async fn test_connection_error_when_daemon_not_running() {
    let socket_path = PathBuf::from("/tmp/porofocus_missing_socket_98765.sock");
    let client = IpcClient::with_socket_path(socket_path);

    let result = client.status().await;

    assert!(result.is_err());
}
