//! IPC server for the Poro Focus daemon.
//!
//! This module provides Unix Domain Socket IPC functionality:
//! - Server that listens on a Unix socket
//! - Request/response handling for timer and task commands
//! - Integration with the timer engine and settings store

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{UnixListener, UnixStream};
use tokio::sync::Mutex;
use tokio::time::{timeout, Duration};

use crate::engine::TimerEngine;
use crate::notify::Announcer;
use crate::settings::SettingsStore;
use crate::tasks::TaskList;
use crate::types::{
    IpcRequest, IpcResponse, ResponseData, BREAK_MINUTES_MAX, BREAK_MINUTES_MIN, WORK_MINUTES_MAX,
    WORK_MINUTES_MIN,
};

// ============================================================================
// Constants
// ============================================================================

/// Socket location under the home directory.
pub const SOCKET_FILE: &str = ".porofocus/porofocus.sock";

/// Maximum request size in bytes (4KB)
const MAX_REQUEST_SIZE: usize = 4096;

/// Read timeout in seconds
const READ_TIMEOUT_SECS: u64 = 5;

// ============================================================================
// IpcError
// ============================================================================

/// IPC-specific error types.
#[derive(Debug, thiserror::Error)]
pub enum IpcError {
    /// Read error
    #[error("failed to read request: {0}")]
    ReadError(String),

    /// Timeout error
    #[error("operation timed out")]
    Timeout,
}

// ============================================================================
// IpcServer
// ============================================================================

/// Unix Domain Socket IPC server.
pub struct IpcServer {
    /// Unix socket listener
    listener: UnixListener,
    /// Socket path (for cleanup)
    socket_path: PathBuf,
}

impl IpcServer {
    /// Creates a new IPC server bound to the specified socket path.
    ///
    /// If the socket file already exists, it will be removed before binding.
    ///
    /// # Errors
    ///
    /// Returns an error if the socket cannot be bound.
    pub fn new(socket_path: &Path) -> Result<Self> {
        if socket_path.exists() {
            std::fs::remove_file(socket_path)
                .with_context(|| format!("Failed to remove existing socket: {socket_path:?}"))?;
        }

        if let Some(parent) = socket_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create socket directory: {parent:?}"))?;
        }

        let listener = UnixListener::bind(socket_path)
            .with_context(|| format!("Failed to bind Unix socket: {socket_path:?}"))?;

        Ok(Self {
            listener,
            socket_path: socket_path.to_path_buf(),
        })
    }

    /// Returns the default socket path (`~/.porofocus/porofocus.sock`).
    pub fn default_socket_path() -> Result<PathBuf> {
        let home = dirs::home_dir().context("could not determine home directory")?;
        Ok(home.join(SOCKET_FILE))
    }

    /// Accepts an incoming client connection.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be accepted.
    pub async fn accept(&self) -> Result<UnixStream> {
        let (stream, _addr) = self
            .listener
            .accept()
            .await
            .context("Failed to accept connection")?;
        Ok(stream)
    }

    /// Receives and deserializes an IPC request from the stream.
    ///
    /// Applies a read timeout to prevent blocking indefinitely.
    ///
    /// # Errors
    ///
    /// Returns an error if reading or deserialization fails.
    pub async fn receive_request(stream: &mut UnixStream) -> Result<IpcRequest> {
        let mut buffer = vec![0u8; MAX_REQUEST_SIZE];

        let read_result = timeout(
            Duration::from_secs(READ_TIMEOUT_SECS),
            stream.read(&mut buffer),
        )
        .await;

        let n = match read_result {
            Ok(Ok(n)) => n,
            Ok(Err(e)) => return Err(IpcError::ReadError(e.to_string()).into()),
            Err(_) => return Err(IpcError::Timeout.into()),
        };

        if n == 0 {
            anyhow::bail!("Connection closed by client");
        }

        let request: IpcRequest = serde_json::from_slice(&buffer[..n])
            .context("Failed to deserialize IPC request")?;

        Ok(request)
    }

    /// Serializes and sends an IPC response to the stream.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub async fn send_response(stream: &mut UnixStream, response: &IpcResponse) -> Result<()> {
        let json = serde_json::to_vec(response).context("Failed to serialize IPC response")?;

        stream
            .write_all(&json)
            .await
            .context("Failed to write response")?;
        stream.flush().await.context("Failed to flush response")?;

        Ok(())
    }

    /// Returns the socket path.
    pub fn socket_path(&self) -> &Path {
        &self.socket_path
    }
}

impl Drop for IpcServer {
    fn drop(&mut self) {
        // Clean up socket file on drop
        let _ = std::fs::remove_file(&self.socket_path);
    }
}

// ============================================================================
// RequestHandler
// ============================================================================

/// Handles IPC requests by dispatching to the engine, task list and store.
#[derive(Clone)]
pub struct RequestHandler {
    /// Timer engine handle
    engine: TimerEngine,
    /// Shared task list
    tasks: Arc<Mutex<TaskList>>,
    /// Shared settings store for durable fields
    store: Arc<Mutex<SettingsStore>>,
    /// Notification sink, toggled by the sound command
    announcer: Arc<dyn Announcer>,
}

impl RequestHandler {
    /// Creates a new request handler.
    pub fn new(
        engine: TimerEngine,
        tasks: Arc<Mutex<TaskList>>,
        store: Arc<Mutex<SettingsStore>>,
        announcer: Arc<dyn Announcer>,
    ) -> Self {
        Self {
            engine,
            tasks,
            store,
            announcer,
        }
    }

    /// Handles an IPC request and returns the appropriate response.
    pub async fn handle(&self, request: IpcRequest) -> IpcResponse {
        match request {
            IpcRequest::Toggle => self.handle_toggle().await,
            IpcRequest::Reset => self.handle_reset().await,
            IpcRequest::Mode => self.handle_mode().await,
            IpcRequest::Work { minutes } => self.handle_work(minutes).await,
            IpcRequest::Break { minutes } => self.handle_break(minutes).await,
            IpcRequest::Sound { enabled } => self.handle_sound(enabled).await,
            IpcRequest::Status => self.handle_status().await,
            IpcRequest::TaskAdd { title, icon } => self.handle_task_add(title, icon).await,
            IpcRequest::TaskDone { id } => self.handle_task_done(&id).await,
            IpcRequest::TaskRemove { id } => self.handle_task_remove(&id).await,
            IpcRequest::TaskList { focus } => self.handle_task_list(focus).await,
        }
    }

    /// Handles the toggle (play/pause) command.
    ///
    /// Starting the timer also persists the current durable settings, so a
    /// session that is actually used is the one that sticks.
    async fn handle_toggle(&self) -> IpcResponse {
        let view = self.engine.toggle().await;
        let (_, config) = self.engine.snapshot().await;

        if view.phase == crate::types::TimerPhase::Running {
            self.store.lock().await.save_config(&config);
        }

        let message = match view.phase {
            crate::types::TimerPhase::Running => "Timer running",
            crate::types::TimerPhase::Paused => "Timer paused",
            crate::types::TimerPhase::Editing => "Timer idle",
        };
        IpcResponse::success(message, Some(ResponseData::from_view(&view, &config)))
    }

    /// Handles the reset command.
    async fn handle_reset(&self) -> IpcResponse {
        let view = self.engine.reset().await;
        let (_, config) = self.engine.snapshot().await;
        IpcResponse::success("Timer reset", Some(ResponseData::from_view(&view, &config)))
    }

    /// Handles the mode toggle command.
    async fn handle_mode(&self) -> IpcResponse {
        let view = self.engine.toggle_mode().await;
        let (_, config) = self.engine.snapshot().await;
        let message = format!("Switched to {} mode", view.mode.as_str());
        IpcResponse::success(message, Some(ResponseData::from_view(&view, &config)))
    }

    /// Handles the work-duration command.
    async fn handle_work(&self, minutes: u32) -> IpcResponse {
        if !(WORK_MINUTES_MIN..=WORK_MINUTES_MAX).contains(&minutes) {
            return IpcResponse::error(format!(
                "work duration must be {WORK_MINUTES_MIN}-{WORK_MINUTES_MAX} minutes"
            ));
        }

        let view = self.engine.set_work_minutes(minutes).await;
        let (_, config) = self.engine.snapshot().await;
        self.store.lock().await.save_config(&config);

        IpcResponse::success(
            format!("Work duration set to {minutes} minutes"),
            Some(ResponseData::from_view(&view, &config)),
        )
    }

    /// Handles the break-duration command.
    async fn handle_break(&self, minutes: u32) -> IpcResponse {
        if !(BREAK_MINUTES_MIN..=BREAK_MINUTES_MAX).contains(&minutes) {
            return IpcResponse::error(format!(
                "break duration must be {BREAK_MINUTES_MIN}-{BREAK_MINUTES_MAX} minutes"
            ));
        }

        let view = self.engine.set_break_minutes(minutes).await;
        let (_, config) = self.engine.snapshot().await;
        self.store.lock().await.save_config(&config);

        IpcResponse::success(
            format!("Break duration set to {minutes} minutes"),
            Some(ResponseData::from_view(&view, &config)),
        )
    }

    /// Handles the sound command.
    async fn handle_sound(&self, enabled: bool) -> IpcResponse {
        let view = self.engine.set_sound_enabled(enabled).await;
        self.announcer.set_enabled(enabled);

        let (_, config) = self.engine.snapshot().await;
        self.store.lock().await.save_config(&config);

        let message = if enabled {
            "Sound cues enabled"
        } else {
            "Sound cues disabled"
        };
        IpcResponse::success(message, Some(ResponseData::from_view(&view, &config)))
    }

    /// Handles the status query.
    async fn handle_status(&self) -> IpcResponse {
        let (view, config) = self.engine.snapshot().await;
        IpcResponse::success("", Some(ResponseData::from_view(&view, &config)))
    }

    /// Handles the task-add command.
    async fn handle_task_add(&self, title: String, icon: crate::types::TaskIcon) -> IpcResponse {
        let mut tasks = self.tasks.lock().await;
        match tasks.add(title, icon) {
            Ok(task) => {
                let message = format!("Task added: {}", task.title);
                self.persist_tasks(&tasks).await;
                IpcResponse::success(message, Some(ResponseData::from_tasks(tasks.all().to_vec())))
            }
            Err(e) => IpcResponse::error(e.to_string()),
        }
    }

    /// Handles the task-done command.
    async fn handle_task_done(&self, id: &str) -> IpcResponse {
        let mut tasks = self.tasks.lock().await;
        match tasks.toggle_status(id) {
            Ok(task) => {
                let message = if task.status {
                    "Task marked done"
                } else {
                    "Task marked not done"
                };
                self.persist_tasks(&tasks).await;
                IpcResponse::success(message, Some(ResponseData::from_tasks(tasks.all().to_vec())))
            }
            Err(e) => IpcResponse::error(e.to_string()),
        }
    }

    /// Handles the task-remove command.
    async fn handle_task_remove(&self, id: &str) -> IpcResponse {
        let mut tasks = self.tasks.lock().await;
        match tasks.remove(id) {
            Ok(task) => {
                let message = format!("Task removed: {}", task.title);
                self.persist_tasks(&tasks).await;
                IpcResponse::success(message, Some(ResponseData::from_tasks(tasks.all().to_vec())))
            }
            Err(e) => IpcResponse::error(e.to_string()),
        }
    }

    /// Handles the task-list query.
    async fn handle_task_list(&self, focus: bool) -> IpcResponse {
        let tasks = self.tasks.lock().await;
        IpcResponse::success("", Some(ResponseData::from_tasks(tasks.visible(focus))))
    }

    async fn persist_tasks(&self, tasks: &TaskList) {
        self.store.lock().await.save_tasks(tasks.all());
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    use crate::engine::TimerEvent;
    use crate::notify::MockAnnouncer;
    use crate::types::{TaskIcon, TimerConfig, TimerMode, TimerPhase};

    // ------------------------------------------------------------------------
    // Helper functions
    // ------------------------------------------------------------------------

    fn create_temp_socket_path() -> PathBuf {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.sock");
        // Keep the directory so it's not deleted
        std::mem::forget(dir);
        path
    }

    struct Fixture {
        handler: RequestHandler,
        announcer: Arc<MockAnnouncer>,
        store_path: PathBuf,
        _rx: mpsc::UnboundedReceiver<TimerEvent>,
        _dir: tempfile::TempDir,
    }

    fn create_handler() -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let store_path = dir.path().join("settings.json");
        let store = Arc::new(Mutex::new(SettingsStore::open(&store_path)));

        let (tx, rx) = mpsc::unbounded_channel();
        let engine = TimerEngine::new(TimerConfig::default(), tx);
        let tasks = Arc::new(Mutex::new(TaskList::new()));
        let announcer = Arc::new(MockAnnouncer::new());

        let handler = RequestHandler::new(
            engine,
            tasks,
            store,
            Arc::clone(&announcer) as Arc<dyn Announcer>,
        );

        Fixture {
            handler,
            announcer,
            store_path,
            _rx: rx,
            _dir: dir,
        }
    }

    // ------------------------------------------------------------------------
    // IpcServer Tests
    // ------------------------------------------------------------------------

    mod ipc_server_tests {
        use super::*;

        #[tokio::test]
        async fn test_server_creation() {
            let socket_path = create_temp_socket_path();
            let server = IpcServer::new(&socket_path);

            assert!(server.is_ok());
            assert!(socket_path.exists());

            drop(server);
        }

        #[tokio::test]
        async fn test_server_removes_existing_socket() {
            let socket_path = create_temp_socket_path();
            std::fs::write(&socket_path, "dummy").unwrap();

            let server = IpcServer::new(&socket_path);
            assert!(server.is_ok());
        }

        #[tokio::test]
        async fn test_server_creates_parent_directory() {
            let dir = tempfile::tempdir().unwrap();
            let socket_path = dir.path().join("subdir").join("test.sock");

            let server = IpcServer::new(&socket_path);
            assert!(server.is_ok());
            assert!(socket_path.parent().unwrap().exists());
        }

        #[tokio::test]
        async fn test_request_response_round_trip() {
            let socket_path = create_temp_socket_path();
            let server = IpcServer::new(&socket_path).unwrap();

            let client_path = socket_path.clone();
            let client = tokio::spawn(async move {
                let mut stream = UnixStream::connect(&client_path).await.unwrap();
                let request = serde_json::to_vec(&IpcRequest::Status).unwrap();
                stream.write_all(&request).await.unwrap();
                stream.shutdown().await.unwrap();

                let mut buffer = vec![0u8; 4096];
                let n = stream.read(&mut buffer).await.unwrap();
                serde_json::from_slice::<IpcResponse>(&buffer[..n]).unwrap()
            });

            let mut stream = server.accept().await.unwrap();
            let request = IpcServer::receive_request(&mut stream).await.unwrap();
            assert!(matches!(request, IpcRequest::Status));

            let response = IpcResponse::success("OK", None);
            IpcServer::send_response(&mut stream, &response).await.unwrap();

            let received = client.await.unwrap();
            assert_eq!(received.status, "success");
        }

        #[tokio::test]
        async fn test_socket_cleaned_up_on_drop() {
            let socket_path = create_temp_socket_path();
            let server = IpcServer::new(&socket_path).unwrap();

            drop(server);

            assert!(!socket_path.exists());
        }
    }

    // ------------------------------------------------------------------------
    // RequestHandler Tests
    // ------------------------------------------------------------------------

    mod request_handler_tests {
        use super::*;

        #[tokio::test(start_paused = true)]
        async fn test_toggle_starts_and_pauses() {
            let fixture = create_handler();

            let response = fixture.handler.handle(IpcRequest::Toggle).await;
            assert_eq!(response.status, "success");
            let data = response.data.unwrap();
            assert_eq!(data.phase, Some(TimerPhase::Running));
            assert_eq!(data.remaining_seconds, Some(25 * 60));

            let response = fixture.handler.handle(IpcRequest::Toggle).await;
            let data = response.data.unwrap();
            assert_eq!(data.phase, Some(TimerPhase::Paused));
        }

        #[tokio::test]
        async fn test_toggle_persists_settings_on_start() {
            let fixture = create_handler();

            fixture.handler.handle(IpcRequest::Toggle).await;

            let store = SettingsStore::open(&fixture.store_path);
            assert_eq!(store.load_config(), TimerConfig::default());
        }

        #[tokio::test]
        async fn test_reset_returns_to_editing_work() {
            let fixture = create_handler();
            fixture.handler.handle(IpcRequest::Toggle).await;

            let response = fixture.handler.handle(IpcRequest::Reset).await;

            let data = response.data.unwrap();
            assert_eq!(data.phase, Some(TimerPhase::Editing));
            assert_eq!(data.mode, Some(TimerMode::Work));
            assert_eq!(data.remaining_seconds, Some(0));
        }

        #[tokio::test]
        async fn test_mode_switches_modes() {
            let fixture = create_handler();

            let response = fixture.handler.handle(IpcRequest::Mode).await;
            assert!(response.message.contains("break"));
            assert_eq!(response.data.unwrap().mode, Some(TimerMode::Break));

            let response = fixture.handler.handle(IpcRequest::Mode).await;
            assert_eq!(response.data.unwrap().mode, Some(TimerMode::Work));
        }

        #[tokio::test]
        async fn test_work_duration_validates_bounds() {
            let fixture = create_handler();

            let response = fixture.handler.handle(IpcRequest::Work { minutes: 4 }).await;
            assert_eq!(response.status, "error");

            let response = fixture.handler.handle(IpcRequest::Work { minutes: 91 }).await;
            assert_eq!(response.status, "error");

            let response = fixture.handler.handle(IpcRequest::Work { minutes: 30 }).await;
            assert_eq!(response.status, "success");
            assert_eq!(response.data.unwrap().work_minutes, Some(30));
        }

        #[tokio::test]
        async fn test_break_duration_validates_bounds() {
            let fixture = create_handler();

            let response = fixture
                .handler
                .handle(IpcRequest::Break { minutes: 51 })
                .await;
            assert_eq!(response.status, "error");

            let response = fixture
                .handler
                .handle(IpcRequest::Break { minutes: 10 })
                .await;
            assert_eq!(response.status, "success");
            let data = response.data.unwrap();
            assert_eq!(data.break_minutes, Some(10));
            assert_eq!(data.mode, Some(TimerMode::Break));
        }

        #[tokio::test]
        async fn test_work_duration_persists() {
            let fixture = create_handler();

            fixture.handler.handle(IpcRequest::Work { minutes: 45 }).await;

            let store = SettingsStore::open(&fixture.store_path);
            assert_eq!(store.load_config().work_minutes, 45);
        }

        #[tokio::test]
        async fn test_sound_toggles_announcer() {
            let fixture = create_handler();

            fixture
                .handler
                .handle(IpcRequest::Sound { enabled: false })
                .await;
            assert!(!fixture.announcer.is_enabled());

            fixture
                .handler
                .handle(IpcRequest::Sound { enabled: true })
                .await;
            assert!(fixture.announcer.is_enabled());
        }

        #[tokio::test]
        async fn test_status_reports_view_and_config() {
            let fixture = create_handler();

            let response = fixture.handler.handle(IpcRequest::Status).await;

            let data = response.data.unwrap();
            assert_eq!(data.phase, Some(TimerPhase::Editing));
            assert_eq!(data.display_seconds, Some(25 * 60));
            assert_eq!(data.work_minutes, Some(25));
            assert_eq!(data.break_minutes, Some(5));
        }

        #[tokio::test]
        async fn test_task_add_and_list() {
            let fixture = create_handler();

            let response = fixture
                .handler
                .handle(IpcRequest::TaskAdd {
                    title: "Review PR".to_string(),
                    icon: TaskIcon::Work,
                })
                .await;
            assert_eq!(response.status, "success");

            let response = fixture
                .handler
                .handle(IpcRequest::TaskList { focus: false })
                .await;
            let tasks = response.data.unwrap().tasks.unwrap();
            assert_eq!(tasks.len(), 1);
            assert_eq!(tasks[0].title, "Review PR");
        }

        #[tokio::test]
        async fn test_task_add_empty_title_rejected() {
            let fixture = create_handler();

            let response = fixture
                .handler
                .handle(IpcRequest::TaskAdd {
                    title: "  ".to_string(),
                    icon: TaskIcon::Work,
                })
                .await;

            assert_eq!(response.status, "error");
        }

        #[tokio::test]
        async fn test_task_done_and_focus_filter() {
            let fixture = create_handler();

            fixture
                .handler
                .handle(IpcRequest::TaskAdd {
                    title: "First".to_string(),
                    icon: TaskIcon::Work,
                })
                .await;
            let response = fixture
                .handler
                .handle(IpcRequest::TaskAdd {
                    title: "Second".to_string(),
                    icon: TaskIcon::Study,
                })
                .await;
            let tasks = response.data.unwrap().tasks.unwrap();
            let first_id = tasks[0].id.clone();

            fixture
                .handler
                .handle(IpcRequest::TaskDone { id: first_id })
                .await;

            let response = fixture
                .handler
                .handle(IpcRequest::TaskList { focus: true })
                .await;
            let visible = response.data.unwrap().tasks.unwrap();
            assert_eq!(visible.len(), 1);
            assert_eq!(visible[0].title, "Second");

            let response = fixture
                .handler
                .handle(IpcRequest::TaskList { focus: false })
                .await;
            assert_eq!(response.data.unwrap().tasks.unwrap().len(), 2);
        }

        #[tokio::test]
        async fn test_task_done_unknown_id() {
            let fixture = create_handler();

            let response = fixture
                .handler
                .handle(IpcRequest::TaskDone {
                    id: "42".to_string(),
                })
                .await;

            assert_eq!(response.status, "error");
        }

        #[tokio::test]
        async fn test_task_remove_persists() {
            let fixture = create_handler();

            let response = fixture
                .handler
                .handle(IpcRequest::TaskAdd {
                    title: "Ephemeral".to_string(),
                    icon: TaskIcon::Cook,
                })
                .await;
            let id = response.data.unwrap().tasks.unwrap()[0].id.clone();

            fixture.handler.handle(IpcRequest::TaskRemove { id }).await;

            let store = SettingsStore::open(&fixture.store_path);
            assert!(store.load_tasks().is_empty());
        }
    }
}
