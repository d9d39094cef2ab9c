//! IPC client for communicating with the Poro Focus daemon.
//!
//! This module provides:
//! - Unix Domain Socket client
//! - Request/response handling
//! - Connection retry logic
//! - Timeout handling

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::UnixStream;
use tokio::time::timeout;

use crate::daemon::SOCKET_FILE;
use crate::types::{IpcRequest, IpcResponse, TaskIcon};

// ============================================================================
// Constants
// ============================================================================

/// Connection timeout in seconds
const CONNECTION_TIMEOUT_SECS: u64 = 5;

/// Read/write timeout in seconds
const IO_TIMEOUT_SECS: u64 = 5;

/// Maximum response size in bytes (64KB)
const MAX_RESPONSE_SIZE: usize = 65536;

/// Maximum retry attempts
const MAX_RETRIES: u32 = 3;

/// Retry delay in milliseconds (base delay, multiplied by attempt number)
const RETRY_DELAY_MS: u64 = 500;

// ============================================================================
// IpcClient
// ============================================================================

/// IPC client for daemon communication.
pub struct IpcClient {
    /// Socket path
    socket_path: PathBuf,
    /// Connection timeout
    timeout: Duration,
}

impl IpcClient {
    /// Creates a new IPC client with the default socket path.
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn new() -> Result<Self> {
        let socket_path = Self::default_socket_path()?;
        Ok(Self {
            socket_path,
            timeout: Duration::from_secs(CONNECTION_TIMEOUT_SECS),
        })
    }

    /// Creates a new IPC client with a custom socket path.
    pub fn with_socket_path(socket_path: PathBuf) -> Self {
        Self {
            socket_path,
            timeout: Duration::from_secs(CONNECTION_TIMEOUT_SECS),
        }
    }

    /// Returns the default socket path.
    fn default_socket_path() -> Result<PathBuf> {
        let home = dirs::home_dir().context("could not determine home directory")?;
        Ok(home.join(SOCKET_FILE))
    }

    /// Returns the socket path.
    pub fn socket_path(&self) -> &PathBuf {
        &self.socket_path
    }

    /// Sends a toggle (play/pause) command to the daemon.
    pub async fn toggle(&self) -> Result<IpcResponse> {
        self.send_request_with_retry(&IpcRequest::Toggle).await
    }

    /// Sends a reset command to the daemon.
    pub async fn reset(&self) -> Result<IpcResponse> {
        self.send_request_with_retry(&IpcRequest::Reset).await
    }

    /// Sends a mode toggle command to the daemon.
    pub async fn mode(&self) -> Result<IpcResponse> {
        self.send_request_with_retry(&IpcRequest::Mode).await
    }

    /// Sends a work-duration command to the daemon.
    pub async fn work(&self, minutes: u32) -> Result<IpcResponse> {
        self.send_request_with_retry(&IpcRequest::Work { minutes })
            .await
    }

    /// Sends a break-duration command to the daemon.
    pub async fn break_time(&self, minutes: u32) -> Result<IpcResponse> {
        self.send_request_with_retry(&IpcRequest::Break { minutes })
            .await
    }

    /// Sends a sound command to the daemon.
    pub async fn sound(&self, enabled: bool) -> Result<IpcResponse> {
        self.send_request_with_retry(&IpcRequest::Sound { enabled })
            .await
    }

    /// Sends a status query to the daemon.
    pub async fn status(&self) -> Result<IpcResponse> {
        self.send_request_with_retry(&IpcRequest::Status).await
    }

    /// Sends a task-add command to the daemon.
    pub async fn task_add(&self, title: String, icon: TaskIcon) -> Result<IpcResponse> {
        self.send_request_with_retry(&IpcRequest::TaskAdd { title, icon })
            .await
    }

    /// Sends a task-done command to the daemon.
    pub async fn task_done(&self, id: String) -> Result<IpcResponse> {
        self.send_request_with_retry(&IpcRequest::TaskDone { id })
            .await
    }

    /// Sends a task-remove command to the daemon.
    pub async fn task_remove(&self, id: String) -> Result<IpcResponse> {
        self.send_request_with_retry(&IpcRequest::TaskRemove { id })
            .await
    }

    /// Sends a task-list query to the daemon.
    pub async fn task_list(&self, focus: bool) -> Result<IpcResponse> {
        self.send_request_with_retry(&IpcRequest::TaskList { focus })
            .await
    }

    /// Sends a request to the daemon with retry logic.
    async fn send_request_with_retry(&self, request: &IpcRequest) -> Result<IpcResponse> {
        let mut last_error = None;

        for attempt in 1..=MAX_RETRIES {
            match self.send_request(request).await {
                Ok(response) => return Ok(response),
                Err(e) => {
                    tracing::warn!("request failed (attempt {}/{}): {}", attempt, MAX_RETRIES, e);
                    last_error = Some(e);

                    if attempt < MAX_RETRIES {
                        let delay = Duration::from_millis(RETRY_DELAY_MS * u64::from(attempt));
                        tokio::time::sleep(delay).await;
                    }
                }
            }
        }

        Err(last_error.unwrap_or_else(|| anyhow::anyhow!("request failed")))
    }

    /// Sends a single request to the daemon.
    async fn send_request(&self, request: &IpcRequest) -> Result<IpcResponse> {
        // Connect with timeout
        let mut stream = timeout(self.timeout, UnixStream::connect(&self.socket_path))
            .await
            .context("connection timed out")?
            .context("cannot connect to daemon; run 'porofocus daemon' first")?;

        // Serialize request
        let request_json =
            serde_json::to_string(request).context("failed to serialize request")?;

        // Send request with timeout
        timeout(
            Duration::from_secs(IO_TIMEOUT_SECS),
            stream.write_all(request_json.as_bytes()),
        )
        .await
        .context("write timed out")?
        .context("failed to send request")?;

        // Flush
        timeout(Duration::from_secs(IO_TIMEOUT_SECS), stream.flush())
            .await
            .context("flush timed out")?
            .context("failed to flush request")?;

        // Shutdown write side to signal end of request
        stream
            .shutdown()
            .await
            .context("failed to shut down write side")?;

        // Read response with timeout
        let mut buffer = vec![0u8; MAX_RESPONSE_SIZE];
        let n = timeout(
            Duration::from_secs(IO_TIMEOUT_SECS),
            stream.read(&mut buffer),
        )
        .await
        .context("read timed out")?
        .context("failed to receive response")?;

        if n == 0 {
            anyhow::bail!("daemon returned no response");
        }

        // Deserialize response
        let response: IpcResponse =
            serde_json::from_slice(&buffer[..n]).context("failed to parse response")?;

        // Check for error response
        if response.status == "error" {
            anyhow::bail!("{}", response.message);
        }

        Ok(response)
    }
}

// ============================================================================
// Tests
// ============================================================================
