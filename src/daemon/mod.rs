//! Daemon module for Poro Focus.
//!
//! This module contains the long-running side of the tool:
//! - `ipc`: Unix Domain Socket server and request handler
//! - the daemon run loop wiring the timer engine, notification sink,
//!   settings store and IPC server together

pub mod ipc;

pub use ipc::{IpcServer, RequestHandler, SOCKET_FILE};

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use tokio::sync::{mpsc, Mutex};
use tracing::{debug, info, warn};

use crate::engine::{TimerEngine, TimerEvent};
use crate::notify::{title_for, Announcer, Cue, CuePlayer, NullAnnouncer, IDLE_TITLE};
use crate::settings::SettingsStore;
use crate::tasks::TaskList;
use crate::types::IpcResponse;

/// Runs the daemon until interrupted.
///
/// Loads durable settings, spins up the timer engine and its tick loop, the
/// notification consumer and the IPC accept loop, then blocks until Ctrl-C.
///
/// # Errors
///
/// Returns an error if the settings path cannot be resolved or the IPC
/// socket cannot be bound.
pub async fn run(socket_path: Option<PathBuf>) -> Result<()> {
    let store = SettingsStore::open_default()?;
    let config = store.load_config();
    let tasks = TaskList::from_tasks(store.load_tasks());
    info!(
        work_minutes = config.work_minutes,
        break_minutes = config.break_minutes,
        sound_enabled = config.sound_enabled,
        task_count = tasks.len(),
        "settings loaded"
    );

    let announcer: Arc<dyn Announcer> = match CuePlayer::new(config.sound_enabled) {
        Ok(player) => Arc::new(player),
        Err(e) => {
            warn!(error = %e, "audio unavailable, sound cues disabled");
            Arc::new(NullAnnouncer)
        }
    };

    let (event_tx, event_rx) = mpsc::unbounded_channel();
    let engine = TimerEngine::new(config, event_tx);

    let ticker = engine.clone();
    tokio::spawn(async move { ticker.run().await });
    tokio::spawn(run_notifier(event_rx, Arc::clone(&announcer)));

    let socket_path = match socket_path {
        Some(path) => path,
        None => IpcServer::default_socket_path()?,
    };
    let server = IpcServer::new(&socket_path)?;
    info!(socket = %socket_path.display(), "daemon listening");

    let handler = RequestHandler::new(
        engine,
        Arc::new(Mutex::new(tasks)),
        Arc::new(Mutex::new(store)),
        announcer,
    );

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("shutdown signal received");
                break;
            }
            accepted = server.accept() => {
                match accepted {
                    Ok(mut stream) => {
                        let handler = handler.clone();
                        tokio::spawn(async move {
                            handle_connection(&mut stream, &handler).await;
                        });
                    }
                    Err(e) => {
                        warn!(error = %e, "failed to accept connection");
                    }
                }
            }
        }
    }

    Ok(())
}

/// Serves a single client connection.
async fn handle_connection(stream: &mut tokio::net::UnixStream, handler: &RequestHandler) {
    let response = match IpcServer::receive_request(stream).await {
        Ok(request) => {
            debug!(?request, "request received");
            handler.handle(request).await
        }
        Err(e) => IpcResponse::error(e.to_string()),
    };

    if let Err(e) = IpcServer::send_response(stream, &response).await {
        warn!(error = %e, "failed to send response");
    }
}

/// Consumes engine events and turns them into user-facing output.
///
/// Interval-end cues are fire and forget; playback failure is logged and
/// dropped so a broken audio stack never stalls a mode flip.
async fn run_notifier(
    mut events: mpsc::UnboundedReceiver<TimerEvent>,
    announcer: Arc<dyn Announcer>,
) {
    while let Some(event) = events.recv().await {
        match event {
            TimerEvent::IntervalEnded { mode } => {
                info!(mode = mode.as_str(), "interval ended");
                let cue = Cue::for_ended_mode(mode);
                if let Err(e) = announcer.announce(cue) {
                    warn!(cue = cue.as_str(), error = %e, "cue playback failed");
                }
            }
            TimerEvent::IntervalStarted { mode } => {
                info!(mode = mode.as_str(), "interval started");
            }
            TimerEvent::Tick { view } => {
                debug!(title = %title_for(&view), "tick");
            }
            TimerEvent::Paused { view } => {
                debug!(remaining = view.remaining_seconds, "paused");
            }
            TimerEvent::Idle => {
                debug!(title = IDLE_TITLE, "idle");
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
