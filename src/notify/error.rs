//! Notification sink error types.

use thiserror::Error;

/// Errors that can occur while playing a notification cue.
///
/// These are always swallowed-with-log by the caller; a failed cue must never
/// block a mode transition.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// Audio device is not available (e.g. headless environment).
    #[error("audio device not available: {0}")]
    DeviceNotAvailable(String),

    /// Failed to create the audio output sink.
    #[error("failed to create audio sink: {0}")]
    StreamError(String),

    /// Generic playback error.
    #[error("cue playback error: {0}")]
    PlaybackError(String),
}

impl NotifyError {
    /// Returns true if this error is about device availability rather than a
    /// one-off playback failure.
    #[must_use]
    pub fn is_device_error(&self) -> bool {
        matches!(self, Self::DeviceNotAvailable(_) | Self::StreamError(_))
    }
}
