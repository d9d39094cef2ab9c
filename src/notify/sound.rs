//! Cue playback using rodio.
//!
//! The two interval-end cues are short synthesized tones rather than bundled
//! audio files; each cue has its own pitch so end-of-work and end-of-break
//! are distinguishable by ear. Playback is non-blocking: the sink is detached
//! and the tone finishes in the background.

use std::sync::atomic::{AtomicBool, Ordering};

use rodio::source::{SineWave, Source};
use rodio::{OutputStream, OutputStreamHandle, Sink};
use tracing::debug;

use super::error::NotifyError;
use super::Cue;

/// Length of a cue tone.
const CUE_DURATION_MS: u64 = 400;

/// Output gain applied to cue tones.
const CUE_AMPLITUDE: f32 = 0.25;

/// A cue player backed by a rodio output stream.
pub struct CuePlayer {
    /// The audio output stream (must be kept alive for playback).
    _stream: OutputStream,
    /// Handle to the output stream for creating sinks.
    stream_handle: OutputStreamHandle,
    /// Whether cue playback is enabled.
    enabled: AtomicBool,
}

// SAFETY: cpal marks its `Stream` (and therefore rodio's `OutputStream`)
// `!Send`/`!Sync` as a conservative cross-platform default; on the Unix/ALSA
// targets this crate supports the stream runs on its own audio thread and the
// handle is only used to spawn detached sinks, so moving or sharing the
// wrapper is sound. The remaining field is an atomic.
unsafe impl Send for CuePlayer {}
unsafe impl Sync for CuePlayer {}

impl CuePlayer {
    /// Creates a new cue player.
    ///
    /// # Errors
    ///
    /// Returns `NotifyError::DeviceNotAvailable` if no audio output device
    /// is available.
    pub fn new(enabled: bool) -> Result<Self, NotifyError> {
        let (stream, stream_handle) = OutputStream::try_default()
            .map_err(|e| NotifyError::DeviceNotAvailable(e.to_string()))?;

        debug!("audio output stream initialized");

        Ok(Self {
            _stream: stream,
            stream_handle,
            enabled: AtomicBool::new(enabled),
        })
    }

    /// Plays the tone for the given cue.
    ///
    /// Non-blocking; silently succeeds when playback is disabled.
    ///
    /// # Errors
    ///
    /// Returns an error if the audio sink cannot be created.
    pub fn play(&self, cue: Cue) -> Result<(), NotifyError> {
        if !self.enabled.load(Ordering::Relaxed) {
            debug!("cue playback disabled, skipping");
            return Ok(());
        }

        let sink = Sink::try_new(&self.stream_handle)
            .map_err(|e| NotifyError::StreamError(e.to_string()))?;

        let tone = SineWave::new(cue.frequency_hz())
            .take_duration(std::time::Duration::from_millis(CUE_DURATION_MS))
            .amplify(CUE_AMPLITUDE);

        sink.append(tone);
        sink.detach(); // Non-blocking: tone finishes after this returns

        debug!(cue = cue.as_str(), "cue playback started");
        Ok(())
    }

    /// Enables cue playback.
    pub fn enable(&self) {
        self.enabled.store(true, Ordering::Relaxed);
    }

    /// Disables cue playback.
    pub fn disable(&self) {
        self.enabled.store(false, Ordering::Relaxed);
    }

    /// Returns true if cue playback is currently enabled.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }
}
