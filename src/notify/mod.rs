//! Notification sink for the timer engine.
//!
//! The engine emits structured events; this module decides how they reach
//! the user:
//!
//! - A short sound cue at each interval end (end-of-work and end-of-break
//!   have distinct pitches)
//! - A title string: `MM:SS Work|Break` while running, the fixed app name
//!   otherwise
//!
//! Playback failure is always swallowed and logged; it must never block the
//! engine's mode transition.

mod error;
mod sound;

pub use error::NotifyError;
pub use sound::CuePlayer;

use crate::types::{format_mm_ss, TimerMode, TimerPhase, TimerView};

/// Fixed title shown while the timer is not running.
pub const IDLE_TITLE: &str = "Poro Focus";

// ============================================================================
// Cue
// ============================================================================

/// Which interval just ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    /// A work interval finished; break is about to begin
    EndWork,
    /// A break interval finished; work is about to begin
    EndBreak,
}

impl Cue {
    /// Returns the cue for the interval that just ended.
    #[must_use]
    pub fn for_ended_mode(mode: TimerMode) -> Self {
        match mode {
            TimerMode::Work => Cue::EndWork,
            TimerMode::Break => Cue::EndBreak,
        }
    }

    /// Returns the string representation of the cue.
    pub fn as_str(&self) -> &'static str {
        match self {
            Cue::EndWork => "end_work",
            Cue::EndBreak => "end_break",
        }
    }

    /// Returns the tone pitch for this cue.
    #[must_use]
    pub fn frequency_hz(&self) -> f32 {
        match self {
            // Falling pitch into the break, rising pitch back into work
            Cue::EndWork => 523.25,
            Cue::EndBreak => 659.25,
        }
    }
}

// ============================================================================
// Announcer
// ============================================================================

/// Trait for notification sink implementations.
///
/// Implementations must be non-blocking; the engine fires and forgets.
pub trait Announcer: Send + Sync {
    /// Announces an interval end.
    ///
    /// # Errors
    ///
    /// Returns an error if the cue cannot be played. Callers log and drop it.
    fn announce(&self, cue: Cue) -> Result<(), NotifyError>;

    /// Enables or disables announcements.
    fn set_enabled(&self, enabled: bool);

    /// Returns true when announcements are enabled.
    fn is_enabled(&self) -> bool;
}

impl Announcer for CuePlayer {
    fn announce(&self, cue: Cue) -> Result<(), NotifyError> {
        self.play(cue)
    }

    fn set_enabled(&self, enabled: bool) {
        if enabled {
            self.enable();
        } else {
            self.disable();
        }
    }

    fn is_enabled(&self) -> bool {
        CuePlayer::is_enabled(self)
    }
}

/// Silent announcer used when no audio device is available.
#[derive(Debug, Default)]
pub struct NullAnnouncer;

impl Announcer for NullAnnouncer {
    fn announce(&self, _cue: Cue) -> Result<(), NotifyError> {
        Ok(())
    }

    fn set_enabled(&self, _enabled: bool) {}

    fn is_enabled(&self) -> bool {
        false
    }
}

/// Mock announcer for tests; records every announced cue.
#[derive(Debug, Default)]
pub struct MockAnnouncer {
    cues: std::sync::Mutex<Vec<Cue>>,
    enabled: std::sync::atomic::AtomicBool,
    should_fail: std::sync::atomic::AtomicBool,
}

impl MockAnnouncer {
    /// Creates a new enabled mock announcer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            cues: std::sync::Mutex::new(Vec::new()),
            enabled: std::sync::atomic::AtomicBool::new(true),
            should_fail: std::sync::atomic::AtomicBool::new(false),
        }
    }

    /// Makes every subsequent announce fail.
    pub fn set_should_fail(&self, should_fail: bool) {
        self.should_fail
            .store(should_fail, std::sync::atomic::Ordering::SeqCst);
    }

    /// Returns the cues announced so far.
    #[must_use]
    pub fn announced(&self) -> Vec<Cue> {
        self.cues.lock().unwrap().clone()
    }
}

impl Announcer for MockAnnouncer {
    fn announce(&self, cue: Cue) -> Result<(), NotifyError> {
        if self.should_fail.load(std::sync::atomic::Ordering::SeqCst) {
            return Err(NotifyError::PlaybackError("mock failure".to_string()));
        }
        if self.enabled.load(std::sync::atomic::Ordering::SeqCst) {
            self.cues.lock().unwrap().push(cue);
        }
        Ok(())
    }

    fn set_enabled(&self, enabled: bool) {
        self.enabled
            .store(enabled, std::sync::atomic::Ordering::SeqCst);
    }

    fn is_enabled(&self) -> bool {
        self.enabled.load(std::sync::atomic::Ordering::SeqCst)
    }
}

// ============================================================================
// Title rendering
// ============================================================================

/// Renders the title string for the given observable state: `MM:SS Work` or
/// `MM:SS Break` while running, the fixed idle title otherwise.
#[must_use]
pub fn title_for(view: &TimerView) -> String {
    if view.phase == TimerPhase::Running {
        format!("{} {}", format_mm_ss(view.display_seconds), view.mode.label())
    } else {
        IDLE_TITLE.to_string()
    }
}

// ============================================================================
// Tests
// ============================================================================
