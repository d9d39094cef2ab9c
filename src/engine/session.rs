//! Timer session state machine.
//!
//! This is the core of Poro Focus: a drift-corrected countdown over a
//! work/break mode pair. Rather than decrementing a counter once per tick
//! (which accumulates callback jitter), the session stores a single wall-clock
//! `deadline` armed when Running begins, and recomputes the remaining time
//! from it on every read. The displayed countdown therefore tracks true
//! elapsed time regardless of how late individual ticks fire.
//!
//! The session is synchronous and single-threaded; the async glue lives in
//! [`super::runtime`].

use thiserror::Error;
use tokio::time::{Duration, Instant};

use crate::types::{TimerConfig, TimerMode, TimerPhase, TimerView};

use super::clock::Clock;

// ============================================================================
// EngineError
// ============================================================================

/// Errors for misused control operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    /// The timer is already counting down.
    #[error("timer is already running")]
    AlreadyRunning,

    /// The timer is not counting down.
    #[error("timer is not running")]
    NotRunning,

    /// The timer is not paused.
    #[error("timer is not paused")]
    NotPaused,
}

// ============================================================================
// TimerSession
// ============================================================================

/// The sole core entity: mode, phase and the deadline-anchored countdown.
///
/// `generation` increments on every control operation. The runtime captures it
/// when scheduling the deferred mode flip after an interval completes; a flip
/// whose captured generation no longer matches has been superseded by a newer
/// user action and must not fire.
pub struct TimerSession<C: Clock> {
    clock: C,
    config: TimerConfig,
    mode: TimerMode,
    phase: TimerPhase,
    /// Wall-clock instant at which the running interval reaches zero.
    /// Derived state; recomputed whenever Running begins or resumes.
    deadline: Option<Instant>,
    /// Frozen remainder while Paused.
    paused_remaining: u32,
    generation: u64,
}

impl<C: Clock> TimerSession<C> {
    /// Creates a new session editing the work duration.
    pub fn new(config: TimerConfig, clock: C) -> Self {
        Self {
            clock,
            config,
            mode: TimerMode::Work,
            phase: TimerPhase::Editing,
            deadline: None,
            paused_remaining: 0,
            generation: 0,
        }
    }

    // ------------------------------------------------------------------------
    // Control surface
    // ------------------------------------------------------------------------

    /// Starts the current mode's interval from its full configured duration,
    /// or resumes a paused one.
    ///
    /// # Errors
    ///
    /// Returns an error if the timer is already running.
    pub fn start(&mut self) -> Result<(), EngineError> {
        match self.phase {
            TimerPhase::Editing => {
                let duration = self.config.duration_seconds(self.mode);
                self.deadline = Some(self.clock.now() + Duration::from_secs(u64::from(duration)));
                self.phase = TimerPhase::Running;
                self.generation += 1;
                Ok(())
            }
            TimerPhase::Running => Err(EngineError::AlreadyRunning),
            TimerPhase::Paused => self.resume(),
        }
    }

    /// Freezes the countdown mid-interval.
    ///
    /// # Errors
    ///
    /// Returns an error if the timer is not running.
    pub fn pause(&mut self) -> Result<(), EngineError> {
        if self.phase != TimerPhase::Running {
            return Err(EngineError::NotRunning);
        }

        self.paused_remaining = self.remaining_seconds();
        self.deadline = None;
        self.phase = TimerPhase::Paused;
        self.generation += 1;
        Ok(())
    }

    /// Resumes a paused interval with the frozen remainder.
    ///
    /// # Errors
    ///
    /// Returns an error if the timer is not paused.
    pub fn resume(&mut self) -> Result<(), EngineError> {
        if self.phase != TimerPhase::Paused {
            return Err(EngineError::NotPaused);
        }

        self.deadline =
            Some(self.clock.now() + Duration::from_secs(u64::from(self.paused_remaining)));
        self.phase = TimerPhase::Running;
        self.generation += 1;
        Ok(())
    }

    /// The play/pause button: start, pause or resume depending on phase.
    pub fn toggle(&mut self) {
        let result = match self.phase {
            TimerPhase::Editing => self.start(),
            TimerPhase::Running => self.pause(),
            TimerPhase::Paused => self.resume(),
        };
        debug_assert!(result.is_ok());
    }

    /// Resets the timer: back to editing the work duration, countdown cleared.
    pub fn reset(&mut self) {
        self.mode = TimerMode::Work;
        self.clear_countdown();
    }

    /// Switches between work and break mode, clearing the countdown.
    pub fn toggle_mode(&mut self) {
        self.mode = self.mode.opposite();
        self.clear_countdown();
    }

    /// Sets the work duration and returns to editing the work interval.
    ///
    /// Stops the timer if it was running. The caller validates bounds.
    pub fn set_work_minutes(&mut self, minutes: u32) {
        self.config.work_minutes = minutes;
        self.mode = TimerMode::Work;
        self.clear_countdown();
    }

    /// Sets the break duration and returns to editing the break interval.
    ///
    /// Stops the timer if it was running. The caller validates bounds.
    pub fn set_break_minutes(&mut self, minutes: u32) {
        self.config.break_minutes = minutes;
        self.mode = TimerMode::Break;
        self.clear_countdown();
    }

    /// Enables or disables sound cues. Does not disturb the countdown.
    pub fn set_sound_enabled(&mut self, enabled: bool) {
        self.config.sound_enabled = enabled;
    }

    fn clear_countdown(&mut self) {
        self.phase = TimerPhase::Editing;
        self.deadline = None;
        self.paused_remaining = 0;
        self.generation += 1;
    }

    // ------------------------------------------------------------------------
    // Tick protocol
    // ------------------------------------------------------------------------

    /// Re-evaluates the countdown against the clock.
    ///
    /// Returns the mode whose interval just completed, if the deadline has
    /// passed. Completion leaves Running immediately (so a late second tick
    /// cannot produce a duplicate) and parks the session in Editing until the
    /// runtime flips the mode after the settle delay.
    pub fn refresh(&mut self) -> Option<TimerMode> {
        if self.phase != TimerPhase::Running {
            return None;
        }

        if self.remaining_seconds() > 0 {
            return None;
        }

        let ended = self.mode;
        self.phase = TimerPhase::Editing;
        self.deadline = None;
        self.paused_remaining = 0;
        Some(ended)
    }

    /// Performs the deferred mode flip after the settle delay: flips the mode
    /// and immediately primes and starts the opposite interval.
    ///
    /// Returns false without touching state when `expected_generation` no
    /// longer matches, i.e. a control operation landed during the settle
    /// delay and superseded the flip.
    pub fn advance_cycle(&mut self, expected_generation: u64) -> bool {
        if self.generation != expected_generation {
            return false;
        }

        self.mode = self.mode.opposite();
        let duration = self.config.duration_seconds(self.mode);
        self.deadline = Some(self.clock.now() + Duration::from_secs(u64::from(duration)));
        self.phase = TimerPhase::Running;
        true
    }

    // ------------------------------------------------------------------------
    // Observable state
    // ------------------------------------------------------------------------

    /// The authoritative countdown value: `max(0, deadline - now)` while
    /// running, the frozen remainder while paused, 0 while editing.
    #[must_use]
    pub fn remaining_seconds(&self) -> u32 {
        match self.phase {
            TimerPhase::Running => self.deadline.map_or(0, |deadline| {
                let remaining = deadline.saturating_duration_since(self.clock.now());
                u32::try_from(remaining.as_secs()).unwrap_or(u32::MAX)
            }),
            TimerPhase::Paused => self.paused_remaining,
            TimerPhase::Editing => 0,
        }
    }

    /// What the timer digits should show: the full configured duration while
    /// editing, the countdown value otherwise.
    #[must_use]
    pub fn display_seconds(&self) -> u32 {
        match self.phase {
            TimerPhase::Editing => self.config.duration_seconds(self.mode),
            _ => self.remaining_seconds(),
        }
    }

    /// Returns the read-only projection consumed by the presentation layer.
    #[must_use]
    pub fn view(&self) -> TimerView {
        TimerView {
            mode: self.mode,
            phase: self.phase,
            remaining_seconds: self.remaining_seconds(),
            display_seconds: self.display_seconds(),
        }
    }

    /// Returns the current mode.
    #[must_use]
    pub fn mode(&self) -> TimerMode {
        self.mode
    }

    /// Returns the current phase.
    #[must_use]
    pub fn phase(&self) -> TimerPhase {
        self.phase
    }

    /// Returns true while the countdown is active.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.phase == TimerPhase::Running
    }

    /// Returns the current configuration.
    #[must_use]
    pub fn config(&self) -> &TimerConfig {
        &self.config
    }

    /// Returns the control-operation generation counter.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

// ============================================================================
// Tests
// ============================================================================
