//! Async runtime for the timer session.
//!
//! This module provides the glue between the synchronous [`TimerSession`]
//! state machine and the tokio event loop:
//! - A 1-second tick task that re-evaluates the countdown
//! - The deferred mode flip after an interval completes (settle delay)
//! - Event emission for the notification sink

use std::sync::Arc;

use tokio::sync::{mpsc, Mutex};
use tokio::time::{interval, sleep, Duration, MissedTickBehavior};
use tracing::debug;

use crate::types::{TimerConfig, TimerMode, TimerView};

use super::clock::SystemClock;
use super::session::TimerSession;

/// Delay between an interval's completion cue and the automatic start of the
/// opposite interval. Long enough for the cue to be heard before the next
/// countdown appears.
pub const SETTLE_DELAY: Duration = Duration::from_secs(3);

// ============================================================================
// TimerEvent
// ============================================================================

/// Structured events emitted by the engine for external collaborators.
///
/// The engine never renders anything itself; the notification sink decides
/// how to turn these into sound cues and title strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimerEvent {
    /// One second elapsed while running
    Tick {
        /// Current observable state
        view: TimerView,
    },
    /// An interval's countdown reached zero
    IntervalEnded {
        /// The mode whose interval just ended
        mode: TimerMode,
    },
    /// The opposite interval was primed and started after the settle delay
    IntervalStarted {
        /// The newly running mode
        mode: TimerMode,
    },
    /// The countdown was frozen mid-interval
    Paused {
        /// Observable state at the moment of pausing
        view: TimerView,
    },
    /// The timer returned to editing (reset, mode toggle, duration change)
    Idle,
}

// ============================================================================
// TimerEngine
// ============================================================================

/// Shared handle around the timer session: control surface plus tick loop.
///
/// Cloning is cheap; all clones drive the same session.
#[derive(Clone)]
pub struct TimerEngine {
    session: Arc<Mutex<TimerSession<SystemClock>>>,
    event_tx: mpsc::UnboundedSender<TimerEvent>,
    settle_delay: Duration,
}

impl TimerEngine {
    /// Creates a new engine with the given configuration and event channel.
    pub fn new(config: TimerConfig, event_tx: mpsc::UnboundedSender<TimerEvent>) -> Self {
        Self {
            session: Arc::new(Mutex::new(TimerSession::new(config, SystemClock))),
            event_tx,
            settle_delay: SETTLE_DELAY,
        }
    }

    /// Overrides the settle delay (tests).
    #[must_use]
    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }

    /// Runs the tick loop.
    ///
    /// Ticks every second; skipped ticks are dropped rather than bursted, and
    /// the deadline-based session absorbs any tick lateness. Should be spawned
    /// as its own task.
    pub async fn run(&self) {
        let mut ticker = interval(Duration::from_secs(1));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;

            let mut session = self.session.lock().await;
            if !session.is_running() {
                continue;
            }

            if let Some(ended) = session.refresh() {
                let generation = session.generation();
                drop(session);

                let _ = self.event_tx.send(TimerEvent::IntervalEnded { mode: ended });
                self.schedule_cycle(generation);
            } else {
                let _ = self.event_tx.send(TimerEvent::Tick {
                    view: session.view(),
                });
            }
        }
    }

    /// Schedules the deferred mode flip.
    ///
    /// The flip only fires if no control operation lands during the settle
    /// delay; `advance_cycle` checks the captured generation.
    fn schedule_cycle(&self, generation: u64) {
        let session = Arc::clone(&self.session);
        let event_tx = self.event_tx.clone();
        let delay = self.settle_delay;

        tokio::spawn(async move {
            sleep(delay).await;

            let mut session = session.lock().await;
            if session.advance_cycle(generation) {
                let _ = event_tx.send(TimerEvent::IntervalStarted {
                    mode: session.mode(),
                });
            } else {
                debug!("deferred mode flip superseded by a newer control call");
            }
        });
    }

    // ------------------------------------------------------------------------
    // Control surface
    // ------------------------------------------------------------------------

    /// Starts, pauses or resumes the countdown.
    pub async fn toggle(&self) -> TimerView {
        let mut session = self.session.lock().await;
        let was_running = session.is_running();
        session.toggle();
        let view = session.view();
        drop(session);

        let event = if was_running {
            TimerEvent::Paused { view: view.clone() }
        } else {
            TimerEvent::IntervalStarted { mode: view.mode }
        };
        let _ = self.event_tx.send(event);
        view
    }

    /// Resets the timer back to editing the work duration.
    pub async fn reset(&self) -> TimerView {
        let mut session = self.session.lock().await;
        session.reset();
        let view = session.view();
        drop(session);

        let _ = self.event_tx.send(TimerEvent::Idle);
        view
    }

    /// Switches between work and break mode.
    pub async fn toggle_mode(&self) -> TimerView {
        let mut session = self.session.lock().await;
        session.toggle_mode();
        let view = session.view();
        drop(session);

        let _ = self.event_tx.send(TimerEvent::Idle);
        view
    }

    /// Sets the work duration. The caller validates bounds.
    pub async fn set_work_minutes(&self, minutes: u32) -> TimerView {
        let mut session = self.session.lock().await;
        session.set_work_minutes(minutes);
        let view = session.view();
        drop(session);

        let _ = self.event_tx.send(TimerEvent::Idle);
        view
    }

    /// Sets the break duration. The caller validates bounds.
    pub async fn set_break_minutes(&self, minutes: u32) -> TimerView {
        let mut session = self.session.lock().await;
        session.set_break_minutes(minutes);
        let view = session.view();
        drop(session);

        let _ = self.event_tx.send(TimerEvent::Idle);
        view
    }

    /// Enables or disables sound cues.
    pub async fn set_sound_enabled(&self, enabled: bool) -> TimerView {
        let mut session = self.session.lock().await;
        session.set_sound_enabled(enabled);
        session.view()
    }

    /// Returns the current observable state and configuration.
    pub async fn snapshot(&self) -> (TimerView, TimerConfig) {
        let session = self.session.lock().await;
        (session.view(), session.config().clone())
    }
}

// ============================================================================
// Tests
// ============================================================================
