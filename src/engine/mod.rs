//! Timer engine for Poro Focus.
//!
//! This module contains the core countdown machinery:
//! - `clock`: clock abstraction so tests can control time
//! - `session`: drift-corrected work/break state machine
//! - `runtime`: tokio tick loop, settle-delay scheduling and event emission

pub mod clock;
pub mod runtime;
pub mod session;

pub use clock::{Clock, ManualClock, SystemClock};
pub use runtime::{TimerEngine, TimerEvent, SETTLE_DELAY};
pub use session::{EngineError, TimerSession};
