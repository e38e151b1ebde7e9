//! Narrative engine for Novella.
//!
//! A [`NarrativeEngine`] plays one session of a [`nv_core::ScriptGraph`]. It
//! owns the current position, reveals each node's text one character per
//! tick, runs timed transitions, and pushes [`EngineEvent`]s for a host to
//! render. Time is virtual: the host reports elapsed milliseconds through
//! [`NarrativeEngine::update`], so sessions are fully deterministic.
//!
//! # Quick start
//!
//! ```
//! use nv_engine::{EngineConfig, EngineEvent, NarrativeEngine};
//!
//! let graph = nv_core::demo::script().unwrap();
//! let mut engine = NarrativeEngine::new(graph, EngineConfig::default());
//! engine.start().unwrap();
//! engine.update(300).unwrap();
//!
//! let events = engine.drain_events();
//! assert!(matches!(events[0], EngineEvent::View(_)));
//! ```

/// Virtual time.
pub mod clock;
/// Session configuration.
pub mod config;
/// The state machine.
pub mod engine;
/// Error types.
pub mod error;
/// Events pushed to the host.
pub mod event;
/// The single-slot timer.
pub mod schedule;
/// Session state.
pub mod state;

/// Re-export clock.
pub use clock::EngineClock;
/// Re-export config.
pub use config::{DEFAULT_TICK_INTERVAL_MS, EngineConfig};
/// Re-export the engine.
pub use engine::{Advance, NarrativeEngine, Progress};
/// Re-export error types.
pub use error::{EngineError, EngineResult};
/// Re-export event types.
pub use event::{ChoiceView, ContinueAction, EffectSignal, EngineEvent, RevealProgress, ViewModel};
/// Re-export schedule types.
pub use schedule::{PendingAction, Schedule, ScheduleHandle, Scheduled};
/// Re-export state types.
pub use state::{EngineState, RevealState, SessionId, SessionState};
