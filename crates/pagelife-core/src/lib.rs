#![forbid(unsafe_code)]

//! Core: page lifecycle states, legal transitions, and event mapping.
//!
//! Host bindings feed window events into a [`tracker::LifecycleTracker`] and
//! read back a state sequence that never skips a step, whatever order (or
//! subset) of events the browser actually delivered.

pub mod config;
pub mod dispatch;
pub mod event;
pub mod logging;
pub mod probe;
pub mod state;
pub mod subscription;
pub mod tracker;
pub mod transitions;

pub use config::{ConfigError, TrackerConfig};
pub use dispatch::{ChangeSink, Dispatcher};
pub use event::{EventKind, LifecycleEvent};
pub use probe::{EnvironmentProbe, Visibility};
pub use state::LifecycleState;
pub use tracker::{LifecycleTracker, StateChange, Transition};

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{debug, trace, warn};
