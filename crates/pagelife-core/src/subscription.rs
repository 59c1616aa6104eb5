#![forbid(unsafe_code)]

//! Listener registration for lifecycle signals.
//!
//! A [`ListenerSet`] registers one listener per configured [`EventKind`] on
//! attach and removes exactly those on detach. Detaching twice, or dropping
//! after a detach, does nothing.

use crate::config::TrackerConfig;
use crate::event::EventKind;

/// Something window-like that lifecycle listeners attach to.
pub trait ListenerTarget {
    /// Error reported by the host when registration fails.
    type Error;

    fn add_listener(&mut self, kind: EventKind, capture: bool) -> Result<(), Self::Error>;

    fn remove_listener(&mut self, kind: EventKind, capture: bool) -> Result<(), Self::Error>;
}

/// Registration state for the lifecycle listeners of one tracker.
#[derive(Debug)]
pub struct ListenerSet<T: ListenerTarget> {
    target: T,
    kinds: Vec<EventKind>,
    capture: bool,
    /// Kinds currently registered on `target`.
    attached: Vec<EventKind>,
}

impl<T: ListenerTarget> ListenerSet<T> {
    /// Listeners for `config.event_kinds()` on `target`, not yet attached.
    #[must_use]
    pub fn new(target: T, config: &TrackerConfig) -> Self {
        Self {
            target,
            kinds: config.event_kinds(),
            capture: config.capture,
            attached: Vec::new(),
        }
    }

    /// Register every configured listener that is not already registered.
    ///
    /// Stops at the first failure; listeners registered so far stay attached
    /// and are removed by [`detach`](Self::detach).
    pub fn attach(&mut self) -> Result<(), T::Error> {
        for &kind in &self.kinds {
            if self.attached.contains(&kind) {
                continue;
            }
            self.target.add_listener(kind, self.capture)?;
            self.attached.push(kind);
        }
        crate::debug!(listeners = self.attached.len(), "lifecycle listeners attached");
        Ok(())
    }

    /// Remove every registered listener. Idempotent.
    ///
    /// Removal failures are logged and the listener is forgotten anyway, so a
    /// second detach never retries.
    pub fn detach(&mut self) {
        if self.attached.is_empty() {
            return;
        }
        for kind in self.attached.drain(..) {
            if self.target.remove_listener(kind, self.capture).is_err() {
                crate::warn!(event = kind.as_str(), "failed to remove lifecycle listener");
            }
        }
        crate::debug!("lifecycle listeners detached");
    }

    /// Whether at least one listener is registered.
    #[must_use]
    pub fn is_attached(&self) -> bool {
        !self.attached.is_empty()
    }
}

impl<T: ListenerTarget> Drop for ListenerSet<T> {
    fn drop(&mut self) {
        self.detach();
    }
}
