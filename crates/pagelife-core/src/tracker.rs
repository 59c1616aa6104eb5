#![forbid(unsafe_code)]

//! The lifecycle tracker: authoritative current state plus observers.
//!
//! [`LifecycleTracker::handle`] maps an event to a target, resolves the legal
//! path from the current state, and walks it one step at a time. Every step
//! updates the current state and notifies observers before the next step is
//! taken, so consumers never see a skipped state.
//!
//! # Invariants
//!
//! 1. The current state changes only inside [`LifecycleTracker::handle`].
//! 2. Each emitted step is a legal `(previous, next)` pair from the table.
//! 3. An event whose target equals the current state emits nothing.
//! 4. An unresolvable jump emits nothing and leaves the state unchanged.
//!
//! # Example
//!
//! ```
//! use pagelife_core::event::LifecycleEvent;
//! use pagelife_core::probe::ManualProbe;
//! use pagelife_core::state::LifecycleState;
//! use pagelife_core::tracker::LifecycleTracker;
//!
//! let mut tracker = LifecycleTracker::new(ManualProbe::active());
//! assert_eq!(tracker.state(), LifecycleState::Active);
//!
//! let report = tracker.handle(LifecycleEvent::PageHide { persisted: true });
//! assert_eq!(report.steps(), 3);
//! assert_eq!(tracker.state(), LifecycleState::Frozen);
//! ```

use core::fmt;

use crate::event::{LifecycleEvent, TargetRule};
use crate::probe::{self, EnvironmentProbe};
use crate::state::LifecycleState;
use crate::transitions::resolve_path;

/// One emitted step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StateChange {
    pub previous: LifecycleState,
    pub next: LifecycleState,
}

/// Outcome of handling one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub event: LifecycleEvent,
    /// Target the event mapped to, `None` when the event was ignored.
    pub target: Option<LifecycleState>,
    /// Walked path including the starting state; empty when nothing changed.
    pub path: &'static [LifecycleState],
}

impl Transition {
    /// Number of emitted steps.
    #[must_use]
    pub fn steps(&self) -> usize {
        self.path.len().saturating_sub(1)
    }

    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.path.is_empty()
    }

    /// Emitted steps in order.
    pub fn changes(&self) -> impl Iterator<Item = StateChange> {
        self.path.windows(2).map(|pair| StateChange {
            previous: pair[0],
            next: pair[1],
        })
    }
}

/// Handle for removing an observer.
pub type ObserverId = u64;

type Observer = Box<dyn FnMut(StateChange)>;

/// Tracks the lifecycle state of one page.
pub struct LifecycleTracker<P: EnvironmentProbe> {
    probe: P,
    current: LifecycleState,
    observers: Vec<(ObserverId, Observer)>,
    next_observer: ObserverId,
}

impl<P: EnvironmentProbe> LifecycleTracker<P> {
    /// Create a tracker whose initial state is sampled from `probe`.
    #[must_use]
    pub fn new(probe: P) -> Self {
        let current = probe::sample(&probe);
        crate::debug!(initial = current.as_str(), "lifecycle tracker created");
        Self {
            probe,
            current,
            observers: Vec::new(),
            next_observer: 0,
        }
    }

    /// The authoritative current state.
    #[must_use]
    pub fn state(&self) -> LifecycleState {
        self.current
    }

    /// Whether this page instance was restored after a discard.
    ///
    /// Independent of the tracked state.
    #[must_use]
    pub fn was_discarded(&self) -> bool {
        self.probe.was_discarded()
    }

    /// Mutable access to the probe, for hosts that push environment changes.
    pub fn probe_mut(&mut self) -> &mut P {
        &mut self.probe
    }

    /// Register an observer called synchronously on every emitted step.
    pub fn subscribe(&mut self, observer: impl FnMut(StateChange) + 'static) -> ObserverId {
        let id = self.next_observer;
        self.next_observer += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Remove an observer. Returns `false` if `id` was not registered.
    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(observer_id, _)| *observer_id != id);
        self.observers.len() != before
    }

    /// Number of registered observers.
    #[must_use]
    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    /// Handle an event by DOM type name. Unrecognized names are ignored.
    pub fn handle_dom(&mut self, name: &str, persisted: bool) -> Option<Transition> {
        LifecycleEvent::from_dom(name, persisted).map(|event| self.handle(event))
    }

    /// Advance the current state toward the target of `event`.
    pub fn handle(&mut self, event: LifecycleEvent) -> Transition {
        let target = match event.rule(self.current) {
            TargetRule::Resample => probe::sample(&self.probe),
            TargetRule::Force(state) => state,
            TargetRule::Ignore => {
                crate::debug!(event = event.kind().as_str(), state = self.current.as_str(), "event ignored");
                return Transition {
                    event,
                    target: None,
                    path: &[],
                };
            }
        };

        let path: &'static [LifecycleState] = if target == self.current {
            &[]
        } else {
            resolve_path(self.current, target)
        };
        if path.is_empty() && target != self.current {
            crate::debug!(
                from = self.current.as_str(),
                to = target.as_str(),
                "no legal path; state unchanged"
            );
        }

        for &next in path.iter().skip(1) {
            let change = StateChange {
                previous: self.current,
                next,
            };
            self.current = next;
            crate::trace!(
                previous = change.previous.as_str(),
                next = change.next.as_str(),
                "lifecycle state changed"
            );
            for (_, observer) in &mut self.observers {
                observer(change);
            }
        }

        Transition {
            event,
            target: Some(target),
            path,
        }
    }
}

impl<P: EnvironmentProbe + fmt::Debug> fmt::Debug for LifecycleTracker<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LifecycleTracker")
            .field("probe", &self.probe)
            .field("current", &self.current)
            .field("observers", &self.observers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probe::{ManualProbe, NullProbe, Visibility};
    use crate::state::LifecycleState::*;

    use std::cell::RefCell;
    use std::rc::Rc;

    use pretty_assertions::assert_eq;

    fn recorded(tracker: &mut LifecycleTracker<ManualProbe>) -> Rc<RefCell<Vec<StateChange>>> {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        tracker.subscribe(move |change| sink.borrow_mut().push(change));
        log
    }

    #[test]
    fn initial_state_is_sampled() {
        assert_eq!(LifecycleTracker::new(ManualProbe::active()).state(), Active);
        assert_eq!(LifecycleTracker::new(ManualProbe::passive()).state(), Passive);
        assert_eq!(LifecycleTracker::new(ManualProbe::hidden()).state(), Hidden);
        assert_eq!(LifecycleTracker::new(NullProbe).state(), Unknown);
    }

    #[test]
    fn same_target_is_a_noop() {
        let mut tracker = LifecycleTracker::new(ManualProbe::active());
        let log = recorded(&mut tracker);
        let report = tracker.handle(LifecycleEvent::Focus);
        assert!(report.is_noop());
        assert_eq!(report.target, Some(Active));
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn observers_see_each_step_in_order() {
        let mut tracker = LifecycleTracker::new(ManualProbe::active());
        let log = recorded(&mut tracker);
        let report = tracker.handle(LifecycleEvent::PageHide { persisted: false });
        assert_eq!(report.steps(), 3);
        assert_eq!(
            *log.borrow(),
            vec![
                StateChange { previous: Active, next: Passive },
                StateChange { previous: Passive, next: Hidden },
                StateChange { previous: Hidden, next: Terminated },
            ]
        );
        assert_eq!(report.changes().collect::<Vec<_>>(), *log.borrow());
    }

    #[test]
    fn ignored_event_reports_no_target() {
        let mut tracker = LifecycleTracker::new(ManualProbe::passive());
        let report = tracker.handle(LifecycleEvent::Blur);
        assert_eq!(report.target, None);
        assert!(report.is_noop());
        assert_eq!(tracker.state(), Passive);
    }

    #[test]
    fn unresolvable_jump_leaves_state() {
        let mut tracker = LifecycleTracker::new(NullProbe);
        let report = tracker.handle(LifecycleEvent::Focus);
        assert_eq!(report.target, Some(Active));
        assert!(report.is_noop());
        assert_eq!(tracker.state(), Unknown);
    }

    #[test]
    fn unsubscribe_stops_notifications() {
        let mut tracker = LifecycleTracker::new(ManualProbe::active());
        let log = Rc::new(RefCell::new(0usize));
        let sink = Rc::clone(&log);
        let id = tracker.subscribe(move |_| *sink.borrow_mut() += 1);
        assert_eq!(tracker.observer_count(), 1);

        tracker.probe_mut().set_focus(false);
        tracker.handle(LifecycleEvent::Blur);
        assert_eq!(*log.borrow(), 1);

        assert!(tracker.unsubscribe(id));
        assert!(!tracker.unsubscribe(id));
        tracker.handle(LifecycleEvent::Focus);
        assert_eq!(*log.borrow(), 1);
        assert_eq!(tracker.state(), Active);
    }

    #[test]
    fn handle_dom_ignores_unknown_names() {
        let mut tracker = LifecycleTracker::new(ManualProbe::active());
        assert!(tracker.handle_dom("scroll", false).is_none());
        tracker.probe_mut().set_visibility(Visibility::Hidden);
        let report = tracker.handle_dom("visibilitychange", false).unwrap();
        assert_eq!(report.path, [Active, Passive, Hidden]);
    }

    #[test]
    fn discard_flag_comes_from_the_probe() {
        let mut tracker = LifecycleTracker::new(ManualProbe::hidden());
        assert!(!tracker.was_discarded());
        tracker.probe_mut().set_discarded(true);
        assert!(tracker.was_discarded());
        assert_eq!(tracker.state(), Hidden);
    }
}
