#![forbid(unsafe_code)]

//! Re-entrant event delivery for hosts with foreign callbacks.
//!
//! Host callbacks (JS functions, UI bindings) may synchronously fire another
//! lifecycle event while a step is being delivered, for example by calling
//! `element.focus()`. A [`Dispatcher`] queues such events and handles them
//! only after every step of the current event has reached the sink.
//!
//! # Invariants
//!
//! 1. The sink receives steps as one chain: each step's `previous` is the
//!    `next` of the step before it.
//! 2. Events are handled in arrival order, nested ones after the event being
//!    delivered.
//! 3. No borrow of the tracker is held while the sink runs.
//! 4. Once the outermost [`Dispatcher::dispatch`] returns, [`Dispatcher::state`]
//!    equals the tracker's state.

use std::cell::{Cell, Ref, RefCell, RefMut};
use std::collections::VecDeque;

use crate::event::LifecycleEvent;
use crate::probe::EnvironmentProbe;
use crate::state::LifecycleState;
use crate::tracker::{LifecycleTracker, StateChange};

/// Receiver of delivered steps.
///
/// Takes `&self` so implementations can reach back into the dispatcher.
pub trait ChangeSink {
    /// Called once per emitted step, in path order.
    fn deliver(&self, change: StateChange);
}

/// Tracker wrapper that serializes nested events.
pub struct Dispatcher<P: EnvironmentProbe, S: ChangeSink> {
    tracker: RefCell<LifecycleTracker<P>>,
    sink: S,
    /// Step currently being delivered, valid while `dispatching`.
    delivered: Cell<LifecycleState>,
    dispatching: Cell<bool>,
    pending: RefCell<VecDeque<LifecycleEvent>>,
}

impl<P: EnvironmentProbe, S: ChangeSink> Dispatcher<P, S> {
    /// Wrap `tracker`. Steps go to `sink` only.
    #[must_use]
    pub fn new(tracker: LifecycleTracker<P>, sink: S) -> Self {
        Self {
            delivered: Cell::new(tracker.state()),
            tracker: RefCell::new(tracker),
            sink,
            dispatching: Cell::new(false),
            pending: RefCell::new(VecDeque::new()),
        }
    }

    /// Handle `event`, or queue it if a delivery is already in progress.
    pub fn dispatch(&self, event: LifecycleEvent) {
        self.pending.borrow_mut().push_back(event);
        if self.dispatching.replace(true) {
            crate::trace!(event = event.kind().as_str(), "event queued during delivery");
            return;
        }

        loop {
            let next_event = self.pending.borrow_mut().pop_front();
            let Some(event) = next_event else {
                break;
            };
            let report = self.tracker.borrow_mut().handle(event);
            for change in report.changes() {
                self.delivered.set(change.next);
                self.sink.deliver(change);
            }
        }
        self.dispatching.set(false);
    }

    /// State consumers should observe: the step being delivered during a
    /// delivery, the tracker's state otherwise.
    #[must_use]
    pub fn state(&self) -> LifecycleState {
        if self.dispatching.get() {
            self.delivered.get()
        } else {
            self.tracker.borrow().state()
        }
    }

    /// Whether a delivery is in progress.
    #[must_use]
    pub fn is_dispatching(&self) -> bool {
        self.dispatching.get()
    }

    /// Shared access to the tracker. Valid from inside the sink.
    pub fn tracker(&self) -> Ref<'_, LifecycleTracker<P>> {
        self.tracker.borrow()
    }

    /// Mutable access to the tracker, for hosts that push probe changes.
    pub fn tracker_mut(&self) -> RefMut<'_, LifecycleTracker<P>> {
        self.tracker.borrow_mut()
    }

    /// The sink, for hosts that manage its callbacks.
    pub fn sink(&self) -> &S {
        &self.sink
    }
}
