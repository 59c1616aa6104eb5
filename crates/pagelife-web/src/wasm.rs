#![forbid(unsafe_code)]

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use js_sys::{Function, JSON, Reflect};
use pagelife_core::dispatch::{ChangeSink, Dispatcher};
use pagelife_core::event::{EventKind, LifecycleEvent};
use pagelife_core::probe::{EnvironmentProbe, Visibility};
use pagelife_core::state::LifecycleState;
use pagelife_core::subscription::{ListenerSet, ListenerTarget};
use pagelife_core::tracker::{LifecycleTracker, StateChange};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, PageTransitionEvent, VisibilityState, Window};

use crate::config_from_json;

/// Probe over the global `document`.
///
/// Without a document (workers, server rendering) every sample is `unknown`.
#[derive(Debug, Clone, Default)]
pub struct WebProbe {
    document: Option<Document>,
}

impl WebProbe {
    #[must_use]
    pub fn from_global() -> Self {
        Self {
            document: web_sys::window().and_then(|window| window.document()),
        }
    }
}

impl EnvironmentProbe for WebProbe {
    fn is_available(&self) -> bool {
        self.document.is_some()
    }

    fn sample_visibility(&self) -> Visibility {
        match self.document.as_ref().map(Document::visibility_state) {
            Some(VisibilityState::Hidden) => Visibility::Hidden,
            _ => Visibility::Visible,
        }
    }

    fn sample_focus(&self) -> bool {
        self.document
            .as_ref()
            .and_then(|document| document.has_focus().ok())
            .unwrap_or(false)
    }

    /// Reads the non-standard `document.wasDiscarded` flag.
    fn was_discarded(&self) -> bool {
        self.document
            .as_ref()
            .and_then(|document| Reflect::get(document, &JsValue::from_str("wasDiscarded")).ok())
            .and_then(|flag| flag.as_bool())
            .unwrap_or(false)
    }
}

/// `window` plus the single handler shared by every lifecycle listener.
struct DomTarget {
    window: Window,
    handler: Closure<dyn FnMut(web_sys::Event)>,
}

impl ListenerTarget for DomTarget {
    type Error = JsValue;

    fn add_listener(&mut self, kind: EventKind, capture: bool) -> Result<(), JsValue> {
        self.window.add_event_listener_with_callback_and_bool(
            kind.as_str(),
            self.handler.as_ref().unchecked_ref(),
            capture,
        )
    }

    fn remove_listener(&mut self, kind: EventKind, capture: bool) -> Result<(), JsValue> {
        self.window.remove_event_listener_with_callback_and_bool(
            kind.as_str(),
            self.handler.as_ref().unchecked_ref(),
            capture,
        )
    }
}

/// JS callbacks registered through `onChange`.
#[derive(Default)]
struct JsCallbacks {
    callbacks: RefCell<Vec<(u32, Function)>>,
    next_id: Cell<u32>,
}

impl ChangeSink for JsCallbacks {
    fn deliver(&self, change: StateChange) {
        // Snapshot so a callback can call `offChange` on itself.
        let callbacks: Vec<Function> = self
            .callbacks
            .borrow()
            .iter()
            .map(|(_, callback)| callback.clone())
            .collect();
        let next = JsValue::from_str(change.next.as_str());
        let previous = JsValue::from_str(change.previous.as_str());
        for callback in &callbacks {
            if let Err(err) = callback.call2(&JsValue::NULL, &next, &previous) {
                tracing::warn!(?err, next = change.next.as_str(), "lifecycle callback threw");
            }
        }
    }
}

type WebDispatcher = Dispatcher<WebProbe, JsCallbacks>;

fn dispatch_dom_event(dispatcher: &WebDispatcher, event: &web_sys::Event) {
    let persisted = event
        .dyn_ref::<PageTransitionEvent>()
        .is_some_and(PageTransitionEvent::persisted);
    if let Some(event) = LifecycleEvent::from_dom(&event.type_(), persisted) {
        dispatcher.dispatch(event);
    }
}

/// Page lifecycle tracker bound to the global `window`.
///
/// Listeners are registered on construction and removed by `destroy()` or
/// when the object is freed.
#[wasm_bindgen]
pub struct PageLifecycle {
    dispatcher: Rc<WebDispatcher>,
    listeners: ListenerSet<DomTarget>,
}

#[wasm_bindgen]
impl PageLifecycle {
    /// Mount a tracker. `options` may be `{ capture?: boolean, listenUnload?: boolean }`.
    #[wasm_bindgen(constructor)]
    pub fn new(options: Option<JsValue>) -> Result<PageLifecycle, JsValue> {
        let json = match options.filter(|value| !value.is_undefined() && !value.is_null()) {
            Some(value) => Some(String::from(JSON::stringify(&value)?)),
            None => None,
        };
        let config =
            config_from_json(json.as_deref()).map_err(|err| JsValue::from_str(&err.to_string()))?;
        let window =
            web_sys::window().ok_or_else(|| JsValue::from_str("pagelife: no global window"))?;

        let dispatcher = Rc::new(Dispatcher::new(
            LifecycleTracker::new(WebProbe::from_global()),
            JsCallbacks::default(),
        ));

        let handler_dispatcher = Rc::clone(&dispatcher);
        let handler = Closure::<dyn FnMut(web_sys::Event)>::new(move |event: web_sys::Event| {
            dispatch_dom_event(&handler_dispatcher, &event);
        });
        let mut listeners = ListenerSet::new(DomTarget { window, handler }, &config);
        listeners.attach()?;

        Ok(Self {
            dispatcher,
            listeners,
        })
    }

    /// Current lifecycle state name.
    pub fn state(&self) -> String {
        self.lifecycle_state().as_str().to_owned()
    }

    /// Whether this page instance was restored after being discarded.
    #[wasm_bindgen(js_name = wasDiscarded)]
    pub fn was_discarded(&self) -> bool {
        self.dispatcher.tracker().was_discarded()
    }

    /// Register `callback(next, previous)` for every emitted step.
    #[wasm_bindgen(js_name = onChange)]
    pub fn on_change(&self, callback: Function) -> u32 {
        let sink = self.dispatcher.sink();
        let id = sink.next_id.get();
        sink.next_id.set(id.wrapping_add(1));
        sink.callbacks.borrow_mut().push((id, callback));
        id
    }

    /// Remove a callback. Returns `false` if `id` was not registered.
    #[wasm_bindgen(js_name = offChange)]
    pub fn off_change(&self, id: u32) -> bool {
        let mut callbacks = self.dispatcher.sink().callbacks.borrow_mut();
        let before = callbacks.len();
        callbacks.retain(|(callback_id, _)| *callback_id != id);
        callbacks.len() != before
    }

    #[wasm_bindgen(js_name = isAttached)]
    pub fn is_attached(&self) -> bool {
        self.listeners.is_attached()
    }

    /// Remove every window listener and callback. Safe to call repeatedly.
    pub fn destroy(&mut self) {
        self.listeners.detach();
        self.dispatcher.sink().callbacks.borrow_mut().clear();
    }
}

impl PageLifecycle {
    /// Current state for Rust callers.
    ///
    /// Inside a callback this is the step being delivered.
    #[must_use]
    pub fn lifecycle_state(&self) -> LifecycleState {
        self.dispatcher.state()
    }
}
