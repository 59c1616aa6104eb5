#![forbid(unsafe_code)]

//! Lifecycle signals and the event → target mapping.
//!
//! Each DOM signal is one [`LifecycleEvent`] variant. [`LifecycleEvent::rule`]
//! is a pure function of the event and the current state, so the mapping can
//! be tested without delivering real events.

use crate::state::LifecycleState;

/// Names of the window events a tracker listens to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Focus,
    Blur,
    VisibilityChange,
    Freeze,
    Resume,
    PageShow,
    PageHide,
    /// Legacy unload signal. Only listened to when enabled in config.
    Unload,
}

impl EventKind {
    /// The signals every tracker listens to.
    pub const LIFECYCLE: [Self; 7] = [
        Self::Focus,
        Self::Blur,
        Self::VisibilityChange,
        Self::Freeze,
        Self::Resume,
        Self::PageShow,
        Self::PageHide,
    ];

    /// DOM event type string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Focus => "focus",
            Self::Blur => "blur",
            Self::VisibilityChange => "visibilitychange",
            Self::Freeze => "freeze",
            Self::Resume => "resume",
            Self::PageShow => "pageshow",
            Self::PageHide => "pagehide",
            Self::Unload => "unload",
        }
    }

    /// Parse a DOM event type string. Matching is exact.
    #[must_use]
    pub fn from_dom(name: &str) -> Option<Self> {
        let kind = match name {
            "focus" => Self::Focus,
            "blur" => Self::Blur,
            "visibilitychange" => Self::VisibilityChange,
            "freeze" => Self::Freeze,
            "resume" => Self::Resume,
            "pageshow" => Self::PageShow,
            "pagehide" => Self::PageHide,
            "unload" => Self::Unload,
            _ => return None,
        };
        Some(kind)
    }
}

/// A received lifecycle signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleEvent {
    Focus,
    Blur,
    VisibilityChange,
    Freeze,
    Resume,
    PageShow,
    /// `persisted` is set when the page is kept for back/forward restoration.
    PageHide { persisted: bool },
    Unload { persisted: bool },
}

/// What a signal asks the tracker to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetRule {
    /// Move toward the state sampled from the environment.
    Resample,
    /// Move toward a fixed state.
    Force(LifecycleState),
    /// Leave the current state alone.
    Ignore,
}

impl LifecycleEvent {
    /// Build an event from a DOM type string and its `persisted` flag.
    ///
    /// `persisted` is only read for `pagehide` and `unload`.
    #[must_use]
    pub fn from_dom(name: &str, persisted: bool) -> Option<Self> {
        EventKind::from_dom(name).map(|kind| Self::from_kind(kind, persisted))
    }

    /// Attach `persisted` to `kind` where the event carries it.
    #[must_use]
    pub const fn from_kind(kind: EventKind, persisted: bool) -> Self {
        match kind {
            EventKind::Focus => Self::Focus,
            EventKind::Blur => Self::Blur,
            EventKind::VisibilityChange => Self::VisibilityChange,
            EventKind::Freeze => Self::Freeze,
            EventKind::Resume => Self::Resume,
            EventKind::PageShow => Self::PageShow,
            EventKind::PageHide => Self::PageHide { persisted },
            EventKind::Unload => Self::Unload { persisted },
        }
    }

    /// The DOM event kind, without payload.
    #[must_use]
    pub const fn kind(self) -> EventKind {
        match self {
            Self::Focus => EventKind::Focus,
            Self::Blur => EventKind::Blur,
            Self::VisibilityChange => EventKind::VisibilityChange,
            Self::Freeze => EventKind::Freeze,
            Self::Resume => EventKind::Resume,
            Self::PageShow => EventKind::PageShow,
            Self::PageHide { .. } => EventKind::PageHide,
            Self::Unload { .. } => EventKind::Unload,
        }
    }

    /// Target rule for this event given the tracker's current state.
    #[must_use]
    pub const fn rule(self, current: LifecycleState) -> TargetRule {
        match self {
            Self::PageShow | Self::Resume => TargetRule::Resample,
            Self::Focus => TargetRule::Force(LifecycleState::Active),
            // `blur` also fires during unload; only an active page loses focus.
            Self::Blur => match current {
                LifecycleState::Active => TargetRule::Resample,
                _ => TargetRule::Ignore,
            },
            Self::PageHide { persisted } | Self::Unload { persisted } => {
                if persisted {
                    TargetRule::Force(LifecycleState::Frozen)
                } else {
                    TargetRule::Force(LifecycleState::Terminated)
                }
            }
            // Visibility drops to hidden while unloading; frozen and
            // terminated pages keep their state.
            Self::VisibilityChange => match current {
                LifecycleState::Frozen | LifecycleState::Terminated => TargetRule::Ignore,
                _ => TargetRule::Resample,
            },
            Self::Freeze => TargetRule::Force(LifecycleState::Frozen),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::LifecycleState::*;

    use pretty_assertions::assert_eq;

    #[test]
    fn dom_names_round_trip() {
        for kind in EventKind::LIFECYCLE {
            assert_eq!(EventKind::from_dom(kind.as_str()), Some(kind));
        }
        assert_eq!(EventKind::from_dom("unload"), Some(EventKind::Unload));
        assert_eq!(EventKind::from_dom("beforeunload"), None);
        assert_eq!(LifecycleEvent::from_dom("click", true), None);
    }

    #[test]
    fn lifecycle_set_excludes_unload() {
        assert_eq!(EventKind::LIFECYCLE.len(), 7);
        assert!(!EventKind::LIFECYCLE.contains(&EventKind::Unload));
    }

    #[test]
    fn persisted_only_matters_for_page_hide() {
        assert_eq!(
            LifecycleEvent::from_dom("pagehide", true),
            Some(LifecycleEvent::PageHide { persisted: true })
        );
        assert_eq!(
            LifecycleEvent::from_dom("focus", true),
            Some(LifecycleEvent::Focus)
        );
        assert_eq!(
            LifecycleEvent::Unload { persisted: false }.kind(),
            EventKind::Unload
        );
    }

    #[test]
    fn focus_and_freeze_force_their_state() {
        for current in LifecycleState::ALL {
            assert_eq!(
                LifecycleEvent::Focus.rule(current),
                TargetRule::Force(Active)
            );
            assert_eq!(
                LifecycleEvent::Freeze.rule(current),
                TargetRule::Force(Frozen)
            );
        }
    }

    #[test]
    fn page_show_and_resume_always_resample() {
        for current in LifecycleState::ALL {
            assert_eq!(LifecycleEvent::PageShow.rule(current), TargetRule::Resample);
            assert_eq!(LifecycleEvent::Resume.rule(current), TargetRule::Resample);
        }
    }

    #[test]
    fn blur_only_resamples_when_active() {
        assert_eq!(LifecycleEvent::Blur.rule(Active), TargetRule::Resample);
        for current in [Unknown, Passive, Hidden, Frozen, Terminated] {
            assert_eq!(LifecycleEvent::Blur.rule(current), TargetRule::Ignore);
        }
    }

    #[test]
    fn visibility_change_ignored_when_frozen_or_terminated() {
        assert_eq!(
            LifecycleEvent::VisibilityChange.rule(Frozen),
            TargetRule::Ignore
        );
        assert_eq!(
            LifecycleEvent::VisibilityChange.rule(Terminated),
            TargetRule::Ignore
        );
        for current in [Unknown, Active, Passive, Hidden] {
            assert_eq!(
                LifecycleEvent::VisibilityChange.rule(current),
                TargetRule::Resample
            );
        }
    }

    #[test]
    fn page_hide_and_unload_split_on_persisted() {
        for event in [
            LifecycleEvent::PageHide { persisted: true },
            LifecycleEvent::Unload { persisted: true },
        ] {
            assert_eq!(event.rule(Active), TargetRule::Force(Frozen));
        }
        for event in [
            LifecycleEvent::PageHide { persisted: false },
            LifecycleEvent::Unload { persisted: false },
        ] {
            assert_eq!(event.rule(Hidden), TargetRule::Force(Terminated));
        }
    }
}
