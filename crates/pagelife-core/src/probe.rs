#![forbid(unsafe_code)]

//! Environment probes and the current-state sampler.
//!
//! The tracker never reads host globals directly. It asks an
//! [`EnvironmentProbe`], which the web binding implements over `document`
//! and tests implement with [`ManualProbe`].

use crate::state::LifecycleState;

/// Document visibility as reported by the host.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Visibility {
    #[default]
    Visible,
    /// `document.visibilityState == "hidden"`.
    Hidden,
}

/// Read-only view of the ambient page environment.
pub trait EnvironmentProbe {
    /// Whether a host document/window exists at all.
    fn is_available(&self) -> bool {
        true
    }

    /// Current document visibility.
    fn sample_visibility(&self) -> Visibility;

    /// Whether the document currently has input focus.
    fn sample_focus(&self) -> bool;

    /// Whether this page instance was restored after being discarded while hidden.
    fn was_discarded(&self) -> bool {
        false
    }
}

impl<P: EnvironmentProbe + ?Sized> EnvironmentProbe for &P {
    fn is_available(&self) -> bool {
        (**self).is_available()
    }

    fn sample_visibility(&self) -> Visibility {
        (**self).sample_visibility()
    }

    fn sample_focus(&self) -> bool {
        (**self).sample_focus()
    }

    fn was_discarded(&self) -> bool {
        (**self).was_discarded()
    }
}

/// Instantaneous lifecycle state derived from visibility and focus.
///
/// Hidden wins over focus; a visible document is `Active` when focused and
/// `Passive` otherwise. Without a host this is always `Unknown`.
#[must_use]
pub fn sample<P: EnvironmentProbe + ?Sized>(probe: &P) -> LifecycleState {
    if !probe.is_available() {
        return LifecycleState::Unknown;
    }
    if probe.sample_visibility() == Visibility::Hidden {
        return LifecycleState::Hidden;
    }
    if probe.sample_focus() {
        LifecycleState::Active
    } else {
        LifecycleState::Passive
    }
}

/// Probe for non-interactive contexts (no document, no window).
#[derive(Debug, Default, Clone, Copy)]
pub struct NullProbe;

impl EnvironmentProbe for NullProbe {
    fn is_available(&self) -> bool {
        false
    }

    fn sample_visibility(&self) -> Visibility {
        Visibility::Visible
    }

    fn sample_focus(&self) -> bool {
        false
    }
}

/// Host-driven probe whose signals are set explicitly.
///
/// Useful for tests and for hosts that push visibility/focus changes
/// themselves instead of exposing a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManualProbe {
    /// `false` models a host without a document.
    pub available: bool,
    pub visibility: Visibility,
    pub focused: bool,
    /// Reported by [`EnvironmentProbe::was_discarded`].
    pub discarded: bool,
}

impl ManualProbe {
    /// A visible, focused document.
    #[must_use]
    pub const fn active() -> Self {
        Self {
            available: true,
            visibility: Visibility::Visible,
            focused: true,
            discarded: false,
        }
    }

    /// A visible document without focus.
    #[must_use]
    pub const fn passive() -> Self {
        Self {
            focused: false,
            ..Self::active()
        }
    }

    /// A hidden document without focus.
    #[must_use]
    pub const fn hidden() -> Self {
        Self {
            visibility: Visibility::Hidden,
            focused: false,
            ..Self::active()
        }
    }

    /// Set the visibility returned by the next sample.
    pub fn set_visibility(&mut self, visibility: Visibility) {
        self.visibility = visibility;
    }

    /// Set whether the next sample sees a focused document.
    pub fn set_focus(&mut self, focused: bool) {
        self.focused = focused;
    }

    /// Set the discard flag.
    pub fn set_discarded(&mut self, discarded: bool) {
        self.discarded = discarded;
    }
}

impl Default for ManualProbe {
    fn default() -> Self {
        Self::active()
    }
}

impl EnvironmentProbe for ManualProbe {
    fn is_available(&self) -> bool {
        self.available
    }

    fn sample_visibility(&self) -> Visibility {
        self.visibility
    }

    fn sample_focus(&self) -> bool {
        self.focused
    }

    fn was_discarded(&self) -> bool {
        self.discarded
    }
}
