#![forbid(unsafe_code)]

//! Legal transition sequences and the path resolver.
//!
//! Browsers do not fire every lifecycle event in every situation, so an
//! observer can see a page jump straight from `active` to `hidden`. The table
//! below lists each real-world path a page travels; [`resolve_path`] uses it
//! to backfill the states that were skipped.
//!
//! # Invariants
//!
//! 1. Within one sequence, each state appears at most once.
//! 2. `Unknown` appears in no sequence.
//! 3. `Terminated` only ever appears last.
//! 4. Sequences are scanned in declared order and the first match wins, so
//!    the more common path is listed first.
//!
//! # Example
//!
//! ```
//! use pagelife_core::state::LifecycleState::*;
//! use pagelife_core::transitions::resolve_path;
//!
//! assert_eq!(resolve_path(Hidden, Active), [Hidden, Passive, Active]);
//! assert_eq!(resolve_path(Frozen, Active), [Frozen, Active]);
//! assert!(resolve_path(Terminated, Active).is_empty());
//! ```

use crate::state::LifecycleState::{self, Active, Frozen, Hidden, Passive, Terminated};

/// Every legal transition sequence, in priority order.
///
/// See <https://developer.chrome.com/docs/web-platform/page-lifecycle-api>.
pub static LEGAL_TRANSITIONS: &[&[LifecycleState]] = &[
    // Normal unload.
    &[Active, Passive, Hidden, Terminated],
    // Active page freezes, or an unloading page enters the back/forward cache.
    &[Active, Passive, Hidden, Frozen],
    // Hidden page becomes active again.
    &[Hidden, Passive, Active],
    // Frozen page resumes.
    &[Frozen, Hidden],
    // Page restored from the back/forward cache.
    &[Frozen, Active],
    &[Frozen, Passive],
];

/// Ordered states from `from` to `to` inclusive, or an empty slice when no
/// sequence contains `to` strictly after `from`.
///
/// An empty result also covers `from == to`. The returned slice borrows the
/// static table, so resolving never allocates.
#[must_use]
pub fn resolve_path(from: LifecycleState, to: LifecycleState) -> &'static [LifecycleState] {
    for sequence in LEGAL_TRANSITIONS {
        let from_idx = sequence.iter().position(|&s| s == from);
        let to_idx = sequence.iter().position(|&s| s == to);
        if let (Some(start), Some(end)) = (from_idx, to_idx) {
            if end > start {
                return &sequence[start..=end];
            }
        }
    }
    &[]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::LifecycleState::Unknown;

    use pretty_assertions::assert_eq;

    #[test]
    fn table_has_no_duplicates_within_a_sequence() {
        for sequence in LEGAL_TRANSITIONS {
            for (i, a) in sequence.iter().enumerate() {
                assert!(
                    !sequence[i + 1..].contains(a),
                    "{a} repeated in {sequence:?}"
                );
            }
        }
    }

    #[test]
    fn unknown_is_absent_and_terminated_is_last() {
        for sequence in LEGAL_TRANSITIONS {
            assert!(!sequence.contains(&Unknown));
            if let Some(pos) = sequence.iter().position(|&s| s == Terminated) {
                assert_eq!(pos, sequence.len() - 1);
            }
        }
    }

    #[test]
    fn hidden_to_active_goes_through_passive() {
        assert_eq!(resolve_path(Hidden, Active), [Hidden, Passive, Active]);
    }

    #[test]
    fn frozen_to_active_is_direct() {
        assert_eq!(resolve_path(Frozen, Active), [Frozen, Active]);
    }

    #[test]
    fn active_to_terminated_is_the_full_unload_path() {
        assert_eq!(
            resolve_path(Active, Terminated),
            [Active, Passive, Hidden, Terminated]
        );
    }

    #[test]
    fn active_to_frozen_falls_through_to_second_sequence() {
        assert_eq!(
            resolve_path(Active, Frozen),
            [Active, Passive, Hidden, Frozen]
        );
    }

    #[test]
    fn passive_to_hidden_prefers_first_sequence() {
        // Present in sequences 1 and 2; the slice comes from the first.
        let path = resolve_path(Passive, Hidden);
        assert_eq!(path, [Passive, Hidden]);
        assert!(core::ptr::eq(path, &LEGAL_TRANSITIONS[0][1..3]));
    }

    #[test]
    fn frozen_to_passive_uses_the_direct_restore() {
        assert_eq!(resolve_path(Frozen, Passive), [Frozen, Passive]);
    }

    #[test]
    fn hidden_to_terminated_is_the_unload_tail() {
        assert_eq!(resolve_path(Hidden, Terminated), [Hidden, Terminated]);
        assert_eq!(resolve_path(Hidden, Frozen), [Hidden, Frozen]);
    }

    #[test]
    fn unreachable_pairs_are_empty() {
        assert!(resolve_path(Terminated, Active).is_empty());
        assert!(resolve_path(Unknown, Active).is_empty());
        assert!(resolve_path(Active, Unknown).is_empty());
        assert!(resolve_path(Frozen, Terminated).is_empty());
    }

    #[test]
    fn same_state_is_empty() {
        for state in LifecycleState::ALL {
            assert!(resolve_path(state, state).is_empty());
        }
    }
}
