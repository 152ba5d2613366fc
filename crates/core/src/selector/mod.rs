//! Selector state machines.
//!
//! Both pickers are explicit state objects with pure transition functions,
//! so the interaction logic is unit-testable without a rendering harness.
//! The web layer serializes them into query parameters and replays clicks
//! server-side.

pub mod range;
pub mod slot;

use crate::window::WindowError;

/// Errors from a selector commit.
///
/// All of these are local and recoverable: the UI disables conflicting
/// choices proactively, and commit re-checks defensively because the
/// rendered blocked-set may be stale relative to an edit completed
/// elsewhere in the session.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectorError {
    /// The selection has not reached a committable state.
    #[error("selection is incomplete")]
    Incomplete,
    /// The selected window is structurally invalid (zero nights, inverted).
    #[error(transparent)]
    InvalidWindow(#[from] WindowError),
    /// The selected window overlaps an existing confirmed booking.
    #[error("the selected window is no longer available")]
    Conflict,
}
