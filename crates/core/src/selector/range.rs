//! Two-click date-range picker state machine.
//!
//! A sequence of day clicks becomes a committed `[from, to)` range. The
//! machine never lets a selection span a blocked day: on conflict it
//! discards the old anchor and restarts at the clicked day rather than
//! reporting an error.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::SelectorError;
use crate::availability::is_blocked;
use crate::store::BookingStore;
use crate::types::{BookingId, BookingIntent, Email, RoomId, UserId};
use crate::window::ReservationWindow;

/// Phase of the two-click selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangePhase {
    /// Nothing picked yet.
    Empty,
    /// Check-in anchored, waiting for check-out.
    PendingTo,
    /// Both ends picked.
    Complete,
}

/// Hover preview classification. Presentation-only: previewing never
/// affects the committed selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangePreview {
    /// No preview to draw.
    Idle,
    /// The range that would result if the hovered day were clicked.
    Span { from: NaiveDate, to: NaiveDate },
    /// Hovering backward past the anchor.
    InvalidBackward,
}

/// The two-click selection state: `{from, to}`, each optional.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RangeSelection {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl RangeSelection {
    /// An empty selection.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            from: None,
            to: None,
        }
    }

    /// Rebuild a selection from deserialized parts. A `to` without a `from`
    /// is not a reachable state and collapses to empty.
    #[must_use]
    pub const fn from_parts(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        match (from, to) {
            (None, _) => Self::new(),
            (Some(f), t) => Self { from: Some(f), to: t },
        }
    }

    /// Current phase of the machine.
    #[must_use]
    pub const fn phase(&self) -> RangePhase {
        match (self.from, self.to) {
            (None, _) => RangePhase::Empty,
            (Some(_), None) => RangePhase::PendingTo,
            (Some(_), Some(_)) => RangePhase::Complete,
        }
    }

    /// Whether a calendar day is clickable: not strictly before today
    /// (local date, time-of-day zeroed) and not blocked.
    pub fn day_enabled(
        day: NaiveDate,
        today: NaiveDate,
        blocked: &impl Fn(NaiveDate) -> bool,
    ) -> bool {
        day >= today && !blocked(day)
    }

    /// Apply one day click and return the next state.
    ///
    /// `blocked` is the availability engine's per-day verdict for the room
    /// being booked. Clicks on disabled days leave the state unchanged.
    #[must_use]
    pub fn click(
        &self,
        day: NaiveDate,
        today: NaiveDate,
        blocked: &impl Fn(NaiveDate) -> bool,
    ) -> Self {
        if !Self::day_enabled(day, today, blocked) {
            return *self;
        }

        let restart = Self {
            from: Some(day),
            to: None,
        };

        match (self.from, self.to) {
            // Empty -> anchor the range
            (None, _) => restart,
            // PendingTo -> extend, re-anchor earlier, or restart past a block
            (Some(from), None) => {
                if day < from {
                    return restart;
                }
                // Can't span a blocked day: scan every day in [from, day]
                let spans_block = from
                    .iter_days()
                    .take_while(|d| *d <= day)
                    .any(|d| blocked(d));
                if spans_block {
                    restart
                } else {
                    Self {
                        from: Some(from),
                        to: Some(day),
                    }
                }
            }
            // Complete -> any further click starts a new selection
            (Some(_), Some(_)) => restart,
        }
    }

    /// Preview of the range that would result from clicking the hovered
    /// day, including the distinct invalid state for hovering backward.
    #[must_use]
    pub fn preview(&self, hovered: NaiveDate) -> RangePreview {
        match (self.from, self.to) {
            (Some(from), None) => {
                if hovered < from {
                    RangePreview::InvalidBackward
                } else {
                    RangePreview::Span { from, to: hovered }
                }
            }
            _ => RangePreview::Idle,
        }
    }

    /// The window this selection describes, once both ends are picked.
    #[must_use]
    pub fn window(&self) -> Option<ReservationWindow> {
        match (self.from, self.to) {
            (Some(check_in), Some(check_out)) => Some(ReservationWindow::DayRange {
                check_in,
                check_out,
            }),
            _ => None,
        }
    }

    /// Number of nights the selection covers, clamped to zero.
    #[must_use]
    pub fn nights(&self) -> i64 {
        self.window().map_or(0, |w| w.nights())
    }

    /// Total price at the given nightly rate.
    #[must_use]
    pub fn total_price(&self, price_per_night: Decimal) -> Decimal {
        self.window()
            .map_or(Decimal::ZERO, |w| w.total_price(price_per_night))
    }

    /// Validate the selection for commit: both ends picked, at least one
    /// night, and no conflict with other confirmed bookings.
    ///
    /// This is the defensive re-check behind the confirm action; the UI
    /// only offers confirmation once `nights > 0`, but the blocked-set it
    /// rendered may be stale.
    ///
    /// # Errors
    ///
    /// [`SelectorError::Incomplete`] before both ends are picked,
    /// [`SelectorError::InvalidWindow`] for zero-night ranges, and
    /// [`SelectorError::Conflict`] when the engine reports an overlap.
    pub fn validated_window(
        &self,
        store: &BookingStore,
        room_id: RoomId,
        exclude: Option<BookingId>,
    ) -> Result<ReservationWindow, SelectorError> {
        let window = self.window().ok_or(SelectorError::Incomplete)?;
        window.validate()?;
        if is_blocked(store, room_id, &window, exclude) {
            return Err(SelectorError::Conflict);
        }
        Ok(window)
    }

    /// Commit the selection into a booking intent.
    ///
    /// # Errors
    ///
    /// See [`Self::validated_window`].
    pub fn commit(
        &self,
        store: &BookingStore,
        room_id: RoomId,
        user_id: UserId,
        guest_name: String,
        guest_email: Email,
    ) -> Result<BookingIntent, SelectorError> {
        let window = self.validated_window(store, room_id, None)?;
        Ok(BookingIntent {
            room_id,
            user_id,
            window,
            guest_name,
            guest_email,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::window::parse_date;
    use rust_decimal_macros::dec;

    fn d(s: &str) -> NaiveDate {
        parse_date(s).expect("test date")
    }

    const fn never(_: NaiveDate) -> bool {
        false
    }

    #[test]
    fn test_empty_click_anchors_range() {
        let today = d("2024-06-01");
        let sel = RangeSelection::new().click(d("2024-06-10"), today, &never);
        assert_eq!(sel.phase(), RangePhase::PendingTo);
        assert_eq!(sel.from, Some(d("2024-06-10")));
        assert_eq!(sel.to, None);
    }

    #[test]
    fn test_pending_forward_click_completes() {
        let today = d("2024-06-01");
        let sel = RangeSelection::new()
            .click(d("2024-06-10"), today, &never)
            .click(d("2024-06-13"), today, &never);
        assert_eq!(sel.phase(), RangePhase::Complete);
        assert_eq!(sel.nights(), 3);
        assert_eq!(sel.total_price(dec!(100)), dec!(300));
    }

    #[test]
    fn test_pending_backward_click_re_anchors() {
        let today = d("2024-06-01");
        let sel = RangeSelection::new()
            .click(d("2024-06-10"), today, &never)
            .click(d("2024-06-05"), today, &never);
        assert_eq!(sel.phase(), RangePhase::PendingTo);
        assert_eq!(sel.from, Some(d("2024-06-05")));
    }

    #[test]
    fn test_spanning_a_blocked_day_restarts_at_click() {
        let today = d("2024-06-01");
        let blocked = |day: NaiveDate| day == d("2024-06-12");
        let sel = RangeSelection::new()
            .click(d("2024-06-10"), today, &blocked)
            .click(d("2024-06-14"), today, &blocked);
        // The old anchor is discarded, not reported as an error
        assert_eq!(sel.phase(), RangePhase::PendingTo);
        assert_eq!(sel.from, Some(d("2024-06-14")));
        assert_eq!(sel.to, None);
    }

    #[test]
    fn test_complete_click_starts_new_selection() {
        let today = d("2024-06-01");
        let sel = RangeSelection::new()
            .click(d("2024-06-10"), today, &never)
            .click(d("2024-06-12"), today, &never)
            .click(d("2024-06-20"), today, &never);
        assert_eq!(sel.phase(), RangePhase::PendingTo);
        assert_eq!(sel.from, Some(d("2024-06-20")));
    }

    #[test]
    fn test_disabled_days_ignore_clicks() {
        let today = d("2024-06-10");
        let blocked = |day: NaiveDate| day == d("2024-06-15");
        // Past day
        let sel = RangeSelection::new().click(d("2024-06-09"), today, &blocked);
        assert_eq!(sel.phase(), RangePhase::Empty);
        // Blocked day
        let sel = RangeSelection::new().click(d("2024-06-15"), today, &blocked);
        assert_eq!(sel.phase(), RangePhase::Empty);
        // Today itself is clickable
        let sel = RangeSelection::new().click(today, today, &blocked);
        assert_eq!(sel.phase(), RangePhase::PendingTo);
    }

    #[test]
    fn test_preview_states() {
        let today = d("2024-06-01");
        let empty = RangeSelection::new();
        assert_eq!(empty.preview(d("2024-06-10")), RangePreview::Idle);

        let pending = empty.click(d("2024-06-10"), today, &never);
        assert_eq!(
            pending.preview(d("2024-06-13")),
            RangePreview::Span {
                from: d("2024-06-10"),
                to: d("2024-06-13"),
            }
        );
        assert_eq!(
            pending.preview(d("2024-06-05")),
            RangePreview::InvalidBackward
        );

        // Previewing never mutates committed state
        assert_eq!(pending.from, Some(d("2024-06-10")));
        assert_eq!(pending.to, None);
    }

    #[test]
    fn test_zero_night_selection_is_not_committable() {
        let today = d("2024-06-01");
        let store = BookingStore::new();
        let sel = RangeSelection::new()
            .click(d("2024-06-10"), today, &never)
            .click(d("2024-06-10"), today, &never);
        assert_eq!(sel.phase(), RangePhase::Complete);
        assert_eq!(sel.nights(), 0);
        let err = sel
            .validated_window(&store, RoomId::new(1), None)
            .expect_err("zero-night range must not commit");
        assert!(matches!(err, SelectorError::InvalidWindow(_)));
    }

    #[test]
    fn test_incomplete_selection_is_not_committable() {
        let store = BookingStore::new();
        let sel = RangeSelection::from_parts(Some(d("2024-06-10")), None);
        assert_eq!(
            sel.validated_window(&store, RoomId::new(1), None),
            Err(SelectorError::Incomplete)
        );
    }

    #[test]
    fn test_from_parts_orphan_to_collapses() {
        let sel = RangeSelection::from_parts(None, Some(d("2024-06-10")));
        assert_eq!(sel.phase(), RangePhase::Empty);
    }
}
