//! Single-day hourly slot picker.
//!
//! One date plus one catalog start time becomes a committed one-hour
//! booking. Selection is date-scoped: changing the date clears any
//! previously selected slot.

use chrono::{NaiveDate, NaiveTime};

use super::SelectorError;
use crate::availability::is_blocked;
use crate::store::BookingStore;
use crate::types::{BookingId, BookingIntent, Email, RoomId, UserId};
use crate::window::{slot_catalog, ReservationWindow};

/// The slot picker state: a chosen date and an optional catalog slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotSelection {
    pub date: NaiveDate,
    pub slot: Option<NaiveTime>,
}

impl SlotSelection {
    /// Selection for a date with no slot picked yet.
    #[must_use]
    pub const fn new(date: NaiveDate) -> Self {
        Self { date, slot: None }
    }

    /// Move the selection to another date, clearing the slot if the date
    /// actually changed.
    #[must_use]
    pub fn set_date(self, date: NaiveDate) -> Self {
        if date == self.date {
            self
        } else {
            Self { date, slot: None }
        }
    }

    /// Pick a catalog slot. Off-catalog or blocked slots leave the state
    /// unchanged, mirroring the disabled buttons in the grid.
    #[must_use]
    pub fn select(
        &self,
        start: NaiveTime,
        store: &BookingStore,
        room_id: RoomId,
        exclude: Option<BookingId>,
    ) -> Self {
        if !slot_catalog().contains(&start) {
            return *self;
        }
        let probe = ReservationWindow::from_slot_start(self.date, start);
        if is_blocked(store, room_id, &probe, exclude) {
            return *self;
        }
        Self {
            date: self.date,
            slot: Some(start),
        }
    }

    /// The one-hour window this selection describes, once a slot is picked.
    #[must_use]
    pub fn window(&self) -> Option<ReservationWindow> {
        self.slot
            .map(|start| ReservationWindow::from_slot_start(self.date, start))
    }

    /// Validate the selection for commit, re-checking the engine.
    ///
    /// # Errors
    ///
    /// [`SelectorError::Incomplete`] before a slot is picked,
    /// [`SelectorError::InvalidWindow`] if the window is malformed, and
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
