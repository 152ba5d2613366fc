//! Availability engine: conflict queries over the booking store.
//!
//! Pure functions over a [`BookingStore`] snapshot; nothing here mutates
//! state. Only `Confirmed` bookings count against availability, and an
//! invalid probe (zero-length or inverted window) is vacuously
//! non-blocking - the selectors reject committing such windows separately.

use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate, NaiveTime};

use crate::store::BookingStore;
use crate::types::{BookingId, BookingStatus, RoomId};
use crate::window::{slot_catalog, ReservationWindow};

/// Whether a probe window conflicts with any other Confirmed booking for
/// the room.
///
/// `exclude` lets an edit-in-progress booking check availability without
/// counting itself as a conflict, so a user can re-select their own
/// existing window unobstructed.
#[must_use]
pub fn is_blocked(
    store: &BookingStore,
    room_id: RoomId,
    probe: &ReservationWindow,
    exclude: Option<BookingId>,
) -> bool {
    store
        .for_room(room_id)
        .filter(|b| b.status == BookingStatus::Confirmed)
        .filter(|b| Some(b.id) != exclude)
        .any(|b| b.window.overlaps(probe))
}

/// The set of days in a calendar month that are blocked for the room.
///
/// A day is blocked if any counted booking covers it: a day range covering
/// the day, or an hourly slot on that date (a slot holds the day against
/// whole-day stays, matching the cross-kind overlap rule).
#[must_use]
pub fn blocked_days(
    store: &BookingStore,
    room_id: RoomId,
    year: i32,
    month: u32,
    exclude: Option<BookingId>,
) -> BTreeSet<NaiveDate> {
    let bookings: Vec<&ReservationWindow> = store
        .for_room(room_id)
        .filter(|b| b.status == BookingStatus::Confirmed)
        .filter(|b| Some(b.id) != exclude)
        .map(|b| &b.window)
        .collect();

    let mut blocked = BTreeSet::new();
    let mut day = match NaiveDate::from_ymd_opt(year, month, 1) {
        Some(d) => d,
        None => return blocked,
    };
    while day.month() == month && day.year() == year {
        if bookings.iter().any(|w| w.contains_day(day)) {
            blocked.insert(day);
        }
        day = match day.succ_opt() {
            Some(next) => next,
            None => break,
        };
    }
    blocked
}

/// The catalog slot start times that are unavailable for the room on a
/// date.
///
/// Each slot is checked independently against the engine (fine-grained
/// overlap). A booking part-way through an hour blocks only the slots it
/// actually touches, never the whole day.
#[must_use]
pub fn blocked_slots(
    store: &BookingStore,
    room_id: RoomId,
    date: NaiveDate,
    exclude: Option<BookingId>,
) -> BTreeSet<NaiveTime> {
    slot_catalog()
        .into_iter()
        .filter(|start| {
            let probe = ReservationWindow::from_slot_start(date, *start);
            is_blocked(store, room_id, &probe, exclude)
        })
        .collect()
}
