//! End-to-end flows over the booking engine.
//!
//! Each test drives the same pipeline the web layer uses: a selector
//! validates against the availability engine, and only validated windows
//! reach the booking store.

use chrono::{NaiveDate, NaiveTime};
use rust_decimal_macros::dec;

use roomboard_core::{
    blocked_days, blocked_slots, is_blocked, BookingIntent, BookingStore, Email, RangeSelection,
    ReservationWindow, RoomId, SelectorError, SlotSelection, UserId,
};

fn d(s: &str) -> NaiveDate {
    roomboard_core::window::parse_date(s).expect("test date")
}

fn t(s: &str) -> NaiveTime {
    roomboard_core::window::parse_time(s).expect("test time")
}

fn guest() -> (String, Email) {
    (
        "Jane Doe".to_owned(),
        Email::parse("jane.doe@example.com").expect("email"),
    )
}

fn book_range(store: &mut BookingStore, room: RoomId, from: &str, to: &str) -> roomboard_core::Booking {
    let today = d("2024-06-01");
    let sel = RangeSelection::new()
        .click(d(from), today, &|_| false)
        .click(d(to), today, &|_| false);
    let (name, email) = guest();
    let intent = sel
        .commit(store, room, UserId::new(1), name, email)
        .expect("range commits");
    store.add(intent)
}

// ============================================================================
// Double-booking prevention
// ============================================================================

#[test]
fn test_no_double_booking_through_the_selector() {
    let mut store = BookingStore::new();
    let room = RoomId::new(1);
    book_range(&mut store, room, "2024-06-10", "2024-06-13");

    // A second guest tries an overlapping range through the same pipeline
    let today = d("2024-06-01");
    let blocked = |day: NaiveDate| {
        let probe = ReservationWindow::DayRange {
            check_in: day,
            check_out: day + chrono::Duration::days(1),
        };
        is_blocked(&store, room, &probe, None)
    };
    let sel = RangeSelection::new()
        .click(d("2024-06-09"), today, &blocked)
        .click(d("2024-06-11"), today, &blocked);

    // The picker already refused to span the blocked day and restarted
    assert_eq!(sel.from, Some(d("2024-06-11")));
    assert_eq!(sel.to, None);

    // Forcing the overlapping window past the picker still fails validation
    let forced = RangeSelection::from_parts(Some(d("2024-06-09")), Some(d("2024-06-11")));
    assert_eq!(
        forced.validated_window(&store, room, None),
        Err(SelectorError::Conflict)
    );
    assert_eq!(store.len(), 1);
}

#[test]
fn test_adjacent_ranges_share_the_checkout_day() {
    let mut store = BookingStore::new();
    let room = RoomId::new(1);
    book_range(&mut store, room, "2024-06-10", "2024-06-12");

    // Checking in on the previous guest's checkout day is allowed
    let next = RangeSelection::from_parts(Some(d("2024-06-12")), Some(d("2024-06-14")));
    let (name, email) = guest();
    let intent = next
        .commit(&store, room, UserId::new(2), name, email)
        .expect("adjacent range commits");
    store.add(intent);
    assert_eq!(store.len(), 2);
}

#[test]
fn test_zero_night_range_never_reaches_the_store() {
    let store = BookingStore::new();
    let sel = RangeSelection::from_parts(Some(d("2024-06-10")), Some(d("2024-06-10")));
    let (name, email) = guest();
    let err = sel
        .commit(&store, RoomId::new(1), UserId::new(1), name, email)
        .expect_err("zero-night range must not commit");
    assert!(matches!(err, SelectorError::InvalidWindow(_)));
    assert!(store.is_empty());
}

#[test]
fn test_rooms_are_independent() {
    let mut store = BookingStore::new();
    book_range(&mut store, RoomId::new(1), "2024-06-10", "2024-06-13");

    let same_dates = RangeSelection::from_parts(Some(d("2024-06-10")), Some(d("2024-06-13")));
    let (name, email) = guest();
    let intent = same_dates
        .commit(&store, RoomId::new(2), UserId::new(2), name, email)
        .expect("another room is free");
    store.add(intent);
    assert_eq!(store.len(), 2);
}

// ============================================================================
// Cross-kind blocking and the fine-grained slot policy
// ============================================================================

#[test]
fn test_day_range_blocks_every_slot_of_its_days() {
    let mut store = BookingStore::new();
    let room = RoomId::new(1);
    book_range(&mut store, room, "2024-06-10", "2024-06-12");

    // Every catalog slot on an occupied day is booked
    assert_eq!(blocked_slots(&store, room, d("2024-06-10"), None).len(), 9);
    assert_eq!(blocked_slots(&store, room, d("2024-06-11"), None).len(), 9);
    // The checkout day is fully free
    assert!(blocked_slots(&store, room, d("2024-06-12"), None).is_empty());
}

#[test]
fn test_slot_booking_blocks_only_its_own_hour_on_the_calendar() {
    let mut store = BookingStore::new();
    let room = RoomId::new(1);
    let sel = SlotSelection::new(d("2024-06-10")).select(t("10:00"), &store, room, None);
    let (name, email) = guest();
    let intent = sel
        .commit(&store, room, UserId::new(1), name, email)
        .expect("slot commits");
    store.add(intent);

    // Fine-grained policy: the day still counts as blocked for whole-day
    // stays because any overlap blocks
    let days = blocked_days(&store, room, 2024, 6, None);
    assert!(days.contains(&d("2024-06-10")));
    assert_eq!(days.len(), 1);

    // But only the colliding slot is gone from the hourly grid
    let slots = blocked_slots(&store, room, d("2024-06-10"), None);
    assert_eq!(slots.len(), 1);
    assert!(slots.contains(&t("10:00")));
}

#[test]
fn test_slot_conflicts_are_per_hour_and_per_day() {
    let mut store = BookingStore::new();
    let room = RoomId::new(1);
    store.add(BookingIntent {
        room_id: room,
        user_id: UserId::new(1),
        window: ReservationWindow::from_slot_start(d("2024-06-10"), t("10:00")),
        guest_name: "Jane Doe".to_owned(),
        guest_email: Email::parse("jane.doe@example.com").expect("email"),
    });

    // Same hour, same day: the picker refuses it
    let sel = SlotSelection::new(d("2024-06-10")).select(t("10:00"), &store, room, None);
    assert_eq!(sel.slot, None);
    // Adjacent hour is free (half-open end at 11:00)
    let sel = SlotSelection::new(d("2024-06-10")).select(t("11:00"), &store, room, None);
    assert_eq!(sel.slot, Some(t("11:00")));
    // Same hour next day is free
    let sel = SlotSelection::new(d("2024-06-11")).select(t("10:00"), &store, room, None);
    assert_eq!(sel.slot, Some(t("10:00")));
}

// ============================================================================
// Edit and cancel flows
// ============================================================================

#[test]
fn test_edit_excludes_the_booking_itself() {
    let mut store = BookingStore::new();
    let room = RoomId::new(1);
    let booking = book_range(&mut store, room, "2024-06-10", "2024-06-13");

    // Re-selecting the exact same window must not conflict with itself
    let same = RangeSelection::from_parts(Some(d("2024-06-10")), Some(d("2024-06-13")));
    let window = same
        .validated_window(&store, room, Some(booking.id))
        .expect("own window re-selects");
    let updated = store.update(booking.id, window).expect("update");
    assert_eq!(updated.id, booking.id);

    // Without the exclusion the same probe conflicts
    assert_eq!(
        same.validated_window(&store, room, None),
        Err(SelectorError::Conflict)
    );
}

#[test]
fn test_edit_into_another_booking_is_rejected() {
    let mut store = BookingStore::new();
    let room = RoomId::new(1);
    let first = book_range(&mut store, room, "2024-06-10", "2024-06-12");
    book_range(&mut store, room, "2024-06-20", "2024-06-22");

    let onto_second = RangeSelection::from_parts(Some(d("2024-06-19")), Some(d("2024-06-21")));
    assert_eq!(
        onto_second.validated_window(&store, room, Some(first.id)),
        Err(SelectorError::Conflict)
    );
    // The first booking is untouched
    assert_eq!(
        store.get(first.id).map(|b| b.window),
        Some(ReservationWindow::DayRange {
            check_in: d("2024-06-10"),
            check_out: d("2024-06-12"),
        })
    );
}

#[test]
fn test_edit_preserves_identity_and_changes_window() {
    let mut store = BookingStore::new();
    let room = RoomId::new(1);
    let booking = book_range(&mut store, room, "2024-06-10", "2024-06-12");

    let moved = RangeSelection::from_parts(Some(d("2024-06-20")), Some(d("2024-06-23")));
    let window = moved
        .validated_window(&store, room, Some(booking.id))
        .expect("free window");
    let updated = store.update(booking.id, window).expect("update");

    assert_eq!(updated.id, booking.id);
    assert_eq!(updated.guest_name, booking.guest_name);
    assert_eq!(updated.window.nights(), 3);
    assert_eq!(store.len(), 1);

    // The old window is free again
    let old_days = blocked_days(&store, room, 2024, 6, None);
    assert!(!old_days.contains(&d("2024-06-10")));
    assert!(old_days.contains(&d("2024-06-20")));
}

#[test]
fn test_cancel_frees_the_window_for_rebooking() {
    let mut store = BookingStore::new();
    let room = RoomId::new(1);
    let booking = book_range(&mut store, room, "2024-06-10", "2024-06-13");

    let cancelled = store.cancel(booking.id).expect("cancel");
    assert_eq!(cancelled.id, booking.id);
    assert!(store.is_empty());

    // The exact same window books again immediately
    let again = RangeSelection::from_parts(Some(d("2024-06-10")), Some(d("2024-06-13")));
    let (name, email) = guest();
    let intent = again
        .commit(&store, room, UserId::new(2), name, email)
        .expect("window is free after cancel");
    store.add(intent);
    assert_eq!(store.len(), 1);
}

// ============================================================================
// Pricing
// ============================================================================

#[test]
fn test_total_price_tracks_nights() {
    let sel = RangeSelection::from_parts(Some(d("2024-06-10")), Some(d("2024-06-13")));
    assert_eq!(sel.nights(), 3);
    assert_eq!(sel.total_price(dec!(150)), dec!(450));

    let single = RangeSelection::from_parts(Some(d("2024-06-10")), Some(d("2024-06-11")));
    assert_eq!(single.total_price(dec!(250)), dec!(250));
}

// ============================================================================
// Seeded session
// ============================================================================

#[test]
fn test_seeded_stores_are_consistent() {
    let mut rooms = roomboard_core::RoomStore::new();
    let mut bookings = BookingStore::new();
    let today = d("2024-06-10");
    roomboard_core::sample::seed_rooms(&mut rooms);
    roomboard_core::sample::seed_bookings(&mut bookings, today);

    assert_eq!(rooms.list().count(), 4);
    // Every seeded booking points at a seeded room
    for booking in bookings.list() {
        assert!(rooms.get(booking.room_id).is_some());
    }
    // The seeded 10:00 slot in the first room is visible to the engine
    let slots = blocked_slots(&bookings, RoomId::new(1), today, None);
    assert!(slots.contains(&t("10:00")));
}
