//! In-memory stores for rooms and bookings.
//!
//! The [`BookingStore`] exclusively owns all booking records and is the
//! only mutator of reservation state. It is deliberately conflict-agnostic:
//! callers (the selectors, driven by the availability engine) reject
//! overlapping windows before calling `add`/`update`. Validation lives at
//! query time, persistence at write time.

use crate::types::{Booking, BookingId, BookingIntent, BookingStatus, Room, RoomId, UserId};
use crate::window::ReservationWindow;

/// Errors from store mutations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// The referenced booking does not exist.
    #[error("booking {0} not found")]
    BookingNotFound(BookingId),
    /// The referenced room does not exist.
    #[error("room {0} not found")]
    RoomNotFound(RoomId),
}

/// Owner of all booking records for the session.
#[derive(Debug, Default)]
pub struct BookingStore {
    next_id: i32,
    bookings: Vec<Booking>,
}

impl BookingStore {
    /// Create an empty store.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            next_id: 1,
            bookings: Vec::new(),
        }
    }

    /// Append a booking with a freshly assigned identity and `Confirmed`
    /// status. No conflict checking happens here.
    pub fn add(&mut self, intent: BookingIntent) -> Booking {
        let booking = Booking {
            id: BookingId::new(self.next_id),
            room_id: intent.room_id,
            user_id: intent.user_id,
            window: intent.window,
            guest_name: intent.guest_name,
            guest_email: intent.guest_email,
            status: BookingStatus::Confirmed,
        };
        self.next_id += 1;
        self.bookings.push(booking.clone());
        booking
    }

    /// Remove a booking entirely. Cancellation is deletion, not a soft
    /// delete: subsequent availability probes see its window as free.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::BookingNotFound`] for an unknown identity;
    /// the store is left unchanged.
    pub fn cancel(&mut self, id: BookingId) -> Result<Booking, StoreError> {
        let pos = self
            .bookings
            .iter()
            .position(|b| b.id == id)
            .ok_or(StoreError::BookingNotFound(id))?;
        let mut removed = self.bookings.remove(pos);
        removed.status = BookingStatus::Cancelled;
        Ok(removed)
    }

    /// Replace the reservation window of an existing booking in place,
    /// preserving identity and status.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::BookingNotFound`] for an unknown identity;
    /// the store is left unchanged.
    pub fn update(
        &mut self,
        id: BookingId,
        window: ReservationWindow,
    ) -> Result<Booking, StoreError> {
        let booking = self
            .bookings
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or(StoreError::BookingNotFound(id))?;
        booking.window = window;
        Ok(booking.clone())
    }

    /// Look up a booking by identity.
    #[must_use]
    pub fn get(&self, id: BookingId) -> Option<&Booking> {
        self.bookings.iter().find(|b| b.id == id)
    }

    /// All bookings, in insertion order.
    pub fn list(&self) -> impl Iterator<Item = &Booking> {
        self.bookings.iter()
    }

    /// Bookings for one room.
    pub fn for_room(&self, room_id: RoomId) -> impl Iterator<Item = &Booking> {
        self.bookings.iter().filter(move |b| b.room_id == room_id)
    }

    /// Bookings owned by one user.
    pub fn for_user(&self, user_id: UserId) -> impl Iterator<Item = &Booking> {
        self.bookings.iter().filter(move |b| b.user_id == user_id)
    }

    /// Number of bookings in the store.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bookings.len()
    }

    /// Whether the store holds no bookings.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bookings.is_empty()
    }
}

/// Owner of all room records. Read by the availability engine and the
/// presentation layer; written only through the admin surface.
#[derive(Debug, Default)]
pub struct RoomStore {
    next_id: i32,
    rooms: Vec<Room>,
}

/// Fields an admin supplies when creating or editing a room.
#[derive(Debug, Clone)]
pub struct RoomDraft {
    pub name: String,
    pub capacity: u32,
    pub price_per_night: rust_decimal::Decimal,
    pub amenities: Vec<crate::types::Amenity>,
    /// Blank falls back to [`Room::default_image_url`].
    pub image_url: String,
}

impl RoomStore {
    /// Create an empty store.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            next_id: 1,
            rooms: Vec::new(),
        }
    }

    /// Add a room with a freshly assigned identity.
    pub fn add(&mut self, draft: RoomDraft) -> Room {
        let image_url = if draft.image_url.trim().is_empty() {
            Room::default_image_url(&draft.name)
        } else {
            draft.image_url
        };
        let room = Room {
            id: RoomId::new(self.next_id),
            name: draft.name,
            capacity: draft.capacity,
            price_per_night: draft.price_per_night,
            amenities: draft.amenities,
            image_url,
        };
        self.next_id += 1;
        self.rooms.push(room.clone());
        room
    }

    /// Replace an existing room's editable fields, preserving identity.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::RoomNotFound`] for an unknown identity.
    pub fn update(&mut self, id: RoomId, draft: RoomDraft) -> Result<Room, StoreError> {
        let room = self
            .rooms
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(StoreError::RoomNotFound(id))?;
        room.name = draft.name;
        room.capacity = draft.capacity;
        room.price_per_night = draft.price_per_night;
        room.amenities = draft.amenities;
        room.image_url = if draft.image_url.trim().is_empty() {
            Room::default_image_url(&room.name)
        } else {
            draft.image_url
        };
        Ok(room.clone())
    }

    /// Look up a room by identity.
    #[must_use]
    pub fn get(&self, id: RoomId) -> Option<&Room> {
        self.rooms.iter().find(|r| r.id == id)
    }

    /// All rooms, in insertion order.
    pub fn list(&self) -> impl Iterator<Item = &Room> {
        self.rooms.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Amenity, AmenityIcon, Email};
    use crate::window::parse_date;
    use rust_decimal_macros::dec;

    fn intent(room: i32, check_in: &str, check_out: &str) -> BookingIntent {
        BookingIntent {
            room_id: RoomId::new(room),
            user_id: UserId::new(1),
            window: ReservationWindow::DayRange {
                check_in: parse_date(check_in).expect("date"),
                check_out: parse_date(check_out).expect("date"),
            },
            guest_name: "Jane Doe".to_owned(),
            guest_email: Email::parse("jane.doe@example.com").expect("email"),
        }
    }

    #[test]
    fn test_add_assigns_unique_stable_ids() {
        let mut store = BookingStore::new();
        let a = store.add(intent(1, "2024-06-10", "2024-06-12"));
        let b = store.add(intent(1, "2024-07-01", "2024-07-02"));
        assert_ne!(a.id, b.id);
        assert_eq!(a.status, BookingStatus::Confirmed);
        assert_eq!(store.get(a.id).map(|x| x.id), Some(a.id));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_cancel_removes_entirely() {
        let mut store = BookingStore::new();
        let a = store.add(intent(1, "2024-06-10", "2024-06-12"));
        let removed = store.cancel(a.id).expect("cancel");
        assert_eq!(removed.status, BookingStatus::Cancelled);
        assert!(store.is_empty());
        assert!(store.get(a.id).is_none());
        // Cancelling again is NotFound, store unchanged
        assert_eq!(store.cancel(a.id), Err(StoreError::BookingNotFound(a.id)));
    }

    #[test]
    fn test_update_preserves_identity_and_status() {
        let mut store = BookingStore::new();
        let a = store.add(intent(1, "2024-06-10", "2024-06-12"));
        let new_window = ReservationWindow::DayRange {
            check_in: parse_date("2024-06-20").expect("date"),
            check_out: parse_date("2024-06-22").expect("date"),
        };
        let updated = store.update(a.id, new_window).expect("update");
        assert_eq!(updated.id, a.id);
        assert_eq!(updated.status, BookingStatus::Confirmed);
        assert_eq!(updated.window, new_window);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_update_unknown_id_is_not_found() {
        let mut store = BookingStore::new();
        let missing = BookingId::new(99);
        let window = ReservationWindow::DayRange {
            check_in: parse_date("2024-06-20").expect("date"),
            check_out: parse_date("2024-06-22").expect("date"),
        };
        assert_eq!(
            store.update(missing, window),
            Err(StoreError::BookingNotFound(missing))
        );
    }

    #[test]
    fn test_filters() {
        let mut store = BookingStore::new();
        store.add(intent(1, "2024-06-10", "2024-06-12"));
        store.add(intent(2, "2024-06-10", "2024-06-12"));
        store.add(intent(1, "2024-07-01", "2024-07-03"));
        assert_eq!(store.for_room(RoomId::new(1)).count(), 2);
        assert_eq!(store.for_user(UserId::new(1)).count(), 3);
        assert_eq!(store.for_user(UserId::new(2)).count(), 0);
    }

    #[test]
    fn test_room_store_blank_image_url_defaults() {
        let mut rooms = RoomStore::new();
        let room = rooms.add(RoomDraft {
            name: "The Hive".to_owned(),
            capacity: 8,
            price_per_night: dec!(120),
            amenities: vec![Amenity::new("Wi-Fi", AmenityIcon::Wifi)],
            image_url: "  ".to_owned(),
        });
        assert_eq!(room.image_url, Room::default_image_url("The Hive"));

        let updated = rooms
            .update(
                room.id,
                RoomDraft {
                    name: "The Hive".to_owned(),
                    capacity: 10,
                    price_per_night: dec!(140),
                    amenities: Vec::new(),
                    image_url: "https://example.com/hive.jpg".to_owned(),
                },
            )
            .expect("update");
        assert_eq!(updated.id, room.id);
        assert_eq!(updated.capacity, 10);
        assert_eq!(updated.image_url, "https://example.com/hive.jpg");
    }
}
