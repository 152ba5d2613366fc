//! Seed data for a fresh session.
//!
//! Everything lives in process memory for a single browser session, so the
//! stores start out populated with a small fixed set of rooms and two
//! bookings anchored to the current date.

use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;

use crate::store::{BookingStore, RoomDraft, RoomStore};
use crate::types::{Amenity, AmenityIcon, BookingIntent, Email, RoomId, UserId};
use crate::window::{parse_time, ReservationWindow};

/// The demo user every fresh session acts as.
#[must_use]
pub const fn demo_user() -> UserId {
    UserId::new(1)
}

/// The admin user that owns one of the seed bookings.
#[must_use]
pub const fn admin_user() -> UserId {
    UserId::new(2)
}

fn draft(
    name: &str,
    capacity: u32,
    price: i64,
    amenities: Vec<Amenity>,
    seed: &str,
) -> RoomDraft {
    RoomDraft {
        name: name.to_owned(),
        capacity,
        price_per_night: Decimal::from(price),
        amenities,
        image_url: format!("https://picsum.photos/seed/{seed}/600/400"),
    }
}

/// Seed the room store with the four sample rooms.
pub fn seed_rooms(store: &mut RoomStore) {
    store.add(draft(
        "The Focus Den",
        4,
        100,
        vec![
            Amenity::new("Wi-Fi", AmenityIcon::Wifi),
            Amenity::new("Whiteboard", AmenityIcon::Presentation),
        ],
        "room1",
    ));
    store.add(draft(
        "Collaborate Corner",
        8,
        150,
        vec![
            Amenity::new("Wi-Fi", AmenityIcon::Wifi),
            Amenity::new("TV Screen", AmenityIcon::Tv),
            Amenity::new("Video Conferencing", AmenityIcon::Mic),
        ],
        "room2",
    ));
    store.add(draft(
        "The Boardroom",
        16,
        250,
        vec![
            Amenity::new("Wi-Fi", AmenityIcon::Wifi),
            Amenity::new("Catering Available", AmenityIcon::Coffee),
            Amenity::new("Air Conditioning", AmenityIcon::Wind),
        ],
        "room3",
    ));
    store.add(draft(
        "Innovation Hub",
        12,
        225,
        vec![
            Amenity::new("Wi-Fi", AmenityIcon::Wifi),
            Amenity::new("Smart Board", AmenityIcon::Presentation),
            Amenity::new("Coffee Machine", AmenityIcon::Coffee),
            Amenity::new("Multiple Screens", AmenityIcon::Tv),
        ],
        "room4",
    ));
}

/// Seed the booking store with two confirmed bookings anchored to `today`:
/// a 10:00-11:00 slot on room 1 today and a 14:00-16:00 slot on room 3
/// tomorrow.
///
/// # Panics
///
/// Panics only if the compiled-in seed times are malformed.
pub fn seed_bookings(store: &mut BookingStore, today: NaiveDate) {
    let ten = parse_time("10:00").expect("seed time");
    let eleven = parse_time("11:00").expect("seed time");
    let two_pm = parse_time("14:00").expect("seed time");
    let four_pm = parse_time("16:00").expect("seed time");

    store.add(BookingIntent {
        room_id: RoomId::new(1),
        user_id: admin_user(),
        window: ReservationWindow::TimeSlot {
            date: today,
            start: ten,
            end: eleven,
        },
        guest_name: "Admin User".to_owned(),
        guest_email: Email::parse("admin@example.com").expect("seed email"),
    });
    store.add(BookingIntent {
        room_id: RoomId::new(3),
        user_id: demo_user(),
        window: ReservationWindow::TimeSlot {
            date: today + Duration::days(1),
            start: two_pm,
            end: four_pm,
        },
        guest_name: "Jane Doe".to_owned(),
        guest_email: Email::parse("jane.doe@example.com").expect("seed email"),
    });
}
