//! Room domain type.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::amenity::Amenity;
use super::id::RoomId;

/// A bookable meeting room.
///
/// Immutable once created except through explicit admin edit (see
/// [`crate::store::RoomStore::update`]).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
    /// Unique room ID.
    pub id: RoomId,
    /// Display name.
    pub name: String,
    /// Seating capacity.
    pub capacity: u32,
    /// Nightly price for whole-day reservations.
    pub price_per_night: Decimal,
    /// Amenities drawn from the standard catalog.
    pub amenities: Vec<Amenity>,
    /// Image reference for the room card.
    pub image_url: String,
}

impl Room {
    /// Default image URL derived from the room name when none is supplied.
    #[must_use]
    pub fn default_image_url(name: &str) -> String {
        let seed: String = name
            .split_whitespace()
            .collect::<Vec<_>>()
            .join("-");
        format!("https://picsum.photos/seed/{seed}/600/400")
    }
}
