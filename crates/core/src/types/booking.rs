//! Booking domain types.

use serde::{Deserialize, Serialize};

use super::email::Email;
use super::id::{BookingId, RoomId, UserId};
use crate::window::ReservationWindow;

/// Lifecycle status of a booking.
///
/// Cancellation removes the record from the store entirely; `Cancelled`
/// exists so a status can be displayed on records snapshotted before
/// removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    #[default]
    Confirmed,
    Cancelled,
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Confirmed => write!(f, "Confirmed"),
            Self::Cancelled => write!(f, "Cancelled"),
        }
    }
}

/// A confirmed reservation owned by the booking store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    /// Unique booking ID, stable for the life of the record.
    pub id: BookingId,
    /// Room this booking reserves.
    pub room_id: RoomId,
    /// User who made the booking.
    pub user_id: UserId,
    /// The reserved window (whole-day range or hourly slot).
    pub window: ReservationWindow,
    /// Guest name captured at booking time.
    pub guest_name: String,
    /// Guest contact email.
    pub guest_email: Email,
    /// Lifecycle status.
    pub status: BookingStatus,
}

/// A validated booking request emitted by a selector commit.
///
/// The store assigns the identity and status on [`crate::BookingStore::add`].
#[derive(Debug, Clone)]
pub struct BookingIntent {
    pub room_id: RoomId,
    pub user_id: UserId,
    pub window: ReservationWindow,
    pub guest_name: String,
    pub guest_email: Email,
}
