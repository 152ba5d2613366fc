//! Core types for Roomboard.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod amenity;
pub mod booking;
pub mod email;
pub mod id;
pub mod room;

pub use amenity::{amenities_from_names, standard_amenities, Amenity, AmenityIcon};
pub use booking::{Booking, BookingIntent, BookingStatus};
pub use email::{Email, EmailError};
pub use id::*;
pub use room::Room;
