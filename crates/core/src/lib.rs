//! Roomboard Core - Domain types and booking engine.
//!
//! This crate provides the booking domain used by the Roomboard components:
//! - `web` - Server-rendered booking site and admin panel
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no I/O, no HTTP
//! clients, no async. All state is in-memory; the stores here are plain
//! owned collections that the web layer wraps for sharing.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, emails, amenities, rooms, and bookings
//! - [`window`] - The [`ReservationWindow`] tagged union and interval math
//! - [`availability`] - Conflict queries over the booking store
//! - [`selector`] - Pure state machines for the range and slot pickers
//! - [`store`] - The [`BookingStore`] and [`RoomStore`]
//! - [`sample`] - Seed data for a fresh session

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod availability;
pub mod sample;
pub mod selector;
pub mod store;
pub mod types;
pub mod window;

pub use availability::{blocked_days, blocked_slots, is_blocked};
pub use selector::range::{RangePhase, RangePreview, RangeSelection};
pub use selector::slot::SlotSelection;
pub use selector::SelectorError;
pub use store::{BookingStore, RoomStore, StoreError};
pub use types::*;
pub use window::{slot_catalog, ReservationWindow, WindowError, SLOT_MINUTES};
