//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                          - Redirect to /rooms
//! GET  /health                    - Health check
//!
//! # Browse & book
//! GET  /rooms                     - Room cards
//! GET  /rooms/{id}/book           - Nightly booking calendar
//!                                   (?month=YYYY-MM&from=&to= carry the selection)
//! GET  /rooms/{id}/book/hourly    - Hourly slot picker
//!                                   (?date=YYYY-MM-DD&slot=HH:MM)
//! POST /bookings                  - Commit a validated selection
//!
//! # Reservations
//! GET  /reservations              - Current user's bookings
//! POST /bookings/{id}/cancel      - Cancel (owner or admin)
//! GET  /bookings/{id}/edit        - Re-pick the reserved window
//! POST /bookings/{id}/edit        - Save the new window
//!
//! # Role
//! POST /role/toggle               - Flip the session admin flag
//!
//! # Admin (requires admin flag, else 401)
//! GET  /admin                     - Panel: add-room form, rooms, bookings
//! POST /admin/rooms               - Create room
//! GET  /admin/rooms/{id}/edit     - Edit room form
//! POST /admin/rooms/{id}/edit     - Update room
//! POST /admin/rooms/{id}/suggest  - AI amenity suggestions
//! ```

pub mod admin;
pub mod bookings;
pub mod reservations;
pub mod role;
pub mod rooms;

use axum::{
    response::Redirect,
    routing::{get, post},
    Router,
};

use crate::state::AppState;

/// Create the room browsing and booking routes.
pub fn room_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(rooms::index))
        .route("/{id}/book", get(rooms::book))
        .route("/{id}/book/hourly", get(rooms::book_hourly))
}

/// Create the booking mutation routes.
pub fn booking_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(bookings::create))
        .route("/{id}/cancel", post(bookings::cancel))
        .route("/{id}/edit", get(bookings::edit_page).post(bookings::edit))
}

/// Create the admin routes.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(admin::index))
        .route("/rooms", post(admin::create_room))
        .route(
            "/rooms/{id}/edit",
            get(admin::edit_room_page).post(admin::edit_room),
        )
        .route("/rooms/{id}/suggest", post(admin::suggest))
}

/// Assemble the full application router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(|| async { Redirect::to("/rooms") }))
        .nest("/rooms", room_routes())
        .nest("/bookings", booking_routes())
        .route("/reservations", get(reservations::index))
        .route("/role/toggle", post(role::toggle))
        .nest("/admin", admin_routes())
}
