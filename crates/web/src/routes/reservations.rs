//! The current user's reservations page.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;

use roomboard_core::{BookingStore, ReservationWindow, RoomStore, UserId};

use crate::filters;
use crate::middleware::CurrentUser;
use crate::state::AppState;

/// One row of the reservations table.
pub struct ReservationRow {
    pub booking_id: i32,
    pub room_name: String,
    pub window: String,
    pub is_day_range: bool,
    pub nights: i64,
    /// Raw decimal string; templates apply the `money` filter. Empty for
    /// hourly bookings.
    pub total: Option<String>,
    pub status: String,
}

/// Reservations page template.
#[derive(Template, WebTemplate)]
#[template(path = "reservations/index.html")]
pub struct ReservationsTemplate {
    pub is_admin: bool,
    pub reservations: Vec<ReservationRow>,
}

/// Build one user's rows, soonest window first.
fn rows(rooms: &RoomStore, bookings: &BookingStore, user_id: UserId) -> Vec<ReservationRow> {
    let mut mine: Vec<_> = bookings.for_user(user_id).collect();
    mine.sort_by_key(|b| b.window.start_key());

    mine.into_iter()
        .map(|b| {
            let (room_name, price) = rooms
                .get(b.room_id)
                .map_or_else(|| ("(removed room)".to_owned(), None), |r| {
                    (r.name.clone(), Some(r.price_per_night))
                });
            let is_day_range = matches!(b.window, ReservationWindow::DayRange { .. });
            ReservationRow {
                booking_id: b.id.as_i32(),
                room_name,
                window: b.window.to_string(),
                is_day_range,
                nights: b.window.nights(),
                total: match price {
                    Some(p) if is_day_range => Some(b.window.total_price(p).to_string()),
                    _ => None,
                },
                status: b.status.to_string(),
            }
        })
        .collect()
}

/// List the acting user's bookings, soonest first.
pub async fn index(State(state): State<AppState>, user: CurrentUser) -> ReservationsTemplate {
    let rooms = state.rooms().read().await;
    let bookings = state.bookings().read().await;

    ReservationsTemplate {
        is_admin: user.is_admin,
        reservations: rows(&rooms, &bookings, user.id),
    }
}
