//! Booking mutation handlers: create, cancel, and edit.
//!
//! Booking-flow rejections never surface as error responses. The handlers
//! redirect back to the page the form came from with a short `error` code
//! in the query string, and the page maps the code to a message.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
    Form,
};
use serde::Deserialize;

use roomboard_core::window::{parse_date, parse_time, DATE_FORMAT, TIME_FORMAT};
use roomboard_core::{
    blocked_slots, slot_catalog, BookingId, Email, RangePhase, ReservationWindow, SelectorError,
    SlotSelection, StoreError,
};

use crate::calendar::{build_calendar, CalendarMonth};
use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::CurrentUser;
use crate::routes::rooms::{flash_message, selection_from_query, RoomView, SlotCell};
use crate::state::AppState;

/// Window kind discriminator carried in booking forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowKind {
    DayRange,
    TimeSlot,
}

/// Hidden selection fields shared by the create and edit forms.
#[derive(Debug, Deserialize)]
pub struct SelectionFields {
    pub kind: WindowKind,
    pub from: Option<String>,
    pub to: Option<String>,
    pub date: Option<String>,
    pub slot: Option<String>,
}

impl SelectionFields {
    /// Query-string fragment reproducing the selection, for error
    /// redirects back to the picker page.
    fn as_params(&self) -> String {
        let pairs: [(&str, &Option<String>); 4] = [
            ("from", &self.from),
            ("to", &self.to),
            ("date", &self.date),
            ("slot", &self.slot),
        ];
        pairs
            .iter()
            .filter_map(|(k, v)| v.as_deref().map(|v| format!("{k}={v}")))
            .collect::<Vec<_>>()
            .join("&")
    }
}

const fn selector_error_code(err: &SelectorError) -> &'static str {
    match err {
        SelectorError::Incomplete => "incomplete",
        SelectorError::InvalidWindow(_) => "invalid_window",
        SelectorError::Conflict => "conflict",
    }
}

/// Redirect back to a picker page with the selection and an error code.
fn reject(base: &str, selection: &SelectionFields, code: &str) -> Response {
    let params = selection.as_params();
    let href = if params.is_empty() {
        format!("{base}?error={code}")
    } else {
        format!("{base}?{params}&error={code}")
    };
    Redirect::to(&href).into_response()
}

/// Resolve the selection fields into a validated window against the
/// current store snapshot, returning a flash code on rejection. Must be
/// called under the same lock that commits the result, so no conflicting
/// booking can land in between.
fn resolve_window(
    fields: &SelectionFields,
    store: &roomboard_core::BookingStore,
    room_id: roomboard_core::RoomId,
    exclude: Option<BookingId>,
    today: chrono::NaiveDate,
) -> std::result::Result<ReservationWindow, &'static str> {
    let window = match fields.kind {
        WindowKind::DayRange => {
            let selection = selection_from_query(fields.from.as_deref(), fields.to.as_deref());
            selection.validated_window(store, room_id, exclude)
        }
        WindowKind::TimeSlot => {
            let date = fields
                .date
                .as_deref()
                .and_then(|s| parse_date(s).ok())
                .ok_or(SelectorError::Incomplete);
            let start = fields
                .slot
                .as_deref()
                .and_then(|s| parse_time(s).ok())
                .ok_or(SelectorError::Incomplete);
            match (date, start) {
                (Ok(date), Ok(start)) => {
                    let mut selection = SlotSelection::new(date);
                    selection.slot = Some(start);
                    selection.validated_window(store, room_id, exclude)
                }
                _ => Err(SelectorError::Incomplete),
            }
        }
    }
    .map_err(|err| selector_error_code(&err))?;

    // The pickers never offer past days; hand-crafted posts get the same
    // rejection
    if window.start_key().date() < today {
        return Err("past");
    }
    Ok(window)
}

// =============================================================================
// Create
// =============================================================================

/// Form body for `POST /bookings`.
///
/// The selection fields are spelled out rather than nested; form
/// deserialization is flat key-value pairs.
#[derive(Debug, Deserialize)]
pub struct CreateBookingForm {
    pub room_id: i32,
    pub kind: WindowKind,
    pub from: Option<String>,
    pub to: Option<String>,
    pub date: Option<String>,
    pub slot: Option<String>,
    pub guest_name: String,
    pub guest_email: String,
}

impl CreateBookingForm {
    fn selection(&self) -> SelectionFields {
        SelectionFields {
            kind: self.kind,
            from: self.from.clone(),
            to: self.to.clone(),
            date: self.date.clone(),
            slot: self.slot.clone(),
        }
    }
}

/// Confirmation page template.
#[derive(Template, WebTemplate)]
#[template(path = "bookings/confirmed.html")]
pub struct ConfirmedTemplate {
    pub is_admin: bool,
    pub room: RoomView,
    pub window: String,
    pub guest_name: String,
    pub guest_email: String,
    pub nights: i64,
    /// Raw decimal string; templates apply the `money` filter. Empty for
    /// hourly bookings.
    pub total: Option<String>,
}

/// Commit a validated selection as a new booking.
pub async fn create(
    State(state): State<AppState>,
    user: CurrentUser,
    Form(form): Form<CreateBookingForm>,
) -> Result<Response> {
    let room_id = roomboard_core::RoomId::new(form.room_id);
    let rooms = state.rooms().read().await;
    let room = rooms
        .get(room_id)
        .ok_or_else(|| AppError::NotFound(format!("room {room_id}")))?;
    let room_view = RoomView::from(room);
    let price = room.price_per_night;
    drop(rooms);

    let selection = form.selection();
    let picker = match selection.kind {
        WindowKind::DayRange => format!("/rooms/{room_id}/book"),
        WindowKind::TimeSlot => format!("/rooms/{room_id}/book/hourly"),
    };

    let guest_name = form.guest_name.trim().to_owned();
    if guest_name.is_empty() {
        return Ok(reject(&picker, &selection, "invalid_name"));
    }
    let Ok(guest_email) = Email::parse(form.guest_email.trim()) else {
        return Ok(reject(&picker, &selection, "invalid_email"));
    };

    // Validate and commit under one write lock
    let today = AppState::today();
    let mut bookings = state.bookings().write().await;
    let window = match resolve_window(&selection, &bookings, room_id, None, today) {
        Ok(window) => window,
        Err(code) => return Ok(reject(&picker, &selection, code)),
    };
    let booking = bookings.add(roomboard_core::BookingIntent {
        room_id,
        user_id: user.id,
        window,
        guest_name,
        guest_email,
    });
    drop(bookings);

    tracing::info!(booking = %booking.id, room = %room_id, "booking confirmed");

    let nights = booking.window.nights();
    Ok(ConfirmedTemplate {
        is_admin: user.is_admin,
        room: room_view,
        window: booking.window.to_string(),
        guest_name: booking.guest_name,
        guest_email: booking.guest_email.as_str().to_owned(),
        nights,
        total: matches!(booking.window, ReservationWindow::DayRange { .. })
            .then(|| booking.window.total_price(price).to_string()),
    }
    .into_response())
}

// =============================================================================
// Cancel
// =============================================================================

/// Form body for `POST /bookings/{id}/cancel`.
#[derive(Debug, Deserialize)]
pub struct CancelForm {
    /// Where to go afterwards; must be a local path.
    pub return_to: Option<String>,
}

/// Only same-site paths are acceptable redirect targets.
fn sanitize_return_to(raw: Option<&str>) -> &str {
    match raw {
        Some(path) if path.starts_with('/') && !path.starts_with("//") => path,
        _ => "/reservations",
    }
}

/// Cancel a booking. Owners can cancel their own; admins can cancel any.
pub async fn cancel(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<BookingId>,
    Form(form): Form<CancelForm>,
) -> Result<Redirect> {
    let mut bookings = state.bookings().write().await;
    let booking = bookings
        .get(id)
        .ok_or_else(|| AppError::NotFound(format!("booking {id}")))?;
    if booking.user_id != user.id && !user.is_admin {
        return Err(AppError::Unauthorized(
            "only the owner or an admin can cancel a booking".to_owned(),
        ));
    }
    match bookings.cancel(id) {
        Ok(cancelled) => {
            tracing::info!(booking = %cancelled.id, "booking cancelled");
        }
        Err(StoreError::BookingNotFound(_) | StoreError::RoomNotFound(_)) => {
            return Err(AppError::NotFound(format!("booking {id}")));
        }
    }
    drop(bookings);

    Ok(Redirect::to(sanitize_return_to(form.return_to.as_deref())))
}

// =============================================================================
// Edit
// =============================================================================

/// Query parameters for the edit picker page.
#[derive(Debug, Deserialize)]
pub struct EditQuery {
    pub month: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub date: Option<String>,
    pub slot: Option<String>,
    pub error: Option<String>,
}

/// Edit page template. Renders the calendar or the slot grid depending on
/// the booking's window kind.
#[derive(Template, WebTemplate)]
#[template(path = "bookings/edit.html")]
pub struct EditTemplate {
    pub is_admin: bool,
    pub booking_id: i32,
    pub room: RoomView,
    pub current_window: String,
    pub is_day_range: bool,
    pub error: Option<String>,

    // Day-range picker state
    pub calendar: Option<CalendarMonth>,
    pub selected_from: Option<String>,
    pub selected_to: Option<String>,
    pub nights: i64,
    /// Raw decimal string; templates apply the `money` filter.
    pub total: String,
    pub show_form: bool,

    // Slot picker state
    pub date: Option<String>,
    pub slots: Vec<SlotCell>,
    pub selected_start: Option<String>,
    pub prev_href: Option<String>,
    pub next_href: Option<String>,
}

/// Display the re-pick page for an existing booking.
///
/// The booking's own window is excluded from the availability probes so it
/// can be re-selected, and it seeds the picker on first load (a bare URL
/// with no query parameters).
pub async fn edit_page(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<BookingId>,
    Query(query): Query<EditQuery>,
) -> Result<EditTemplate> {
    let bookings = state.bookings().read().await;
    let booking = bookings
        .get(id)
        .ok_or_else(|| AppError::NotFound(format!("booking {id}")))?
        .clone();
    drop(bookings);
    if booking.user_id != user.id && !user.is_admin {
        return Err(AppError::Unauthorized(
            "only the owner or an admin can edit a booking".to_owned(),
        ));
    }

    let rooms = state.rooms().read().await;
    let room = rooms
        .get(booking.room_id)
        .ok_or_else(|| AppError::NotFound(format!("room {}", booking.room_id)))?;
    let room_view = RoomView::from(room);
    let price = room.price_per_night;
    drop(rooms);

    let today = AppState::today();
    let base_path = format!("/bookings/{id}/edit");
    let error = query.error.as_deref().map(flash_message);
    let bare = query.month.is_none()
        && query.from.is_none()
        && query.to.is_none()
        && query.date.is_none()
        && query.slot.is_none();

    match booking.window {
        ReservationWindow::DayRange {
            check_in,
            check_out,
        } => {
            use chrono::Datelike;

            let selection = if bare {
                roomboard_core::RangeSelection::from_parts(Some(check_in), Some(check_out))
            } else {
                selection_from_query(query.from.as_deref(), query.to.as_deref())
            };
            let (year, month) = query
                .month
                .as_deref()
                .and_then(|raw| {
                    let (y, m) = raw.split_once('-')?;
                    Some((y.parse().ok()?, m.parse().ok()?))
                })
                .or_else(|| selection.from.map(|d| (d.year(), d.month())))
                .unwrap_or((today.year(), today.month()));

            let bookings = state.bookings().read().await;
            let calendar = build_calendar(
                &base_path,
                &bookings,
                booking.room_id,
                Some(id),
                selection,
                today,
                year,
                month,
            );
            drop(bookings);

            let nights = selection.nights();
            Ok(EditTemplate {
                is_admin: user.is_admin,
                booking_id: id.as_i32(),
                room: room_view,
                current_window: booking.window.to_string(),
                is_day_range: true,
                error,
                calendar: Some(calendar),
                selected_from: selection.from.map(|d| d.format(DATE_FORMAT).to_string()),
                selected_to: selection.to.map(|d| d.format(DATE_FORMAT).to_string()),
                nights,
                total: selection.total_price(price).to_string(),
                show_form: selection.phase() == RangePhase::Complete && nights > 0,
                date: None,
                slots: Vec::new(),
                selected_start: None,
                prev_href: None,
                next_href: None,
            })
        }
        ReservationWindow::TimeSlot {
            date: booked_date,
            start: booked_start,
            ..
        } => {
            let date = if bare {
                booked_date
            } else {
                query
                    .date
                    .as_deref()
                    .and_then(|s| parse_date(s).ok())
                    .filter(|d| *d >= today)
                    .unwrap_or(today)
            };

            let bookings = state.bookings().read().await;
            let mut selection = SlotSelection::new(date);
            let requested = if bare {
                Some(booked_start)
            } else {
                query.slot.as_deref().and_then(|s| parse_time(s).ok())
            };
            if let Some(start) = requested {
                selection = selection.select(start, &bookings, booking.room_id, Some(id));
            }
            let booked = blocked_slots(&bookings, booking.room_id, date, Some(id));
            drop(bookings);

            let date_key = date.format(DATE_FORMAT);
            let slots = slot_catalog()
                .into_iter()
                .map(|start| {
                    let label = start.format(TIME_FORMAT).to_string();
                    let is_booked = booked.contains(&start);
                    SlotCell {
                        href: (!is_booked)
                            .then(|| format!("{base_path}?date={date_key}&slot={label}")),
                        selected: selection.slot == Some(start),
                        booked: is_booked,
                        label,
                    }
                })
                .collect();

            let prev = date - chrono::Duration::days(1);
            let next = date + chrono::Duration::days(1);
            Ok(EditTemplate {
                is_admin: user.is_admin,
                booking_id: id.as_i32(),
                room: room_view,
                current_window: booking.window.to_string(),
                is_day_range: false,
                error,
                calendar: None,
                selected_from: None,
                selected_to: None,
                nights: 0,
                total: String::new(),
                show_form: selection.slot.is_some(),
                date: Some(date.format(DATE_FORMAT).to_string()),
                slots,
                selected_start: selection.slot.map(|t| t.format(TIME_FORMAT).to_string()),
                prev_href: (prev >= today)
                    .then(|| format!("{base_path}?date={}", prev.format(DATE_FORMAT))),
                next_href: Some(format!("{base_path}?date={}", next.format(DATE_FORMAT))),
            })
        }
    }
}

/// Form body for `POST /bookings/{id}/edit`.
#[derive(Debug, Deserialize)]
pub struct EditBookingForm {
    pub kind: WindowKind,
    pub from: Option<String>,
    pub to: Option<String>,
    pub date: Option<String>,
    pub slot: Option<String>,
}

impl EditBookingForm {
    fn selection(&self) -> SelectionFields {
        SelectionFields {
            kind: self.kind,
            from: self.from.clone(),
            to: self.to.clone(),
            date: self.date.clone(),
            slot: self.slot.clone(),
        }
    }
}

/// Save a re-picked window, preserving the booking's identity.
pub async fn edit(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<BookingId>,
    Form(form): Form<EditBookingForm>,
) -> Result<Response> {
    let base_path = format!("/bookings/{id}/edit");

    // Validate and commit under one write lock
    let today = AppState::today();
    let mut bookings = state.bookings().write().await;
    let booking = bookings
        .get(id)
        .ok_or_else(|| AppError::NotFound(format!("booking {id}")))?;
    if booking.user_id != user.id && !user.is_admin {
        return Err(AppError::Unauthorized(
            "only the owner or an admin can edit a booking".to_owned(),
        ));
    }
    let room_id = booking.room_id;

    let selection = form.selection();
    let window = match resolve_window(&selection, &bookings, room_id, Some(id), today) {
        Ok(window) => window,
        Err(code) => {
            return Ok(reject(&base_path, &selection, code));
        }
    };
    match bookings.update(id, window) {
        Ok(updated) => {
            tracing::info!(booking = %updated.id, "booking window updated");
        }
        Err(StoreError::BookingNotFound(_) | StoreError::RoomNotFound(_)) => {
            return Err(AppError::NotFound(format!("booking {id}")));
        }
    }
    drop(bookings);

    Ok(Redirect::to("/reservations").into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_return_to() {
        assert_eq!(sanitize_return_to(Some("/admin")), "/admin");
        assert_eq!(sanitize_return_to(Some("//evil.example")), "/reservations");
        assert_eq!(
            sanitize_return_to(Some("https://evil.example")),
            "/reservations"
        );
        assert_eq!(sanitize_return_to(None), "/reservations");
    }

    fn day_range_fields(from: &str, to: &str) -> SelectionFields {
        SelectionFields {
            kind: WindowKind::DayRange,
            from: Some(from.to_owned()),
            to: Some(to.to_owned()),
            date: None,
            slot: None,
        }
    }

    #[test]
    fn test_resolve_window_rejects_past_starts() {
        let store = roomboard_core::BookingStore::new();
        let room = roomboard_core::RoomId::new(1);
        let today = parse_date("2024-06-10").expect("date");

        let last_year = day_range_fields("2023-06-10", "2023-06-12");
        assert_eq!(
            resolve_window(&last_year, &store, room, None, today),
            Err("past")
        );

        let yesterday_slot = SelectionFields {
            kind: WindowKind::TimeSlot,
            from: None,
            to: None,
            date: Some("2024-06-09".to_owned()),
            slot: Some("09:00".to_owned()),
        };
        assert_eq!(
            resolve_window(&yesterday_slot, &store, room, None, today),
            Err("past")
        );

        let upcoming = day_range_fields("2024-06-11", "2024-06-13");
        assert!(resolve_window(&upcoming, &store, room, None, today).is_ok());
    }

    #[test]
    fn test_resolve_window_maps_selector_errors_to_codes() {
        let store = roomboard_core::BookingStore::new();
        let room = roomboard_core::RoomId::new(1);
        let today = parse_date("2024-06-10").expect("date");

        let zero_nights = day_range_fields("2024-06-11", "2024-06-11");
        assert_eq!(
            resolve_window(&zero_nights, &store, room, None, today),
            Err("invalid_window")
        );

        let missing_slot = SelectionFields {
            kind: WindowKind::TimeSlot,
            from: None,
            to: None,
            date: Some("2024-06-11".to_owned()),
            slot: None,
        };
        assert_eq!(
            resolve_window(&missing_slot, &store, room, None, today),
            Err("incomplete")
        );
    }

    #[test]
    fn test_selection_fields_params() {
        let fields = SelectionFields {
            kind: WindowKind::DayRange,
            from: Some("2024-06-10".to_owned()),
            to: Some("2024-06-12".to_owned()),
            date: None,
            slot: None,
        };
        assert_eq!(fields.as_params(), "from=2024-06-10&to=2024-06-12");
    }
}
