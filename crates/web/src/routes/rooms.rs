//! Room browsing and booking page handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Path, Query, State};
use chrono::{Datelike, Duration};
use serde::Deserialize;

use roomboard_core::window::{parse_date, parse_time, DATE_FORMAT, TIME_FORMAT};
use roomboard_core::{
    blocked_slots, slot_catalog, RangePhase, RangeSelection, Room, RoomId, SlotSelection,
};

use crate::calendar::{build_calendar, CalendarMonth};
use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::CurrentUser;
use crate::state::AppState;

/// Room display data for templates.
#[derive(Clone)]
pub struct RoomView {
    pub id: i32,
    pub name: String,
    pub capacity: u32,
    /// Raw decimal string; templates apply the `money` filter.
    pub price: String,
    pub image_url: String,
    pub amenities: Vec<AmenityView>,
}

/// Amenity display data for templates.
#[derive(Clone)]
pub struct AmenityView {
    pub name: String,
    pub icon: String,
}

impl From<&Room> for RoomView {
    fn from(room: &Room) -> Self {
        Self {
            id: room.id.as_i32(),
            name: room.name.clone(),
            capacity: room.capacity,
            price: room.price_per_night.to_string(),
            image_url: room.image_url.clone(),
            amenities: room
                .amenities
                .iter()
                .map(|a| AmenityView {
                    name: a.name.clone(),
                    icon: a.icon.as_str().to_owned(),
                })
                .collect(),
        }
    }
}

/// Map a redirect error code to its user-facing message.
#[must_use]
pub fn flash_message(code: &str) -> String {
    match code {
        "invalid_name" => "Please fill in your full name.".to_owned(),
        "invalid_email" => "Please enter a valid email address.".to_owned(),
        "incomplete" => "Please finish selecting your dates or slot first.".to_owned(),
        "invalid_window" => "That selection has no nights and cannot be booked.".to_owned(),
        "past" => "That date has already passed. Please pick an upcoming one.".to_owned(),
        "conflict" => "Sorry, that window was just taken. Please pick another.".to_owned(),
        _ => "Something went wrong. Please try again.".to_owned(),
    }
}

/// Room listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "rooms/index.html")]
pub struct RoomsIndexTemplate {
    pub is_admin: bool,
    pub rooms: Vec<RoomView>,
}

/// Nightly booking page template.
#[derive(Template, WebTemplate)]
#[template(path = "rooms/book.html")]
pub struct BookTemplate {
    pub is_admin: bool,
    pub room: RoomView,
    pub calendar: CalendarMonth,
    pub selected_from: Option<String>,
    pub selected_to: Option<String>,
    pub nights: i64,
    /// Raw decimal string; templates apply the `money` filter.
    pub total: String,
    pub show_form: bool,
    pub error: Option<String>,
    pub hourly_href: String,
    pub clear_href: String,
}

/// One cell of the hourly slot grid.
pub struct SlotCell {
    pub label: String,
    /// Click target; `None` when the slot is booked.
    pub href: Option<String>,
    pub selected: bool,
    pub booked: bool,
}

/// Hourly booking page template.
#[derive(Template, WebTemplate)]
#[template(path = "rooms/book_hourly.html")]
pub struct BookHourlyTemplate {
    pub is_admin: bool,
    pub room: RoomView,
    pub date: String,
    pub slots: Vec<SlotCell>,
    pub selected_start: Option<String>,
    pub selected_end: Option<String>,
    pub prev_href: Option<String>,
    pub next_href: String,
    pub nightly_href: String,
    pub error: Option<String>,
}

/// Display the room cards.
pub async fn index(State(state): State<AppState>, user: CurrentUser) -> RoomsIndexTemplate {
    let rooms = state.rooms().read().await;
    RoomsIndexTemplate {
        is_admin: user.is_admin,
        rooms: rooms.list().map(RoomView::from).collect(),
    }
}

/// Query parameters carrying the range-selection state.
#[derive(Debug, Deserialize)]
pub struct BookQuery {
    pub month: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub error: Option<String>,
}

/// Parse a `YYYY-MM` month key.
fn parse_month(raw: &str) -> Option<(i32, u32)> {
    let (y, m) = raw.split_once('-')?;
    let year = y.parse::<i32>().ok()?;
    let month = m.parse::<u32>().ok().filter(|m| (1..=12).contains(m))?;
    Some((year, month))
}

/// Rebuild a [`RangeSelection`] from query parameters, dropping anything
/// unparseable.
pub fn selection_from_query(from: Option<&str>, to: Option<&str>) -> RangeSelection {
    RangeSelection::from_parts(
        from.and_then(|s| parse_date(s).ok()),
        to.and_then(|s| parse_date(s).ok()),
    )
}

/// Display the nightly booking calendar for a room.
pub async fn book(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<RoomId>,
    Query(query): Query<BookQuery>,
) -> Result<BookTemplate> {
    let rooms = state.rooms().read().await;
    let room = rooms
        .get(id)
        .ok_or_else(|| AppError::NotFound(format!("room {id}")))?;
    let room_view = RoomView::from(room);
    let price = room.price_per_night;
    drop(rooms);

    let today = AppState::today();
    let selection = selection_from_query(query.from.as_deref(), query.to.as_deref());
    let (year, month) = query
        .month
        .as_deref()
        .and_then(parse_month)
        .or_else(|| selection.from.map(|d| (d.year(), d.month())))
        .unwrap_or((today.year(), today.month()));

    let bookings = state.bookings().read().await;
    let base_path = format!("/rooms/{id}/book");
    let calendar = build_calendar(
        &base_path, &bookings, id, None, selection, today, year, month,
    );
    drop(bookings);

    let nights = selection.nights();
    let show_form = selection.phase() == RangePhase::Complete && nights > 0;

    Ok(BookTemplate {
        is_admin: user.is_admin,
        room: room_view,
        calendar,
        selected_from: selection.from.map(|d| d.format(DATE_FORMAT).to_string()),
        selected_to: selection.to.map(|d| d.format(DATE_FORMAT).to_string()),
        nights,
        total: selection.total_price(price).to_string(),
        show_form,
        error: query.error.as_deref().map(flash_message),
        hourly_href: format!("/rooms/{id}/book/hourly"),
        clear_href: format!("{base_path}?month={year:04}-{month:02}"),
    })
}

/// Query parameters carrying the slot-selection state.
#[derive(Debug, Deserialize)]
pub struct BookHourlyQuery {
    pub date: Option<String>,
    pub slot: Option<String>,
    pub error: Option<String>,
}

/// Display the hourly slot picker for a room.
pub async fn book_hourly(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<RoomId>,
    Query(query): Query<BookHourlyQuery>,
) -> Result<BookHourlyTemplate> {
    let rooms = state.rooms().read().await;
    let room_view = rooms
        .get(id)
        .map(RoomView::from)
        .ok_or_else(|| AppError::NotFound(format!("room {id}")))?;
    drop(rooms);

    let today = AppState::today();
    // Past dates are never bookable; clamp back to today
    let date = query
        .date
        .as_deref()
        .and_then(|s| parse_date(s).ok())
        .filter(|d| *d >= today)
        .unwrap_or(today);

    let bookings = state.bookings().read().await;
    let mut selection = SlotSelection::new(date);
    if let Some(start) = query.slot.as_deref().and_then(|s| parse_time(s).ok()) {
        // A blocked or off-catalog slot in the URL is silently dropped
        selection = selection.select(start, &bookings, id, None);
    }
    let booked = blocked_slots(&bookings, id, date, None);
    drop(bookings);

    let base_path = format!("/rooms/{id}/book/hourly");
    let date_key = date.format(DATE_FORMAT);
    let slots = slot_catalog()
        .into_iter()
        .map(|start| {
            let label = start.format(TIME_FORMAT).to_string();
            let is_booked = booked.contains(&start);
            SlotCell {
                href: (!is_booked).then(|| format!("{base_path}?date={date_key}&slot={label}")),
                selected: selection.slot == Some(start),
                booked: is_booked,
                label,
            }
        })
        .collect();

    let prev = date - Duration::days(1);
    let next = date + Duration::days(1);

    Ok(BookHourlyTemplate {
        is_admin: user.is_admin,
        room: room_view,
        date: date.format(DATE_FORMAT).to_string(),
        slots,
        selected_start: selection
            .slot
            .map(|t| t.format(TIME_FORMAT).to_string()),
        selected_end: selection.window().and_then(|w| match w {
            roomboard_core::ReservationWindow::TimeSlot { end, .. } => {
                Some(end.format(TIME_FORMAT).to_string())
            }
            roomboard_core::ReservationWindow::DayRange { .. } => None,
        }),
        prev_href: (prev >= today)
            .then(|| format!("{base_path}?date={}", prev.format(DATE_FORMAT))),
        next_href: format!("{base_path}?date={}", next.format(DATE_FORMAT)),
        nightly_href: format!("/rooms/{id}/book"),
        error: query.error.as_deref().map(flash_message),
    })
}
