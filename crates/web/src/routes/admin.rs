//! Admin panel handlers.
//!
//! All handlers require the session admin flag via [`RequireAdmin`].
//! Room forms arrive as raw urlencoded bodies because the amenity
//! checkboxes repeat the `amenity` key.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, Query, RawForm, State},
    response::{IntoResponse, Redirect, Response},
};
use rust_decimal::Decimal;
use serde::Deserialize;

use roomboard_core::store::RoomDraft;
use roomboard_core::types::{amenities_from_names, standard_amenities};
use roomboard_core::RoomId;

use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::RequireAdmin;
use crate::routes::rooms::RoomView;
use crate::state::AppState;

/// Map an admin-form error code to its user-facing message.
fn admin_flash_message(code: &str) -> String {
    match code {
        "invalid_room_name" => "Please give the room a name.".to_owned(),
        "invalid_capacity" => "Capacity must be a whole number of at least 1.".to_owned(),
        "invalid_price" => "Price must be a non-negative amount.".to_owned(),
        _ => "Something went wrong. Please try again.".to_owned(),
    }
}

/// One amenity checkbox in a room form.
pub struct AmenityOption {
    pub name: String,
    pub icon: String,
    pub checked: bool,
}

/// Build the checkbox list from the standard catalog, checking the
/// given names.
fn amenity_options(checked: &[String]) -> Vec<AmenityOption> {
    standard_amenities()
        .into_iter()
        .map(|a| AmenityOption {
            checked: checked.iter().any(|n| n == &a.name),
            icon: a.icon.as_str().to_owned(),
            name: a.name,
        })
        .collect()
}

// =============================================================================
// Room form parsing
// =============================================================================

/// Raw fields of the create/edit room form.
#[derive(Debug, Default)]
struct RoomForm {
    name: String,
    capacity: String,
    price: String,
    image_url: String,
    amenities: Vec<String>,
}

impl RoomForm {
    /// Decode a urlencoded body. The `amenity` key repeats once per
    /// checked checkbox.
    fn parse(body: &[u8]) -> Self {
        let mut form = Self::default();
        for (key, value) in url::form_urlencoded::parse(body) {
            match key.as_ref() {
                "name" => form.name = value.into_owned(),
                "capacity" => form.capacity = value.into_owned(),
                "price" => form.price = value.into_owned(),
                "image_url" => form.image_url = value.into_owned(),
                "amenity" => form.amenities.push(value.into_owned()),
                _ => {}
            }
        }
        form
    }

    /// Validate into a store draft, or an error code for the redirect.
    fn validate(self) -> std::result::Result<RoomDraft, &'static str> {
        let name = self.name.trim().to_owned();
        if name.is_empty() {
            return Err("invalid_room_name");
        }
        let capacity: u32 = self
            .capacity
            .trim()
            .parse()
            .ok()
            .filter(|c| *c >= 1)
            .ok_or("invalid_capacity")?;
        let price: Decimal = self
            .price
            .trim()
            .parse()
            .ok()
            .filter(|p: &Decimal| !p.is_sign_negative())
            .ok_or("invalid_price")?;
        Ok(RoomDraft {
            name,
            capacity,
            price_per_night: price,
            amenities: amenities_from_names(self.amenities.iter().map(String::as_str)),
            image_url: self.image_url.trim().to_owned(),
        })
    }
}

// =============================================================================
// Panel
// =============================================================================

/// One row of the admin bookings table.
pub struct AdminBookingRow {
    pub booking_id: i32,
    pub room_name: String,
    pub guest_name: String,
    pub guest_email: String,
    pub window: String,
    pub status: String,
}

/// Admin panel template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/index.html")]
pub struct AdminIndexTemplate {
    pub is_admin: bool,
    pub rooms: Vec<RoomView>,
    pub bookings: Vec<AdminBookingRow>,
    pub amenity_options: Vec<AmenityOption>,
    pub error: Option<String>,
}

/// Query parameters for admin pages.
#[derive(Debug, Deserialize)]
pub struct AdminQuery {
    pub error: Option<String>,
}

/// Display the panel: add-room form, room list, and all bookings.
pub async fn index(
    State(state): State<AppState>,
    RequireAdmin(user): RequireAdmin,
    Query(query): Query<AdminQuery>,
) -> AdminIndexTemplate {
    let rooms = state.rooms().read().await;
    let bookings = state.bookings().read().await;

    let booking_rows = bookings
        .list()
        .map(|b| AdminBookingRow {
            booking_id: b.id.as_i32(),
            room_name: rooms
                .get(b.room_id)
                .map_or_else(|| "(removed room)".to_owned(), |r| r.name.clone()),
            guest_name: b.guest_name.clone(),
            guest_email: b.guest_email.as_str().to_owned(),
            window: b.window.to_string(),
            status: b.status.to_string(),
        })
        .collect();

    AdminIndexTemplate {
        is_admin: user.is_admin,
        rooms: rooms.list().map(RoomView::from).collect(),
        bookings: booking_rows,
        amenity_options: amenity_options(&[]),
        error: query.error.as_deref().map(admin_flash_message),
    }
}

/// Create a room from the add-room form.
pub async fn create_room(
    State(state): State<AppState>,
    RequireAdmin(_user): RequireAdmin,
    RawForm(body): RawForm,
) -> Redirect {
    match RoomForm::parse(&body).validate() {
        Ok(draft) => {
            let mut rooms = state.rooms().write().await;
            let room = rooms.add(draft);
            tracing::info!(room = %room.id, name = room.name, "room created");
            Redirect::to("/admin")
        }
        Err(code) => Redirect::to(&format!("/admin?error={code}")),
    }
}

// =============================================================================
// Edit room
// =============================================================================

/// Edit-room page template, shared with the suggestion flow.
#[derive(Template, WebTemplate)]
#[template(path = "admin/edit_room.html")]
pub struct EditRoomTemplate {
    pub is_admin: bool,
    pub room: RoomView,
    pub amenity_options: Vec<AmenityOption>,
    /// Raw suggestion strings from the assistant, shown above the form.
    pub suggestions: Vec<String>,
    pub error: Option<String>,
}

async fn edit_room_template(
    state: &AppState,
    is_admin: bool,
    id: RoomId,
    suggestions: Vec<String>,
    error: Option<String>,
) -> Result<EditRoomTemplate> {
    let rooms = state.rooms().read().await;
    let room = rooms
        .get(id)
        .ok_or_else(|| AppError::NotFound(format!("room {id}")))?;

    // Pre-check the room's own amenities plus any suggested names that
    // match the catalog
    let mut checked: Vec<String> = room.amenities.iter().map(|a| a.name.clone()).collect();
    for suggested in amenities_from_names(suggestions.iter().map(String::as_str)) {
        if !checked.contains(&suggested.name) {
            checked.push(suggested.name);
        }
    }

    Ok(EditRoomTemplate {
        is_admin,
        room: RoomView::from(room),
        amenity_options: amenity_options(&checked),
        suggestions,
        error,
    })
}

/// Display the edit-room form.
pub async fn edit_room_page(
    State(state): State<AppState>,
    RequireAdmin(user): RequireAdmin,
    Path(id): Path<RoomId>,
    Query(query): Query<AdminQuery>,
) -> Result<EditRoomTemplate> {
    let error = query.error.as_deref().map(admin_flash_message);
    edit_room_template(&state, user.is_admin, id, Vec::new(), error).await
}

/// Save the edit-room form.
pub async fn edit_room(
    State(state): State<AppState>,
    RequireAdmin(_user): RequireAdmin,
    Path(id): Path<RoomId>,
    RawForm(body): RawForm,
) -> Result<Redirect> {
    match RoomForm::parse(&body).validate() {
        Ok(draft) => {
            let mut rooms = state.rooms().write().await;
            rooms
                .update(id, draft)
                .map_err(|_| AppError::NotFound(format!("room {id}")))?;
            tracing::info!(room = %id, "room updated");
            Ok(Redirect::to("/admin"))
        }
        Err(code) => Ok(Redirect::to(&format!("/admin/rooms/{id}/edit?error={code}"))),
    }
}

/// Fetch amenity suggestions for a room and re-render its edit form with
/// matching catalog entries pre-checked.
pub async fn suggest(
    State(state): State<AppState>,
    RequireAdmin(user): RequireAdmin,
    Path(id): Path<RoomId>,
) -> Result<Response> {
    let name = {
        let rooms = state.rooms().read().await;
        rooms
            .get(id)
            .map(|r| r.name.clone())
            .ok_or_else(|| AppError::NotFound(format!("room {id}")))?
    };

    // No store lock is held across the network call
    let suggestions = state.suggest_amenities(&name).await;
    tracing::debug!(room = %id, count = suggestions.len(), "amenity suggestions ready");

    Ok(edit_room_template(&state, user.is_admin, id, suggestions, None)
        .await?
        .into_response())
}
