//! Session role toggle.

use axum::response::Redirect;
use tower_sessions::Session;

use crate::error::{AppError, Result};
use crate::middleware::toggle_admin;

/// Flip the session's admin flag and return to the room listing.
pub async fn toggle(session: Session) -> Result<Redirect> {
    let is_admin = toggle_admin(&session)
        .await
        .map_err(|err| AppError::Internal(format!("session store: {err}")))?;
    tracing::debug!(is_admin, "session role toggled");
    Ok(Redirect::to(if is_admin { "/admin" } else { "/rooms" }))
}
