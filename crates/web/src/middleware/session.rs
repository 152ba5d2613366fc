//! Session middleware configuration and role extractors.
//!
//! Sets up in-memory sessions using tower-sessions. The session carries a
//! single boolean: whether the browser is currently acting as the admin.
//! There is no authentication beyond this role flag; every session acts as
//! the demo user.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use tower_sessions::{Expiry, MemoryStore, Session, SessionManagerLayer};

use roomboard_core::sample;
use roomboard_core::UserId;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "rb_session";

/// Session key for the admin role flag.
const ADMIN_FLAG_KEY: &str = "is_admin";

/// Session expiry time in seconds (1 day - state is per-session anyway).
const SESSION_EXPIRY_SECONDS: i64 = 24 * 60 * 60;

/// Create the session layer with the in-memory store.
#[must_use]
pub fn create_session_layer() -> SessionManagerLayer<MemoryStore> {
    let store = MemoryStore::default();

    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(false)
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}

/// The user this request acts as, with the session's role flag.
#[derive(Debug, Clone, Copy)]
pub struct CurrentUser {
    /// The acting user (the fixed demo user).
    pub id: UserId,
    /// Whether the session has toggled into the admin role.
    pub is_admin: bool,
}

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let is_admin = match parts.extensions.get::<Session>() {
            Some(session) => session
                .get::<bool>(ADMIN_FLAG_KEY)
                .await
                .ok()
                .flatten()
                .unwrap_or(false),
            None => false,
        };

        Ok(Self {
            id: sample::demo_user(),
            is_admin,
        })
    }
}

/// Extractor that requires the admin role flag.
///
/// Admin routes reject with `401` when the flag is not set; there is no
/// login to redirect to.
pub struct RequireAdmin(pub CurrentUser);

/// Rejection for [`RequireAdmin`].
pub struct AdminRejection;

impl IntoResponse for AdminRejection {
    fn into_response(self) -> Response {
        (StatusCode::UNAUTHORIZED, "Admin role required").into_response()
    }
}

impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
{
    type Rejection = AdminRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let user = CurrentUser::from_request_parts(parts, state)
            .await
            .unwrap_or(CurrentUser {
                id: sample::demo_user(),
                is_admin: false,
            });
        if user.is_admin {
            Ok(Self(user))
        } else {
            Err(AdminRejection)
        }
    }
}

/// Flip the session's admin flag, returning the new value.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn toggle_admin(session: &Session) -> Result<bool, tower_sessions::session::Error> {
    let current = session
        .get::<bool>(ADMIN_FLAG_KEY)
        .await?
        .unwrap_or(false);
    let next = !current;
    session.insert(ADMIN_FLAG_KEY, next).await?;
    Ok(next)
}
