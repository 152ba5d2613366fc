//! Middleware and request extractors.

pub mod session;

pub use session::{create_session_layer, toggle_admin, CurrentUser, RequireAdmin};
