//! AI amenity suggestions for the admin panel.
//!
//! A single request/response call: given a room name, return a short list
//! of amenity suggestions. Failures never propagate into booking state -
//! callers fall back to [`FALLBACK_SUGGESTIONS`].

mod client;
mod error;

pub use client::SuggestClient;
pub use error::SuggestError;

/// Static fallback served when suggestions are unavailable (missing API
/// key, network failure, unparseable response).
pub const FALLBACK_SUGGESTIONS: &[&str] = &["Projector", "Whiteboard", "Coffee Maker"];

/// The fallback list as owned strings, for cache storage and templates.
#[must_use]
pub fn fallback_suggestions() -> Vec<String> {
    FALLBACK_SUGGESTIONS.iter().map(ToString::to_string).collect()
}
