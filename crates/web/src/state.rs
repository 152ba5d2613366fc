//! Application state shared across handlers.

use std::sync::Arc;

use chrono::NaiveDate;
use tokio::sync::RwLock;

use roomboard_core::sample;
use roomboard_core::{BookingStore, RoomStore};

use crate::config::WebConfig;
use crate::suggest::{fallback_suggestions, SuggestClient};

/// How long suggestion results stay cached per room name.
const SUGGESTION_TTL_SECS: u64 = 10 * 60;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`. All booking state lives in memory for the
/// life of the process: the stores are seeded from sample data at startup
/// and guarded by async `RwLock`s (handlers never hold a guard across a
/// suggestion call).
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: WebConfig,
    rooms: RwLock<RoomStore>,
    bookings: RwLock<BookingStore>,
    suggester: Option<SuggestClient>,
    suggestion_cache: moka::future::Cache<String, Vec<String>>,
}

impl AppState {
    /// Create application state with freshly seeded stores.
    #[must_use]
    pub fn new(config: WebConfig) -> Self {
        let mut rooms = RoomStore::new();
        let mut bookings = BookingStore::new();
        sample::seed_rooms(&mut rooms);
        sample::seed_bookings(&mut bookings, Self::today());

        let suggester = config.claude.as_ref().map(SuggestClient::new);
        if suggester.is_none() {
            tracing::info!("ANTHROPIC_API_KEY not set; amenity suggestions use the fallback list");
        }

        let suggestion_cache = moka::future::Cache::builder()
            .max_capacity(128)
            .time_to_live(std::time::Duration::from_secs(SUGGESTION_TTL_SECS))
            .build();

        Self {
            inner: Arc::new(AppStateInner {
                config,
                rooms: RwLock::new(rooms),
                bookings: RwLock::new(bookings),
                suggester,
                suggestion_cache,
            }),
        }
    }

    /// The application configuration.
    #[must_use]
    pub fn config(&self) -> &WebConfig {
        &self.inner.config
    }

    /// The room store.
    #[must_use]
    pub fn rooms(&self) -> &RwLock<RoomStore> {
        &self.inner.rooms
    }

    /// The booking store.
    #[must_use]
    pub fn bookings(&self) -> &RwLock<BookingStore> {
        &self.inner.bookings
    }

    /// Today's local date with the time-of-day zeroed.
    #[must_use]
    pub fn today() -> NaiveDate {
        chrono::Local::now().date_naive()
    }

    /// Amenity suggestions for a room name.
    ///
    /// Results are cached per room name. Any failure (no API key
    /// configured, network error, unparseable reply) is logged and
    /// recovered with the static fallback list; this call never fails and
    /// never touches booking state.
    pub async fn suggest_amenities(&self, room_name: &str) -> Vec<String> {
        let Some(client) = &self.inner.suggester else {
            return fallback_suggestions();
        };

        let result = self
            .inner
            .suggestion_cache
            .try_get_with(room_name.to_owned(), client.suggest(room_name))
            .await;

        match result {
            Ok(suggestions) => suggestions,
            Err(err) => {
                tracing::warn!(room = room_name, error = %err, "amenity suggestion failed; using fallback");
                fallback_suggestions()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{IpAddr, Ipv4Addr};

    fn config_without_claude() -> WebConfig {
        WebConfig {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 3000,
            claude: None,
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
        }
    }

    #[tokio::test]
    async fn test_suggestions_fall_back_without_api_key() {
        let state = AppState::new(config_without_claude());
        assert_eq!(
            state.suggest_amenities("Boardroom").await,
            fallback_suggestions()
        );
    }
}
