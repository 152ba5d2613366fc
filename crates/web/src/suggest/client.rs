//! Anthropic Messages API client for amenity suggestions.

use std::sync::Arc;

use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::config::ClaudeConfig;

use super::error::{ApiErrorResponse, SuggestError};

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const MAX_TOKENS: u32 = 1024;

/// Amenity suggestion client.
///
/// Wraps a single non-streaming Messages API call that turns a room name
/// into a list of suggested amenity names.
#[derive(Clone)]
pub struct SuggestClient {
    inner: Arc<SuggestClientInner>,
}

struct SuggestClientInner {
    client: reqwest::Client,
    model: String,
}

#[derive(Debug, Serialize)]
struct MessagesRequest {
    model: String,
    max_tokens: u32,
    messages: Vec<Message>,
}

#[derive(Debug, Serialize)]
struct Message {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentBlock {
    Text { text: String },
    #[serde(other)]
    Other,
}

impl SuggestClient {
    /// Create a new suggestion client.
    ///
    /// # Panics
    ///
    /// Panics if the API key contains invalid header characters.
    #[must_use]
    pub fn new(config: &ClaudeConfig) -> Self {
        let api_key = config.api_key.expose_secret();

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            "x-api-key",
            HeaderValue::from_str(api_key).expect("Invalid API key for header"),
        );
        headers.insert(
            "anthropic-version",
            HeaderValue::from_static(ANTHROPIC_VERSION),
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            inner: Arc::new(SuggestClientInner {
                client,
                model: config.model.clone(),
            }),
        }
    }

    /// Request amenity suggestions for a room name.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails, the API returns an error
    /// envelope, or the response contains no JSON array of strings.
    #[instrument(skip(self), fields(model = %self.inner.model))]
    pub async fn suggest(&self, room_name: &str) -> Result<Vec<String>, SuggestError> {
        let prompt = format!(
            "Based on the room name \"{room_name}\", suggest a list of 5 to 7 \
             common amenities. Return the list as a simple JSON array of strings \
             with no other text."
        );

        let request = MessagesRequest {
            model: self.inner.model.clone(),
            max_tokens: MAX_TOKENS,
            messages: vec![Message {
                role: "user",
                content: prompt,
            }],
        };

        let response = self
            .inner
            .client
            .post(ANTHROPIC_API_URL)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(match status.as_u16() {
                401 | 403 => SuggestError::Unauthorized(body),
                429 => SuggestError::RateLimited,
                _ => serde_json::from_str::<ApiErrorResponse>(&body).map_or_else(
                    |_| SuggestError::Parse(format!("HTTP {status}: {body}")),
                    |e| SuggestError::Api {
                        error_type: e.error.error_type,
                        message: e.error.message,
                    },
                ),
            });
        }

        let parsed: MessagesResponse = response.json().await?;
        let text: String = parsed
            .content
            .iter()
            .filter_map(|block| match block {
                ContentBlock::Text { text } => Some(text.as_str()),
                ContentBlock::Other => None,
            })
            .collect();

        extract_amenities(&text)
    }
}

/// Pull a JSON array of strings out of the model's reply.
///
/// The model is asked for a bare array, but replies sometimes wrap it in
/// prose or a code fence, so this scans for the outermost brackets and
/// keeps only the string items.
fn extract_amenities(text: &str) -> Result<Vec<String>, SuggestError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(SuggestError::Parse("empty response".to_string()));
    }

    let start = trimmed
        .find('[')
        .ok_or_else(|| SuggestError::Parse("no JSON array in response".to_string()))?;
    let end = trimmed
        .rfind(']')
        .filter(|&e| e > start)
        .ok_or_else(|| SuggestError::Parse("unterminated JSON array".to_string()))?;

    let slice = trimmed
        .get(start..=end)
        .ok_or_else(|| SuggestError::Parse("malformed array bounds".to_string()))?;
    let values: Vec<serde_json::Value> = serde_json::from_str(slice)
        .map_err(|e| SuggestError::Parse(format!("invalid JSON: {e}")))?;

    let amenities: Vec<String> = values
        .into_iter()
        .filter_map(|v| match v {
            serde_json::Value::String(s) => Some(s),
            _ => None,
        })
        .collect();

    if amenities.is_empty() {
        return Err(SuggestError::Parse("no string items in array".to_string()));
    }
    Ok(amenities)
}
