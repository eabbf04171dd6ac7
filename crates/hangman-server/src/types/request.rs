//! Request bodies for the game endpoints.
//!
//! Every field is optional so that a missing or partial body degrades to the
//! defaults. A field that is present with the wrong type is a different matter
//! for the clock report; see [`parse_body`].

use serde::{Deserialize, Deserializer};

use super::error::{ServerError, ServerResult};

#[derive(Debug, Default, Deserialize)]
pub struct StartGameRequest {
    #[serde(default)]
    pub difficulty: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct GuessRequest {
    #[serde(default)]
    pub letter: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateTimeRequest {
    #[serde(default, deserialize_with = "whole_seconds")]
    pub time_left: Option<i64>,
}

/// Accept any JSON number. Fractions round up, so a clock with time
/// remaining never reads as zero.
fn whole_seconds<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Seconds {
        Whole(i64),
        Fraction(f64),
    }

    Ok(Option::<Seconds>::deserialize(deserializer)?.map(|secs| match secs {
        Seconds::Whole(n) => n,
        Seconds::Fraction(f) => f.ceil() as i64,
    }))
}

/// Parse a JSON body, falling back to the default for empty or malformed input.
pub fn parse_lenient<T: Default + serde::de::DeserializeOwned>(body: &[u8]) -> T {
    if body.iter().all(u8::is_ascii_whitespace) {
        return T::default();
    }
    serde_json::from_slice(body).unwrap_or_else(|e| {
        tracing::debug!("Ignoring malformed request body: {e}");
        T::default()
    })
}

/// Parse a JSON body. An empty body is the default; anything that does not
/// deserialize is an [`ServerError::InvalidRequest`].
pub fn parse_body<T: Default + serde::de::DeserializeOwned>(body: &[u8]) -> ServerResult<T> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(body).map_err(|e| ServerError::InvalidRequest(e.to_string()))
}
