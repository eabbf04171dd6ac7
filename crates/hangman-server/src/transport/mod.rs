//! Transport layer for the browser client.

#[cfg(feature = "http")]
pub mod http;

#[cfg(feature = "http")]
pub use http::{router, AppState, HttpTransport};

/// Every route the HTTP transport serves, as `(method, path, description)`.
pub const ROUTES: &[(&str, &str, &str)] = &[
    ("GET", "/", "Browser client"),
    ("GET", "/health", "Liveness and session count"),
    ("POST", "/start_game", "Start a new game {difficulty?}"),
    ("POST", "/guess", "Guess a letter {letter}"),
    ("POST", "/update_time", "Report the client clock {time_left}"),
    ("GET", "/state", "Current game, word withheld while playing"),
    ("GET", "/api/data/pipeline", "Run the sample-data pipeline"),
    ("GET", "/api/data/status", "Pipeline readiness"),
];
