//! Error types for the server and their JSON/HTTP mapping.

use serde_json::{json, Value};

use hangman::{GameError, PipelineError};

/// HTTP status codes used by the server.
pub mod status_codes {
    pub const BAD_REQUEST: u16 = 400;
    pub const NOT_FOUND: u16 = 404;
    pub const INTERNAL_ERROR: u16 = 500;
}

/// All errors that can occur in the server.
#[derive(thiserror::Error, Debug)]
pub enum ServerError {
    #[error(transparent)]
    Game(#[from] GameError),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Not found")]
    NotFound,

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ServerError {
    pub fn status_code(&self) -> u16 {
        use status_codes::*;
        match self {
            ServerError::Game(_) | ServerError::InvalidRequest(_) => BAD_REQUEST,
            ServerError::NotFound => NOT_FOUND,
            ServerError::Pipeline(_) | ServerError::Transport(_) | ServerError::Io(_) => {
                INTERNAL_ERROR
            }
        }
    }

    /// Response body for this error.
    ///
    /// Game and request errors use `{success, error}`, pipeline failures use
    /// `{status, message}`, and unknown routes `{error}`.
    pub fn to_json(&self) -> Value {
        match self {
            ServerError::Game(_) | ServerError::InvalidRequest(_) => json!({
                "success": false,
                "error": self.to_string(),
            }),
            ServerError::NotFound => json!({ "error": self.to_string() }),
            ServerError::Pipeline(_) => json!({
                "status": "error",
                "message": self.to_string(),
            }),
            ServerError::Transport(_) | ServerError::Io(_) => json!({
                "success": false,
                "error": self.to_string(),
            }),
        }
    }
}

pub type ServerResult<T> = Result<T, ServerError>;
