//! Response bodies for the game endpoints.

use serde::Serialize;
use serde_json::{json, Value};

use hangman::{Difficulty, GuessOutcome, StartInfo, TimeUpdate};

#[derive(Debug, Serialize)]
pub struct StartGameResponse {
    pub success: bool,
    pub session_id: String,
    pub word_length: usize,
    pub time_left: i64,
    pub difficulty: Difficulty,
}

impl StartGameResponse {
    pub fn new(session_id: &str, info: StartInfo) -> Self {
        Self {
            success: true,
            session_id: session_id.to_string(),
            word_length: info.word_length,
            time_left: info.time_left,
            difficulty: info.difficulty,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct GuessResponse {
    pub success: bool,
    #[serde(flatten)]
    pub outcome: GuessOutcome,
}

impl From<GuessOutcome> for GuessResponse {
    fn from(outcome: GuessOutcome) -> Self {
        Self {
            success: true,
            outcome,
        }
    }
}

/// `{success, time_left}` while the clock runs, `{time_up, game_over, word}` when it runs out.
pub fn time_update_json(update: &TimeUpdate) -> Value {
    match update {
        TimeUpdate::TimeUp { word } => json!({
            "time_up": true,
            "game_over": true,
            "word": word,
        }),
        TimeUpdate::Ticked { time_left } => json!({
            "success": true,
            "time_left": time_left,
        }),
    }
}
