//! Core data types for games, guesses, and sample-data records.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Number of wrong guesses that ends a game.
pub const MAX_WRONG_GUESSES: u32 = 6;

/// Placeholder shown for letters that have not been guessed yet.
pub const MASK_CHAR: char = '_';

/// Difficulty level. Controls the word list and the time budget.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[serde(alias = "usor")]
    Easy,
    #[default]
    #[serde(alias = "mediu")]
    Medium,
    #[serde(alias = "greu")]
    Hard,
    Expert,
}

impl Difficulty {
    /// Every difficulty, easiest first.
    pub const ALL: [Difficulty; 4] = [
        Difficulty::Easy,
        Difficulty::Medium,
        Difficulty::Hard,
        Difficulty::Expert,
    ];

    /// Seconds on the clock when a game starts.
    pub fn time_limit(self) -> i64 {
        match self {
            Difficulty::Easy => 400,
            Difficulty::Medium => 300,
            Difficulty::Hard => 200,
            Difficulty::Expert => 150,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
            Difficulty::Expert => "expert",
        }
    }

    /// Parse a difficulty, falling back to [`Difficulty::Medium`] on missing or unknown input.
    pub fn parse_or_default(input: Option<&str>) -> Self {
        match input.map(str::parse::<Difficulty>) {
            Some(Ok(difficulty)) => difficulty,
            Some(Err(e)) => {
                tracing::debug!("{e}, using medium");
                Difficulty::default()
            }
            None => Difficulty::default(),
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "easy" | "usor" => Ok(Difficulty::Easy),
            "medium" | "mediu" => Ok(Difficulty::Medium),
            "hard" | "greu" => Ok(Difficulty::Hard),
            "expert" => Ok(Difficulty::Expert),
            _ => Err(GameError::InvalidDifficulty(s.to_string())),
        }
    }
}

/// Why a game was lost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LossReason {
    /// Ran out of wrong guesses.
    Hanged,
    /// The clock reached zero.
    TimedOut,
}

/// Where a game is in its lifecycle. `Won` and `Lost` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "reason", rename_all = "snake_case")]
pub enum GameStatus {
    Playing,
    Won,
    Lost(LossReason),
}

impl GameStatus {
    pub fn is_over(self) -> bool {
        !matches!(self, GameStatus::Playing)
    }

    pub fn is_won(self) -> bool {
        matches!(self, GameStatus::Won)
    }
}

/// What a client learns when a game starts. Never carries the word.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartInfo {
    pub word_length: usize,
    pub time_left: i64,
    pub difficulty: Difficulty,
}

/// Result of an accepted guess.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuessOutcome {
    pub correct: bool,
    pub displayed_word: String,
    pub wrong_guesses: u32,
    pub game_over: bool,
    pub won: bool,
    /// The answer, only once the game is over.
    pub word: Option<String>,
}

/// Result of a clock report from the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TimeUpdate {
    /// The clock ran out on a game that was still in progress.
    TimeUp { word: String },
    /// The clock was recorded; the game goes on (or was already over).
    Ticked { time_left: i64 },
}

/// Read-only view of a game, safe to show to the player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameView {
    pub difficulty: Difficulty,
    pub displayed_word: String,
    pub guessed_letters: Vec<char>,
    pub wrong_guesses: u32,
    pub max_wrong: u32,
    pub time_left: i64,
    pub game_over: bool,
    pub won: bool,
    pub word: Option<String>,
}

/// A loosely-typed record fetched from a JSON API. Key order follows the source.
pub type Record = serde_json::Map<String, serde_json::Value>;

/// Summary statistics over a batch of records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Statistics {
    pub total_items: usize,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub fields: Vec<String>,
    pub processed: bool,
}

/// Errors raised by game operations. All are recoverable and leave the game untouched.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("No game has been started")]
    NoActiveGame,

    #[error("The game is already over")]
    GameAlreadyOver,

    #[error("Letter '{0}' was already guessed")]
    DuplicateGuess(char),

    #[error("Invalid letter: {0:?} (expected a single character)")]
    InvalidLetter(String),

    #[error("Invalid difficulty: {0}")]
    InvalidDifficulty(String),
}

/// Convenience result type for game operations.
pub type GameResult<T> = Result<T, GameError>;

/// Errors that can occur while fetching, exporting, or charting sample data.
#[derive(thiserror::Error, Debug)]
pub enum PipelineError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Request to {url} failed with status {status}")]
    Status { url: String, status: u16 },

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Convenience result type for the data pipeline.
pub type PipelineResult<T> = Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_difficulty_parse() {
        assert_eq!("easy".parse::<Difficulty>().unwrap(), Difficulty::Easy);
        assert_eq!(" HARD ".parse::<Difficulty>().unwrap(), Difficulty::Hard);
        assert_eq!("mediu".parse::<Difficulty>().unwrap(), Difficulty::Medium);
        assert_eq!("greu".parse::<Difficulty>().unwrap(), Difficulty::Hard);
        assert!(matches!(
            "nightmare".parse::<Difficulty>(),
            Err(GameError::InvalidDifficulty(_))
        ));
    }

    #[test]
    fn test_difficulty_fallback() {
        assert_eq!(Difficulty::parse_or_default(None), Difficulty::Medium);
        assert_eq!(Difficulty::parse_or_default(Some("bogus")), Difficulty::Medium);
        assert_eq!(Difficulty::parse_or_default(Some("expert")), Difficulty::Expert);
    }

    #[test]
    fn test_time_limits() {
        assert_eq!(Difficulty::Easy.time_limit(), 400);
        assert_eq!(Difficulty::Medium.time_limit(), 300);
        assert_eq!(Difficulty::Hard.time_limit(), 200);
        assert_eq!(Difficulty::Expert.time_limit(), 150);
    }

    #[test]
    fn test_difficulty_serde() {
        assert_eq!(serde_json::to_string(&Difficulty::Hard).unwrap(), "\"hard\"");
        let d: Difficulty = serde_json::from_str("\"usor\"").unwrap();
        assert_eq!(d, Difficulty::Easy);
    }

    #[test]
    fn test_time_update_shapes() {
        let up = serde_json::to_value(TimeUpdate::TimeUp { word: "CAT".into() }).unwrap();
        assert_eq!(up, serde_json::json!({ "word": "CAT" }));
        let tick = serde_json::to_value(TimeUpdate::Ticked { time_left: 12 }).unwrap();
        assert_eq!(tick, serde_json::json!({ "time_left": 12 }));
    }
}
