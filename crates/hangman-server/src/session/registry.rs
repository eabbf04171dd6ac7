//! Per-session game registry — one live game per session id.
//!
//! The registry holds at most `max_sessions` games. Starting a game for a new
//! session when full evicts the least recently used one.

use std::collections::HashMap;

use rand::rngs::StdRng;
use rand::SeedableRng;

use hangman::{Difficulty, Game, GameError, GameResult, GameView, GuessOutcome, StartInfo, TimeUpdate};

/// Session used by clients that do not send an id.
pub const DEFAULT_SESSION: &str = "default";

/// Default cap on live sessions.
pub const DEFAULT_MAX_SESSIONS: usize = 1000;

struct Slot {
    game: Game,
    last_used: u64,
}

/// Maps session ids to their current game and owns the word-selection RNG.
pub struct GameRegistry {
    games: HashMap<String, Slot>,
    rng: StdRng,
    max_sessions: usize,
    /// Logical clock for recency; bumped on every start, guess and clock report.
    tick: u64,
}

impl GameRegistry {
    /// Registry with an entropy-seeded RNG.
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Registry whose word picks are reproducible.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    pub fn from_seed(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::with_seed(seed),
            None => Self::new(),
        }
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            games: HashMap::new(),
            rng,
            max_sessions: DEFAULT_MAX_SESSIONS,
            tick: 0,
        }
    }

    /// Cap the number of live sessions. Values below 1 are raised to 1.
    pub fn with_max_sessions(mut self, max_sessions: usize) -> Self {
        self.max_sessions = max_sessions.max(1);
        self
    }

    pub fn max_sessions(&self) -> usize {
        self.max_sessions
    }

    /// Start a new game for the session, replacing any previous one.
    pub fn start(&mut self, session_id: &str, difficulty: Difficulty) -> StartInfo {
        let game = Game::start(difficulty, &mut self.rng);
        let info = game.start_info();
        tracing::info!(
            session = session_id,
            difficulty = %difficulty,
            word_length = info.word_length,
            "Started new game"
        );
        self.insert(session_id, game);
        info
    }

    /// Put a prepared game in place for the session.
    pub fn insert(&mut self, session_id: &str, game: Game) {
        if !self.games.contains_key(session_id) {
            while self.games.len() >= self.max_sessions {
                self.evict_least_recent();
            }
        }
        let last_used = self.next_tick();
        self.games
            .insert(session_id.to_string(), Slot { game, last_used });
    }

    pub fn guess(&mut self, session_id: &str, letter: &str) -> GameResult<GuessOutcome> {
        self.game_mut(session_id)?.guess(letter)
    }

    pub fn update_time(&mut self, session_id: &str, time_left: i64) -> GameResult<TimeUpdate> {
        let update = self.game_mut(session_id)?.update_time(time_left);
        if let TimeUpdate::TimeUp { .. } = update {
            tracing::info!(session = session_id, "Game over: time ran out");
        }
        Ok(update)
    }

    pub fn view(&self, session_id: &str) -> GameResult<GameView> {
        self.get(session_id)
            .map(Game::view)
            .ok_or(GameError::NoActiveGame)
    }

    pub fn get(&self, session_id: &str) -> Option<&Game> {
        self.games.get(session_id).map(|slot| &slot.game)
    }

    pub fn remove(&mut self, session_id: &str) -> Option<Game> {
        self.games.remove(session_id).map(|slot| slot.game)
    }

    /// Number of sessions with a game.
    pub fn count(&self) -> usize {
        self.games.len()
    }

    fn game_mut(&mut self, session_id: &str) -> GameResult<&mut Game> {
        let tick = self.next_tick();
        let slot = self
            .games
            .get_mut(session_id)
            .ok_or(GameError::NoActiveGame)?;
        slot.last_used = tick;
        Ok(&mut slot.game)
    }

    fn next_tick(&mut self) -> u64 {
        self.tick += 1;
        self.tick
    }

    fn evict_least_recent(&mut self) {
        let oldest = self
            .games
            .iter()
            .min_by_key(|(_, slot)| slot.last_used)
            .map(|(id, _)| id.clone());
        if let Some(id) = oldest {
            self.games.remove(&id);
            tracing::debug!(session = %id, "Evicted least recently used session");
        }
    }
}

impl Default for GameRegistry {
    fn default() -> Self {
        Self::new()
    }
}
