//! The Hangman state machine.

use std::collections::BTreeSet;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::types::{
    Difficulty, GameError, GameResult, GameStatus, GameView, GuessOutcome, LossReason,
    StartInfo, TimeUpdate, MASK_CHAR, MAX_WRONG_GUESSES,
};
use crate::words::words_for;

/// A single game of Hangman.
///
/// Moves from [`GameStatus::Playing`] to `Won` or `Lost` exactly once. After that
/// the word, the guessed letters, the wrong-guess count and the status are frozen.
#[derive(Debug, Clone)]
pub struct Game {
    word: String,
    guessed: BTreeSet<char>,
    wrong_guesses: u32,
    max_wrong: u32,
    status: GameStatus,
    time_left: i64,
    difficulty: Difficulty,
}

impl Game {
    /// Start a game with a word drawn uniformly from the difficulty's list.
    pub fn start<R: Rng + ?Sized>(difficulty: Difficulty, rng: &mut R) -> Self {
        let word = words_for(difficulty)
            .choose(rng)
            .copied()
            .unwrap_or("HANGMAN");
        Self::with_word(word, difficulty)
    }

    /// Start a game with a fixed word.
    pub fn with_word(word: &str, difficulty: Difficulty) -> Self {
        Self {
            word: word.to_uppercase(),
            guessed: BTreeSet::new(),
            wrong_guesses: 0,
            max_wrong: MAX_WRONG_GUESSES,
            status: GameStatus::Playing,
            time_left: difficulty.time_limit(),
            difficulty,
        }
    }

    /// What the client is told on start. Leaves the word out.
    pub fn start_info(&self) -> StartInfo {
        StartInfo {
            word_length: self.word.chars().count(),
            time_left: self.time_left,
            difficulty: self.difficulty,
        }
    }

    /// Guess one letter. Case-insensitive.
    pub fn guess(&mut self, input: &str) -> GameResult<GuessOutcome> {
        let letter = normalize_letter(input)?;

        if self.status.is_over() {
            return Err(GameError::GameAlreadyOver);
        }
        if self.guessed.contains(&letter) {
            return Err(GameError::DuplicateGuess(letter));
        }

        self.guessed.insert(letter);
        let correct = self.word.contains(letter);

        if correct {
            if self.word.chars().all(|c| self.guessed.contains(&c)) {
                self.status = GameStatus::Won;
            }
        } else {
            self.wrong_guesses += 1;
            if self.wrong_guesses >= self.max_wrong {
                self.status = GameStatus::Lost(LossReason::Hanged);
            }
        }

        tracing::debug!(
            letter = %letter,
            correct,
            wrong_guesses = self.wrong_guesses,
            status = ?self.status,
            "guess recorded"
        );

        Ok(GuessOutcome {
            correct,
            displayed_word: self.masked_word(),
            wrong_guesses: self.wrong_guesses,
            game_over: self.is_over(),
            won: self.is_won(),
            word: self.revealed_word(),
        })
    }

    /// Record the client's clock. Zero or less ends a running game.
    pub fn update_time(&mut self, time_left: i64) -> TimeUpdate {
        self.time_left = time_left;

        if time_left <= 0 && !self.status.is_over() {
            self.status = GameStatus::Lost(LossReason::TimedOut);
            tracing::debug!(word = %self.word, "time is up");
            return TimeUpdate::TimeUp {
                word: self.word.clone(),
            };
        }

        TimeUpdate::Ticked { time_left }
    }

    /// The word with each unguessed letter replaced by [`MASK_CHAR`].
    pub fn masked_word(&self) -> String {
        self.word
            .chars()
            .map(|c| if self.guessed.contains(&c) { c } else { MASK_CHAR })
            .collect()
    }

    /// A snapshot that only reveals the word once the game is over.
    pub fn view(&self) -> GameView {
        GameView {
            difficulty: self.difficulty,
            displayed_word: self.masked_word(),
            guessed_letters: self.guessed.iter().copied().collect(),
            wrong_guesses: self.wrong_guesses,
            max_wrong: self.max_wrong,
            time_left: self.time_left,
            game_over: self.is_over(),
            won: self.is_won(),
            word: self.revealed_word(),
        }
    }

    pub fn word(&self) -> &str {
        &self.word
    }

    pub fn guessed_letters(&self) -> &BTreeSet<char> {
        &self.guessed
    }

    pub fn wrong_guesses(&self) -> u32 {
        self.wrong_guesses
    }

    pub fn max_wrong(&self) -> u32 {
        self.max_wrong
    }

    pub fn remaining_attempts(&self) -> u32 {
        self.max_wrong.saturating_sub(self.wrong_guesses)
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_over(&self) -> bool {
        self.status.is_over()
    }

    pub fn is_won(&self) -> bool {
        self.status.is_won()
    }

    pub fn time_left(&self) -> i64 {
        self.time_left
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    fn revealed_word(&self) -> Option<String> {
        self.is_over().then(|| self.word.clone())
    }
}

/// Trim, require exactly one character, and uppercase it.
fn normalize_letter(input: &str) -> GameResult<char> {
    let trimmed = input.trim();
    let mut chars = trimmed.chars();
    let c = match (chars.next(), chars.next()) {
        (Some(c), None) => c,
        _ => return Err(GameError::InvalidLetter(input.to_string())),
    };

    let upper: Vec<char> = c.to_uppercase().collect();
    Ok(match upper.as_slice() {
        [u] => *u,
        _ => c,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn cat() -> Game {
        Game::with_word("CAT", Difficulty::Easy)
    }

    #[test]
    fn test_cat_scenario() {
        let mut game = cat();

        let r = game.guess("C").unwrap();
        assert!(r.correct);
        assert_eq!(r.displayed_word, "C__");
        assert_eq!(r.wrong_guesses, 0);
        assert_eq!(r.word, None);

        let r = game.guess("Z").unwrap();
        assert!(!r.correct);
        assert_eq!(r.displayed_word, "C__");
        assert_eq!(r.wrong_guesses, 1);

        let r = game.guess("a").unwrap();
        assert_eq!(r.displayed_word, "CA_");
        assert_eq!(r.wrong_guesses, 1);
        assert!(!r.game_over);

        let r = game.guess("T").unwrap();
        assert_eq!(r.displayed_word, "CAT");
        assert!(r.won);
        assert!(r.game_over);
        assert_eq!(r.word.as_deref(), Some("CAT"));
        assert_eq!(game.status(), GameStatus::Won);
    }

    #[test]
    fn test_six_wrong_guesses_lose() {
        let mut game = cat();
        for (i, letter) in ["B", "D", "E", "F", "G"].iter().enumerate() {
            let r = game.guess(letter).unwrap();
            assert_eq!(r.wrong_guesses, i as u32 + 1);
            assert!(!r.game_over);
            assert_eq!(r.word, None);
        }

        let r = game.guess("H").unwrap();
        assert_eq!(r.wrong_guesses, 6);
        assert!(r.game_over);
        assert!(!r.won);
        assert_eq!(r.word.as_deref(), Some("CAT"));
        assert_eq!(game.status(), GameStatus::Lost(LossReason::Hanged));
        assert_eq!(game.remaining_attempts(), 0);

        assert_eq!(game.guess("C"), Err(GameError::GameAlreadyOver));
        assert_eq!(game.wrong_guesses(), 6);
    }

    #[test]
    fn test_duplicate_guess_changes_nothing() {
        let mut game = cat();
        game.guess("Q").unwrap();
        let before = game.view();

        assert_eq!(game.guess("q"), Err(GameError::DuplicateGuess('Q')));
        assert_eq!(game.view(), before);
        assert_eq!(game.wrong_guesses(), 1);
    }

    #[test]
    fn test_invalid_letter() {
        let mut game = cat();
        assert!(matches!(game.guess(""), Err(GameError::InvalidLetter(_))));
        assert!(matches!(game.guess("   "), Err(GameError::InvalidLetter(_))));
        assert!(matches!(game.guess("AB"), Err(GameError::InvalidLetter(_))));
        assert!(game.guessed_letters().is_empty());

        // Surrounding whitespace is fine.
        assert!(game.guess(" c ").unwrap().correct);
    }

    #[test]
    fn test_non_alphabet_guess_is_wrong() {
        let mut game = cat();
        let r = game.guess("7").unwrap();
        assert!(!r.correct);
        assert_eq!(r.wrong_guesses, 1);
    }

    #[test]
    fn test_repeated_letters_need_one_guess() {
        let mut game = Game::with_word("tree", Difficulty::Easy);
        assert_eq!(game.word(), "TREE");
        game.guess("t").unwrap();
        game.guess("r").unwrap();
        let r = game.guess("e").unwrap();
        assert_eq!(r.displayed_word, "TREE");
        assert!(r.won);
    }

    #[test]
    fn test_win_on_last_chance() {
        let mut game = cat();
        for letter in ["B", "D", "E", "F", "G"] {
            game.guess(letter).unwrap();
        }
        game.guess("C").unwrap();
        game.guess("A").unwrap();
        let r = game.guess("T").unwrap();
        assert!(r.won);
        assert_eq!(r.wrong_guesses, 5);
    }

    #[test]
    fn test_timeout() {
        let mut game = cat();
        game.guess("C").unwrap();

        assert_eq!(game.update_time(120), TimeUpdate::Ticked { time_left: 120 });
        assert_eq!(game.time_left(), 120);
        assert!(!game.is_over());

        assert_eq!(
            game.update_time(0),
            TimeUpdate::TimeUp {
                word: "CAT".to_string()
            }
        );
        assert!(game.is_over());
        assert!(!game.is_won());
        assert_eq!(game.status(), GameStatus::Lost(LossReason::TimedOut));
        assert_eq!(game.guess("A"), Err(GameError::GameAlreadyOver));

        // A second report on a finished game is just recorded.
        assert_eq!(game.update_time(-3), TimeUpdate::Ticked { time_left: -3 });
        assert_eq!(game.status(), GameStatus::Lost(LossReason::TimedOut));
    }

    #[test]
    fn test_timeout_after_win_keeps_win() {
        let mut game = cat();
        for letter in ["C", "A", "T"] {
            game.guess(letter).unwrap();
        }
        assert_eq!(game.update_time(0), TimeUpdate::Ticked { time_left: 0 });
        assert!(game.is_won());
    }

    #[test]
    fn test_start_picks_from_list() {
        let mut rng = StdRng::seed_from_u64(7);
        for d in Difficulty::ALL {
            for _ in 0..20 {
                let game = Game::start(d, &mut rng);
                assert!(words_for(d).contains(&game.word()));
                assert_eq!(game.time_left(), d.time_limit());
                assert_eq!(game.difficulty(), d);
                assert_eq!(game.wrong_guesses(), 0);
                assert!(!game.is_over());
            }
        }
    }

    #[test]
    fn test_seeded_start_is_reproducible() {
        let a = Game::start(Difficulty::Hard, &mut StdRng::seed_from_u64(42));
        let b = Game::start(Difficulty::Hard, &mut StdRng::seed_from_u64(42));
        assert_eq!(a.word(), b.word());
    }

    #[test]
    fn test_start_info_hides_word() {
        let game = Game::with_word("PLANET", Difficulty::Medium);
        let info = game.start_info();
        assert_eq!(info.word_length, 6);
        assert_eq!(info.time_left, 300);
        assert_eq!(info.difficulty, Difficulty::Medium);
        assert_eq!(game.view().word, None);
        assert_eq!(game.masked_word(), "______");
    }

    #[test]
    fn test_invariants_under_random_play() {
        let mut rng = StdRng::seed_from_u64(2024);
        let alphabet: Vec<char> = ('A'..='Z').collect();

        for _ in 0..50 {
            let difficulty = *Difficulty::ALL.choose(&mut rng).unwrap();
            let mut game = Game::start(difficulty, &mut rng);
            let mut last_wrong = 0;
            let mut was_over = false;

            for _ in 0..40 {
                let letter = alphabet.choose(&mut rng).unwrap().to_string();
                let _ = game.guess(&letter);

                assert!(!game.is_won() || game.is_over());
                assert!(game.wrong_guesses() >= last_wrong);
                assert!(game.wrong_guesses() <= game.max_wrong());
                assert!(!was_over || game.is_over());

                last_wrong = game.wrong_guesses();
                was_over = game.is_over();
            }
        }
    }
}
