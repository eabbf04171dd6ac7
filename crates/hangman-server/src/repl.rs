//! Terminal play mode.
//!
//! Launch with `hangman-server play` to play against the clock in the terminal.
//! Type a letter to guess, `/help` for commands, Tab for completion.

use std::path::PathBuf;
use std::time::Instant;

use rand::rngs::StdRng;
use rand::SeedableRng;
use rustyline::completion::Completer;
use rustyline::config::CompletionType;
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::Validator;
use rustyline::{Config, Editor, Helper};

use hangman::{Difficulty, Game, GameStatus, LossReason, TimeUpdate};

/// Available commands.
const COMMANDS: &[(&str, &str)] = &[
    ("/new", "Start a new game: /new [easy|medium|hard|expert]"),
    ("/state", "Show the word, guesses and clock"),
    ("/clear", "Clear the screen"),
    ("/help", "Show available commands"),
    ("/exit", "Quit"),
];

const GALLOWS: [&str; 7] = [
    "  +---+\n  |   |\n      |\n      |\n      |\n=======",
    "  +---+\n  |   |\n  O   |\n      |\n      |\n=======",
    "  +---+\n  |   |\n  O   |\n  |   |\n      |\n=======",
    "  +---+\n  |   |\n  O   |\n /|   |\n      |\n=======",
    "  +---+\n  |   |\n  O   |\n /|\\  |\n      |\n=======",
    "  +---+\n  |   |\n  O   |\n /|\\  |\n /    |\n=======",
    "  +---+\n  |   |\n  O   |\n /|\\  |\n / \\  |\n=======",
];

/// What the terminal should do after one line of input.
#[derive(Debug, Default)]
pub struct Reply {
    pub lines: Vec<String>,
    /// A new game started; the clock restarts.
    pub new_game: bool,
    pub quit: bool,
}

impl Reply {
    fn lines(lines: Vec<String>) -> Self {
        Self {
            lines,
            ..Self::default()
        }
    }
}

/// Game state for one terminal player.
pub struct PlaySession {
    game: Option<Game>,
    rng: StdRng,
}

impl PlaySession {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { game: None, rng }
    }

    pub fn game(&self) -> Option<&Game> {
        self.game.as_ref()
    }

    /// Start a new game, replacing the current one.
    pub fn start(&mut self, difficulty: Difficulty) -> Vec<String> {
        let game = Game::start(difficulty, &mut self.rng);
        let info = game.start_info();
        let mut lines = vec![format!(
            "New {} game: {} letters, {} seconds.",
            info.difficulty, info.word_length, info.time_left
        )];
        lines.extend(render(&game));
        self.game = Some(game);
        lines
    }

    /// Handle one line of input, `elapsed_secs` after the current game started.
    pub fn handle(&mut self, line: &str, elapsed_secs: i64) -> Reply {
        let line = line.trim();
        if line.is_empty() {
            return Reply::default();
        }

        if let Some(command) = line.strip_prefix('/') {
            return self.command(command, elapsed_secs);
        }

        Reply::lines(self.guess(line, elapsed_secs))
    }

    fn command(&mut self, input: &str, elapsed_secs: i64) -> Reply {
        let mut parts = input.splitn(2, ' ');
        let cmd = parts.next().unwrap_or("");
        let args = parts.next().unwrap_or("").trim();

        match cmd {
            "exit" | "quit" => Reply {
                lines: vec!["Goodbye!".to_string()],
                quit: true,
                ..Reply::default()
            },
            "new" => {
                let difficulty = if args.is_empty() {
                    self.game
                        .as_ref()
                        .map(Game::difficulty)
                        .unwrap_or_default()
                } else {
                    Difficulty::parse_or_default(Some(args))
                };
                Reply {
                    lines: self.start(difficulty),
                    new_game: true,
                    ..Reply::default()
                }
            }
            "state" => Reply::lines(match self.game.as_mut() {
                Some(game) => {
                    let mut lines = tick(game, elapsed_secs);
                    lines.extend(render(game));
                    lines
                }
                None => vec!["No game yet. Start one with /new.".to_string()],
            }),
            "help" | "?" | "" => Reply::lines(help_lines()),
            "clear" | "cls" => Reply::default(),
            _ => Reply::lines(vec![format!(
                "Unknown command '/{cmd}'. Type /help for commands."
            )]),
        }
    }

    fn guess(&mut self, letter: &str, elapsed_secs: i64) -> Vec<String> {
        let Some(game) = self.game.as_mut() else {
            return vec!["No game yet. Start one with /new.".to_string()];
        };

        let mut lines = tick(game, elapsed_secs);
        if !lines.is_empty() {
            return lines;
        }

        match game.guess(letter) {
            Ok(outcome) => {
                lines.push(if outcome.correct {
                    "Good guess!".to_string()
                } else {
                    format!("No '{}' in the word.", letter.trim().to_uppercase())
                });
                lines.extend(render(game));
            }
            Err(e) => lines.push(e.to_string()),
        }
        lines
    }
}

/// Report the clock to the game. Returns lines only when time just ran out.
fn tick(game: &mut Game, elapsed_secs: i64) -> Vec<String> {
    let remaining = game.difficulty().time_limit() - elapsed_secs;
    if game.is_over() {
        return Vec::new();
    }
    match game.update_time(remaining) {
        TimeUpdate::TimeUp { word } => vec![
            format!("Time's up! The word was {word}."),
            "Start another with /new.".to_string(),
        ],
        TimeUpdate::Ticked { .. } => Vec::new(),
    }
}

fn render(game: &Game) -> Vec<String> {
    let stage = (game.wrong_guesses() as usize).min(GALLOWS.len() - 1);
    let mut lines: Vec<String> = GALLOWS[stage].lines().map(String::from).collect();

    let spaced: Vec<String> = game.masked_word().chars().map(String::from).collect();
    let guessed: Vec<String> = game.guessed_letters().iter().map(char::to_string).collect();
    lines.push(format!("Word:    {}", spaced.join(" ")));
    lines.push(format!(
        "Wrong:   {}/{}",
        game.wrong_guesses(),
        game.max_wrong()
    ));
    lines.push(format!("Guessed: {}", guessed.join(" ")));

    match game.status() {
        GameStatus::Playing => lines.push(format!("Time:    {}s", game.time_left().max(0))),
        GameStatus::Won => lines.push(format!("You won! The word was {}.", game.word())),
        GameStatus::Lost(LossReason::Hanged) => {
            lines.push(format!("Game over. The word was {}.", game.word()))
        }
        GameStatus::Lost(LossReason::TimedOut) => {
            lines.push(format!("Out of time. The word was {}.", game.word()))
        }
    }
    lines
}

fn help_lines() -> Vec<String> {
    let mut lines = vec!["Type a single letter to guess. Commands:".to_string()];
    for (cmd, desc) in COMMANDS {
        lines.push(format!("  {cmd:<10} {desc}"));
    }
    lines
}

/// Completion candidates for the text before the cursor: command names, or a
/// difficulty after `/new `. Returns the offset the candidates replace from.
fn completions(input: &str) -> (usize, Vec<String>) {
    match input.strip_prefix("/new ") {
        Some(arg) => {
            let arg = arg.trim_start();
            let candidates = Difficulty::ALL
                .iter()
                .map(|d| d.as_str())
                .filter(|d| d.starts_with(arg))
                .map(str::to_string)
                .collect();
            (input.len() - arg.len(), candidates)
        }
        None if input.starts_with('/') && !input.contains(' ') => {
            let candidates = COMMANDS
                .iter()
                .map(|(cmd, _)| *cmd)
                .filter(|cmd| cmd.starts_with(input))
                .map(str::to_string)
                .collect();
            (0, candidates)
        }
        None => (input.len(), Vec::new()),
    }
}

struct PlayHelper;

impl Completer for PlayHelper {
    type Candidate = String;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &rustyline::Context<'_>,
    ) -> rustyline::Result<(usize, Vec<String>)> {
        Ok(completions(&line[..pos]))
    }
}

impl Hinter for PlayHelper {
    type Hint = String;
}

impl Highlighter for PlayHelper {}
impl Validator for PlayHelper {}
impl Helper for PlayHelper {}

fn history_path() -> Option<PathBuf> {
    std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".hangman_history"))
}

/// Run the terminal game.
pub fn run(difficulty: Difficulty, seed: Option<u64>) -> anyhow::Result<()> {
    eprintln!();
    eprintln!(
        "  \x1b[1mhangman v{}\x1b[0m \x1b[90m- guess the word before the clock runs out\x1b[0m",
        env!("CARGO_PKG_VERSION")
    );
    eprintln!("    Type a letter to guess, \x1b[36m/help\x1b[0m for commands, \x1b[90m/exit\x1b[0m to quit.");
    eprintln!();

    let config = Config::builder()
        .history_ignore_space(true)
        .auto_add_history(true)
        .completion_type(CompletionType::List)
        .build();

    let mut rl: Editor<PlayHelper, DefaultHistory> = Editor::with_config(config)?;
    rl.set_helper(Some(PlayHelper));

    let history = history_path();
    if let Some(path) = history.as_deref().filter(|p| p.exists()) {
        if let Err(e) = rl.load_history(path) {
            tracing::debug!("Could not load history from {}: {e}", path.display());
        }
    }

    let mut session = PlaySession::new(seed);
    print_lines(&session.start(difficulty));
    let mut started = Instant::now();
    let prompt = " \x1b[36mguess>\x1b[0m ";

    loop {
        match rl.readline(prompt) {
            Ok(line) => {
                if matches!(line.trim(), "/clear" | "/cls") {
                    eprint!("\x1b[2J\x1b[H");
                    continue;
                }
                let elapsed = started.elapsed().as_secs() as i64;
                let reply = session.handle(&line, elapsed);
                print_lines(&reply.lines);
                if reply.new_game {
                    started = Instant::now();
                }
                if reply.quit {
                    break;
                }
            }
            Err(ReadlineError::Interrupted) => {
                eprintln!("  \x1b[90m(Ctrl+C)\x1b[0m Type \x1b[1m/exit\x1b[0m to quit.");
            }
            Err(ReadlineError::Eof) => {
                eprintln!("  Goodbye!");
                break;
            }
            Err(err) => {
                eprintln!("  Error: {err}");
                break;
            }
        }
    }

    if let Some(path) = &history {
        if let Err(e) = rl.save_history(path) {
            tracing::debug!("Could not save history to {}: {e}", path.display());
        }
    }

    Ok(())
}

fn print_lines(lines: &[String]) {
    for line in lines {
        eprintln!("  {line}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_cat() -> PlaySession {
        let mut session = PlaySession::new(Some(1));
        session.game = Some(Game::with_word("CAT", Difficulty::Easy));
        session
    }

    #[test]
    fn test_guess_without_game() {
        let mut session = PlaySession::new(Some(1));
        let reply = session.handle("a", 0);
        assert_eq!(reply.lines, vec!["No game yet. Start one with /new."]);
    }

    #[test]
    fn test_play_to_win() {
        let mut session = with_cat();
        session.handle("c", 5);
        session.handle("a", 6);
        let reply = session.handle("t", 7);
        assert!(reply
            .lines
            .iter()
            .any(|l| l == "You won! The word was CAT."));
        assert!(session.game().unwrap().is_won());
    }

    #[test]
    fn test_wrong_guess_and_duplicate() {
        let mut session = with_cat();
        let reply = session.handle("z", 1);
        assert_eq!(reply.lines[0], "No 'Z' in the word.");
        assert!(reply.lines.iter().any(|l| l == "Wrong:   1/6"));

        let reply = session.handle("Z", 2);
        assert_eq!(reply.lines, vec!["Letter 'Z' was already guessed"]);
    }

    #[test]
    fn test_clock_runs_out() {
        let mut session = with_cat();
        let reply = session.handle("c", 400);
        assert_eq!(reply.lines[0], "Time's up! The word was CAT.");
        assert!(session.game().unwrap().is_over());

        let reply = session.handle("a", 401);
        assert_eq!(reply.lines, vec!["The game is already over"]);
    }

    #[test]
    fn test_new_game_command() {
        let mut session = PlaySession::new(Some(3));
        let reply = session.handle("/new hard", 0);
        assert!(reply.new_game);
        assert!(reply.lines[0].starts_with("New hard game:"));
        let game = session.game().unwrap();
        assert_eq!(game.difficulty(), Difficulty::Hard);
        assert_eq!(game.time_left(), 200);

        // No argument keeps the current difficulty.
        session.handle("/new", 0);
        assert_eq!(session.game().unwrap().difficulty(), Difficulty::Hard);
    }

    #[test]
    fn test_commands() {
        let mut session = with_cat();
        assert!(session.handle("/exit", 0).quit);
        assert!(session.handle("/help", 0).lines.len() > COMMANDS.len());
        assert!(session.handle("/bogus", 0).lines[0].starts_with("Unknown command"));
        assert!(session.handle("   ", 0).lines.is_empty());
        let state = session.handle("/state", 10);
        assert!(state.lines.iter().any(|l| l == "Word:    _ _ _"));
        assert!(state.lines.iter().any(|l| l == "Time:    390s"));
    }

    #[test]
    fn test_completions() {
        assert_eq!(completions("/n"), (0, vec!["/new".to_string()]));
        assert_eq!(completions("/").1.len(), COMMANDS.len());
        assert_eq!(
            completions("/new e"),
            (5, vec!["easy".to_string(), "expert".to_string()])
        );
        let (start, all) = completions("/new ");
        assert_eq!(start, 5);
        assert_eq!(all, ["easy", "medium", "hard", "expert"]);
        assert_eq!(completions("a"), (1, Vec::new()));
        assert_eq!(completions("/state x"), (8, Vec::new()));
    }
}
