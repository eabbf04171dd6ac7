//! Hangman server — entry point.

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

use hangman::{words_for, Difficulty};
use hangman_server::config::{resolve_api_url, resolve_log_dir, resolve_output_dir, Environment};
use hangman_server::logging::init_tracing;
use hangman_server::pipeline::{ApiClient, DataPipeline};
use hangman_server::transport::ROUTES;

#[derive(Parser)]
#[command(
    name = "hangman-server",
    about = "Hangman — browser word-guessing game with a sample-data pipeline",
    version
)]
struct Cli {
    /// Log level (trace, debug, info, warn, error). Defaults by HANGMAN_ENV.
    #[arg(long)]
    log_level: Option<String>,

    /// Also write logs to a timestamped file in this directory.
    /// Also reads from HANGMAN_LOG_DIR env var.
    #[arg(long)]
    log_dir: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the game over HTTP (default).
    #[cfg(feature = "http")]
    Serve {
        /// Listen address (host:port). Also reads HANGMAN_ADDR.
        #[arg(long)]
        addr: Option<String>,

        /// Directory for pipeline CSV and chart output. Also reads HANGMAN_OUTPUT_DIR.
        #[arg(long)]
        output_dir: Option<String>,

        /// Base URL of the sample-data API. Also reads HANGMAN_API_URL.
        #[arg(long)]
        api_url: Option<String>,

        /// Seed for word selection. Also reads HANGMAN_SEED.
        #[arg(long)]
        seed: Option<u64>,

        /// Most game sessions kept in memory. Also reads HANGMAN_MAX_SESSIONS.
        #[arg(long)]
        max_sessions: Option<usize>,
    },

    /// Run the sample-data pipeline once and print the report.
    Pipeline {
        /// Directory for CSV and chart output.
        #[arg(long)]
        output_dir: Option<String>,

        /// Base URL of the sample-data API.
        #[arg(long)]
        api_url: Option<String>,
    },

    /// Play in the terminal.
    Play {
        /// Difficulty (easy, medium, hard, expert).
        #[arg(short, long, default_value = "medium")]
        difficulty: String,

        /// Seed for word selection.
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Print routes, difficulties and time limits as JSON.
    Info,

    /// Generate shell completion scripts.
    ///
    /// Examples:
    ///   hangman-server completions bash > ~/.local/share/bash-completion/completions/hangman-server
    ///   hangman-server completions zsh > ~/.zfunc/_hangman-server
    Completions {
        /// Shell type (bash, zsh, fish, powershell, elvish).
        shell: Shell,
    },
}

fn default_command() -> Commands {
    #[cfg(feature = "http")]
    {
        Commands::Serve {
            addr: None,
            output_dir: None,
            api_url: None,
            seed: None,
            max_sessions: None,
        }
    }
    #[cfg(not(feature = "http"))]
    {
        Commands::Play {
            difficulty: Difficulty::default().to_string(),
            seed: None,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or_else(default_command);

    // Terminal play keeps the console quiet unless asked otherwise.
    let level = match (&cli.log_level, &command) {
        (Some(level), _) => level.clone(),
        (None, Commands::Play { .. }) => "warn".to_string(),
        (None, _) => Environment::from_env().default_log_level().to_string(),
    };
    let log_dir = resolve_log_dir(cli.log_dir.as_deref());
    init_tracing(&level, log_dir.as_deref())?;

    match command {
        #[cfg(feature = "http")]
        Commands::Serve {
            addr,
            output_dir,
            api_url,
            seed,
            max_sessions,
        } => {
            use hangman_server::config::ServerConfig;
            use hangman_server::session::GameRegistry;
            use hangman_server::transport::{AppState, HttpTransport};

            let config = ServerConfig::resolve(
                addr.as_deref(),
                output_dir.as_deref(),
                api_url.as_deref(),
                seed,
                max_sessions,
            );
            tracing::info!("Starting Hangman server");
            tracing::info!("Output dir: {}", config.output_dir.display());
            tracing::info!("Sample API: {}", config.api_url);
            tracing::info!("Session cap: {}", config.max_sessions);
            if let Some(seed) = config.seed {
                tracing::info!("Word selection seeded with {seed}");
            }

            let state = AppState::new(
                GameRegistry::from_seed(config.seed).with_max_sessions(config.max_sessions),
                &config.api_url,
                config.output_dir,
            );
            HttpTransport::new(state).run(&config.addr).await?;
        }

        Commands::Pipeline {
            output_dir,
            api_url,
        } => {
            let output_dir = resolve_output_dir(output_dir.as_deref());
            let client = ApiClient::new(&resolve_api_url(api_url.as_deref()));
            let report = DataPipeline::new(client, &output_dir)?.run().await;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }

        Commands::Play { difficulty, seed } => {
            let difficulty = Difficulty::parse_or_default(Some(&difficulty));
            hangman_server::repl::run(difficulty, seed)?;
        }

        Commands::Info => {
            let difficulties: Vec<_> = Difficulty::ALL
                .iter()
                .map(|d| {
                    serde_json::json!({
                        "name": d.as_str(),
                        "time_limit": d.time_limit(),
                        "words": words_for(*d).len(),
                    })
                })
                .collect();
            let routes: Vec<_> = ROUTES
                .iter()
                .map(|(method, path, description)| {
                    serde_json::json!({
                        "method": method,
                        "path": path,
                        "description": description,
                    })
                })
                .collect();
            let info = serde_json::json!({
                "name": env!("CARGO_PKG_NAME"),
                "version": env!("CARGO_PKG_VERSION"),
                "max_wrong_guesses": hangman::MAX_WRONG_GUESSES,
                "difficulties": difficulties,
                "routes": routes,
            });
            println!("{}", serde_json::to_string_pretty(&info)?);
        }

        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "hangman-server", &mut std::io::stdout());
        }
    }

    Ok(())
}
