//! Configuration loading and resolution.
//!
//! Each setting resolves as: explicit CLI flag, then environment variable, then default.

use std::path::PathBuf;

use crate::pipeline::DEFAULT_API_URL;
use crate::session::DEFAULT_MAX_SESSIONS;

/// Default listen address.
pub const DEFAULT_ADDR: &str = "0.0.0.0:5000";

/// Default directory for pipeline CSV and PNG output.
pub const DEFAULT_OUTPUT_DIR: &str = "output";

pub const ENV_ADDR: &str = "HANGMAN_ADDR";
pub const ENV_OUTPUT_DIR: &str = "HANGMAN_OUTPUT_DIR";
pub const ENV_API_URL: &str = "HANGMAN_API_URL";
pub const ENV_LOG_DIR: &str = "HANGMAN_LOG_DIR";
pub const ENV_SEED: &str = "HANGMAN_SEED";
pub const ENV_MAX_SESSIONS: &str = "HANGMAN_MAX_SESSIONS";
pub const ENV_ENVIRONMENT: &str = "HANGMAN_ENV";

/// Deployment environment. Only affects the default log level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Testing,
    Production,
}

impl Environment {
    /// Read `HANGMAN_ENV`. Unknown values fall back to development.
    pub fn from_env() -> Self {
        Self::parse(std::env::var(ENV_ENVIRONMENT).ok().as_deref())
    }

    pub fn parse(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_lowercase()).as_deref() {
            Some("production") | Some("prod") => Environment::Production,
            Some("testing") | Some("test") => Environment::Testing,
            _ => Environment::Development,
        }
    }

    pub fn default_log_level(self) -> &'static str {
        match self {
            Environment::Development | Environment::Testing => "debug",
            Environment::Production => "info",
        }
    }
}

/// Fully resolved server settings.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub addr: String,
    pub output_dir: PathBuf,
    pub api_url: String,
    pub seed: Option<u64>,
    pub max_sessions: usize,
}

impl ServerConfig {
    pub fn resolve(
        addr: Option<&str>,
        output_dir: Option<&str>,
        api_url: Option<&str>,
        seed: Option<u64>,
        max_sessions: Option<usize>,
    ) -> Self {
        Self {
            addr: resolve_addr(addr),
            output_dir: resolve_output_dir(output_dir),
            api_url: resolve_api_url(api_url),
            seed: resolve_seed(seed),
            max_sessions: resolve_max_sessions(max_sessions),
        }
    }
}

/// Resolve the listen address.
pub fn resolve_addr(explicit: Option<&str>) -> String {
    resolve_with(explicit, std::env::var(ENV_ADDR).ok(), DEFAULT_ADDR)
}

/// Resolve the pipeline output directory.
pub fn resolve_output_dir(explicit: Option<&str>) -> PathBuf {
    PathBuf::from(resolve_with(
        explicit,
        std::env::var(ENV_OUTPUT_DIR).ok(),
        DEFAULT_OUTPUT_DIR,
    ))
}

/// Resolve the base URL of the sample-data API.
pub fn resolve_api_url(explicit: Option<&str>) -> String {
    resolve_with(explicit, std::env::var(ENV_API_URL).ok(), DEFAULT_API_URL)
}

/// Resolve the log directory. No directory means console-only logging.
pub fn resolve_log_dir(explicit: Option<&str>) -> Option<PathBuf> {
    explicit
        .map(str::to_string)
        .or_else(|| std::env::var(ENV_LOG_DIR).ok())
        .filter(|s| !s.trim().is_empty())
        .map(PathBuf::from)
}

/// Resolve the word-selection seed. An unparseable env value is ignored.
pub fn resolve_seed(explicit: Option<u64>) -> Option<u64> {
    explicit.or_else(|| parse_env_number(ENV_SEED, std::env::var(ENV_SEED).ok().as_deref()))
}

/// Resolve the cap on live game sessions. An unparseable env value is ignored.
pub fn resolve_max_sessions(explicit: Option<usize>) -> usize {
    explicit
        .or_else(|| {
            parse_env_number(ENV_MAX_SESSIONS, std::env::var(ENV_MAX_SESSIONS).ok().as_deref())
        })
        .unwrap_or(DEFAULT_MAX_SESSIONS)
}

fn parse_env_number<T>(name: &str, value: Option<&str>) -> Option<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let value = value?.trim();
    match value.parse() {
        Ok(n) => Some(n),
        Err(e) => {
            tracing::warn!("Ignoring {name}={value}: {e}");
            None
        }
    }
}

fn resolve_with(explicit: Option<&str>, env_value: Option<String>, default: &str) -> String {
    if let Some(value) = explicit {
        return value.to_string();
    }

    if let Some(value) = env_value.filter(|v| !v.trim().is_empty()) {
        return value;
    }

    default.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_order() {
        assert_eq!(
            resolve_with(Some("flag"), Some("env".into()), "default"),
            "flag"
        );
        assert_eq!(resolve_with(None, Some("env".into()), "default"), "env");
        assert_eq!(resolve_with(None, Some("  ".into()), "default"), "default");
        assert_eq!(resolve_with(None, None, "default"), "default");
    }

    #[test]
    fn test_parse_env_number() {
        assert_eq!(parse_env_number::<u64>(ENV_SEED, Some("42")), Some(42));
        assert_eq!(parse_env_number::<u64>(ENV_SEED, Some(" 7 ")), Some(7));
        assert_eq!(parse_env_number::<u64>(ENV_SEED, Some("abc")), None);
        assert_eq!(parse_env_number::<usize>(ENV_MAX_SESSIONS, Some("-1")), None);
        assert_eq!(parse_env_number::<u64>(ENV_SEED, None), None);
    }

    #[test]
    fn test_explicit_values_win() {
        assert_eq!(resolve_seed(Some(3)), Some(3));
        assert_eq!(resolve_max_sessions(Some(50)), 50);
    }

    #[test]
    fn test_environment() {
        assert_eq!(Environment::parse(None), Environment::Development);
        assert_eq!(Environment::parse(Some("Production")), Environment::Production);
        assert_eq!(Environment::parse(Some("testing")), Environment::Testing);
        assert_eq!(Environment::parse(Some("staging")), Environment::Development);
        assert_eq!(Environment::Production.default_log_level(), "info");
        assert_eq!(Environment::Development.default_log_level(), "debug");
    }
}
