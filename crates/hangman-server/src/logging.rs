//! Tracing setup: console output plus an optional timestamped log file.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Install the global subscriber.
///
/// `RUST_LOG` takes precedence over `level`. When `log_dir` is given, a
/// plain-text copy of every event is written to `{log_dir}/app_{timestamp}.log`
/// and that path is returned.
pub fn init_tracing(level: &str, log_dir: Option<&Path>) -> anyhow::Result<Option<PathBuf>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let (file_layer, log_file) = match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)?;
            let path = dir.join(log_file_name(chrono::Local::now()));
            let file = std::fs::File::create(&path)?;
            let layer = fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file));
            (Some(layer), Some(path))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .try_init()?;

    tracing::info!("Logging initialized - Level: {level}");
    if let Some(path) = &log_file {
        tracing::info!("Log file: {}", path.display());
    }

    Ok(log_file)
}

fn log_file_name<Tz: chrono::TimeZone>(now: chrono::DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!("app_{}.log", now.format("%Y%m%d_%H%M%S"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_log_file_name() {
        let ts = chrono::Utc.with_ymd_and_hms(2025, 6, 11, 17, 39, 23).unwrap();
        assert_eq!(log_file_name(ts), "app_20250611_173923.log");
    }
}
