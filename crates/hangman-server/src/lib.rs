//! Hangman server — browser play over HTTP with per-session game state,
//! a terminal play mode, and the sample-data pipeline.

pub mod config;
pub mod logging;
pub mod pipeline;
pub mod repl;
pub mod session;
pub mod transport;
pub mod types;

pub use config::ServerConfig;
pub use pipeline::{ApiClient, DataPipeline, PipelineReport};
pub use session::GameRegistry;
#[cfg(feature = "http")]
pub use transport::HttpTransport;
