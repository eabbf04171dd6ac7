//! Session management for live games.

pub mod registry;

pub use registry::{GameRegistry, DEFAULT_MAX_SESSIONS, DEFAULT_SESSION};
