//! Hangman — core game library plus the sample-data processing pipeline pieces.

pub mod chart;
pub mod export;
pub mod game;
pub mod processor;
pub mod types;
pub mod words;

pub use chart::{bin_counts, ChartRenderer};
pub use export::CsvExporter;
pub use game::Game;
pub use processor::{
    aggregate_by_field, count_by_field, extract_fields, filter_by_field, statistics,
};
pub use types::*;
pub use words::words_for;
