//! Sample-data pipeline: fetch from the public API, then export and chart.

pub mod client;
pub mod runner;

pub use client::{ApiClient, DEFAULT_API_URL};
pub use runner::{DataPipeline, PipelineReport};
