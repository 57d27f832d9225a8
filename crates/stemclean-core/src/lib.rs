//! stemclean-core: Fetch, separate, and silence-trim pipeline for audio stems

pub mod config;
pub mod error;
pub mod fetcher;
pub mod pipeline;
pub mod trimmer;

pub use config::Config;
pub use error::{StemCleanError, Result};
pub use pipeline::{Pipeline, PipelineStage, ProcessRequest};
