//! PaperSage Core — error type and configuration shared by every crate.

pub mod config;
pub mod error;

pub use config::{AnalysisSettings, PaperSageConfig, ProbabilityTags};
pub use error::{Error, Result};
