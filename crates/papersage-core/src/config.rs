//! Configuration for the analysis pipeline and the HTTP service.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Probability thresholds (in percent) for the qualitative tag in the
/// prediction sentence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbabilityTags {
    /// At or above this the tag is "high".
    pub high: u32,
    /// At or above this (and below `high`) the tag is "medium".
    pub medium: u32,
}

impl Default for ProbabilityTags {
    fn default() -> Self {
        Self { high: 6, medium: 3 }
    }
}

/// Tuning knobs for a single pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSettings {
    /// Topics below this percentage are dropped before rounding correction.
    pub min_percent: u32,
    /// Minimum character length of a candidate question line.
    pub min_question_len: usize,
    /// Prefix length used when merging near-duplicate questions.
    pub cluster_prefix_chars: usize,
    /// Number of leading words kept in a question's cluster key.
    pub cluster_key_words: usize,
    /// Cap on the repeated-question list.
    pub max_repeated: usize,
    pub tags: ProbabilityTags,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            min_percent: 0,
            min_question_len: 25,
            cluster_prefix_chars: 30,
            cluster_key_words: 12,
            max_repeated: 10,
            tags: ProbabilityTags::default(),
        }
    }
}

/// Top-level PaperSage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaperSageConfig {
    /// HTTP server port.
    pub port: u16,
    /// Optional JSON keyword dictionary; the built-in one is used when `None`.
    pub dictionary_path: Option<PathBuf>,
    /// Per-file upload cap in bytes.
    pub max_upload_bytes: usize,
    /// Maximum number of papers accepted in one request.
    pub max_files: usize,
    /// Result cache capacity (sessions).
    pub cache_size: usize,
    /// Result cache time-to-live.
    pub cache_ttl: Duration,
    pub analysis: AnalysisSettings,
}

impl Default for PaperSageConfig {
    fn default() -> Self {
        Self {
            port: 5000,
            dictionary_path: None,
            max_upload_bytes: 10 * 1024 * 1024,
            max_files: 10,
            cache_size: 100,
            cache_ttl: Duration::from_secs(3600),
            analysis: AnalysisSettings::default(),
        }
    }
}

impl PaperSageConfig {
    /// Create configuration from environment and defaults.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let port = env_or("PORT", defaults.port)?;
        let dictionary_path = std::env::var("PAPERSAGE_DICTIONARY")
            .ok()
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);
        let max_upload_mb: usize = env_or("PAPERSAGE_MAX_UPLOAD_MB", 10)?;
        let max_files = env_or("PAPERSAGE_MAX_FILES", defaults.max_files)?;
        let cache_size = env_or("PAPERSAGE_CACHE_SIZE", defaults.cache_size)?;
        let cache_ttl_secs: u64 = env_or("PAPERSAGE_CACHE_TTL_SECS", 3600)?;

        let analysis = AnalysisSettings {
            min_percent: env_or("PAPERSAGE_MIN_PERCENT", defaults.analysis.min_percent)?,
            max_repeated: env_or("PAPERSAGE_MAX_REPEATED", defaults.analysis.max_repeated)?,
            ..defaults.analysis
        };

        if analysis.min_percent > 100 {
            return Err(Error::Config(format!(
                "PAPERSAGE_MIN_PERCENT must be at most 100, got {}",
                analysis.min_percent
            )));
        }
        if max_files == 0 {
            return Err(Error::Config("PAPERSAGE_MAX_FILES must be at least 1".into()));
        }

        Ok(Self {
            port,
            dictionary_path,
            max_upload_bytes: megabytes_to_bytes(max_upload_mb)?,
            max_files,
            cache_size,
            cache_ttl: Duration::from_secs(cache_ttl_secs),
            analysis,
        })
    }

    /// Upper bound on a whole analysis request body: every file at its cap
    /// plus multipart framing and form fields.
    pub fn request_body_limit(&self) -> usize {
        self.max_upload_bytes
            .saturating_add(MULTIPART_OVERHEAD_PER_FILE)
            .saturating_mul(self.max_files)
            .saturating_add(MULTIPART_OVERHEAD_PER_FILE)
    }
}

/// Headroom for boundaries, part headers and text fields.
pub const MULTIPART_OVERHEAD_PER_FILE: usize = 64 * 1024;

fn megabytes_to_bytes(mb: usize) -> Result<usize> {
    mb.checked_mul(1024 * 1024).ok_or_else(|| {
        Error::Config(format!("PAPERSAGE_MAX_UPLOAD_MB is too large: {}", mb))
    })
}

/// Read and parse an environment variable, falling back to `default` when unset.
fn env_or<T: FromStr>(name: &str, default: T) -> Result<T> {
    match std::env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|_| Error::Config(format!("invalid value for {}: {:?}", name, raw))),
        _ => Ok(default),
    }
}
