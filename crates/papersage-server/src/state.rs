//! Shared application state.

use std::sync::Arc;

use papersage_analyze::{Analyzer, KeywordDictionary};
use papersage_core::{PaperSageConfig, Result};
use tracing::info;

use crate::cache::ResultCache;

/// Shared application state accessible from all route handlers.
pub struct AppState {
    pub config: PaperSageConfig,
    pub analyzer: Analyzer,
    pub results: ResultCache,
}

impl AppState {
    pub fn new(config: PaperSageConfig, dictionary: Arc<KeywordDictionary>) -> Self {
        let analyzer = Analyzer::new(dictionary, config.analysis.clone());
        let results = ResultCache::new(config.cache_size, config.cache_ttl);
        Self {
            config,
            analyzer,
            results,
        }
    }

    /// Build state from configuration, loading the keyword dictionary from
    /// `dictionary_path` when set.
    pub fn from_config(config: PaperSageConfig) -> Result<Self> {
        let dictionary = load_dictionary(&config)?;
        Ok(Self::new(config, Arc::new(dictionary)))
    }
}

/// The configured dictionary, or the built-in one.
pub fn load_dictionary(config: &PaperSageConfig) -> Result<KeywordDictionary> {
    let dictionary = match &config.dictionary_path {
        Some(path) => {
            info!("Loading keyword dictionary from {}", path.display());
            KeywordDictionary::from_path(path)?
        }
        None => KeywordDictionary::builtin(),
    };
    info!(
        "Keyword dictionary: {} subjects, {} topics",
        dictionary.subjects().len(),
        dictionary.topic_count()
    );
    Ok(dictionary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use papersage_core::Error;
    use std::io::Write;

    #[test]
    fn test_from_config_builtin() {
        let state = AppState::from_config(PaperSageConfig::default()).unwrap();
        assert!(state.analyzer.dictionary().subject("Physics").is_some());
        assert!(state.results.is_empty());
    }

    #[test]
    fn test_from_config_dictionary_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"subjects":[{{"name":"Biology","topics":[{{"name":"Genetics","keywords":["gene","dna"]}}]}}]}}"#
        )
        .unwrap();

        let config = PaperSageConfig {
            dictionary_path: Some(file.path().to_path_buf()),
            ..PaperSageConfig::default()
        };
        let state = AppState::from_config(config).unwrap();
        assert_eq!(state.analyzer.dictionary().topic_count(), 1);
    }

    #[test]
    fn test_missing_dictionary_file() {
        let config = PaperSageConfig {
            dictionary_path: Some("/nonexistent/papersage-dictionary.json".into()),
            ..PaperSageConfig::default()
        };
        assert!(matches!(AppState::from_config(config), Err(Error::Io(_))));
    }
}
