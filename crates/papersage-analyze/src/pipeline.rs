//! The full analysis run: scoring, ranking, question clustering, patterns and
//! the prediction sentence, merged into one [`PredictionResult`].

use std::sync::Arc;

use papersage_core::{AnalysisSettings, Result};
use serde::Serialize;
use tracing::debug;

use crate::dictionary::KeywordDictionary;
use crate::normalize::normalize;
use crate::patterns::{analyze_patterns, QuestionPattern, NO_PATTERN};
use crate::prediction::{generate_prediction_sentence, PredictionInput};
use crate::probability::{normalize_counts, TopicProbability};
use crate::questions::{cluster, extract_questions, repeated_questions, QuestionLine, QuestionRecord};
use crate::scoring::TopicScope;

pub const NOT_ENOUGH_DATA: &str = "Not enough data to generate prediction.";

/// One paper's extracted text.
#[derive(Debug, Clone)]
pub struct Document {
    pub name: String,
    pub text: String,
    normalized: String,
}

impl Document {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        let text = text.into();
        let normalized = normalize(&text);
        Self {
            name: name.into(),
            text,
            normalized,
        }
    }

    pub fn normalized(&self) -> &str {
        &self.normalized
    }
}

/// Final result of one analysis request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionResult {
    pub total_papers: usize,
    /// The subject filter, or the detected dominant subject.
    pub subject: Option<String>,
    pub prediction_sentence: String,
    pub top_topics: Vec<TopicProbability>,
    pub repeated_questions: Vec<QuestionRecord>,
    pub question_patterns: Vec<QuestionPattern>,
    pub insight: String,
}

impl PredictionResult {
    /// Result for a request that had nothing to analyze.
    pub fn not_enough_data(total_papers: usize, subject: Option<String>) -> Self {
        Self {
            total_papers,
            subject,
            prediction_sentence: NOT_ENOUGH_DATA.to_string(),
            top_topics: Vec::new(),
            repeated_questions: Vec::new(),
            question_patterns: Vec::new(),
            insight: NO_PATTERN.to_string(),
        }
    }
}

/// Runs the pipeline against a shared dictionary.
#[derive(Debug, Clone)]
pub struct Analyzer {
    dictionary: Arc<KeywordDictionary>,
    settings: AnalysisSettings,
}

impl Analyzer {
    pub fn new(dictionary: Arc<KeywordDictionary>, settings: AnalysisSettings) -> Self {
        Self {
            dictionary,
            settings,
        }
    }

    pub fn dictionary(&self) -> &KeywordDictionary {
        &self.dictionary
    }

    pub fn settings(&self) -> &AnalysisSettings {
        &self.settings
    }

    /// Same dictionary, different settings.
    pub fn with_settings(&self, settings: AnalysisSettings) -> Self {
        Self {
            dictionary: Arc::clone(&self.dictionary),
            settings,
        }
    }

    /// Analyze a batch of papers, optionally restricted to one subject.
    ///
    /// Fails only when `subject` names no subject in the dictionary; empty
    /// batches and zero keyword hits produce the "not enough data" result.
    pub fn analyze(&self, documents: &[Document], subject: Option<&str>) -> Result<PredictionResult> {
        let scope = TopicScope::resolve(&self.dictionary, subject)?;
        let subject_name = scope.subject.map(str::to_string);

        if documents.is_empty() {
            debug!("No documents supplied");
            return Ok(PredictionResult::not_enough_data(0, subject_name));
        }

        let counts = scope.score_normalized(documents.iter().map(Document::normalized));
        let mut lines = Vec::new();
        for (paper, doc) in documents.iter().enumerate() {
            lines.extend(
                extract_questions(&doc.text, &self.settings)
                    .into_iter()
                    .map(|text| QuestionLine { text, paper }),
            );
        }

        let subject_name = subject_name.or_else(|| counts.detect_subject().map(str::to_string));
        let top_topics = normalize_counts(&counts, self.settings.min_percent);
        let records = cluster(&lines, &self.settings);
        let repeated = repeated_questions(records, self.settings.max_repeated);
        let patterns = analyze_patterns(&lines);

        debug!(
            "Analyzed {} papers: {} keyword hits, {} candidate questions, {} repeated",
            documents.len(),
            counts.total(),
            lines.len(),
            repeated.len()
        );

        let prediction_sentence = match top_topics.first() {
            Some(top) => generate_prediction_sentence(
                &PredictionInput {
                    topic: Some(top.topic.as_str()),
                    appeared_count: counts.count(&top.topic),
                    total_papers: documents.len(),
                    probability_percent: Some(top.probability),
                },
                &self.settings.tags,
            ),
            None => NOT_ENOUGH_DATA.to_string(),
        };

        Ok(PredictionResult {
            total_papers: documents.len(),
            subject: subject_name,
            prediction_sentence,
            top_topics,
            repeated_questions: repeated,
            question_patterns: patterns.patterns,
            insight: patterns.insight,
        })
    }
}
