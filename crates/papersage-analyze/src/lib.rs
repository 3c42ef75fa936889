//! PaperSage Analyze — exam-paper text analytics.
//!
//! Keyword-based subject and topic scoring, probability normalization,
//! repeated-question clustering, question-type patterns and the
//! human-readable prediction sentence. Everything here is a pure function
//! of the extracted paper text and a read-only [`KeywordDictionary`].

pub mod classify;
pub mod dictionary;
pub mod normalize;
pub mod patterns;
pub mod pipeline;
pub mod prediction;
pub mod probability;
pub mod questions;
pub mod scoring;

pub use classify::{classify_question, QuestionType};
pub use dictionary::{KeywordDictionary, SubjectSpec, TopicSpec};
pub use normalize::normalize;
pub use patterns::{analyze_patterns, PatternAnalysis, PredictionLevel, QuestionPattern};
pub use pipeline::{Analyzer, Document, PredictionResult, NOT_ENOUGH_DATA};
pub use prediction::{generate_prediction_sentence, probability_tag, PredictionInput};
pub use probability::{normalize_counts, TopicProbability};
pub use questions::{cluster, extract_questions, repeated_questions, QuestionLine, QuestionRecord};
pub use scoring::{score, score_subject, TopicCount, TopicCounts, TopicScope};
