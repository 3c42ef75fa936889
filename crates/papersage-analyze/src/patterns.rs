//! Question-type patterns across a batch of papers.
//!
//! Every candidate question (not only repeated ones) is bucketed by its
//! [`QuestionType`]. A type's raw score is `papers × questions`, and its
//! probability is that score relative to the best-scoring type.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::classify::{classify_question, QuestionType};
use crate::questions::QuestionLine;

/// Sample questions kept per pattern.
const MAX_SAMPLES: usize = 15;

pub const NO_PATTERN: &str = "No clear pattern detected.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PredictionLevel {
    #[serde(rename = "Very High")]
    VeryHigh,
    High,
    Moderate,
    Low,
}

impl PredictionLevel {
    pub fn from_probability(probability: f64) -> Self {
        if probability >= 60.0 {
            Self::VeryHigh
        } else if probability >= 40.0 {
            Self::High
        } else if probability >= 20.0 {
            Self::Moderate
        } else {
            Self::Low
        }
    }

    pub fn sentence(&self, question_type: QuestionType) -> String {
        match self {
            Self::VeryHigh => format!(
                "Very high chances that {} questions will appear again.",
                question_type
            ),
            Self::High => format!(
                "High chances that {} questions may appear in the exam.",
                question_type
            ),
            Self::Moderate => format!("Moderate chances of {} questions appearing.", question_type),
            Self::Low => format!("Low chances of {} questions.", question_type),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuestionPattern {
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    pub appeared_in_papers: usize,
    pub total_questions: usize,
    /// Relative to the strongest pattern, two decimals.
    pub probability: f64,
    pub prediction_level: PredictionLevel,
    pub prediction_text: String,
    pub questions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PatternAnalysis {
    pub patterns: Vec<QuestionPattern>,
    pub insight: String,
}

struct Bucket {
    question_type: QuestionType,
    papers: BTreeSet<usize>,
    questions: Vec<String>,
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub fn analyze_patterns(lines: &[QuestionLine]) -> PatternAnalysis {
    let mut buckets: Vec<Bucket> = QuestionType::ALL
        .iter()
        .map(|&question_type| Bucket {
            question_type,
            papers: BTreeSet::new(),
            questions: Vec::new(),
        })
        .collect();

    for line in lines {
        let question_type = classify_question(&line.text);
        if let Some(bucket) = buckets.iter_mut().find(|b| b.question_type == question_type) {
            bucket.papers.insert(line.paper);
            bucket.questions.push(line.text.clone());
        }
    }
    buckets.retain(|b| !b.questions.is_empty());

    let raw_scores: Vec<usize> = buckets
        .iter()
        .map(|b| b.papers.len() * b.questions.len())
        .collect();
    let max_score = match raw_scores.iter().copied().max() {
        Some(max) if max > 0 => max as f64,
        _ => {
            return PatternAnalysis {
                patterns: Vec::new(),
                insight: NO_PATTERN.to_string(),
            }
        }
    };

    let mut patterns: Vec<QuestionPattern> = buckets
        .into_iter()
        .zip(raw_scores)
        .map(|(bucket, raw)| {
            let probability = round2(100.0 * raw as f64 / max_score);
            let level = PredictionLevel::from_probability(probability);
            let total_questions = bucket.questions.len();
            let mut questions = bucket.questions;
            questions.truncate(MAX_SAMPLES);
            QuestionPattern {
                question_type: bucket.question_type,
                appeared_in_papers: bucket.papers.len(),
                total_questions,
                probability,
                prediction_level: level,
                prediction_text: level.sentence(bucket.question_type),
                questions,
            }
        })
        .collect();

    patterns.sort_by(|a, b| b.probability.total_cmp(&a.probability));

    let insight = patterns
        .first()
        .map(|p| p.prediction_text.clone())
        .unwrap_or_else(|| NO_PATTERN.to_string());

    PatternAnalysis { patterns, insight }
}
