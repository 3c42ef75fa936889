//! Human-readable prediction sentence for the top topic.

use papersage_core::ProbabilityTags;

/// Inputs to [`generate_prediction_sentence`]. Missing fields degrade the
/// output to an empty string.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PredictionInput<'a> {
    pub topic: Option<&'a str>,
    /// Keyword occurrences of `topic` across the batch.
    pub appeared_count: u32,
    pub total_papers: usize,
    pub probability_percent: Option<u32>,
}

/// Qualitative tag for a percentage.
pub fn probability_tag(probability_percent: u32, tags: &ProbabilityTags) -> &'static str {
    if probability_percent >= tags.high {
        "high"
    } else if probability_percent >= tags.medium {
        "medium"
    } else {
        "low"
    }
}

pub fn generate_prediction_sentence(input: &PredictionInput<'_>, tags: &ProbabilityTags) -> String {
    let (topic, probability) = match (input.topic, input.probability_percent) {
        (Some(topic), Some(probability)) if !topic.trim().is_empty() => (topic, probability),
        _ => return String::new(),
    };

    format!(
        "Based on analysis of last {} papers, {} appeared {} times and has a {} probability ({}%) of appearing again.",
        input.total_papers,
        topic,
        input.appeared_count,
        probability_tag(probability, tags),
        probability
    )
}
