//! Question-line extraction and near-duplicate clustering.

use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use papersage_core::AnalysisSettings;
use regex::Regex;
use serde::Serialize;

use crate::classify::{classify_question, QuestionType};

/// Leading question numbering: `Q1.`, `Q.1`, `Question 3:`, `1)`, `1.`, `(1)`.
static ENUMERATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*(?:q(?:uestion)?\s*\.?\s*\d+\s*[.):\-]?|\(\d+\)|\d+[.)])\s*").unwrap()
});

/// Administrative lines that are never questions.
static BOILERPLATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\b(?:section|time allowed|maximum marks|max\.? marks|attempt any|instructions|page|roll no|general instructions|for more information)\b",
    )
    .unwrap()
});

/// Interrogative and instructional openers.
const QUESTION_WORDS: &[&str] = &[
    "what", "why", "how", "when", "where", "which", "who", "define", "explain", "calculate",
    "derive", "prove", "find", "state", "describe", "discuss", "show", "determine", "solve",
    "evaluate", "compute", "write", "draw", "compare", "distinguish", "differentiate",
    "obtain", "deduce", "estimate", "list", "give", "sketch", "verify", "justify",
];

/// A candidate question together with the paper it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionLine {
    pub text: String,
    /// Index of the source paper within the request.
    pub paper: usize,
}

/// A cluster of near-identical question lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionRecord {
    #[serde(skip)]
    pub key: String,
    /// First-seen original line.
    #[serde(rename = "question")]
    pub display_text: String,
    #[serde(rename = "repeated")]
    pub count: u32,
    /// Number of distinct papers the question appeared in.
    pub papers: usize,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    #[serde(skip)]
    seen_in: BTreeSet<usize>,
}

impl QuestionRecord {
    pub fn is_repeated(&self) -> bool {
        self.count > 1
    }
}

/// Split off any leading enumeration, returning the remainder.
fn strip_enumeration(line: &str) -> (&str, bool) {
    match ENUMERATION.find(line) {
        Some(m) => {
            let rest = &line[m.end()..];
            if rest.starts_with(|c: char| c.is_alphabetic()) {
                (rest, true)
            } else {
                (line, false)
            }
        }
        None => (line, false),
    }
}

fn looks_like_question(line: &str) -> bool {
    if line.ends_with('?') {
        return true;
    }
    let (rest, enumerated) = strip_enumeration(line);
    if enumerated {
        return true;
    }
    let first = rest
        .split_whitespace()
        .next()
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()).to_lowercase())
        .unwrap_or_default();
    QUESTION_WORDS.contains(&first.as_str())
}

/// Pull candidate question lines out of raw (un-normalized) paper text.
///
/// A line is kept when it is at least `min_question_len` characters, has
/// three or more words longer than two characters, is not administrative
/// boilerplate, and looks like a question.
pub fn extract_questions(text: &str, settings: &AnalysisSettings) -> Vec<String> {
    text.lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|line| line.chars().count() >= settings.min_question_len)
        .filter(|line| line.split(' ').filter(|w| w.chars().count() > 2).count() >= 3)
        .filter(|line| !BOILERPLATE.is_match(&line.to_lowercase()))
        .filter(|line| looks_like_question(line))
        .collect()
}

/// Clustering key: numbering removed, lower-case letters and spaces only,
/// truncated to the first `max_words` words.
pub fn cluster_key(line: &str, max_words: usize) -> String {
    let (rest, _) = strip_enumeration(line);
    let letters: String = rest
        .chars()
        .flat_map(char::to_lowercase)
        .map(|c| if c.is_ascii_lowercase() { c } else { ' ' })
        .collect();
    letters
        .split_whitespace()
        .take(max_words)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Keys cluster when equal, or when both reach `prefix_chars` and one starts
/// with the other's prefix.
fn same_cluster(a: &str, b: &str, prefix_chars: usize) -> bool {
    if a == b {
        return true;
    }
    if prefix_chars == 0 || a.len() < prefix_chars || b.len() < prefix_chars {
        return false;
    }
    // Keys are ASCII, so byte slicing is on char boundaries.
    a.starts_with(&b[..prefix_chars]) || b.starts_with(&a[..prefix_chars])
}

/// Group question lines into records, in first-seen order.
pub fn cluster(lines: &[QuestionLine], settings: &AnalysisSettings) -> Vec<QuestionRecord> {
    let mut records: Vec<QuestionRecord> = Vec::new();

    for line in lines {
        let key = cluster_key(&line.text, settings.cluster_key_words);
        if key.is_empty() {
            continue;
        }

        match records
            .iter_mut()
            .find(|r| same_cluster(&r.key, &key, settings.cluster_prefix_chars))
        {
            Some(record) => {
                record.count += 1;
                record.seen_in.insert(line.paper);
                record.papers = record.seen_in.len();
            }
            None => {
                let mut seen_in = BTreeSet::new();
                seen_in.insert(line.paper);
                records.push(QuestionRecord {
                    key,
                    display_text: line.text.clone(),
                    count: 1,
                    papers: 1,
                    question_type: classify_question(&line.text),
                    seen_in,
                });
            }
        }
    }

    records
}

/// Records with `count > 1`, most repeated first (stable), capped at `max`.
pub fn repeated_questions(records: Vec<QuestionRecord>, max: usize) -> Vec<QuestionRecord> {
    let mut repeated: Vec<QuestionRecord> =
        records.into_iter().filter(QuestionRecord::is_repeated).collect();
    repeated.sort_by(|a, b| b.count.cmp(&a.count));
    repeated.truncate(max);
    repeated
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> AnalysisSettings {
        AnalysisSettings::default()
    }

    fn lines(paper: usize, texts: &[&str]) -> Vec<QuestionLine> {
        texts
            .iter()
            .map(|t| QuestionLine {
                text: t.to_string(),
                paper,
            })
            .collect()
    }

    #[test]
    fn test_extract_question_signals() {
        let text = "PHYSICS PAPER 2023\n\
                    Q1. A ball is thrown vertically upwards with speed 20 m/s.\n\
                    Explain the working principle of a moving coil galvanometer.\n\
                    The following data were recorded in the lab notebook today\n\
                    Why does the sky appear blue during the day time\n\
                    Is this short?\n\
                    The period of a simple pendulum depends on its length?";
        let found = extract_questions(text, &settings());
        assert_eq!(
            found,
            vec![
                "Q1. A ball is thrown vertically upwards with speed 20 m/s.",
                "Explain the working principle of a moving coil galvanometer.",
                "Why does the sky appear blue during the day time",
                "The period of a simple pendulum depends on its length?",
            ]
        );
    }

    #[test]
    fn test_boilerplate_only_yields_nothing() {
        let text = "Time allowed: 3 hours\nSection A\n\
                    Maximum Marks: 70 for this question paper overall\n\
                    Section B: Attempt any five questions from this part?\n\
                    General Instructions: read every question carefully.\n\
                    Page 2 of 4 - what is printed at the bottom here?";
        assert!(extract_questions(text, &settings()).is_empty());
    }

    #[test]
    fn test_whitespace_collapsed() {
        let found = extract_questions("  Define   electric\tflux and its SI unit.  ", &settings());
        assert_eq!(found, vec!["Define electric flux and its SI unit."]);
    }

    #[test]
    fn test_cluster_key() {
        assert_eq!(
            cluster_key("Q3. Calculate the electric field (E) due to 2 charges!", 12),
            "calculate the electric field e due to charges"
        );
        assert_eq!(cluster_key("1) State Ohm's law.", 12), "state ohm s law");
        assert_eq!(cluster_key("one two three four five", 3), "one two three");
    }

    #[test]
    fn test_same_normalized_question_twice() {
        let q = "calculate the electric field due to charge";
        let mut input = lines(0, &[q]);
        input.extend(lines(1, &[q]));
        let records = cluster(&input, &settings());
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].count, 2);
        assert_eq!(records[0].papers, 2);
        assert_eq!(records[0].question_type, QuestionType::Numerical);
    }

    #[test]
    fn test_cluster_near_duplicates_by_prefix() {
        let mut input = lines(
            0,
            &["Q1. Derive an expression for the electric field of a dipole on its axis."],
        );
        input.extend(lines(
            1,
            &["4) Derive an expression for the electric field of a dipole at an equatorial point."],
        ));
        input.extend(lines(1, &["Define drift velocity and relaxation time of electrons."]));

        let records = cluster(&input, &settings());
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].count, 2);
        assert_eq!(
            records[0].display_text,
            "Q1. Derive an expression for the electric field of a dipole on its axis."
        );
        assert_eq!(records[1].count, 1);
    }

    #[test]
    fn test_short_keys_need_exact_match() {
        let input = lines(0, &["State Ohm's law?", "State Ohm's law and its limitations?"]);
        let records = cluster(&input, &settings());
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_repeated_sorted_and_capped() {
        let mut input = Vec::new();
        input.extend(lines(0, &["Explain the photoelectric effect with a neat diagram."]));
        for paper in 0..3 {
            input.extend(lines(paper, &["State and prove Gauss's theorem in electrostatics."]));
        }
        input.extend(lines(1, &["Explain the photoelectric effect with a neat diagram."]));
        input.extend(lines(2, &["Define the magnetic moment of a current loop."]));

        let records = cluster(&input, &settings());
        let repeated = repeated_questions(records.clone(), 10);
        assert_eq!(repeated.len(), 2);
        assert_eq!(repeated[0].count, 3);
        assert_eq!(repeated[1].count, 2);

        assert_eq!(repeated_questions(records, 1).len(), 1);
    }

    #[test]
    fn test_record_serializes_wire_names() {
        let q = "Calculate the electric field due to a point charge.";
        let mut input = lines(0, &[q]);
        input.extend(lines(1, &[q]));
        let record = &cluster(&input, &settings())[0];
        let value = serde_json::to_value(record).unwrap();
        assert_eq!(value["question"], q);
        assert_eq!(value["repeated"], 2);
        assert_eq!(value["type"], "Numerical");
        assert!(value.get("key").is_none());
    }
}
