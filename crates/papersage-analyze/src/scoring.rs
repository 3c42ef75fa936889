//! Keyword scoring of documents against a [`KeywordDictionary`].
//!
//! A topic's count is the number of keyword occurrences (non-overlapping
//! word-boundary matches) in the normalized text, summed over the topic's
//! keywords and over all documents. Counting is commutative across documents,
//! so per-document results can be produced in any order and merged.

use papersage_core::{Error, Result};
use serde::Serialize;

use crate::dictionary::{KeywordDictionary, Topic};
use crate::normalize::normalize;

/// Accumulated score of one topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopicCount {
    pub topic: String,
    pub subject: String,
    /// Keyword occurrences.
    pub count: u32,
    /// Documents with at least one occurrence.
    pub papers: u32,
}

/// Per-topic counts in dictionary order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TopicCounts {
    entries: Vec<TopicCount>,
}

impl TopicCounts {
    /// Zeroed counts for the given topics.
    pub fn zeroed<'a>(topics: impl IntoIterator<Item = &'a Topic>) -> Self {
        Self {
            entries: topics
                .into_iter()
                .map(|t| TopicCount {
                    topic: t.name.clone(),
                    subject: t.subject.clone(),
                    count: 0,
                    papers: 0,
                })
                .collect(),
        }
    }

    /// Score one normalized document.
    pub fn from_document<'a>(
        normalized: &str,
        topics: impl IntoIterator<Item = &'a Topic>,
    ) -> Self {
        let entries = topics
            .into_iter()
            .map(|t| {
                let count: u32 = t.keywords.iter().map(|k| k.count_in(normalized)).sum();
                TopicCount {
                    topic: t.name.clone(),
                    subject: t.subject.clone(),
                    count,
                    papers: u32::from(count > 0),
                }
            })
            .collect();
        Self { entries }
    }

    /// Fold another partial result into this one. Topics are matched by name;
    /// unseen topics are appended.
    pub fn merge(&mut self, other: TopicCounts) {
        for incoming in other.entries {
            match self.entries.iter_mut().find(|e| e.topic == incoming.topic) {
                Some(entry) => {
                    entry.count += incoming.count;
                    entry.papers += incoming.papers;
                }
                None => self.entries.push(incoming),
            }
        }
    }

    pub fn get(&self, topic: &str) -> Option<&TopicCount> {
        self.entries.iter().find(|e| e.topic == topic)
    }

    /// Count for `topic`, zero if unknown.
    pub fn count(&self, topic: &str) -> u32 {
        self.get(topic).map(|e| e.count).unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TopicCount> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total(&self) -> u64 {
        self.entries.iter().map(|e| u64::from(e.count)).sum()
    }

    /// Summed counts per subject, in first-seen order.
    pub fn subject_totals(&self) -> Vec<(&str, u64)> {
        let mut totals: Vec<(&str, u64)> = Vec::new();
        for entry in &self.entries {
            match totals.iter_mut().find(|(s, _)| *s == entry.subject) {
                Some((_, total)) => *total += u64::from(entry.count),
                None => totals.push((entry.subject.as_str(), u64::from(entry.count))),
            }
        }
        totals
    }

    /// Subject with the largest summed count; the earliest wins ties.
    /// `None` when nothing matched.
    pub fn detect_subject(&self) -> Option<&str> {
        let mut best: Option<(&str, u64)> = None;
        for (subject, total) in self.subject_totals() {
            if total > best.map(|(_, t)| t).unwrap_or(0) {
                best = Some((subject, total));
            }
        }
        best.map(|(s, _)| s)
    }
}

/// The topics one analysis run scores against: a single subject's, or the
/// whole dictionary's.
#[derive(Debug, Clone)]
pub struct TopicScope<'a> {
    /// Canonical subject name when the scope was narrowed.
    pub subject: Option<&'a str>,
    topics: Vec<&'a Topic>,
}

impl<'a> TopicScope<'a> {
    /// Resolve an optional subject filter (name match ignores case).
    pub fn resolve(dictionary: &'a KeywordDictionary, subject: Option<&str>) -> Result<Self> {
        match subject {
            Some(name) => {
                let subject = dictionary
                    .subject(name)
                    .ok_or_else(|| Error::UnknownSubject(name.to_string()))?;
                Ok(Self {
                    subject: Some(subject.name.as_str()),
                    topics: subject.topics.iter().collect(),
                })
            }
            None => Ok(Self {
                subject: None,
                topics: dictionary.topics().collect(),
            }),
        }
    }

    pub fn topics(&self) -> impl Iterator<Item = &'a Topic> + '_ {
        self.topics.iter().copied()
    }

    /// Score already-normalized documents, one partial per document merged
    /// in order.
    pub fn score_normalized<S: AsRef<str>>(
        &self,
        normalized: impl IntoIterator<Item = S>,
    ) -> TopicCounts {
        let mut counts = TopicCounts::zeroed(self.topics());
        for doc in normalized {
            counts.merge(TopicCounts::from_document(doc.as_ref(), self.topics()));
        }
        counts
    }

    /// Normalize and score raw document texts.
    pub fn score<S: AsRef<str>>(&self, documents: &[S]) -> TopicCounts {
        self.score_normalized(documents.iter().map(|d| normalize(d.as_ref())))
    }
}

/// Score raw document texts against every topic in `dictionary`.
pub fn score<S: AsRef<str>>(documents: &[S], dictionary: &KeywordDictionary) -> TopicCounts {
    TopicScope {
        subject: None,
        topics: dictionary.topics().collect(),
    }
    .score(documents)
}

/// Score raw document texts against one subject's topics (name match ignores case).
pub fn score_subject<S: AsRef<str>>(
    documents: &[S],
    dictionary: &KeywordDictionary,
    subject: &str,
) -> Result<TopicCounts> {
    Ok(TopicScope::resolve(dictionary, Some(subject))?.score(documents))
}
