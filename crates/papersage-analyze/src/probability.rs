//! Turning raw topic counts into percentages that sum to 100.

use serde::Serialize;

use crate::scoring::TopicCounts;

/// A ranked topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopicProbability {
    pub topic: String,
    pub subject: String,
    /// Percentage of all keyword hits, 0..=100.
    pub probability: u32,
    pub count: u32,
    pub papers: u32,
}

/// `round(100 * count / total)`, halves rounding up. `total` must be non-zero.
fn percent(count: u32, total: u64) -> u32 {
    ((200 * u64::from(count) + total) / (2 * total)) as u32
}

/// Convert counts to ranked percentages.
///
/// Zero-count topics are dropped, then anything below `min_percent`. The rest
/// is sorted by probability (stable, so ties keep dictionary order) and the
/// rounding error is corrected so the list sums to exactly 100.
/// Returns an empty list when nothing was counted.
pub fn normalize_counts(counts: &TopicCounts, min_percent: u32) -> Vec<TopicProbability> {
    let total = counts.total();
    if total == 0 {
        return Vec::new();
    }

    let mut ranked: Vec<TopicProbability> = counts
        .iter()
        .filter(|c| c.count > 0)
        .map(|c| TopicProbability {
            topic: c.topic.clone(),
            subject: c.subject.clone(),
            probability: percent(c.count, total),
            count: c.count,
            papers: c.papers,
        })
        .filter(|p| p.probability >= min_percent)
        .collect();

    ranked.sort_by(|a, b| b.probability.cmp(&a.probability));
    correct_rounding(&mut ranked);
    ranked
}

/// Make `ranked` sum to exactly 100.
///
/// A shortfall goes to the top entry. An excess is taken from the top entry
/// when it can absorb it and keep at least 1; otherwise one point at a time
/// is taken from each entry in rank order, sparing entries at 1 until every
/// entry is down to 1.
fn correct_rounding(ranked: &mut [TopicProbability]) {
    let sum: u64 = ranked.iter().map(|p| u64::from(p.probability)).sum();
    let Some(top) = ranked.first_mut() else {
        return;
    };

    if sum <= 100 {
        top.probability += (100 - sum) as u32;
        return;
    }

    let mut excess = sum - 100;
    if u64::from(top.probability) > excess {
        top.probability -= excess as u32;
        return;
    }

    for floor in [1, 0] {
        while excess > 0 {
            let mut taken = false;
            for entry in ranked.iter_mut() {
                if excess == 0 {
                    break;
                }
                if entry.probability > floor {
                    entry.probability -= 1;
                    excess -= 1;
                    taken = true;
                }
            }
            if !taken {
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictionary::{KeywordDictionary, SubjectSpec, TopicSpec};
    use crate::scoring::score;

    fn dict(topics: &[(&str, &str)]) -> KeywordDictionary {
        KeywordDictionary::new(vec![SubjectSpec {
            name: "Science".into(),
            topics: topics
                .iter()
                .map(|(name, kw)| TopicSpec {
                    name: name.to_string(),
                    keywords: vec![kw.to_string()],
                })
                .collect(),
        }])
        .unwrap()
    }

    fn sum(ranked: &[TopicProbability]) -> u32 {
        ranked.iter().map(|p| p.probability).sum()
    }

    #[test]
    fn test_force_force_acid() {
        let d = dict(&[("Physics", "force"), ("Chemistry", "acid")]);
        let ranked = normalize_counts(&score(&["force force acid"], &d), 0);
        assert_eq!(ranked.len(), 2);
        assert_eq!((ranked[0].topic.as_str(), ranked[0].probability), ("Physics", 67));
        assert_eq!((ranked[1].topic.as_str(), ranked[1].probability), ("Chemistry", 33));
        assert_eq!(sum(&ranked), 100);
    }

    #[test]
    fn test_empty_counts() {
        let d = dict(&[("Physics", "force")]);
        assert!(normalize_counts(&score(&["nothing"], &d), 0).is_empty());
        assert!(normalize_counts(&TopicCounts::default(), 10).is_empty());
    }

    #[test]
    fn test_rounding_corrected_to_100() {
        // 1/3 each rounds to 33 + 33 + 33 = 99
        let d = dict(&[("A", "alpha"), ("B", "beta"), ("C", "gamma")]);
        let ranked = normalize_counts(&score(&["alpha beta gamma"], &d), 0);
        assert_eq!(sum(&ranked), 100);
        assert_eq!(ranked[0].topic, "A");
        assert_eq!(ranked[0].probability, 34);
        assert_eq!(ranked[1].topic, "B");
        assert_eq!(ranked[2].topic, "C");

        // 1/6 each rounds to 17 * 6 = 102
        let d = dict(&[
            ("A", "a1"),
            ("B", "b1"),
            ("C", "c1"),
            ("D", "d1"),
            ("E", "e1"),
            ("F", "f1"),
        ]);
        let ranked = normalize_counts(&score(&["a1 b1 c1 d1 e1 f1"], &d), 0);
        assert_eq!(sum(&ranked), 100);
        assert_eq!(ranked[0].probability, 15);
    }

    fn many(small: usize, hits: usize, tail_hits: usize) -> Vec<TopicProbability> {
        let names: Vec<String> = (0..=small).map(|i| format!("T{}", i)).collect();
        let keywords: Vec<String> = (0..=small).map(|i| format!("k{}", i)).collect();
        let topics: Vec<(&str, &str)> = names
            .iter()
            .zip(&keywords)
            .map(|(n, k)| (n.as_str(), k.as_str()))
            .collect();
        let d = dict(&topics);

        let mut text = String::new();
        for k in &keywords[..small] {
            text.push_str(&format!("{} ", k).repeat(hits));
        }
        text.push_str(&format!("{} ", keywords[small]).repeat(tail_hits));
        normalize_counts(&score(&[text], &d), 0)
    }

    #[test]
    fn test_excess_too_large_for_top_is_spread() {
        // 22 topics at 4.5% each round up to 5, plus one at 1%: 111 before correction.
        let ranked = many(22, 9, 2);
        assert_eq!(ranked.len(), 23);
        assert_eq!(sum(&ranked), 100);
        assert!(ranked.iter().all(|p| (1..=100).contains(&p.probability)));
        assert_eq!(ranked[0].topic, "T0");
        assert_eq!(ranked[0].probability, 4);
        assert_eq!(ranked[22].probability, 1);
    }

    #[test]
    fn test_always_sums_to_100() {
        for small in 1..30 {
            for hits in 1..4 {
                for tail in 1..4 {
                    let ranked = many(small, hits, tail);
                    assert_eq!(sum(&ranked), 100, "small={} hits={} tail={}", small, hits, tail);
                    assert!(ranked.iter().all(|p| p.probability <= 100));
                }
            }
        }
    }

    #[test]
    fn test_min_percent_filter() {
        let d = dict(&[("Major", "big"), ("Minor", "small")]);
        let text = format!("{} small", "big ".repeat(19));
        let counts = score(&[text], &d);

        let unfiltered = normalize_counts(&counts, 0);
        assert_eq!(unfiltered.len(), 2);
        assert_eq!(unfiltered[1].probability, 5);

        let filtered = normalize_counts(&counts, 10);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].topic, "Major");
        assert_eq!(filtered[0].probability, 100);
    }

    #[test]
    fn test_sorted_descending() {
        let d = dict(&[("Low", "low"), ("High", "high")]);
        let ranked = normalize_counts(&score(&["low high high high"], &d), 0);
        assert_eq!(ranked[0].topic, "High");
        assert_eq!(ranked[0].count, 3);
        assert_eq!(ranked[1].topic, "Low");
    }
}
