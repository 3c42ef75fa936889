//! Coarse question-type classification.
//!
//! Rules are evaluated top to bottom and the first rule with a matching cue
//! wins, so a line containing both "calculate" and "explain" is Numerical.

use serde::{Deserialize, Serialize};

/// Coarse type of an exam question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuestionType {
    #[serde(rename = "Numerical")]
    Numerical,
    #[serde(rename = "Derivation/Proof")]
    Derivation,
    #[serde(rename = "MCQ")]
    Mcq,
    #[serde(rename = "Diagram/Graph")]
    Diagram,
    #[serde(rename = "Theory")]
    Theory,
}

impl QuestionType {
    /// Every type, in the order its first rule appears in [`RULES`].
    pub const ALL: [QuestionType; 5] = [
        QuestionType::Numerical,
        QuestionType::Derivation,
        QuestionType::Mcq,
        QuestionType::Diagram,
        QuestionType::Theory,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Numerical => "Numerical",
            Self::Derivation => "Derivation/Proof",
            Self::Mcq => "MCQ",
            Self::Diagram => "Diagram/Graph",
            Self::Theory => "Theory",
        }
    }
}

impl std::fmt::Display for QuestionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// One classification rule: any cue (substring of the lower-cased line) selects `label`.
#[derive(Debug, Clone, Copy)]
pub struct ClassificationRule {
    pub label: QuestionType,
    pub cues: &'static [&'static str],
}

impl ClassificationRule {
    pub fn matches(&self, lower: &str) -> bool {
        self.cues.iter().any(|cue| lower.contains(cue))
    }
}

/// Ordered rule table. Lines matching no rule fall back to [`QuestionType::Theory`].
pub const RULES: &[ClassificationRule] = &[
    ClassificationRule {
        label: QuestionType::Numerical,
        cues: &[
            "calculate",
            "compute",
            "find the value",
            "determine the value",
            "evaluate",
            "estimate",
            "solve",
            "how much",
            "how many",
            "maximum",
            "minimum",
        ],
    },
    ClassificationRule {
        label: QuestionType::Derivation,
        cues: &["derive", "prove", "show that", "deduce", "justify", "verify"],
    },
    ClassificationRule {
        label: QuestionType::Mcq,
        cues: &["which of the following", "(a)", "(b)", "option", "choose the correct"],
    },
    ClassificationRule {
        label: QuestionType::Diagram,
        cues: &["draw", "sketch", "plot", "diagram", "graph", "figure", "label"],
    },
    ClassificationRule {
        label: QuestionType::Theory,
        cues: &[
            "define",
            "explain",
            "describe",
            "discuss",
            "state",
            "what is",
            "write short note",
        ],
    },
    // Bare equations and percentages read as numericals once no verb matched.
    ClassificationRule {
        label: QuestionType::Numerical,
        cues: &["=", "%"],
    },
];

/// Classify a question line using [`RULES`].
pub fn classify_question(line: &str) -> QuestionType {
    let lower = line.to_lowercase();
    RULES
        .iter()
        .find(|rule| rule.matches(&lower))
        .map(|rule| rule.label)
        .unwrap_or(QuestionType::Theory)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numerical_beats_theory() {
        assert_eq!(
            classify_question("Calculate the electric field and explain its direction."),
            QuestionType::Numerical
        );
        assert_eq!(
            classify_question("calculate the electric field due to charge"),
            QuestionType::Numerical
        );
    }

    #[test]
    fn test_rule_order() {
        assert_eq!(
            classify_question("Derive the lens maker's formula and draw the ray diagram."),
            QuestionType::Derivation
        );
        assert_eq!(
            classify_question("Which of the following is a vector quantity?"),
            QuestionType::Mcq
        );
        assert_eq!(
            classify_question("Draw the circuit diagram of a full wave rectifier."),
            QuestionType::Diagram
        );
        assert_eq!(
            classify_question("Define electric flux and state its SI unit."),
            QuestionType::Theory
        );
        assert_eq!(
            classify_question("If 2x + 3 = 11, what does x equal?"),
            QuestionType::Numerical
        );
    }

    #[test]
    fn test_fallback_is_theory() {
        assert_eq!(
            classify_question("Give two examples of ionic compounds."),
            QuestionType::Theory
        );
    }

    #[test]
    fn test_labels_serialize() {
        assert_eq!(
            serde_json::to_string(&QuestionType::Derivation).unwrap(),
            "\"Derivation/Proof\""
        );
        assert_eq!(QuestionType::Mcq.to_string(), "MCQ");
    }
}
