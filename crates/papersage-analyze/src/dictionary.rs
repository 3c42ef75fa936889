//! Subject → topic → keyword dictionary.
//!
//! A dictionary is built once at startup (from JSON or the built-in pack),
//! compiled into word-boundary regexes, and then shared read-only behind an
//! `Arc` by every request.

use std::collections::HashSet;
use std::path::Path;

use papersage_core::{Error, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::normalize::normalize;

/// A topic as written in a dictionary file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicSpec {
    pub name: String,
    #[serde(default)]
    pub keywords: Vec<String>,
}

/// A subject as written in a dictionary file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectSpec {
    pub name: String,
    #[serde(default)]
    pub topics: Vec<TopicSpec>,
}

#[derive(Debug, Serialize, Deserialize)]
struct DictionaryFile {
    subjects: Vec<SubjectSpec>,
}

/// A compiled keyword.
#[derive(Debug, Clone)]
pub struct Keyword {
    /// Normalized keyword text.
    pub text: String,
    pattern: Regex,
}

impl Keyword {
    fn compile(text: String) -> Result<Self> {
        let pattern = Regex::new(&format!(r"\b{}(?:s|es)?\b", regex::escape(&text)))
            .map_err(|e| Error::Dictionary(format!("bad keyword {:?}: {}", text, e)))?;
        Ok(Self { text, pattern })
    }

    /// Number of non-overlapping occurrences in already-normalized text.
    pub fn count_in(&self, normalized: &str) -> u32 {
        self.pattern.find_iter(normalized).count() as u32
    }
}

#[derive(Debug, Clone)]
pub struct Topic {
    pub name: String,
    pub subject: String,
    pub keywords: Vec<Keyword>,
}

impl Topic {
    /// Topics without keywords (a "General" bucket) never score.
    pub fn is_scorable(&self) -> bool {
        !self.keywords.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct Subject {
    pub name: String,
    pub topics: Vec<Topic>,
}

/// Ordered, compiled keyword dictionary.
#[derive(Debug, Clone)]
pub struct KeywordDictionary {
    subjects: Vec<Subject>,
}

impl KeywordDictionary {
    /// Compile a dictionary. Subject and topic order is preserved.
    pub fn new(specs: Vec<SubjectSpec>) -> Result<Self> {
        if specs.iter().all(|s| s.topics.is_empty()) {
            return Err(Error::Dictionary("dictionary has no topics".into()));
        }

        let mut subject_names = HashSet::new();
        let mut topic_names = HashSet::new();
        let mut subjects = Vec::with_capacity(specs.len());

        for spec in specs {
            let subject_name = spec.name.trim().to_string();
            if subject_name.is_empty() {
                return Err(Error::Dictionary("subject with empty name".into()));
            }
            if !subject_names.insert(subject_name.to_lowercase()) {
                return Err(Error::Dictionary(format!(
                    "duplicate subject: {}",
                    subject_name
                )));
            }

            let mut topics = Vec::with_capacity(spec.topics.len());
            for topic in spec.topics {
                let topic_name = topic.name.trim().to_string();
                if topic_name.is_empty() {
                    return Err(Error::Dictionary(format!(
                        "topic with empty name under {}",
                        subject_name
                    )));
                }
                if !topic_names.insert(topic_name.to_lowercase()) {
                    return Err(Error::Dictionary(format!("duplicate topic: {}", topic_name)));
                }

                let mut seen = HashSet::new();
                let keywords = topic
                    .keywords
                    .iter()
                    .map(|k| normalize(k))
                    .filter(|k| !k.is_empty() && seen.insert(k.clone()))
                    .map(Keyword::compile)
                    .collect::<Result<Vec<_>>>()?;

                topics.push(Topic {
                    name: topic_name,
                    subject: subject_name.clone(),
                    keywords,
                });
            }

            subjects.push(Subject {
                name: subject_name,
                topics,
            });
        }

        Ok(Self { subjects })
    }

    /// Parse `{"subjects":[...]}` JSON.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let file: DictionaryFile = serde_json::from_str(json)?;
        Self::new(file.subjects)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        Self::from_json_str(&data)
    }

    /// The bundled Physics / Chemistry / Mathematics pack.
    pub fn builtin() -> Self {
        Self::new(builtin_specs()).expect("built-in dictionary is well-formed")
    }

    pub fn subjects(&self) -> &[Subject] {
        &self.subjects
    }

    /// Look up a subject, ignoring case.
    pub fn subject(&self, name: &str) -> Option<&Subject> {
        let name = name.trim();
        self.subjects
            .iter()
            .find(|s| s.name.eq_ignore_ascii_case(name))
    }

    /// All topics in dictionary order.
    pub fn topics(&self) -> impl Iterator<Item = &Topic> {
        self.subjects.iter().flat_map(|s| s.topics.iter())
    }

    pub fn topic_count(&self) -> usize {
        self.subjects.iter().map(|s| s.topics.len()).sum()
    }

    /// Back to the serializable form, with normalized keywords.
    pub fn to_specs(&self) -> Vec<SubjectSpec> {
        self.subjects
            .iter()
            .map(|s| SubjectSpec {
                name: s.name.clone(),
                topics: s
                    .topics
                    .iter()
                    .map(|t| TopicSpec {
                        name: t.name.clone(),
                        keywords: t.keywords.iter().map(|k| k.text.clone()).collect(),
                    })
                    .collect(),
            })
            .collect()
    }
}

fn subject(name: &str, topics: &[(&str, &[&str])]) -> SubjectSpec {
    SubjectSpec {
        name: name.to_string(),
        topics: topics
            .iter()
            .map(|(topic, keywords)| TopicSpec {
                name: topic.to_string(),
                keywords: keywords.iter().map(|k| k.to_string()).collect(),
            })
            .collect(),
    }
}

fn builtin_specs() -> Vec<SubjectSpec> {
    vec![
        subject(
            "Physics",
            &[
                (
                    "Electrostatics",
                    &[
                        "electrostatics", "electric field", "electric charge", "charge",
                        "coulomb", "electric potential", "capacitor", "capacitance",
                        "gauss", "electric flux", "dipole", "permittivity",
                    ],
                ),
                (
                    "Current Electricity",
                    &[
                        "current electricity", "resistance", "resistor", "ohm", "kirchhoff",
                        "wheatstone", "potentiometer", "emf", "drift velocity", "resistivity",
                        "meter bridge",
                    ],
                ),
                (
                    "Magnetism",
                    &[
                        "magnetic field", "magnet", "biot savart", "ampere", "solenoid",
                        "lorentz force", "cyclotron", "magnetic moment", "galvanometer",
                    ],
                ),
                (
                    "Electromagnetic Induction",
                    &[
                        "electromagnetic induction", "induction", "faraday", "lenz",
                        "inductance", "eddy current", "transformer", "ac generator",
                        "alternating current",
                    ],
                ),
                (
                    "Optics",
                    &[
                        "optics", "lens", "mirror", "refraction", "reflection", "prism",
                        "interference", "diffraction", "polarisation", "polarization",
                        "focal length", "young",
                    ],
                ),
                (
                    "Modern Physics",
                    &[
                        "photoelectric", "photon", "de broglie", "bohr", "nucleus",
                        "radioactivity", "radioactive", "semiconductor", "diode", "transistor",
                    ],
                ),
                (
                    "Mechanics",
                    &[
                        "force", "motion", "velocity", "acceleration", "momentum", "newton",
                        "friction", "projectile", "torque", "gravitation",
                    ],
                ),
                (
                    "Thermodynamics",
                    &[
                        "thermodynamics", "heat", "temperature", "entropy", "carnot",
                        "specific heat", "isothermal", "adiabatic",
                    ],
                ),
            ],
        ),
        subject(
            "Chemistry",
            &[
                (
                    "Mole Concept",
                    &["mole", "molar mass", "avogadro", "stoichiometry", "empirical formula"],
                ),
                (
                    "Chemical Bonding",
                    &[
                        "ionic bond", "covalent", "hybridisation", "hybridization", "vsepr",
                        "molecular orbital", "bond order",
                    ],
                ),
                (
                    "Acids and Bases",
                    &["acid", "base", "ph", "buffer", "neutralisation", "neutralization"],
                ),
                (
                    "Solutions",
                    &[
                        "molarity", "molality", "osmotic pressure", "raoult", "colligative",
                        "solute", "solvent",
                    ],
                ),
                (
                    "Electrochemistry",
                    &[
                        "electrochemistry", "electrode", "electrolysis", "cell potential",
                        "nernst", "conductance", "galvanic",
                    ],
                ),
                (
                    "Chemical Kinetics",
                    &[
                        "rate of reaction", "rate constant", "order of reaction",
                        "activation energy", "half life", "reaction",
                    ],
                ),
                (
                    "Organic Chemistry",
                    &[
                        "alcohol", "aldehyde", "ketone", "carboxylic", "amine", "benzene",
                        "hydrocarbon", "isomer", "alkane", "alkene", "alkyne",
                    ],
                ),
                (
                    "Coordination Compounds",
                    &["ligand", "coordination", "complex ion", "werner", "crystal field"],
                ),
            ],
        ),
        subject(
            "Mathematics",
            &[
                (
                    "Sets and Relations",
                    &["set", "subset", "relation", "union", "intersection", "function"],
                ),
                (
                    "Calculus",
                    &[
                        "limit", "derivative", "differentiate", "differentiation", "integral",
                        "integrate", "integration", "continuity", "maxima", "minima",
                    ],
                ),
                (
                    "Matrices and Determinants",
                    &["matrix", "matrices", "determinant", "adjoint", "inverse"],
                ),
                (
                    "Vectors",
                    &["vector", "dot product", "cross product", "scalar"],
                ),
                (
                    "Probability",
                    &["probability", "random variable", "bayes", "binomial distribution"],
                ),
                (
                    "Trigonometry",
                    &["trigonometric", "sin", "cos", "tan", "angle"],
                ),
                (
                    "Coordinate Geometry",
                    &["straight line", "circle", "parabola", "ellipse", "hyperbola", "slope"],
                ),
                (
                    "Differential Equations",
                    &["differential equation", "order and degree"],
                ),
            ],
        ),
        subject("General", &[("General", &[])]),
    ]
}
