//! Requirement corpus: frameworks, their topics, and requirement statements.
//!
//! The corpus is static configuration. It is loaded once from JSON, validated,
//! and read-only afterwards. Declared order of frameworks and topics is kept
//! because analysis results are emitted in that order.
//!
//! ```json
//! {"frameworks": [
//!   {"name": "TCFD", "topics": [
//!     {"name": "Governance", "requirements": ["Describe the board's oversight ..."]}
//!   ]}
//! ]}
//! ```

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

/// Bundled ten-framework corpus (TCFD, TNFD, ESRS, IFRS, PRA, TPT, BMA, MAS, OSFI, SBTi).
const REFERENCE_CORPUS_JSON: &str = include_str!("../corpus/reference.json");

#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("corpus JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("reading corpus: {0}")]
    Io(#[from] std::io::Error),

    #[error("corpus has no frameworks")]
    NoFrameworks,

    #[error("duplicate framework name: {0}")]
    DuplicateFramework(String),

    #[error("framework {0} has no topics")]
    EmptyFramework(String),

    #[error("framework {framework} declares topic {topic} more than once")]
    DuplicateTopic { framework: String, topic: String },

    #[error("topic {framework}/{topic} has no requirement statements")]
    EmptyTopic { framework: String, topic: String },

    #[error("topic {framework}/{topic} contains a blank requirement statement")]
    EmptyRequirement { framework: String, topic: String },
}

/// A named requirement category within a framework.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topic {
    pub name: String,
    pub requirements: Vec<String>,
}

/// A disclosure framework and its topics, in declared order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Framework {
    pub name: String,
    pub topics: Vec<Topic>,
}

impl Framework {
    pub fn topic(&self, name: &str) -> Option<&Topic> {
        self.topics.iter().find(|t| t.name == name)
    }

    /// Total requirement statements across all topics.
    pub fn requirement_count(&self) -> usize {
        self.topics.iter().map(|t| t.requirements.len()).sum()
    }
}

/// On-disk shape, validated into [`RequirementCorpus`].
#[derive(Deserialize)]
struct RawCorpus {
    frameworks: Vec<Framework>,
}

/// Validated set of frameworks.
///
/// Invariants: at least one framework, framework names unique, every framework
/// has at least one topic, topic names unique within a framework, every topic
/// has at least one non-blank requirement statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequirementCorpus {
    frameworks: Vec<Framework>,
}

impl RequirementCorpus {
    /// Validate a list of frameworks into a corpus.
    pub fn new(frameworks: Vec<Framework>) -> Result<Self, CorpusError> {
        if frameworks.is_empty() {
            return Err(CorpusError::NoFrameworks);
        }

        let mut seen = HashSet::new();
        for fw in &frameworks {
            if !seen.insert(fw.name.as_str()) {
                return Err(CorpusError::DuplicateFramework(fw.name.clone()));
            }
            if fw.topics.is_empty() {
                return Err(CorpusError::EmptyFramework(fw.name.clone()));
            }

            let mut topics = HashSet::new();
            for topic in &fw.topics {
                if !topics.insert(topic.name.as_str()) {
                    return Err(CorpusError::DuplicateTopic {
                        framework: fw.name.clone(),
                        topic: topic.name.clone(),
                    });
                }
                if topic.requirements.is_empty() {
                    return Err(CorpusError::EmptyTopic {
                        framework: fw.name.clone(),
                        topic: topic.name.clone(),
                    });
                }
                if topic.requirements.iter().any(|r| r.trim().is_empty()) {
                    return Err(CorpusError::EmptyRequirement {
                        framework: fw.name.clone(),
                        topic: topic.name.clone(),
                    });
                }
            }
        }

        Ok(Self { frameworks })
    }

    /// Parse and validate a corpus from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, CorpusError> {
        let raw: RawCorpus = serde_json::from_str(json)?;
        Self::new(raw.frameworks)
    }

    /// Load a corpus from a JSON file.
    pub fn load(path: &Path) -> Result<Self, CorpusError> {
        let json = std::fs::read_to_string(path)?;
        let corpus = Self::from_json(&json)?;
        info!(
            path = %path.display(),
            frameworks = corpus.frameworks.len(),
            topics = corpus.topic_count(),
            "loaded requirement corpus"
        );
        Ok(corpus)
    }

    /// The bundled reference corpus.
    pub fn reference() -> Result<Self, CorpusError> {
        Self::from_json(REFERENCE_CORPUS_JSON)
    }

    pub fn framework(&self, name: &str) -> Option<&Framework> {
        self.frameworks.iter().find(|f| f.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.framework(name).is_some()
    }

    pub fn frameworks(&self) -> &[Framework] {
        &self.frameworks
    }

    /// Framework names in declared order.
    pub fn framework_names(&self) -> impl Iterator<Item = &str> {
        self.frameworks.iter().map(|f| f.name.as_str())
    }

    pub fn topic_count(&self) -> usize {
        self.frameworks.iter().map(|f| f.topics.len()).sum()
    }
}
