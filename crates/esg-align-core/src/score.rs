//! Analysis output: per-topic scores, qualitative labels, and framework means.

use serde::{Deserialize, Serialize};

/// Qualitative alignment label attached to a topic score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AlignmentLabel {
    #[serde(rename = "Strong alignment")]
    Strong,
    #[serde(rename = "Good alignment")]
    Good,
    #[serde(rename = "Partial alignment")]
    Partial,
    #[serde(rename = "Weak alignment")]
    Weak,
    #[serde(rename = "Minimal alignment")]
    Minimal,
}

impl AlignmentLabel {
    /// Lower score bounds, highest first.
    pub const THRESHOLDS: [(f64, AlignmentLabel); 4] = [
        (0.50, AlignmentLabel::Strong),
        (0.35, AlignmentLabel::Good),
        (0.25, AlignmentLabel::Partial),
        (0.15, AlignmentLabel::Weak),
    ];

    pub fn from_score(score: f64) -> Self {
        Self::THRESHOLDS
            .iter()
            .find(|(min, _)| score >= *min)
            .map(|&(_, label)| label)
            .unwrap_or(AlignmentLabel::Minimal)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Strong => "Strong alignment",
            Self::Good => "Good alignment",
            Self::Partial => "Partial alignment",
            Self::Weak => "Weak alignment",
            Self::Minimal => "Minimal alignment",
        }
    }

    /// One-sentence reading of the label for reports.
    pub fn explanation(&self) -> &'static str {
        match self {
            Self::Strong => "document comprehensively addresses this requirement",
            Self::Good => "document covers key aspects of this requirement",
            Self::Partial => {
                "document touches on some aspects but could be more comprehensive"
            }
            Self::Weak => "limited coverage of this requirement",
            Self::Minimal => "requirement not substantially addressed in document",
        }
    }
}

impl std::fmt::Display for AlignmentLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Alignment of the document with one topic of one framework.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicScore {
    pub framework: String,
    pub topic: String,
    /// In `[0, 1]`.
    pub score: f64,
    pub label: AlignmentLabel,
}

impl TopicScore {
    /// Create a score record, labelling it from the thresholds.
    pub fn new(framework: impl Into<String>, topic: impl Into<String>, score: f64) -> Self {
        Self {
            framework: framework.into(),
            topic: topic.into(),
            score,
            label: AlignmentLabel::from_score(score),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameworkMean {
    pub framework: String,
    pub mean: f64,
}

/// All topic scores of one run, plus per-framework means in first-seen order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub scores: Vec<TopicScore>,
    pub framework_means: Vec<FrameworkMean>,
}

impl AnalysisResult {
    /// Assemble a result, deriving each framework's unweighted mean score.
    pub fn from_scores(scores: Vec<TopicScore>) -> Self {
        let mut sums: Vec<(String, f64, usize)> = Vec::new();
        for s in &scores {
            match sums.iter_mut().find(|(fw, _, _)| *fw == s.framework) {
                Some(entry) => {
                    entry.1 += s.score;
                    entry.2 += 1;
                }
                None => sums.push((s.framework.clone(), s.score, 1)),
            }
        }

        let framework_means = sums
            .into_iter()
            .map(|(framework, sum, count)| FrameworkMean {
                framework,
                mean: sum / count as f64,
            })
            .collect();

        Self {
            scores,
            framework_means,
        }
    }

    pub fn framework_mean(&self, framework: &str) -> Option<f64> {
        self.framework_means
            .iter()
            .find(|m| m.framework == framework)
            .map(|m| m.mean)
    }

    pub fn scores_for<'a>(&'a self, framework: &'a str) -> impl Iterator<Item = &'a TopicScore> {
        self.scores.iter().filter(move |s| s.framework == framework)
    }

    /// Mean over every topic score, `None` when no topic was scored.
    pub fn overall_mean(&self) -> Option<f64> {
        if self.scores.is_empty() {
            return None;
        }
        let sum: f64 = self.scores.iter().map(|s| s.score).sum();
        Some(sum / self.scores.len() as f64)
    }

    /// Framework with the highest mean. Ties keep the earlier framework.
    pub fn best_framework(&self) -> Option<&FrameworkMean> {
        let mut best: Option<&FrameworkMean> = None;
        for m in &self.framework_means {
            if best.is_none_or(|b| m.mean > b.mean) {
                best = Some(m);
            }
        }
        best
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}
