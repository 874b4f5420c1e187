//! Document-to-requirement alignment scoring.
//!
//! For each selected framework (caller order) and each of its topics
//! (declared order), the topic's requirement statements and the document's
//! passages are vectorised together with a fresh TF-IDF fit. Every
//! requirement×passage pair is compared by cosine similarity and the topic
//! score is the mean over all pairs. Framework scores are the unweighted mean
//! of their topic scores.
//!
//! Selected names missing from the corpus are skipped without error. A topic
//! whose combined texts yield no vocabulary scores 0.0; it never aborts a run.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use esg_align_core::{
    AnalysisResult, Document, FrameworkSelection, InvalidInput, RequirementCorpus, Topic,
    TopicScore,
};
use tracing::{debug, info, warn};

use crate::similarity::{cosine_matrix, mean_similarity};
use crate::tfidf::TfidfVectorizer;

/// Progress callback: fraction of topics completed, in `[0, 1]`.
pub type ProgressFn<'a> = &'a mut (dyn FnMut(f64) + Send);

/// Analysis settings. Holds no state between runs.
#[derive(Debug, Clone, Copy)]
pub struct Analyzer {
    vectorizer: TfidfVectorizer,
    workers: usize,
}

impl Default for Analyzer {
    fn default() -> Self {
        Self {
            vectorizer: TfidfVectorizer::default(),
            workers: 1,
        }
    }
}

/// One unit of work: a topic of a selected framework.
struct TopicJob<'c> {
    framework: &'c str,
    topic: &'c Topic,
}

struct Progress<'a> {
    done: usize,
    total: usize,
    callback: Option<ProgressFn<'a>>,
}

impl Progress<'_> {
    fn tick(&mut self) {
        self.done += 1;
        if let Some(cb) = self.callback.as_mut() {
            cb(self.done as f64 / self.total as f64);
        }
    }
}

impl Analyzer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Evaluate topics on up to `workers` threads. 0 and 1 both mean sequential.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Score `document` against every topic of the selected frameworks.
    ///
    /// `on_progress` is called once per topic with a non-decreasing fraction
    /// that ends at 1.0. Results are in (framework, topic) order whatever the
    /// worker count.
    pub fn analyze(
        &self,
        document: &Document,
        selection: &FrameworkSelection,
        corpus: &RequirementCorpus,
        on_progress: Option<ProgressFn<'_>>,
    ) -> Result<AnalysisResult, InvalidInput> {
        if selection.is_empty() {
            return Err(InvalidInput::EmptySelection);
        }
        if document.is_empty() {
            return Err(InvalidInput::EmptyDocument);
        }

        let jobs = plan_jobs(selection, corpus);
        info!(
            frameworks = selection.len(),
            topics = jobs.len(),
            passages = document.len(),
            workers = self.workers,
            "starting alignment analysis"
        );

        let mut progress = Progress {
            done: 0,
            total: jobs.len(),
            callback: on_progress,
        };

        let scores = if self.workers <= 1 || jobs.len() <= 1 {
            self.score_sequential(&jobs, document, &mut progress)
        } else {
            self.score_parallel(&jobs, document, progress)
        };

        let topic_scores: Vec<TopicScore> = jobs
            .iter()
            .zip(scores)
            .map(|(job, score)| {
                let ts = TopicScore::new(job.framework, job.topic.name.as_str(), score);
                debug!(
                    framework = job.framework,
                    topic = %job.topic.name,
                    score = ts.score,
                    label = ts.label.as_str(),
                    "scored topic"
                );
                ts
            })
            .collect();

        let result = AnalysisResult::from_scores(topic_scores);
        info!(
            topics = result.scores.len(),
            overall = result.overall_mean().unwrap_or(0.0),
            "alignment analysis complete"
        );
        Ok(result)
    }

    fn score_sequential(
        &self,
        jobs: &[TopicJob<'_>],
        document: &Document,
        progress: &mut Progress<'_>,
    ) -> Vec<f64> {
        jobs.iter()
            .map(|job| {
                let score = self.topic_score(job, document);
                progress.tick();
                score
            })
            .collect()
    }

    fn score_parallel(
        &self,
        jobs: &[TopicJob<'_>],
        document: &Document,
        progress: Progress<'_>,
    ) -> Vec<f64> {
        let workers = self.workers.min(jobs.len());
        let next = AtomicUsize::new(0);
        // Held while ticking so callers observe fractions in increasing order.
        let progress = Mutex::new(progress);

        let scored: Vec<(usize, f64)> = std::thread::scope(|s| {
            let handles: Vec<_> = (0..workers)
                .map(|_| {
                    s.spawn(|| {
                        let mut out = Vec::new();
                        loop {
                            let i = next.fetch_add(1, Ordering::Relaxed);
                            let Some(job) = jobs.get(i) else { break };
                            out.push((i, self.topic_score(job, document)));
                            progress
                                .lock()
                                .unwrap_or_else(|poisoned| poisoned.into_inner())
                                .tick();
                        }
                        out
                    })
                })
                .collect();

            handles
                .into_iter()
                .flat_map(|h| h.join().unwrap_or_else(|e| std::panic::resume_unwind(e)))
                .collect()
        });

        let mut scores = vec![0.0; jobs.len()];
        for (i, score) in scored {
            scores[i] = score;
        }
        scores
    }

    fn topic_score(&self, job: &TopicJob<'_>, document: &Document) -> f64 {
        score_topic(&self.vectorizer, &job.topic.requirements, document.passages()).unwrap_or_else(
            |e| {
                warn!(
                    framework = job.framework,
                    topic = %job.topic.name,
                    error = %e,
                    "degenerate topic comparison, scoring 0.0"
                );
                0.0
            },
        )
    }
}

/// Mean requirement×passage cosine similarity over one joint TF-IDF fit.
///
/// Requirements occupy the first rows of the fit and passages the rest.
pub fn score_topic(
    vectorizer: &TfidfVectorizer,
    requirements: &[String],
    passages: &[String],
) -> Result<f64, crate::TfidfError> {
    let texts: Vec<&str> = requirements
        .iter()
        .chain(passages)
        .map(String::as_str)
        .collect();
    let matrix = vectorizer.fit_transform(&texts)?;
    let (req_rows, passage_rows) = matrix.split_at(requirements.len());
    Ok(mean_similarity(&cosine_matrix(req_rows, passage_rows)))
}

fn plan_jobs<'c>(selection: &FrameworkSelection, corpus: &'c RequirementCorpus) -> Vec<TopicJob<'c>> {
    let mut jobs = Vec::new();
    for name in selection.names() {
        let Some(framework) = corpus.framework(name) else {
            debug!(framework = %name, "framework not in corpus, skipping");
            continue;
        };
        for topic in &framework.topics {
            jobs.push(TopicJob {
                framework: framework.name.as_str(),
                topic,
            });
        }
    }
    jobs
}

/// Score with default settings, sequentially.
pub fn analyze(
    document: &Document,
    selection: &FrameworkSelection,
    corpus: &RequirementCorpus,
    on_progress: Option<ProgressFn<'_>>,
) -> Result<AnalysisResult, InvalidInput> {
    Analyzer::default().analyze(document, selection, corpus, on_progress)
}

/// Score with default settings on up to `workers` threads.
pub fn analyze_parallel(
    document: &Document,
    selection: &FrameworkSelection,
    corpus: &RequirementCorpus,
    workers: usize,
    on_progress: Option<ProgressFn<'_>>,
) -> Result<AnalysisResult, InvalidInput> {
    Analyzer::default()
        .with_workers(workers)
        .analyze(document, selection, corpus, on_progress)
}

#[cfg(test)]
mod tests {
    use super::*;
    use esg_align_core::{AlignmentLabel, Framework};

    fn corpus() -> RequirementCorpus {
        RequirementCorpus::new(vec![
            Framework {
                name: "TCFD".into(),
                topics: vec![
                    Topic {
                        name: "Governance".into(),
                        requirements: vec![
                            "Describe the board's oversight of climate-related risks".into(),
                        ],
                    },
                    Topic {
                        name: "Metrics".into(),
                        requirements: vec![
                            "Disclose Scope 1 and Scope 2 greenhouse gas emissions".into(),
                            "Describe targets used to manage climate-related risks".into(),
                        ],
                    },
                ],
            },
            Framework {
                name: "MAS".into(),
                topics: vec![Topic {
                    name: "Underwriting".into(),
                    requirements: vec![
                        "Consider environmental risk factors in underwriting decisions".into(),
                    ],
                }],
            },
        ])
        .unwrap()
    }

    fn doc(passages: &[&str]) -> Document {
        Document::new(passages).unwrap()
    }

    #[test]
    fn empty_selection_rejected() {
        let err = analyze(
            &doc(&["anything"]),
            &FrameworkSelection::default(),
            &corpus(),
            None,
        )
        .unwrap_err();
        assert_eq!(err, InvalidInput::EmptySelection);
    }

    #[test]
    fn results_in_selection_then_topic_order() {
        let result = analyze(
            &doc(&["The board reviews climate risks quarterly."]),
            &FrameworkSelection::new(["MAS", "TCFD"]),
            &corpus(),
            None,
        )
        .unwrap();
        let keys: Vec<(&str, &str)> = result
            .scores
            .iter()
            .map(|s| (s.framework.as_str(), s.topic.as_str()))
            .collect();
        assert_eq!(
            keys,
            vec![
                ("MAS", "Underwriting"),
                ("TCFD", "Governance"),
                ("TCFD", "Metrics")
            ]
        );
        assert_eq!(result.framework_means[0].framework, "MAS");
    }

    #[test]
    fn exact_match_scores_one() {
        let result = analyze(
            &doc(&["Describe the board's oversight of climate-related risks"]),
            &FrameworkSelection::new(["TCFD"]),
            &corpus(),
            None,
        )
        .unwrap();
        let gov = &result.scores[0];
        assert_eq!(gov.topic, "Governance");
        assert!((gov.score - 1.0).abs() < 1e-9, "got {}", gov.score);
        assert_eq!(gov.label, AlignmentLabel::Strong);
    }

    #[test]
    fn disjoint_vocabulary_scores_zero() {
        let result = analyze(
            &doc(&["zzyzx qwerty"]),
            &FrameworkSelection::new(["TCFD"]),
            &corpus(),
            None,
        )
        .unwrap();
        for s in &result.scores {
            assert_eq!(s.score, 0.0);
            assert_eq!(s.label, AlignmentLabel::Minimal);
        }
    }

    #[test]
    fn stop_word_only_document_still_scores() {
        let result = analyze(
            &doc(&["the and of", "it is"]),
            &FrameworkSelection::new(["TCFD"]),
            &corpus(),
            None,
        )
        .unwrap();
        assert_eq!(result.scores.len(), 2);
        assert!(result.scores.iter().all(|s| s.score == 0.0));
    }

    #[test]
    fn degenerate_topic_scores_zero() {
        let corpus = RequirementCorpus::new(vec![Framework {
            name: "X".into(),
            topics: vec![Topic {
                name: "Empty".into(),
                requirements: vec!["the of and".into()],
            }],
        }])
        .unwrap();
        let result = analyze(
            &doc(&["it is a"]),
            &FrameworkSelection::new(["X"]),
            &corpus,
            None,
        )
        .unwrap();
        assert_eq!(result.scores[0].score, 0.0);
        assert_eq!(result.framework_mean("X"), Some(0.0));
    }

    #[test]
    fn unknown_framework_is_skipped() {
        let result = analyze(
            &doc(&["climate"]),
            &FrameworkSelection::new(["NOPE", "MAS"]),
            &corpus(),
            None,
        )
        .unwrap();
        assert_eq!(result.scores.len(), 1);
        assert!(result.framework_mean("NOPE").is_none());
    }

    #[test]
    fn only_unknown_frameworks_gives_empty_result() {
        let mut calls = 0;
        let mut cb = |_: f64| calls += 1;
        let result = analyze(
            &doc(&["climate"]),
            &FrameworkSelection::new(["NOPE"]),
            &corpus(),
            Some(&mut cb),
        )
        .unwrap();
        assert!(result.is_empty());
        assert_eq!(calls, 0);
    }

    #[test]
    fn progress_once_per_topic_ending_at_one() {
        let mut seen = Vec::new();
        let mut cb = |f: f64| seen.push(f);
        analyze(
            &doc(&["climate risk", "board oversight"]),
            &FrameworkSelection::new(["TCFD", "MAS"]),
            &corpus(),
            Some(&mut cb),
        )
        .unwrap();
        assert_eq!(seen.len(), 3);
        assert!(seen.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(*seen.last().unwrap(), 1.0);
    }

    #[test]
    fn parallel_matches_sequential() {
        let document = doc(&[
            "The board oversees climate-related risks through its risk committee.",
            "Scope 1 and Scope 2 emissions fell by 12 percent.",
            "Environmental risk factors inform underwriting decisions.",
        ]);
        let selection = FrameworkSelection::new(["TCFD", "MAS"]);
        let sequential = analyze(&document, &selection, &corpus(), None).unwrap();

        let mut seen = Vec::new();
        let mut cb = |f: f64| seen.push(f);
        let parallel =
            analyze_parallel(&document, &selection, &corpus(), 4, Some(&mut cb)).unwrap();

        assert_eq!(sequential, parallel);
        assert_eq!(seen.len(), 3);
        assert!(seen.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(*seen.last().unwrap(), 1.0);
    }

    #[test]
    fn workers_floor_is_one() {
        assert_eq!(Analyzer::new().with_workers(0).workers(), 1);
    }

    #[test]
    fn score_topic_is_full_matrix_mean() {
        let v = TfidfVectorizer::default();
        let reqs = vec!["climate risk".to_string()];
        let passages = vec!["climate risk".to_string(), "zzyzx".to_string()];
        let score = score_topic(&v, &reqs, &passages).unwrap();
        // one exact match, one orthogonal passage
        assert!((score - 0.5).abs() < 1e-12);
    }

    #[test]
    fn chemical_formula_matches_across_texts() {
        let v = TfidfVectorizer::default();
        let reqs = vec!["Report CO₂ reductions".to_string()];
        let passages = vec!["CO₂".to_string()];
        let score = score_topic(&v, &reqs, &passages).unwrap();
        assert!(score > 0.0, "got {score}");
    }
}
