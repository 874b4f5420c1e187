//! Terminal rendering of analysis results and corpus listings.

use arrow::util::pretty::pretty_format_batches;
use esg_align_core::{AnalysisResult, RequirementCorpus, results};

const BAR_WIDTH: usize = 20;

// ── Display banding ──

/// Coarse four-level banding used only for on-screen emphasis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreBand {
    High,
    Medium,
    Low,
    VeryLow,
}

impl ScoreBand {
    pub fn from_score(score: f64) -> Self {
        if score >= 0.4 {
            Self::High
        } else if score >= 0.3 {
            Self::Medium
        } else if score >= 0.2 {
            Self::Low
        } else {
            Self::VeryLow
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
            Self::VeryLow => "very low",
        }
    }
}

// ── Public API ──

/// One-paragraph summary: passages analysed, overall mean, best framework.
pub fn summary_line(result: &AnalysisResult, passages: usize) -> String {
    let mut line = format!("Analyzed {passages} passages.");
    if let Some(avg) = result.overall_mean() {
        line.push_str(&format!(" Average similarity: {:.1}%.", avg * 100.0));
    }
    if let Some(best) = result.best_framework() {
        line.push_str(&format!(
            " Best alignment with {} ({:.1}%).",
            best.framework,
            best.mean * 100.0
        ));
    }
    line
}

/// Print the summary, a per-framework breakdown, and the result tables.
pub fn print_results(result: &AnalysisResult, passages: usize) -> anyhow::Result<()> {
    if result.is_empty() {
        println!("No topics scored: none of the selected frameworks are in the corpus.");
        return Ok(());
    }

    println!("{}", summary_line(result, passages));
    println!();

    for fm in &result.framework_means {
        println!("=== {} === avg {:.1}%", fm.framework, fm.mean * 100.0);
        for s in result.scores_for(&fm.framework) {
            println!(
                "  {:<24} {:>6.1}%  {}  [{}]",
                s.topic,
                s.score * 100.0,
                bar(s.score),
                ScoreBand::from_score(s.score).as_str()
            );
            println!("    {}: {}", s.label, s.label.explanation());
        }
        println!();
    }

    println!("{}", render_tables(result)?);
    Ok(())
}

/// Framework means table followed by the per-topic score table.
pub fn render_tables(result: &AnalysisResult) -> anyhow::Result<String> {
    let means = results::framework_means_batch(result)?;
    let scores = results::topic_scores_batch(result)?;
    Ok(format!(
        "{}\n{}",
        pretty_format_batches(&[means])?,
        pretty_format_batches(&[scores])?
    ))
}

/// List frameworks with their topics and requirement counts.
pub fn print_frameworks(corpus: &RequirementCorpus) {
    for fw in corpus.frameworks() {
        println!(
            "{:<8} {} topics, {} requirements",
            fw.name,
            fw.topics.len(),
            fw.requirement_count()
        );
        for topic in &fw.topics {
            println!("  {:<24} {}", topic.name, topic.requirements.len());
        }
    }
}

// ── Helpers ──

fn bar(score: f64) -> String {
    let filled = ((score.clamp(0.0, 1.0) * BAR_WIDTH as f64).round() as usize).min(BAR_WIDTH);
    format!("{}{}", "#".repeat(filled), ".".repeat(BAR_WIDTH - filled))
}

#[cfg(test)]
mod tests {
    use super::*;
    use esg_align_core::TopicScore;

    #[test]
    fn band_thresholds() {
        assert_eq!(ScoreBand::from_score(0.4), ScoreBand::High);
        assert_eq!(ScoreBand::from_score(0.39), ScoreBand::Medium);
        assert_eq!(ScoreBand::from_score(0.3), ScoreBand::Medium);
        assert_eq!(ScoreBand::from_score(0.2), ScoreBand::Low);
        assert_eq!(ScoreBand::from_score(0.19), ScoreBand::VeryLow);
    }

    #[test]
    fn bar_fills_proportionally() {
        assert_eq!(bar(0.0), ".".repeat(BAR_WIDTH));
        assert_eq!(bar(1.0), "#".repeat(BAR_WIDTH));
        assert_eq!(bar(0.5).matches('#').count(), BAR_WIDTH / 2);
    }

    #[test]
    fn summary_names_best_framework() {
        let result = AnalysisResult::from_scores(vec![
            TopicScore::new("TCFD", "Governance", 0.3),
            TopicScore::new("TNFD", "Governance", 0.1),
        ]);
        let line = summary_line(&result, 12);
        assert_eq!(
            line,
            "Analyzed 12 passages. Average similarity: 20.0%. Best alignment with TCFD (30.0%)."
        );
    }

    #[test]
    fn tables_show_framework_means_before_topics() {
        let result = AnalysisResult::from_scores(vec![
            TopicScore::new("TCFD", "Governance", 0.6),
            TopicScore::new("TCFD", "Strategy", 0.2),
            TopicScore::new("TNFD", "Governance", 0.1),
        ]);
        let tables = render_tables(&result).unwrap();
        let means_at = tables.find("mean_score").unwrap();
        let topics_at = tables.find("| topic").unwrap();
        assert!(means_at < topics_at);
        // only the TCFD mean of 0.4 labels as Good
        assert!(tables.contains("Good alignment"));
        assert!(tables.contains("Strategy"));
    }
}
