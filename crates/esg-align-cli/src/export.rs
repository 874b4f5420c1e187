//! Result export: pretty JSON reports and Parquet score tables.

use std::fs::File;
use std::path::Path;

use anyhow::Context;
use chrono::{DateTime, Utc};
use esg_align_core::{AnalysisResult, FrameworkMean, results};
use parquet::arrow::ArrowWriter;
use serde::Serialize;

/// A finished run with the metadata needed to interpret it later.
#[derive(Debug, Serialize)]
pub struct Report<'a> {
    pub generated_at: DateTime<Utc>,
    pub source: &'a str,
    pub passages: usize,
    pub selected_frameworks: &'a [String],
    pub overall_mean: Option<f64>,
    pub best_framework: Option<&'a FrameworkMean>,
    #[serde(flatten)]
    pub result: &'a AnalysisResult,
}

impl<'a> Report<'a> {
    pub fn new(
        source: &'a str,
        passages: usize,
        selected_frameworks: &'a [String],
        result: &'a AnalysisResult,
    ) -> Self {
        Self {
            generated_at: Utc::now(),
            source,
            passages,
            selected_frameworks,
            overall_mean: result.overall_mean(),
            best_framework: result.best_framework(),
            result,
        }
    }
}

/// Write to `path`, choosing the format from its extension.
pub fn write_report(path: &Path, report: &Report<'_>) -> anyhow::Result<()> {
    let is_parquet = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("parquet"));

    if is_parquet {
        write_parquet(path, report.result)
    } else {
        write_json(path, report)
    }
}

pub fn write_json(path: &Path, report: &Report<'_>) -> anyhow::Result<()> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    serde_json::to_writer_pretty(file, report).context("writing JSON report")?;
    Ok(())
}

/// One row per topic score (`framework`, `topic`, `score`, `label`).
pub fn write_parquet(path: &Path, result: &AnalysisResult) -> anyhow::Result<()> {
    let batch = results::topic_scores_batch(result).context("building score batch")?;
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut writer =
        ArrowWriter::try_new(file, batch.schema(), None).context("opening Parquet writer")?;
    writer.write(&batch).context("writing Parquet batch")?;
    writer.close().context("finalising Parquet file")?;
    Ok(())
}
