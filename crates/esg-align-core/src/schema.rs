/// Arrow schema definitions and conversions for analysis results.
pub mod results {
    use std::sync::Arc;

    use arrow::array::{Float64Array, StringArray};
    use arrow::datatypes::{DataType, Field, Schema};
    use arrow::error::ArrowError;
    use arrow::record_batch::RecordBatch;

    use crate::score::AnalysisResult;

    /// Schema for per-topic alignment scores.
    pub fn topic_score_schema() -> Schema {
        Schema::new(vec![
            Field::new("framework", DataType::Utf8, false),
            Field::new("topic", DataType::Utf8, false),
            Field::new("score", DataType::Float64, false),
            Field::new("label", DataType::Utf8, false),
        ])
    }

    /// Schema for per-framework mean scores.
    pub fn framework_mean_schema() -> Schema {
        Schema::new(vec![
            Field::new("framework", DataType::Utf8, false),
            Field::new("mean_score", DataType::Float64, false),
            Field::new("label", DataType::Utf8, false),
        ])
    }

    /// One row per topic score, in result order.
    pub fn topic_scores_batch(result: &AnalysisResult) -> Result<RecordBatch, ArrowError> {
        let framework: StringArray = result.scores.iter().map(|s| Some(s.framework.as_str())).collect();
        let topic: StringArray = result.scores.iter().map(|s| Some(s.topic.as_str())).collect();
        let score = Float64Array::from_iter_values(result.scores.iter().map(|s| s.score));
        let label: StringArray = result.scores.iter().map(|s| Some(s.label.as_str())).collect();

        RecordBatch::try_new(
            Arc::new(topic_score_schema()),
            vec![
                Arc::new(framework),
                Arc::new(topic),
                Arc::new(score),
                Arc::new(label),
            ],
        )
    }

    /// One row per framework mean, in result order.
    pub fn framework_means_batch(result: &AnalysisResult) -> Result<RecordBatch, ArrowError> {
        let framework: StringArray = result
            .framework_means
            .iter()
            .map(|m| Some(m.framework.as_str()))
            .collect();
        let mean = Float64Array::from_iter_values(result.framework_means.iter().map(|m| m.mean));
        let label: StringArray = result
            .framework_means
            .iter()
            .map(|m| Some(crate::AlignmentLabel::from_score(m.mean).as_str()))
            .collect();

        RecordBatch::try_new(
            Arc::new(framework_mean_schema()),
            vec![Arc::new(framework), Arc::new(mean), Arc::new(label)],
        )
    }
}
