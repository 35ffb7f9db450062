//! Local glue around the remote services: dataset conversion, job
//! submission and polling, metrics smoothing and plotting, evaluation.

pub mod dataset;
pub mod evaluation;
pub mod jobs;
pub mod metrics;
pub mod plot;

pub use dataset::{
    encode_image, read_jsonl, read_source_rows, split_rows, write_jsonl, write_jsonl_file,
    ConversionReport, DatasetConverter, DatasetSplit, ImageMode, SkippedRow, SourceRow, SourceTable,
    TrainingRecord,
};
pub use evaluation::{
    cases_from_records, AccuracyTally, CaseSet, EvalCase, EvalResult, EvaluationHarness,
    EvaluationReport, JudgeVerdict,
};
pub use jobs::{fetch_result_metrics, submit_job, JobPoller, JobSubmission};
pub use metrics::{
    parse_metrics_csv, read_metrics_file, rolling_mean, smooth_metric, smooth_metrics, Metric,
    MetricsRow, SmoothedSeries,
};
pub use plot::{render_accuracy_chart, render_loss_chart, render_svg, ChartSpec, PlotSeries};
