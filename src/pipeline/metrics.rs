//! Step metrics from a job's result file, and rolling-mean smoothing.

use crate::errors::{FinetuneError, FinetuneResult, ValidationError};
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;

/// One row of the per-step metrics CSV. Validation columns are empty on
/// steps where no evaluation ran.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsRow {
    pub step: u64,
    #[serde(default)]
    pub train_loss: Option<f64>,
    #[serde(default, alias = "train_mean_token_accuracy")]
    pub train_accuracy: Option<f64>,
    #[serde(default, alias = "valid_loss")]
    pub validation_loss: Option<f64>,
    #[serde(default, alias = "valid_mean_token_accuracy", alias = "valid_accuracy")]
    pub validation_accuracy: Option<f64>,
}

pub fn parse_metrics_csv<R: Read>(reader: R) -> FinetuneResult<Vec<MetricsRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut rows = Vec::new();
    for row in reader.deserialize() {
        let row: MetricsRow = row?;
        rows.push(row);
    }
    rows.sort_by_key(|row| row.step);
    Ok(rows)
}

pub fn read_metrics_file(path: impl AsRef<Path>) -> FinetuneResult<Vec<MetricsRow>> {
    parse_metrics_csv(std::fs::File::open(path)?)
}

/// Trailing mean over `window` consecutive values.
///
/// Output has the same length as the input. The first `window - 1` entries
/// are `None`, as is any entry whose window contains a missing value.
pub fn rolling_mean(values: &[Option<f64>], window: usize) -> FinetuneResult<Vec<Option<f64>>> {
    if window == 0 {
        return Err(FinetuneError::Validation(ValidationError::InvalidParameter {
            parameter: "window".to_string(),
            reason: "must be at least 1".to_string(),
        }));
    }

    let smoothed = (0..values.len())
        .map(|end| {
            if end + 1 < window {
                return None;
            }
            let slice = &values[end + 1 - window..=end];
            let sum = slice.iter().copied().sum::<Option<f64>>()?;
            Some(sum / window as f64)
        })
        .collect();
    Ok(smoothed)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    TrainLoss,
    TrainAccuracy,
    ValidationLoss,
    ValidationAccuracy,
}

impl Metric {
    pub const ALL: [Metric; 4] = [
        Metric::TrainLoss,
        Metric::TrainAccuracy,
        Metric::ValidationLoss,
        Metric::ValidationAccuracy,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Metric::TrainLoss => "train_loss",
            Metric::TrainAccuracy => "train_accuracy",
            Metric::ValidationLoss => "validation_loss",
            Metric::ValidationAccuracy => "validation_accuracy",
        }
    }

    pub fn value(&self, row: &MetricsRow) -> Option<f64> {
        match self {
            Metric::TrainLoss => row.train_loss,
            Metric::TrainAccuracy => row.train_accuracy,
            Metric::ValidationLoss => row.validation_loss,
            Metric::ValidationAccuracy => row.validation_accuracy,
        }
    }
}

/// A metric's recorded points and their rolling mean.
#[derive(Debug, Clone, PartialEq)]
pub struct SmoothedSeries {
    pub metric: Metric,
    pub steps: Vec<u64>,
    pub raw: Vec<f64>,
    pub smoothed: Vec<Option<f64>>,
}

impl SmoothedSeries {
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Last defined smoothed value.
    pub fn last_smoothed(&self) -> Option<f64> {
        self.smoothed.iter().rev().find_map(|value| *value)
    }
}

/// Smooths one metric over the steps where it was recorded. Steps with no
/// value (e.g. non-evaluation steps for validation metrics) are dropped
/// before the window is applied.
pub fn smooth_metric(
    rows: &[MetricsRow],
    metric: Metric,
    window: usize,
) -> FinetuneResult<SmoothedSeries> {
    let (steps, raw): (Vec<u64>, Vec<f64>) = rows
        .iter()
        .filter_map(|row| metric.value(row).map(|value| (row.step, value)))
        .filter(|(_, value)| value.is_finite())
        .unzip();

    let values: Vec<Option<f64>> = raw.iter().copied().map(Some).collect();
    let smoothed = rolling_mean(&values, window)?;

    Ok(SmoothedSeries {
        metric,
        steps,
        raw,
        smoothed,
    })
}

pub fn smooth_metrics(rows: &[MetricsRow], window: usize) -> FinetuneResult<Vec<SmoothedSeries>> {
    Metric::ALL
        .iter()
        .map(|metric| smooth_metric(rows, *metric, window))
        .collect()
}
