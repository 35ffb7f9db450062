//! Line charts of smoothed metrics, rendered to SVG with `plotters`.

use crate::errors::{DataError, FinetuneError, FinetuneResult};
use crate::pipeline::metrics::{Metric, SmoothedSeries};
use plotters::drawing::DrawingAreaErrorKind;
use plotters::prelude::*;
use std::ops::Range;

const PALETTE: [RGBColor; 4] = [
    RGBColor(31, 119, 180),
    RGBColor(255, 127, 14),
    RGBColor(44, 160, 44),
    RGBColor(214, 39, 40),
];

#[derive(Debug, Clone)]
pub struct ChartSpec {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub width: u32,
    pub height: u32,
}

impl ChartSpec {
    pub fn new(title: impl Into<String>, y_label: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            x_label: "step".to_string(),
            y_label: y_label.into(),
            width: 800,
            height: 480,
        }
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }
}

/// A named line. Points with an undefined y are gaps in the line.
#[derive(Debug, Clone)]
pub struct PlotSeries {
    pub label: String,
    pub points: Vec<(f64, Option<f64>)>,
}

impl PlotSeries {
    pub fn smoothed(series: &SmoothedSeries) -> Self {
        Self {
            label: series.metric.name().to_string(),
            points: series
                .steps
                .iter()
                .zip(&series.smoothed)
                .map(|(step, value)| (*step as f64, *value))
                .collect(),
        }
    }

    fn defined(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.points
            .iter()
            .filter_map(|(x, y)| y.map(|y| (*x, y)))
    }
}

fn chart_error<E>(error: DrawingAreaErrorKind<E>) -> FinetuneError
where
    E: std::error::Error + Send + Sync,
{
    FinetuneError::Data(DataError::Chart(error.to_string()))
}

/// Axis ranges covering every defined point. Empty or flat data gets a unit
/// span so the coordinate mapping stays finite.
fn ranges(series: &[PlotSeries]) -> (Range<f64>, Range<f64>) {
    let mut x = (f64::INFINITY, f64::NEG_INFINITY);
    let mut y = (f64::INFINITY, f64::NEG_INFINITY);
    for (px, py) in series.iter().flat_map(PlotSeries::defined) {
        x = (x.0.min(px), x.1.max(px));
        y = (y.0.min(py), y.1.max(py));
    }

    if !x.0.is_finite() {
        return (0.0..1.0, 0.0..1.0);
    }
    if x.1 - x.0 < f64::EPSILON {
        x.1 = x.0 + 1.0;
    }
    if y.1 - y.0 < f64::EPSILON {
        y = (y.0 - 0.5, y.1 + 0.5);
    }
    (x.0..x.1, y.0..y.1)
}

fn draw(svg: &mut String, spec: &ChartSpec, series: &[PlotSeries]) -> FinetuneResult<()> {
    let root = SVGBackend::with_string(svg, (spec.width, spec.height)).into_drawing_area();
    root.fill(&WHITE).map_err(chart_error)?;

    let (x_range, y_range) = ranges(series);
    let mut chart = ChartBuilder::on(&root)
        .caption(&spec.title, ("sans-serif", 20))
        .margin(16)
        .x_label_area_size(40)
        .y_label_area_size(56)
        .build_cartesian_2d(x_range, y_range)
        .map_err(chart_error)?;

    chart
        .configure_mesh()
        .x_desc(spec.x_label.as_str())
        .y_desc(spec.y_label.as_str())
        .draw()
        .map_err(chart_error)?;

    let mut labeled = false;
    for (index, line) in series.iter().enumerate() {
        let color = PALETTE[index % PALETTE.len()];
        for (run, segment) in segments(line).into_iter().enumerate() {
            let drawn = chart
                .draw_series(LineSeries::new(segment, color.stroke_width(2)))
                .map_err(chart_error)?;
            // One legend entry per series, whatever the number of gaps.
            if run == 0 {
                drawn.label(line.label.as_str()).legend(move |(x, y)| {
                    PathElement::new(vec![(x, y), (x + 16, y)], color.stroke_width(2))
                });
                labeled = true;
            }
        }
    }

    if labeled {
        chart
            .configure_series_labels()
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()
            .map_err(chart_error)?;
    }

    root.present().map_err(chart_error)
}

/// Renders `series` into an SVG document. Each run of defined points is
/// drawn as its own line.
pub fn render_svg(spec: &ChartSpec, series: &[PlotSeries]) -> FinetuneResult<String> {
    let mut svg = String::new();
    draw(&mut svg, spec, series)?;
    Ok(svg)
}

fn segments(series: &PlotSeries) -> Vec<Vec<(f64, f64)>> {
    let mut segments = Vec::new();
    let mut current = Vec::new();
    for (x, y) in &series.points {
        match y {
            Some(y) => current.push((*x, *y)),
            None if !current.is_empty() => segments.push(std::mem::take(&mut current)),
            None => {}
        }
    }
    if !current.is_empty() {
        segments.push(current);
    }
    segments
}

fn chart_for(
    spec: ChartSpec,
    series: &[SmoothedSeries],
    metrics: [Metric; 2],
) -> FinetuneResult<String> {
    let lines: Vec<PlotSeries> = series
        .iter()
        .filter(|s| metrics.contains(&s.metric) && !s.is_empty())
        .map(PlotSeries::smoothed)
        .collect();
    render_svg(&spec, &lines)
}

pub fn render_loss_chart(series: &[SmoothedSeries]) -> FinetuneResult<String> {
    chart_for(
        ChartSpec::new("Loss", "loss"),
        series,
        [Metric::TrainLoss, Metric::ValidationLoss],
    )
}

pub fn render_accuracy_chart(series: &[SmoothedSeries]) -> FinetuneResult<String> {
    chart_for(
        ChartSpec::new("Token accuracy", "accuracy"),
        series,
        [Metric::TrainAccuracy, Metric::ValidationAccuracy],
    )
}
