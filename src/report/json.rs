use crate::types::model::Dimension;
use crate::types::scoring::ScoreReport;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Serialize)]
struct JsonReport<'a> {
    platform: &'a str,
    stars: f64,
    overall_percent: i32,
    total_metrics: usize,
    active_threats: usize,
    inactive_threats: usize,
    dimensions: BTreeMap<Dimension, JsonDimension>,
    compliance: BTreeMap<&'a str, JsonCompliance>,
    metrics: Vec<JsonMetric<'a>>,
}

#[derive(Serialize)]
struct JsonDimension {
    score_percent: i32,
    current_severity: i64,
    max_severity: i64,
}

#[derive(Serialize)]
struct JsonCompliance {
    percentage: f64,
    compliant: u32,
    total: u32,
}

#[derive(Serialize)]
struct JsonMetric<'a> {
    name: &'a str,
    dimension: Dimension,
    severity: i32,
    active: bool,
    tags: &'a [String],
}

pub fn to_json(report: &ScoreReport) -> Result<String, serde_json::Error> {
    let dimensions = report
        .dimensions
        .iter()
        .map(|(dimension, score)| {
            (
                *dimension,
                JsonDimension {
                    score_percent: score.score,
                    current_severity: score.current_severity,
                    max_severity: score.max_severity,
                },
            )
        })
        .collect();

    let compliance = report
        .compliance
        .iter()
        .map(|(group, entry)| {
            (
                group.as_str(),
                JsonCompliance {
                    percentage: round2(entry.percentage),
                    compliant: entry.compliant,
                    total: entry.total,
                },
            )
        })
        .collect();

    let metrics = report
        .metrics_by_severity()
        .into_iter()
        .map(|metric| JsonMetric {
            name: &metric.name,
            dimension: metric.dimension,
            severity: metric.severity,
            active: metric.active,
            tags: &metric.tags,
        })
        .collect();

    serde_json::to_string_pretty(&JsonReport {
        platform: &report.platform,
        stars: round2(report.stars),
        overall_percent: report.overall,
        total_metrics: report.total_metrics,
        active_threats: report.active_threats,
        inactive_threats: report.inactive_threats,
        dimensions,
        compliance,
        metrics,
    })
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
