//! Normalizes a decoded threat model document into a [`ThreatCatalog`].
//!
//! Acquisition (HTTP, file system) happens elsewhere; this module only sees
//! `serde_json::Value`s.

use crate::error::{Result, ScoreError};
use crate::types::model::{Dimension, Metric, ThreatCatalog};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::collections::HashSet;

const UNKNOWN_PLATFORM: &str = "unknown";

#[derive(Debug, Deserialize)]
struct RawMetric {
    name: String,
    dimension: String,
    #[serde(deserialize_with = "integral_severity")]
    severity: i32,
    #[serde(default)]
    tags: Option<Vec<String>>,
}

/// Accepts integers and integral floats such as `3.0`.
fn integral_severity<'de, D>(deserializer: D) -> std::result::Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = f64::deserialize(deserializer)?;
    if value.fract() != 0.0 || value < f64::from(i32::MIN) || value > f64::from(i32::MAX) {
        return Err(D::Error::custom(format!("severity must be an integer, found {value}")));
    }
    Ok(value as i32)
}

/// Builds a catalog from a threat model document.
///
/// Severities are taken as-is; values outside 1-5 are the document's concern.
pub fn load_catalog(document: &Value) -> Result<ThreatCatalog> {
    let root = document.as_object().ok_or_else(|| {
        ScoreError::MalformedModel("document root must be a JSON object".to_string())
    })?;

    let platform = root
        .get("name")
        .and_then(Value::as_str)
        .unwrap_or(UNKNOWN_PLATFORM);

    let entries = match root.get("metrics") {
        None | Some(Value::Null) => &[][..],
        Some(Value::Array(entries)) => entries.as_slice(),
        Some(_) => {
            return Err(ScoreError::MalformedModel(
                "`metrics` must be an array".to_string(),
            ))
        }
    };

    let mut seen = HashSet::with_capacity(entries.len());
    let mut metrics = Vec::with_capacity(entries.len());
    for (index, entry) in entries.iter().enumerate() {
        let metric = parse_metric(index, entry)?;
        if !seen.insert(metric.name.clone()) {
            return Err(ScoreError::MalformedModel(format!(
                "duplicate metric name: {}",
                metric.name
            )));
        }
        metrics.push(metric);
    }

    tracing::debug!(platform, metrics = metrics.len(), "threat model loaded");
    Ok(ThreatCatalog::new(platform, metrics))
}

fn parse_metric(index: usize, entry: &Value) -> Result<Metric> {
    let raw = RawMetric::deserialize(entry)
        .map_err(|e| ScoreError::MalformedModel(format!("metric #{index}: {e}")))?;

    let dimension = Dimension::from_label(&raw.dimension).ok_or_else(|| {
        ScoreError::MalformedModel(format!(
            "metric '{}': unrecognized dimension '{}'",
            raw.name, raw.dimension
        ))
    })?;

    Ok(Metric {
        name: raw.name,
        dimension,
        severity: raw.severity,
        tags: raw.tags.unwrap_or_default(),
    })
}
