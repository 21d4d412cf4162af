use crate::types::model::Dimension;
use std::collections::{BTreeMap, HashSet};

/// Per-dimension score when the dimension has no metrics.
pub const NOT_APPLICABLE: i32 = -1;

/// Which checks the caller considers remediated for one scoring call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Remediation {
    /// Worst case: every metric is exposed.
    AllActive,
    /// Best case: every metric is remediated.
    AllInactive,
    Names(HashSet<String>),
}

impl Remediation {
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Remediation::Names(names.into_iter().map(Into::into).collect())
    }

    pub fn is_inactive(&self, name: &str) -> bool {
        match self {
            Remediation::AllActive => false,
            Remediation::AllInactive => true,
            Remediation::Names(names) => names.contains(name),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DimensionScore {
    pub dimension: Dimension,
    pub current_severity: i64,
    pub max_severity: i64,
    /// Truncated percentage, or [`NOT_APPLICABLE`] when `max_severity <= 0`.
    pub score: i32,
}

impl DimensionScore {
    pub fn has_metrics(&self) -> bool {
        self.score != NOT_APPLICABLE
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ComplianceEntry {
    pub compliant: u32,
    pub total: u32,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricStatus {
    pub name: String,
    pub dimension: Dimension,
    pub severity: i32,
    /// `true` when the threat is still exposed.
    pub active: bool,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoreReport {
    pub platform: String,
    pub dimensions: BTreeMap<Dimension, DimensionScore>,
    pub overall: i32,
    pub stars: f64,
    pub compliance: BTreeMap<String, ComplianceEntry>,
    pub metrics: Vec<MetricStatus>,
    pub total_metrics: usize,
    pub active_threats: usize,
    pub inactive_threats: usize,
}

impl ScoreReport {
    pub fn dimension(&self, dimension: Dimension) -> &DimensionScore {
        &self.dimensions[&dimension]
    }

    /// Metrics ordered for display: severity descending, then name.
    pub fn metrics_by_severity(&self) -> Vec<&MetricStatus> {
        let mut sorted = self.metrics.iter().collect::<Vec<_>>();
        sorted.sort_by(|a, b| b.severity.cmp(&a.severity).then_with(|| a.name.cmp(&b.name)));
        sorted
    }
}
