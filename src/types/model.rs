use serde::{Serialize, Serializer};
use std::fmt;

/// Security category a metric is scored under.
///
/// Declaration order is the reporting order, so `Ord` follows it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Dimension {
    Network,
    SystemServices,
    SystemIntegrity,
    Credentials,
    Applications,
}

impl Dimension {
    pub const ALL: [Dimension; 5] = [
        Dimension::Network,
        Dimension::SystemServices,
        Dimension::SystemIntegrity,
        Dimension::Credentials,
        Dimension::Applications,
    ];

    /// Label as written in threat model documents.
    pub fn label(self) -> &'static str {
        match self {
            Dimension::Network => "network",
            Dimension::SystemServices => "system services",
            Dimension::SystemIntegrity => "system integrity",
            Dimension::Credentials => "credentials",
            Dimension::Applications => "applications",
        }
    }

    /// Accepts the document spelling (`system services`) and the snake_case
    /// spelling (`system_services`), ignoring case and surrounding whitespace.
    pub fn from_label(label: &str) -> Option<Dimension> {
        let normalized = label.trim().to_ascii_lowercase().replace('_', " ");
        Dimension::ALL
            .into_iter()
            .find(|dimension| dimension.label() == normalized)
    }
}

// Serialized with the document label so JSON output reads like the model.
impl Serialize for Dimension {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    MacOs,
    Windows,
    Linux,
    Ios,
    Android,
}

impl Platform {
    pub fn as_str(self) -> &'static str {
        match self {
            Platform::MacOs => "macOS",
            Platform::Windows => "Windows",
            Platform::Linux => "Linux",
            Platform::Ios => "iOS",
            Platform::Android => "Android",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One named security check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Metric {
    pub name: String,
    pub dimension: Dimension,
    pub severity: i32,
    pub tags: Vec<String>,
}

/// Ordered, immutable set of metrics for one platform. Names are unique.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreatCatalog {
    platform: String,
    metrics: Vec<Metric>,
}

impl ThreatCatalog {
    /// Callers are expected to have checked name uniqueness; the loader does.
    pub fn new(platform: impl Into<String>, metrics: Vec<Metric>) -> Self {
        Self {
            platform: platform.into(),
            metrics,
        }
    }

    pub fn platform(&self) -> &str {
        &self.platform
    }

    pub fn metrics(&self) -> &[Metric] {
        &self.metrics
    }

    pub fn len(&self) -> usize {
        self.metrics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.metrics.iter().any(|metric| metric.name == name)
    }
}
