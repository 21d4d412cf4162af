use crate::error::ScoreError;
use serde::Deserialize;

pub const DEFAULT_URL_TEMPLATE: &str =
    "https://raw.githubusercontent.com/edamametechnologies/threatmodels/{branch}/threatmodel-{platform}.json";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScoreConfig {
    pub source: Option<SourceConfig>,
    pub cache: Option<CacheConfig>,
    pub output: Option<OutputConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    pub branch: Option<String>,
    pub url_template: Option<String>,
    pub timeout_secs: Option<u64>,
    pub retries: Option<u32>,
    pub backoff_ms: Option<u64>,
    pub user_agent: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    pub ttl_secs: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormatConfig {
    Text,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    pub format: Option<OutputFormatConfig>,
}

/// Fully resolved acquisition settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSettings {
    pub branch: String,
    pub url_template: String,
    pub timeout_secs: u64,
    pub retries: u32,
    pub backoff_ms: u64,
    pub user_agent: String,
}

impl Default for SourceSettings {
    fn default() -> Self {
        Self {
            branch: "main".to_string(),
            url_template: DEFAULT_URL_TEMPLATE.to_string(),
            timeout_secs: 30,
            retries: 2,
            backoff_ms: 500,
            user_agent: format!("threatscore/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ScoreConfig {
    pub const DEFAULT_CACHE_TTL_SECS: u64 = 3600;

    pub fn source_settings(&self) -> SourceSettings {
        let defaults = SourceSettings::default();
        match &self.source {
            Some(source) => SourceSettings {
                branch: source.branch.clone().unwrap_or(defaults.branch),
                url_template: source.url_template.clone().unwrap_or(defaults.url_template),
                timeout_secs: source.timeout_secs.unwrap_or(defaults.timeout_secs),
                retries: source.retries.unwrap_or(defaults.retries),
                backoff_ms: source.backoff_ms.unwrap_or(defaults.backoff_ms),
                user_agent: source.user_agent.clone().unwrap_or(defaults.user_agent),
            },
            None => defaults,
        }
    }

    pub fn cache_ttl_secs(&self) -> u64 {
        self.cache
            .as_ref()
            .and_then(|cache| cache.ttl_secs)
            .unwrap_or(Self::DEFAULT_CACHE_TTL_SECS)
    }

    pub fn output_format(&self) -> Option<OutputFormatConfig> {
        self.output.as_ref().and_then(|output| output.format)
    }

    pub fn validate(&self) -> Result<(), ScoreError> {
        let Some(source) = &self.source else {
            return Ok(());
        };

        if let Some(branch) = &source.branch {
            if branch.trim().is_empty() {
                return Err(ScoreError::ConfigParse(
                    "source.branch must not be empty".to_string(),
                ));
            }
        }
        if let Some(template) = &source.url_template {
            let missing = ["{platform}", "{branch}"]
                .into_iter()
                .filter(|placeholder| !template.contains(placeholder))
                .collect::<Vec<_>>();
            if !missing.is_empty() {
                return Err(ScoreError::ConfigParse(format!(
                    "source.url_template is missing placeholder(s): {}",
                    missing.join(", ")
                )));
            }
        }
        if source.timeout_secs == Some(0) {
            return Err(ScoreError::ConfigParse(
                "source.timeout_secs must be greater than 0".to_string(),
            ));
        }
        if let Some(retries) = source.retries {
            if retries > 10 {
                return Err(ScoreError::ConfigParse(format!(
                    "source.retries must be at most 10 (found {retries})"
                )));
            }
        }

        Ok(())
    }
}
