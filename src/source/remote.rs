use crate::error::{Result, ScoreError};
use crate::types::config::SourceSettings;
use crate::types::model::Platform;
use serde_json::Value;
use std::thread;
use std::time::Duration;

/// Fetches threat model documents over HTTP.
pub struct RemoteSource {
    settings: SourceSettings,
    agent: ureq::Agent,
}

enum Attempt {
    Done(Value),
    Retryable(ScoreError),
}

impl RemoteSource {
    pub fn new(settings: SourceSettings) -> Self {
        let agent = ureq::config::Config::builder()
            .http_status_as_error(false)
            .timeout_global(Some(Duration::from_secs(settings.timeout_secs)))
            .build()
            .new_agent();
        Self { settings, agent }
    }

    pub fn url_for(&self, platform: Platform, branch: &str) -> String {
        model_url(&self.settings.url_template, platform, branch)
    }

    /// GET with bounded retries. Connection failures and 5xx are retried with
    /// exponential backoff; 4xx fails immediately.
    pub fn fetch(&self, platform: Platform, branch: &str) -> Result<Value> {
        let url = self.url_for(platform, branch);
        let mut delay = Duration::from_millis(self.settings.backoff_ms);
        let mut attempt = 0;
        loop {
            tracing::info!(%url, attempt, "fetching threat model");
            match self.try_fetch(&url, platform, branch)? {
                Attempt::Done(document) => return Ok(document),
                Attempt::Retryable(err) if attempt < self.settings.retries => {
                    tracing::warn!(error = %err, ?delay, "threat model fetch failed, retrying");
                    thread::sleep(delay);
                    delay *= 2;
                    attempt += 1;
                }
                Attempt::Retryable(err) => return Err(err),
            }
        }
    }

    fn try_fetch(&self, url: &str, platform: Platform, branch: &str) -> Result<Attempt> {
        let response = match self
            .agent
            .get(url)
            .header("User-Agent", &self.settings.user_agent)
            .call()
        {
            Ok(response) => response,
            Err(e) => return Ok(Attempt::Retryable(ScoreError::Connection(e.to_string()))),
        };

        let status = response.status().as_u16();
        if status >= 400 {
            let err = ScoreError::Fetch {
                platform: platform.to_string(),
                branch: branch.to_string(),
                status,
            };
            return if status >= 500 {
                Ok(Attempt::Retryable(err))
            } else {
                Err(err)
            };
        }

        let body = response
            .into_body()
            .read_to_string()
            .map_err(|e| ScoreError::Connection(e.to_string()))?;
        Ok(Attempt::Done(serde_json::from_str(&body)?))
    }
}

pub fn model_url(template: &str, platform: Platform, branch: &str) -> String {
    template
        .replace("{branch}", branch)
        .replace("{platform}", platform.as_str())
}
