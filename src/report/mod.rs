pub mod json;
pub mod text;

use crate::error::ScoreError;
use crate::types::scoring::ScoreReport;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

pub fn render(report: &ScoreReport, format: OutputFormat) -> Result<String, ScoreError> {
    match format {
        OutputFormat::Text => Ok(text::to_text(report)),
        OutputFormat::Json => json::to_json(report).map_err(ScoreError::Json),
    }
}
