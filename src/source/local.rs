use crate::error::{Result, ScoreError};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashSet;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

pub fn read_model_file(path: &Path) -> Result<Value> {
    let content = fs::read_to_string(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => ScoreError::ModelNotFound(path.display().to_string()),
        _ => ScoreError::Io(e),
    })?;
    Ok(serde_json::from_str(&content)?)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ChecksFile {
    List(Vec<String>),
    Object { inactive: Vec<String> },
}

/// Reads remediated check names from either `["a", "b"]` or
/// `{"inactive": ["a", "b"]}`.
pub fn load_checks_file(path: &Path) -> Result<HashSet<String>> {
    let content = fs::read_to_string(path)?;
    let value: Value = serde_json::from_str(&content)?;
    let checks = ChecksFile::deserialize(&value).map_err(|_| {
        ScoreError::InvalidChecksFile(format!(
            "{}: expected a JSON list or an object with an 'inactive' key",
            path.display()
        ))
    })?;
    let names = match checks {
        ChecksFile::List(names) => names,
        ChecksFile::Object { inactive } => inactive,
    };
    Ok(names.into_iter().collect())
}
