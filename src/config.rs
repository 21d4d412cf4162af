use crate::error::{Result, ScoreError};
use crate::types::config::ScoreConfig;
use std::path::{Path, PathBuf};
use toml::map::Map;
use toml::Value;

pub const DEFAULT_CONFIG_FILE: &str = "threatscore.toml";
pub const DEFAULT_GLOBAL_CONFIG_FILE: &str = ".config/threatscore/config.toml";

/// Loads `~/.config/threatscore/config.toml` overlaid by `threatscore.toml`
/// in `root`. Returns `None` when neither file exists.
pub fn load_config(root: &Path) -> Result<Option<ScoreConfig>> {
    let global = std::env::var_os("HOME")
        .map(PathBuf::from)
        .map(|home| home.join(DEFAULT_GLOBAL_CONFIG_FILE));
    load_config_with_global(root, global.as_deref())
}

pub(crate) fn load_config_with_global(
    root: &Path,
    global_path: Option<&Path>,
) -> Result<Option<ScoreConfig>> {
    let layers = global_path
        .into_iter()
        .map(Path::to_path_buf)
        .chain(std::iter::once(root.join(DEFAULT_CONFIG_FILE)))
        .filter(|path| path.exists())
        .collect::<Vec<_>>();
    if layers.is_empty() {
        return Ok(None);
    }

    let mut merged = Value::Table(Map::new());
    for path in &layers {
        tracing::debug!(path = %path.display(), "merging config layer");
        merge_toml(&mut merged, read_toml_value(path)?);
    }

    let cfg: ScoreConfig = merged
        .try_into()
        .map_err(|e: toml::de::Error| ScoreError::ConfigParse(e.to_string()))?;
    cfg.validate()?;
    Ok(Some(cfg))
}

fn read_toml_value(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path)?;
    toml::from_str(&content)
        .map_err(|e| ScoreError::ConfigParse(format!("{}: {}", path.display(), e)))
}

fn merge_toml(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Table(base_table), Value::Table(overlay_table)) => {
            for (key, value) in overlay_table {
                match base_table.get_mut(&key) {
                    Some(existing) => merge_toml(existing, value),
                    None => {
                        base_table.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => {
            *slot = value;
        }
    }
}
