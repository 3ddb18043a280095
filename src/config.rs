use crate::error::{Result, ScorecardError};
use crate::types::config::ScorecardConfig;
use std::path::{Path, PathBuf};
use toml::map::Map;
use toml::Value;

pub const DEFAULT_CONFIG_FILE: &str = "scorecard.toml";
pub const DEFAULT_LOCAL_FILE: &str = ".scorecard/local.toml";
pub const DEFAULT_GLOBAL_CONFIG_FILE: &str = ".config/scorecard/config.toml";

/// Loads layered configuration for a workbook directory.
///
/// Returns `None` when no layer exists at all; callers fall back to
/// defaults. An explicit path must exist.
pub fn load_config(root: &Path, explicit: Option<&Path>) -> Result<Option<ScorecardConfig>> {
    let global = std::env::var_os("HOME")
        .map(PathBuf::from)
        .map(|home| home.join(DEFAULT_GLOBAL_CONFIG_FILE));
    load_config_with_global(root, explicit, global.as_deref())
}

pub(crate) fn load_config_with_global(
    root: &Path,
    explicit: Option<&Path>,
    global_path: Option<&Path>,
) -> Result<Option<ScorecardConfig>> {
    let primary = match explicit {
        Some(path) if !path.is_file() => {
            return Err(ScorecardError::ConfigNotFound(path.display().to_string()));
        }
        Some(path) => path.to_path_buf(),
        None => root.join(DEFAULT_CONFIG_FILE),
    };
    let local = root.join(DEFAULT_LOCAL_FILE);

    let mut merged = Value::Table(Map::new());
    let mut found = false;
    for path in global_path.into_iter().chain([primary.as_path(), local.as_path()]) {
        found |= merge_file_if_exists(&mut merged, path)?;
    }
    if !found {
        return Ok(None);
    }

    let cfg: ScorecardConfig = merged
        .try_into()
        .map_err(|e: toml::de::Error| ScorecardError::ConfigParse(e.to_string()))?;
    Ok(Some(cfg))
}

fn merge_file_if_exists(merged: &mut Value, path: &Path) -> Result<bool> {
    if !path.exists() {
        return Ok(false);
    }
    let value = read_toml_value(path)?;
    tracing::debug!(path = %path.display(), "config layer merged");
    if redefines_roles(&value) {
        // Weights of an earlier role set would name roles that no longer exist.
        if let Some(Value::Table(scoring)) = merged.get_mut("scoring") {
            scoring.remove("role_weights");
        }
    }
    merge_toml(merged, value);
    Ok(true)
}

fn read_toml_value(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path)?;
    toml::from_str(&content)
        .map_err(|e| ScorecardError::ConfigParse(format!("{}: {}", path.display(), e)))
}

fn redefines_roles(layer: &Value) -> bool {
    layer
        .get("scoring")
        .and_then(|scoring| scoring.get("roles"))
        .is_some()
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
