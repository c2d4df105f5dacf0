use crate::error::{MotiveError, Result};
use crate::types::config::MotiveConfig;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "motive.toml";
pub const DEFAULT_LOCAL_FILE: &str = ".motive/local.toml";
pub const DEFAULT_GLOBAL_CONFIG_FILE: &str = ".config/motive/config.toml";

/// Loads `motive.toml` from `root`, layered over the global file and under
/// the local override. Without a project file there is no configuration.
pub fn load_config(root: &Path) -> Result<Option<MotiveConfig>> {
    let global = std::env::var_os("HOME")
        .map(PathBuf::from)
        .map(|home| home.join(DEFAULT_GLOBAL_CONFIG_FILE));
    load_config_with_global(root, global.as_deref())
}

pub(crate) fn load_config_with_global(
    root: &Path,
    global_path: Option<&Path>,
) -> Result<Option<MotiveConfig>> {
    let project_path = root.join(DEFAULT_CONFIG_FILE);
    if !project_path.is_file() {
        return Ok(None);
    }

    let local_path = root.join(DEFAULT_LOCAL_FILE);
    let layers = [
        ("global", global_path),
        ("project", Some(project_path.as_path())),
        ("local", Some(local_path.as_path())),
    ];

    let mut merged = MotiveConfig::default();
    for (layer, path) in layers {
        let Some(path) = path.filter(|path| path.is_file()) else {
            continue;
        };
        tracing::debug!(layer, path = %path.display(), "applying config layer");
        merged = merged.overlay(read_layer(path)?);
    }
    Ok(Some(merged))
}

/// Parses one layer on its own so errors name the file they come from.
fn read_layer(path: &Path) -> Result<MotiveConfig> {
    let content = std::fs::read_to_string(path)?;
    toml::from_str(&content)
        .map_err(|e| MotiveError::ConfigParse(format!("{}: {}", path.display(), e)))
}
