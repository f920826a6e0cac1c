use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{TopographError, read_input};

/// Project-relative location of the analysis config.
pub const PROJECT_CONFIG_PATH: &str = ".topograph/config.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectConfig {
    #[serde(default)]
    pub holes: HolesConfig,
    #[serde(default)]
    pub entities: EntitiesConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HolesConfig {
    #[serde(default = "default_hole_threshold")]
    pub threshold: f64,
    #[serde(default = "default_max_bridge_candidates")]
    pub max_bridge_candidates: usize,
    #[serde(default = "default_min_cluster_size")]
    pub min_cluster_size: usize,
}

impl Default for HolesConfig {
    fn default() -> Self {
        Self {
            threshold: default_hole_threshold(),
            max_bridge_candidates: default_max_bridge_candidates(),
            min_cluster_size: default_min_cluster_size(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitiesConfig {
    #[serde(default)]
    pub central_entity: Option<String>,
    #[serde(default)]
    pub core_topics: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserConfig {
    #[serde(default)]
    pub output: Option<String>,
}

/// Load `.topograph/config.toml` under `project_root`, or defaults when absent.
///
/// # Errors
///
/// Returns [`TopographError`] if the file exists but cannot be read or parsed.
pub fn load_project_config(project_root: &Path) -> Result<ProjectConfig, TopographError> {
    let path = project_root.join(PROJECT_CONFIG_PATH);
    if !path.exists() {
        return Ok(ProjectConfig::default());
    }
    let content = read_input(&path)?;
    toml::from_str::<ProjectConfig>(&content)
        .map_err(|source| TopographError::Config { path, source })
}

/// Path of the per-user config file, if the platform has a config dir.
#[must_use]
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("topograph/config.toml"))
}

/// Load the per-user config, or defaults when absent.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_user_config() -> Result<UserConfig> {
    let Some(path) = user_config_path() else {
        return Ok(UserConfig::default());
    };
    if !path.exists() {
        return Ok(UserConfig::default());
    }

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<UserConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

/// Map a configured output name onto a canonical mode name.
#[must_use]
pub fn normalize_output_mode(raw: &str) -> Option<&'static str> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "pretty" | "human" => Some("pretty"),
        "text" | "table" => Some("text"),
        "json" => Some("json"),
        _ => None,
    }
}

const fn default_hole_threshold() -> f64 {
    0.15
}

const fn default_max_bridge_candidates() -> usize {
    5
}

const fn default_min_cluster_size() -> usize {
    2
}
