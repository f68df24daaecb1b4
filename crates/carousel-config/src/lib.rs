use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const CAROUSEL_DIR_NAME: &str = ".carousel";
pub const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct CarouselConfig {
    #[serde(default)]
    pub selection: SelectionConfig,
    #[serde(default)]
    pub exploration: ExplorationConfig,
}

/// Tuning for the daily core selection. Defaults match the production
/// values: 7 picks split 3/3/1 across tiers, a 65/35 recency/jitter blend,
/// a 12h freshness half-life, and 3d/10d tier thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionConfig {
    pub core_count: usize,
    pub quota_active: usize,
    pub quota_recent: usize,
    pub quota_dormant: usize,
    pub mix: f64,
    pub half_life_hours: i64,
    pub active_within_days: i64,
    pub recent_within_days: i64,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            core_count: 7,
            quota_active: 3,
            quota_recent: 3,
            quota_dormant: 1,
            mix: 0.35,
            half_life_hours: 12,
            active_within_days: 3,
            recent_within_days: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplorationConfig {
    pub explore_count: usize,
}

impl Default for ExplorationConfig {
    fn default() -> Self {
        Self { explore_count: 2 }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config TOML: {0}")]
    TomlParse(#[from] toml::de::Error),
    #[error("failed to serialize config TOML: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub code: &'static str,
    pub message: String,
}

pub fn carousel_dir(workspace_root: impl AsRef<Path>) -> PathBuf {
    workspace_root.as_ref().join(CAROUSEL_DIR_NAME)
}

pub fn config_path(workspace_root: impl AsRef<Path>) -> PathBuf {
    carousel_dir(workspace_root).join(CONFIG_FILE_NAME)
}

pub fn load_workspace_config(
    workspace_root: impl AsRef<Path>,
) -> Result<CarouselConfig, ConfigError> {
    let path = config_path(workspace_root);
    if !path.exists() {
        return Ok(CarouselConfig::default());
    }

    let raw = fs::read_to_string(path)?;
    let parsed: CarouselConfig = toml::from_str(&raw)?;
    Ok(normalize_config(parsed))
}

pub fn ensure_workspace_config(
    workspace_root: impl AsRef<Path>,
) -> Result<CarouselConfig, ConfigError> {
    let workspace_root = workspace_root.as_ref();
    fs::create_dir_all(carousel_dir(workspace_root))?;

    let path = config_path(workspace_root);
    if path.exists() {
        return load_workspace_config(workspace_root);
    }

    let config = CarouselConfig::default();
    let content = toml::to_string_pretty(&config)?;
    fs::write(path, content)?;

    Ok(config)
}

/// Non-fatal sanity checks surfaced to the operator at startup.
pub fn validate_config(config: &CarouselConfig) -> Vec<ConfigWarning> {
    let mut warnings = Vec::new();

    let selection = &config.selection;
    let quota_sum = selection.quota_active + selection.quota_recent + selection.quota_dormant;
    if quota_sum != selection.core_count {
        warnings.push(ConfigWarning {
            code: "quota_sum_mismatch",
            message: format!(
                "tier quotas sum to {quota_sum} but core_count is {}; the shortfall is backfilled",
                selection.core_count
            ),
        });
    }
    if selection.recent_within_days <= selection.active_within_days {
        warnings.push(ConfigWarning {
            code: "tier_thresholds_inverted",
            message: format!(
                "recent_within_days ({}) must exceed active_within_days ({}); the recent tier is empty",
                selection.recent_within_days, selection.active_within_days
            ),
        });
    }
    if selection.core_count == 0 {
        warnings.push(ConfigWarning {
            code: "empty_selection",
            message: "core_count is 0; every selection will be empty".to_owned(),
        });
    }

    warnings
}

fn normalize_config(mut config: CarouselConfig) -> CarouselConfig {
    config.selection.mix = if config.selection.mix.is_nan() {
        SelectionConfig::default().mix
    } else {
        config.selection.mix.clamp(0.0, 1.0)
    };
    config.selection.half_life_hours = config.selection.half_life_hours.max(1);
    config.selection.active_within_days = config.selection.active_within_days.max(1);
    config.selection.recent_within_days = config.selection.recent_within_days.max(1);
    config
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use super::*;

    #[test]
    fn ensure_workspace_config_creates_default_file() {
        let temp = tempdir().expect("tempdir");
        let workspace = temp.path();

        let config = ensure_workspace_config(workspace).expect("ensure config");

        assert_eq!(config, CarouselConfig::default());
        assert!(config_path(workspace).exists());

        let content = fs::read_to_string(config_path(workspace)).expect("read config file");
        assert!(content.contains("[selection]"));
        assert!(content.contains("core_count = 7"));
        assert!(content.contains("[exploration]"));
    }

    #[test]
    fn load_workspace_config_parses_selection_values() {
        let temp = tempdir().expect("tempdir");
        let workspace = temp.path();
        fs::create_dir_all(carousel_dir(workspace)).expect("create .carousel");

        let raw = r#"
[selection]
core_count = 5
quota_active = 2
quota_recent = 2
quota_dormant = 1
mix = 0.5
half_life_hours = 6

[exploration]
explore_count = 3
"#;
        fs::write(config_path(workspace), raw).expect("write config");

        let config = load_workspace_config(workspace).expect("load config");

        assert_eq!(config.selection.core_count, 5);
        assert_eq!(config.selection.quota_active, 2);
        assert_eq!(config.selection.mix, 0.5);
        assert_eq!(config.selection.half_life_hours, 6);
        // Omitted fields keep their defaults.
        assert_eq!(config.selection.active_within_days, 3);
        assert_eq!(config.exploration.explore_count, 3);
    }

    #[test]
    fn missing_config_file_yields_defaults() {
        let temp = tempdir().expect("tempdir");
        let config = load_workspace_config(temp.path()).expect("load config");
        assert_eq!(config, CarouselConfig::default());
    }

    #[test]
    fn normalize_clamps_out_of_range_values() {
        let temp = tempdir().expect("tempdir");
        let workspace = temp.path();
        fs::create_dir_all(carousel_dir(workspace)).expect("create .carousel");

        let raw = r#"
[selection]
mix = 1.8
half_life_hours = 0
active_within_days = -2
"#;
        fs::write(config_path(workspace), raw).expect("write config");

        let config = load_workspace_config(workspace).expect("load config");
        assert_eq!(config.selection.mix, 1.0);
        assert_eq!(config.selection.half_life_hours, 1);
        assert_eq!(config.selection.active_within_days, 1);
    }

    #[test]
    fn validate_config_flags_quota_mismatch_and_inverted_thresholds() {
        let mut config = CarouselConfig::default();
        config.selection.quota_dormant = 3;
        config.selection.recent_within_days = 2;

        let warnings = validate_config(&config);
        let codes = warnings
            .iter()
            .map(|warning| warning.code)
            .collect::<Vec<_>>();
        assert!(codes.contains(&"quota_sum_mismatch"));
        assert!(codes.contains(&"tier_thresholds_inverted"));
    }

    #[test]
    fn default_config_validates_cleanly() {
        assert!(validate_config(&CarouselConfig::default()).is_empty());
    }
}
