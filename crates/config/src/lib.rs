use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use travel_rules_core::RuleSet;

const APP_NAME: &str = "travel-rules";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub rules: RuleSet,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_format")]
    pub format: String, // "text" | "json"
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: default_output_format(),
        }
    }
}

fn default_output_format() -> String {
    "text".to_string()
}

pub fn load() -> Result<AppConfig> {
    let cfg: AppConfig = confy::load(APP_NAME, None).context("Failed to load app config")?;
    Ok(cfg)
}

pub fn store(cfg: &AppConfig) -> Result<()> {
    confy::store(APP_NAME, None, cfg).context("Failed to store app config")?;
    Ok(())
}

/// Overwrite the stored config with defaults and return them.
pub fn reset() -> Result<AppConfig> {
    let cfg = AppConfig::default();
    store(&cfg)?;
    Ok(cfg)
}

pub fn config_path() -> Result<std::path::PathBuf> {
    confy::get_configuration_file_path(APP_NAME, None).context("Failed to resolve config path")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_falls_back_to_defaults() {
        let cfg: AppConfig =
            serde_json::from_str(r#"{"rules": {"min_connection_minutes": 60.0}}"#).unwrap();
        assert_eq!(cfg.rules.min_connection_minutes, 60.0);
        assert_eq!(cfg.rules.max_total_baggage_kg, 100.0);
        assert_eq!(cfg.rules.common_currencies.len(), 8);
        assert_eq!(cfg.output.format, "text");
    }

    #[test]
    fn empty_config_is_default() {
        let cfg: AppConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg, AppConfig::default());
    }
}
