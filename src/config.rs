use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Tunables for the extraction pipeline
#[derive(Debug, Deserialize, Clone)]
pub struct EngineConfig {
    /// Enhancement passes run when the best confidence is below this
    #[serde(default = "default_enhancement_threshold")]
    pub enhancement_threshold: f64,
    /// Confidence added for each field filled by an enhancement pass
    #[serde(default = "default_enhancement_bonus")]
    pub enhancement_bonus: f64,
    /// Confidence added when an image is recovered from meta tags
    #[serde(default = "default_image_bonus")]
    pub image_bonus: f64,
    /// Maximum number of list items taken by keyword heuristics
    #[serde(default = "default_max_heuristic_items")]
    pub max_heuristic_items: usize,
    /// How deep to search nested JSON-LD objects for a Recipe
    #[serde(default = "default_max_json_depth")]
    pub max_json_depth: usize,
    /// Hostnames added to the built-in reputation allow-list
    #[serde(default)]
    pub reputable_hosts: Vec<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            enhancement_threshold: default_enhancement_threshold(),
            enhancement_bonus: default_enhancement_bonus(),
            image_bonus: default_image_bonus(),
            max_heuristic_items: default_max_heuristic_items(),
            max_json_depth: default_max_json_depth(),
            reputable_hosts: Vec::new(),
        }
    }
}

// Default value functions
fn default_enhancement_threshold() -> f64 {
    0.6
}

fn default_enhancement_bonus() -> f64 {
    0.1
}

fn default_image_bonus() -> f64 {
    0.05
}

fn default_max_heuristic_items() -> usize {
    25
}

fn default_max_json_depth() -> usize {
    8
}

impl EngineConfig {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables with RECIPE_EXTRACT__ prefix
    /// 2. recipe_extract.toml file in current directory
    /// 3. Default values
    ///
    /// Environment variable format: RECIPE_EXTRACT__ENHANCEMENT_THRESHOLD
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("recipe_extract").required(false))
            .add_source(
                Environment::with_prefix("RECIPE_EXTRACT")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let config = EngineConfig::default();
        assert_eq!(config.enhancement_threshold, 0.6);
        assert_eq!(config.enhancement_bonus, 0.1);
        assert_eq!(config.image_bonus, 0.05);
        assert_eq!(config.max_heuristic_items, 25);
        assert_eq!(config.max_json_depth, 8);
        assert!(config.reputable_hosts.is_empty());
    }

    #[test]
    fn test_deserialize_partial_toml() {
        let config: EngineConfig = Config::builder()
            .add_source(File::from_str(
                "enhancement_threshold = 0.5\nreputable_hosts = [\"mysite.org\"]",
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.enhancement_threshold, 0.5);
        assert_eq!(config.max_heuristic_items, 25);
        assert_eq!(config.reputable_hosts, vec!["mysite.org"]);
    }

    #[test]
    fn test_load_without_file() {
        // Missing file is not an error; defaults fill everything in
        let result = EngineConfig::load();
        assert!(result.is_ok());
    }
}
