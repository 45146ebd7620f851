use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Main configuration structure for the shim
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub gemini: GeminiConfig,
    #[serde(default)]
    pub articles: ArticleDefaults,
    #[serde(default)]
    pub locations: LocationDefaults,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    #[serde(default)]
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub timeout_seconds: u64,
}

/// Fallbacks for article requests that omit metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArticleDefaults {
    pub max_results: u32,
    pub source_priority: Vec<String>,
    pub include_definitions: bool,
}

impl Default for ArticleDefaults {
    fn default() -> Self {
        Self {
            max_results: 5,
            source_priority: vec![
                "medical".to_string(),
                "academic".to_string(),
                "news".to_string(),
            ],
            include_definitions: true,
        }
    }
}

/// Fallbacks for location requests plus the keywords that trigger query rewriting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationDefaults {
    pub region: String,
    pub language: String,
    pub zoom: u32,
    pub keywords: Vec<String>,
}

impl Default for LocationDefaults {
    fn default() -> Self {
        Self {
            region: "US".to_string(),
            language: "en".to_string(),
            zoom: 13,
            keywords: [
                "doctor",
                "hospital",
                "clinic",
                "pharmacy",
                "urgent care",
                "dentist",
                "physician",
                "medical",
                "health",
                "emergency",
            ]
            .iter()
            .map(|k| k.to_string())
            .collect(),
        }
    }
}

impl Config {
    /// Load configuration from file with environment variable overrides
    /// ALWAYS returns a valid config - never fails
    pub fn load() -> Self {
        let env_paths = [".env", "../.env"];

        let mut env_loaded = false;
        for path in &env_paths {
            if dotenvy::from_path(path).is_ok() {
                tracing::info!("Loaded .env from: {}", path);
                env_loaded = true;
                break;
            }
        }

        if !env_loaded {
            tracing::debug!("No .env file found - continuing with env vars only");
        }

        let config_path =
            env::var("MEDSHIM_CONFIG_PATH").unwrap_or_else(|_| "config.yaml".to_string());

        let mut config = if Path::new(&config_path).exists() {
            match fs::read_to_string(&config_path) {
                Ok(contents) => Self::from_yaml(&contents).unwrap_or_else(|e| {
                    tracing::error!(
                        "Failed to parse config file {}: {} - using defaults",
                        config_path,
                        e
                    );
                    Self::default()
                }),
                Err(e) => {
                    tracing::error!(
                        "Failed to read config file {}: {} - using defaults",
                        config_path,
                        e
                    );
                    Self::default()
                }
            }
        } else {
            tracing::debug!("Config file not found at {} - using defaults", config_path);
            Self::default()
        };

        config.apply_env_overrides();

        if let Err(e) = config.validate() {
            tracing::warn!("Config validation warnings: {} - continuing anyway", e);
        }

        config
    }

    pub fn from_yaml(contents: &str) -> Result<Self, serde_yaml::Error> {
        let config = serde_yaml::from_str::<Config>(contents)?;
        tracing::info!("Loaded configuration from YAML");
        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| env::var(key).ok());
    }

    /// Apply overrides from any key lookup; `apply_env_overrides` feeds it the process env
    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        // GEMINI_API_KEY wins over the legacy shared API_KEY
        if let Some(api_key) = lookup("GEMINI_API_KEY").or_else(|| lookup("API_KEY")) {
            self.gemini.api_key = api_key;
        }
        if let Some(model) = lookup("GEMINI_MODEL") {
            self.gemini.model = model;
        }
        if let Some(base_url) = lookup("GEMINI_BASE_URL") {
            self.gemini.base_url = base_url.trim_end_matches('/').to_string();
        }
        if let Some(timeout) = lookup("GEMINI_TIMEOUT_SECONDS") {
            if let Ok(secs) = timeout.parse() {
                self.gemini.timeout_seconds = secs;
            }
        }

        if let Some(max) = lookup("MEDSHIM_MAX_RESULTS") {
            if let Ok(max) = max.parse() {
                self.articles.max_results = max;
            }
        }
        if let Some(region) = lookup("MEDSHIM_REGION") {
            self.locations.region = region;
        }
        if let Some(language) = lookup("MEDSHIM_LANGUAGE") {
            self.locations.language = language;
        }
    }

    fn validate(&self) -> Result<(), Box<dyn std::error::Error>> {
        if self.gemini.api_key.is_empty() {
            return Err("GEMINI_API_KEY environment variable must be set".into());
        }
        if self.gemini.model.is_empty() {
            return Err("gemini.model cannot be empty".into());
        }
        if self.gemini.timeout_seconds == 0 {
            return Err("gemini.timeout_seconds cannot be 0".into());
        }
        if self.locations.keywords.is_empty() {
            return Err("locations.keywords is empty; no query will be enhanced".into());
        }
        Ok(())
    }

    pub fn get_request_timeout(&self) -> Duration {
        Duration::from_secs(self.gemini.timeout_seconds)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            gemini: GeminiConfig {
                api_key: String::new(),
                model: "gemini-2.5-flash".to_string(),
                base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
                timeout_seconds: 60,
            },
            articles: ArticleDefaults::default(),
            locations: LocationDefaults::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let cfg = Config::default();
        assert_eq!(cfg.gemini.model, "gemini-2.5-flash");
        assert_eq!(cfg.articles.max_results, 5);
        assert_eq!(cfg.articles.source_priority, vec!["medical", "academic", "news"]);
        assert!(cfg.articles.include_definitions);
        assert_eq!(cfg.locations.region, "US");
        assert_eq!(cfg.locations.language, "en");
        assert_eq!(cfg.locations.zoom, 13);
        assert!(cfg.locations.keywords.iter().any(|k| k == "clinic"));
    }

    #[test]
    fn test_api_key_fallback_order() {
        let mut cfg = Config::default();
        cfg.apply_overrides(lookup_from(&[("API_KEY", "legacy")]));
        assert_eq!(cfg.gemini.api_key, "legacy");

        let mut cfg = Config::default();
        cfg.apply_overrides(lookup_from(&[("API_KEY", "legacy"), ("GEMINI_API_KEY", "primary")]));
        assert_eq!(cfg.gemini.api_key, "primary");
    }

    #[test]
    fn test_overrides_ignore_unparseable_numbers() {
        let mut cfg = Config::default();
        cfg.apply_overrides(lookup_from(&[
            ("GEMINI_TIMEOUT_SECONDS", "soon"),
            ("GEMINI_BASE_URL", "http://localhost:9999/v1beta/"),
            ("MEDSHIM_MAX_RESULTS", "8"),
        ]));
        assert_eq!(cfg.gemini.timeout_seconds, 60);
        assert_eq!(cfg.gemini.base_url, "http://localhost:9999/v1beta");
        assert_eq!(cfg.articles.max_results, 8);
    }

    #[test]
    fn test_yaml_sections_fall_back_to_defaults() {
        let yaml = r#"
gemini:
  model: gemini-2.0-flash
  base_url: https://example.test/v1beta
  timeout_seconds: 10
"#;
        let cfg = Config::from_yaml(yaml).unwrap();
        assert_eq!(cfg.gemini.model, "gemini-2.0-flash");
        assert!(cfg.gemini.api_key.is_empty());
        assert_eq!(cfg.locations.zoom, 13);
        assert!(cfg.validate().is_err());
    }
}
