use crate::config::Settings;
use crate::domain::model::Unit;
use crate::utils::error::{FitError, Result};
use crate::utils::validation::Validate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    pub service: Option<ServiceConfig>,
    pub simulation: Option<SimulationConfig>,
    pub sizing: Option<SizingConfig>,
    pub output: Option<OutputConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub endpoint: String,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub min_ms: Option<u64>,
    pub max_ms: Option<u64>,
    pub tick_ms: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SizingConfig {
    pub unit: Option<Unit>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub path: String,
}

fn env_var_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("static pattern"))
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed = Self::substitute_env_vars(content);
        toml::from_str(&processed)
            .map_err(|e| FitError::config(format!("TOML parsing error: {}", e)))
    }

    /// Replaces `${NAME}` with the environment value; unknown names are left as-is.
    fn substitute_env_vars(content: &str) -> String {
        env_var_pattern()
            .replace_all(content, |caps: &regex::Captures| {
                let name = &caps[1];
                std::env::var(name).unwrap_or_else(|_| format!("${{{}}}", name))
            })
            .into_owned()
    }

    /// Layers this file over the built-in defaults.
    pub fn into_settings(self) -> Settings {
        let mut settings = Settings::default();

        if let Some(service) = self.service {
            settings.service_endpoint = service.endpoint;
            if let Some(timeout) = service.timeout_seconds {
                settings.request_timeout_seconds = timeout;
            }
        }
        if let Some(sim) = self.simulation {
            settings.simulation_min_ms = sim.min_ms.unwrap_or(settings.simulation_min_ms);
            settings.simulation_max_ms = sim.max_ms.unwrap_or(settings.simulation_max_ms);
            settings.tick_ms = sim.tick_ms.unwrap_or(settings.tick_ms);
        }
        if let Some(unit) = self.sizing.and_then(|s| s.unit) {
            settings.unit = unit;
        }
        if let Some(output) = self.output {
            settings.output_path = output.path;
        }
        settings
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.clone().into_settings().validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
[service]
endpoint = "https://fit.example.com/api"
timeout_seconds = 12

[simulation]
min_ms = 2000
max_ms = 2500
tick_ms = 25

[sizing]
unit = "in"

[output]
path = "./tryons"
"#;

        let settings = TomlConfig::from_toml_str(toml_content)
            .unwrap()
            .into_settings();

        assert_eq!(settings.service_endpoint, "https://fit.example.com/api");
        assert_eq!(settings.request_timeout_seconds, 12);
        assert_eq!(settings.simulation_min_ms, 2000);
        assert_eq!(settings.simulation_max_ms, 2500);
        assert_eq!(settings.tick_ms, 25);
        assert_eq!(settings.unit, Unit::Inches);
        assert_eq!(settings.output_path, "./tryons");
    }

    #[test]
    fn test_missing_sections_fall_back_to_defaults() {
        let settings = TomlConfig::from_toml_str("").unwrap().into_settings();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("FITROOM_TEST_ENDPOINT", "http://measure.local:8080");

        let config = TomlConfig::from_toml_str(
            r#"
[service]
endpoint = "${FITROOM_TEST_ENDPOINT}"
"#,
        )
        .unwrap();
        assert_eq!(
            config.service.as_ref().unwrap().endpoint,
            "http://measure.local:8080"
        );

        std::env::remove_var("FITROOM_TEST_ENDPOINT");
    }

    #[test]
    fn test_validation_rejects_bad_endpoint() {
        let config = TomlConfig::from_toml_str(
            r#"
[service]
endpoint = "not-a-url"
"#,
        )
        .unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = TomlConfig::from_toml_str("[service\nendpoint = 1").unwrap_err();
        assert!(matches!(err, FitError::ConfigError { .. }));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[output]\npath = \"/tmp/fitroom\"\n")
            .unwrap();

        let settings = TomlConfig::from_file(temp_file.path())
            .unwrap()
            .into_settings();
        assert_eq!(settings.output_path, "/tmp/fitroom");
    }
}
