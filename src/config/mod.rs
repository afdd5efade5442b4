#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::CliConfig;

use crate::core::ConfigProvider;
use crate::domain::model::Unit;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:5000";

/// Fully resolved runtime settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub service_endpoint: String,
    pub request_timeout_seconds: u64,
    pub unit: Unit,
    pub simulation_min_ms: u64,
    pub simulation_max_ms: u64,
    pub tick_ms: u64,
    pub output_path: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            service_endpoint: DEFAULT_ENDPOINT.to_string(),
            request_timeout_seconds: 30,
            unit: Unit::Centimeters,
            simulation_min_ms: 3000,
            simulation_max_ms: 5000,
            tick_ms: 50,
            output_path: "./output".to_string(),
        }
    }
}

impl ConfigProvider for Settings {
    fn service_endpoint(&self) -> &str {
        &self.service_endpoint
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }

    fn measurement_unit(&self) -> Unit {
        self.unit
    }

    fn simulation_min_ms(&self) -> u64 {
        self.simulation_min_ms
    }

    fn simulation_max_ms(&self) -> u64 {
        self.simulation_max_ms
    }

    fn tick_ms(&self) -> u64 {
        self.tick_ms
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }
}

impl Validate for Settings {
    fn validate(&self) -> Result<()> {
        validation::validate_url("service.endpoint", &self.service_endpoint)?;
        validation::validate_positive_number(
            "service.timeout_seconds",
            self.request_timeout_seconds,
            1,
        )?;
        validation::validate_ordered_pair(
            "simulation.min_ms/max_ms",
            self.simulation_min_ms,
            self.simulation_max_ms,
        )?;
        validation::validate_range("simulation.max_ms", self.simulation_max_ms, 0, 600_000)?;
        validation::validate_range("simulation.tick_ms", self.tick_ms, 1, 1_000)?;
        validation::validate_path("output.path", &self.output_path)?;
        Ok(())
    }
}
