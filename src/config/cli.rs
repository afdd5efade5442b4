use crate::config::toml_config::TomlConfig;
use crate::config::Settings;
use crate::core::profile::ProfileName;
use crate::domain::model::{GarmentRegion, Unit};
use crate::utils::error::Result;
use clap::{Parser, Subcommand};

#[derive(Debug, Clone, Parser)]
#[command(name = "fitroom")]
#[command(about = "Body measurement and garment size recommendation client")]
pub struct CliConfig {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Base URL of the measurement service
    #[arg(long)]
    pub service_url: Option<String>,

    /// Unit the service reports measurements in (cm or in)
    #[arg(long)]
    pub unit: Option<Unit>,

    #[arg(long)]
    pub min_sim_ms: Option<u64>,

    #[arg(long)]
    pub max_sim_ms: Option<u64>,

    #[arg(long)]
    pub tick_ms: Option<u64>,

    /// Directory for saved try-on images
    #[arg(long)]
    pub output_path: Option<String>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Measure a person image and recommend sizes
    Measure {
        /// Person image (file path, http(s) URL or data URL)
        image: String,
    },
    /// Composite a garment onto a person image
    TryOn {
        image: String,

        /// Garment image (file path, http(s) URL or data URL)
        #[arg(long)]
        garment: String,

        #[arg(long, default_value = "upper")]
        region: GarmentRegion,
    },
    /// Classify measurements locally without contacting the service
    Classify {
        #[arg(long)]
        chest: Option<f64>,

        #[arg(long)]
        shoulder: Option<f64>,

        #[arg(long)]
        hip: Option<f64>,

        /// Limit output to one profile (default, east, west)
        #[arg(long)]
        profile: Option<ProfileName>,
    },
    /// Tune one of the service's conversion factors
    SetFactor {
        #[arg(long)]
        key: String,

        #[arg(long)]
        value: f64,
    },
}

impl CliConfig {
    /// Defaults, then the config file, then command-line flags.
    pub fn resolve_settings(&self) -> Result<Settings> {
        let mut settings = match &self.config {
            Some(path) => TomlConfig::from_file(path)?.into_settings(),
            None => Settings::default(),
        };

        if let Some(url) = &self.service_url {
            settings.service_endpoint = url.clone();
        }
        if let Some(unit) = self.unit {
            settings.unit = unit;
        }
        if let Some(min) = self.min_sim_ms {
            settings.simulation_min_ms = min;
        }
        if let Some(max) = self.max_sim_ms {
            settings.simulation_max_ms = max;
        }
        if let Some(tick) = self.tick_ms {
            settings.tick_ms = tick;
        }
        if let Some(path) = &self.output_path {
            settings.output_path = path.clone();
        }
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_defaults() {
        let cli = CliConfig::parse_from([
            "fitroom",
            "--service-url",
            "http://10.0.0.5:5000",
            "--unit",
            "in",
            "--max-sim-ms",
            "8000",
            "measure",
            "person.jpg",
        ]);

        let settings = cli.resolve_settings().unwrap();
        assert_eq!(settings.service_endpoint, "http://10.0.0.5:5000");
        assert_eq!(settings.unit, Unit::Inches);
        assert_eq!(settings.simulation_max_ms, 8000);
        assert_eq!(settings.simulation_min_ms, 3000);
        assert!(matches!(cli.command, Command::Measure { ref image } if image == "person.jpg"));
    }

    #[test]
    fn test_try_on_region_parses() {
        let cli = CliConfig::parse_from([
            "fitroom", "try-on", "me.png", "--garment", "jeans.png", "--region", "lower",
        ]);
        match cli.command {
            Command::TryOn { region, .. } => assert_eq!(region, GarmentRegion::Lower),
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
