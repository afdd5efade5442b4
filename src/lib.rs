pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{Base64Codec, HttpMeasurementService, LocalStorage};
pub use config::Settings;
pub use core::classifier::{classify, classify_detailed, SizeBreakdown};
pub use core::gate::{GateHandle, GateOutcome, ResultGate, SimulationPlan};
pub use core::profile::{ProfileName, SizeProfile};
pub use core::selection::SelectionStore;
pub use core::session::FittingSession;
pub use domain::model::{Classification, GarmentRegion, ImageSource, MeasurementSample, SizeLabel, Unit};
pub use utils::error::{FitError, Result};
