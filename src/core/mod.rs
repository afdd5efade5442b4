pub mod classifier;
pub mod gate;
pub mod presentation;
pub mod profile;
pub mod report;
pub mod selection;
pub mod session;

pub use crate::domain::model::{Classification, MeasurementSample, SizeLabel};
pub use crate::domain::ports::{ConfigProvider, ImageCodec, MeasurementService, Storage};
pub use crate::utils::error::Result;
