use crate::domain::model::{GarmentRegion, ImageSource, MeasurementSample, TryOnImage, Unit};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

/// Remote body-measurement and garment-compositing backend.
#[async_trait]
pub trait MeasurementService: Send + Sync {
    /// Returns the measurement map for a base64 person image. A map whose
    /// values are all absent means nothing was detected; it is not an error.
    async fn measure(&self, image_b64: &str) -> Result<MeasurementSample>;

    async fn try_on(
        &self,
        person_b64: &str,
        garment_b64: &str,
        region: GarmentRegion,
    ) -> Result<TryOnImage>;

    /// Pushes one calibration factor to the service.
    async fn update_conversion(&self, key: &str, value: f64) -> Result<()>;
}

#[async_trait]
pub trait ImageCodec: Send + Sync {
    async fn encode(&self, source: &ImageSource) -> Result<String>;
    fn decode(&self, encoded: &str) -> Result<Vec<u8>>;
}

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<String>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn service_endpoint(&self) -> &str;
    fn request_timeout(&self) -> Duration;
    fn measurement_unit(&self) -> Unit;
    fn simulation_min_ms(&self) -> u64;
    fn simulation_max_ms(&self) -> u64;
    fn tick_ms(&self) -> u64;
    fn output_path(&self) -> &str;
}
