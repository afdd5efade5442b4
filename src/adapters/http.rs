use crate::domain::model::{GarmentRegion, MeasurementSample, TryOnImage};
use crate::domain::ports::MeasurementService;
use crate::utils::error::{FitError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Serialize)]
struct MeasureRequest<'a> {
    image: &'a str,
}

#[derive(Debug, Serialize)]
struct TryOnRequest<'a> {
    person_image: &'a str,
    cloth_image: &'a str,
    clothing_type: GarmentRegion,
}

#[derive(Debug, Serialize)]
struct ConversionUpdate<'a> {
    key: &'a str,
    value: f64,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// JSON-over-HTTP client for the measurement backend.
#[derive(Debug, Clone)]
pub struct HttpMeasurementService {
    client: Client,
    endpoint: String,
}

impl HttpMeasurementService {
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, endpoint))
    }

    pub fn with_client(client: Client, endpoint: &str) -> Self {
        Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.endpoint, path)
    }

    async fn post_json<B, R>(&self, path: &str, body: &B) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = self.url(path);
        tracing::debug!("POST {}", url);
        let response = self.client.post(&url).json(body).send().await?;
        let status = response.status();
        tracing::debug!("Response status from {}: {}", path, status);

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = match serde_json::from_str::<ErrorBody>(&text) {
                Ok(body) => body.error,
                Err(_) if !text.trim().is_empty() => text.trim().to_string(),
                Err(_) => status
                    .canonical_reason()
                    .unwrap_or("unknown error")
                    .to_string(),
            };
            return Err(FitError::ServiceError {
                status: status.as_u16(),
                message,
            });
        }

        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait]
impl MeasurementService for HttpMeasurementService {
    async fn measure(&self, image_b64: &str) -> Result<MeasurementSample> {
        self.post_json("measurements", &MeasureRequest { image: image_b64 })
            .await
    }

    async fn try_on(
        &self,
        person_b64: &str,
        garment_b64: &str,
        region: GarmentRegion,
    ) -> Result<TryOnImage> {
        let request = TryOnRequest {
            person_image: person_b64,
            cloth_image: garment_b64,
            clothing_type: region,
        };
        self.post_json("tryon", &request).await
    }

    async fn update_conversion(&self, key: &str, value: f64) -> Result<()> {
        let _: serde_json::Value = self
            .post_json("update_conversion", &ConversionUpdate { key, value })
            .await?;
        Ok(())
    }
}
