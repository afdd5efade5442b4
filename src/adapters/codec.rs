use crate::domain::model::ImageSource;
use crate::domain::ports::ImageCodec;
use crate::utils::error::{FitError, Result};
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::Client;

/// Standard-alphabet base64 codec. Remote garment URLs are downloaded first.
#[derive(Debug, Clone, Default)]
pub struct Base64Codec {
    client: Client,
}

impl Base64Codec {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| FitError::conversion(format!("cannot download {}: {}", url, e)))?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| FitError::conversion(format!("cannot download {}: {}", url, e)))?;
        Ok(bytes.to_vec())
    }
}

/// Strips a `data:<mime>;base64,` prefix if present.
fn data_url_payload(encoded: &str) -> &str {
    match encoded.strip_prefix("data:") {
        Some(rest) => rest.split_once(',').map_or(rest, |(_, payload)| payload),
        None => encoded,
    }
}

#[async_trait]
impl ImageCodec for Base64Codec {
    async fn encode(&self, source: &ImageSource) -> Result<String> {
        let bytes = match source {
            ImageSource::Bytes(bytes) => bytes.clone(),
            ImageSource::File(path) => tokio::fs::read(path).await.map_err(|e| {
                FitError::conversion(format!("cannot read {}: {}", path.display(), e))
            })?,
            ImageSource::Url(url) if url.starts_with("data:") => {
                let payload = data_url_payload(url);
                // validate before handing it on
                STANDARD.decode(payload.trim())?;
                return Ok(payload.trim().to_string());
            }
            ImageSource::Url(url) => self.fetch(url).await?,
        };

        if bytes.is_empty() {
            return Err(FitError::conversion("image is empty"));
        }
        Ok(STANDARD.encode(bytes))
    }

    fn decode(&self, encoded: &str) -> Result<Vec<u8>> {
        Ok(STANDARD.decode(data_url_payload(encoded).trim())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::ErrorKind;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn test_encode_bytes_and_decode_data_url() {
        let codec = Base64Codec::default();
        let encoded = codec
            .encode(&ImageSource::Bytes(b"jpeg bytes".to_vec()))
            .await
            .unwrap();
        assert_eq!(encoded, "anBlZyBieXRlcw==");

        let decoded = codec
            .decode(&format!("data:image/jpeg;base64,{}", encoded))
            .unwrap();
        assert_eq!(decoded, b"jpeg bytes");
    }

    #[tokio::test]
    async fn test_encode_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(&[0xFF, 0xD8, 0xFF]).unwrap();

        let codec = Base64Codec::default();
        let encoded = codec
            .encode(&ImageSource::File(file.path().to_path_buf()))
            .await
            .unwrap();
        assert_eq!(encoded, "/9j/");
    }

    #[tokio::test]
    async fn test_failures_are_conversion_errors() {
        let codec = Base64Codec::default();

        let missing = codec
            .encode(&ImageSource::File("/definitely/not/here.jpg".into()))
            .await
            .unwrap_err();
        assert_eq!(missing.kind(), ErrorKind::Conversion);

        let empty = codec.encode(&ImageSource::Bytes(Vec::new())).await.unwrap_err();
        assert_eq!(empty.kind(), ErrorKind::Conversion);

        let bad = codec
            .encode(&ImageSource::Url("data:image/png;base64,@@@".to_string()))
            .await
            .unwrap_err();
        assert_eq!(bad.kind(), ErrorKind::Conversion);
    }

    #[test]
    fn test_data_url_payload() {
        assert_eq!(data_url_payload("data:image/png;base64,QUJD"), "QUJD");
        assert_eq!(data_url_payload("QUJD"), "QUJD");
    }
}
