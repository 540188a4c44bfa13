use std::time::Duration;

use anyhow::Error;
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use image::RgbImage;
use serde::{Deserialize, Serialize};

use crate::pipeline::model_config::config::AnalysisConfig;
use crate::pipeline::utils::coordinate::Coord2D;

const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Single face record returned by the analysis capability.
#[derive(Debug, Clone, Deserialize)]
pub struct FaceObject {
    pub return_code: i32,
    pub message: String,
    pub age: Option<f64>,
    pub bounding_box: BoundingBox,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BoundingBox {
    pub top_left: Coord2D,
    pub bottom_right: Coord2D,
}

/// External face-detection and age-estimation capability. A single operation,
/// remote in production and stubbed in tests.
#[async_trait]
pub trait AgeEstimator: Send + Sync {
    async fn estimate_age(
        &self,
        image: &RgbImage,
        config: Option<&AnalysisConfig>,
    ) -> Result<Vec<FaceObject>, Error>;
}

#[derive(Serialize)]
struct AnalysisRequest<'a> {
    height: u32,
    width: u32,
    pixels_b64: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    config: Option<&'a AnalysisConfig>,
}

#[derive(Deserialize)]
struct AnalysisResponse {
    face_objects: Vec<FaceObject>,
}

#[derive(Clone)]
pub struct RemoteAgePipeline {
    client: reqwest::Client,
    uri: String,
}

impl RemoteAgePipeline {
    pub fn new(uri: &str, request_timeout: Option<u64>) -> Result<Self, Error> {
        let timeout = Duration::from_secs(request_timeout.unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS));

        let client = match reqwest::Client::builder().timeout(timeout).build() {
            Ok(client) => client,
            Err(e) => {
                return Err(Error::from(e))
            }
        };

        Ok(RemoteAgePipeline {
            client,
            uri: uri.to_string(),
        })
    }
}

#[async_trait]
impl AgeEstimator for RemoteAgePipeline {
    async fn estimate_age(
        &self,
        image: &RgbImage,
        config: Option<&AnalysisConfig>,
    ) -> Result<Vec<FaceObject>, Error> {
        let payload = AnalysisRequest {
            height: image.height(),
            width: image.width(),
            pixels_b64: BASE64.encode(image.as_raw()),
            config,
        };

        let response = match self.client.post(&self.uri).json(&payload).send().await {
            Ok(response) => response,
            Err(e) => {
                return Err(Error::from(e))
            }
        };

        let response = match response.error_for_status() {
            Ok(response) => response,
            Err(e) => {
                return Err(Error::from(e))
            }
        };

        let result = match response.json::<AnalysisResponse>().await {
            Ok(result) => result,
            Err(e) => {
                return Err(Error::from(e))
            }
        };

        Ok(result.face_objects)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_face_object_deserializes_null_age() {
        let face: FaceObject = serde_json::from_str(
            r#"{
                "return_code": 0,
                "message": "ValidBiometric",
                "age": null,
                "bounding_box": {
                    "top_left": {"x": 10.0, "y": 20.0},
                    "bottom_right": {"x": 110.0, "y": 140.0}
                }
            }"#,
        )
        .unwrap();

        assert_eq!(face.return_code, 0);
        assert!(face.age.is_none());
        assert_eq!(face.bounding_box.top_left.to_string(), "(10, 20)");
    }

    #[test]
    fn test_analysis_request_omits_unset_config() {
        let image = RgbImage::new(2, 2);
        let payload = AnalysisRequest {
            height: image.height(),
            width: image.width(),
            pixels_b64: BASE64.encode(image.as_raw()),
            config: None,
        };

        let serialized = serde_json::to_value(&payload).unwrap();
        assert!(serialized.get("config").is_none());
        assert_eq!(serialized["height"], 2);
    }
}
