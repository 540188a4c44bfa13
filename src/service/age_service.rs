use std::sync::Arc;

use image::RgbImage;
use log::error;

use crate::error::errors::Error;
use crate::models::age_model::{AgeEstimationInput, ResponseFace, SessionStatus, DEFAULT_AGE_THRESHOLD};
use crate::pipeline::age_pipeline::age_pipeline::{AgeEstimator, FaceObject};
use crate::pipeline::model_config::config::AnalysisConfig;
use crate::repository::auth_repository::ApiKeyValidator;

#[derive(Clone)]
pub struct AgeService {
    age_pipeline: Arc<dyn AgeEstimator>,
    api_key_validator: Arc<dyn ApiKeyValidator>,
}

impl AgeService {
    pub fn new(age_pipeline: &Arc<dyn AgeEstimator>, api_key_validator: &Arc<dyn ApiKeyValidator>) -> Self {
        AgeService {
            age_pipeline: Arc::clone(age_pipeline),
            api_key_validator: Arc::clone(api_key_validator),
        }
    }

    /// Runs authorization, configuration resolution, analysis, and age
    /// classification for one request.
    pub async fn estimate_age(&self, input: &AgeEstimationInput, image: RgbImage) -> Result<Vec<ResponseFace>, Error> {

        if !self.api_key_validator.check_api_key(&input.api_key).await {
            return Err(Error::InvalidApiKey);
        }

        let config = AnalysisConfig::resolve(input.relaxed_params.unwrap_or(false), &input.tuning);

        let face_objects = match self.age_pipeline.estimate_age(&image, config.as_ref()).await {
            Ok(face_objects) => {face_objects}
            Err(e) => {
                error!("failed to run age estimation analysis: {e:#}");
                return Err(Error::AnalysisFailure)
            }
        };

        drop(image);

        let age_threshold = input.age_threshold.unwrap_or(DEFAULT_AGE_THRESHOLD);
        let faces: Vec<ResponseFace> = face_objects
            .into_iter()
            .map(|face| classify_face(face, age_threshold))
            .collect();

        if faces.is_empty() {
            return Err(Error::NoFaceFound);
        }

        Ok(faces)
    }
}

fn classify_face(face: FaceObject, age_threshold: f64) -> ResponseFace {
    ResponseFace {
        return_code: face.return_code,
        message: face.message,
        age: face.age,
        bbox_top_left: face.bounding_box.top_left.to_string(),
        bbox_bottom_right: face.bounding_box.bottom_right.to_string(),
        session_status: SessionStatus::classify(face.age, age_threshold),
    }
}
