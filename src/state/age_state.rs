use std::sync::Arc;
use crate::pipeline::age_pipeline::age_pipeline::AgeEstimator;
use crate::repository::auth_repository::ApiKeyValidator;
use crate::service::age_service::AgeService;

#[derive(Clone)]
pub struct AgeState {
    pub age_service: AgeService,
}

impl AgeState {
    pub fn new(age_pipeline: &Arc<dyn AgeEstimator>, api_key_validator: &Arc<dyn ApiKeyValidator>) -> Self {
        Self {
            age_service: AgeService::new(age_pipeline, api_key_validator),
        }
    }
}
