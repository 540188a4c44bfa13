use std::sync::Arc;
use std::time::Duration;

use axum::{Json, middleware, Router};
use axum::http::header;
use axum::routing::{get, IntoMakeService};
use http::{StatusCode, Uri};
use serde::{Deserialize, Serialize};
use tower_http::compression::CompressionLayer;
use tower_http::propagate_header::PropagateHeaderLayer;
use tower_http::sensitive_headers::SetSensitiveHeadersLayer;
use tower_http::timeout::TimeoutLayer;
use tower_request_id::RequestIdLayer;
use crate::config::settings::SETTINGS;
use crate::middleware::request_id_mw::generate_request_id_mw;
use crate::pipeline::age_pipeline::age_pipeline::AgeEstimator;
use crate::repository::auth_repository::ApiKeyValidator;
use crate::routes::v1::age_estimation::new_age_estimation_route;
use crate::state::age_state::AgeState;

#[derive(Clone, Serialize, Deserialize)]
struct FallbackResponse {
    message: String,
}


#[derive(Clone)]
pub struct RouterState {
    age_pipeline: Arc<dyn AgeEstimator>,
    api_key_validator: Arc<dyn ApiKeyValidator>,
}

impl RouterState {
    pub fn new(
        age_pipeline: impl AgeEstimator + 'static,
        api_key_validator: impl ApiKeyValidator + 'static,
    ) -> Self {
        RouterState {
            age_pipeline: Arc::new(age_pipeline),
            api_key_validator: Arc::new(api_key_validator),
        }
    }
}

pub fn root_routes(router_state: RouterState) -> IntoMakeService<Router> {

    let v1_router = {
        let age_state = AgeState::new(&router_state.age_pipeline, &router_state.api_key_validator);
        let age_route = new_age_estimation_route()
            .with_state(age_state);

        Router::new().nest("/v1", age_route)
    };

    let mut request_timeout_duration: u64 = 20;
    if let Some(_request_timeout) = SETTINGS.server.request_timeout {
        request_timeout_duration = _request_timeout;
    }

    let app_router = Router::new()
        .merge(Router::new().route("/health", get(healthcheck)))
        .merge(v1_router)
        .layer(CompressionLayer::new())
        .layer(PropagateHeaderLayer::new(header::HeaderName::from_static("x-request-id")))
        .layer(RequestIdLayer)
        .layer(middleware::from_fn(generate_request_id_mw))
        .layer(TimeoutLayer::new(Duration::from_secs(request_timeout_duration)))
        .layer(SetSensitiveHeadersLayer::new(std::iter::once(header::AUTHORIZATION)))
        .fallback(fallback)
        .into_make_service();
    app_router
}

async fn fallback(uri: Uri) -> (StatusCode, Json<FallbackResponse>) {
    (StatusCode::NOT_FOUND, Json(FallbackResponse {
        message: format!("No route for {uri}"),
    }))
}

async fn healthcheck() -> (StatusCode, Json<FallbackResponse>) {
    (StatusCode::OK, Json(FallbackResponse {
        message: "OK".to_string(),
    }))
}
