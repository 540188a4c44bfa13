use axum::debug_handler;
use axum::extract::State;
use axum::response::IntoResponse;
use bytes::Bytes;
use ecs_logger::extra_fields;
use http::{header, HeaderMap, HeaderValue, StatusCode};
use log::{error, info};

use crate::error::errors::Error;
use crate::logger::logger::LoggerExtraFields;
use crate::models::age_model::parse_payload;
use crate::pipeline::utils::image::decode_base64_image;
use crate::response::common_response::{AgeEnvelope, ApiResponseBuilder, ApiResponseResult};
use crate::state::age_state::AgeState;

#[debug_handler(state=AgeState)]
pub async fn estimate_age(headers: HeaderMap, State(state): State<AgeState>, body: Bytes) -> ApiResponseResult<AgeEnvelope> {
    let request_id_header = headers.get("x-request-id").unwrap().to_str().unwrap();
    let request_id: String = request_id_header.parse().unwrap();

    extra_fields::set_extra_fields(LoggerExtraFields {
        request_id: request_id.clone(),
    }).unwrap();

    info!("received age estimation request");

    let input = match parse_payload(&body) {
        Ok(input) => {input}
        Err(e) => {
            error!("failed to validate request payload: {e}");
            return Err(Error::InvalidPayload(e))
        }
    };

    let image = match decode_base64_image(&input.image_b64) {
        Ok(image) => {image}
        Err(e) => {
            error!("failed to decode request image: {e:#}");
            return Err(Error::InvalidImage)
        }
    };

    let faces = state.age_service.estimate_age(&input, image).await?;
    info!("completed age estimation request");

    extra_fields::clear_extra_fields();
    return Ok(ApiResponseBuilder::new()
        .status_code(StatusCode::OK)
        .body(AgeEnvelope {
            status: 0,
            message: "Ok".to_string(),
            faces: Some(faces),
        })
        .build()
    )
}

// Preflight contract: 204 with fixed CORS headers, cached for an hour.
pub async fn preflight() -> impl IntoResponse {
    let headers = [
        (header::ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*")),
        (header::ACCESS_CONTROL_ALLOW_METHODS, HeaderValue::from_static("GET")),
        (header::ACCESS_CONTROL_ALLOW_HEADERS, HeaderValue::from_static("Content-Type")),
        (header::ACCESS_CONTROL_MAX_AGE, HeaderValue::from_static("3600")),
    ];

    (StatusCode::NO_CONTENT, headers)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_preflight_contract() {
        let response = preflight().await.into_response();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let headers = response.headers();
        assert_eq!(headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(), "*");
        assert_eq!(headers.get(header::ACCESS_CONTROL_ALLOW_METHODS).unwrap(), "GET");
        assert_eq!(headers.get(header::ACCESS_CONTROL_ALLOW_HEADERS).unwrap(), "Content-Type");
        assert_eq!(headers.get(header::ACCESS_CONTROL_MAX_AGE).unwrap(), "3600");
    }
}
