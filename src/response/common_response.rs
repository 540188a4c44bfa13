use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use bytes::{BufMut, BytesMut};
use log::error;
use crate::error::errors::Error;
use crate::models::age_model::ResponseFace;

pub type ApiResponseResult<T> = Result<ApiResponse<T>, Error>;

/// Envelope returned by every outcome of the age-estimation endpoint.
/// The trailing space in the `status` and `message` keys is part of the
/// existing wire contract; clients parse it as-is. The `faces` key is absent
/// on early validation errors and an empty array on auth/zero-face outcomes.
#[derive(Debug, Clone, Serialize)]
pub struct AgeEnvelope {
    #[serde(rename = "status ")]
    pub status: i32,
    #[serde(rename = "message ")]
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub faces: Option<Vec<ResponseFace>>,
}

#[derive(Debug)]
pub struct ApiResponse<T: Serialize> {
    pub data: Option<T>,
    pub status_code: StatusCode,
}

pub struct ApiResponseBuilder<T: Serialize> {
    pub data: Option<T>,
    pub status_code: StatusCode,
}

impl<T> Default for ApiResponseBuilder<T>
    where
        T: Serialize,
{
    fn default() -> Self {
        Self {
            data: None,
            status_code: StatusCode::OK,
        }
    }
}

impl<T> ApiResponseBuilder<T>
    where
        T: Serialize,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub fn body(mut self, body: T) -> Self {
        self.data = Some(body);
        self
    }

    pub fn status_code(mut self, status_code: StatusCode) -> Self {
        self.status_code = status_code;
        self
    }

    pub fn build(self) -> ApiResponse<T> {
        ApiResponse {
            data: self.data,
            status_code: self.status_code,
        }
    }
}

impl<T> IntoResponse for ApiResponse<T>
    where
        T: Serialize,
{
    fn into_response(self) -> Response {

        let data = match self.data {
            Some(data) => {data},
            None => return (
                self.status_code,
                [(header::ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"))],
            ).into_response(),
        };

        let mut bytes = BytesMut::new().writer();
        if let Err(err) = serde_json::to_writer(&mut bytes, &data) {
            error!("Error serializing response body as JSON: {:?}", err);
            return (StatusCode::INTERNAL_SERVER_ERROR).into_response();
        }

        let bytes = bytes.into_inner().freeze();
        let headers = [
            (
                header::CONTENT_TYPE,
                HeaderValue::from_static(mime::APPLICATION_JSON.as_ref()),
            ),
            (
                header::ACCESS_CONTROL_ALLOW_ORIGIN,
                HeaderValue::from_static("*"),
            ),
        ];

        (self.status_code, headers, bytes).into_response()
    }
}

#[cfg(test)]
mod tests {
    use crate::models::age_model::SessionStatus;
    use super::*;

    #[test]
    fn test_envelope_keys_keep_trailing_space() {
        let envelope = AgeEnvelope {
            status: 0,
            message: "Ok".to_string(),
            faces: Some(vec![]),
        };

        let serialized = serde_json::to_string(&envelope).unwrap();
        assert_eq!(serialized, r#"{"status ":0,"message ":"Ok","faces":[]}"#);
    }

    #[test]
    fn test_envelope_omits_faces_when_unset() {
        let envelope = AgeEnvelope {
            status: -1,
            message: "Invalid Payload".to_string(),
            faces: None,
        };

        let serialized = serde_json::to_string(&envelope).unwrap();
        assert_eq!(serialized, r#"{"status ":-1,"message ":"Invalid Payload"}"#);
    }

    #[test]
    fn test_envelope_serializes_faces() {
        let envelope = AgeEnvelope {
            status: 0,
            message: "Ok".to_string(),
            faces: Some(vec![ResponseFace {
                return_code: 0,
                message: "ValidBiometric".to_string(),
                age: Some(30.5),
                bbox_top_left: "(10, 20)".to_string(),
                bbox_bottom_right: "(110, 140)".to_string(),
                session_status: SessionStatus::AgeAboveThreshold,
            }]),
        };

        let serialized = serde_json::to_string(&envelope).unwrap();
        assert!(serialized.contains(r#""BBox_top_left":"(10, 20)""#));
        assert!(serialized.contains(r#""session_status":"AGE_ABOVE_THRESHOLD""#));
    }
}
