use axum::response::{IntoResponse, Response};
use http::StatusCode;

use crate::response::common_response::{AgeEnvelope, ApiResponseBuilder};

#[derive(thiserror::Error, Debug)]
pub enum Error {

    #[error("{0}")]
    InvalidPayload(#[from] InvalidPayloadError),

    #[error("Invalid Image : Something went wrong while reading the image")]
    InvalidImage,

    #[error("Invalid Apikey")]
    InvalidApiKey,

    #[error("Invalid Apikey or no face found")]
    NoFaceFound,

    #[error("Something went wrong")]
    AnalysisFailure,
}

impl Error {
    // (HTTP status, whether the envelope carries an empty faces array).
    // Auth rejection and zero-face outcomes answer HTTP 200; callers branch
    // on the body status field, not the HTTP status code.
    fn get_codes(&self) -> (StatusCode, bool) {
        match *self {
            // 5XX errors
            Error::InvalidPayload(_) => (StatusCode::INTERNAL_SERVER_ERROR, false),
            Error::InvalidImage => (StatusCode::INTERNAL_SERVER_ERROR, false),
            Error::AnalysisFailure => (StatusCode::INTERNAL_SERVER_ERROR, false),

            // 2XX envelope-level errors
            Error::InvalidApiKey => (StatusCode::OK, true),
            Error::NoFaceFound => (StatusCode::OK, true),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status_code, with_faces) = self.get_codes();
        let message = self.to_string();

        ApiResponseBuilder::new()
            .status_code(status_code)
            .body(AgeEnvelope {
                status: -1,
                message,
                faces: if with_faces { Some(vec![]) } else { None },
            })
            .build()
            .into_response()
    }
}

#[derive(thiserror::Error, Debug)]
pub enum InvalidPayloadError {
    #[error("Invalid Payload")]
    EmptyBody,

    #[error("Something went wrong while parsing the payload")]
    Malformed,

    #[error("Invalid Payload: api_key not found")]
    ApiKeyNotFound,

    #[error("Invalid Payload: image_b64 not found")]
    ImageB64NotFound,
}
