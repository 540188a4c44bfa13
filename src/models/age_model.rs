use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::errors::InvalidPayloadError;

pub const DEFAULT_AGE_THRESHOLD: f64 = 22.0;

/// Validated body of an age-estimation request.
#[derive(Debug, Clone, Deserialize)]
pub struct AgeEstimationInput {
    pub api_key: String,
    pub image_b64: String,
    #[serde(rename = "AGE_THRESHOLD")]
    pub age_threshold: Option<f64>,
    pub relaxed_params: Option<bool>,
    #[serde(flatten)]
    pub tuning: TuningOverrides,
}

/// Optional per-request tuning fields, accepted under the externally
/// documented parameter names of the analysis capability.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TuningOverrides {
    #[serde(rename = "INPUT_IMAGE_FORMAT")]
    pub input_image_format: Option<String>,
    #[serde(rename = "CONTEXT_STRING")]
    pub context_string: Option<String>,
    #[serde(rename = "INPUT_TYPE")]
    pub input_type: Option<String>,
    #[serde(rename = "BLUR_THRESHOLD_ENROLL_PRED")]
    pub blur_threshold_enroll_pred: Option<f64>,
    #[serde(rename = "CONF_SCORE_THR_ENROLL")]
    pub conf_score_thr_enroll: Option<f64>,
    #[serde(rename = "THRESHOLD_PROFILE_ENROLL")]
    pub threshold_profile_enroll: Option<f64>,
    #[serde(rename = "THRESHOLD_HIGH_VERTICAL_ENROLL")]
    pub threshold_high_vertical_enroll: Option<f64>,
    #[serde(rename = "THRESHOLD_DOWN_VERTICAL_ENROLL")]
    pub threshold_down_vertical_enroll: Option<f64>,
    #[serde(rename = "THRESHOLD_USER_RIGHT")]
    pub threshold_user_right: Option<f64>,
    #[serde(rename = "THRESHOLD_USER_LEFT")]
    pub threshold_user_left: Option<f64>,
    #[serde(rename = "THRESHOLD_USER_TOO_FAR")]
    pub threshold_user_too_far: Option<f64>,
    #[serde(rename = "THRESHOLD_USER_TOO_CLOSE")]
    pub threshold_user_too_close: Option<f64>,
    #[serde(rename = "SPOOF_FILTER_THRESHOLD")]
    pub spoof_filter_threshold: Option<f64>,
    #[serde(rename = "ANGLE_ROTATION_LEFT_THRESHOLD")]
    pub angle_rotation_left_threshold: Option<f64>,
    #[serde(rename = "ANGLE_ROTATION_RIGHT_THRESHOLD")]
    pub angle_rotation_right_threshold: Option<f64>,
    #[serde(rename = "SKIP_ANTISPOOF")]
    pub skip_antispoof: Option<bool>,
    #[serde(rename = "SINGLE_FACE_AGE_RESUL")]
    pub single_face_age_resul: Option<bool>,
    #[serde(rename = "FACE_TOO_BRIGHT")]
    pub face_too_bright: Option<f64>,
    #[serde(rename = "FACE_TOO_DARK")]
    pub face_too_dark: Option<f64>,
}

impl TuningOverrides {
    pub fn is_empty(&self) -> bool {
        self.input_image_format.is_none()
            && self.context_string.is_none()
            && self.input_type.is_none()
            && self.blur_threshold_enroll_pred.is_none()
            && self.conf_score_thr_enroll.is_none()
            && self.threshold_profile_enroll.is_none()
            && self.threshold_high_vertical_enroll.is_none()
            && self.threshold_down_vertical_enroll.is_none()
            && self.threshold_user_right.is_none()
            && self.threshold_user_left.is_none()
            && self.threshold_user_too_far.is_none()
            && self.threshold_user_too_close.is_none()
            && self.spoof_filter_threshold.is_none()
            && self.angle_rotation_left_threshold.is_none()
            && self.angle_rotation_right_threshold.is_none()
            && self.skip_antispoof.is_none()
            && self.single_face_age_resul.is_none()
            && self.face_too_bright.is_none()
            && self.face_too_dark.is_none()
    }
}

/// Validates a raw request body into a typed input.
///
/// The body must parse as JSON before any field is read, including
/// AGE_THRESHOLD, and both api_key and image_b64 must be non-empty strings.
pub fn parse_payload(body: &[u8]) -> Result<AgeEstimationInput, InvalidPayloadError> {
    if body.is_empty() {
        return Err(InvalidPayloadError::EmptyBody);
    }

    let raw: Value = match serde_json::from_slice(body) {
        Ok(raw) => raw,
        Err(_) => return Err(InvalidPayloadError::Malformed),
    };

    if raw.get("api_key").and_then(Value::as_str).map_or(true, str::is_empty) {
        return Err(InvalidPayloadError::ApiKeyNotFound);
    }

    if raw.get("image_b64").and_then(Value::as_str).map_or(true, str::is_empty) {
        return Err(InvalidPayloadError::ImageB64NotFound);
    }

    match serde_json::from_value(raw) {
        Ok(input) => Ok(input),
        Err(_) => Err(InvalidPayloadError::Malformed),
    }
}

/// Classification of a detected face's estimated age against the caller
/// supplied threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SessionStatus {
    #[serde(rename = "AGE_UNKNOWN")]
    AgeUnknown,
    #[serde(rename = "AGE_BELOW_THRESHOLD")]
    AgeBelowThreshold,
    #[serde(rename = "AGE_ABOVE_THRESHOLD")]
    AgeAboveThreshold,
}

impl SessionStatus {
    /// An absent age or the -1 sentinel means the capability could not
    /// estimate an age. The threshold itself classifies as above.
    pub fn classify(age: Option<f64>, age_threshold: f64) -> SessionStatus {
        match age {
            None => SessionStatus::AgeUnknown,
            Some(age) if age == -1.0 => SessionStatus::AgeUnknown,
            Some(age) if age < age_threshold => SessionStatus::AgeBelowThreshold,
            Some(_) => SessionStatus::AgeAboveThreshold,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ResponseFace {
    pub return_code: i32,
    pub message: String,
    pub age: Option<f64>,
    #[serde(rename = "BBox_top_left")]
    pub bbox_top_left: String,
    #[serde(rename = "BBox_bottom_right")]
    pub bbox_bottom_right: String,
    pub session_status: SessionStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_payload_empty_body() {
        let result = parse_payload(b"");
        assert!(matches!(result, Err(InvalidPayloadError::EmptyBody)));
    }

    #[test]
    fn test_parse_payload_malformed_json() {
        let result = parse_payload(b"{not json");
        assert!(matches!(result, Err(InvalidPayloadError::Malformed)));
    }

    #[test]
    fn test_parse_payload_missing_api_key() {
        let result = parse_payload(br#"{"image_b64": "aGVsbG8="}"#);
        assert!(matches!(result, Err(InvalidPayloadError::ApiKeyNotFound)));
    }

    #[test]
    fn test_parse_payload_empty_api_key() {
        let result = parse_payload(br#"{"api_key": "", "image_b64": "aGVsbG8="}"#);
        assert!(matches!(result, Err(InvalidPayloadError::ApiKeyNotFound)));
    }

    #[test]
    fn test_parse_payload_missing_image() {
        let result = parse_payload(br#"{"api_key": "secret"}"#);
        assert!(matches!(result, Err(InvalidPayloadError::ImageB64NotFound)));
    }

    #[test]
    fn test_parse_payload_defaults() {
        let input = parse_payload(br#"{"api_key": "secret", "image_b64": "aGVsbG8="}"#).unwrap();

        assert_eq!(input.api_key, "secret");
        assert_eq!(input.image_b64, "aGVsbG8=");
        assert!(input.age_threshold.is_none());
        assert!(input.relaxed_params.is_none());
        assert!(input.tuning.is_empty());
    }

    #[test]
    fn test_parse_payload_reads_tuning_fields() {
        let input = parse_payload(
            br#"{
                "api_key": "secret",
                "image_b64": "aGVsbG8=",
                "AGE_THRESHOLD": 18,
                "relaxed_params": true,
                "SKIP_ANTISPOOF": false,
                "CONF_SCORE_THR_ENROLL": 0.25
            }"#,
        )
        .unwrap();

        assert_eq!(input.age_threshold, Some(18.0));
        assert_eq!(input.relaxed_params, Some(true));
        assert_eq!(input.tuning.skip_antispoof, Some(false));
        assert_eq!(input.tuning.conf_score_thr_enroll, Some(0.25));
        assert!(!input.tuning.is_empty());
    }

    #[test]
    fn test_classify_age_unknown() {
        assert_eq!(SessionStatus::classify(None, DEFAULT_AGE_THRESHOLD), SessionStatus::AgeUnknown);
        assert_eq!(SessionStatus::classify(Some(-1.0), DEFAULT_AGE_THRESHOLD), SessionStatus::AgeUnknown);
    }

    #[test]
    fn test_classify_threshold_boundary_is_above() {
        assert_eq!(SessionStatus::classify(Some(21.0), 22.0), SessionStatus::AgeBelowThreshold);
        assert_eq!(SessionStatus::classify(Some(22.0), 22.0), SessionStatus::AgeAboveThreshold);
        assert_eq!(SessionStatus::classify(Some(23.0), 22.0), SessionStatus::AgeAboveThreshold);
    }
}
