use serde::Serialize;

use crate::models::age_model::TuningOverrides;

/// Tuning parameters forwarded to the analysis capability under their
/// externally documented names. Unset fields are omitted from the payload so
/// the capability falls back to its own built-in defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AnalysisConfig {
    #[serde(rename = "INPUT_IMAGE_FORMAT", skip_serializing_if = "Option::is_none")]
    pub input_image_format: Option<String>,
    #[serde(rename = "CONTEXT_STRING", skip_serializing_if = "Option::is_none")]
    pub context_string: Option<String>,
    #[serde(rename = "INPUT_TYPE", skip_serializing_if = "Option::is_none")]
    pub input_type: Option<String>,
    #[serde(rename = "BLUR_THRESHOLD_ENROLL_PRED", skip_serializing_if = "Option::is_none")]
    pub blur_threshold_enroll_pred: Option<f64>,
    #[serde(rename = "CONF_SCORE_THR_ENROLL", skip_serializing_if = "Option::is_none")]
    pub conf_score_thr_enroll: Option<f64>,
    #[serde(rename = "THRESHOLD_PROFILE_ENROLL", skip_serializing_if = "Option::is_none")]
    pub threshold_profile_enroll: Option<f64>,
    #[serde(rename = "THRESHOLD_HIGH_VERTICAL_ENROLL", skip_serializing_if = "Option::is_none")]
    pub threshold_high_vertical_enroll: Option<f64>,
    #[serde(rename = "THRESHOLD_DOWN_VERTICAL_ENROLL", skip_serializing_if = "Option::is_none")]
    pub threshold_down_vertical_enroll: Option<f64>,
    #[serde(rename = "THRESHOLD_USER_RIGHT", skip_serializing_if = "Option::is_none")]
    pub threshold_user_right: Option<f64>,
    #[serde(rename = "THRESHOLD_USER_LEFT", skip_serializing_if = "Option::is_none")]
    pub threshold_user_left: Option<f64>,
    #[serde(rename = "THRESHOLD_USER_TOO_FAR", skip_serializing_if = "Option::is_none")]
    pub threshold_user_too_far: Option<f64>,
    #[serde(rename = "THRESHOLD_USER_TOO_CLOSE", skip_serializing_if = "Option::is_none")]
    pub threshold_user_too_close: Option<f64>,
    #[serde(rename = "SPOOF_FILTER_THRESHOLD", skip_serializing_if = "Option::is_none")]
    pub spoof_filter_threshold: Option<f64>,
    #[serde(rename = "ANGLE_ROTATION_LEFT_THRESHOLD", skip_serializing_if = "Option::is_none")]
    pub angle_rotation_left_threshold: Option<f64>,
    #[serde(rename = "ANGLE_ROTATION_RIGHT_THRESHOLD", skip_serializing_if = "Option::is_none")]
    pub angle_rotation_right_threshold: Option<f64>,
    #[serde(rename = "SKIP_ANTISPOOF", skip_serializing_if = "Option::is_none")]
    pub skip_antispoof: Option<bool>,
    #[serde(rename = "SINGLE_FACE_AGE_RESUL", skip_serializing_if = "Option::is_none")]
    pub single_face_age_resul: Option<bool>,
    #[serde(rename = "FACE_TOO_BRIGHT", skip_serializing_if = "Option::is_none")]
    pub face_too_bright: Option<f64>,
    #[serde(rename = "FACE_TOO_DARK", skip_serializing_if = "Option::is_none")]
    pub face_too_dark: Option<f64>,
}

impl AnalysisConfig {
    /// Lenient preset selected by the relaxed_params request flag.
    pub fn relaxed() -> Self {
        AnalysisConfig {
            input_image_format: Some("rgb".to_string()),
            context_string: Some("enroll".to_string()),
            input_type: Some("face".to_string()),
            blur_threshold_enroll_pred: Some(8.0),
            conf_score_thr_enroll: Some(0.5),
            threshold_profile_enroll: Some(0.8),
            threshold_high_vertical_enroll: Some(-0.3),
            threshold_down_vertical_enroll: Some(0.3),
            threshold_user_right: Some(0.01),
            threshold_user_left: Some(0.99),
            threshold_user_too_far: Some(0.1),
            threshold_user_too_close: Some(1.0),
            spoof_filter_threshold: Some(0.699999988079071),
            angle_rotation_left_threshold: Some(40.0),
            angle_rotation_right_threshold: Some(40.0),
            skip_antispoof: Some(true),
            single_face_age_resul: Some(false),
            face_too_bright: Some(0.85),
            face_too_dark: Some(0.1),
        }
    }

    fn apply_overrides(mut self, overrides: &TuningOverrides) -> Self {
        if let Some(v) = &overrides.input_image_format {
            self.input_image_format = Some(v.clone());
        }
        if let Some(v) = &overrides.context_string {
            self.context_string = Some(v.clone());
        }
        if let Some(v) = &overrides.input_type {
            self.input_type = Some(v.clone());
        }
        if let Some(v) = overrides.blur_threshold_enroll_pred {
            self.blur_threshold_enroll_pred = Some(v);
        }
        if let Some(v) = overrides.conf_score_thr_enroll {
            self.conf_score_thr_enroll = Some(v);
        }
        if let Some(v) = overrides.threshold_profile_enroll {
            self.threshold_profile_enroll = Some(v);
        }
        if let Some(v) = overrides.threshold_high_vertical_enroll {
            self.threshold_high_vertical_enroll = Some(v);
        }
        if let Some(v) = overrides.threshold_down_vertical_enroll {
            self.threshold_down_vertical_enroll = Some(v);
        }
        if let Some(v) = overrides.threshold_user_right {
            self.threshold_user_right = Some(v);
        }
        if let Some(v) = overrides.threshold_user_left {
            self.threshold_user_left = Some(v);
        }
        if let Some(v) = overrides.threshold_user_too_far {
            self.threshold_user_too_far = Some(v);
        }
        if let Some(v) = overrides.threshold_user_too_close {
            self.threshold_user_too_close = Some(v);
        }
        if let Some(v) = overrides.spoof_filter_threshold {
            self.spoof_filter_threshold = Some(v);
        }
        if let Some(v) = overrides.angle_rotation_left_threshold {
            self.angle_rotation_left_threshold = Some(v);
        }
        if let Some(v) = overrides.angle_rotation_right_threshold {
            self.angle_rotation_right_threshold = Some(v);
        }
        if let Some(v) = overrides.skip_antispoof {
            self.skip_antispoof = Some(v);
        }
        if let Some(v) = overrides.single_face_age_resul {
            self.single_face_age_resul = Some(v);
        }
        if let Some(v) = overrides.face_too_bright {
            self.face_too_bright = Some(v);
        }
        if let Some(v) = overrides.face_too_dark {
            self.face_too_dark = Some(v);
        }
        self
    }

    /// Resolves the effective configuration for one request.
    ///
    /// Priority: the relaxed preset with request overrides on top when the
    /// relaxed flag is set, otherwise only the explicitly supplied overrides,
    /// otherwise no configuration at all. The three branches decide which
    /// defaults the capability applies and are observable in edge-case output.
    pub fn resolve(relaxed: bool, overrides: &TuningOverrides) -> Option<AnalysisConfig> {
        if relaxed {
            return Some(AnalysisConfig::relaxed().apply_overrides(overrides));
        }

        if !overrides.is_empty() {
            return Some(AnalysisConfig::default().apply_overrides(overrides));
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use crate::models::age_model::parse_payload;
    use super::*;

    fn overrides_from(body: &str) -> (bool, TuningOverrides) {
        let input = parse_payload(body.as_bytes()).unwrap();
        (input.relaxed_params.unwrap_or(false), input.tuning)
    }

    #[test]
    fn test_resolve_without_fields_is_none() {
        let (relaxed, tuning) = overrides_from(r#"{"api_key": "k", "image_b64": "aGVsbG8="}"#);
        assert_eq!(AnalysisConfig::resolve(relaxed, &tuning), None);
    }

    #[test]
    fn test_resolve_relaxed_matches_preset_table() {
        let (relaxed, tuning) =
            overrides_from(r#"{"api_key": "k", "image_b64": "aGVsbG8=", "relaxed_params": true}"#);
        let config = AnalysisConfig::resolve(relaxed, &tuning).unwrap();

        assert_eq!(config, AnalysisConfig::relaxed());

        // All 19 parameters must be present on the wire.
        let serialized = serde_json::to_value(&config).unwrap();
        assert_eq!(serialized.as_object().unwrap().len(), 19);
        assert_eq!(serialized["INPUT_IMAGE_FORMAT"], "rgb");
        assert_eq!(serialized["CONTEXT_STRING"], "enroll");
        assert_eq!(serialized["INPUT_TYPE"], "face");
        assert_eq!(serialized["SKIP_ANTISPOOF"], true);
        assert_eq!(serialized["SINGLE_FACE_AGE_RESUL"], false);
        assert_eq!(serialized["SPOOF_FILTER_THRESHOLD"], 0.699999988079071);
        assert_eq!(serialized["ANGLE_ROTATION_LEFT_THRESHOLD"], 40.0);
        assert_eq!(serialized["THRESHOLD_USER_TOO_CLOSE"], 1.0);
    }

    #[test]
    fn test_resolve_relaxed_applies_request_overrides() {
        let (relaxed, tuning) = overrides_from(
            r#"{"api_key": "k", "image_b64": "aGVsbG8=", "relaxed_params": true, "SKIP_ANTISPOOF": false, "FACE_TOO_DARK": 0.2}"#,
        );
        let config = AnalysisConfig::resolve(relaxed, &tuning).unwrap();

        assert_eq!(config.skip_antispoof, Some(false));
        assert_eq!(config.face_too_dark, Some(0.2));
        // Untouched fields keep the preset values.
        assert_eq!(config.input_image_format.as_deref(), Some("rgb"));
        assert_eq!(config.conf_score_thr_enroll, Some(0.5));
    }

    #[test]
    fn test_resolve_overrides_only_contains_supplied_fields() {
        let (relaxed, tuning) = overrides_from(
            r#"{"api_key": "k", "image_b64": "aGVsbG8=", "SKIP_ANTISPOOF": false}"#,
        );
        let config = AnalysisConfig::resolve(relaxed, &tuning).unwrap();

        let serialized = serde_json::to_value(&config).unwrap();
        let fields = serialized.as_object().unwrap();
        assert_eq!(fields.len(), 1);
        assert_eq!(fields["SKIP_ANTISPOOF"], false);
    }
}
