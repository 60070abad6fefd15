use std::fmt;

use serde::{
    Deserialize, Deserializer, Serialize,
    de::{self, Unexpected, Visitor},
};

use crate::error::ServiceError;

/// Field order the model was fitted with.
pub const FEATURE_NAMES: [&str; 6] = [
    "likes",
    "saves",
    "comments",
    "shares",
    "profile_visits",
    "follows",
];

pub const N_FEATURES: usize = FEATURE_NAMES.len();

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector([f64; N_FEATURES]);

impl FeatureVector {
    pub fn new(values: [f64; N_FEATURES]) -> Result<Self, ServiceError> {
        if let Some(idx) = values.iter().position(|v| !v.is_finite()) {
            return Err(ServiceError::InvalidInput(format!(
                "field `{}` must be a finite number",
                FEATURE_NAMES[idx]
            )));
        }
        Ok(Self(values))
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }
}

#[derive(Debug, Deserialize)]
pub struct PredictRequest {
    #[serde(deserialize_with = "coerce_f64")]
    pub likes: f64,
    #[serde(deserialize_with = "coerce_f64")]
    pub saves: f64,
    #[serde(deserialize_with = "coerce_f64")]
    pub comments: f64,
    #[serde(deserialize_with = "coerce_f64")]
    pub shares: f64,
    #[serde(deserialize_with = "coerce_f64")]
    pub profile_visits: f64,
    #[serde(deserialize_with = "coerce_f64")]
    pub follows: f64,
}

impl TryFrom<PredictRequest> for FeatureVector {
    type Error = ServiceError;

    fn try_from(request: PredictRequest) -> Result<Self, Self::Error> {
        FeatureVector::new([
            request.likes,
            request.saves,
            request.comments,
            request.shares,
            request.profile_visits,
            request.follows,
        ])
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PredictResponse {
    pub impression: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoadResponse {
    pub message: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct ModelMetadata {
    pub kind: String,
    pub n_features: usize,
    pub feature_names: Vec<String>,
    pub size_bytes: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ModelStatus {
    pub loaded: bool,
    pub path: String,
    pub model: Option<ModelMetadata>,
}

/// Accepts JSON numbers and strings holding a decimal number.
fn coerce_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    struct NumberLike;

    impl<'de> Visitor<'de> for NumberLike {
        type Value = f64;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a number or a numeric string")
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<f64, E> {
            Ok(v)
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<f64, E> {
            Ok(v as f64)
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<f64, E> {
            Ok(v as f64)
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<f64, E> {
            v.trim()
                .parse::<f64>()
                .map_err(|_| E::invalid_value(Unexpected::Str(v), &self))
        }
    }

    deserializer.deserialize_any(NumberLike)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(raw: &str) -> Result<PredictRequest, serde_json::Error> {
        serde_json::from_str(raw)
    }

    #[test]
    fn numbers_and_numeric_strings_are_accepted() {
        let request = parse(
            r#"{"likes":100,"saves":50.5,"comments":"10","shares":" 5 ","profile_visits":200,"follows":-1}"#,
        )
        .unwrap();
        let features = FeatureVector::try_from(request).unwrap();
        assert_eq!(features.as_slice(), &[100.0, 50.5, 10.0, 5.0, 200.0, -1.0]);
    }

    #[test]
    fn non_numeric_string_is_rejected() {
        let err = parse(
            r#"{"likes":"abc","saves":1,"comments":1,"shares":1,"profile_visits":1,"follows":1}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("abc"));
    }

    #[test]
    fn missing_field_is_named() {
        let err = parse(r#"{"likes":1,"saves":1,"comments":1,"shares":1,"profile_visits":1}"#)
            .unwrap_err();
        assert!(err.to_string().contains("follows"));
    }

    #[test]
    fn null_and_bool_are_rejected() {
        assert!(
            parse(r#"{"likes":null,"saves":1,"comments":1,"shares":1,"profile_visits":1,"follows":1}"#)
                .is_err()
        );
        assert!(
            parse(r#"{"likes":true,"saves":1,"comments":1,"shares":1,"profile_visits":1,"follows":1}"#)
                .is_err()
        );
    }

    #[test]
    fn non_finite_strings_fail_validation() {
        let request = parse(
            r#"{"likes":"inf","saves":1,"comments":1,"shares":1,"profile_visits":1,"follows":1}"#,
        )
        .unwrap();
        let err = FeatureVector::try_from(request).unwrap_err();
        assert!(matches!(err, ServiceError::InvalidInput(ref msg) if msg.contains("likes")));
    }
}
