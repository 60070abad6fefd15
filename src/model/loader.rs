use std::{fs, path::Path};

use serde::Deserialize;

use crate::{
    error::ServiceError,
    model::{FEATURE_NAMES, FeatureVector, ModelMetadata, N_FEATURES},
};

/// Inference seam between the HTTP layer and a fitted model.
pub trait Regressor: Send + Sync {
    fn kind(&self) -> &'static str;

    fn predict(&self, features: &FeatureVector) -> Result<f64, ServiceError>;
}

/// On-disk artifact, tagged by `kind`.
#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum ModelArtifact {
    Linear(LinearRegressor),
}

#[derive(Debug, Clone, Deserialize)]
pub struct LinearRegressor {
    coefficients: Vec<f64>,
    intercept: f64,
    #[serde(default)]
    feature_names: Option<Vec<String>>,
}

impl LinearRegressor {
    #[cfg(test)]
    pub(crate) fn new(coefficients: Vec<f64>, intercept: f64) -> Result<Self, ServiceError> {
        let model = Self {
            coefficients,
            intercept,
            feature_names: None,
        };
        model.validate()?;
        Ok(model)
    }

    fn validate(&self) -> Result<(), ServiceError> {
        if self.coefficients.len() != N_FEATURES {
            return Err(ServiceError::Deserialization(format!(
                "expected {N_FEATURES} coefficients, found {}",
                self.coefficients.len()
            )));
        }
        if !self.intercept.is_finite() || self.coefficients.iter().any(|c| !c.is_finite()) {
            return Err(ServiceError::Deserialization(
                "model parameters must be finite".into(),
            ));
        }
        if let Some(names) = &self.feature_names {
            if names.iter().map(String::as_str).ne(FEATURE_NAMES) {
                return Err(ServiceError::Deserialization(format!(
                    "feature names {names:?} do not match expected order {FEATURE_NAMES:?}"
                )));
            }
        }
        Ok(())
    }
}

impl Regressor for LinearRegressor {
    fn kind(&self) -> &'static str {
        "linear"
    }

    fn predict(&self, features: &FeatureVector) -> Result<f64, ServiceError> {
        let value = self
            .coefficients
            .iter()
            .zip(features.as_slice())
            .fold(self.intercept, |acc, (c, x)| acc + c * x);

        if value.is_finite() {
            Ok(value)
        } else {
            Err(ServiceError::Inference(format!(
                "prediction is not a finite number: {value}"
            )))
        }
    }
}

pub struct LoadedModel {
    regressor: Box<dyn Regressor>,
    size_bytes: u64,
}

impl LoadedModel {
    pub fn load(path: &Path) -> Result<Self, ServiceError> {
        let raw = fs::read(path)?;
        let regressor = decode(&raw)?;
        Ok(Self {
            regressor,
            size_bytes: raw.len() as u64,
        })
    }

    #[cfg(test)]
    pub(crate) fn from_regressor(regressor: impl Regressor + 'static) -> Self {
        Self {
            regressor: Box::new(regressor),
            size_bytes: 0,
        }
    }

    pub fn predict(&self, features: &FeatureVector) -> Result<f64, ServiceError> {
        self.regressor.predict(features)
    }

    pub fn metadata(&self) -> ModelMetadata {
        ModelMetadata {
            kind: self.regressor.kind().to_string(),
            n_features: N_FEATURES,
            feature_names: FEATURE_NAMES.iter().map(|s| s.to_string()).collect(),
            size_bytes: self.size_bytes,
        }
    }
}

fn decode(raw: &[u8]) -> Result<Box<dyn Regressor>, ServiceError> {
    let artifact: ModelArtifact =
        serde_json::from_slice(raw).map_err(|e| ServiceError::Deserialization(e.to_string()))?;

    match artifact {
        ModelArtifact::Linear(model) => {
            model.validate()?;
            Ok(Box::new(model))
        }
    }
}
