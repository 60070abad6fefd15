use std::{path::PathBuf, sync::Arc};

use parking_lot::RwLock;
use tokio::task;
use tracing::{info, warn};

use crate::{
    config::AppConfig,
    error::ServiceError,
    model::{FeatureVector, ModelStatus, loader::LoadedModel},
};

/// Single-slot holder for the model currently serving predictions.
pub struct ModelRegistry {
    model_path: PathBuf,
    slot: RwLock<Option<Arc<LoadedModel>>>,
}

impl ModelRegistry {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            model_path: config.model_path.clone(),
            slot: RwLock::new(None),
        }
    }

    /// Builds the registry and, when configured, loads the artifact eagerly.
    /// A failed startup load is logged and leaves the slot empty.
    pub async fn initialize(config: &AppConfig) -> Self {
        let registry = Self::new(config);
        if config.load_on_startup {
            if let Err(err) = registry.reload().await {
                warn!(
                    path = %registry.model_path.display(),
                    error = %err,
                    "startup model load failed; call /load_model once the artifact is in place"
                );
            }
        }
        registry
    }

    #[cfg(test)]
    fn is_loaded(&self) -> bool {
        self.slot.read().is_some()
    }

    fn install(&self, model: LoadedModel) {
        self.slot.write().replace(Arc::new(model));
    }

    /// Reads the artifact from the configured path and swaps it into the slot.
    /// On failure the previously loaded model, if any, keeps serving.
    pub async fn reload(&self) -> Result<(), ServiceError> {
        let path = self.model_path.clone();
        let model = task::spawn_blocking(move || LoadedModel::load(&path))
            .await
            .map_err(|err| ServiceError::Unexpected(format!("model load task failed: {err}")))??;

        let metadata = model.metadata();
        info!(
            path = %self.model_path.display(),
            kind = %metadata.kind,
            size_bytes = metadata.size_bytes,
            "model loaded"
        );
        self.install(model);
        Ok(())
    }

    pub async fn predict(&self, features: FeatureVector) -> Result<f64, ServiceError> {
        let model = self.slot.read().clone().ok_or(ServiceError::ModelNotLoaded)?;

        task::spawn_blocking(move || model.predict(&features))
            .await
            .map_err(|err| ServiceError::Inference(format!("inference task failed: {err}")))?
    }

    pub fn status(&self) -> ModelStatus {
        let model = self.slot.read().as_ref().map(|m| m.metadata());
        ModelStatus {
            loaded: model.is_some(),
            path: self.model_path.display().to_string(),
            model,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::LinearRegressor;

    fn features() -> FeatureVector {
        FeatureVector::new([1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap()
    }

    #[tokio::test]
    async fn predict_without_model_reports_not_loaded() {
        let registry = ModelRegistry::new(&AppConfig::with_model_path("missing.json"));
        let err = registry.predict(features()).await.unwrap_err();
        assert!(matches!(err, ServiceError::ModelNotLoaded));
        assert!(!registry.status().loaded);
    }

    #[tokio::test]
    async fn installed_model_serves_predictions() {
        let registry = ModelRegistry::new(&AppConfig::with_model_path("missing.json"));
        registry.install(LoadedModel::from_regressor(
            LinearRegressor::new(vec![1.0; 6], 0.0).unwrap(),
        ));
        assert_eq!(registry.predict(features()).await.unwrap(), 21.0);
        assert!(registry.is_loaded());
    }

    #[tokio::test]
    async fn failed_reload_keeps_previous_model() {
        let registry = ModelRegistry::new(&AppConfig::with_model_path("/no/such/model.json"));
        registry.install(LoadedModel::from_regressor(
            LinearRegressor::new(vec![0.0; 6], 7.0).unwrap(),
        ));

        let err = registry.reload().await.unwrap_err();
        assert!(matches!(err, ServiceError::ModelFileNotFound));
        assert_eq!(registry.predict(features()).await.unwrap(), 7.0);
    }

    #[tokio::test]
    async fn startup_failure_leaves_slot_empty() {
        let registry =
            ModelRegistry::initialize(&AppConfig::with_model_path("/no/such/model.json")).await;
        assert!(!registry.is_loaded());
    }
}
