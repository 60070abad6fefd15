mod loader;
mod registry;
mod types;

pub use loader::{LinearRegressor, LoadedModel, Regressor};
pub use registry::ModelRegistry;
pub use types::{
    FEATURE_NAMES, FeatureVector, LoadResponse, ModelMetadata, ModelStatus, N_FEATURES,
    PredictRequest, PredictResponse,
};
