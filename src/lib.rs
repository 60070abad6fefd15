pub mod config;
pub mod error;
pub mod model;
pub mod server;

pub use config::AppConfig;
pub use error::ServiceError;
pub use model::{FeatureVector, ModelRegistry, PredictRequest, PredictResponse};
pub use server::build_router;
