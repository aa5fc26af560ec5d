mod classifier;
mod cors;
mod error;
mod model_service;
mod ort_service;
mod preprocess;
mod routes;
mod server;
mod state;
mod task;
mod telemetry;
mod upload;

pub mod config;

pub use classifier::{Classifier, ClassifyError};
pub use error::PredictError;
pub use model_service::{ModelError, ModelService};
pub use server::{build_router, start_server};
pub use state::SharedState;
pub use task::{Task, SKIN_LABELS, TUMOR_LABELS};
pub use telemetry::Metrics;
