mod health;
mod labels;
mod metrics;
mod predict;

use crate::{model_service::ModelService, state::SharedState};
use axum::{
    routing::{get, post},
    Router,
};

pub fn api_routes<M: ModelService>() -> Router<SharedState<M>> {
    Router::new()
        .route("/tumor", post(predict::predict_tumor::<M>))
        .route("/skin", post(predict::predict_skin::<M>))
        .route("/labels", get(labels::list_labels))
        .route("/health", get(health::healthcheck))
        .route("/metrics", get(metrics::metrics_handler::<M>))
}
