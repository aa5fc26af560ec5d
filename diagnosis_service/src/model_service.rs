use async_trait::async_trait;
use ndarray::Array4;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("inference failed: {0}")]
    Inference(String),
    #[error("model returned {actual} scores, expected {expected}")]
    OutputShape { expected: usize, actual: usize },
    #[error("model returned no usable scores")]
    EmptyOutput,
}

/// Scores a preprocessed `(1, height, width, channels)` batch.
#[async_trait]
pub trait ModelService: Send + Sync + Clone + 'static {
    async fn predict(&self, input: Array4<f32>) -> Result<Vec<f32>, ModelError>;
}
