use crate::{
    model_service::{ModelError, ModelService},
    preprocess::{preprocess_image, PreprocessError},
    task::Task,
};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClassifyError {
    #[error("Image preprocessing failed: {0}")]
    Preprocess(#[from] PreprocessError),
    #[error("Model inference failed: {0}")]
    Model(#[from] ModelError),
    #[error("Preprocessing task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// A loaded model bound to its task's label table and input resolution.
#[derive(Clone)]
pub struct Classifier<M: ModelService> {
    task: Task,
    model: M,
    input_size: u32,
}

impl<M: ModelService> Classifier<M> {
    pub fn new(task: Task, model: M, input_size: u32) -> Self {
        Self {
            task,
            model,
            input_size,
        }
    }

    pub fn task(&self) -> Task {
        self.task
    }

    pub async fn classify(&self, image_path: &Path) -> Result<&'static str, ClassifyError> {
        let path = image_path.to_path_buf();
        let input_size = self.input_size;
        let input =
            tokio::task::spawn_blocking(move || preprocess_image(&path, input_size)).await??;

        let scores = self.model.predict(input).await?;
        tracing::debug!(task = self.task.as_str(), ?scores, "Model scores");

        Ok(self.task.resolve_label(&scores)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use image::{ImageBuffer, Rgb};
    use ndarray::Array4;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct MockModelService {
        seen_shape: Arc<Mutex<Option<Vec<usize>>>>,
    }

    #[async_trait]
    impl ModelService for MockModelService {
        async fn predict(&self, input: Array4<f32>) -> Result<Vec<f32>, ModelError> {
            *self.seen_shape.lock().unwrap() = Some(input.shape().to_vec());
            Ok(vec![0.1, 0.2, 0.6, 0.1])
        }
    }

    #[tokio::test]
    async fn test_classify_feeds_resized_batch_to_model() {
        let path = std::env::temp_dir().join(format!("{}.png", uuid::Uuid::new_v4().simple()));
        ImageBuffer::<Rgb<u8>, Vec<u8>>::from_pixel(300, 200, Rgb([10, 20, 30]))
            .save(&path)
            .unwrap();

        let model = MockModelService::default();
        let classifier = Classifier::new(Task::Tumor, model.clone(), 32);
        let result = classifier.classify(&path).await;
        std::fs::remove_file(&path).unwrap();

        assert_eq!(result.unwrap(), "no_tumor");
        assert_eq!(
            model.seen_shape.lock().unwrap().as_deref(),
            Some(&[1, 32, 32, 3][..])
        );
    }

    #[tokio::test]
    async fn test_classify_rejects_scores_for_wrong_task() {
        let path = std::env::temp_dir().join(format!("{}.png", uuid::Uuid::new_v4().simple()));
        ImageBuffer::<Rgb<u8>, Vec<u8>>::from_pixel(8, 8, Rgb([0, 0, 0]))
            .save(&path)
            .unwrap();

        let classifier = Classifier::new(Task::Skin, MockModelService::default(), 32);
        let result = classifier.classify(&path).await;
        std::fs::remove_file(&path).unwrap();

        assert!(matches!(
            result,
            Err(ClassifyError::Model(ModelError::OutputShape { .. }))
        ));
    }
}
