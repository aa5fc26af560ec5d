use crate::{classifier::Classifier, model_service::ModelService, task::Task, telemetry::Metrics};
use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

/// Everything a request needs, built once at startup and shared read-only.
#[derive(Clone)]
pub struct SharedState<M: ModelService> {
    tumor: Arc<Classifier<M>>,
    skin: Arc<Classifier<M>>,
    upload_dir: Arc<PathBuf>,
    pub metrics: Arc<Metrics>,
}

impl<M: ModelService> SharedState<M> {
    pub fn new(
        tumor: Classifier<M>,
        skin: Classifier<M>,
        upload_dir: PathBuf,
        metrics: Arc<Metrics>,
    ) -> Self {
        Self {
            tumor: Arc::new(tumor),
            skin: Arc::new(skin),
            upload_dir: Arc::new(upload_dir),
            metrics,
        }
    }

    pub fn classifier(&self, task: Task) -> &Classifier<M> {
        match task {
            Task::Tumor => &self.tumor,
            Task::Skin => &self.skin,
        }
    }

    pub fn upload_dir(&self) -> &Path {
        &self.upload_dir
    }
}
