use crate::{
    error::PredictError, model_service::ModelService, state::SharedState, task::Task,
    upload::TempUpload,
};
use axum::{
    body::Bytes,
    extract::{multipart::MultipartRejection, Multipart, State},
    Json,
};
use serde::Serialize;
use std::time::Instant;
use tracing::instrument;

const IMAGE_FIELD: &str = "img";

#[derive(Serialize)]
pub struct Prediction {
    prediction: &'static str,
}

struct ImageUpload {
    file_name: String,
    data: Bytes,
}

#[instrument(skip(state, multipart))]
pub async fn predict_tumor<M: ModelService>(
    State(state): State<SharedState<M>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<Prediction>, PredictError> {
    predict(&state, Task::Tumor, multipart).await
}

#[instrument(skip(state, multipart))]
pub async fn predict_skin<M: ModelService>(
    State(state): State<SharedState<M>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<Prediction>, PredictError> {
    predict(&state, Task::Skin, multipart).await
}

async fn predict<M: ModelService>(
    state: &SharedState<M>,
    task: Task,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<Prediction>, PredictError> {
    let mut multipart = multipart.map_err(|e| PredictError::InvalidForm(e.body_text()))?;
    let image = match read_image_field(&mut multipart).await {
        Ok(image) => image,
        Err(err) => {
            tracing::warn!(task = task.as_str(), "Rejected upload: {}", err);
            return Err(err);
        }
    };

    let started = Instant::now();
    let result = classify_upload(state, task, &image).await;
    let elapsed_ms = started.elapsed().as_millis() as u64;

    match result {
        Ok(label) => {
            state
                .metrics
                .record_prediction(task.as_str(), "success", elapsed_ms);
            tracing::info!(task = task.as_str(), label, elapsed_ms, "Prediction served");
            Ok(Json(Prediction { prediction: label }))
        }
        Err(err) => {
            state
                .metrics
                .record_prediction(task.as_str(), "error", elapsed_ms);
            tracing::error!(task = task.as_str(), "Prediction failed: {}", err);
            Err(err)
        }
    }
}

async fn classify_upload<M: ModelService>(
    state: &SharedState<M>,
    task: Task,
    image: &ImageUpload,
) -> Result<&'static str, PredictError> {
    let upload = TempUpload::persist(state.upload_dir(), &image.file_name, &image.data)
        .await
        .map_err(PredictError::Upload)?;

    let label = state.classifier(task).classify(upload.path()).await?;
    Ok(label)
}

/// Finds the first file field named `img`. Fields without a filename are
/// plain form values and are not considered files.
async fn read_image_field(multipart: &mut Multipart) -> Result<ImageUpload, PredictError> {
    let mut file_keys = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| PredictError::InvalidForm(e.body_text()))?
    {
        let Some(file_name) = field.file_name().map(str::to_owned) else {
            continue;
        };
        let name = field.name().unwrap_or_default().to_owned();

        if name != IMAGE_FIELD {
            file_keys.push(name);
            continue;
        }

        if file_name.is_empty() {
            return Err(PredictError::EmptySelection);
        }

        let data = field
            .bytes()
            .await
            .map_err(|e| PredictError::InvalidForm(e.body_text()))?;
        return Ok(ImageUpload { file_name, data });
    }

    Err(PredictError::MissingFile {
        available: file_keys,
    })
}
