use crate::classifier::ClassifyError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PredictError {
    #[error("No file part in the request. Available keys: {}", .available.join(", "))]
    MissingFile { available: Vec<String> },
    #[error("No selected file")]
    EmptySelection,
    #[error("Invalid multipart form: {0}")]
    InvalidForm(String),
    #[error("Failed to store upload: {0}")]
    Upload(#[source] std::io::Error),
    #[error(transparent)]
    Classify(#[from] ClassifyError),
}

impl PredictError {
    pub fn status(&self) -> StatusCode {
        match self {
            PredictError::MissingFile { .. }
            | PredictError::EmptySelection
            | PredictError::InvalidForm(_) => StatusCode::BAD_REQUEST,
            PredictError::Upload(_) | PredictError::Classify(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for PredictError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{model_service::ModelError, preprocess::PreprocessError};

    #[test]
    fn test_client_errors_map_to_bad_request() {
        let missing = PredictError::MissingFile {
            available: vec!["scan".to_string(), "photo".to_string()],
        };
        assert_eq!(missing.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            missing.to_string(),
            "No file part in the request. Available keys: scan, photo"
        );
        assert_eq!(PredictError::EmptySelection.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            PredictError::InvalidForm("bad boundary".into()).status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_processing_errors_map_to_internal_error() {
        let decode = PredictError::from(ClassifyError::Preprocess(PreprocessError::Decode(
            image::ImageError::IoError(std::io::Error::other("truncated")),
        )));
        assert_eq!(decode.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(decode.to_string().contains("truncated"));

        let model = PredictError::from(ClassifyError::Model(ModelError::EmptyOutput));
        assert_eq!(model.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let upload = PredictError::Upload(std::io::Error::other("disk full"));
        assert_eq!(upload.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
