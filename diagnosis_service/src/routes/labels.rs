use crate::task::Task;
use axum::response::{IntoResponse, Json};
use serde::Serialize;

#[derive(Serialize)]
pub struct LabelTables {
    tumor: &'static [&'static str],
    skin: &'static [&'static str],
}

pub async fn list_labels() -> impl IntoResponse {
    Json(LabelTables {
        tumor: Task::Tumor.labels(),
        skin: Task::Skin.labels(),
    })
}
