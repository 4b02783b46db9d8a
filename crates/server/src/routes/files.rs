use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use serde::{Deserialize, Serialize};

use service::editor::FileSummary;

use crate::errors::JsonApiError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct FilenameOutput {
    pub filename: String,
}

#[derive(Debug, Serialize)]
pub struct MessageOutput {
    pub message: &'static str,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FileContent {
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct FetchInput {
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateInput {
    pub filename: String,
    #[serde(default)]
    pub content: String,
}

/// Upload a file (multipart field `file`) and stage it in memory.
pub async fn upload_file(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<FilenameOutput>, JsonApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| JsonApiError::bad_request(e.body_text()))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field
            .file_name()
            .map(str::to_owned)
            .ok_or_else(|| JsonApiError::bad_request("upload is missing a filename"))?;
        let bytes = field
            .bytes()
            .await
            .map_err(|e| JsonApiError::bad_request(e.body_text()))?;
        let filename = state.editor.upload(&filename, &bytes).await?;
        return Ok(Json(FilenameOutput { filename }));
    }
    Err(JsonApiError::bad_request("multipart field `file` is required"))
}

/// Fetch a remote raw file and stage it in memory.
pub async fn fetch_file(
    State(state): State<AppState>,
    Json(input): Json<FetchInput>,
) -> Result<Json<FilenameOutput>, JsonApiError> {
    let filename = state.editor.fetch(&input.url).await?;
    Ok(Json(FilenameOutput { filename }))
}

pub async fn create_file(
    State(state): State<AppState>,
    Json(input): Json<CreateInput>,
) -> Result<Json<MessageOutput>, JsonApiError> {
    state.editor.create(&input.filename, &input.content).await?;
    Ok(Json(MessageOutput { message: "File created. Call save endpoint to persist." }))
}

pub async fn list_files(State(state): State<AppState>) -> Json<Vec<FileSummary>> {
    Json(state.editor.list().await)
}

pub async fn read_file(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<Json<FileContent>, JsonApiError> {
    let content = state.editor.read(&filename).await?;
    Ok(Json(FileContent { content }))
}

pub async fn update_file(
    State(state): State<AppState>,
    Path(filename): Path<String>,
    Json(input): Json<FileContent>,
) -> Result<Json<MessageOutput>, JsonApiError> {
    state.editor.update(&filename, &input.content).await?;
    Ok(Json(MessageOutput { message: "Changes staged. Call save endpoint to persist." }))
}

pub async fn save_file(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<Json<MessageOutput>, JsonApiError> {
    let outcome = state.editor.save(&filename).await?;
    Ok(Json(MessageOutput { message: outcome.message() }))
}
