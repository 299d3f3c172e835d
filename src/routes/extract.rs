use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    errors::{AppError, Result},
    models::DocumentHandle,
    pipeline::{extract_document, SEPARATOR},
    state::AppState,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractRequest {
    pub document_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ExtractResponse {
    pub status: String,
    pub text: String,
    pub total_length: usize,
}

/// Fetch one document and return its full extracted text, untruncated.
pub async fn extract(
    State(state): State<AppState>,
    Json(payload): Json<ExtractRequest>,
) -> Result<Json<ExtractResponse>> {
    let document_id = payload
        .document_id
        .map(|id| id.trim().to_string())
        .filter(|id| !id.is_empty())
        .ok_or_else(|| AppError::BadRequest("documentId is required".to_string()))?;

    let bytes = state.drive.fetch(&document_id).await?;
    let extracted = extract_document(DocumentHandle::bare(document_id.clone()), &bytes)?;

    let text = extracted
        .pages
        .iter()
        .filter(|page| !page.is_empty())
        .map(|page| page.as_str())
        .collect::<Vec<_>>()
        .join(SEPARATOR);
    let total_length = text.chars().count();

    info!(
        document_id = %document_id,
        pages = extracted.page_count(),
        total_length,
        "Extracted document text"
    );

    Ok(Json(ExtractResponse {
        status: "success".to_string(),
        text,
        total_length,
    }))
}
