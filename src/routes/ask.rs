use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

use crate::{
    errors::{AppError, Result},
    models::DocumentSelector,
    pipeline::answer_question,
    state::AppState,
};

/// Request to answer a question about one document or a folder of PDFs.
///
/// All fields are optional at the serde layer; the handler validates them
/// and maps a missing field to a 400 with a message.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AskRequest {
    pub question: Option<String>,
    pub document_id: Option<String>,
    pub folder_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AskResponse {
    pub status: String,
    pub response: String,
    pub context_length: usize,
}

/// Answer a question grounded in the targeted PDF documents.
pub async fn ask(
    State(state): State<AppState>,
    Json(payload): Json<AskRequest>,
) -> Result<Json<AskResponse>> {
    let (question, selector) = validate(payload)?;

    let request_id = Uuid::new_v4();
    let span = info_span!("ask", %request_id);

    let result = answer_question(
        &state.drive,
        &state.gemini,
        &question,
        &selector,
        state.config.pipeline.max_context_chars,
    )
    .instrument(span)
    .await?;

    info!(
        %request_id,
        context_length = result.context_length,
        "Question answered"
    );

    Ok(Json(AskResponse {
        status: "success".to_string(),
        response: result.response,
        context_length: result.context_length,
    }))
}

fn validate(payload: AskRequest) -> Result<(String, DocumentSelector)> {
    let question = payload
        .question
        .map(|q| q.trim().to_string())
        .filter(|q| !q.is_empty())
        .ok_or_else(|| AppError::BadRequest("question is required".to_string()))?;

    let selector = match (payload.document_id, payload.folder_id) {
        (Some(document_id), None) if !document_id.trim().is_empty() => {
            DocumentSelector::Document(document_id)
        }
        (None, Some(folder_id)) if !folder_id.trim().is_empty() => {
            DocumentSelector::Container(folder_id)
        }
        (Some(_), Some(_)) => {
            return Err(AppError::BadRequest(
                "Provide either documentId or folderId, not both".to_string(),
            ))
        }
        _ => {
            return Err(AppError::BadRequest(
                "Either documentId or folderId is required".to_string(),
            ))
        }
    };

    Ok((question, selector))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(
        question: Option<&str>,
        document_id: Option<&str>,
        folder_id: Option<&str>,
    ) -> AskRequest {
        AskRequest {
            question: question.map(String::from),
            document_id: document_id.map(String::from),
            folder_id: folder_id.map(String::from),
        }
    }

    #[test]
    fn test_document_target() {
        let (question, selector) =
            validate(request(Some("what?"), Some("doc-1"), None)).unwrap();
        assert_eq!(question, "what?");
        assert_eq!(selector, DocumentSelector::Document("doc-1".to_string()));
    }

    #[test]
    fn test_folder_target() {
        let (_, selector) = validate(request(Some("what?"), None, Some("folder-1"))).unwrap();
        assert_eq!(selector, DocumentSelector::Container("folder-1".to_string()));
    }

    #[test]
    fn test_missing_question_is_rejected() {
        assert!(matches!(
            validate(request(None, Some("doc-1"), None)),
            Err(AppError::BadRequest(_))
        ));
        assert!(matches!(
            validate(request(Some("   "), Some("doc-1"), None)),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn test_exactly_one_target_is_required() {
        assert!(matches!(
            validate(request(Some("q"), None, None)),
            Err(AppError::BadRequest(_))
        ));
        assert!(matches!(
            validate(request(Some("q"), Some("d"), Some("f"))),
            Err(AppError::BadRequest(_))
        ));
    }
}
