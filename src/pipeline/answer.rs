use async_trait::async_trait;
use futures::future::try_join_all;
use tracing::{debug, info};

use crate::errors::{AppError, Result};
use crate::models::{AnswerResult, DocumentHandle, DocumentSelector, ExtractedDocument};
use crate::pipeline::{assemble, extract_document};

/// The remote document repository, as the pipeline sees it.
#[async_trait]
pub trait DocumentRepository: Send + Sync {
    /// PDF documents directly inside a container, in listing order.
    async fn list_pdfs(&self, container_id: &str) -> Result<Vec<DocumentHandle>>;
    /// The complete byte content of one document.
    async fn fetch(&self, document_id: &str) -> Result<Vec<u8>>;
}

/// The text-answering backend: one prompt in, one answer out.
#[async_trait]
pub trait AnswerBackend: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String>;
}

/// Answer a question from the targeted documents.
///
/// Single pass, no per-stage retries: resolve the document set, fetch and
/// extract each document, assemble the bounded context, call the backend
/// once. Any stage failure aborts the request; there is no partial-answer
/// fallback.
pub async fn answer_question<R, B>(
    repository: &R,
    backend: &B,
    question: &str,
    selector: &DocumentSelector,
    max_context_chars: usize,
) -> Result<AnswerResult>
where
    R: DocumentRepository,
    B: AnswerBackend,
{
    let handles = resolve(repository, selector).await?;
    debug!(documents = handles.len(), "Resolved document set");

    // Documents are independent, so fetch+extract runs concurrently; the
    // first error cancels the rest. Assembly below follows the resolved
    // order, keeping output identical to sequential execution.
    let extracted: Vec<ExtractedDocument> =
        try_join_all(handles.into_iter().map(|handle| async move {
            let bytes = repository.fetch(&handle.id).await?;
            extract_document(handle, &bytes)
        }))
        .await?;

    let context = assemble(&extracted, max_context_chars);
    if context.is_empty() {
        return Err(AppError::EmptyContext);
    }

    let prompt = build_prompt(question, &context.text);
    let response = backend.generate(&prompt).await?;

    info!(
        context_length = context.length,
        documents = extracted.len(),
        "Answered question"
    );

    Ok(AnswerResult {
        response,
        context_length: context.length,
    })
}

async fn resolve<R: DocumentRepository>(
    repository: &R,
    selector: &DocumentSelector,
) -> Result<Vec<DocumentHandle>> {
    match selector {
        DocumentSelector::Document(id) => Ok(vec![DocumentHandle::bare(id.clone())]),
        DocumentSelector::Container(container_id) => {
            let handles = repository.list_pdfs(container_id).await?;
            if handles.is_empty() {
                return Err(AppError::NoDocuments(format!(
                    "No PDF files found in folder {}",
                    container_id
                )));
            }
            Ok(handles)
        }
    }
}

/// One prompt embedding the assembled context and the verbatim question.
/// The backend is told to admit when the context does not hold the answer
/// rather than fabricate one.
fn build_prompt(question: &str, context: &str) -> String {
    let mut prompt = String::new();

    prompt.push_str("Answer the question using only the document excerpts below.\n\n");
    prompt.push_str("<context>\n");
    prompt.push_str(context);
    prompt.push_str("\n</context>\n\n");
    prompt.push_str("<question>\n");
    prompt.push_str(question);
    prompt.push_str("\n</question>\n\n");
    prompt.push_str(
        "If the excerpts do not contain the answer, say that the answer \
         is not found in the documents instead of guessing.",
    );

    prompt
}
