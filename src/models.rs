use serde::{Deserialize, Serialize};

/// A document as returned by the repository's listing operation.
///
/// The identifier is opaque to this service. Handles are immutable once
/// obtained and live for a single request only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentHandle {
    pub id: String,
    pub name: Option<String>,
    pub mime_type: Option<String>,
}

impl DocumentHandle {
    /// Handle for a document addressed directly by id, with no listing
    /// round-trip. Existence is checked by the fetch itself.
    pub fn bare(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            mime_type: None,
        }
    }
}

/// The page texts of one document, in page order.
///
/// Invariant: `pages.len()` equals the page count reported by the PDF at
/// extraction time. A page with no extractable text contributes an empty
/// string, never a missing entry.
#[derive(Debug, Clone)]
pub struct ExtractedDocument {
    pub handle: DocumentHandle,
    pub pages: Vec<String>,
}

impl ExtractedDocument {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

/// The bounded text handed to the answering backend.
///
/// `length` is the character count of `text`; reporting it keeps truncation
/// observable to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssembledContext {
    pub text: String,
    pub length: usize,
}

impl AssembledContext {
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// The answering backend's response plus the context length actually used.
#[derive(Debug, Clone, Serialize)]
pub struct AnswerResult {
    pub response: String,
    pub context_length: usize,
}

/// Which documents a query targets: one document by id, or every PDF
/// directly inside a container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentSelector {
    Document(String),
    Container(String),
}
