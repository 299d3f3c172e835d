pub mod answer;
pub mod context;
pub mod extract;

pub use answer::{answer_question, AnswerBackend, DocumentRepository};
pub use context::{assemble, SEPARATOR};
pub use extract::extract_document;
