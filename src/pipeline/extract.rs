use lopdf::Document;
use tracing::warn;

use crate::errors::{AppError, Result};
use crate::models::{DocumentHandle, ExtractedDocument};

/// Extract the text of every page of a PDF held in memory.
///
/// The result always has one entry per page: a page whose extraction fails
/// (scanned image, broken content stream) contributes an empty string
/// instead of aborting the document, so the usable pages still reach the
/// context. Only a buffer that cannot be parsed as a PDF at all is an error.
///
/// The parsed document is a stack value, dropped on every exit path.
pub fn extract_document(handle: DocumentHandle, bytes: &[u8]) -> Result<ExtractedDocument> {
    let doc = Document::load_mem(bytes).map_err(|e| {
        AppError::CorruptDocument(format!(
            "Failed to parse document {} as a PDF: {}",
            handle.id, e
        ))
    })?;

    let mut pages = Vec::with_capacity(doc.get_pages().len());
    for (page_number, _object_id) in doc.get_pages() {
        match doc.extract_text(&[page_number]) {
            Ok(text) => pages.push(text.trim().to_string()),
            Err(e) => {
                warn!(
                    document_id = %handle.id,
                    page = page_number,
                    error = %e,
                    "Page yielded no extractable text"
                );
                pages.push(String::new());
            }
        }
    }

    Ok(ExtractedDocument { handle, pages })
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Object, Stream};

    /// Build a minimal PDF with one page per entry of `page_texts`.
    fn pdf_with_pages(page_texts: &[&str]) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });

        let mut kids: Vec<Object> = Vec::new();
        for text in page_texts {
            let content = Content {
                operations: vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 12.into()]),
                    Operation::new("Td", vec![50.into(), 700.into()]),
                    Operation::new("Tj", vec![Object::string_literal(*text)]),
                    Operation::new("ET", vec![]),
                ],
            };
            let content_id = doc.add_object(Stream::new(
                dictionary! {},
                content.encode().expect("encode page content"),
            ));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
                "Resources" => resources_id,
                "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
            });
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut buffer = Vec::new();
        doc.save_to(&mut buffer).expect("serialize test PDF");
        buffer
    }

    #[test]
    fn test_page_count_matches_pdf() {
        let bytes = pdf_with_pages(&["first page", "second page", "third page"]);
        let extracted = extract_document(DocumentHandle::bare("doc-1"), &bytes).unwrap();
        assert_eq!(extracted.page_count(), 3);
        assert!(extracted.pages[0].contains("first page"));
        assert!(extracted.pages[1].contains("second page"));
        assert!(extracted.pages[2].contains("third page"));
    }

    #[test]
    fn test_blank_page_contributes_empty_string() {
        let bytes = pdf_with_pages(&["some text", ""]);
        let extracted = extract_document(DocumentHandle::bare("doc-2"), &bytes).unwrap();
        assert_eq!(extracted.page_count(), 2);
        assert!(extracted.pages[1].is_empty());
    }

    #[test]
    fn test_unparsable_bytes_are_corrupt() {
        let result = extract_document(DocumentHandle::bare("doc-3"), b"This is not a PDF");
        match result {
            Err(AppError::CorruptDocument(msg)) => assert!(msg.contains("doc-3")),
            other => panic!("Expected CorruptDocument, got {:?}", other.map(|d| d.page_count())),
        }
    }

    #[test]
    fn test_empty_buffer_is_corrupt() {
        assert!(matches!(
            extract_document(DocumentHandle::bare("doc-4"), &[]),
            Err(AppError::CorruptDocument(_))
        ));
    }
}
