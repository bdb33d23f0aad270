use lopdf::Document;

/// Every PDF starts with this header.
const PDF_MAGIC: &[u8] = b"%PDF-";

/// Turns stored document blobs into plain text for field extraction.
/// Absence is never an error here: callers treat a missing text layer the
/// same as a missing field.
pub struct PdfTextExtractor;

impl PdfTextExtractor {
    /// Content sniffing on the header bytes; the column type says nothing.
    pub fn is_pdf(data: &[u8]) -> bool {
        data.starts_with(PDF_MAGIC)
    }

    /// Concatenated text of all pages, in page order, without separators.
    pub fn extract_text(data: &[u8]) -> Option<String> {
        if data.is_empty() {
            log::warn!("No PDF data provided");
            return None;
        }

        if !Self::is_pdf(data) {
            log::warn!("The provided data is not a PDF");
            return None;
        }

        let document = match Document::load_mem(data) {
            Ok(document) => document,
            Err(e) => {
                log::warn!("Error extracting text from PDF: {}", e);
                return None;
            }
        };

        let mut text = String::new();
        for page_number in document.get_pages().keys() {
            match document.extract_text(&[*page_number]) {
                Ok(page_text) => text.push_str(&page_text),
                Err(e) => {
                    log::warn!("Error extracting text from page {}: {}", page_number, e);
                    return None;
                }
            }
        }

        if text.trim().is_empty() {
            log::warn!("No text extracted from the PDF; it may be empty or contain only images");
        }

        Some(text)
    }

    pub fn extract_text_or_empty(data: &[u8]) -> String {
        Self::extract_text(data).unwrap_or_default()
    }
}
