// PDF text extraction with lopdf
use crate::domain::error::TranslateError;
use lopdf::Document;
use tracing::warn;

/// Extract text page by page. Each page becomes
/// `"\n--- PAGE {n} ---\n{words joined by spaces}\n"`.
///
/// A document without text on any page (a scan, say) yields an empty string.
pub fn extract_text(bytes: &[u8]) -> Result<String, TranslateError> {
    let document = Document::load_mem(bytes)?;

    if document.trailer.get(b"Encrypt").is_ok() {
        return Err(TranslateError::Extraction(
            "PDF is encrypted".to_string(),
        ));
    }

    let pages = document.get_pages();
    let mut full_text = String::new();
    let mut has_text = false;

    for &page_num in pages.keys() {
        let page_text = match document.extract_text(&[page_num]) {
            Ok(text) => text,
            Err(e) => {
                // One unreadable page should not sink the whole document.
                warn!(page = page_num, "Failed to extract page text: {}", e);
                String::new()
            }
        };
        has_text |= !page_text.trim().is_empty();
        full_text.push_str(&format_page(page_num, &page_text));
    }

    if !has_text {
        return Ok(String::new());
    }
    Ok(full_text)
}

fn format_page(page_num: u32, raw: &str) -> String {
    let words: Vec<&str> = raw.split_whitespace().collect();
    format!("\n--- PAGE {} ---\n{}\n", page_num, words.join(" "))
}
