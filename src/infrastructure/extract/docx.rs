// DOCX raw text extraction: word/document.xml inside the zip container
use crate::domain::error::TranslateError;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::io::{Cursor, Read};

const DOCUMENT_XML: &str = "word/document.xml";

// Text runs, tabs, breaks and paragraph ends, in document order.
// `<w:tab .../>` with attributes is a tab stop definition, not a tab.
static TOKEN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?s)<w:t(?:\s[^>]*)?>(?P<text>.*?)</w:t>|(?P<tab><w:tab\s*/>)|(?P<br><w:(?:br|cr)(?:\s[^>]*)?/>)|(?P<para></w:p>|<w:p\s*/>)",
    )
    .expect("valid docx token regex")
});

static ENTITY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"&(#x[0-9a-fA-F]+|#[0-9]+|amp|lt|gt|quot|apos);").expect("valid entity regex")
});

pub fn extract_text(bytes: &[u8]) -> Result<String, TranslateError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))?;
    let mut xml = String::new();
    archive
        .by_name(DOCUMENT_XML)
        .map_err(|_| TranslateError::Extraction(format!("{} not found", DOCUMENT_XML)))?
        .read_to_string(&mut xml)?;

    Ok(text_from_document_xml(&xml))
}

/// Paragraph ends become newlines; runs are concatenated as written.
pub fn text_from_document_xml(xml: &str) -> String {
    let mut out = String::with_capacity(xml.len() / 4);
    for caps in TOKEN_RE.captures_iter(xml) {
        if let Some(text) = caps.name("text") {
            out.push_str(&unescape(text.as_str()));
        } else if caps.name("tab").is_some() {
            out.push('\t');
        } else if caps.name("br").is_some() || caps.name("para").is_some() {
            out.push('\n');
        }
    }
    out
}

fn unescape(text: &str) -> String {
    ENTITY_RE
        .replace_all(text, |caps: &Captures| {
            let entity = &caps[1];
            match entity {
                "amp" => "&".to_string(),
                "lt" => "<".to_string(),
                "gt" => ">".to_string(),
                "quot" => "\"".to_string(),
                "apos" => "'".to_string(),
                _ => {
                    let code = if let Some(hex) = entity.strip_prefix("#x") {
                        u32::from_str_radix(hex, 16).ok()
                    } else {
                        entity[1..].parse::<u32>().ok()
                    };
                    code.and_then(char::from_u32)
                        .map(String::from)
                        .unwrap_or_else(|| caps[0].to_string())
                }
            }
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    const BODY: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
<w:body>
<w:p><w:pPr><w:tabs><w:tab w:val="left" w:pos="720"/></w:tabs></w:pPr><w:r><w:t>Vertrag</w:t></w:r></w:p>
<w:p><w:r><w:t xml:space="preserve">Name: </w:t></w:r><w:r><w:tab/><w:t>M&amp;M GmbH</w:t></w:r></w:p>
<w:p/>
<w:p><w:r><w:t>Zeile 1</w:t><w:br/><w:t>Zeile &#252;</w:t></w:r></w:p>
</w:body>
</w:document>"#;

    fn build_docx(entries: &[(&str, &str)]) -> Vec<u8> {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        for (name, content) in entries {
            writer
                .start_file(*name, SimpleFileOptions::default())
                .unwrap();
            writer.write_all(content.as_bytes()).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn paragraphs_tabs_and_breaks() {
        assert_eq!(
            text_from_document_xml(BODY),
            "Vertrag\nName: \tM&M GmbH\n\nZeile 1\nZeile ü\n"
        );
    }

    #[test]
    fn extracts_from_zip_container() {
        let bytes = build_docx(&[
            ("[Content_Types].xml", "<Types/>"),
            (DOCUMENT_XML, BODY),
        ]);
        let text = extract_text(&bytes).unwrap();
        assert!(text.starts_with("Vertrag\n"));
    }

    #[test]
    fn missing_document_part_is_an_extraction_error() {
        let bytes = build_docx(&[("word/styles.xml", "<w:styles/>")]);
        assert!(matches!(
            extract_text(&bytes),
            Err(TranslateError::Extraction(_))
        ));
    }

    #[test]
    fn not_a_zip_is_an_error() {
        assert!(matches!(
            extract_text(b"plain text"),
            Err(TranslateError::Zip(_))
        ));
    }

    #[test]
    fn unknown_entities_are_kept() {
        assert_eq!(unescape("a &lt;b&gt; &#xFFFFFF; &quot;"), "a <b> &#xFFFFFF; \"");
    }
}
