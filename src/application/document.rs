use crate::application::translate::{surface, translate_content};
use crate::domain::error::{TranslateError, DOCUMENT_FAILURE_MESSAGE, EXTRACTION_FAILURE_MESSAGE};
use crate::domain::model::{AppMode, DocumentState, Translation};
use crate::infrastructure::extract::extract_document;
use crate::state::AppState;
use std::path::Path;
use tracing::{error, info};

/// Extract a document's text and translate it with the layout-preserving prompt.
///
/// The model is called without streaming; the returned state holds both the
/// extracted source and the translation.
pub async fn translate_document(
    state: &AppState,
    path: &Path,
    no_cache: bool,
) -> Result<(DocumentState, Translation), TranslateError> {
    let max_bytes = state.config.read().await.max_document_bytes;

    let mut doc_state = DocumentState {
        file_name: path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned()),
        ..DocumentState::default()
    };

    let extracted = extract_document(path, max_bytes).await.map_err(|e| {
        error!(path = %path.display(), "Document extraction error: {}", e);
        match e {
            TranslateError::TooLarge { .. } => e,
            _ => TranslateError::Translation(EXTRACTION_FAILURE_MESSAGE.to_string()),
        }
    })?;
    info!(
        file = %extracted.file_name,
        kind = extracted.kind.label(),
        "translating document"
    );

    doc_state.file_name = Some(extracted.file_name);
    let translation = translate_content(state, AppMode::Document, &extracted.text, no_cache, None)
        .await
        .map_err(|e| surface(e, DOCUMENT_FAILURE_MESSAGE))?;

    doc_state.file_content = Some(extracted.text);
    doc_state.translated_content = Some(translation.output.clone());
    Ok((doc_state, translation))
}

/// Write the translated document where the user asked for it.
pub async fn save_translation(path: &Path, content: &str) -> Result<(), TranslateError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }
    tokio::fs::write(path, content).await?;
    info!(path = %path.display(), "translation saved");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::config::Config;
    use crate::test_support::{test_state, test_state_with_config, FakeTranslator};
    use std::io::Write;

    fn text_file(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[tokio::test]
    async fn translates_with_document_prompt() {
        let fake = FakeTranslator::chunks(&["# Notice\n", "The meeting is postponed."]);
        let state = test_state(fake.clone()).await;
        let file = text_file("# Hinweis\nDie Sitzung wird verschoben.");

        let (doc, translation) = translate_document(&state, file.path(), false)
            .await
            .unwrap();

        assert_eq!(
            doc.translated_content.as_deref(),
            Some("# Notice\nThe meeting is postponed.")
        );
        assert_eq!(
            doc.file_content.as_deref(),
            Some("# Hinweis\nDie Sitzung wird verschoben.")
        );
        assert_eq!(translation.mode, AppMode::Document);
        assert_eq!(fake.stream_calls(), 0);
        assert_eq!(fake.requests()[0].0, AppMode::Document);
    }

    #[tokio::test]
    async fn unreadable_documents_surface_extraction_message() {
        let fake = FakeTranslator::chunks(&["unused"]);
        let state = test_state(fake.clone()).await;
        let mut file = tempfile::Builder::new().suffix(".docx").tempfile().unwrap();
        file.write_all(b"not a zip archive").unwrap();

        let err = translate_document(&state, file.path(), false)
            .await
            .unwrap_err();
        assert_eq!(err.user_message(), EXTRACTION_FAILURE_MESSAGE);
        assert_eq!(fake.calls(), 0);
    }

    #[tokio::test]
    async fn oversized_documents_are_rejected_before_reading() {
        let fake = FakeTranslator::chunks(&["unused"]);
        let config = Config {
            max_document_bytes: 4,
            ..Config::default()
        };
        let state = test_state_with_config(fake.clone(), config).await;
        let file = text_file("Zu lang für das Limit");

        let err = translate_document(&state, file.path(), false)
            .await
            .unwrap_err();
        assert!(matches!(err, TranslateError::TooLarge { limit: 4, .. }));
        assert_eq!(fake.calls(), 0);
    }

    #[tokio::test]
    async fn model_failures_surface_document_message() {
        let fake = FakeTranslator::failing(|| TranslateError::Api("500".into()));
        let state = test_state(fake).await;
        let file = text_file("Hallo");

        let err = translate_document(&state, file.path(), false)
            .await
            .unwrap_err();
        assert_eq!(err.user_message(), DOCUMENT_FAILURE_MESSAGE);
    }

    #[tokio::test]
    async fn save_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out").join("brief.md");

        save_translation(&out, "# Letter").await.unwrap();
        assert_eq!(std::fs::read_to_string(out).unwrap(), "# Letter");
    }
}
