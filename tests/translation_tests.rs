//! 端到端翻译测试: a mock Gemini server behind the real client

use dolmetscher::application::document::translate_document;
use dolmetscher::application::translate::translate_text;
use dolmetscher::domain::error::{TranslateError, TEXT_FAILURE_MESSAGE};
use dolmetscher::domain::model::{AppMode, TranslationSource};
use dolmetscher::infrastructure::config::Config;
use dolmetscher::infrastructure::storage::db::init_memory_database;
use dolmetscher::state::AppState;
use httpmock::prelude::*;
use serde_json::json;
use std::io::Write;

async fn state_for(server: &MockServer) -> AppState {
    let mut config = Config::default();
    config.gemini.api_key = Some("test-key".to_string());
    config.gemini.model = "gemini-test".to_string();
    config.gemini.base_url = server.base_url();
    let db = init_memory_database().await.unwrap();
    AppState::new(db, config).unwrap()
}

fn sse(texts: &[&str]) -> String {
    texts
        .iter()
        .map(|t| {
            let event = json!({ "candidates": [{ "content": { "parts": [{ "text": t }] } }] });
            format!("data: {}\n\n", event)
        })
        .collect()
}

#[tokio::test]
async fn test_streamed_text_translation() {
    let server = MockServer::start();
    let stream_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/v1beta/models/gemini-test:streamGenerateContent")
            .query_param("alt", "sse")
            .header("x-goog-api-key", "test-key")
            .body_contains("professional German-to-English translator");
        then.status(200)
            .header("Content-Type", "text/event-stream")
            .body(sse(&["The invoice ", "is due ", "on Friday."]));
    });

    let state = state_for(&server).await;
    let mut chunks = Vec::new();
    let mut relay = |c: &str| chunks.push(c.to_string());
    let translation = translate_text(
        &state,
        "Die Rechnung ist am Freitag fällig.",
        false,
        Some(&mut relay),
    )
    .await
    .unwrap();

    stream_mock.assert();
    assert_eq!(chunks.len(), 3);
    assert_eq!(translation.output, chunks.concat());
    assert_eq!(translation.output, "The invoice is due on Friday.");
    assert_eq!(translation.model, "gemini-test");

    // Same text again: served from cache, no second request
    let again = translate_text(&state, "Die Rechnung ist am Freitag fällig.", false, None)
        .await
        .unwrap();
    stream_mock.assert_hits(1);
    assert_eq!(again.source, TranslationSource::MemoryCache);
}

#[tokio::test]
async fn test_api_failure_is_reported() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST);
        then.status(500).json_body(json!({
            "error": { "code": 500, "message": "Internal error", "status": "INTERNAL" }
        }));
    });

    let state = state_for(&server).await;
    let err = translate_text(&state, "Hallo", false, None).await.unwrap_err();
    assert!(matches!(err, TranslateError::Translation(_)));
    assert_eq!(err.user_message(), TEXT_FAILURE_MESSAGE);
}

#[tokio::test]
async fn test_text_document_translation() {
    let server = MockServer::start();
    let doc_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/v1beta/models/gemini-test:generateContent")
            .body_contains("Document Architect")
            .body_contains("Kündigung");
        then.status(200).json_body(json!({
            "candidates": [{ "content": { "parts": [{ "text": "# Termination\n\nDear Sir or Madam," }] } }]
        }));
    });

    let state = state_for(&server).await;
    let mut file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
    write!(file, "# Kündigung\n\nSehr geehrte Damen und Herren,").unwrap();

    let (doc, translation) = translate_document(&state, file.path(), false)
        .await
        .unwrap();

    doc_mock.assert();
    assert_eq!(translation.mode, AppMode::Document);
    assert_eq!(
        doc.translated_content.as_deref(),
        Some("# Termination\n\nDear Sir or Madam,")
    );
}
