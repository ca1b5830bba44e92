//! Test helpers shared across application tests.
use crate::domain::error::TranslateError;
use crate::domain::model::AppMode;
use crate::domain::prompt::Prompt;
use crate::domain::traits::{ChunkSink, Translator};
use crate::infrastructure::config::Config;
use crate::infrastructure::storage::db::init_memory_database;
use crate::state::AppState;
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

struct Inner {
    chunks: Vec<String>,
    error: Option<fn() -> TranslateError>,
    calls: AtomicUsize,
    stream_calls: AtomicUsize,
    requests: Mutex<Vec<(AppMode, String)>>,
}

/// Scripted translator: answers every request with the same chunks, or fails.
#[derive(Clone)]
pub struct FakeTranslator {
    inner: Arc<Inner>,
}

impl FakeTranslator {
    pub fn chunks(chunks: &[&str]) -> Self {
        Self::build(chunks.iter().map(|c| c.to_string()).collect(), None)
    }

    pub fn failing(error: fn() -> TranslateError) -> Self {
        Self::build(Vec::new(), Some(error))
    }

    fn build(chunks: Vec<String>, error: Option<fn() -> TranslateError>) -> Self {
        Self {
            inner: Arc::new(Inner {
                chunks,
                error,
                calls: AtomicUsize::new(0),
                stream_calls: AtomicUsize::new(0),
                requests: Mutex::new(Vec::new()),
            }),
        }
    }

    /// All requests, streamed or not.
    pub fn calls(&self) -> usize {
        self.inner.calls.load(Ordering::SeqCst)
    }

    pub fn stream_calls(&self) -> usize {
        self.inner.stream_calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<(AppMode, String)> {
        self.inner.requests.lock().unwrap().clone()
    }

    fn record(&self, prompt: &Prompt, text: &str) -> Result<(), TranslateError> {
        self.inner.calls.fetch_add(1, Ordering::SeqCst);
        self.inner
            .requests
            .lock()
            .unwrap()
            .push((prompt.mode, text.to_string()));
        match self.inner.error {
            Some(make) => Err(make()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl Translator for FakeTranslator {
    fn model(&self) -> &str {
        "fake-model"
    }

    async fn generate(&self, prompt: &Prompt, text: &str) -> Result<String, TranslateError> {
        self.record(prompt, text)?;
        Ok(self.inner.chunks.concat())
    }

    async fn generate_stream(
        &self,
        prompt: &Prompt,
        text: &str,
        on_chunk: &mut ChunkSink<'_>,
    ) -> Result<String, TranslateError> {
        self.inner.stream_calls.fetch_add(1, Ordering::SeqCst);
        self.record(prompt, text)?;
        let mut full = String::new();
        for chunk in &self.inner.chunks {
            tokio::task::yield_now().await;
            full.push_str(chunk);
            on_chunk(chunk);
        }
        Ok(full)
    }
}

pub async fn test_state(translator: FakeTranslator) -> AppState {
    test_state_with_config(translator, Config::default()).await
}

pub async fn test_state_with_config(translator: FakeTranslator, config: Config) -> AppState {
    let db = init_memory_database().await.unwrap();
    AppState::with_translator(db, config, Arc::new(translator))
}
