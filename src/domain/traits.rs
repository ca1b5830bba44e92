use crate::domain::error::TranslateError;
use crate::domain::prompt::Prompt;
use async_trait::async_trait;

/// Receiver for streamed text chunks.
pub type ChunkSink<'a> = dyn for<'c> FnMut(&'c str) + Send + 'a;

/// Trait for translation services
///
/// Implementations send `text` to a model under the given prompt. The
/// application layer only talks to this trait, so tests can swap in a fake.
#[async_trait]
pub trait Translator: Send + Sync {
    /// Model identifier used for cache keys and display.
    fn model(&self) -> &str;

    /// Single request, whole response.
    async fn generate(&self, prompt: &Prompt, text: &str) -> Result<String, TranslateError>;

    /// Streamed request. Every non-empty chunk is passed to `on_chunk` as it
    /// arrives; the return value is the concatenation of all chunks.
    async fn generate_stream(
        &self,
        prompt: &Prompt,
        text: &str,
        on_chunk: &mut ChunkSink<'_>,
    ) -> Result<String, TranslateError>;
}
