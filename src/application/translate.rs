use crate::domain::error::{TranslateError, TEXT_FAILURE_MESSAGE};
use crate::domain::model::{AppMode, Translation, TranslationSource};
use crate::domain::prompt::Prompt;
use crate::domain::traits::ChunkSink;
use crate::infrastructure::storage::db::{cache_key, insert_cache, query_cache};
use crate::state::AppState;
use chrono::Utc;
use tracing::{debug, error, warn};

/// Translate free text, streaming chunks to `on_chunk` when given.
///
/// Whitespace-only input produces an empty translation without any request.
pub async fn translate_text(
    state: &AppState,
    text: &str,
    no_cache: bool,
    on_chunk: Option<&mut ChunkSink<'_>>,
) -> Result<Translation, TranslateError> {
    translate_content(state, AppMode::Text, text, no_cache, on_chunk)
        .await
        .map_err(|e| surface(e, TEXT_FAILURE_MESSAGE))
}

/// Replace transport and API details with the user-facing message. A missing
/// key stays distinguishable so the caller can ask for one.
pub(crate) fn surface(err: TranslateError, message: &str) -> TranslateError {
    match err {
        TranslateError::MissingApiKey | TranslateError::Translation(_) => err,
        other => {
            error!("Translation error: {}", other);
            TranslateError::Translation(message.to_string())
        }
    }
}

/// Cache lookup, model call and cache write-back for one piece of content.
pub(crate) async fn translate_content(
    state: &AppState,
    mode: AppMode,
    text: &str,
    no_cache: bool,
    on_chunk: Option<&mut ChunkSink<'_>>,
) -> Result<Translation, TranslateError> {
    let model = state.translator.model().to_string();
    if text.trim().is_empty() {
        return Ok(Translation::new(String::new(), String::new(), mode, model));
    }

    let (use_cache, prompt) = {
        let config = state.config.read().await;
        (config.cache && !no_cache, Prompt::for_mode(mode, &config.gemini))
    };
    let key = cache_key(mode, &model, text);

    // 1. Memory Cache / 2. Database Cache
    if use_cache {
        if let Some(mut cached) = lookup_cache(state, &key).await {
            debug!(mode = %mode, source = ?cached.source, "cache hit");
            if let Some(on_chunk) = on_chunk {
                on_chunk(&cached.output);
            }
            cached.input = text.to_string();
            return Ok(cached);
        }
    }

    // 3. Online
    let output = match on_chunk {
        Some(on_chunk) => {
            state
                .translator
                .generate_stream(&prompt, text, on_chunk)
                .await?
        }
        None => state.translator.generate(&prompt, text).await?,
    };

    let mut translation = Translation::new(text.to_string(), output, mode, model);

    // 4. Write back to cache
    if use_cache && !translation.is_empty() {
        translation.cached_at = Some(Utc::now().timestamp());
        state.cache.insert(key.clone(), translation.clone());
        if let Err(e) = insert_cache(&state.db, &key, &translation).await {
            warn!("Failed to write translation cache: {}", e);
        }
    }

    Ok(translation)
}

async fn lookup_cache(state: &AppState, key: &str) -> Option<Translation> {
    if let Some(mut cached) = state.cache.get(key) {
        cached.source = TranslationSource::MemoryCache;
        return Some(cached);
    }

    match query_cache(&state.db, key).await {
        Ok(Some(mut cached)) => {
            state.cache.insert(key.to_string(), cached.clone());
            cached.source = TranslationSource::DiskCache;
            Some(cached)
        }
        Ok(None) => None,
        Err(e) => {
            warn!("Failed to read translation cache: {}", e);
            None
        }
    }
}
