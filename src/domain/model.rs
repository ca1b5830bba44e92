use serde::{Deserialize, Serialize};
use std::fmt;

// 翻译模式
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum AppMode {
    Text,
    Document,
}

impl AppMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppMode::Text => "TEXT",
            AppMode::Document => "DOCUMENT",
        }
    }
}

impl fmt::Display for AppMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// 翻译结果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Translation {
    pub input: String,
    pub output: String,
    pub mode: AppMode,
    pub model: String,
    pub source: TranslationSource,
    pub cached_at: Option<i64>,
}

impl Translation {
    pub fn new(input: String, output: String, mode: AppMode, model: String) -> Self {
        Self {
            input,
            output,
            mode,
            model,
            source: TranslationSource::Online,
            cached_at: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.output.trim().is_empty()
    }
}

// 结果来源
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum TranslationSource {
    Online,
    MemoryCache,
    DiskCache,
}

/// Live text translation state: what is typed, what has streamed back so far.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranslationState {
    pub input_text: String,
    pub output_text: String,
    pub is_translating: bool,
    pub error: Option<String>,
}

impl TranslationState {
    pub fn set_input(&mut self, input: impl Into<String>) {
        self.input_text = input.into();
    }

    /// Starts a new request; output and error from the previous one are dropped.
    pub fn begin(&mut self) {
        self.output_text.clear();
        self.error = None;
        self.is_translating = true;
    }

    pub fn push_chunk(&mut self, chunk: &str) {
        self.output_text.push_str(chunk);
    }

    pub fn finish(&mut self) {
        self.is_translating = false;
    }

    pub fn fail(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
        self.is_translating = false;
    }

    /// Empty input: nothing to show, nothing to report.
    pub fn reset_output(&mut self) {
        self.output_text.clear();
        self.error = None;
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Outcome of one document run: the source file, its extracted text and the
/// translation. Progress while the run is in flight is shown by the caller.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DocumentState {
    pub file_name: Option<String>,
    pub file_content: Option<String>,
    pub translated_content: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Docx,
    Text,
}

impl DocumentKind {
    pub fn label(&self) -> &'static str {
        match self {
            DocumentKind::Pdf => "PDF",
            DocumentKind::Docx => "DOCX",
            DocumentKind::Text => "TXT",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_is_concatenation_of_chunks_since_begin() {
        let mut state = TranslationState::default();
        state.set_input("Guten Morgen");
        state.begin();
        state.push_chunk("Good ");
        state.push_chunk("morning");
        state.finish();
        assert_eq!(state.output_text, "Good morning");
        assert!(!state.is_translating);

        state.begin();
        assert!(state.output_text.is_empty());
        assert!(state.is_translating);
        state.push_chunk("Hello");
        assert_eq!(state.output_text, "Hello");
    }

    #[test]
    fn fail_keeps_partial_output_and_records_error() {
        let mut state = TranslationState::default();
        state.begin();
        state.push_chunk("Partial");
        state.fail("boom");
        assert_eq!(state.output_text, "Partial");
        assert_eq!(state.error.as_deref(), Some("boom"));
        assert!(!state.is_translating);

        state.begin();
        assert!(state.error.is_none());
    }

    #[test]
    fn clear_resets_everything() {
        let mut state = TranslationState::default();
        state.set_input("Hallo");
        state.begin();
        state.push_chunk("Hello");
        state.clear();
        assert_eq!(state, TranslationState::default());
    }
}
