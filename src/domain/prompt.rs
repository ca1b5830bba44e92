// System instructions sent with every request
use crate::domain::model::AppMode;
use crate::infrastructure::config::GeminiConfig;

const TEXT_INSTRUCTION: &str = "You are a professional German-to-English translator.
Maintain a formal, professional tone.
Preserve all structural formatting like bullet points, numbering, and headers.
If the text looks like a legal or technical document, use appropriate terminology.
Your output should ONLY be the translated English text.";

const DOCUMENT_INSTRUCTION: &str = "You are an expert Document Architect and Translator.
Your goal is to translate a German document into English while maintaining a \"Visual Mirror\" of the original layout.

RULES:
1. PHYSICAL ALIGNMENT: Use whitespace, tabs, and line breaks to mimic the original document's spatial arrangement.
2. HEADERS: Use Markdown headers (# ## ###) that correspond to the visual weight of the original headers.
3. LISTS/TABLES: Preserve every bullet point and table structure exactly.
4. TERMINOLOGY: Use high-level professional English (e.g., in business or legal contexts).
5. NO METADATA: Do not add any \"Translated by\" or \"Page X\" notes unless they were in the source.

The result must look clean, professional, and ready for official submission.";

#[derive(Debug, Clone, PartialEq)]
pub struct Prompt {
    pub mode: AppMode,
    pub system_instruction: &'static str,
    pub temperature: Option<f32>,
    pub thinking_budget: Option<u32>,
}

impl Prompt {
    /// Default generation settings; the model picks its own temperature.
    pub fn text() -> Self {
        Self {
            mode: AppMode::Text,
            system_instruction: TEXT_INSTRUCTION,
            temperature: None,
            thinking_budget: None,
        }
    }

    /// Low temperature keeps the layout stable between runs.
    pub fn document(config: &GeminiConfig) -> Self {
        Self {
            mode: AppMode::Document,
            system_instruction: DOCUMENT_INSTRUCTION,
            temperature: Some(config.document_temperature),
            thinking_budget: Some(config.document_thinking_budget),
        }
    }

    pub fn for_mode(mode: AppMode, config: &GeminiConfig) -> Self {
        match mode {
            AppMode::Text => Self::text(),
            AppMode::Document => Self::document(config),
        }
    }
}
