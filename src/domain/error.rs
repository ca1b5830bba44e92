use thiserror::Error;

/// Shown when a text translation fails for any reason other than a missing key.
pub const TEXT_FAILURE_MESSAGE: &str =
    "Translation failed. Please check your connection and try again.";
/// Shown when the model call behind a document translation fails.
pub const DOCUMENT_FAILURE_MESSAGE: &str = "Failed to process document translation.";
/// Shown when a document cannot be read or its text cannot be extracted.
pub const EXTRACTION_FAILURE_MESSAGE: &str =
    "Error processing document. Ensure it is a valid PDF, DOCX, or TXT file.";
/// Shown when no usable API key is available.
pub const AUTH_REQUIRED_MESSAGE: &str =
    "AUTHENTICATION_REQUIRED: Set GEMINI_API_KEY or configure gemini.api_key.";

#[derive(Error, Debug)]
pub enum TranslateError {
    #[error("Database error: {0}")]
    Database(#[from] tokio_rusqlite::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("API_KEY_MISSING")]
    MissingApiKey,

    #[error("API Error: {0}")]
    Api(String),

    #[error("Extraction error: {0}")]
    Extraction(String),

    #[error("Document too large: {size} bytes (limit {limit})")]
    TooLarge { size: u64, limit: u64 },

    /// A failure already rendered for the user.
    #[error("{0}")]
    Translation(String),
}

impl TranslateError {
    /// Errors that come from reading or parsing an input document.
    pub fn is_extraction(&self) -> bool {
        matches!(
            self,
            TranslateError::Io(_)
                | TranslateError::Zip(_)
                | TranslateError::Pdf(_)
                | TranslateError::Extraction(_)
                | TranslateError::TooLarge { .. }
        )
    }

    /// The message a user should see for this error.
    pub fn user_message(&self) -> String {
        match self {
            TranslateError::MissingApiKey => AUTH_REQUIRED_MESSAGE.to_string(),
            TranslateError::Translation(msg) => msg.clone(),
            TranslateError::TooLarge { limit, .. } => format!(
                "{} (max {} MB)",
                EXTRACTION_FAILURE_MESSAGE,
                limit / (1024 * 1024)
            ),
            e if e.is_extraction() => EXTRACTION_FAILURE_MESSAGE.to_string(),
            _ => TEXT_FAILURE_MESSAGE.to_string(),
        }
    }
}
