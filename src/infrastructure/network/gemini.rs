use crate::domain::error::TranslateError;
use crate::domain::prompt::Prompt;
use crate::domain::traits::{ChunkSink, Translator};
use crate::infrastructure::config::GeminiConfig;
use crate::infrastructure::network::sse::SseDecoder;
use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

// Gemini API request structures
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    system_instruction: SystemInstruction<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Serialize, Debug)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Serialize, Debug)]
struct SystemInstruction<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Serialize, Debug)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    thinking_config: Option<ThinkingConfig>,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct ThinkingConfig {
    thinking_budget: u32,
}

// Gemini API response structures
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
    // Errors raised after a stream has started arrive as a data event
    error: Option<ApiErrorBody>,
}

#[derive(Deserialize, Debug)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize, Debug)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize, Debug)]
struct ResponsePart {
    text: Option<String>,
    #[serde(default)]
    thought: bool,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Deserialize, Debug)]
struct ErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Deserialize, Debug)]
struct ApiErrorBody {
    #[serde(default)]
    code: u16,
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: String,
}

impl ApiErrorBody {
    fn describe(&self) -> String {
        format!("Gemini API Error {} {}: {}", self.code, self.status, self.message)
    }
}

impl GenerateResponse {
    /// Text of the first candidate, thought parts excluded.
    fn text(&self) -> Result<String, TranslateError> {
        if let Some(error) = &self.error {
            return Err(TranslateError::Api(error.describe()));
        }
        if let Some(reason) = self
            .prompt_feedback
            .as_ref()
            .and_then(|f| f.block_reason.as_deref())
        {
            return Err(TranslateError::Api(format!("Prompt blocked: {}", reason)));
        }

        let text = self
            .candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter(|p| !p.thought)
                    .filter_map(|p| p.text.as_deref())
                    .collect::<String>()
            })
            .unwrap_or_default();
        Ok(text)
    }
}

/// Gemini `generateContent` client
pub struct GeminiClient {
    client: Client,
    config: GeminiConfig,
}

impl GeminiClient {
    pub fn new(client: Client, config: GeminiConfig) -> Self {
        Self { client, config }
    }

    fn endpoint(&self, method: &str) -> String {
        format!(
            "{}/v1beta/models/{}:{}",
            self.config.base_url.trim_end_matches('/'),
            self.config.model,
            method
        )
    }

    fn build_body<'a>(prompt: &'a Prompt, text: &'a str) -> GenerateRequest<'a> {
        let generation_config = if prompt.temperature.is_some() || prompt.thinking_budget.is_some()
        {
            Some(GenerationConfig {
                temperature: prompt.temperature,
                thinking_config: prompt
                    .thinking_budget
                    .map(|thinking_budget| ThinkingConfig { thinking_budget }),
            })
        } else {
            None
        };

        GenerateRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![RequestPart { text }],
            }],
            system_instruction: SystemInstruction {
                parts: vec![RequestPart {
                    text: prompt.system_instruction,
                }],
            },
            generation_config,
        }
    }

    async fn send(
        &self,
        method: &str,
        prompt: &Prompt,
        text: &str,
    ) -> Result<reqwest::Response, TranslateError> {
        let api_key = self
            .config
            .resolve_api_key()
            .ok_or(TranslateError::MissingApiKey)?;

        let mut request = self
            .client
            .post(self.endpoint(method))
            .timeout(std::time::Duration::from_secs(self.config.timeout_secs))
            .header("x-goog-api-key", api_key)
            .json(&Self::build_body(prompt, text));
        if method.starts_with("stream") {
            request = request.query(&[("alt", "sse")]);
        }

        debug!(
            model = %self.config.model,
            mode = %prompt.mode,
            chars = text.chars().count(),
            "sending {} request",
            method
        );

        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(map_api_error(status, &body))
    }
}

fn map_api_error(status: StatusCode, body: &str) -> TranslateError {
    let parsed = serde_json::from_str::<ErrorEnvelope>(body).ok();
    warn!(%status, "Gemini API error: {}", body);

    let key_rejected = matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN)
        || parsed
            .as_ref()
            .map(|e| e.error.status == "API_KEY_INVALID" || e.error.message.contains("API key"))
            .unwrap_or(false);
    if key_rejected {
        return TranslateError::MissingApiKey;
    }

    match parsed {
        Some(envelope) => TranslateError::Api(envelope.error.describe()),
        None => TranslateError::Api(format!("Gemini API Error {}", status)),
    }
}

/// Decode one streamed payload, fold it into `full_text` and relay it.
fn relay_payload(
    payload: &str,
    full_text: &mut String,
    on_chunk: &mut ChunkSink<'_>,
) -> Result<(), TranslateError> {
    let response: GenerateResponse = serde_json::from_str(payload)?;
    let chunk = response.text()?;
    if !chunk.is_empty() {
        full_text.push_str(&chunk);
        on_chunk(&chunk);
    }
    Ok(())
}

#[async_trait]
impl Translator for GeminiClient {
    fn model(&self) -> &str {
        &self.config.model
    }

    async fn generate(&self, prompt: &Prompt, text: &str) -> Result<String, TranslateError> {
        let response = self
            .send("generateContent", prompt, text)
            .await?
            .json::<GenerateResponse>()
            .await?;
        response.text()
    }

    async fn generate_stream(
        &self,
        prompt: &Prompt,
        text: &str,
        on_chunk: &mut ChunkSink<'_>,
    ) -> Result<String, TranslateError> {
        let response = self.send("streamGenerateContent", prompt, text).await?;

        let mut decoder = SseDecoder::new();
        let mut full_text = String::new();
        let mut stream = response.bytes_stream();

        while let Some(item) = stream.next().await {
            let bytes = item.map_err(TranslateError::Http)?;
            for payload in decoder.push(&bytes) {
                relay_payload(&payload, &mut full_text, on_chunk)?;
            }
        }
        if let Some(payload) = decoder.finish() {
            relay_payload(&payload, &mut full_text, on_chunk)?;
        }

        debug!(chars = full_text.chars().count(), "stream complete");
        Ok(full_text)
    }
}
