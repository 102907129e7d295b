//! Gemini summarizer adapter
//!
//! Calls `models/{model}:generateContent` and extracts the analysis object
//! from the first candidate's text.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{build_prompt, parse_analysis_text, Summarizer, SummarizerError};

/// Default API root
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default model
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";

/// Connection settings for [`GeminiSummarizer`]
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// API key (sent as the `key` query parameter)
    pub api_key: String,
    /// Model name
    pub model: String,
    /// API root, without trailing `/models`
    pub base_url: String,
    /// Whole-request timeout
    pub timeout: Duration,
}

impl GeminiConfig {
    /// Config with default model, endpoint and a 20 second timeout
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_GEMINI_MODEL.to_string(),
            base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            timeout: Duration::from_secs(20),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<RequestContent<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl GenerateResponse {
    fn first_text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .next()?
            .text
    }
}

/// Summarizer backed by the Gemini API
pub struct GeminiSummarizer {
    client: reqwest::Client,
    config: GeminiConfig,
}

impl GeminiSummarizer {
    pub fn new(config: GeminiConfig) -> Self {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(config.timeout)
            .build()
            .unwrap_or_default();
        Self { client, config }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }
}

#[async_trait]
impl Summarizer for GeminiSummarizer {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn request_analysis(
        &self,
        title: &str,
        content: &str,
        time_spent_secs: u64,
    ) -> Result<Value, SummarizerError> {
        let prompt = build_prompt(title, content, time_spent_secs);
        let request = GenerateRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: &prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: 0.3,
                max_output_tokens: 500,
            },
        };

        let response = self
            .client
            .post(self.endpoint())
            .query(&[("key", self.config.api_key.as_str())])
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SummarizerError::Timeout(self.config.timeout)
                } else {
                    SummarizerError::Network(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SummarizerError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|e| SummarizerError::MalformedResponse(e.to_string()))?;

        let text = body
            .first_text()
            .ok_or_else(|| SummarizerError::MalformedResponse("no candidates in response".into()))?;

        tracing::debug!(chars = text.len(), "Gemini analysis received");
        parse_analysis_text(&text)
    }
}
