//! GeminiRankingOracle - ranking oracle backed by the Gemini REST API.
//!
//! The API key comes from `secret.json` (or `GEMINI_API_KEY`); model and
//! timeout come from `config.toml`.

use std::time::Duration;

use aibro_core::catalog::Announcement;
use aibro_core::oracle::{OracleError, RankingOracle, RankingRecord};
use aibro_core::profile::UserProfile;
use aibro_infrastructure::config::{AppConfig, SecretConfig};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::payload::{parse_rankings, ranking_response_schema};
use crate::prompts::{
    RANKING_SYSTEM_INSTRUCTION, TITLE_SYSTEM_INSTRUCTION, render_ranking_prompt,
    render_title_prompt,
};

const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Oracle implementation that talks to the Gemini HTTP API.
#[derive(Clone)]
pub struct GeminiRankingOracle {
    client: Client,
    api_key: String,
    model: String,
}

impl std::fmt::Debug for GeminiRankingOracle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiRankingOracle")
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl GeminiRankingOracle {
    /// Creates an oracle with the provided API key, model and request timeout.
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, OracleError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| OracleError::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            api_key: api_key.into(),
            model: model.into(),
        })
    }

    /// Builds an oracle from the loaded configuration files.
    ///
    /// A model name in `secret.json` takes precedence over `config.toml`.
    pub fn from_config(config: &AppConfig, secret: &SecretConfig) -> Result<Self, OracleError> {
        let api_key = secret.gemini_api_key().ok_or_else(|| {
            OracleError::Config(
                "Gemini API key not found; set GEMINI_API_KEY or add it to secret.json".to_string(),
            )
        })?;
        let model = secret
            .gemini_model()
            .unwrap_or(config.oracle.model.as_str())
            .to_string();
        Self::new(
            api_key,
            model,
            Duration::from_secs(config.oracle.timeout_secs),
        )
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    async fn send_request(&self, body: &GenerateContentRequest) -> Result<String, OracleError> {
        let url = format!("{}/{}:generateContent", BASE_URL, self.model);

        let response = self
            .client
            .post(url)
            .header("x-goog-api-key", &self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|err| OracleError::Request {
                status_code: None,
                message: format!("Gemini API request failed: {err}"),
                retryable: err.is_connect() || err.is_timeout(),
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read Gemini error body".to_string());
            return Err(map_http_error(status, body_text));
        }

        let parsed: GenerateContentResponse = response.json().await.map_err(|err| {
            OracleError::MalformedPayload(format!("Failed to parse Gemini response: {err}"))
        })?;

        extract_text_response(parsed)
    }
}

#[async_trait]
impl RankingOracle for GeminiRankingOracle {
    async fn rank(
        &self,
        profile: &UserProfile,
        candidates: &[Announcement],
    ) -> Result<Vec<RankingRecord>, OracleError> {
        let prompt = render_ranking_prompt(profile, candidates)?;
        let request = GenerateContentRequest::new(prompt, RANKING_SYSTEM_INSTRUCTION)
            .with_json_schema(ranking_response_schema());

        tracing::debug!(model = %self.model, candidates = candidates.len(), "Requesting ranking");
        let text = self.send_request(&request).await?;
        let records = parse_rankings(&text)?;
        tracing::info!(returned = records.len(), "Ranking received");
        Ok(records)
    }

    async fn summarize_title(&self, text: &str) -> Result<String, OracleError> {
        let prompt = render_title_prompt(text)?;
        let request = GenerateContentRequest::new(prompt, TITLE_SYSTEM_INSTRUCTION);
        let title = self.send_request(&request).await?;
        Ok(title.trim().to_string())
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

impl GenerateContentRequest {
    fn new(prompt: String, system_instruction: &str) -> Self {
        Self {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![Part { text: prompt }],
            }],
            system_instruction: Some(Content {
                role: "system".to_string(),
                parts: vec![Part {
                    text: system_instruction.to_string(),
                }],
            }),
            generation_config: None,
        }
    }

    /// Requests a JSON response conforming to `schema`.
    fn with_json_schema(mut self, schema: Value) -> Self {
        self.generation_config = Some(GenerationConfig {
            response_mime_type: "application/json".to_string(),
            response_schema: schema,
        });
        self
    }
}

#[derive(Debug, Serialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: String,
    response_schema: Value,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<ContentResponse>,
}

#[derive(Deserialize)]
struct ContentResponse {
    parts: Vec<PartResponse>,
}

#[derive(Deserialize)]
struct PartResponse {
    text: Option<String>,
}

#[derive(Deserialize)]
struct ErrorWrapper {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
    status: Option<String>,
}

fn extract_text_response(response: GenerateContentResponse) -> Result<String, OracleError> {
    response
        .candidates
        .and_then(|mut candidates| {
            if candidates.is_empty() {
                None
            } else {
                Some(candidates.swap_remove(0))
            }
        })
        .and_then(|candidate| candidate.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect::<String>()
        })
        .filter(|text| !text.trim().is_empty())
        .ok_or(OracleError::EmptyResponse)
}

fn map_http_error(status: StatusCode, body: String) -> OracleError {
    let message = serde_json::from_str::<ErrorWrapper>(&body)
        .map(|wrapper| {
            let status_text = wrapper.error.status.unwrap_or_default();
            let msg = wrapper.error.message.unwrap_or_else(|| body.clone());
            if status_text.is_empty() {
                msg
            } else {
                format!("{status_text}: {msg}")
            }
        })
        .unwrap_or_else(|_| body.clone());

    let retryable = matches!(
        status,
        StatusCode::TOO_MANY_REQUESTS
            | StatusCode::INTERNAL_SERVER_ERROR
            | StatusCode::BAD_GATEWAY
            | StatusCode::SERVICE_UNAVAILABLE
            | StatusCode::GATEWAY_TIMEOUT
    );

    OracleError::Request {
        status_code: Some(status.as_u16()),
        message,
        retryable,
    }
}
