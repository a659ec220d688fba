use async_trait::async_trait;
use futures_util::StreamExt;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::application::CompletionClient;
use crate::domain::{CompletionRequest, DomainError};

/// Hosted USDCode endpoint (OpenAI-compatible chat completions).
pub const DEFAULT_BASE_URL: &str = "https://integrate.api.nvidia.com/v1";
const COMPLETIONS_PATH: &str = "/chat/completions";
/// Fixed model identifier behind the `get_usdcode_help` tool.
pub const USDCODE_MODEL: &str = "nvidia/usdcode-llama-3.1-70b-instruct";

#[derive(serde::Serialize)]
struct ApiRequest<'a> {
    model: &'a str,
    messages: Vec<ApiMessage<'a>>,
    temperature: f32,
    top_p: f32,
    max_tokens: u32,
    expert_type: &'a str,
    stream: bool,
}

#[derive(serde::Serialize)]
struct ApiMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// Minimal subset of the chat-completions response we care about.
#[derive(Deserialize)]
struct ApiResponse {
    #[serde(default)]
    choices: Vec<ApiChoice>,
}

#[derive(Deserialize)]
struct ApiChoice {
    #[serde(default)]
    message: ApiResponseMessage,
}

#[derive(Deserialize, Default)]
struct ApiResponseMessage {
    content: Option<String>,
}

/// One incremental SSE chunk of a streamed completion.
#[derive(Deserialize)]
struct StreamChunk {
    #[serde(default)]
    choices: Vec<StreamChoice>,
}

#[derive(Deserialize)]
struct StreamChoice {
    #[serde(default)]
    delta: StreamDelta,
}

#[derive(Deserialize, Default)]
struct StreamDelta {
    content: Option<String>,
}

/// HTTP client for the NVIDIA USDCode chat-completions API.
///
/// Implements [`CompletionClient`] so higher-level components (e.g. the
/// `AskUsdcodeUseCase`) stay decoupled from transport and serialization
/// details.
///
/// **API key**: read from the `NVIDIA_API_KEY` environment variable at
/// construction time; [`UsdcodeClient::from_env`] returns `None` when absent.
///
/// **Base URL**: defaults to `https://integrate.api.nvidia.com/v1`.  Override
/// with `NVIDIA_BASE_URL` to target any OpenAI-compatible server — e.g. a
/// locally running stub during tests.
pub struct UsdcodeClient {
    client: reqwest::Client,
    api_key: String,
    model: String,
    /// Full endpoint URL (base + COMPLETIONS_PATH).
    url: String,
}

impl UsdcodeClient {
    /// Create a new client with an explicit API key, model, and endpoint URL.
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        let base: String = base_url.into();
        let url = format!("{}{}", base.trim_end_matches('/'), COMPLETIONS_PATH);
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            model: model.into(),
            url,
        }
    }

    /// Convenience constructor that reads configuration from the environment:
    /// - `NVIDIA_API_KEY`  — required; returns `None` when absent
    /// - `NVIDIA_BASE_URL` — optional; defaults to the hosted endpoint
    /// - `NVIDIA_MODEL`    — optional; defaults to the USDCode model
    pub fn from_env() -> Option<Self> {
        let key = std::env::var("NVIDIA_API_KEY").ok()?;
        let base =
            std::env::var("NVIDIA_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let model = std::env::var("NVIDIA_MODEL").unwrap_or_else(|_| USDCODE_MODEL.to_string());
        Some(Self::new(key, model, base))
    }

    fn build_request<'a>(&'a self, request: &'a CompletionRequest) -> ApiRequest<'a> {
        ApiRequest {
            model: &self.model,
            messages: vec![ApiMessage {
                role: "user",
                content: request.question(),
            }],
            temperature: request.temperature(),
            top_p: request.top_p(),
            max_tokens: request.max_tokens(),
            expert_type: request.expert_type().as_str(),
            stream: request.stream(),
        }
    }

    async fn send(&self, payload: &ApiRequest<'_>) -> Result<reqwest::Response, DomainError> {
        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(payload)
            .send()
            .await
            .map_err(|e| DomainError::transport(format!("UsdcodeClient: request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!("UsdcodeClient: API returned {status}: {body}");
            return Err(DomainError::upstream(format!(
                "UsdcodeClient: API returned {status}"
            )));
        }

        Ok(response)
    }
}

#[async_trait]
impl CompletionClient for UsdcodeClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<Option<String>, DomainError> {
        let payload = self.build_request(request);
        let response = self.send(&payload).await?;

        let api_response: ApiResponse = response.json().await.map_err(|e| {
            DomainError::upstream(format!("UsdcodeClient: failed to parse response: {e}"))
        })?;

        Ok(api_response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content))
    }

    async fn complete_stream(&self, request: &CompletionRequest) -> Result<String, DomainError> {
        let payload = self.build_request(request);
        let response = self.send(&payload).await?;

        // Accumulate `choices[0].delta.content` fragments in delivery order.
        // Chunk boundaries are not line boundaries, so buffer until a full
        // SSE line is available.
        let mut stream = response.bytes_stream();
        let mut buffer = String::new();
        let mut text = String::new();

        'receive: while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| {
                DomainError::transport(format!("UsdcodeClient: failed to read stream chunk: {e}"))
            })?;
            buffer.push_str(&String::from_utf8_lossy(&chunk));

            while let Some(newline) = buffer.find('\n') {
                let line = buffer[..newline].trim().to_string();
                buffer.drain(..=newline);

                // Skip blank keep-alive lines and non-data fields
                let Some(data) = line.strip_prefix("data: ") else {
                    continue;
                };

                if data == "[DONE]" {
                    break 'receive;
                }

                match serde_json::from_str::<StreamChunk>(data) {
                    Ok(parsed) => {
                        if let Some(delta) = parsed
                            .choices
                            .into_iter()
                            .next()
                            .and_then(|choice| choice.delta.content)
                        {
                            if !delta.is_empty() {
                                text.push_str(&delta);
                            }
                        }
                    }
                    Err(e) => {
                        // Skip malformed lines rather than aborting the stream
                        debug!("UsdcodeClient: skipping malformed stream line: {e}");
                    }
                }
            }
        }

        Ok(text)
    }
}
