use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Default sampling temperature.
pub const DEFAULT_TEMPERATURE: f32 = 0.1;
/// Default nucleus sampling mass.
pub const DEFAULT_TOP_P: f32 = 1.0;
/// Default generation budget; the API accepts 1-2048.
pub const DEFAULT_MAX_TOKENS: u32 = 1024;

/// Upstream routing hint selecting which USDCode expert answers the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ExpertType {
    #[default]
    Auto,
    Knowledge,
    Code,
    HelperFunction,
}

impl ExpertType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Knowledge => "knowledge",
            Self::Code => "code",
            Self::HelperFunction => "helperfunction",
        }
    }
}

impl std::fmt::Display for ExpertType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single completion request, constructed fresh per tool call.
///
/// Numeric fields are forwarded as-is; the upstream API is the authority on
/// rejecting out-of-range values, so no local clamping is performed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionRequest {
    question: String,
    temperature: f32,
    top_p: f32,
    max_tokens: u32,
    expert_type: ExpertType,
    stream: bool,
}

impl CompletionRequest {
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            temperature: DEFAULT_TEMPERATURE,
            top_p: DEFAULT_TOP_P,
            max_tokens: DEFAULT_MAX_TOKENS,
            expert_type: ExpertType::Auto,
            stream: false,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_top_p(mut self, top_p: f32) -> Self {
        self.top_p = top_p;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_expert_type(mut self, expert_type: ExpertType) -> Self {
        self.expert_type = expert_type;
        self
    }

    pub fn with_stream(mut self, stream: bool) -> Self {
        self.stream = stream;
        self
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn temperature(&self) -> f32 {
        self.temperature
    }

    pub fn top_p(&self) -> f32 {
        self.top_p
    }

    pub fn max_tokens(&self) -> u32 {
        self.max_tokens
    }

    pub fn expert_type(&self) -> ExpertType {
        self.expert_type
    }

    pub fn stream(&self) -> bool {
        self.stream
    }
}
