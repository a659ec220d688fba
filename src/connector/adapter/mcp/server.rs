use std::sync::Arc;

use rmcp::handler::server::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::tool;
use rmcp::tool_handler;
use rmcp::tool_router;
use rmcp::ErrorData as McpError;
use rmcp::ServerHandler;
use schemars::JsonSchema;
use serde::Deserialize;

use crate::application::AskUsdcodeUseCase;
use crate::domain::{
    CompletionRequest, ExpertType, DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE, DEFAULT_TOP_P,
};

fn default_temperature() -> f32 {
    DEFAULT_TEMPERATURE
}

fn default_top_p() -> f32 {
    DEFAULT_TOP_P
}

fn default_max_tokens() -> u32 {
    DEFAULT_MAX_TOKENS
}

/// Input parameters for the get_usdcode_help tool
#[derive(Debug, Deserialize, JsonSchema)]
pub struct UsdcodeHelpInput {
    /// Your prompt or question
    pub question: String,

    /// Sampling temperature (0-1). Default: 0.1
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Top-p nucleus sampling mass (<=1). Default: 1
    #[serde(default = "default_top_p")]
    pub top_p: f32,

    /// Max tokens to generate (1-2048). Default: 1024
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Expert to use: auto, knowledge, code, or helperfunction. Default: auto
    #[serde(default)]
    pub expert_type: ExpertType,

    /// Stream partial deltas via SSE. Default: false
    #[serde(default)]
    pub stream: bool,
}

/// MCP server exposing the USDCode completion endpoint as a single tool
#[derive(Clone)]
pub struct UsdcodeMcpServer {
    use_case: Arc<AskUsdcodeUseCase>,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl UsdcodeMcpServer {
    pub fn new(use_case: Arc<AskUsdcodeUseCase>) -> Self {
        Self {
            use_case,
            tool_router: Self::tool_router(),
        }
    }

    /// Ask NVIDIA USDCode for help (Isaac Sim scripting, USD, Python/API tips).
    /// Accepts sampling parameters (temperature, top_p, max_tokens), an expert_type
    /// routing hint, and a stream flag. Avoid changing temperature and top_p together.
    #[tool(name = "get_usdcode_help")]
    async fn get_usdcode_help(
        &self,
        params: Parameters<UsdcodeHelpInput>,
    ) -> Result<CallToolResult, McpError> {
        let input = params.0;

        let request = CompletionRequest::new(input.question)
            .with_temperature(input.temperature)
            .with_top_p(input.top_p)
            .with_max_tokens(input.max_tokens)
            .with_expert_type(input.expert_type)
            .with_stream(input.stream);

        let text = self.use_case.execute(request).await.map_err(|e| {
            McpError::internal_error(format!("USDCode completion failed: {}", e), None)
        })?;

        Ok(CallToolResult::success(vec![Content::text(text)]))
    }
}

#[tool_handler]
impl ServerHandler for UsdcodeMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation::from_build_env(),
            instructions: Some(
                "USDCode assistant server. Use the get_usdcode_help tool to ask NVIDIA \
                 USDCode about Isaac Sim scripting, USD, and Python/API usage. Parameters: \
                 temperature (0-1, default 0.1), top_p (<=1, default 1), max_tokens (1-2048, \
                 default 1024), expert_type (auto|knowledge|code|helperfunction; default auto), \
                 stream (boolean; default false)."
                    .into(),
            ),
        }
    }
}
