pub mod application;
pub mod connector;
pub mod domain;

pub use application::{AskUsdcodeUseCase, CompletionClient};

pub use connector::{UsdcodeClient, UsdcodeMcpServer, DEFAULT_BASE_URL, USDCODE_MODEL};

pub use domain::{
    CompletionRequest, DomainError, ExpertType, DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE,
    DEFAULT_TOP_P,
};
