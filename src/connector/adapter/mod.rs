pub mod mcp;
mod usdcode_client;

pub use mcp::*;
pub use usdcode_client::*;
