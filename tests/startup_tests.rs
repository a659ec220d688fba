//! Startup behavior of the usdcode-mcp binary.

use std::process::{Command, Stdio};

#[test]
fn missing_api_key_exits_non_zero_before_serving() {
    let output = Command::new(env!("CARGO_BIN_EXE_usdcode-mcp"))
        .env_remove("NVIDIA_API_KEY")
        .stdin(Stdio::null())
        .output()
        .expect("binary should run");

    assert!(
        !output.status.success(),
        "server must refuse to start without NVIDIA_API_KEY"
    );
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("NVIDIA_API_KEY"),
        "diagnostic should name the missing variable, got: {stderr}"
    );
}
