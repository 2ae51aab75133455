//! CLI command handlers

pub mod archives;
pub mod status;
pub mod tools;

use anyhow::{bail, Context};
use serde_json::Value;

/// Invoke a tool through the server's `/mcp` endpoint and return its text
pub async fn call_tool(
    client: &reqwest::Client,
    server_url: &str,
    tool: &str,
    params: Value,
) -> anyhow::Result<String> {
    let body = serde_json::json!({
        "tool": tool,
        "params": params,
    });

    let resp = client
        .post(format!("{}/mcp", server_url.trim_end_matches('/')))
        .json(&body)
        .send()
        .await
        .with_context(|| format!("failed to reach {server_url}"))?
        .error_for_status()?
        .json::<Value>()
        .await?;

    tool_output(&resp)
}

/// Pull the text out of an `/mcp` response body
fn tool_output(resp: &Value) -> anyhow::Result<String> {
    if resp.get("success").and_then(Value::as_bool) == Some(true) {
        return Ok(resp
            .get("data")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string());
    }

    let error = resp
        .get("error")
        .and_then(Value::as_str)
        .unwrap_or("Error: unknown failure");
    bail!("{error}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_output_success() {
        let resp = serde_json::json!({"success": true, "data": "# 검색 결과"});
        assert_eq!(tool_output(&resp).unwrap(), "# 검색 결과");
    }

    #[test]
    fn test_tool_output_failure() {
        let resp = serde_json::json!({"success": false, "error": "Error: Archive 'x' not found"});
        assert_eq!(
            tool_output(&resp).unwrap_err().to_string(),
            "Error: Archive 'x' not found"
        );
    }
}
