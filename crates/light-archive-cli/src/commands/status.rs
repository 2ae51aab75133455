//! Status command

use crate::OutputFormat;
use serde_json::Value;

pub async fn handle(server_url: &str, format: OutputFormat) -> anyhow::Result<()> {
    let client = reqwest::Client::new();
    let base = server_url.trim_end_matches('/');

    // 503 still carries a JSON body describing what is down
    let health = client
        .get(format!("{base}/health"))
        .send()
        .await?
        .json::<Value>()
        .await?;

    let tools = client
        .get(format!("{base}/tools"))
        .send()
        .await?
        .json::<Value>()
        .await?;
    let tool_count = tools
        .get("tools")
        .and_then(Value::as_array)
        .map_or(0, Vec::len);

    match format {
        OutputFormat::Json => {
            let resp = serde_json::json!({
                "server": base,
                "health": health,
                "tool_count": tool_count,
            });
            println!("{}", serde_json::to_string_pretty(&resp)?);
        }
        OutputFormat::Markdown => println!("{}", render(base, &health, tool_count)),
    }

    Ok(())
}

fn render(server_url: &str, health: &Value, tool_count: usize) -> String {
    let field = |name: &str| match health.get(name) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Bool(true)) => "configured".to_string(),
        Some(Value::Bool(false)) => "not configured".to_string(),
        _ => "unknown".to_string(),
    };

    format!(
        "# Light Archive Status\n\n\
         **Server**: {server_url}\n\
         **Status**: {}\n\
         **Supabase**: {}\n\
         **OpenAI**: {}\n\
         **Tools**: {tool_count}",
        field("status"),
        field("supabase"),
        field("openai"),
    )
}
