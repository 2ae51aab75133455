//! Tools command

use crate::OutputFormat;
use serde_json::Value;

pub async fn handle(server_url: &str, format: OutputFormat) -> anyhow::Result<()> {
    let client = reqwest::Client::new();

    let resp = client
        .get(format!("{}/tools", server_url.trim_end_matches('/')))
        .send()
        .await?
        .error_for_status()?
        .json::<Value>()
        .await?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&resp)?),
        OutputFormat::Markdown => println!("{}", render(&resp)),
    }

    Ok(())
}

fn render(resp: &Value) -> String {
    let tools = resp
        .get("tools")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();

    let mut lines = vec![format!("# Tools ({})", tools.len()), String::new()];
    for tool in tools {
        let name = tool.get("name").and_then(Value::as_str).unwrap_or("?");
        let description = tool.get("description").and_then(Value::as_str).unwrap_or("");
        let read_only = tool
            .pointer("/annotations/readOnlyHint")
            .and_then(Value::as_bool)
            .unwrap_or(false);
        let marker = if read_only { "" } else { " (writes)" };
        lines.push(format!("- `{name}`{marker}: {description}"));
    }

    lines.join("\n")
}
