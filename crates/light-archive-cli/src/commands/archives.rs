//! Archive commands

use serde_json::Value;

use crate::{Commands, OutputFormat};

/// Map a command onto its tool name and arguments
fn tool_request(command: Commands, format: OutputFormat) -> Option<(&'static str, Value)> {
    let response_format = format.as_str();

    let request = match command {
        Commands::Search { query, category, limit, offset } => {
            let mut params = serde_json::json!({
                "query": query,
                "limit": limit,
                "offset": offset,
                "response_format": response_format,
            });
            if let Some(c) = category {
                params["category"] = Value::String(c);
            }
            ("archive_search_archives", params)
        }

        Commands::Get { id } => (
            "archive_get_archive",
            serde_json::json!({"archive_id": id, "response_format": response_format}),
        ),

        Commands::List { category, status, limit, offset } => {
            let mut params = serde_json::json!({
                "limit": limit,
                "offset": offset,
                "response_format": response_format,
            });
            if let Some(c) = category {
                params["category"] = Value::String(c);
            }
            if let Some(s) = status {
                params["status"] = Value::String(s.to_lowercase());
            }
            ("archive_list_archives", params)
        }

        Commands::Related { id, limit } => (
            "archive_find_related",
            serde_json::json!({
                "archive_id": id,
                "limit": limit,
                "response_format": response_format,
            }),
        ),

        Commands::UploadImage { path, filename } => {
            let mut params = serde_json::json!({"image_path": path});
            if let Some(f) = filename {
                params["filename"] = Value::String(f);
            }
            ("archive_upload_image", params)
        }

        Commands::Tools | Commands::Status => return None,
    };

    Some(request)
}

pub async fn handle(server_url: &str, command: Commands, format: OutputFormat) -> anyhow::Result<()> {
    let Some((tool, params)) = tool_request(command, format) else {
        return Ok(());
    };

    let client = reqwest::Client::new();
    let text = super::call_tool(&client, server_url, tool, params).await?;
    println!("{text}");

    Ok(())
}
