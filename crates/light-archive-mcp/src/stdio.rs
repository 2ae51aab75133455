//! MCP over stdio: newline-delimited JSON-RPC on stdin/stdout.
//!
//! Logs go to stderr; stdout carries protocol messages only.

use std::io;

use serde::Serialize;
use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, error, info};

use crate::protocol::{
    parse_message, ErrorCode, IncomingMessage, JsonRpcError, JsonRpcRequest, JsonRpcResponse,
    ToolCallParams, ToolCallResult, MCP_PROTOCOL_VERSION, SERVER_NAME,
};
use crate::tools::{self, Services, ToolRegistry};

/// Stdio MCP server
pub struct StdioServer {
    services: Services,
    tools: ToolRegistry,
}

impl StdioServer {
    pub fn new(services: Services) -> Self {
        Self {
            services,
            tools: tools::create_tool_registry(),
        }
    }

    /// Serve until stdin closes or Ctrl+C
    pub async fn run(self) -> io::Result<()> {
        let mut reader = BufReader::new(tokio::io::stdin());
        let mut stdout = tokio::io::stdout();
        let mut line = String::new();

        loop {
            line.clear();
            let read = tokio::select! {
                read = reader.read_line(&mut line) => read?,
                _ = tokio::signal::ctrl_c() => {
                    info!("Shutdown signal received");
                    return Ok(());
                }
            };

            if read == 0 {
                info!("stdin closed");
                return Ok(());
            }

            if let Some(reply) = self.handle_line(line.trim_end()).await {
                stdout.write_all(reply.as_bytes()).await?;
                stdout.write_all(b"\n").await?;
                stdout.flush().await?;
            }
        }
    }

    /// Handle one input line, returning the serialized reply if one is due
    pub async fn handle_line(&self, line: &str) -> Option<String> {
        if line.trim().is_empty() {
            return None;
        }

        match parse_message(line) {
            Ok(IncomingMessage::Request(req)) => match self.handle_request(req).await {
                Ok(response) => encode(&response),
                Err(err) => encode(&err),
            },
            Ok(IncomingMessage::Notification(notification)) => {
                debug!(method = %notification.method, "Notification received");
                None
            }
            Err(err) => encode(&err),
        }
    }

    async fn handle_request(&self, req: JsonRpcRequest) -> Result<JsonRpcResponse, JsonRpcError> {
        debug!(id = %req.id, method = %req.method, "Request received");

        let result = match req.method.as_str() {
            "initialize" => json!({
                "protocolVersion": MCP_PROTOCOL_VERSION,
                "capabilities": {"tools": {}},
                "serverInfo": {
                    "name": SERVER_NAME,
                    "version": env!("CARGO_PKG_VERSION"),
                },
            }),
            "tools/list" => json!({ "tools": self.tools.list() }),
            "tools/call" => self.call_tool(&req).await?,
            "ping" => json!({}),
            _ => return Err(JsonRpcError::method_not_found(req.id, &req.method)),
        };

        Ok(JsonRpcResponse::success(req.id, result))
    }

    async fn call_tool(&self, req: &JsonRpcRequest) -> Result<Value, JsonRpcError> {
        let params: ToolCallParams = req
            .params
            .clone()
            .ok_or_else(|| JsonRpcError::invalid_params(req.id.clone(), "Missing tool call params"))
            .and_then(|p| {
                serde_json::from_value(p).map_err(|e| {
                    JsonRpcError::invalid_params(
                        req.id.clone(),
                        format!("Invalid tool call params: {e}"),
                    )
                })
            })?;

        info!(tool = %params.name, "MCP tool invocation");

        let result = match tools::execute_tool(&self.services, &params.name, params.arguments).await
        {
            Ok(text) => ToolCallResult::text(text),
            Err(e) => {
                error!(tool = %params.name, error = %e, "Tool execution failed");
                ToolCallResult::error(tools::error_text(&e))
            }
        };

        serde_json::to_value(result).map_err(|e| {
            JsonRpcError::new(Some(req.id.clone()), ErrorCode::InternalError, e.to_string())
        })
    }
}

fn encode<T: Serialize>(message: &T) -> Option<String> {
    match serde_json::to_string(message) {
        Ok(json) => Some(json),
        Err(e) => {
            error!(error = %e, "Failed to encode response");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn reply(line: &str) -> Value {
        let server = StdioServer::new(Services::default());
        let text = server.handle_line(line).await.unwrap();
        serde_json::from_str(&text).unwrap()
    }

    #[tokio::test]
    async fn test_initialize() {
        let json = reply(
            r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{"protocolVersion":"2024-11-05","capabilities":{}}}"#,
        )
        .await;

        assert_eq!(json["id"], 1);
        assert_eq!(json["result"]["protocolVersion"], "2024-11-05");
        assert_eq!(json["result"]["serverInfo"]["name"], "light-archive-mcp");
    }

    #[tokio::test]
    async fn test_tools_list() {
        let json = reply(r#"{"jsonrpc":"2.0","id":"list","method":"tools/list"}"#).await;

        let tools = json["result"]["tools"].as_array().unwrap();
        assert_eq!(tools.len(), 10);
        assert!(tools.iter().all(|t| t["inputSchema"].is_object()));
    }

    #[tokio::test]
    async fn test_tool_failure_is_error_content() {
        let json = reply(
            r#"{"jsonrpc":"2.0","id":2,"method":"tools/call","params":{"name":"archive_get_archive","arguments":{"archive_id":"x"}}}"#,
        )
        .await;

        assert_eq!(json["result"]["isError"], true);
        assert_eq!(
            json["result"]["content"][0]["text"],
            "Error: Supabase not initialized. Please check environment variables."
        );
    }

    #[tokio::test]
    async fn test_unknown_method() {
        let json = reply(r#"{"jsonrpc":"2.0","id":3,"method":"resources/list"}"#).await;
        assert_eq!(json["error"]["code"], -32601);
        assert_eq!(json["id"], 3);
    }

    #[tokio::test]
    async fn test_missing_call_params() {
        let json = reply(r#"{"jsonrpc":"2.0","id":4,"method":"tools/call"}"#).await;
        assert_eq!(json["error"]["code"], -32602);
    }

    #[tokio::test]
    async fn test_notification_gets_no_reply() {
        let server = StdioServer::new(Services::default());
        let line = r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#;
        assert!(server.handle_line(line).await.is_none());
        assert!(server.handle_line("   ").await.is_none());
    }

    #[tokio::test]
    async fn test_parse_error_reply() {
        let json = reply("{broken").await;
        assert_eq!(json["error"]["code"], -32700);
        assert_eq!(json.get("id"), Some(&Value::Null));
    }
}
