//! MCP Server implementation (HTTP transport)

use std::{net::SocketAddr, sync::Arc};

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info, warn};

use crate::tools::{self, McpTool, Services, ToolRegistry};

/// MCP Server state
pub struct McpServer {
    services: Services,
    tools: ToolRegistry,
}

impl McpServer {
    pub fn new(services: Services) -> Self {
        Self {
            services,
            tools: tools::create_tool_registry(),
        }
    }

    pub async fn run(self, addr: SocketAddr) -> anyhow::Result<()> {
        let app = router(Arc::new(AppState {
            services: self.services,
            tools: self.tools,
        }));

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        Ok(())
    }
}

struct AppState {
    services: Services,
    tools: ToolRegistry,
}

fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/ping", get(ping_handler))
        .route("/mcp", post(mcp_handler))
        .route("/tools", get(list_tools_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to install CTRL+C signal handler");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

// ============================================================================
// Handlers
// ============================================================================

async fn health_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let llm = state.services.llm.is_some();

    let Some(store) = state.services.store.as_deref() else {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(serde_json::json!({
                "status": "unhealthy",
                "supabase": "not configured",
                "openai": llm,
            })),
        );
    };

    match store.health_check().await {
        Ok(true) => (
            StatusCode::OK,
            Json(serde_json::json!({"status": "healthy", "supabase": "ok", "openai": llm})),
        ),
        Ok(false) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(serde_json::json!({"status": "unhealthy", "supabase": "unreachable", "openai": llm})),
        ),
        Err(e) => {
            warn!(error = %e, "Health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(serde_json::json!({"status": "unhealthy", "supabase": e.to_string(), "openai": llm})),
            )
        }
    }
}

async fn ping_handler() -> impl IntoResponse {
    Json(serde_json::json!({"pong": true}))
}

/// List available MCP tools
async fn list_tools_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let tools: Vec<&McpTool> = state.tools.list();
    Json(serde_json::json!({
        "tools": tools
    }))
}

/// Main MCP endpoint for tool invocation
async fn mcp_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<McpRequest>,
) -> impl IntoResponse {
    info!(tool = %request.tool, "MCP tool invocation");

    match tools::execute_tool(&state.services, &request.tool, request.params).await {
        Ok(result) => (
            StatusCode::OK,
            Json(McpResponse {
                success: true,
                data: Some(result),
                error: None,
            }),
        ),
        Err(e) => {
            error!(tool = %request.tool, error = %e, "Tool execution failed");
            (
                StatusCode::OK,
                Json(McpResponse {
                    success: false,
                    data: None,
                    error: Some(tools::error_text(&e)),
                }),
            )
        }
    }
}

#[derive(Debug, Deserialize)]
struct McpRequest {
    tool: String,
    #[serde(default)]
    params: serde_json::Value,
}

#[derive(Debug, Serialize)]
struct McpResponse {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tower::ServiceExt;

    fn app() -> Router {
        router(Arc::new(AppState {
            services: Services::default(),
            tools: tools::create_tool_registry(),
        }))
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_ping() {
        let response = app()
            .oneshot(Request::get("/ping").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, serde_json::json!({"pong": true}));
    }

    #[tokio::test]
    async fn test_health_without_supabase() {
        let response = app()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let json = body_json(response).await;
        assert_eq!(json["status"], "unhealthy");
        assert_eq!(json["supabase"], "not configured");
    }

    #[tokio::test]
    async fn test_list_tools() {
        let response = app()
            .oneshot(Request::get("/tools").body(Body::empty()).unwrap())
            .await
            .unwrap();

        let json = body_json(response).await;
        assert_eq!(json["tools"].as_array().unwrap().len(), 10);
        assert_eq!(json["tools"][0]["name"], "archive_create_archive");
    }

    #[tokio::test]
    async fn test_mcp_tool_error() {
        let request = Request::post("/mcp")
            .header("content-type", "application/json")
            .body(Body::from(
                r#"{"tool":"archive_find_related","params":{"archive_id":"x"}}"#,
            ))
            .unwrap();

        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["success"], false);
        assert!(json.get("data").is_none());
        assert_eq!(
            json["error"],
            "Error: Supabase not initialized. Please check environment variables."
        );
    }

    #[tokio::test]
    async fn test_mcp_invalid_params() {
        let request = Request::post("/mcp")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"tool":"archive_search_archives","params":{"query":"x"}}"#))
            .unwrap();

        let json = body_json(app().oneshot(request).await.unwrap()).await;
        assert_eq!(json["success"], false);
        assert!(json["error"]
            .as_str()
            .unwrap()
            .starts_with("Error: Invalid parameter: query"));
    }
}
