//! HTTP transport implementation.
//!
//! Two faces on one listener:
//! - one REST route per tool (GET for argument-less tools, POST with a JSON
//!   body otherwise), each answering with the `{success, data, error}`
//!   envelope
//! - MCP JSON-RPC 2.0 over `POST /mcp` for clients that speak the protocol
//!   but cannot use stdio
//!
//! Status codes: 200 for every envelope except schema failures (422). A body
//! that is not JSON at all is rejected by axum's extractor before any tool
//! code runs.

use axum::{
    Json, Router,
    extract::State,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, instrument, warn};

use super::{TransportError, TransportResult, config::HttpConfig};
use crate::core::McpServer;
use crate::domains::tools::{ToolKind, ToolResult};

const PROTOCOL_VERSION: &str = "2024-11-05";

/// REST path for each tool.
pub fn route_path(kind: ToolKind) -> &'static str {
    match kind {
        ToolKind::Echo => "/echo",
        ToolKind::Add => "/add",
        ToolKind::ReadFile => "/read-file",
        ToolKind::WriteFile => "/write-file",
        ToolKind::SystemInfo => "/system-info",
        ToolKind::WebRequest => "/web-request",
        ToolKind::GetWeather => "/weather",
        ToolKind::SqlQuery => "/sql/query",
        ToolKind::ListTables => "/sql/tables",
        ToolKind::DescribeTable => "/sql/describe",
    }
}

fn route_method(kind: ToolKind) -> &'static str {
    if kind.takes_arguments() { "POST" } else { "GET" }
}

/// HTTP transport handler.
pub struct HttpTransport {
    config: HttpConfig,
}

/// JSON-RPC request structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    #[serde(default)]
    pub id: Option<Value>,
    pub method: String,
    #[serde(default)]
    pub params: Option<Value>,
}

/// JSON-RPC response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

/// JSON-RPC error structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl JsonRpcResponse {
    /// Create a success response.
    pub fn success(id: Option<Value>, result: Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    /// Create an error response.
    pub fn error(id: Option<Value>, code: i32, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: None,
            error: Some(JsonRpcError {
                code,
                message: message.into(),
                data: None,
            }),
        }
    }

    /// Method not found error.
    pub fn method_not_found(id: Option<Value>) -> Self {
        Self::error(id, -32601, "Method not found")
    }

    /// Invalid request error.
    pub fn invalid_request(id: Option<Value>) -> Self {
        Self::error(id, -32600, "Invalid Request")
    }

    /// Invalid params error.
    pub fn invalid_params(id: Option<Value>, msg: impl Into<String>) -> Self {
        Self::error(id, -32602, msg)
    }

    /// Internal error.
    pub fn internal_error(id: Option<Value>, msg: impl Into<String>) -> Self {
        Self::error(id, -32603, msg)
    }
}

/// Application state shared across HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    server: McpServer,
}

/// Build the complete router: tool routes, JSON-RPC, index and health.
pub fn router(server: McpServer, config: &HttpConfig) -> Router {
    let mut app = Router::new();

    for kind in ToolKind::ALL {
        app = if kind.takes_arguments() {
            app.route(
                route_path(kind),
                post(
                    move |State(state): State<AppState>, Json(arguments): Json<Value>| async move {
                        invoke_tool(&state, kind, arguments).await
                    },
                ),
            )
        } else {
            app.route(
                route_path(kind),
                get(move |State(state): State<AppState>| async move {
                    invoke_tool(&state, kind, Value::Null).await
                }),
            )
        };
    }

    let rpc_path = config.rpc_path.clone();
    let mut app = app
        .route(&config.rpc_path, post(handle_rpc))
        .route("/health", get(health_check))
        .route(
            "/",
            get(move |State(state): State<AppState>| async move {
                root_handler(&state, &rpc_path)
            }),
        )
        .with_state(AppState { server })
        .layer(TraceLayer::new_for_http());

    if config.enable_cors {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
        app = app.layer(cors);
    }

    app
}

impl HttpTransport {
    /// Create a new HTTP transport with the given config.
    pub fn new(config: HttpConfig) -> Self {
        Self { config }
    }

    /// Get the bind address.
    pub fn address(&self) -> String {
        format!("{}:{}", self.config.host, self.config.port)
    }

    /// Run the HTTP transport.
    pub async fn run(self, server: McpServer) -> TransportResult<()> {
        let addr = self.address();
        let app = router(server, &self.config);

        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| TransportError::bind(&addr, e))?;

        let cors_status = if self.config.enable_cors {
            "enabled"
        } else {
            "disabled"
        };
        info!("Ready - listening on {} (CORS {})", addr, cors_status);
        for kind in ToolKind::ALL {
            info!("  → {:<4} {}", route_method(kind), route_path(kind));
        }
        info!("  → JSON-RPC: POST {}", self.config.rpc_path);
        info!("  → Health:   GET /health");

        axum::serve(listener, app)
            .await
            .map_err(|e| TransportError::http(e.to_string()))?;

        Ok(())
    }
}

// ============================================================================
// REST routes
// ============================================================================

#[instrument(skip(state, arguments), fields(tool = kind.name()))]
async fn invoke_tool(
    state: &AppState,
    kind: ToolKind,
    arguments: Value,
) -> (StatusCode, Json<ToolResult>) {
    let outcome = state.server.registry().call_kind(kind, arguments).await;

    let status = match &outcome {
        Err(e) if e.is_validation() => StatusCode::UNPROCESSABLE_ENTITY,
        _ => StatusCode::OK,
    };

    (status, Json(ToolResult::from(outcome)))
}

/// Root handler - lists the API surface.
fn root_handler(state: &AppState, rpc_path: &str) -> Json<Value> {
    let endpoints: Vec<Value> = ToolKind::ALL
        .into_iter()
        .map(|kind| {
            json!({
                "tool": kind.name(),
                "method": route_method(kind),
                "path": route_path(kind),
            })
        })
        .collect();

    Json(json!({
        "name": state.server.name(),
        "version": state.server.version(),
        "transport": "HTTP",
        "endpoints": endpoints,
        "rpc": rpc_path,
        "health": "/health",
        "protocol": "JSON-RPC 2.0"
    }))
}

/// Health check endpoint.
async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

// ============================================================================
// JSON-RPC
// ============================================================================

/// Handle JSON-RPC requests.
#[instrument(skip_all, fields(method))]
async fn handle_rpc(
    State(state): State<AppState>,
    Json(request): Json<JsonRpcRequest>,
) -> Response {
    tracing::Span::current().record("method", &request.method);
    info!("Received JSON-RPC request: {}", request.method);

    // No id: a notification, which gets no response body.
    let is_notification = request.id.is_none();
    let response = process_request(&state, request).await;
    if is_notification {
        return StatusCode::ACCEPTED.into_response();
    }

    (StatusCode::OK, Json(response)).into_response()
}

/// Process a JSON-RPC request and return the response.
async fn process_request(state: &AppState, request: JsonRpcRequest) -> JsonRpcResponse {
    if request.jsonrpc != "2.0" {
        return JsonRpcResponse::invalid_request(request.id);
    }

    match request.method.as_str() {
        "initialize" => handle_initialize(state, request),
        "tools/list" => handle_tools_list(state, request),
        "tools/call" => handle_tools_call(state, request).await,

        // Stateless: nothing to record.
        method if method.starts_with("notifications/") => {
            info!("Received notification: {}", method);
            JsonRpcResponse::success(request.id, Value::Null)
        }

        _ => {
            warn!("Unknown method: {}", request.method);
            JsonRpcResponse::method_not_found(request.id)
        }
    }
}

fn handle_initialize(state: &AppState, request: JsonRpcRequest) -> JsonRpcResponse {
    let info = state.server.server_info();

    JsonRpcResponse::success(
        request.id,
        json!({
            "protocolVersion": PROTOCOL_VERSION,
            "capabilities": { "tools": {} },
            "serverInfo": {
                "name": state.server.name(),
                "version": state.server.version()
            },
            "instructions": info.instructions
        }),
    )
}

fn handle_tools_list(state: &AppState, request: JsonRpcRequest) -> JsonRpcResponse {
    match serde_json::to_value(state.server.registry().list_tools()) {
        Ok(tools) => JsonRpcResponse::success(request.id, json!({ "tools": tools })),
        Err(e) => JsonRpcResponse::internal_error(request.id, e.to_string()),
    }
}

async fn handle_tools_call(state: &AppState, request: JsonRpcRequest) -> JsonRpcResponse {
    let Some(params) = request.params else {
        return JsonRpcResponse::invalid_params(request.id, "Missing params");
    };

    let Some(name) = params.get("name").and_then(Value::as_str) else {
        return JsonRpcResponse::invalid_params(request.id, "Missing tool name");
    };

    let arguments = params.get("arguments").cloned().unwrap_or(Value::Null);

    match state.server.call_tool_mcp(name, arguments).await {
        Ok(result) => match serde_json::to_value(result) {
            Ok(value) => JsonRpcResponse::success(request.id, value),
            Err(e) => JsonRpcResponse::internal_error(request.id, e.to_string()),
        },
        Err(e) => JsonRpcResponse::error(request.id, e.code.0, e.message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::Config;
    use axum::body::Body;
    use http::{Method, Request, header};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn app_with(config: Config) -> Router {
        router(McpServer::new(config).unwrap(), &HttpConfig::default())
    }

    fn app() -> Router {
        app_with(Config::default())
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_req(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[test]
    fn test_route_paths_unique() {
        let mut paths: Vec<&str> = ToolKind::ALL.into_iter().map(route_path).collect();
        paths.sort_unstable();
        paths.dedup();
        assert_eq!(paths.len(), ToolKind::ALL.len());
    }

    #[tokio::test]
    async fn test_add_route() {
        let (status, body) = send(app(), post_json("/add", json!({"a": 25, "b": 17}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({
                "success": true,
                "data": {"result": 42, "calculation": "25 + 17 = 42"},
                "error": null
            })
        );
    }

    #[tokio::test]
    async fn test_echo_route() {
        let (status, body) = send(app(), post_json("/echo", json!({"message": "ping"}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"], "Echo: ping");
    }

    #[tokio::test]
    async fn test_schema_failure_is_422_with_envelope() {
        let (status, body) = send(app(), post_json("/add", json!({"a": 1}))).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["success"], false);
        assert!(body["data"].is_null());
        assert!(body["error"].as_str().unwrap().contains("missing field `b`"));
    }

    #[tokio::test]
    async fn test_wrong_type_is_422() {
        let (status, body) = send(app(), post_json("/echo", json!({"message": 5}))).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn test_non_json_body_is_4xx() {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/echo")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let (status, _) = send(app(), request).await;
        assert!(status.is_client_error());
    }

    #[tokio::test]
    async fn test_guard_rejection_is_200() {
        let (status, body) = send(
            app(),
            post_json("/sql/query", json!({"query": "DROP TABLE Users"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({"success": false, "data": null, "error": "only SELECT queries are allowed"})
        );
    }

    #[tokio::test]
    async fn test_execution_failure_is_200() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.txt");
        let (status, body) = send(
            app(),
            post_json("/read-file", json!({"path": missing.to_str().unwrap()})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], false);
        assert!(body["error"].as_str().unwrap().starts_with("file not found"));
    }

    #[tokio::test]
    async fn test_system_info_is_get() {
        let (status, body) = send(app(), get_req("/system-info")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert!(body["data"]["os"].is_string());

        let (status, _) = send(app(), post_json("/system-info", json!({}))).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let (status, _) = send(app(), post_json("/teleport", json!({}))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_cors_allows_any_origin() {
        let request = Request::builder()
            .uri("/health")
            .header(header::ORIGIN, "https://example.org")
            .body(Body::empty())
            .unwrap();
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(
            response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "*"
        );
    }

    #[tokio::test]
    async fn test_health_and_index() {
        let (status, body) = send(app(), get_req("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert!(chrono::DateTime::parse_from_rfc3339(body["timestamp"].as_str().unwrap()).is_ok());

        let (_, body) = send(app(), get_req("/")).await;
        assert_eq!(body["endpoints"].as_array().unwrap().len(), ToolKind::ALL.len());
        assert_eq!(body["endpoints"][2]["path"], "/read-file");
        assert_eq!(body["rpc"], "/mcp");
    }

    #[tokio::test]
    async fn test_rpc_tools_list() {
        let (_, body) = send(
            app(),
            post_json("/mcp", json!({"jsonrpc": "2.0", "id": 1, "method": "tools/list"})),
        )
        .await;
        let tools = body["result"]["tools"].as_array().unwrap();
        assert_eq!(tools.len(), ToolKind::ALL.len());
        assert_eq!(tools[0]["name"], "echo");
        assert!(tools[0]["inputSchema"].is_object());
    }

    #[tokio::test]
    async fn test_rpc_tools_call() {
        let (_, body) = send(
            app(),
            post_json(
                "/mcp",
                json!({
                    "jsonrpc": "2.0",
                    "id": 7,
                    "method": "tools/call",
                    "params": {"name": "echo", "arguments": {"message": "rpc"}}
                }),
            ),
        )
        .await;
        assert_eq!(body["id"], 7);
        assert_eq!(body["result"]["content"][0]["text"], "Echo: rpc");
        assert_eq!(body["result"]["isError"], false);
    }

    #[tokio::test]
    async fn test_rpc_unknown_tool_is_invalid_params() {
        let (_, body) = send(
            app(),
            post_json(
                "/mcp",
                json!({
                    "jsonrpc": "2.0",
                    "id": 2,
                    "method": "tools/call",
                    "params": {"name": "nope"}
                }),
            ),
        )
        .await;
        assert_eq!(body["error"]["code"], -32602);
        assert_eq!(body["error"]["message"], "unknown tool: nope");
    }

    #[tokio::test]
    async fn test_rpc_notification_has_empty_body() {
        let response = app()
            .oneshot(post_json(
                "/mcp",
                json!({"jsonrpc": "2.0", "method": "notifications/initialized"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::ACCEPTED);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        assert!(bytes.is_empty());
    }

    #[tokio::test]
    async fn test_rpc_initialize_and_unknown_method() {
        let (_, body) = send(
            app(),
            post_json("/mcp", json!({"jsonrpc": "2.0", "id": 1, "method": "initialize"})),
        )
        .await;
        assert_eq!(body["result"]["protocolVersion"], PROTOCOL_VERSION);
        assert!(body["result"]["capabilities"]["tools"].is_object());

        let (_, body) = send(
            app(),
            post_json("/mcp", json!({"jsonrpc": "2.0", "id": 1, "method": "prompts/list"})),
        )
        .await;
        assert_eq!(body["error"]["code"], -32601);

        let (_, body) = send(
            app(),
            post_json("/mcp", json!({"jsonrpc": "1.0", "id": 1, "method": "tools/list"})),
        )
        .await;
        assert_eq!(body["error"]["code"], -32600);
    }
}
