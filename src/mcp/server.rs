//! The central Model Context Protocol engine
//!
//! Decodes JSON-RPC envelopes into a closed set of requests (`initialize`, `tools/list`,
//! `tools/call`), runs the matching handler and renders every failure as a JSON-RPC error.

use rust_mcp_sdk::schema::{
    Implementation, InitializeResult, ListToolsResult, ProtocolVersion, ServerCapabilities,
    ServerCapabilitiesTools,
};
use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::config::ProtocolSurface;
use crate::domain::tools::{build_tools_list, handle_tools_call, ToolCall};
use crate::mcp::rpc::{
    app_error_to_json_rpc, is_json_rpc_error, json_rpc_error, json_rpc_result,
    INVALID_REQUEST_CODE,
};
use crate::{errors::AppError, AppState};

pub const NOTIFICATION_PREFIX: &str = "notifications/";

#[derive(Debug, Clone, PartialEq)]
pub enum McpRequest {
    Initialize,
    ListTools,
    CallTool(ToolCall),
}

impl McpRequest {
    pub fn parse(
        method: Option<&str>,
        params: Option<&Value>,
        surface: ProtocolSurface,
    ) -> Result<Self, AppError> {
        let Some(method) = method else {
            return Err(AppError::UnknownMethod("(none)".to_string()));
        };

        match method {
            "initialize" => Ok(Self::Initialize),
            "tools/list" => Ok(Self::ListTools),
            "list_tools" if surface.legacy_method_names => Ok(Self::ListTools),
            "tools/call" => Ok(Self::CallTool(ToolCall::from_params(params))),
            "call_tool" if surface.legacy_method_names => {
                Ok(Self::CallTool(ToolCall::from_params(params)))
            }
            other => Err(AppError::UnknownMethod(other.to_string())),
        }
    }
}

/// Handle one decoded JSON payload. Returns `None` for notifications.
pub async fn handle_json_rpc_value(state: &AppState, payload: Value) -> Option<Value> {
    let Some(object) = payload.as_object() else {
        return Some(json_rpc_error(None, INVALID_REQUEST_CODE, "Invalid Request"));
    };

    let id = object.get("id").cloned();
    let method = object.get("method").and_then(Value::as_str);
    let params = object.get("params");

    if id.is_none() && method.is_some_and(|method| method.starts_with(NOTIFICATION_PREFIX)) {
        info!(method = method.unwrap_or_default(), "mcp notification received");
        return None;
    }

    Some(handle_json_rpc_request(state, id, method, params).await)
}

pub async fn handle_json_rpc_request(
    state: &AppState,
    id: Option<Value>,
    method: Option<&str>,
    params: Option<&Value>,
) -> Value {
    let request = McpRequest::parse(method, params, state.protocol);
    let tool = match &request {
        Ok(McpRequest::CallTool(call)) => call.name.clone(),
        _ => None,
    };

    let outcome = match request {
        Ok(request) => dispatch(state, request).await,
        Err(err) => Err(err),
    };

    let response = match outcome {
        Ok(result) => json_rpc_result(id, result),
        Err(err) => {
            warn!(code = err.code(), error = ?err, "mcp request failed");
            app_error_to_json_rpc(id, &err)
        }
    };

    info!(
        method = method.unwrap_or_default(),
        tool = tool.as_deref().unwrap_or_default(),
        outcome = if is_json_rpc_error(&response) { "failure" } else { "success" },
        "mcp action audited"
    );

    response
}

async fn dispatch(state: &AppState, request: McpRequest) -> Result<Value, AppError> {
    match request {
        McpRequest::Initialize => to_result_value(initialize_result()),
        McpRequest::ListTools => to_result_value(ListToolsResult {
            meta: None,
            next_cursor: None,
            tools: build_tools_list(),
        }),
        McpRequest::CallTool(call) => to_result_value(handle_tools_call(state, call).await?),
    }
}

pub fn initialize_result() -> InitializeResult {
    InitializeResult {
        server_info: Implementation {
            name: env!("CARGO_PKG_NAME").to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            title: None,
            description: None,
            icons: vec![],
            website_url: None,
        },
        capabilities: ServerCapabilities {
            tools: Some(ServerCapabilitiesTools {
                list_changed: Some(false),
            }),
            ..Default::default()
        },
        protocol_version: ProtocolVersion::V2024_11_05.into(),
        instructions: None,
        meta: None,
    }
}

fn to_result_value<T: Serialize>(result: T) -> Result<Value, AppError> {
    serde_json::to_value(result)
        .map_err(|err| AppError::internal(format!("result serialization failed: {err}")))
}
