//! JSON-RPC protocol representations and formatting utilities
//!
//! Provides mapping of internal AppErrors to JSON-RPC error payloads.

use rust_mcp_sdk::schema::{
    JsonrpcErrorResponse, JsonrpcResultResponse, RequestId, Result as McpResult, RpcError,
};
use serde_json::{json, Value};

use crate::errors::AppError;

/// Code used for every failure raised while handling a request.
pub const SERVER_ERROR_CODE: i32 = -32000;
pub const PARSE_ERROR_CODE: i32 = -32700;
pub const INVALID_REQUEST_CODE: i32 = -32600;

pub fn is_json_rpc_error(value: &Value) -> bool {
    value.get("error").is_some()
}

pub fn app_error_to_json_rpc(id: Option<Value>, err: &AppError) -> Value {
    json_rpc_error(id, SERVER_ERROR_CODE, &err.to_string())
}

pub fn json_rpc_error(id: Option<Value>, code: i32, message: &str) -> Value {
    if let Some(request_id) = id.as_ref().and_then(value_to_request_id) {
        let response = JsonrpcErrorResponse::new(
            RpcError {
                code: i64::from(code),
                data: None,
                message: message.to_string(),
            },
            Some(request_id),
        );
        if let Ok(value) = serde_json::to_value(response) {
            return value;
        }
    }

    json!({
        "jsonrpc": "2.0",
        "id": id,
        "error": {
            "code": code,
            "message": message
        }
    })
}

pub fn json_rpc_result(id: Option<Value>, result: Value) -> Value {
    if let Some(request_id) = id.as_ref().and_then(value_to_request_id) {
        let extra = result.as_object().cloned();
        let response = JsonrpcResultResponse::new(request_id, McpResult { meta: None, extra });
        if let Ok(value) = serde_json::to_value(response) {
            return value;
        }
    }

    json!({
        "jsonrpc": "2.0",
        "id": id,
        "result": result
    })
}

pub fn value_to_request_id(value: &Value) -> Option<RequestId> {
    if let Some(string_id) = value.as_str() {
        return Some(RequestId::String(string_id.to_string()));
    }

    value.as_i64().map(RequestId::Integer)
}
