//! Interactive tools exposed via Model Context Protocol
//!
//! Provides the `search_radio_stations` tool by delegating to the `StationSearch`
//! upstream implementation and rendering the result as a single text block.

use rust_mcp_sdk::{
    macros,
    schema::{CallToolResult, ContentBlock, TextContent, Tool},
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::domain::{format::render_search_results, utils::normalize_query};
use crate::{errors::AppError, AppState};

pub const SEARCH_TOOL_NAME: &str = "search_radio_stations";

#[macros::mcp_tool(
    name = "search_radio_stations",
    description = "Search radio stations and podcasts by station name, country, language, or genre"
)]
#[derive(Debug, Deserialize, Serialize, macros::JsonSchema)]
pub struct SearchRadioStationsTool {
    /// Free-text search, e.g. "BBC", "jazz", "Hindi" or "Brazil"
    pub query: String,
}

/// A decoded `tools/call` invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolCall {
    pub name: Option<String>,
    pub arguments: Map<String, Value>,
}

impl ToolCall {
    pub fn from_params(params: Option<&Value>) -> Self {
        let params = params.and_then(Value::as_object);

        Self {
            name: params
                .and_then(|object| object.get("name"))
                .and_then(Value::as_str)
                .map(str::to_string),
            arguments: params
                .and_then(|object| object.get("arguments"))
                .and_then(Value::as_object)
                .cloned()
                .unwrap_or_default(),
        }
    }
}

pub fn build_tools_list() -> Vec<Tool> {
    vec![SearchRadioStationsTool::tool()]
}

pub async fn handle_tools_call(state: &AppState, call: ToolCall) -> Result<CallToolResult, AppError> {
    match call.name.as_deref() {
        Some(SEARCH_TOOL_NAME) => {}
        Some(other) => return Err(AppError::UnknownTool(other.to_string())),
        None => return Err(AppError::UnknownTool("(none)".to_string())),
    }

    let query = normalize_query(call.arguments.get("query"))?;
    let results = state.station_search.search(&query).await?;
    debug!(
        stations = results.stations.len(),
        podcasts = results.podcasts.len(),
        "search results received"
    );

    let text = render_search_results(&query, &results, &state.link_policy);
    Ok(CallToolResult {
        content: vec![ContentBlock::from(TextContent::new(text, None, None))],
        is_error: None,
        meta: None,
        structured_content: None,
    })
}
