//! sw_fetch tool implementation.
//!
//! Routes a request through the worker's fetch handler, as if a client in
//! scope had issued it.

use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use shellcache_client::{OfflineCacheManager, ResponseSource};
use shellcache_core::{Request, RequestMode};

use super::json_result;
use crate::error::ToolError;

/// Input parameters for sw_fetch tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SwFetchParams {
    /// Absolute URL, or a path relative to the worker scope.
    pub url: String,

    /// Request mode: "navigate" (default), "same-origin", "no-cors" or "cors".
    #[serde(default = "default_mode")]
    pub mode: String,

    /// HTTP method (default: GET).
    #[serde(default = "default_method")]
    pub method: String,

    /// Truncate the returned body text to this many characters (default: 20000).
    #[serde(default = "default_max_chars")]
    pub max_chars: usize,
}

fn default_mode() -> String {
    "navigate".into()
}

fn default_method() -> String {
    "GET".into()
}

fn default_max_chars() -> usize {
    20_000
}

/// Output structure for sw_fetch tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SwFetchOutput {
    /// The resolved request URL.
    pub url: String,
    /// URL of the response (after redirects, or the cached entry's URL).
    pub response_url: String,
    pub status: u16,
    /// Where the response came from: cache, network, offline_page or inline_fallback.
    pub source: String,
    pub content_type: Option<String>,
    /// Body size in bytes before truncation.
    pub body_bytes: usize,
    /// Body decoded as UTF-8 (lossy), truncated to max_chars.
    pub body: String,
    pub truncated: bool,
}

fn source_name(source: ResponseSource) -> &'static str {
    match source {
        ResponseSource::Cache => "cache",
        ResponseSource::Network => "network",
        ResponseSource::OfflinePage => "offline_page",
        ResponseSource::InlineFallback => "inline_fallback",
    }
}

/// Implementation of the sw_fetch tool.
pub async fn fetch_impl(worker: &OfflineCacheManager, params: SwFetchParams) -> Result<CallToolResult, McpError> {
    if params.url.trim().is_empty() {
        return Err(ToolError::InvalidInput("url cannot be empty".into()).into());
    }
    if params.max_chars == 0 {
        return Err(ToolError::InvalidInput("max_chars must be greater than 0".into()).into());
    }

    let mode: RequestMode = params.mode.parse()?;
    let url = worker.resolve(&params.url)?;
    let request = Request::get(url).with_method(&params.method).with_mode(mode);

    let outcome = worker.on_fetch(&request).await?;
    tracing::debug!(url = %request.url, source = source_name(outcome.source), "sw_fetch served");

    let text = outcome.response.text();
    let truncated = text.chars().count() > params.max_chars;
    let body: String = text.chars().take(params.max_chars).collect();

    let output = SwFetchOutput {
        url: request.url.to_string(),
        response_url: outcome.response.url.clone(),
        status: outcome.response.status,
        source: source_name(outcome.source).to_string(),
        content_type: outcome.response.content_type.clone(),
        body_bytes: outcome.response.body.len(),
        body,
        truncated,
    };
    json_result(&output)
}
