//! MCP server handler implementation.
//!
//! This module defines the main server handler that
//! routes tool calls to the offline cache worker.
use std::sync::Arc;

use crate::tools::{
    cache::{CacheEntriesParams, entries_impl, keys_impl},
    lifecycle::{activate_impl, install_impl, status_impl},
    sw_fetch::{SwFetchParams, fetch_impl},
};
use shellcache_client::OfflineCacheManager;

use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::{
        tool::{ToolCallContext, ToolRouter},
        wrapper::Parameters,
    },
    model::{
        CallToolRequestParam, CallToolResult, Implementation, ListToolsResult, PaginatedRequestParam, ProtocolVersion,
        ServerCapabilities, ServerInfo,
    },
    service::{RequestContext, RoleServer},
    tool, tool_router,
};

/// The main MCP server handler for shellcache.
#[derive(Clone)]
pub struct ShellCacheServer {
    tool_router: ToolRouter<Self>,
    worker: Arc<OfflineCacheManager>,
}

/// Tool router implementation using the #[tool_router] macro.
///
/// This macro generates the routing logic that maps tool names to handler methods.
#[tool_router]
impl ShellCacheServer {
    /// Create a new server handler around a booted worker.
    pub fn new(worker: Arc<OfflineCacheManager>) -> Self {
        Self { tool_router: Self::tool_router(), worker }
    }

    #[tool(description = "Install the shell: fetch every shell asset into the versioned cache. All-or-nothing.")]
    async fn sw_install(&self) -> Result<CallToolResult, McpError> {
        install_impl(&self.worker).await
    }

    #[tool(description = "Activate the installed cache: delete stale cache generations and claim clients.")]
    async fn sw_activate(&self) -> Result<CallToolResult, McpError> {
        activate_impl(&self.worker).await
    }

    #[tool(description = "Report the worker lifecycle state, current cache name and stored cache generations.")]
    async fn sw_status(&self) -> Result<CallToolResult, McpError> {
        status_impl(&self.worker).await
    }

    /// Route a request through the worker.
    ///
    /// Navigations are network-first with an offline page fallback; other
    /// requests are cache-first.
    #[tool(description = "Fetch a URL through the offline cache worker. Returns status, body and where it came from.")]
    async fn sw_fetch(&self, params: Parameters<SwFetchParams>) -> Result<CallToolResult, McpError> {
        fetch_impl(&self.worker, params.0).await
    }

    #[tool(description = "List cache generations in storage, marking the current one.")]
    async fn cache_keys(&self) -> Result<CallToolResult, McpError> {
        keys_impl(&self.worker).await
    }

    #[tool(description = "List request keys stored in a cache (default: the current cache).")]
    async fn cache_entries(&self, params: Parameters<CacheEntriesParams>) -> Result<CallToolResult, McpError> {
        entries_impl(&self.worker, params.0).await
    }
}

impl ServerHandler for ShellCacheServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: "shellcache".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self, _request: Option<PaginatedRequestParam>, _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, rmcp::model::ErrorData> {
        Ok(ListToolsResult { meta: None, tools: self.tool_router.list_all(), next_cursor: None })
    }

    async fn call_tool(
        &self, request: CallToolRequestParam, context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, rmcp::model::ErrorData> {
        self.tool_router
            .call(ToolCallContext::new(self, request, context))
            .await
    }
}
