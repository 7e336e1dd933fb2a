use crate::error::Error;
use crate::mcp::tools::{self, GetStatementRequest, ToolName};
use crate::monobank::client::MonobankApi;
use crate::monobank::types::normalize_statement;
use rmcp::model::{
    CallToolRequestParam, CallToolResult, Content, ErrorData as McpError, Implementation,
    InitializeResult, JsonObject, ListToolsResult, PaginatedRequestParam, ProtocolVersion,
    ServerCapabilities,
};
use rmcp::service::RequestContext;
use rmcp::{RoleServer, ServerHandler, ServiceExt};
use serde::Serialize;
use std::sync::Arc;

pub const SERVER_NAME: &str = "monobank-mcp";

/// Prefix of every failure reported to the caller.
pub const FAILURE_PREFIX: &str = "Failed to connect to Monobank API";

pub struct McpServer<C: MonobankApi> {
    monobank: Arc<C>,
}

impl<C: MonobankApi + 'static> McpServer<C> {
    pub fn new(monobank: Arc<C>) -> Self {
        Self { monobank }
    }

    pub async fn run_stdio(self) -> anyhow::Result<()> {
        use tokio::io::{stdin, stdout};

        let transport = (stdin(), stdout());

        let server = self.serve(transport).await?;

        // Blocks until the client disconnects
        server.waiting().await?;

        Ok(())
    }

    /// Route a tool call by name and return the pretty-printed JSON payload.
    pub async fn dispatch(&self, name: &str, arguments: Option<&JsonObject>) -> Result<String, Error> {
        let tool: ToolName = name.parse()?;
        tracing::debug!(%tool, "Dispatching tool call");

        match tool {
            ToolName::GetClientInfo => self.get_client_info().await,
            ToolName::GetStatement => {
                let request = GetStatementRequest::from_arguments(arguments)?;
                self.get_statement(request).await
            }
        }
    }

    // ========================================================================
    // MCP Tools
    // ========================================================================

    /// Tool 1: get_client_info - Client profile, accounts and jars
    pub async fn get_client_info(&self) -> Result<String, Error> {
        let info = self.monobank.client_info().await?;
        to_pretty_json(&info)
    }

    /// Tool 2: get_statement - Normalized transaction history for a period
    pub async fn get_statement(&self, request: GetStatementRequest) -> Result<String, Error> {
        let query = request.into_query(chrono::Utc::now().timestamp());
        let items = self.monobank.statement(query).await?;
        let normalized = normalize_statement(items)?;
        to_pretty_json(&normalized)
    }
}

fn to_pretty_json<T: Serialize>(value: &T) -> Result<String, Error> {
    serde_json::to_string_pretty(value).map_err(|e| Error::Serialization(e.to_string()))
}

/// Shape a dispatch result for the protocol.
///
/// Every failure message carries [`FAILURE_PREFIX`]. Bad requests (unknown
/// tool, invalid arguments) are sent as `invalid_params` errors, everything
/// else as a failed tool call with a single text block.
pub fn into_call_result(result: Result<String, Error>) -> Result<CallToolResult, McpError> {
    let e = match result {
        Ok(payload) => return Ok(CallToolResult::success(vec![Content::text(payload)])),
        Err(e) => e,
    };

    let message = format!("{}: {}", FAILURE_PREFIX, e);
    if e.is_invalid_request() {
        Err(McpError::invalid_params(message, None))
    } else {
        Ok(CallToolResult::error(vec![Content::text(message)]))
    }
}

impl<C: MonobankApi + 'static> ServerHandler for McpServer<C> {
    fn get_info(&self) -> InitializeResult {
        InitializeResult {
            protocol_version: ProtocolVersion::default(),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: SERVER_NAME.to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                title: None,
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Monobank MCP Connector - Read client info and account statements".to_string(),
            ),
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        Ok(ListToolsResult::with_all_items(tools::catalog()))
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        let result = self
            .dispatch(&request.name, request.arguments.as_ref())
            .await;

        if let Err(e) = &result {
            tracing::warn!(tool = %request.name, error = %e, "Tool call failed");
        }

        into_call_result(result)
    }
}
