//! MCP server implementation for medicair-mcp.
//!
//! This crate wires the DuckDB/MotherDuck client into rmcp tool handlers
//! and exposes the MCP-facing surface: the `query` tool, the starting
//! prompts, and the query-results widget resource.

mod helpers;
mod reply;
mod tools;
pub mod prompts;
pub mod server;
pub mod uri;
pub mod widget;

use medicair_db::DatabaseClient;
use rmcp::{
    ErrorData,
    RoleServer,
    ServerHandler,
    handler::server::tool::ToolRouter,
    service::RequestContext,
    tool_handler,
};
use rmcp::model::{
    ErrorCode,
    GetPromptRequestParam,
    GetPromptResult,
    ListPromptsResult,
    ListResourcesResult,
    PaginatedRequestParam,
    Prompt,
    PromptMessage,
    PromptMessageRole,
    ReadResourceRequestParam,
    ReadResourceResult,
    ResourceContents,
    ServerCapabilities,
    ServerInfo,
};

use crate::widget::WidgetStore;

const SERVER_INSTRUCTIONS: &str = r"medicair-mcp bridges the MedicAir DuckDB/MotherDuck database to MCP clients.

Workflow:
1. Call `get_starting_prompt` (or fetch one of the listed prompts) for orientation.
2. Run SQL with the `query` tool, in DuckDB's dialect. Each reply carries a text
   transcript and a structured `queryResults` payload.
3. Hosts that support UI widgets can read `ui://widget/query-results.html` to
   render the structured payload as a table.

Notes:
- Numbers, booleans, and NULLs keep their native JSON types in `queryResults`;
  dates and timestamps arrive as ISO-8601 text.
- The server is typically read-only; write statements may be rejected.";

/// MCP server wrapper around the database client and widget store.
#[derive(Clone)]
pub struct MedicairMcp {
    tool_router: ToolRouter<Self>,
    db: DatabaseClient,
    widgets: WidgetStore,
}

impl MedicairMcp {
    /// Creates a new server over an established database connection.
    #[must_use]
    pub fn new(db: DatabaseClient, widgets: WidgetStore) -> Self {
        Self {
            tool_router: Self::tool_router(),
            db,
            widgets,
        }
    }
}

#[tool_handler]
impl ServerHandler for MedicairMcp {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(SERVER_INSTRUCTIONS.to_string()),
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_resources()
                .enable_prompts()
                .build(),
            ..Default::default()
        }
    }

    async fn list_resources(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourcesResult, ErrorData> {
        Ok(ListResourcesResult {
            resources: vec![widget::resource_descriptor()],
            next_cursor: None,
            meta: None,
        })
    }

    async fn read_resource(
        &self,
        request: ReadResourceRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<ReadResourceResult, ErrorData> {
        let Some(logical_path) = uri::parse_ui_uri(&request.uri) else {
            return Err(helpers::mcp_err(
                ErrorCode::INVALID_PARAMS,
                format!("unsupported URI scheme: {}", request.uri),
            ));
        };
        let body = self
            .widgets
            .load(&logical_path)
            .map_err(helpers::map_widget_err)?;
        Ok(ReadResourceResult {
            contents: vec![ResourceContents::text(body, request.uri)],
        })
    }

    async fn list_prompts(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListPromptsResult, ErrorData> {
        let prompts = prompts::PROMPTS
            .iter()
            .map(|entry| Prompt::new(entry.name, Some(entry.description), None))
            .collect();
        Ok(ListPromptsResult {
            prompts,
            next_cursor: None,
            meta: None,
        })
    }

    async fn get_prompt(
        &self,
        request: GetPromptRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<GetPromptResult, ErrorData> {
        let Some(entry) = prompts::lookup(&request.name) else {
            return Err(helpers::mcp_err(
                ErrorCode::INVALID_PARAMS,
                format!("unknown prompt: {}", request.name),
            ));
        };
        Ok(GetPromptResult {
            description: Some(entry.description.to_string()),
            messages: vec![PromptMessage::new_text(
                PromptMessageRole::User,
                entry.template,
            )],
        })
    }
}
