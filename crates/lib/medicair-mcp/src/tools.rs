//! Tool implementations for the MedicAir MCP server.

use rmcp::{
    ErrorData,
    handler::server::wrapper::Parameters,
    model::{CallToolResult, Content},
    schemars,
    tool,
    tool_router,
};
use serde::{Deserialize, Serialize};

use crate::{MedicairMcp, helpers, prompts, reply};

/// Arguments for the `query` tool.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct QueryParams {
    /// SQL query to execute, in DuckDB's SQL dialect.
    pub query: String,
}

/// Which starting prompt `get_starting_prompt` returns.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum PromptKind {
    #[default]
    Medicair,
    Duckdb,
}

/// Arguments for the `get_starting_prompt` tool.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct StartingPromptParams {
    /// Defaults to `medicair` when omitted.
    pub prompt_type: Option<PromptKind>,
}

#[tool_router(vis = "pub(crate)")]
impl MedicairMcp {
    #[tool(
        description = "Execute a SQL query against the MedicAir database (DuckDB dialect). Returns a text transcript plus structured results rendered by the query-results widget."
    )]
    pub(crate) async fn query(
        &self,
        Parameters(params): Parameters<QueryParams>,
    ) -> Result<CallToolResult, ErrorData> {
        tracing::info!(sql = %params.query, "executing query tool");
        let output = self
            .db
            .execute(&params.query)
            .await
            .map_err(|err| helpers::tool_failure("query", &err))?;
        Ok(reply::query_reply(&output))
    }

    #[tool(
        description = "Return one of the fixed starting prompts as text, for clients that do not use the prompt channel."
    )]
    pub(crate) async fn get_starting_prompt(
        &self,
        Parameters(params): Parameters<StartingPromptParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let template = match params.prompt_type.unwrap_or_default() {
            PromptKind::Medicair => prompts::MEDICAIR_STARTING_PROMPT,
            PromptKind::Duckdb => prompts::DUCKDB_INITIAL_PROMPT,
        };
        Ok(CallToolResult::success(vec![Content::text(template)]))
    }
}
