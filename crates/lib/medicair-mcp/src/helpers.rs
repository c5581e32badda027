use std::borrow::Cow;

use rmcp::ErrorData;
use rmcp::model::ErrorCode;

use crate::widget::WidgetError;

pub fn mcp_err(code: ErrorCode, message: impl Into<Cow<'static, str>>) -> ErrorData {
    ErrorData {
        code,
        message: message.into(),
        data: None,
    }
}

/// Single error-mapping step at the tool-call boundary: clients see the
/// tool name and the underlying message, never a raw backend error.
pub fn tool_failure(tool: &str, err: &dyn std::error::Error) -> ErrorData {
    tracing::warn!(tool, error = %err, "tool execution failed");
    mcp_err(
        ErrorCode::INTERNAL_ERROR,
        format!("error executing tool {tool}: {err}"),
    )
}

pub fn map_widget_err(err: WidgetError) -> ErrorData {
    let code = match &err {
        WidgetError::UnknownPath(_) | WidgetError::AssetMissing(_) => ErrorCode::RESOURCE_NOT_FOUND,
        WidgetError::Io { .. } => ErrorCode::INTERNAL_ERROR,
    };
    mcp_err(code, err.to_string())
}
