//! End-to-end dispatch tests over an in-process transport.

use medicair_db::{DatabaseClient, DatabaseConfig};
use medicair_mcp::MedicairMcp;
use medicair_mcp::widget::WidgetStore;
use rmcp::model::CallToolRequestParam;
use rmcp::service::ServiceError;
use rmcp::{ServiceExt, serve_server};
use serde_json::json;

type TestResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

async fn connected_client()
-> Result<rmcp::service::RunningService<rmcp::RoleClient, ()>, Box<dyn std::error::Error + Send + Sync>>
{
    let db = DatabaseClient::connect(&DatabaseConfig::new(":memory:"))?;
    let service = MedicairMcp::new(db, WidgetStore::new("public"));
    let (client_io, server_io) = tokio::io::duplex(4096);
    tokio::spawn(async move {
        if let Ok(running) = serve_server(service, server_io).await {
            let _ = running.waiting().await;
        }
    });
    Ok(().serve(client_io).await?)
}

#[tokio::test]
async fn unknown_tool_fails_with_protocol_error() -> TestResult {
    let client = connected_client().await?;

    let result = client
        .call_tool(CallToolRequestParam {
            name: "bogus".into(),
            arguments: None,
            meta: None,
            task: None,
        })
        .await;
    match result {
        Err(ServiceError::McpError(err)) => {
            assert!(
                err.message.contains("not found"),
                "unexpected error message: {}",
                err.message
            );
        }
        other => panic!("expected a protocol-level error, got {other:?}"),
    }

    client.cancel().await?;
    Ok(())
}

#[tokio::test]
async fn query_tool_dispatches_through_the_router() -> TestResult {
    let client = connected_client().await?;

    let result = client
        .call_tool(CallToolRequestParam {
            name: "query".into(),
            arguments: json!({ "query": "SELECT 1 AS n" }).as_object().cloned(),
            meta: None,
            task: None,
        })
        .await?;
    assert_eq!(
        result.structured_content,
        Some(json!({ "queryResults": { "columns": ["n"], "rows": [[1]] } }))
    );

    client.cancel().await?;
    Ok(())
}
