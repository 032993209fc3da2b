//! Folio MCP Server implementation
//!
//! Each tool maps onto one feed endpoint. The last opened session is
//! remembered so tools can be called without repeating its id.

use std::sync::Arc;

use crate::client::{ClientError, FolioClient};
use rmcp::handler::server::wrapper::Parameters;
use rmcp::{
    handler::server::tool::ToolRouter,
    model::{CallToolResult, Content, Implementation, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler,
};
use schemars::JsonSchema;
use serde::Deserialize;
use tokio::sync::Mutex;

/// Folio MCP Server
///
/// Lets an agent scroll through the merged portfolio and blog feed.
#[derive(Clone)]
pub struct FolioServer {
    client: FolioClient,
    last_session: Arc<Mutex<Option<String>>>,
    tool_router: ToolRouter<Self>,
}

impl FolioServer {
    pub fn from_env() -> anyhow::Result<Self> {
        let client = FolioClient::from_env()?;
        Ok(Self::new(client))
    }

    pub fn new(client: FolioClient) -> Self {
        Self {
            client,
            last_session: Arc::new(Mutex::new(None)),
            tool_router: Self::tool_router(),
        }
    }

    /// Explicit session id, or the last opened one
    async fn resolve_session(&self, requested: Option<String>) -> Option<String> {
        match requested {
            Some(id) => Some(id),
            None => self.last_session.lock().await.clone(),
        }
    }
}

// --- Tool Parameter Types ---

#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct SessionParams {
    /// Feed session id from feed_open; defaults to the last opened session
    #[serde(default)]
    pub session_id: Option<String>,
}

fn text_result(result: Result<String, ClientError>) -> Result<CallToolResult, McpError> {
    match result {
        Ok(content) => Ok(CallToolResult::success(vec![Content::text(content)])),
        Err(e) => Ok(CallToolResult::error(vec![Content::text(e.to_string())])),
    }
}

fn no_session() -> Result<CallToolResult, McpError> {
    Ok(CallToolResult::error(vec![Content::text(
        "No open feed session. Call feed_open first.",
    )]))
}

#[tool_router]
impl FolioServer {
    #[tool(
        description = "Open a feed of portfolio projects and blog articles, newest first. Returns the first page and a session id. Call this first."
    )]
    async fn feed_open(&self) -> Result<CallToolResult, McpError> {
        match self.client.open_feed().await {
            Ok((session_id, content)) => {
                tracing::info!(session = %session_id, "opened feed session");
                *self.last_session.lock().await = Some(session_id);
                Ok(CallToolResult::success(vec![Content::text(content)]))
            }
            Err(e) => text_result(Err(e)),
        }
    }

    #[tool(
        description = "Load the next page of the feed, as when scrolling to the end of the list. Does nothing once the feed is exhausted."
    )]
    async fn feed_more(&self, params: Parameters<SessionParams>) -> Result<CallToolResult, McpError> {
        let Some(session_id) = self.resolve_session(params.0.session_id).await else {
            return no_session();
        };
        text_result(self.client.load_more(&session_id).await)
    }

    #[tool(description = "Reload the feed from the beginning.")]
    async fn feed_refresh(
        &self,
        params: Parameters<SessionParams>,
    ) -> Result<CallToolResult, McpError> {
        let Some(session_id) = self.resolve_session(params.0.session_id).await else {
            return no_session();
        };
        text_result(self.client.refresh(&session_id).await)
    }

    #[tool(description = "Show everything loaded so far without fetching more.")]
    async fn feed_view(&self, params: Parameters<SessionParams>) -> Result<CallToolResult, McpError> {
        let Some(session_id) = self.resolve_session(params.0.session_id).await else {
            return no_session();
        };
        text_result(self.client.view_feed(&session_id).await)
    }

    #[tool(description = "Close a feed session.")]
    async fn feed_close(&self, params: Parameters<SessionParams>) -> Result<CallToolResult, McpError> {
        let Some(session_id) = self.resolve_session(params.0.session_id).await else {
            return no_session();
        };
        match self.client.close_feed(&session_id).await {
            Ok(()) => {
                let mut last = self.last_session.lock().await;
                if last.as_deref() == Some(session_id.as_str()) {
                    *last = None;
                }
                Ok(CallToolResult::success(vec![Content::text(format!(
                    "Closed feed session {}.",
                    session_id
                ))]))
            }
            Err(e) => text_result(Err(e)),
        }
    }
}

#[tool_handler]
impl ServerHandler for FolioServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: Default::default(),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "folio".into(),
                title: Some("Folio MCP Server".into()),
                version: env!("CARGO_PKG_VERSION").into(),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                r#"Folio - portfolio and blog feed

WORKFLOW:
1. 'feed_open' - Open the feed and see the newest items
2. 'feed_more' - Load the next page when you reach the end
3. 'feed_refresh' - Start over from the newest items
4. 'feed_view' - Show what is loaded without fetching
5. 'feed_close' - Close the session when done

Items are projects and articles interleaved by date. When one source runs
out, the other keeps paging. A failed load shows an error above the list;
calling the same tool again retries it."#
                    .into(),
            ),
        }
    }
}
