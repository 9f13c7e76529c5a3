//! MCP tool surface over [`GrokipediaClient`].
//!
//! Client failures never travel over the protocol error channel: they are
//! returned as tool results flagged with `is_error`, carrying the error's
//! message as text and a zero-valued structured payload.

use std::sync::Arc;

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{CallToolResult, Content, Implementation, ServerCapabilities, ServerInfo};
use rmcp::service::RequestContext;
use rmcp::{ErrorData as McpError, RoleServer, ServerHandler, tool, tool_handler, tool_router};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use crate::client::GrokipediaClient;
use crate::config::{PageConfig, SearchConfig};
use crate::types::{Page, PageOutput, SearchOutput, SearchResult};

#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct SearchArgs {
    /// The search query for Grokipedia
    pub query: String,
    /// Maximum number of results to return (default: 10)
    #[serde(default)]
    pub limit: Option<i64>,
    /// Number of results to skip (default: 0)
    #[serde(default)]
    pub offset: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct GetPageArgs {
    /// The page slug to retrieve (e.g., 'United_Petroleum')
    pub slug: String,
    /// Whether to include the page body (default: true)
    #[serde(default)]
    pub include_content: Option<bool>,
}

#[derive(Clone)]
pub struct GrokipediaTools {
    client: Arc<GrokipediaClient>,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl GrokipediaTools {
    pub fn new(client: GrokipediaClient) -> Self {
        Self {
            client: Arc::new(client),
            tool_router: Self::tool_router(),
        }
    }

    #[tool(
        description = "Search Grokipedia online encyclopedia for articles and information on various topics, providing titles, snippets, and metadata"
    )]
    async fn search_grokipedia(
        &self,
        params: Parameters<SearchArgs>,
        context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self.search(params.0, &context.ct).await)
    }

    #[tool(
        description = "Retrieve the full content of a specific Grokipedia encyclopedia page by its identifier, including title, content, and citations"
    )]
    async fn get_grokipedia_page(
        &self,
        params: Parameters<GetPageArgs>,
        context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self.get_page(params.0, &context.ct).await)
    }
}

impl GrokipediaTools {
    pub async fn search(&self, args: SearchArgs, cancel: &CancellationToken) -> CallToolResult {
        let query = args.query.trim();
        if query.is_empty() {
            return flagged_error("query must not be empty".to_string(), SearchOutput::default());
        }

        let config = SearchConfig {
            limit: args.limit,
            offset: args.offset,
        };
        match self.client.search_with_cancel(query, config, cancel).await {
            Ok(results) => {
                let text = render_search_results(query, &results);
                success(text, SearchOutput { results })
            }
            Err(e) => {
                log::error!("search_grokipedia failed for {query:?}: {e:#}");
                flagged_error(e.to_string(), SearchOutput::default())
            }
        }
    }

    pub async fn get_page(&self, args: GetPageArgs, cancel: &CancellationToken) -> CallToolResult {
        let slug = args.slug.trim();
        if slug.is_empty() {
            return flagged_error("slug must not be empty".to_string(), PageOutput::default());
        }

        let config = PageConfig {
            include_content: args.include_content.unwrap_or(true),
        };
        match self.client.get_page_with_cancel(slug, config, cancel).await {
            Ok(page) => {
                let text = render_page(&page);
                success(text, PageOutput::from(page))
            }
            Err(e) => {
                log::error!("get_grokipedia_page failed for {slug:?}: {e:#}");
                flagged_error(e.to_string(), PageOutput::default())
            }
        }
    }
}

#[tool_handler]
impl ServerHandler for GrokipediaTools {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Search Grokipedia and read its pages. Use search_grokipedia to find slugs, \
                 then get_grokipedia_page to read one."
                    .to_string(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "grokipedia-mcp".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            ..Default::default()
        }
    }
}

fn success(text: String, payload: impl Serialize) -> CallToolResult {
    let mut result = CallToolResult::success(vec![Content::text(text)]);
    result.structured_content = serde_json::to_value(payload).ok();
    result
}

fn flagged_error(message: String, empty: impl Serialize) -> CallToolResult {
    let mut result = CallToolResult::error(vec![Content::text(message)]);
    result.structured_content = serde_json::to_value(empty).ok();
    result
}

pub fn render_search_results(query: &str, results: &[SearchResult]) -> String {
    let mut lines = vec![format!("Search results for '{query}':"), String::new()];
    if results.is_empty() {
        lines.push("No results found".to_string());
    }
    for (i, result) in results.iter().enumerate() {
        lines.push(format!("{}. {} (slug: {})", i + 1, result.title, result.slug));
        if !result.snippet.is_empty() {
            lines.push(format!("   {}", result.snippet));
        }
        lines.push(String::new());
    }
    lines.join("\n")
}

pub fn render_page(page: &Page) -> String {
    let mut lines = vec![format!("# {}", page.title), String::new(), page.content.clone()];
    if !page.citations.is_empty() {
        lines.push(String::new());
        lines.push("## Citations".to_string());
        for citation in &page.citations {
            lines.push(format!(
                "[{}] {} - {}",
                citation.id, citation.title, citation.url
            ));
        }
    }
    lines.join("\n")
}
