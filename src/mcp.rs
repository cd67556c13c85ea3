use std::sync::Arc;

use rmcp::{
    ServerHandler,
    ServiceExt,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{
        CallToolResult,
        Content,
        Implementation,
        ServerCapabilities,
        ServerInfo,
    },
    tool,
    tool_handler,
    tool_router,
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::{
    content_dir::ContentDir,
    corpus::{self, ContentDirCorpus, CorpusProvider, DocumentKind},
    error,
    search::{
        self,
        DEFAULT_LIMIT,
        SearchFilters,
        SearchOptions,
        SearchResponse,
    },
};

type SharedCorpus = Arc<dyn CorpusProvider + Send + Sync>;

#[derive(Clone)]
pub struct DocfindMcpServer {
    corpus: SharedCorpus,
    tool_router: ToolRouter<Self>,
}

impl DocfindMcpServer {
    pub fn new(corpus: impl CorpusProvider + Send + Sync + 'static) -> Self {
        Self {
            corpus: Arc::new(corpus),
            tool_router: Self::tool_router(),
        }
    }
}

#[tool_router(router = tool_router)]
impl DocfindMcpServer {
    /// Full-text search over the documentation corpus.
    #[tool(
        name = "docfind_search",
        description = "Search documentation pages by keyword. Title matches rank above body matches. Supports limit/offset pagination and a type filter."
    )]
    pub async fn docfind_search(
        &self,
        params: Parameters<SearchParams>,
    ) -> Result<CallToolResult, rmcp::ErrorData> {
        let params = params.0;
        let options = params.options();

        let response =
            search::execute_search(self.corpus.as_ref(), &params.query, &options);

        let summary = format_search_summary(&response);
        let structured = serde_json::to_value(&response)
            .map_err(|e| mcp_error("failed to serialize search results", e))?;

        let mut result = CallToolResult::success(vec![Content::text(summary)]);
        result.structured_content = Some(structured);
        Ok(result)
    }

    /// List the documents visible to search.
    #[tool(
        name = "docfind_list",
        description = "List documentation pages (id, title, path, last modified). Accepts an optional glob over document ids."
    )]
    pub async fn docfind_list(
        &self,
        params: Parameters<ListParams>,
    ) -> Result<CallToolResult, rmcp::ErrorData> {
        let documents = self
            .corpus
            .load()
            .map_err(|e| mcp_error("failed to load documents", e))?;
        let documents = corpus::select(documents, params.0.pattern.as_deref())
            .map_err(|e| rmcp::ErrorData::invalid_params(e.to_string(), None))?;

        let items: Vec<DocumentItem> = documents
            .into_iter()
            .map(|doc| DocumentItem {
                id: doc.id,
                title: doc.title,
                path: doc.path,
                kind: doc.kind,
                last_modified: doc.last_modified,
            })
            .collect();

        let summary = items
            .iter()
            .map(|item| format!("{}\t{}", item.path, item.title))
            .collect::<Vec<_>>()
            .join("\n");
        let structured = serde_json::to_value(ListResponse {
            document_count: items.len(),
            documents: items,
        })
        .map_err(|e| mcp_error("failed to serialize document list", e))?;

        let mut result = CallToolResult::success(vec![Content::text(summary)]);
        result.structured_content = Some(structured);
        Ok(result)
    }
}

#[tool_handler(router = self.tool_router)]
impl ServerHandler for DocfindMcpServer {
    fn get_info(&self) -> ServerInfo {
        let mut info = ServerInfo::default();
        info.capabilities = ServerCapabilities::builder().enable_tools().build();
        info.server_info = Implementation::new("docfind", env!("CARGO_PKG_VERSION"))
            .with_title("docfind MCP");
        info.instructions = Some(
            "Use docfind_search to find documentation pages by keyword. Use docfind_list to browse what exists."
                .to_string(),
        );
        info
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    /// Search query string.
    pub query: String,
    /// Maximum number of results (default: 10, 0 or less returns all).
    pub limit: Option<i64>,
    /// Number of ranked results to skip (default: 0).
    pub offset: Option<i64>,
    /// Corpus restrictions applied before ranking.
    pub filters: Option<SearchFilters>,
}

impl SearchParams {
    fn options(&self) -> SearchOptions {
        let limit = match self.limit {
            None => DEFAULT_LIMIT,
            Some(n) if n <= 0 => 0,
            Some(n) => usize::try_from(n).unwrap_or(usize::MAX),
        };
        let offset = self
            .offset
            .and_then(|n| usize::try_from(n).ok())
            .unwrap_or(0);

        SearchOptions {
            limit,
            offset,
            filters: self.filters.clone().unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    /// Glob pattern applied to document ids, e.g. `guides/**`.
    pub pattern: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ListResponse {
    document_count: usize,
    documents: Vec<DocumentItem>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DocumentItem {
    id: String,
    title: String,
    path: String,
    #[serde(rename = "type")]
    kind: DocumentKind,
    last_modified: Option<String>,
}

fn format_search_summary(response: &SearchResponse) -> String {
    if response.results.is_empty() {
        return format!("No results found for \"{}\"", response.query);
    }

    let mut lines = Vec::with_capacity(response.results.len() + 1);
    let suffix = if response.total == 1 { "" } else { "s" };
    lines.push(format!(
        "Found {} result{} for \"{}\" (showing {}):",
        response.total,
        suffix,
        response.query,
        response.results.len()
    ));

    for r in &response.results {
        lines.push(format!(
            "{} {} {}",
            r.score, r.document.path, r.document.title
        ));
        lines.push(format!("  {}", search::single_line(&r.excerpt)));
    }

    lines.join("\n")
}

fn mcp_error(message: &str, error: impl std::fmt::Display) -> rmcp::ErrorData {
    rmcp::ErrorData::internal_error(
        message.to_string(),
        Some(json!({ "error": error.to_string() })),
    )
}

pub fn run_mcp(content_dir: ContentDir) -> error::Result<()> {
    let server =
        DocfindMcpServer::new(ContentDirCorpus::new(content_dir.root()));

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| {
            error::Error::Config(format!("failed to start tokio runtime: {e}"))
        })?;

    runtime.block_on(async move {
        let transport = rmcp::transport::stdio();
        let running = server.serve(transport).await.map_err(|e| {
            error::Error::Config(format!(
                "MCP server initialization failed: {e}"
            ))
        })?;
        running.waiting().await.map_err(|e| {
            error::Error::Config(format!("MCP server error: {e}"))
        })?;
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::{InMemoryCorpus, SearchableDocument};

    fn server() -> DocfindMcpServer {
        DocfindMcpServer::new(InMemoryCorpus::new(vec![
            SearchableDocument::new(
                "docs/welcome",
                "Welcome Guide",
                "hello world",
            ),
            SearchableDocument::new(
                "docs/other",
                "Other",
                "welcome to our docs, welcome again",
            ),
            SearchableDocument::new("faq", "FAQ", "questions"),
        ]))
    }

    fn search_params(query: &str) -> SearchParams {
        SearchParams {
            query: query.to_string(),
            limit: None,
            offset: None,
            filters: None,
        }
    }

    #[tokio::test]
    async fn search_tool_returns_structured_results() {
        let result = server()
            .docfind_search(Parameters(search_params("welcome")))
            .await
            .unwrap();

        let structured = result.structured_content.expect("structured");
        assert_eq!(structured["total"], 2);
        assert_eq!(structured["limit"], 10);
        let results = structured["results"].as_array().expect("results array");
        assert_eq!(results.len(), 2);
        assert_eq!(results[0]["path"], "/docs/welcome");
        assert_eq!(results[0]["score"], 3);
        assert_eq!(results[1]["path"], "/docs/other");

        let summary = result
            .content
            .first()
            .and_then(|c| c.as_text())
            .map(|t| t.text.clone())
            .unwrap_or_default();
        assert!(summary.contains("Found 2 results"));
        assert!(summary.contains("\n  welcome to our docs, welcome again"));
    }

    #[tokio::test]
    async fn search_tool_paginates() {
        let mut params = search_params("welcome");
        params.limit = Some(1);
        params.offset = Some(1);

        let result = server().docfind_search(Parameters(params)).await.unwrap();
        let structured = result.structured_content.unwrap();
        assert_eq!(structured["total"], 2);
        assert_eq!(structured["results"].as_array().unwrap().len(), 1);
        assert_eq!(structured["results"][0]["id"], "docs/other");
    }

    #[tokio::test]
    async fn search_tool_empty_query() {
        let result = server()
            .docfind_search(Parameters(search_params("  ")))
            .await
            .unwrap();
        let structured = result.structured_content.unwrap();
        assert_eq!(structured["total"], 0);
        assert_eq!(structured["searchTime"], 0);
    }

    #[test]
    fn params_map_to_options() {
        let mut params = search_params("q");
        assert_eq!(params.options(), SearchOptions::default());

        params.limit = Some(-1);
        params.offset = Some(-5);
        params.filters = Some(SearchFilters {
            kind: Some("page".into()),
        });
        let options = params.options();
        assert_eq!(options.limit, 0);
        assert_eq!(options.offset, 0);
        assert_eq!(options.filters.kind.as_deref(), Some("page"));
    }

    #[test]
    fn params_accept_camel_case_json() {
        let params: SearchParams = serde_json::from_value(json!({
            "query": "install",
            "limit": 5,
            "filters": { "type": "page" }
        }))
        .unwrap();
        assert_eq!(params.options().limit, 5);
        assert_eq!(params.options().filters.kind.as_deref(), Some("page"));
    }

    #[tokio::test]
    async fn list_tool_filters_by_pattern() {
        let result = server()
            .docfind_list(Parameters(ListParams {
                pattern: Some("docs/*".to_string()),
            }))
            .await
            .unwrap();
        let structured = result.structured_content.unwrap();
        assert_eq!(structured["documentCount"], 2);
        assert_eq!(structured["documents"][0]["type"], "page");
    }

    #[tokio::test]
    async fn list_tool_rejects_bad_pattern() {
        let result = server()
            .docfind_list(Parameters(ListParams {
                pattern: Some("[oops".to_string()),
            }))
            .await;
        assert!(result.is_err());
    }
}
