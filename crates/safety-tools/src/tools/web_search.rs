//! Web search tool backed by the DuckDuckGo Instant Answer API.

use std::time::Duration;

use assistant_core::{ParamKind, ToolSchema};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::error::ToolError;
use crate::tool::{Tool, ToolArgs, ToolOutput};

/// Instant Answer endpoint (keyless, JSON).
const SEARCH_URL: &str = "https://api.duckduckgo.com/";

/// Timeout for search requests.
const SEARCH_TIMEOUT: Duration = Duration::from_secs(15);

/// Default number of results to return.
const DEFAULT_MAX_RESULTS: u32 = 5;

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(rename = "AbstractText", default)]
    abstract_text: String,
    #[serde(rename = "AbstractURL", default)]
    abstract_url: String,
    #[serde(rename = "Heading", default)]
    heading: String,
    #[serde(rename = "RelatedTopics", default)]
    related_topics: Vec<RelatedTopic>,
}

/// Related topics mix plain results with nested category groups.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RelatedTopic {
    Result {
        // No `default`: a category object (only "Topics") must not match this
        // untagged variant, or the Category arm below is unreachable.
        #[serde(rename = "Text")]
        text: String,
        #[serde(rename = "FirstURL", default)]
        first_url: String,
    },
    Category {
        #[serde(rename = "Topics", default)]
        topics: Vec<RelatedTopic>,
    },
}

/// One flattened search result.
#[derive(Debug)]
struct SearchResult {
    title: String,
    snippet: String,
    url: String,
}

/// Flatten related topics (including nested categories) into results.
fn flatten_topics(topics: &[RelatedTopic], results: &mut Vec<SearchResult>, limit: usize) {
    for topic in topics {
        if results.len() >= limit {
            return;
        }
        match topic {
            RelatedTopic::Result { text, first_url } => {
                if text.is_empty() {
                    continue;
                }
                // DuckDuckGo packs "Title - snippet" into one field.
                let (title, snippet) = match text.split_once(" - ") {
                    Some((title, snippet)) => (title.to_string(), snippet.to_string()),
                    None => (text.clone(), String::new()),
                };
                results.push(SearchResult {
                    title,
                    snippet,
                    url: first_url.clone(),
                });
            }
            RelatedTopic::Category { topics } => {
                flatten_topics(topics, results, limit);
            }
        }
    }
}

/// Format a search response as the tool's text block.
fn format_results(query: &str, response: &SearchResponse, max_results: usize) -> Option<String> {
    let mut sections = Vec::new();

    if !response.abstract_text.is_empty() {
        let mut summary = format!("{}: {}", response.heading, response.abstract_text);
        if !response.abstract_url.is_empty() {
            summary.push_str(&format!("\nSource: {}", response.abstract_url));
        }
        sections.push(summary);
    }

    let mut results = Vec::new();
    flatten_topics(&response.related_topics, &mut results, max_results);

    if !results.is_empty() {
        let mut listing = String::from("Results:\n");
        for (i, result) in results.iter().enumerate() {
            listing.push_str(&format!("{}. {}", i + 1, result.title));
            if !result.snippet.is_empty() {
                listing.push_str(&format!(": {}", result.snippet));
            }
            if !result.url.is_empty() {
                listing.push_str(&format!(" ({})", result.url));
            }
            listing.push('\n');
        }
        sections.push(listing.trim_end().to_string());
    }

    if sections.is_empty() {
        None
    } else {
        Some(format!(
            "Search results for '{}':\n\n{}",
            query,
            sections.join("\n\n")
        ))
    }
}

/// Web search tool.
///
/// # Parameters
///
/// - `query` (required): Search query.
/// - `max_results` (optional): Maximum number of results, default 5.
pub struct WebSearch {
    client: reqwest::Client,
}

impl WebSearch {
    /// Create a new search tool.
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::builder()
                .build()
                .expect("Failed to create HTTP client"),
        }
    }
}

impl Default for WebSearch {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for WebSearch {
    fn name(&self) -> &str {
        "web_search"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema::new(
            "web_search",
            "Search the web for current information, such as local news or safety advisories.",
        )
        .required("query", ParamKind::String, "Search query")
        .optional(
            "max_results",
            ParamKind::Integer,
            json!(DEFAULT_MAX_RESULTS),
            "Maximum number of results",
        )
    }

    fn fallback_advice(&self) -> &str {
        "Try searching for this yourself in a web browser, or check local news sources."
    }

    async fn execute(&self, args: ToolArgs) -> Result<ToolOutput, ToolError> {
        let query = args.require_text("query")?;
        let max_results = args.get_u32_or("max_results", DEFAULT_MAX_RESULTS)? as usize;

        debug!("Searching the web for '{}'", query);

        let response = self
            .client
            .get(SEARCH_URL)
            .query(&[
                ("q", query.as_str()),
                ("format", "json"),
                ("no_html", "1"),
                ("skip_disambig", "1"),
            ])
            .timeout(SEARCH_TIMEOUT)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ToolError::Upstream(format!(
                "search service returned status {}",
                response.status()
            )));
        }

        let body: SearchResponse = response.json().await?;

        match format_results(&query, &body, max_results) {
            Some(text) => Ok(ToolOutput::success(text)),
            None => Ok(ToolOutput::success(format!(
                "No search results found for query: {}",
                query
            ))),
        }
    }
}
