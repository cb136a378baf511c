//! Synthetic search tool.

use async_trait::async_trait;
use serde_json::{json, Value};

use super::Tool;

/// Hard ceiling on returned results. A larger requested `limit` is
/// silently truncated; callers get no truncation signal.
const MAX_RESULTS: i64 = 5;

/// Return a deterministic list of synthetic search results.
pub struct Search;

#[async_trait]
impl Tool for Search {
    fn name(&self) -> &str {
        "search"
    }

    fn description(&self) -> &str {
        "Search for information. Returns a ranked list of results with titles, URLs and snippets."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "Search query"
                },
                "limit": {
                    "type": "integer",
                    "description": "Maximum number of results (default: 5)",
                    "default": 5
                }
            },
            "required": ["query"]
        })
    }

    async fn execute(&self, args: Value) -> anyhow::Result<Value> {
        let query = args["query"]
            .as_str()
            .ok_or_else(|| anyhow::anyhow!("Missing 'query' argument"))?;

        let limit = match args.get("limit") {
            None | Some(Value::Null) => MAX_RESULTS,
            Some(value) => value
                .as_i64()
                .ok_or_else(|| anyhow::anyhow!("'limit' must be an integer"))?,
        };

        let count = limit.min(MAX_RESULTS).max(0);
        let results: Vec<Value> = (1..=count)
            .map(|rank| {
                json!({
                    "title": format!("{} - result {}", query, rank),
                    "url": format!("https://example.com/search/{}", rank),
                    "snippet": format!("Search result {} about {}...", rank, query),
                })
            })
            .collect();

        Ok(json!({
            "query": query,
            "results": results,
            "total": count,
            "success": true,
        }))
    }
}
