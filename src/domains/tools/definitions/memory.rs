//! Persistent free-text memory with lexical recall.
//!
//! Memories live in a JSON array on disk and are rewritten after every
//! change. Recall ranks stored memories by token overlap (Jaccard) with the
//! prompt.

use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Local;
use rmcp::model::CallToolResult;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::core::config::Config;
use crate::domains::tools::{ToolDefinition, ToolRegistry};

use super::common::{NoParams, error_result, json_result, text_result};

/// Characters of content shown in summaries.
const PREVIEW_CHARS: usize = 50;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Memory {
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default = "unknown_source")]
    pub source: String,
    #[serde(default)]
    pub timestamp: String,
}

fn unknown_source() -> String {
    "unknown".to_string()
}

fn preview(content: &str) -> String {
    content.chars().take(PREVIEW_CHARS).collect()
}

fn tokens(text: &str) -> HashSet<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Jaccard similarity of the two texts' lower-cased word sets.
pub fn similarity(a: &str, b: &str) -> f64 {
    let (a, b) = (tokens(a), tokens(b));
    let union = a.union(&b).count();
    if union == 0 {
        return 0.0;
    }
    a.intersection(&b).count() as f64 / union as f64
}

#[derive(Debug)]
pub struct MemoryStore {
    path: PathBuf,
    memories: Mutex<Vec<Memory>>,
}

impl MemoryStore {
    /// Open the store, loading existing memories. An unreadable file starts
    /// an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let memories = match std::fs::read_to_string(&path) {
            Ok(text) => serde_json::from_str(&text).unwrap_or_else(|e| {
                warn!(error = %e, path = %path.display(), "Ignoring malformed memory file");
                Vec::new()
            }),
            Err(_) => Vec::new(),
        };
        info!(count = memories.len(), path = %path.display(), "Memory store opened");
        Self {
            path,
            memories: Mutex::new(memories),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn save(&self, memories: &[Memory]) -> io::Result<()> {
        let text = serde_json::to_string_pretty(memories)?;
        tokio::fs::write(&self.path, text).await
    }

    /// Append a memory. On a failed write the memory is not kept.
    pub async fn store(
        &self,
        content: String,
        tags: Vec<String>,
        source: String,
    ) -> io::Result<String> {
        let summary = format!("Stored memory: {}...", preview(&content));
        let mut memories = self.memories.lock().await;
        memories.push(Memory {
            content,
            tags,
            source,
            timestamp: Local::now().naive_local().format("%Y-%m-%dT%H:%M:%S%.6f").to_string(),
        });
        if let Err(e) = self.save(&memories).await {
            memories.pop();
            return Err(e);
        }
        Ok(summary)
    }

    /// Best `top_k` memories scoring at least `min_score`.
    pub async fn query(&self, prompt: &str, top_k: usize, min_score: f64) -> Vec<String> {
        let memories = self.memories.lock().await;
        if memories.is_empty() {
            return vec!["No memory available.".to_string()];
        }

        let mut scored: Vec<(f64, &Memory)> = memories
            .iter()
            .map(|m| (similarity(prompt, &m.content), m))
            .collect();
        scored.sort_by(|a, b| b.0.total_cmp(&a.0));

        let results: Vec<String> = scored
            .into_iter()
            .take(top_k)
            .filter(|(score, _)| *score >= min_score)
            .map(|(score, m)| format!("{} (score: {:.2})", m.content, score))
            .collect();

        if results.is_empty() {
            vec!["No relevant memories found.".to_string()]
        } else {
            results
        }
    }

    pub async fn list(&self) -> Vec<String> {
        self.memories
            .lock()
            .await
            .iter()
            .enumerate()
            .map(|(i, m)| format!("{}. {}...", i + 1, preview(&m.content)))
            .collect()
    }

    /// Remove by position. Negative positions count from the end.
    pub async fn delete(&self, index: i64) -> io::Result<String> {
        let mut memories = self.memories.lock().await;
        let len = memories.len() as i64;
        let position = if index < 0 { len + index } else { index };
        if !(0..len).contains(&position) {
            return Ok(format!("No memory found at index {index}."));
        }

        let position = position as usize;
        let deleted = memories.remove(position);
        if let Err(e) = self.save(&memories).await {
            memories.insert(position, deleted);
            return Err(e);
        }
        Ok(format!("Deleted memory: '{}...'", preview(&deleted.content)))
    }

    pub async fn clear(&self) -> io::Result<()> {
        let mut memories = self.memories.lock().await;
        let previous = std::mem::take(&mut *memories);
        if let Err(e) = self.save(&memories).await {
            *memories = previous;
            return Err(e);
        }
        Ok(())
    }
}

/// Tool result for a store operation; write failures are reported as errors.
fn persisted(outcome: io::Result<String>) -> CallToolResult {
    match outcome {
        Ok(text) => text_result(text),
        Err(e) => error_result(&format!("Unable to persist memories: {e}")),
    }
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct StoreParams {
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default = "unknown_source")]
    pub source: String,
}

/// `store_memory`
pub struct StoreMemoryTool {
    store: Arc<MemoryStore>,
}

#[async_trait]
impl ToolDefinition for StoreMemoryTool {
    const NAME: &'static str = "store_memory";
    const DESCRIPTION: &'static str = "Store a memory with optional tags and source.";
    type Params = StoreParams;

    async fn execute(&self, p: StoreParams) -> CallToolResult {
        persisted(self.store.store(p.content, p.tags, p.source).await)
    }
}

fn default_top_k() -> usize {
    3
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct QueryMemoryParams {
    pub prompt: String,
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    #[serde(default)]
    pub min_score: f64,
}

/// `query_memory`
pub struct QueryMemoryTool {
    store: Arc<MemoryStore>,
}

#[async_trait]
impl ToolDefinition for QueryMemoryTool {
    const NAME: &'static str = "query_memory";
    const DESCRIPTION: &'static str = "Search stored memories. Returns the top_k matches scoring at least min_score.";
    type Params = QueryMemoryParams;

    async fn execute(&self, p: QueryMemoryParams) -> CallToolResult {
        json_result(&json!(self.store.query(&p.prompt, p.top_k, p.min_score).await))
    }
}

/// `list_memories`
pub struct ListMemoriesTool {
    store: Arc<MemoryStore>,
}

#[async_trait]
impl ToolDefinition for ListMemoriesTool {
    const NAME: &'static str = "list_memories";
    const DESCRIPTION: &'static str = "List all stored memory summaries";
    type Params = NoParams;

    async fn execute(&self, _p: NoParams) -> CallToolResult {
        json_result(&json!(self.store.list().await))
    }
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct DeleteParams {
    #[schemars(description = "Position of the memory in the list, starting at 0")]
    pub index: i64,
}

/// `delete_memory`
pub struct DeleteMemoryTool {
    store: Arc<MemoryStore>,
}

#[async_trait]
impl ToolDefinition for DeleteMemoryTool {
    const NAME: &'static str = "delete_memory";
    const DESCRIPTION: &'static str = "Deletes a memory entry by its index in the list.";
    type Params = DeleteParams;

    async fn execute(&self, p: DeleteParams) -> CallToolResult {
        persisted(self.store.delete(p.index).await)
    }
}

/// `clear_memory`
pub struct ClearMemoryTool {
    store: Arc<MemoryStore>,
}

#[async_trait]
impl ToolDefinition for ClearMemoryTool {
    const NAME: &'static str = "clear_memory";
    const DESCRIPTION: &'static str = "Clears all stored memories";
    type Params = NoParams;

    async fn execute(&self, _p: NoParams) -> CallToolResult {
        persisted(
            self.store
                .clear()
                .await
                .map(|()| "Memory store cleared.".to_string()),
        )
    }
}

pub fn register(registry: &mut ToolRegistry, config: &Config) {
    let store = Arc::new(MemoryStore::open(config.tools.memory_path.clone()));
    registry.register(StoreMemoryTool { store: store.clone() });
    registry.register(QueryMemoryTool { store: store.clone() });
    registry.register(ListMemoriesTool { store: store.clone() });
    registry.register(DeleteMemoryTool { store: store.clone() });
    registry.register(ClearMemoryTool { store });
}
