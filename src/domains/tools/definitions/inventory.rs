//! Office-supplies inventory backed by a CSV file.
//!
//! The file is read once and cached; `refresh_inventory` drops the cache so
//! the next call re-reads it.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use rmcp::model::CallToolResult;
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::core::config::Config;
use crate::domains::tools::{ToolDefinition, ToolRegistry};

use super::common::{NoParams, text_result};

/// Column every inventory file must have.
pub const NAME_COLUMN: &str = "item_name";

const INTEGER_COLUMNS: [&str; 2] = ["quantity", "minimum_stock"];
const FLOAT_COLUMNS: [&str; 1] = ["unit_price"];

/// One CSV row, columns in file order.
pub type Item = Map<String, Value>;

#[derive(Debug, Error)]
pub enum InventoryError {
    #[error("Inventory file not found: {0}")]
    NotFound(String),

    #[error("CSV file missing required 'item_name' column. Available columns: {0:?}")]
    MissingNameColumn(Vec<String>),

    #[error("{0}")]
    Io(#[from] std::io::Error),
}

/// Split CSV text into records. Handles quoted fields, doubled quotes and
/// CRLF line endings.
pub fn parse_csv(text: &str) -> Vec<Vec<String>> {
    let mut records = Vec::new();
    let mut record = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match (c, in_quotes) {
            ('"', true) if chars.peek() == Some(&'"') => {
                field.push('"');
                chars.next();
            }
            ('"', true) => in_quotes = false,
            ('"', false) if field.is_empty() => in_quotes = true,
            (',', false) => record.push(std::mem::take(&mut field)),
            ('\r', false) if chars.peek() == Some(&'\n') => {}
            ('\n', false) => {
                record.push(std::mem::take(&mut field));
                records.push(std::mem::take(&mut record));
            }
            (c, _) => field.push(c),
        }
    }
    if !field.is_empty() || !record.is_empty() {
        record.push(field);
        records.push(record);
    }
    records.retain(|r| !(r.len() == 1 && r[0].is_empty()));
    records
}

fn typed_value(column: &str, raw: String) -> Value {
    if raw.is_empty() {
        return Value::String(raw);
    }
    if INTEGER_COLUMNS.contains(&column) {
        if let Ok(n) = raw.trim().parse::<i64>() {
            return Value::from(n);
        }
    }
    if FLOAT_COLUMNS.contains(&column) {
        if let Some(n) = raw.trim().parse::<f64>().ok().and_then(serde_json::Number::from_f64) {
            return Value::Number(n);
        }
    }
    Value::String(raw)
}

/// Rows of an inventory CSV as typed items.
pub fn parse_inventory(text: &str) -> Result<Vec<Item>, InventoryError> {
    let mut records = parse_csv(text).into_iter();
    let header = records.next().unwrap_or_default();
    if !header.iter().any(|h| h == NAME_COLUMN) {
        return Err(InventoryError::MissingNameColumn(header));
    }

    Ok(records
        .map(|row| {
            let mut cells = row.into_iter();
            header
                .iter()
                .map(|column| {
                    let raw = cells.next().unwrap_or_default();
                    (column.clone(), typed_value(column, raw))
                })
                .collect()
        })
        .collect())
}

/// `quantity_on_hand` -> `Quantity On Hand`
pub fn display_key(key: &str) -> String {
    key.split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn item_name(item: &Item) -> &str {
    item.get(NAME_COLUMN).and_then(Value::as_str).unwrap_or_default()
}

#[derive(Debug)]
pub struct InventoryStore {
    path: PathBuf,
    cache: RwLock<Option<Arc<Vec<Item>>>>,
}

impl InventoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cache: RwLock::new(None),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Cached items, reading the file on first use.
    pub async fn items(&self) -> Result<Arc<Vec<Item>>, InventoryError> {
        if let Some(items) = self.cache.read().await.as_ref() {
            return Ok(items.clone());
        }

        let mut cache = self.cache.write().await;
        if let Some(items) = cache.as_ref() {
            return Ok(items.clone());
        }

        let text = match tokio::fs::read_to_string(&self.path).await {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(InventoryError::NotFound(self.path.display().to_string()));
            }
            Err(e) => return Err(e.into()),
        };
        let items = Arc::new(parse_inventory(&text)?);
        debug!(count = items.len(), path = %self.path.display(), "Loaded inventory");
        *cache = Some(items.clone());
        Ok(items)
    }

    pub async fn refresh(&self) {
        *self.cache.write().await = None;
        info!("Inventory cache cleared");
    }

    /// Exact case-insensitive name match first, then substring.
    pub async fn find(&self, name: &str) -> Result<Option<Item>, InventoryError> {
        let items = self.items().await?;
        let wanted = name.to_lowercase();
        let found = items
            .iter()
            .find(|item| item_name(item).to_lowercase() == wanted)
            .or_else(|| {
                items
                    .iter()
                    .find(|item| item_name(item).to_lowercase().contains(&wanted))
            });
        Ok(found.cloned())
    }
}

/// `get_items`
pub struct ItemsTool {
    store: Arc<InventoryStore>,
}

#[async_trait]
impl ToolDefinition for ItemsTool {
    const NAME: &'static str = "get_items";
    const DESCRIPTION: &'static str = "Get a list of all item names in the inventory.";
    type Params = NoParams;

    async fn execute(&self, _params: NoParams) -> CallToolResult {
        let items = match self.store.items().await {
            Ok(items) => items,
            Err(e @ InventoryError::NotFound(_)) => return text_result(format!("Error: {e}")),
            Err(e) => {
                warn!(error = %e, "Unable to load inventory");
                return text_result(format!(
                    "An error occurred while retrieving inventory items: {e}"
                ));
            }
        };
        if items.is_empty() {
            return text_result("The inventory is empty.");
        }

        let mut listing = String::from("Available items in inventory:\n\n");
        for (i, name) in items.iter().map(item_name).filter(|n| !n.is_empty()).enumerate() {
            listing.push_str(&format!("{}. {}\n", i + 1, name));
        }
        text_result(listing)
    }
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ItemInfoParams {
    #[schemars(description = "The name of the item to look up")]
    pub item_name: String,
}

/// `get_item_info`
pub struct ItemInfoTool {
    store: Arc<InventoryStore>,
}

#[async_trait]
impl ToolDefinition for ItemInfoTool {
    const NAME: &'static str = "get_item_info";
    const DESCRIPTION: &'static str = "Get detailed information about a specific item in the inventory.";
    type Params = ItemInfoParams;

    async fn execute(&self, params: ItemInfoParams) -> CallToolResult {
        let item = match self.store.find(&params.item_name).await {
            Ok(Some(item)) => item,
            Ok(None) => {
                return text_result(format!(
                    "Item '{}' not found in the inventory.",
                    params.item_name
                ));
            }
            Err(e @ InventoryError::NotFound(_)) => return text_result(format!("Error: {e}")),
            Err(e) => {
                return text_result(format!(
                    "An error occurred while retrieving item information: {e}"
                ));
            }
        };

        let mut info = format!("Information for: {}\n\n", item_name(&item));
        for (key, value) in item.iter().filter(|(k, _)| k.as_str() != NAME_COLUMN) {
            info.push_str(&format!("{}: {}\n", display_key(key), display_value(value)));
        }
        text_result(info)
    }
}

/// `refresh_inventory`
pub struct RefreshTool {
    store: Arc<InventoryStore>,
}

#[async_trait]
impl ToolDefinition for RefreshTool {
    const NAME: &'static str = "refresh_inventory";
    const DESCRIPTION: &'static str = "Re-read the inventory file on the next request.";
    type Params = NoParams;

    async fn execute(&self, _params: NoParams) -> CallToolResult {
        self.store.refresh().await;
        text_result("Inventory cache cleared.")
    }
}

pub fn register(registry: &mut ToolRegistry, config: &Config) {
    let store = Arc::new(InventoryStore::new(config.tools.inventory_path.clone()));
    registry.register(ItemsTool { store: store.clone() });
    registry.register(ItemInfoTool { store: store.clone() });
    registry.register(RefreshTool { store });
}
