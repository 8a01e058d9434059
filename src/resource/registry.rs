//! Category Registry - Load category definitions from JSON
//!
//! Display names and table columns for every [`Category`] live in an embedded
//! JSON file so new columns can be added without code changes.

use super::category::Category;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::OnceLock;

/// Embedded category definitions (compiled into the binary)
const CATEGORY_FILE: &str = include_str!("../resources/categories.json");

/// Column definition from JSON
///
/// `json_path` is dot-notation; `a|b` falls back to `b` when `a` is missing.
#[derive(Debug, Clone, Deserialize)]
pub struct ColumnDef {
    pub header: String,
    pub json_path: String,
    pub width: u16,
}

/// Category definition from JSON
#[derive(Debug, Clone, Deserialize)]
pub struct CategoryDef {
    pub display_name: String,
    /// Field that uniquely identifies a record of this category
    pub id_field: String,
    pub columns: Vec<ColumnDef>,
}

/// Root structure of resources/categories.json
#[derive(Debug, Clone, Deserialize)]
pub struct CategoryConfig {
    #[serde(default)]
    pub categories: HashMap<Category, CategoryDef>,
    /// Columns for mixed-category search results
    #[serde(default)]
    pub search_columns: Vec<ColumnDef>,
}

static REGISTRY: OnceLock<CategoryConfig> = OnceLock::new();

/// Get the category registry (parsed from embedded JSON on first access)
pub fn get_registry() -> &'static CategoryConfig {
    REGISTRY.get_or_init(|| {
        serde_json::from_str(CATEGORY_FILE).unwrap_or_else(|e| {
            tracing::error!("Failed to parse embedded category JSON: {}", e);
            CategoryConfig {
                categories: HashMap::new(),
                search_columns: Vec::new(),
            }
        })
    })
}

/// Get the definition for a category
pub fn get_category_def(category: Category) -> Option<&'static CategoryDef> {
    get_registry().categories.get(&category)
}

/// Human-readable name, falling back to the wire name
pub fn display_name(category: Category) -> &'static str {
    get_category_def(category)
        .map(|def| def.display_name.as_str())
        .unwrap_or_else(|| category.as_str())
}

/// Identifying field of a category's records
pub fn id_field(category: Category) -> Option<&'static str> {
    get_category_def(category).map(|def| def.id_field.as_str())
}

/// Columns to render for a category, or the mixed search columns for `None`
pub fn columns_for(category: Option<Category>) -> &'static [ColumnDef] {
    match category.and_then(get_category_def) {
        Some(def) => &def.columns,
        None => &get_registry().search_columns,
    }
}

/// Extract a value from JSON using a dot-notation path
///
/// Returns `"-"` when the path does not resolve.
pub fn extract_json_value(item: &Value, path: &str) -> String {
    for alternative in path.split('|') {
        if let Some(value) = resolve_path(item, alternative) {
            return format_value(value);
        }
    }
    "-".to_string()
}

fn resolve_path<'a>(item: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = item;

    for part in path.split('.') {
        // Handle array index
        current = match part.parse::<usize>() {
            Ok(idx) => current.get(idx)?,
            Err(_) => current.get(part)?,
        };
    }

    match current {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        other => Some(other),
    }
}

fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "-".to_string(),
        Value::Array(arr) => format!("[{} items]", arr.len()),
        Value::Object(_) => "[object]".to_string(),
    }
}
