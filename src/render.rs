//! Output rendering for the command line

use anyhow::Result;
use clap::ValueEnum;
use cloudres::resource::{columns_for, extract_json_value, Category, ColumnDef, PaginationState};
use serde::Serialize;
use serde_json::Value;

/// Output format for command results
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
    Yaml,
}

/// One page of results ready to print
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing<'a> {
    /// `None` for searches across every category
    pub category: Option<Category>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyword: Option<&'a str>,
    pub pagination: PaginationState,
    pub data: &'a [Value],
}

/// Total count of one category, or why it could not be fetched
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryRow {
    pub category: Category,
    pub display_name: String,
    pub total: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

pub fn render_listing(listing: &Listing<'_>, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(listing)?),
        OutputFormat::Yaml => Ok(serde_yaml::to_string(listing)?),
        OutputFormat::Table => {
            let mut out = render_table(columns_for(listing.category), listing.data);
            let p = &listing.pagination;
            out.push_str(&format!(
                "\nPage {}/{} ({} total, {} per page)\n",
                p.current_page,
                p.total_pages(),
                p.total_items,
                p.page_size
            ));
            Ok(out)
        },
    }
}

pub fn render_summary(rows: &[SummaryRow], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(rows)?),
        OutputFormat::Yaml => Ok(serde_yaml::to_string(rows)?),
        OutputFormat::Table => {
            let mut out = format!("{} {} {}\n", fit("CATEGORY", 10), fit("NAME", 24), "TOTAL");
            for row in rows {
                let total = match (&row.total, &row.error) {
                    (Some(total), _) => total.to_string(),
                    (None, Some(err)) => format!("error: {}", err),
                    (None, None) => "-".to_string(),
                };
                out.push_str(&format!(
                    "{} {} {}\n",
                    fit(row.category.as_str(), 10),
                    fit(&row.display_name, 24),
                    total
                ));
            }
            Ok(out)
        },
    }
}

fn render_table(columns: &[ColumnDef], rows: &[Value]) -> String {
    let mut out = String::new();

    let header: Vec<String> = columns
        .iter()
        .map(|col| fit(&col.header, col.width as usize))
        .collect();
    out.push_str(header.join(" ").trim_end());
    out.push('\n');

    if rows.is_empty() {
        out.push_str("(no resources)\n");
        return out;
    }

    for row in rows {
        let cells: Vec<String> = columns
            .iter()
            .map(|col| fit(&extract_json_value(row, &col.json_path), col.width as usize))
            .collect();
        out.push_str(cells.join(" ").trim_end());
        out.push('\n');
    }

    out
}

/// Pad or truncate `text` to exactly `width` characters
fn fit(text: &str, width: usize) -> String {
    let count = text.chars().count();
    if count <= width {
        format!("{}{}", text, " ".repeat(width - count))
    } else if width == 0 {
        String::new()
    } else {
        let head: String = text.chars().take(width - 1).collect();
        format!("{}…", head)
    }
}
