mod render;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use cloudres::api::format_api_error;
use cloudres::config::Config;
use cloudres::resource::{display_name, id_field, Category, PaginationState, SearchScope};
use cloudres::{BrowsingState, Outcome, ResourceClient};
use render::{render_listing, render_summary, Listing, OutputFormat, SummaryRow};
use serde_json::Value;
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::fmt::writer::MakeWriterExt;

/// Version injected at compile time via CLOUDRES_VERSION env var (set by CI/CD),
/// or the crate version for local builds.
const VERSION: &str = match option_env!("CLOUDRES_VERSION") {
    Some(v) => v,
    None => env!("CARGO_PKG_VERSION"),
};

/// Browse cloud resource inventories
#[derive(Parser, Debug)]
#[command(name = "cloudres", version = VERSION, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Resource API base URL (overrides CLOUDRES_BASE_URL and the config file)
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value = "table")]
    output: OutputFormat,

    /// Log level for debugging
    #[arg(long, global = true, value_enum, default_value = "off")]
    log_level: LogLevel,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List one page of a resource category
    List {
        /// Category to list (ecs, rds, slb, redis, polardb)
        #[arg(short, long)]
        category: Option<Category>,

        /// Page number, starting at 1
        #[arg(short, long, default_value_t = 1)]
        page: u32,

        /// Records per page
        #[arg(short = 'n', long)]
        page_size: Option<u32>,
    },
    /// Search resources by keyword
    Search {
        /// Keyword matched by the server against ids, names and addresses
        keyword: String,

        /// Restrict the search to one category
        #[arg(short, long, conflicts_with = "all")]
        category: Option<Category>,

        /// Search every category
        #[arg(long)]
        all: bool,

        /// Page number, starting at 1
        #[arg(short, long, default_value_t = 1)]
        page: u32,

        /// Records per page
        #[arg(short = 'n', long)]
        page_size: Option<u32>,
    },
    /// Show the total number of resources in every category
    Summary,
    /// List known resource categories
    Categories,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_tracing_level(self) -> Option<Level> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some(Level::ERROR),
            LogLevel::Warn => Some(Level::WARN),
            LogLevel::Info => Some(Level::INFO),
            LogLevel::Debug => Some(Level::DEBUG),
            LogLevel::Trace => Some(Level::TRACE),
        }
    }
}

fn setup_logging(level: LogLevel) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let tracing_level = level.to_tracing_level()?;

    let log_path = get_log_path();

    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let file = match std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
    {
        Ok(file) => file,
        Err(e) => {
            eprintln!("Failed to open log file {:?}: {}", log_path, e);
            return None;
        },
    };

    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    tracing_subscriber::fmt()
        .with_max_level(tracing_level)
        .with_writer(non_blocking.with_max_level(tracing_level))
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("cloudres started with log level: {:?}", level);
    tracing::info!("Log file: {:?}", log_path);

    Some(guard)
}

fn get_log_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        return config_dir.join("cloudres").join("cloudres.log");
    }
    if let Some(home) = dirs::home_dir() {
        return home.join(".cloudres").join("cloudres.log");
    }
    PathBuf::from("cloudres.log")
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let _log_guard = setup_logging(args.log_level);

    let mut config = Config::load();
    let base_url = config.effective_base_url(args.base_url.as_deref());
    let timeout = config.effective_timeout(args.timeout);

    tracing::info!("Using resource API {} (timeout {:?})", base_url, timeout);

    let client = ResourceClient::new(&base_url, timeout)
        .with_context(|| format!("Failed to create client for {}", base_url))?;

    let output = match args.command {
        Command::List {
            category,
            page,
            page_size,
        } => {
            let category = config.effective_category(category);
            let page_size = config.effective_page_size(page_size);
            let output = list(client, category, page, page_size, args.output).await?;

            if let Err(e) = config.set_last_category(category) {
                tracing::warn!("Failed to save config: {}", e);
            }
            output
        },
        Command::Search {
            keyword,
            category,
            all,
            page,
            page_size,
        } => {
            let page_size = config.effective_page_size(page_size);
            if all {
                search_all(&client, &keyword, page, page_size, args.output).await?
            } else {
                let category = config.effective_category(category);
                search(client, category, &keyword, page, page_size, args.output).await?
            }
        },
        Command::Summary => summary(&client, args.output).await?,
        Command::Categories => categories(),
    };

    print!("{}", output);
    Ok(())
}

async fn list(
    client: ResourceClient,
    category: Category,
    page: u32,
    page_size: u32,
    format: OutputFormat,
) -> Result<String> {
    let mut state = BrowsingState::<Value>::new(client)
        .with_category(category)
        .with_page_size(page_size)
        .with_page(page);

    finish(state.initialize().await, &state)?;

    render_listing(
        &Listing {
            category: Some(state.category()),
            keyword: None,
            pagination: state.pagination(),
            data: state.current_results(),
        },
        format,
    )
}

async fn search(
    client: ResourceClient,
    category: Category,
    keyword: &str,
    page: u32,
    page_size: u32,
    format: OutputFormat,
) -> Result<String> {
    let mut state = BrowsingState::<Value>::new(client)
        .with_category(category)
        .with_page_size(page_size)
        .with_page(page);
    state.set_search_keyword(keyword.trim());

    // A keyword search starts at page 1; --page reaches further into the matches
    let mut request = state.begin_search();
    request.page = page;
    let response = request.send(state.client()).await;
    let outcome = state.complete(response);

    finish(outcome, &state)?;

    render_listing(
        &Listing {
            category: Some(state.category()),
            keyword: state.is_searching().then(|| state.search_keyword()),
            pagination: state.pagination(),
            data: state.current_results(),
        },
        format,
    )
}

async fn search_all(
    client: &ResourceClient,
    keyword: &str,
    page: u32,
    page_size: u32,
    format: OutputFormat,
) -> Result<String> {
    let keyword = keyword.trim();
    if keyword.is_empty() {
        anyhow::bail!("A search keyword is required with --all");
    }

    let result = client
        .search::<Value>(keyword, SearchScope::All, page, page_size)
        .await
        .map_err(|e| anyhow::anyhow!(format_api_error(&e)))?;

    render_listing(
        &Listing {
            category: None,
            keyword: Some(keyword),
            pagination: PaginationState::from(&result),
            data: &result.data,
        },
        format,
    )
}

async fn summary(client: &ResourceClient, format: OutputFormat) -> Result<String> {
    let requests = Category::ALL
        .into_iter()
        .map(|category| async move { (category, client.list::<Value>(category, 1, 1).await) });

    let rows: Vec<SummaryRow> = futures::future::join_all(requests)
        .await
        .into_iter()
        .map(|(category, result)| {
            let (total, error) = match result {
                Ok(page) => (Some(page.total), None),
                Err(e) => (None, Some(format_api_error(&e))),
            };
            SummaryRow {
                category,
                display_name: display_name(category).to_string(),
                total,
                error,
            }
        })
        .collect();

    render_summary(&rows, format)
}

fn categories() -> String {
    Category::ALL
        .into_iter()
        .map(|c| {
            format!(
                "{:<10}{:<20}{}\n",
                c.as_str(),
                display_name(c),
                id_field(c).unwrap_or("-")
            )
        })
        .collect()
}

fn finish(outcome: Outcome, state: &BrowsingState) -> Result<()> {
    match outcome {
        Outcome::Failed => Err(anyhow::anyhow!(state
            .error_message()
            .unwrap_or("Request failed")
            .to_string())),
        Outcome::Applied | Outcome::Stale => Ok(()),
    }
}
