//! Command line interface.
//!
//! With no subcommand the terminal UI starts. `list` fetches a collection
//! once and prints one page of it, run through the same filter, sort and
//! pagination steps as the table.

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use tracing::{debug, info};

use crate::api::types::{Category, Entity, Product, Resource};
use crate::api::{ApiClient, EntityService};
use crate::config::Config;
use crate::error::AppError;
use crate::table::{apply_filter, get_comparator, page_count, visible_range, Order};

/// A terminal admin console for catalog categories and products.
#[derive(Debug, Parser)]
#[command(name = "storedesk", version, about)]
pub struct Cli {
    /// Path to the configuration file.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Base URL of the catalog backend.
    #[arg(long, global = true, env = "STOREDESK_BASE_URL", value_name = "URL")]
    pub base_url: Option<String>,

    /// Resource shown first (categories or products).
    #[arg(long, value_name = "RESOURCE")]
    pub view: Option<Resource>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Headless subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Print one page of a collection.
    List(ListArgs),
    /// Write the effective configuration to the configuration file.
    Init {
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
}

/// Options for `storedesk list`.
#[derive(Debug, Clone, Args)]
pub struct ListArgs {
    /// Collection to list (categories or products).
    pub resource: Resource,

    /// Only show records whose name contains this text.
    #[arg(long)]
    pub filter: Option<String>,

    /// Field to sort by. Defaults to the name field.
    #[arg(long)]
    pub sort: Option<String>,

    /// Sort descending.
    #[arg(long)]
    pub desc: bool,

    /// Page to show, starting at 1.
    #[arg(long, default_value_t = 1)]
    pub page: usize,

    /// Rows per page. Values outside the configured options fall back to the default.
    #[arg(long)]
    pub rows: Option<usize>,

    /// Print the page as JSON.
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    /// Load the configuration and apply command line overrides.
    pub fn load_config(&self) -> Result<Config, AppError> {
        let mut config = match &self.config {
            Some(path) => Config::load_from(path)?,
            None => Config::load()?,
        };
        if let Some(url) = &self.base_url {
            debug!(url = %url, "Base URL overridden");
            config.backend.base_url = url.clone();
        }
        if let Some(view) = self.view {
            config.table.default_view = view;
        }
        config.validate()?;
        Ok(config)
    }

    /// Where `init` writes the configuration.
    pub fn config_target(&self) -> Result<PathBuf, AppError> {
        match &self.config {
            Some(path) => Ok(path.clone()),
            None => Ok(Config::config_path()?),
        }
    }
}

/// Save `config` to `path`, refusing to replace an existing file unless `force` is set.
pub fn run_init(config: &Config, path: &Path, force: bool) -> Result<(), AppError> {
    if path.exists() && !force {
        return Err(AppError::other(format!(
            "{} already exists. Use --force to overwrite it.",
            path.display()
        )));
    }
    config.save_to(path)?;
    info!(path = %path.display(), "Configuration written");
    Ok(())
}

/// Message printed when a command fails.
///
/// Backend failures name the URL that was used.
pub fn failure_message(err: &AppError, config: Option<&Config>) -> String {
    let mut message = err.user_message();
    if let Some(action) = err.suggested_action() {
        message.push(' ');
        message.push_str(action);
    }
    if let (true, Some(config)) = (err.is_network_failure(), config) {
        message.push_str(&format!(" (backend: {})", config.backend.base_url));
    }
    message
}

/// Fetch the collection named in `args` and render the requested page.
pub async fn run_list(config: &Config, args: &ListArgs) -> Result<String, AppError> {
    let client = ApiClient::new(&config.backend)?;
    let path = config.backend.path_for(args.resource);
    match args.resource {
        Resource::Categories => {
            render_page(&client.service::<Category>(path), config, args).await
        }
        Resource::Products => render_page(&client.service::<Product>(path), config, args).await,
    }
}

async fn render_page<E: Entity>(
    service: &dyn EntityService<E>,
    config: &Config,
    args: &ListArgs,
) -> Result<String, AppError> {
    let records = service.fetch_all().await?;
    format_page(&records, config, args)
}

/// Run `records` through the table pipeline and format the requested page.
pub fn format_page<E: Entity>(
    records: &[E],
    config: &Config,
    args: &ListArgs,
) -> Result<String, AppError> {
    let table = &config.table;
    let rows_per_page = match args.rows {
        Some(rows) if table.rows_per_page_options.contains(&rows) => rows,
        _ => table.default_rows_per_page,
    };
    let order = if args.desc { Order::Desc } else { Order::Asc };
    let order_by = args.sort.as_deref().unwrap_or(E::default_sort());

    let comparator = get_comparator(order, order_by);
    let filtered = apply_filter(records, &comparator, args.filter.as_deref().unwrap_or(""));
    let pages = page_count(rows_per_page, filtered.len());
    let page = args.page.clamp(1, pages) - 1;
    let rows = &filtered[visible_range(page, rows_per_page, filtered.len())];

    if args.json {
        return serde_json::to_string_pretty(rows)
            .map_err(|e| AppError::other(format!("Could not encode records: {}", e)));
    }

    let columns = E::columns();
    let mut cells: Vec<Vec<String>> = vec![columns.iter().map(|c| c.label.to_string()).collect()];
    for record in rows {
        cells.push(columns.iter().map(|c| record.display_field(c.key)).collect());
    }
    let widths: Vec<usize> = (0..columns.len())
        .map(|i| cells.iter().map(|row| row[i].chars().count()).max().unwrap_or(0))
        .collect();

    let mut out = String::new();
    for row in &cells {
        let line: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
            .collect();
        out.push_str(line.join("  ").trim_end());
        out.push('\n');
    }
    if rows.is_empty() {
        out.push_str(&format!("No {} found\n", E::RESOURCE.title()));
    }
    let range = visible_range(page, rows_per_page, filtered.len());
    out.push_str(&format!(
        "{}-{} of {} (page {}/{})\n",
        if range.is_empty() { 0 } else { range.start + 1 },
        range.end,
        filtered.len(),
        page + 1,
        pages
    ));
    Ok(out)
}
