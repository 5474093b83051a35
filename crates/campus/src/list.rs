use crate::config::BackendConfig;
use crate::prelude::{eprintln, println, *};
use crate::provider::DataProvider;
use campus_core::query::{CrudFilter, CrudOperator, ListRequest, Pagination};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use serde_json::Value;

/// Longest cell rendered in the table
const MAX_CELL_WIDTH: usize = 60;

/// Options for listing a resource
#[derive(Debug, clap::Args, Clone)]
pub struct ListOptions {
    /// Resource to list (e.g. subjects, classes, departments)
    #[arg(value_name = "RESOURCE")]
    pub resource: String,

    /// Page number (1-indexed)
    #[arg(short, long, default_value = "1")]
    pub page: u32,

    /// Number of records per page
    #[arg(short, long, default_value = "10")]
    pub limit: u32,

    /// Fetch the whole collection without pagination
    #[arg(long, conflicts_with_all = ["page", "limit"])]
    pub all: bool,

    /// Filter as FIELD=VALUE or FIELD:OPERATOR=VALUE (can be repeated)
    #[arg(short, long = "filter", value_name = "FILTER")]
    pub filters: Vec<String>,

    /// Free-text search on the resource name
    #[arg(short, long)]
    pub search: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Output of the list command
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct ListOutput {
    pub resource: String,
    pub data: Vec<Value>,
    pub total: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

impl ListOutput {
    /// Page count, never below the current page when it has records
    pub fn total_pages(&self) -> u64 {
        let (Some(page), Some(limit)) = (self.page, self.limit) else {
            return 1;
        };
        let pages = self.total.div_ceil(u64::from(limit.max(1)));
        if self.data.is_empty() {
            pages
        } else {
            pages.max(u64::from(page))
        }
    }
}

/// Parse a `FIELD=VALUE` or `FIELD:OPERATOR=VALUE` filter
pub fn parse_filter(spec: &str) -> Result<CrudFilter> {
    let (lhs, value) = spec
        .split_once('=')
        .ok_or_else(|| eyre!("Invalid filter '{}'. Expected FIELD=VALUE", spec))?;

    let (field, operator) = match lhs.split_once(':') {
        Some((field, op)) => (field, op.parse::<CrudOperator>()?),
        None => (lhs, CrudOperator::Eq),
    };

    let field = field.trim();
    if field.is_empty() {
        return Err(eyre!("Invalid filter '{}'. Field name is empty", spec));
    }

    Ok(CrudFilter::new(field, operator, value))
}

/// Build the list request described by the command line
///
/// `--search` is appended after the explicit filters, so it wins over a
/// `--filter name=...` targeting the same parameter.
pub fn build_request(options: &ListOptions) -> Result<ListRequest> {
    let pagination = if options.all {
        Pagination::off()
    } else {
        Pagination::server(options.page, options.limit)
    };

    let mut request = ListRequest::new(options.resource.clone()).with_pagination(pagination);

    for spec in &options.filters {
        request = request.with_filter(parse_filter(spec)?);
    }

    if let Some(search) = &options.search {
        request = request.with_filter(CrudFilter::new(
            "name",
            CrudOperator::Contains,
            search.as_str(),
        ));
    }

    Ok(request)
}

/// Fetch one page of a resource
pub async fn list_data(request: ListRequest, config: BackendConfig) -> Result<ListOutput> {
    let provider = DataProvider::new(config)?;
    let result = provider.get_list(&request).await?;

    let pagination = request.pagination.clone().unwrap_or_default();
    let (page, limit) = if pagination.is_off() {
        (None, None)
    } else {
        (Some(pagination.page()), Some(pagination.limit()))
    };

    Ok(ListOutput {
        resource: request.resource,
        data: result.data,
        total: result.total,
        page,
        limit,
    })
}

pub async fn run(options: ListOptions, global: crate::Global) -> Result<()> {
    let config = BackendConfig::load(global.base_url.clone())?;
    let request = build_request(&options)?;

    if global.verbose {
        eprintln!(
            "Listing {} from {}",
            request.resource,
            config.endpoint_url(request.endpoint())
        );
    }

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}")?);
    spinner.enable_steady_tick(std::time::Duration::from_millis(100));
    spinner.set_message(format!("Fetching {}...", request.resource));

    let output = list_data(request, config).await;
    spinner.finish_and_clear();
    let output = output?;

    if options.json {
        println!("{}", format_list_json(&output)?);
        return Ok(());
    }

    println!("{}", format_list_text(&output));

    if let (Some(page), Some(limit)) = (output.page, output.limit) {
        if u64::from(page) < output.total_pages() {
            eprintln!(
                "{}",
                "More results available. To fetch the next page, run:".cyan()
            );
            eprintln!(
                "  campus list {} --page {} --limit {}",
                output.resource,
                page + 1,
                limit
            );
        }
    }

    Ok(())
}

/// Convert list output to JSON string
fn format_list_json(output: &ListOutput) -> Result<String> {
    serde_json::to_string_pretty(output).map_err(|e| eyre!("JSON serialization failed: {}", e))
}

/// Columns shown for a resource
///
/// Known resources get a curated set; anything else shows the keys of the
/// first record.
fn columns_for(resource: &str, records: &[Value]) -> Vec<String> {
    let curated: &[&str] = match resource {
        "subjects" => &["id", "name", "code", "department", "description"],
        "classes" => &["id", "name", "status", "subject", "teacher", "capacity"],
        "departments" => &["id", "name", "code", "description"],
        _ => &[],
    };

    if !curated.is_empty() {
        return curated.iter().map(|c| c.to_string()).collect();
    }

    records
        .first()
        .and_then(Value::as_object)
        .map(|record| record.keys().cloned().collect())
        .unwrap_or_default()
}

/// Text of a single table cell
fn cell_text(value: Option<&Value>) -> String {
    let text = match value {
        None | Some(Value::Null) => "-".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Object(object)) => match object.get("name") {
            Some(Value::String(name)) => name.clone(),
            _ => Value::Object(object.clone()).to_string(),
        },
        Some(other) => other.to_string(),
    };
    truncate_text(&text, MAX_CELL_WIDTH)
}

fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() <= max_len {
        text.to_string()
    } else {
        let truncated: String = text.chars().take(max_len).collect();
        format!("{truncated}...")
    }
}

/// Convert list output to a formatted table with a pagination footer
fn format_list_text(output: &ListOutput) -> String {
    if output.data.is_empty() {
        return format!("\nNo {} found.", output.resource);
    }

    let columns = columns_for(&output.resource, &output.data);

    let mut table = crate::prelude::new_table();
    table.add_row(prettytable::Row::new(
        columns
            .iter()
            .map(|column| prettytable::Cell::new(&column.to_uppercase().bold().cyan().to_string()))
            .collect(),
    ));

    for record in &output.data {
        table.add_row(prettytable::Row::new(
            columns
                .iter()
                .map(|column| prettytable::Cell::new(&cell_text(record.get(column))))
                .collect(),
        ));
    }

    let footer = match output.page {
        Some(page) => format!(
            "Showing page {} of {} ({} total {})",
            page,
            output.total_pages(),
            output.total,
            output.resource
        ),
        None => format!("Showing all {} {}", output.total, output.resource),
    };

    format!("\n{}\n{}", table, footer)
}
