use crate::prelude::{println, *};
use campus_core::resources::FILTER_TABLE;
use colored::Colorize;
use serde::Serialize;

#[derive(Debug, clap::Args, Clone)]
pub struct ResourcesOptions {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// One row of the filter table
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct FilterEntry {
    pub resource: &'static str,
    pub field: &'static str,
    pub parameter: &'static str,
}

/// Flatten the filter table into rows
pub fn filter_entries() -> Vec<FilterEntry> {
    FILTER_TABLE
        .iter()
        .flat_map(|entry| {
            entry.fields.iter().map(move |&(field, parameter)| FilterEntry {
                resource: entry.resource,
                field,
                parameter,
            })
        })
        .collect()
}

pub async fn run(options: ResourcesOptions, _global: crate::Global) -> Result<()> {
    let entries = filter_entries();

    if options.json {
        let json = serde_json::to_string_pretty(&entries)
            .map_err(|e| eyre!("Failed to serialize output: {}", e))?;
        println!("{}", json);
        return Ok(());
    }

    let mut table = crate::prelude::new_table();
    table.add_row(prettytable::row![
        "Resource".bold().cyan(),
        "Filter field".bold().cyan(),
        "Query parameter".bold().cyan()
    ]);

    for entry in &entries {
        table.add_row(prettytable::row![
            entry.resource.bright_white(),
            entry.field.bright_green(),
            entry.parameter.bright_yellow()
        ]);
    }

    table.printstd();
    println!("\nFilters on any other field are not sent to the backend.");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_entries_flatten_table() {
        let entries = filter_entries();

        assert_eq!(entries.len(), 8);
        assert_eq!(
            entries[0],
            FilterEntry {
                resource: "departments",
                field: "name",
                parameter: "search",
            }
        );
        assert!(entries.contains(&FilterEntry {
            resource: "classes",
            field: "teacher",
            parameter: "teacher",
        }));
    }
}
