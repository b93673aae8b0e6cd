pub mod analyze;
pub mod categories;
pub mod config;
pub mod transactions;

use std::path::Path;

use clap::{Parser, Subcommand};

use crate::categorizer::Categorizer;
use crate::error::Result;
use crate::importer::ImportOptions;
use crate::normalizer::DateOrder;
use crate::settings::load_settings;

#[derive(Parser)]
#[command(name = "kobo", about = "Bank-statement analyzer: import, categorize, and summarize spending.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze a statement file and print the yearly summary.
    Analyze {
        /// Path to a CSV, XLSX/XLS, or JSON statement export
        file: String,
        /// Read ambiguous slash dates as month/day/year
        #[arg(long)]
        month_first: bool,
        /// Custom categorization rules (JSON file)
        #[arg(long)]
        rules: Option<String>,
    },
    /// List the normalized, categorized transactions in a statement file.
    Transactions {
        /// Path to a CSV, XLSX/XLS, or JSON statement export
        file: String,
        /// Read ambiguous slash dates as month/day/year
        #[arg(long)]
        month_first: bool,
        /// Custom categorization rules (JSON file)
        #[arg(long)]
        rules: Option<String>,
        /// Show at most this many rows
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Show the active categorization rule table.
    Categories {
        /// Custom categorization rules (JSON file)
        #[arg(long)]
        rules: Option<String>,
    },
    /// View or change saved defaults (date order, rules file).
    Config {
        /// day-first or month-first
        #[arg(long)]
        date_order: Option<String>,
        /// Custom rules file to use by default
        #[arg(long)]
        rules: Option<String>,
        /// Forget the saved custom rules file
        #[arg(long)]
        clear_rules: bool,
    },
}

/// Resolve import options and the rule table from flags, falling back to
/// saved settings.
pub(crate) fn pipeline_setup(month_first: bool, rules: Option<&str>) -> Result<(ImportOptions, Categorizer)> {
    let settings = load_settings();
    let date_order = if month_first {
        DateOrder::MonthFirst
    } else {
        settings.resolved_date_order()
    };
    let categorizer = match rules.or(settings.rules_file.as_deref()) {
        Some(path) => Categorizer::from_file(Path::new(path))?,
        None => Categorizer::default(),
    };
    Ok((ImportOptions { date_order }, categorizer))
}
