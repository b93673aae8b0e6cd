use std::path::Path;

use colored::Colorize;
use comfy_table::{Cell, Table};

use crate::cli::pipeline_setup;
use crate::error::Result;
use crate::fmt::money;
use crate::importer::import_path;
use crate::models::TxnType;

pub fn run(file: &str, month_first: bool, rules: Option<&str>, limit: Option<usize>) -> Result<()> {
    let (options, categorizer) = pipeline_setup(month_first, rules)?;
    let outcome = import_path(Path::new(file), &options)?;
    let skipped = outcome.skipped;

    if outcome.transactions.is_empty() {
        println!("{}", "No valid transactions found in file.".yellow());
        return Ok(());
    }

    let categorized = categorizer.process(outcome.transactions);
    let shown = limit.unwrap_or(categorized.len()).min(categorized.len());

    let mut table = Table::new();
    table.set_header(vec!["Date", "Description", "Category", "Amount"]);
    for entry in &categorized[..shown] {
        let amount = match entry.txn.txn_type {
            TxnType::Expense => money(-entry.txn.amount),
            TxnType::Inflow => money(entry.txn.amount),
        };
        table.add_row(vec![
            Cell::new(entry.txn.date.format("%Y-%m-%d")),
            Cell::new(&entry.txn.description),
            Cell::new(entry.category.name()),
            Cell::new(amount),
        ]);
    }
    println!("{table}");

    if shown < categorized.len() {
        println!("Showing {shown} of {} transactions.", categorized.len());
    }
    if skipped.total() > 0 {
        println!("{} rows skipped.", skipped.total());
    }
    Ok(())
}
