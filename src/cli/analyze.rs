use std::path::Path;

use colored::Colorize;
use comfy_table::{Cell, Table};

use crate::cli::pipeline_setup;
use crate::error::Result;
use crate::fmt::money;
use crate::importer::{import_path, SkipCounts};
use crate::reports::{summarize, Summary};

pub fn run(file: &str, month_first: bool, rules: Option<&str>) -> Result<()> {
    let (options, categorizer) = pipeline_setup(month_first, rules)?;
    let outcome = import_path(Path::new(file), &options)?;
    let skipped = outcome.skipped;

    if outcome.transactions.is_empty() {
        println!("{}", "No valid transactions found in file.".yellow());
        println!("Check that the export has date, description, and amount (or debit/credit) columns.");
        return Ok(());
    }

    let count = outcome.transactions.len();
    let categorized = categorizer.process(outcome.transactions);
    let summary = summarize(&categorized);

    println!("{} — {count} transactions{}", "Statement Summary".bold(), skip_note(&skipped));
    println!();
    print!("{}", format_summary(&summary));
    Ok(())
}

fn skip_note(skipped: &SkipCounts) -> String {
    if skipped.total() == 0 {
        return String::new();
    }
    format!(
        " ({} rows skipped: {} missing columns, {} bad dates, {} bad amounts)",
        skipped.total(),
        skipped.missing_columns,
        skipped.bad_dates,
        skipped.bad_amounts
    )
}

// ---------------------------------------------------------------------------
// Pure formatting (summary → String)
// ---------------------------------------------------------------------------

pub fn format_summary(summary: &Summary) -> String {
    let mut table = Table::new();
    let expense_share = if summary.total_inflow > 0.0 {
        summary.total_expense / summary.total_inflow * 100.0
    } else {
        0.0
    };
    table.add_row(vec![
        Cell::new("Total Income".green().bold()),
        Cell::new(money(summary.total_inflow)),
        Cell::new("your total earnings"),
    ]);
    table.add_row(vec![
        Cell::new("Total Expenses".red().bold()),
        Cell::new(money(summary.total_expense)),
        Cell::new(format!("{expense_share:.1}% of income")),
    ]);
    table.add_row(vec![
        Cell::new("Net Savings".bold()),
        Cell::new(money(summary.insights.net_savings)),
        Cell::new(format!("{:.1}% savings rate", summary.insights.savings_rate)),
    ]);
    let mut out = format!("{table}\n");

    if !summary.expenses_by_category.is_empty() {
        let mut ctable = Table::new();
        ctable.set_header(vec!["Category", "Amount", "%"]);
        for item in &summary.expenses_by_category {
            let pct = if summary.total_expense > 0.0 {
                item.total / summary.total_expense * 100.0
            } else {
                0.0
            };
            ctable.add_row(vec![
                Cell::new(item.category.name()),
                Cell::new(money(item.total)),
                Cell::new(format!("{pct:.1}%")),
            ]);
        }
        out.push_str(&format!("\nExpenses by Category\n{ctable}\n"));
    }

    let mut mtable = Table::new();
    mtable.set_header(vec!["Month", "Expenses", "Inflow"]);
    for bucket in &summary.monthly {
        mtable.add_row(vec![
            Cell::new(bucket.month),
            Cell::new(money(bucket.expense)),
            Cell::new(money(bucket.inflow)),
        ]);
    }
    out.push_str(&format!("\nMonthly Activity\n{mtable}\n"));

    let saving_status = if summary.insights.net_savings >= 0.0 {
        "On Track"
    } else {
        "Over Budget"
    };
    out.push_str(&format!(
        "\nYearly Highlights\n  Spending champion: {}\n  Most expensive month: {}\n  Saving status: {}\n",
        summary.insights.top_category, summary.insights.highest_spending_month, saving_status,
    ));
    out
}
