use comfy_table::{Cell, Table};

use crate::cli::pipeline_setup;
use crate::error::Result;
use crate::models::Category;

pub fn run(rules: Option<&str>) -> Result<()> {
    let (_, categorizer) = pipeline_setup(false, rules)?;

    let mut table = Table::new();
    table.set_header(vec!["Category", "Keywords"]);
    for rule in categorizer.rules() {
        table.add_row(vec![
            Cell::new(rule.category.name()),
            Cell::new(rule.keywords.join(", ")),
        ]);
    }
    table.add_row(vec![
        Cell::new(Category::Miscellaneous.name()),
        Cell::new("(fallback when nothing matches)"),
    ]);
    println!("{table}");
    Ok(())
}
