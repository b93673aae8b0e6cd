mod categorizer;
mod cli;
mod error;
mod fmt;
mod importer;
mod models;
mod normalizer;
mod reports;
mod settings;

use clap::Parser;

use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Analyze {
            file,
            month_first,
            rules,
        } => cli::analyze::run(&file, month_first, rules.as_deref()),
        Commands::Transactions {
            file,
            month_first,
            rules,
            limit,
        } => cli::transactions::run(&file, month_first, rules.as_deref(), limit),
        Commands::Categories { rules } => cli::categories::run(rules.as_deref()),
        Commands::Config {
            date_order,
            rules,
            clear_rules,
        } => cli::config::run(date_order.as_deref(), rules.as_deref(), clear_rules),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
