use crate::error::{KoboError, Result};
use crate::settings::{load_settings, save_settings, settings_path};

pub fn run(date_order: Option<&str>, rules: Option<&str>, clear_rules: bool) -> Result<()> {
    let mut settings = load_settings();
    let mut changed = false;

    if let Some(order) = date_order {
        if !matches!(order, "day-first" | "month-first") {
            return Err(KoboError::Settings(format!(
                "date order must be day-first or month-first, got: {order}"
            )));
        }
        settings.date_order = order.to_string();
        changed = true;
    }

    if clear_rules {
        settings.rules_file = None;
        changed = true;
    } else if let Some(path) = rules {
        settings.rules_file = Some(path.to_string());
        changed = true;
    }

    if changed {
        save_settings(&settings)?;
        println!("Saved {}", settings_path().display());
    }

    println!("date order: {}", settings.date_order);
    println!(
        "rules file: {}",
        settings.rules_file.as_deref().unwrap_or("(built-in table)")
    );
    Ok(())
}
