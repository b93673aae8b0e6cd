use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::normalizer::DateOrder;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// "day-first" or "month-first"; how ambiguous a/b/YYYY dates read.
    #[serde(default = "default_date_order")]
    pub date_order: String,
    /// Custom categorization rules file used when no --rules flag is given.
    #[serde(default)]
    pub rules_file: Option<String>,
}

fn default_date_order() -> String {
    "day-first".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            date_order: default_date_order(),
            rules_file: None,
        }
    }
}

impl Settings {
    pub fn resolved_date_order(&self) -> DateOrder {
        if self.date_order.eq_ignore_ascii_case("month-first") {
            DateOrder::MonthFirst
        } else {
            DateOrder::DayFirst
        }
    }
}

fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("kobo")
}

pub fn settings_path() -> PathBuf {
    config_dir().join("settings.json")
}

pub fn load_settings() -> Settings {
    let path = settings_path();
    if path.exists() {
        let content = std::fs::read_to_string(&path).unwrap_or_default();
        serde_json::from_str(&content).unwrap_or_default()
    } else {
        Settings::default()
    }
}

pub fn save_settings(settings: &Settings) -> Result<()> {
    let dir = config_dir();
    std::fs::create_dir_all(&dir)?;
    let content = serde_json::to_string_pretty(settings)?;
    std::fs::write(settings_path(), content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_order_strings_map_to_the_enum() {
        let mut settings = Settings::default();
        assert_eq!(settings.resolved_date_order(), DateOrder::DayFirst);
        settings.date_order = "month-first".to_string();
        assert_eq!(settings.resolved_date_order(), DateOrder::MonthFirst);
        settings.date_order = "Month-First".to_string();
        assert_eq!(settings.resolved_date_order(), DateOrder::MonthFirst);
        settings.date_order = "nonsense".to_string();
        assert_eq!(settings.resolved_date_order(), DateOrder::DayFirst);
    }

    #[test]
    fn partial_settings_files_fill_in_defaults() {
        let settings: Settings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings.date_order, "day-first");
        assert!(settings.rules_file.is_none());

        let settings: Settings =
            serde_json::from_str(r#"{"rules_file": "my-rules.json"}"#).unwrap();
        assert_eq!(settings.rules_file.as_deref(), Some("my-rules.json"));
    }
}
