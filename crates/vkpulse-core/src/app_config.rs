use std::path::PathBuf;

use chrono::{FixedOffset, Offset, Utc};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    pub taxonomy_path: PathBuf,
    /// Offset applied when bucketing posts into weeks and hours of day.
    pub utc_offset_hours: i32,
    pub top_n: usize,
    pub best_hours: usize,
    pub min_age: u32,
    pub max_age: u32,
    pub max_concurrent_loads: usize,
}

impl AppConfig {
    /// The configured offset as a `chrono` value.
    ///
    /// `build_app_config` only accepts offsets in `-12..=14` hours, so the
    /// fallback to UTC is unreachable for loaded configs.
    #[must_use]
    pub fn utc_offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.utc_offset_hours * 3600).unwrap_or_else(|| Utc.fix())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            env: Environment::Development,
            log_level: "info".to_string(),
            taxonomy_path: PathBuf::from("./config/taxonomy.yaml"),
            utc_offset_hours: 3,
            top_n: 10,
            best_hours: 3,
            min_age: 14,
            max_age: 80,
            max_concurrent_loads: 4,
        }
    }
}
