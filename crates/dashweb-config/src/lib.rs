//! Configuration management for dashweb
//!
//! This module handles loading, validation, and management of
//! dashweb configuration from YAML files.

pub mod error;

use serde::{Deserialize, Deserializer, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub use error::{ConfigError, ConfigResult};

/// Longest quiet interval accepted for a search debouncer
pub const MAX_DEBOUNCE_MS: u64 = 10_000;

/// Records per page when the file does not say otherwise
pub const DEFAULT_ITEMS_PER_PAGE: usize = 7;

/// Pager window width when the file does not say otherwise
pub const DEFAULT_MAX_VISIBLE_PAGES: usize = 5;

// ==================== Configuration Types ====================

/// Pagination settings shared by every list view
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationConfig {
    /// Records per page, handed to the backing collection
    #[serde(default = "default_items_per_page")]
    pub items_per_page: usize,
    /// Number of page buttons in the pager window
    #[serde(default = "default_max_visible_pages")]
    pub max_visible_pages: usize,
    /// Render Previous/Next controls around the window
    #[serde(default = "default_true")]
    pub show_previous_next: bool,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            items_per_page: default_items_per_page(),
            max_visible_pages: default_max_visible_pages(),
            show_previous_next: true,
        }
    }
}

fn default_items_per_page() -> usize {
    DEFAULT_ITEMS_PER_PAGE
}

fn default_max_visible_pages() -> usize {
    DEFAULT_MAX_VISIBLE_PAGES
}

fn default_true() -> bool {
    true
}

/// Settings of a single list view (user management, transaction ledger).
///
/// Omitted fields in a view section take the defaults of the view they
/// belong to.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewConfig {
    /// Quiet interval before a search term is applied
    pub debounce_ms: u64,
    /// Simulated latency of the in-memory collection
    pub latency_ms: u64,
    /// Optional JSON fixture replacing the built-in seed records
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fixture: Option<PathBuf>,
}

impl ViewConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn latency(&self) -> Duration {
        Duration::from_millis(self.latency_ms)
    }
}

fn default_users_view() -> ViewConfig {
    ViewConfig {
        debounce_ms: 500,
        latency_ms: 800,
        fixture: None,
    }
}

fn default_transactions_view() -> ViewConfig {
    ViewConfig {
        debounce_ms: 300,
        latency_ms: 500,
        fixture: None,
    }
}

/// A view section as written in the file; absent fields fall back per view
#[derive(Debug, Default, Deserialize)]
struct ViewSection {
    debounce_ms: Option<u64>,
    latency_ms: Option<u64>,
    fixture: Option<PathBuf>,
}

impl ViewSection {
    fn or_defaults(self, defaults: ViewConfig) -> ViewConfig {
        ViewConfig {
            debounce_ms: self.debounce_ms.unwrap_or(defaults.debounce_ms),
            latency_ms: self.latency_ms.unwrap_or(defaults.latency_ms),
            fixture: self.fixture.or(defaults.fixture),
        }
    }
}

fn view_section<'de, D>(deserializer: D, defaults: ViewConfig) -> Result<ViewConfig, D::Error>
where
    D: Deserializer<'de>,
{
    // `users:` with nothing under it arrives as null
    let section = Option::<ViewSection>::deserialize(deserializer)?.unwrap_or_default();
    Ok(section.or_defaults(defaults))
}

fn users_section<'de, D: Deserializer<'de>>(deserializer: D) -> Result<ViewConfig, D::Error> {
    view_section(deserializer, default_users_view())
}

fn transactions_section<'de, D: Deserializer<'de>>(deserializer: D) -> Result<ViewConfig, D::Error> {
    view_section(deserializer, default_transactions_view())
}

/// Which list view a setting belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewKind {
    Users,
    Transactions,
}

impl std::str::FromStr for ViewKind {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "users" | "user" => Ok(ViewKind::Users),
            "transactions" | "transaction" | "ledger" => Ok(ViewKind::Transactions),
            _ => Err(format!("Invalid view: {}", s)),
        }
    }
}

impl std::fmt::Display for ViewKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ViewKind::Users => write!(f, "users"),
            ViewKind::Transactions => write!(f, "transactions"),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Pagination settings
    #[serde(default)]
    pub pagination: PaginationConfig,
    /// User management view
    #[serde(default = "default_users_view", deserialize_with = "users_section")]
    pub users: ViewConfig,
    /// Transaction ledger view
    #[serde(default = "default_transactions_view", deserialize_with = "transactions_section")]
    pub transactions: ViewConfig,
    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            pagination: PaginationConfig::default(),
            users: default_users_view(),
            transactions: default_transactions_view(),
            logging: LoggingConfig::default(),
        }
    }
}

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

impl Config {
    /// Load configuration from a YAML file
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::IoError)?;
        let config = Self::from_yaml(&content)?;

        Ok(config)
    }

    /// Parse and validate configuration from YAML text
    pub fn from_yaml(content: &str) -> ConfigResult<Self> {
        // serde_yaml reads an empty document as unit, not as an empty mapping
        let config: Config = if content.trim().is_empty() {
            Config::default()
        } else {
            serde_yaml::from_str(content).map_err(|e| ConfigError::InvalidYaml {
                message: e.to_string(),
            })?
        };

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> ConfigResult<()> {
        if self.pagination.items_per_page == 0 {
            return Err(ConfigError::InvalidValue {
                field: "pagination.items_per_page".to_string(),
                reason: "Items per page must be greater than 0".to_string(),
            });
        }

        if self.pagination.max_visible_pages == 0 {
            return Err(ConfigError::InvalidValue {
                field: "pagination.max_visible_pages".to_string(),
                reason: "The pager must show at least one page".to_string(),
            });
        }

        for kind in [ViewKind::Users, ViewKind::Transactions] {
            if self.view(kind).debounce_ms > MAX_DEBOUNCE_MS {
                return Err(ConfigError::InvalidValue {
                    field: format!("{}.debounce_ms", kind),
                    reason: format!("Debounce must be at most {} ms", MAX_DEBOUNCE_MS),
                });
            }
        }

        if !LOG_LEVELS.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "logging.level".to_string(),
                reason: format!("Log level must be one of {}", LOG_LEVELS.join(", ")),
            });
        }

        Ok(())
    }

    /// Generate a default configuration file
    pub fn generate_default() -> &'static str {
        include_str!("../templates/default_config.yaml")
    }

    /// Settings of one list view
    pub fn view(&self, kind: ViewKind) -> &ViewConfig {
        match kind {
            ViewKind::Users => &self.users,
            ViewKind::Transactions => &self.transactions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = Config::from_yaml("").unwrap();
        assert_eq!(config.pagination.items_per_page, 7);
        assert_eq!(config.pagination.max_visible_pages, 5);
        assert_eq!(config.users.debounce_ms, 500);
        assert_eq!(config.transactions.debounce_ms, 300);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_default_template_is_valid() {
        let config = Config::from_yaml(Config::generate_default()).unwrap();
        assert_eq!(config.pagination.items_per_page, 7);
        assert_eq!(config.view(ViewKind::Users).latency(), Duration::from_millis(800));
        assert_eq!(config.view(ViewKind::Transactions).debounce(), Duration::from_millis(300));
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        let config = Config::from_yaml("pagination:\n  max_visible_pages: 7\n").unwrap();
        assert_eq!(config.pagination.max_visible_pages, 7);
        assert_eq!(config.pagination.items_per_page, 7);
        assert!(config.pagination.show_previous_next);
    }

    #[test]
    fn test_partial_view_section_keeps_view_defaults() {
        let config = Config::from_yaml("users:\n  latency_ms: 0\n").unwrap();
        assert_eq!(config.users.latency_ms, 0);
        assert_eq!(config.users.debounce_ms, 500);

        let config = Config::from_yaml("users:\n  debounce_ms: 200\ntransactions:\n  fixture: tx.json\n").unwrap();
        assert_eq!(config.users.debounce_ms, 200);
        assert_eq!(config.users.latency_ms, 800);
        assert_eq!(config.transactions.debounce_ms, 300);
        assert_eq!(config.transactions.latency_ms, 500);
        assert_eq!(config.transactions.fixture, Some(PathBuf::from("tx.json")));
    }

    #[test]
    fn test_empty_view_section_uses_view_defaults() {
        let config = Config::from_yaml("transactions:\n").unwrap();
        assert_eq!(config.transactions.debounce_ms, 300);
        assert_eq!(config.transactions.latency_ms, 500);
    }

    #[test]
    fn test_zero_items_per_page_rejected() {
        let err = Config::from_yaml("pagination:\n  items_per_page: 0\n").unwrap_err();
        match err {
            ConfigError::InvalidValue { field, .. } => assert_eq!(field, "pagination.items_per_page"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_oversized_debounce_rejected() {
        let err = Config::from_yaml("users:\n  debounce_ms: 60000\n").unwrap_err();
        assert!(err.to_string().contains("users.debounce_ms"));
    }

    #[test]
    fn test_bad_yaml_reported() {
        let err = Config::from_yaml("pagination: [1, 2").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidYaml { .. }));
    }

    #[test]
    fn test_missing_file() {
        let err = Config::load("/definitely/not/here/dashweb.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound { .. }));
    }

    #[test]
    fn test_view_kind_parse() {
        assert_eq!("Users".parse::<ViewKind>().unwrap(), ViewKind::Users);
        assert_eq!("ledger".parse::<ViewKind>().unwrap(), ViewKind::Transactions);
        assert!("reports".parse::<ViewKind>().is_err());
        assert_eq!(ViewKind::Transactions.to_string(), "transactions");
    }
}
