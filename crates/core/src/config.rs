//! Process-wide configuration, read once at startup.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_DATABASE_URL, DEFAULT_DB_POOL_SIZE, DEFAULT_EXPORT_PATH, DEFAULT_IMPORT_PATH,
};
use crate::env_config::parse_with_default;

/// How the search route treats submitted filters.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    /// Title/author substring filters are applied.
    #[default]
    Filtered,
    /// Legacy behaviour: filters are echoed back but every book is returned.
    Unfiltered,
}

impl SearchMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Filtered => "filtered",
            Self::Unfiltered => "unfiltered",
        }
    }
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SearchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "filtered" => Ok(Self::Filtered),
            "unfiltered" | "legacy" => Ok(Self::Unfiltered),
            other => Err(format!("unknown search mode: {other}")),
        }
    }
}

/// Runtime configuration for the server and the maintenance commands.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct AppConfig {
    /// sqlx SQLite URL, e.g. `sqlite://books.db`
    pub database_url: String,
    /// Where `/export` writes the workbook
    pub export_path: PathBuf,
    /// Where `/import` reads the workbook from
    pub import_path: PathBuf,
    pub search_mode: SearchMode,
    pub db_pool_size: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_owned(),
            export_path: PathBuf::from(DEFAULT_EXPORT_PATH),
            import_path: PathBuf::from(DEFAULT_IMPORT_PATH),
            search_mode: SearchMode::default(),
            db_pool_size: DEFAULT_DB_POOL_SIZE,
        }
    }
}

impl AppConfig {
    /// Reads `BOOKSHELF_*` environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        Self {
            database_url: non_empty("BOOKSHELF_DATABASE_URL").unwrap_or(defaults.database_url),
            export_path: non_empty("BOOKSHELF_EXPORT_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.export_path),
            import_path: non_empty("BOOKSHELF_IMPORT_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.import_path),
            search_mode: parse_with_default(
                "BOOKSHELF_SEARCH_MODE",
                lookup("BOOKSHELF_SEARCH_MODE"),
                defaults.search_mode,
            ),
            db_pool_size: parse_with_default(
                "BOOKSHELF_DB_POOL_SIZE",
                lookup("BOOKSHELF_DB_POOL_SIZE"),
                defaults.db_pool_size,
            )
            .max(1),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = AppConfig::from_lookup(|_| None);
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.export_path, PathBuf::from("static/data.xlsx"));
        assert_eq!(config.search_mode, SearchMode::Filtered);
    }

    #[test]
    fn overrides_are_applied() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("BOOKSHELF_DATABASE_URL", "sqlite://other.db"),
            ("BOOKSHELF_IMPORT_PATH", "in/books.xlsx"),
            ("BOOKSHELF_SEARCH_MODE", "Unfiltered"),
            ("BOOKSHELF_DB_POOL_SIZE", "2"),
        ]));
        assert_eq!(config.database_url, "sqlite://other.db");
        assert_eq!(config.import_path, PathBuf::from("in/books.xlsx"));
        assert_eq!(config.search_mode, SearchMode::Unfiltered);
        assert_eq!(config.db_pool_size, 2);
    }

    #[test]
    fn invalid_values_fall_back() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("BOOKSHELF_SEARCH_MODE", "fuzzy"),
            ("BOOKSHELF_DB_POOL_SIZE", "0"),
            ("BOOKSHELF_EXPORT_PATH", "  "),
        ]));
        assert_eq!(config.search_mode, SearchMode::Filtered);
        assert_eq!(config.db_pool_size, 1);
        assert_eq!(config.export_path, PathBuf::from("static/data.xlsx"));
    }
}
