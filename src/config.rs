//! Runtime configuration read from the environment and an optional `.env`.

use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;

use crate::backend::Dialect;
use crate::catalog::CatalogOptions;
use crate::state::{is_valid_table_name, DEFAULT_TABLE_NAME};

pub const DEFAULT_DATABASE_URL: &str = "sqlite://mimonb.db";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("unsupported database url {0:?} (expected sqlite:// or mysql://)")]
    UnsupportedUrl(String),

    #[error("database url {0:?} has no file path")]
    MissingPath(String),

    #[error("invalid migrations table name {0:?}")]
    InvalidTableName(String),
}

/// Database a run connects to.
#[derive(Clone, PartialEq)]
pub enum Target {
    SqliteMemory,
    SqliteFile(PathBuf),
    MySql(String),
}

impl Target {
    pub fn parse(url: &str) -> Result<Self, ConfigError> {
        let url = url.trim();
        // Tolerate a pasted `DATABASE_URL=...` line.
        let url = url.strip_prefix("DATABASE_URL=").unwrap_or(url);

        if let Some(rest) = url.strip_prefix("mysql+pymysql://") {
            return Ok(Target::MySql(format!("mysql://{}", rest)));
        }
        if url.starts_with("mysql://") {
            return Ok(Target::MySql(url.to_string()));
        }

        let sqlite_path = url
            .strip_prefix("sqlite://")
            .or_else(|| url.strip_prefix("sqlite:"));

        match sqlite_path {
            Some(":memory:") => Ok(Target::SqliteMemory),
            Some("") => Err(ConfigError::MissingPath(url.to_string())),
            Some(path) => Ok(Target::SqliteFile(PathBuf::from(path))),
            None if url == ":memory:" => Ok(Target::SqliteMemory),
            None if is_sqlite_file(url) => Ok(Target::SqliteFile(PathBuf::from(url))),
            None => Err(ConfigError::UnsupportedUrl(url.to_string())),
        }
    }

    pub fn dialect(&self) -> Dialect {
        match self {
            Target::SqliteMemory | Target::SqliteFile(_) => Dialect::Sqlite,
            Target::MySql(_) => Dialect::MySql,
        }
    }
}

fn is_sqlite_file(url: &str) -> bool {
    !url.contains("://")
        && [".db", ".sqlite", ".sqlite3"]
            .iter()
            .any(|ext| url.ends_with(ext))
}

impl FromStr for Target {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Target::parse(s)
    }
}

/// Credentials are masked.
impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::SqliteMemory => write!(f, "sqlite::memory:"),
            Target::SqliteFile(path) => write!(f, "sqlite://{}", path.display()),
            Target::MySql(url) => {
                let rest = url.trim_start_matches("mysql://");
                match rest.rsplit_once('@') {
                    Some((credentials, host)) => {
                        let user = credentials.split(':').next().unwrap_or_default();
                        write!(f, "mysql://{}:***@{}", user, host)
                    }
                    None => write!(f, "mysql://{}", rest),
                }
            }
        }
    }
}

impl fmt::Debug for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Target({})", self)
    }
}

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub migrations_table: String,
    pub enum_as_varchar: bool,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &"[REDACTED]")
            .field("migrations_table", &self.migrations_table)
            .field("enum_as_varchar", &self.enum_as_varchar)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            migrations_table: DEFAULT_TABLE_NAME.to_string(),
            enum_as_varchar: false,
        }
    }
}

impl Config {
    /// Loads `.env` when present, then reads the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let config = Self {
            database_url: lookup("DATABASE_URL")
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.database_url),
            migrations_table: lookup("MIGRATIONS_TABLE")
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.migrations_table),
            enum_as_varchar: lookup("MIGRATE_ENUM_AS_VARCHAR")
                .map(|v| parse_flag(&v))
                .unwrap_or(defaults.enum_as_varchar),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !is_valid_table_name(&self.migrations_table) {
            return Err(ConfigError::InvalidTableName(self.migrations_table.clone()));
        }
        Ok(())
    }

    pub fn target(&self) -> Result<Target, ConfigError> {
        Target::parse(&self.database_url)
    }

    pub fn catalog_options(&self) -> CatalogOptions {
        CatalogOptions {
            enum_as_varchar: self.enum_as_varchar,
        }
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn defaults_when_environment_empty() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.database_url, DEFAULT_DATABASE_URL);
        assert_eq!(config.migrations_table, "schema_migrations");
        assert!(!config.enum_as_varchar);
        assert_eq!(
            config.target().unwrap(),
            Target::SqliteFile(PathBuf::from("mimonb.db"))
        );
    }

    #[test]
    fn reads_all_variables() {
        let config = config_from(&[
            ("DATABASE_URL", "mysql://app:secret@db:3306/mimonb"),
            ("MIGRATIONS_TABLE", "mimonb_migrations"),
            ("MIGRATE_ENUM_AS_VARCHAR", "yes"),
        ])
        .unwrap();

        assert_eq!(config.migrations_table, "mimonb_migrations");
        assert!(config.enum_as_varchar);
        assert!(config.catalog_options().enum_as_varchar);
        assert_eq!(config.target().unwrap().dialect(), Dialect::MySql);
    }

    #[test]
    fn rejects_bad_table_name() {
        let result = config_from(&[("MIGRATIONS_TABLE", "schema migrations")]);
        assert_eq!(
            result.unwrap_err(),
            ConfigError::InvalidTableName("schema migrations".to_string())
        );
    }

    #[test]
    fn parses_sqlite_urls() {
        assert_eq!(Target::parse("sqlite::memory:").unwrap(), Target::SqliteMemory);
        assert_eq!(Target::parse("sqlite://:memory:").unwrap(), Target::SqliteMemory);
        assert_eq!(
            Target::parse("sqlite:///var/lib/mimonb.db").unwrap(),
            Target::SqliteFile(PathBuf::from("/var/lib/mimonb.db"))
        );
        assert_eq!(
            Target::parse("sqlite:local.db").unwrap(),
            Target::SqliteFile(PathBuf::from("local.db"))
        );
        assert_eq!(
            Target::parse("dev.sqlite3").unwrap(),
            Target::SqliteFile(PathBuf::from("dev.sqlite3"))
        );
        assert_eq!(
            Target::parse("sqlite://"),
            Err(ConfigError::MissingPath("sqlite://".to_string()))
        );
    }

    #[test]
    fn normalises_mysql_urls() {
        assert_eq!(
            Target::parse("mysql+pymysql://app:pw@localhost:3306/mimonb").unwrap(),
            Target::MySql("mysql://app:pw@localhost:3306/mimonb".to_string())
        );
        assert_eq!(
            Target::parse("DATABASE_URL=mysql://app@localhost/mimonb").unwrap(),
            Target::MySql("mysql://app@localhost/mimonb".to_string())
        );
    }

    #[test]
    fn rejects_other_schemes() {
        assert!(matches!(
            Target::parse("postgres://localhost/mimonb"),
            Err(ConfigError::UnsupportedUrl(_))
        ));
    }

    #[test]
    fn display_masks_password() {
        let target = Target::parse("mysql://app:secret@db:3306/mimonb").unwrap();
        assert_eq!(target.to_string(), "mysql://app:***@db:3306/mimonb");
        assert!(!format!("{:?}", target).contains("secret"));
        assert!(!format!("{:?}", config_from(&[]).unwrap()).contains("mimonb.db"));
    }

    #[test]
    fn flag_values() {
        assert!(parse_flag("1"));
        assert!(parse_flag(" TRUE "));
        assert!(parse_flag("on"));
        assert!(!parse_flag("0"));
        assert!(!parse_flag("nope"));
    }
}
