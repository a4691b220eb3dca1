#[cfg(feature = "sqlite")]
mod sqlite;

#[cfg(feature = "mysql")]
mod mysql;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteMigrationState;

#[cfg(feature = "mysql")]
pub use self::mysql::MySqlMigrationState;

use thiserror::Error;

pub const DEFAULT_TABLE_NAME: &str = "schema_migrations";

#[derive(Debug, Error)]
pub enum StateError {
    #[error("invalid migration table name: {0:?}")]
    InvalidTableName(String),

    #[cfg(feature = "sqlite")]
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),

    #[cfg(feature = "mysql")]
    #[error(transparent)]
    MySql(#[from] ::mysql::Error),

    #[error("{0}")]
    Other(String),
}

/// The state table name is interpolated into SQL, so only plain
/// identifiers are accepted.
pub fn is_valid_table_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    name.len() <= 64 && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

pub(crate) fn checked_table_name(name: &str) -> Result<String, StateError> {
    if is_valid_table_name(name) {
        Ok(name.to_string())
    } else {
        Err(StateError::InvalidTableName(name.to_string()))
    }
}
