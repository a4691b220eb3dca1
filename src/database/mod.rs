//! Live connections and the executors that run migration SQL on them.

#[cfg(feature = "sqlite")]
mod sqlite;

#[cfg(feature = "mysql")]
mod mysql;

#[cfg(feature = "sqlite")]
pub use sqlite::{backup_file, SqliteExecutor};

#[cfg(feature = "mysql")]
pub use self::mysql::MySqlExecutor;

use thiserror::Error;
use tracing::info;

use crate::backend::Backend;
use crate::config::Target;
use crate::migrator::{Executor, MigrationStateStore};
use crate::state::StateError;

#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("{0} support was not compiled in (enable the `{0}` feature)")]
    FeatureDisabled(&'static str),

    #[error("backups are only taken of SQLite database files")]
    BackupUnsupported,

    #[error("backup failed: {0}")]
    Backup(#[from] std::io::Error),

    #[cfg(feature = "sqlite")]
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),

    #[cfg(feature = "mysql")]
    #[error(transparent)]
    MySql(#[from] ::mysql::Error),

    #[error(transparent)]
    State(#[from] StateError),
}

/// Open connection to the migrated database.
pub enum Database {
    #[cfg(feature = "sqlite")]
    Sqlite(rusqlite::Connection),
    #[cfg(feature = "mysql")]
    MySql(::mysql::Pool),
}

/// Everything a `Migrator` needs for one run: the dialect, the state store
/// and the statement executor.
pub struct Session<'a> {
    pub backend: &'static dyn Backend,
    pub state: Box<dyn MigrationStateStore + 'a>,
    pub executor: Box<dyn Executor + 'a>,
}

impl Database {
    pub fn connect(target: &Target) -> Result<Self, DatabaseError> {
        info!(database = %target, "connecting");
        match target {
            #[cfg(feature = "sqlite")]
            Target::SqliteMemory => Ok(Database::Sqlite(sqlite::open_in_memory()?)),
            #[cfg(feature = "sqlite")]
            Target::SqliteFile(path) => Ok(Database::Sqlite(sqlite::open(path)?)),
            #[cfg(not(feature = "sqlite"))]
            Target::SqliteMemory | Target::SqliteFile(_) => {
                Err(DatabaseError::FeatureDisabled("sqlite"))
            }
            #[cfg(feature = "mysql")]
            Target::MySql(url) => Ok(Database::MySql(::mysql::Pool::new(url.as_str())?)),
            #[cfg(not(feature = "mysql"))]
            Target::MySql(_) => Err(DatabaseError::FeatureDisabled("mysql")),
        }
    }

    pub fn session(&self, table_name: &str) -> Result<Session<'_>, DatabaseError> {
        match self {
            #[cfg(feature = "sqlite")]
            Database::Sqlite(conn) => Ok(Session {
                backend: &crate::backend::Sqlite,
                state: Box::new(crate::state::SqliteMigrationState::with_table_name(
                    conn, table_name,
                )?),
                executor: Box::new(SqliteExecutor::new(conn)),
            }),
            #[cfg(feature = "mysql")]
            Database::MySql(pool) => Ok(Session {
                backend: &crate::backend::MySql,
                state: Box::new(crate::state::MySqlMigrationState::with_table_name(
                    pool.get_conn()?,
                    table_name,
                )?),
                executor: Box::new(MySqlExecutor::new(pool.get_conn()?)),
            }),
        }
    }
}

/// Copies a file-backed SQLite database next to itself before migrating.
pub fn backup(target: &Target) -> Result<std::path::PathBuf, DatabaseError> {
    match target {
        #[cfg(feature = "sqlite")]
        Target::SqliteFile(path) => Ok(backup_file(path)?),
        _ => Err(DatabaseError::BackupUnsupported),
    }
}
