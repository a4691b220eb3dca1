use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use rusqlite::Connection;
use tracing::info;

use crate::migrator::Executor;

fn configure(conn: Connection) -> rusqlite::Result<Connection> {
    conn.execute_batch("PRAGMA foreign_keys = ON")?;
    Ok(conn)
}

pub(crate) fn open(path: &Path) -> rusqlite::Result<Connection> {
    configure(Connection::open(path)?)
}

pub(crate) fn open_in_memory() -> rusqlite::Result<Connection> {
    configure(Connection::open_in_memory()?)
}

/// Copies `path` to `<path>.bak`, replacing an older backup.
pub fn backup_file(path: &Path) -> io::Result<PathBuf> {
    let mut name = OsString::from(path.as_os_str());
    name.push(".bak");
    let destination = PathBuf::from(name);

    fs::copy(path, &destination)?;
    info!(from = %path.display(), to = %destination.display(), "database backed up");
    Ok(destination)
}

/// Runs statements on a borrowed SQLite connection.
pub struct SqliteExecutor<'a> {
    conn: &'a Connection,
}

impl<'a> SqliteExecutor<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }
}

impl Executor for SqliteExecutor<'_> {
    fn execute(&mut self, sql: &str) -> Result<(), String> {
        self.conn.execute_batch(sql).map_err(|e| e.to_string())
    }

    fn count(&mut self, sql: &str) -> Result<Option<i64>, String> {
        self.conn
            .query_row(sql, [], |row| row.get::<_, i64>(0))
            .map(Some)
            .map_err(|e| e.to_string())
    }

    fn begin(&mut self) -> Result<(), String> {
        self.execute("BEGIN")
    }

    fn commit(&mut self) -> Result<(), String> {
        self.execute("COMMIT")
    }

    fn rollback(&mut self) -> Result<(), String> {
        self.execute("ROLLBACK")
    }
}
