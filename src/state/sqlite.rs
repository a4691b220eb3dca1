use rusqlite::{params, Connection};

use crate::migrator::MigrationStateStore;
use crate::state::{checked_table_name, StateError, DEFAULT_TABLE_NAME};

/// Migration state kept in a table of the migrated SQLite database, so
/// state changes share the migration's transaction.
pub struct SqliteMigrationState<'a> {
    conn: &'a Connection,
    table_name: String,
}

impl<'a> SqliteMigrationState<'a> {
    pub fn new(conn: &'a Connection) -> Result<Self, StateError> {
        Self::with_table_name(conn, DEFAULT_TABLE_NAME)
    }

    pub fn with_table_name(conn: &'a Connection, table_name: &str) -> Result<Self, StateError> {
        let state = Self {
            conn,
            table_name: checked_table_name(table_name)?,
        };
        state.ensure_table()?;
        Ok(state)
    }

    fn ensure_table(&self) -> Result<(), StateError> {
        self.conn.execute(
            &format!(
                "CREATE TABLE IF NOT EXISTS {} (
                    migration_name TEXT PRIMARY KEY,
                    applied INTEGER NOT NULL DEFAULT 1,
                    applied_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
                )",
                self.table_name
            ),
            [],
        )?;
        Ok(())
    }
}

impl MigrationStateStore for SqliteMigrationState<'_> {
    fn applied_migrations(&mut self) -> Result<Vec<String>, StateError> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT migration_name FROM {} WHERE applied = 1 ORDER BY applied_at, rowid",
            self.table_name
        ))?;

        let names = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;

        Ok(names)
    }

    fn mark_applied(&mut self, name: &str) -> Result<(), StateError> {
        self.conn.execute(
            &format!(
                "INSERT INTO {} (migration_name, applied) VALUES (?1, 1)
                 ON CONFLICT(migration_name)
                 DO UPDATE SET applied = 1, applied_at = CURRENT_TIMESTAMP",
                self.table_name
            ),
            params![name],
        )?;
        Ok(())
    }

    fn mark_unapplied(&mut self, name: &str) -> Result<(), StateError> {
        self.conn.execute(
            &format!(
                "UPDATE {} SET applied = 0 WHERE migration_name = ?1",
                self.table_name
            ),
            params![name],
        )?;
        Ok(())
    }
}
