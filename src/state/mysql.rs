use mysql::prelude::*;
use mysql::PooledConn;

use crate::migrator::MigrationStateStore;
use crate::state::{checked_table_name, StateError, DEFAULT_TABLE_NAME};

/// Migration state table on MySQL. Owns its connection, separate from the
/// one running migration statements.
pub struct MySqlMigrationState {
    conn: PooledConn,
    table_name: String,
}

impl MySqlMigrationState {
    pub fn new(conn: PooledConn) -> Result<Self, StateError> {
        Self::with_table_name(conn, DEFAULT_TABLE_NAME)
    }

    pub fn with_table_name(conn: PooledConn, table_name: &str) -> Result<Self, StateError> {
        let mut state = Self {
            conn,
            table_name: checked_table_name(table_name)?,
        };
        state.ensure_table()?;
        Ok(state)
    }

    fn ensure_table(&mut self) -> Result<(), StateError> {
        self.conn.query_drop(format!(
            "CREATE TABLE IF NOT EXISTS {} (
                migration_name VARCHAR(255) PRIMARY KEY,
                applied BOOLEAN NOT NULL DEFAULT TRUE,
                applied_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
            )",
            self.table_name
        ))?;
        Ok(())
    }
}

impl MigrationStateStore for MySqlMigrationState {
    fn applied_migrations(&mut self) -> Result<Vec<String>, StateError> {
        let names: Vec<String> = self.conn.query(format!(
            "SELECT migration_name FROM {} WHERE applied = TRUE ORDER BY applied_at, migration_name",
            self.table_name
        ))?;

        Ok(names)
    }

    fn mark_applied(&mut self, name: &str) -> Result<(), StateError> {
        self.conn.exec_drop(
            format!(
                "INSERT INTO {} (migration_name, applied) VALUES (?, TRUE)
                 ON DUPLICATE KEY UPDATE applied = TRUE, applied_at = CURRENT_TIMESTAMP",
                self.table_name
            ),
            (name,),
        )?;
        Ok(())
    }

    fn mark_unapplied(&mut self, name: &str) -> Result<(), StateError> {
        self.conn.exec_drop(
            format!(
                "UPDATE {} SET applied = FALSE WHERE migration_name = ?",
                self.table_name
            ),
            (name,),
        )?;
        Ok(())
    }
}
