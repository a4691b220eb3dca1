use mysql::prelude::*;
use mysql::PooledConn;

use crate::migrator::Executor;

/// Runs statements on a pooled MySQL connection. DDL commits implicitly on
/// MySQL, so migrations are never wrapped in transactions here.
pub struct MySqlExecutor {
    conn: PooledConn,
}

impl MySqlExecutor {
    pub fn new(conn: PooledConn) -> Self {
        Self { conn }
    }
}

impl Executor for MySqlExecutor {
    fn execute(&mut self, sql: &str) -> Result<(), String> {
        self.conn.query_drop(sql).map_err(|e| e.to_string())
    }

    fn count(&mut self, sql: &str) -> Result<Option<i64>, String> {
        let count: Option<i64> = self.conn.query_first(sql).map_err(|e| e.to_string())?;
        Ok(Some(count.unwrap_or(0)))
    }
}
