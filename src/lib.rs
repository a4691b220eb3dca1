pub mod backend;
pub mod catalog;
pub mod cli;
pub mod commands;
pub mod config;
pub mod database;
pub mod field;
pub mod migration;
pub mod migrator;
pub mod operation;
pub mod state;

pub mod prelude {
    pub use crate::backend::{Backend, Dialect, MySql, Sqlite};
    pub use crate::catalog::CatalogOptions;
    pub use crate::config::{Config, Target};
    pub use crate::database::{Database, DatabaseError, Session};
    pub use crate::field::{Field, FieldType, ForeignKey, ReferentialAction};
    pub use crate::migration::{Migration, MigrationError, MigrationRegistry};
    pub use crate::migrator::{
        Executor, InMemoryState, MigrationStateStore, MigrationStatus, Migrator, StatementExecutor,
    };
    pub use crate::operation::{
        AddField, AddIndex, Backfill, CreateTable, DropTable, Guard, Index, ModifyField,
        Operation, ReplaceField, RunSql, Step,
    };
    pub use crate::state::StateError;

    #[cfg(feature = "sqlite")]
    pub use crate::database::SqliteExecutor;
    #[cfg(feature = "sqlite")]
    pub use crate::state::SqliteMigrationState;

    #[cfg(feature = "mysql")]
    pub use crate::database::MySqlExecutor;
    #[cfg(feature = "mysql")]
    pub use crate::state::MySqlMigrationState;
}
