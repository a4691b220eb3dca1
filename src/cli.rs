//! Command-line arguments for `mimonb-migrate`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::backend::Dialect;
use crate::config::Config;

/// Schema migrations for the order database
#[derive(Parser, Debug)]
#[command(name = "mimonb-migrate")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Database to migrate (overrides DATABASE_URL)
    #[arg(long, global = true)]
    pub database_url: Option<String>,

    /// Table that records applied migrations (overrides MIGRATIONS_TABLE)
    #[arg(long, global = true)]
    pub table: Option<String>,

    /// Widen produtos.categoria to VARCHAR instead of altering the ENUM
    #[arg(long, global = true)]
    pub enum_as_varchar: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Applies command-line overrides on top of the environment.
    pub fn apply(&self, config: &mut Config) {
        if let Some(ref url) = self.database_url {
            config.database_url = url.clone();
        }
        if let Some(ref table) = self.table {
            config.migrations_table = table.clone();
        }
        if self.enum_as_varchar {
            config.enum_as_varchar = true;
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Apply pending migrations
    Up(UpArgs),

    /// Roll back applied migrations
    Down(DownArgs),

    /// Show which migrations are applied
    Status,

    /// List migrations and their operations
    List,

    /// Print the SQL of every migration
    Sql(SqlArgs),

    /// Write one SQL file per migration
    Export(ExportArgs),
}

#[derive(Args, Debug)]
pub struct UpArgs {
    /// Stop after this migration
    #[arg(long)]
    pub target: Option<String>,

    /// Copy the SQLite database file to <file>.bak first
    #[arg(long)]
    pub backup: bool,

    /// Print the plan without executing it
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Args, Debug)]
pub struct DownArgs {
    /// Roll back down to and including this migration
    #[arg(long, conflicts_with = "all")]
    pub target: Option<String>,

    /// Roll back every applied migration
    #[arg(long)]
    pub all: bool,

    /// Print the plan without executing it
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Args, Debug)]
pub struct SqlArgs {
    #[arg(long, value_enum, default_value = "sqlite")]
    pub dialect: Dialect,

    /// Print rollback SQL, newest migration first
    #[arg(long)]
    pub backward: bool,
}

#[derive(Args, Debug)]
pub struct ExportArgs {
    #[arg(long, value_enum)]
    pub dialect: Dialect,

    /// Output directory, created when missing
    #[arg(long, default_value = "sql")]
    pub dir: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_up_with_flags() {
        let cli = Cli::try_parse_from([
            "mimonb-migrate",
            "up",
            "--target",
            "0004_pagadores",
            "--backup",
            "--dry-run",
        ])
        .unwrap();

        match cli.command {
            Commands::Up(args) => {
                assert_eq!(args.target.as_deref(), Some("0004_pagadores"));
                assert!(args.backup);
                assert!(args.dry_run);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn down_target_conflicts_with_all() {
        let result = Cli::try_parse_from([
            "mimonb-migrate",
            "down",
            "--all",
            "--target",
            "0002_produtos_imagem",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn global_overrides_apply_to_config() {
        let cli = Cli::try_parse_from([
            "mimonb-migrate",
            "status",
            "--database-url",
            "sqlite::memory:",
            "--table",
            "mimonb_migrations",
            "--enum-as-varchar",
        ])
        .unwrap();

        let mut config = Config::default();
        cli.apply(&mut config);

        assert_eq!(config.database_url, "sqlite::memory:");
        assert_eq!(config.migrations_table, "mimonb_migrations");
        assert!(config.enum_as_varchar);
    }

    #[test]
    fn sql_dialect_choices() {
        let cli = Cli::try_parse_from(["mimonb-migrate", "sql", "--dialect", "mysql", "--backward"])
            .unwrap();
        match cli.command {
            Commands::Sql(args) => {
                assert_eq!(args.dialect, Dialect::MySql);
                assert!(args.backward);
            }
            other => panic!("unexpected command: {:?}", other),
        }

        assert!(Cli::try_parse_from(["mimonb-migrate", "sql", "--dialect", "postgres"]).is_err());
    }

    #[test]
    fn export_requires_dialect() {
        assert!(Cli::try_parse_from(["mimonb-migrate", "export"]).is_err());

        let cli =
            Cli::try_parse_from(["mimonb-migrate", "export", "--dialect", "sqlite"]).unwrap();
        match cli.command {
            Commands::Export(args) => assert_eq!(args.dir, PathBuf::from("sql")),
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
