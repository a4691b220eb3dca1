use anyhow::Context;
use tracing::{info, warn};

use crate::catalog;
use crate::cli::UpArgs;
use crate::commands::render_plan;
use crate::config::{Config, Target};
use crate::database::{self, Database};
use crate::migrator::Migrator;

pub fn execute(args: UpArgs, config: &Config) -> anyhow::Result<()> {
    let target = config.target()?;
    let registry = catalog::registry(config.catalog_options());

    if args.backup && !args.dry_run {
        backup(&target)?;
    }

    let db = Database::connect(&target)?;
    let mut session = db.session(&config.migrations_table)?;
    let mut migrator = Migrator::new(&registry, session.backend, session.state);

    if args.dry_run {
        let plan = migrator.forward_plan_steps(args.target.as_deref())?;
        if plan.is_empty() {
            println!("Nothing to apply.");
        } else {
            print!("{}", render_plan(&plan));
        }
        return Ok(());
    }

    let applied = migrator.migrate_forward_with(args.target.as_deref(), &mut *session.executor)?;

    if applied.is_empty() {
        println!("Nothing to apply.");
    }
    for name in &applied {
        println!("Applied {}", name);
    }
    info!(count = applied.len(), "migrations applied");
    Ok(())
}

fn backup(target: &Target) -> anyhow::Result<()> {
    match target {
        Target::SqliteFile(path) if !path.exists() => {
            warn!(path = %path.display(), "database file does not exist yet, skipping backup");
            Ok(())
        }
        Target::SqliteFile(_) => {
            let copy = database::backup(target).context("backup before migrating")?;
            println!("Backup written to {}", copy.display());
            Ok(())
        }
        _ => {
            warn!(database = %target, "backups are only taken of SQLite files, skipping");
            Ok(())
        }
    }
}
