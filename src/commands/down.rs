use crate::catalog;
use crate::cli::DownArgs;
use crate::commands::render_plan;
use crate::config::Config;
use crate::database::Database;
use crate::migration::{MigrationError, MigrationRegistry};
use crate::migrator::Migrator;

/// Earliest migration that can be rolled back; `down --all` stops there.
fn first_reversible(registry: &MigrationRegistry) -> anyhow::Result<Option<&'static str>> {
    Ok(registry.resolve_order()?.into_iter().find(|name| {
        registry
            .get(name)
            .is_some_and(|migration| migration.is_reversible())
    }))
}

pub fn execute(args: DownArgs, config: &Config) -> anyhow::Result<()> {
    let target = config.target()?;
    let registry = catalog::registry(config.catalog_options());

    let db = Database::connect(&target)?;
    let mut session = db.session(&config.migrations_table)?;
    let mut migrator = Migrator::new(&registry, session.backend, session.state);

    let stop_at = if args.all {
        first_reversible(&registry)?
    } else if let Some(name) = args.target {
        let migration = registry
            .get(&name)
            .ok_or_else(|| MigrationError::NotFound(name.clone()))?;
        Some(migration.name)
    } else {
        migrator.last_applied()?
    };

    let Some(stop_at) = stop_at else {
        println!("Nothing to roll back.");
        return Ok(());
    };

    if args.dry_run {
        let plan = migrator.backward_plan_steps(Some(stop_at))?;
        if plan.is_empty() {
            println!("Nothing to roll back.");
        } else {
            print!("{}", render_plan(&plan));
        }
        return Ok(());
    }

    let unapplied = migrator.migrate_backward_with(Some(stop_at), &mut *session.executor)?;

    if unapplied.is_empty() {
        println!("Nothing to roll back.");
    }
    for name in &unapplied {
        println!("Rolled back {}", name);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{m0000_baseline, m0001_pedido_items_metade, CatalogOptions};

    #[test]
    fn all_stops_above_the_baseline() {
        let registry = catalog::registry(CatalogOptions::default());
        assert_eq!(
            first_reversible(&registry).unwrap(),
            Some(m0001_pedido_items_metade::NAME)
        );
        assert_ne!(
            first_reversible(&registry).unwrap(),
            Some(m0000_baseline::NAME)
        );
    }
}
