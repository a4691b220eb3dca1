use std::fmt::Write as _;

use crate::backend::Backend;
use crate::catalog;
use crate::cli::SqlArgs;
use crate::commands::render_steps;
use crate::config::Config;
use crate::migration::MigrationRegistry;

/// Full catalog as SQL, without consulting any database. Rollback output runs
/// newest first and notes migrations that cannot be reversed.
pub fn render(
    registry: &MigrationRegistry,
    backend: &dyn Backend,
    backward: bool,
) -> anyhow::Result<String> {
    let mut order = registry.resolve_order()?;
    if backward {
        order.reverse();
    }

    let mut out = String::new();
    for name in order {
        let Some(migration) = registry.get(name) else {
            continue;
        };
        writeln!(out, "-- {}", name)?;

        let steps = if backward {
            migration.backward_steps(backend)
        } else {
            Some(migration.forward_steps(backend))
        };
        match steps {
            Some(steps) => out.push_str(&render_steps(&steps)),
            None => writeln!(out, "-- irreversible")?,
        }
        out.push('\n');
    }
    Ok(out)
}

pub fn execute(args: SqlArgs, config: &Config) -> anyhow::Result<()> {
    let registry = catalog::registry(config.catalog_options());
    print!("{}", render(&registry, args.dialect.backend(), args.backward)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{MySql, Sqlite};
    use crate::catalog::CatalogOptions;

    fn catalog() -> MigrationRegistry {
        catalog::registry(CatalogOptions::default())
    }

    #[test]
    fn forward_covers_the_catalog_in_order() {
        let out = render(&catalog(), &MySql, false).unwrap();

        let baseline = out.find("-- 0000_baseline").unwrap();
        let last = out.find("-- 0010_pedidos_data").unwrap();
        assert!(baseline < last);
        assert!(out.contains("CREATE INDEX `idx_pedidos_status` ON `pedidos` (`status`);"));
        assert!(out.contains("-- verify: "));
    }

    #[test]
    fn backward_runs_newest_first() {
        let out = render(&catalog(), &Sqlite, true).unwrap();

        let last = out.find("-- 0010_pedidos_data").unwrap();
        let baseline = out.find("-- 0000_baseline").unwrap();
        assert!(last < baseline);
        assert!(out.ends_with("-- 0000_baseline\n-- irreversible\n\n"));
        assert!(out.contains("DROP INDEX \"idx_pedidos_data_pedido\";"));
    }
}
