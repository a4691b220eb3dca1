use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::info;

use crate::backend::Backend;
use crate::catalog;
use crate::cli::ExportArgs;
use crate::commands::render_steps;
use crate::config::Config;
use crate::migration::MigrationRegistry;

/// Writes `<name>.<dialect>.sql` per migration, plus `<name>.<dialect>.down.sql`
/// for reversible ones. Returns the written paths.
pub fn write_scripts(
    registry: &MigrationRegistry,
    backend: &dyn Backend,
    dir: &Path,
) -> anyhow::Result<Vec<PathBuf>> {
    fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;

    let mut written = Vec::new();
    for name in registry.resolve_order()? {
        let Some(migration) = registry.get(name) else {
            continue;
        };

        let up = dir.join(format!("{}.{}.sql", name, backend.name()));
        let body = format!(
            "-- {} ({})\n{}",
            name,
            backend.name(),
            render_steps(&migration.forward_steps(backend))
        );
        fs::write(&up, body).with_context(|| format!("writing {}", up.display()))?;
        written.push(up);

        if let Some(steps) = migration.backward_steps(backend) {
            let down = dir.join(format!("{}.{}.down.sql", name, backend.name()));
            let body = format!(
                "-- rollback {} ({})\n{}",
                name,
                backend.name(),
                render_steps(&steps)
            );
            fs::write(&down, body).with_context(|| format!("writing {}", down.display()))?;
            written.push(down);
        }
    }
    Ok(written)
}

pub fn execute(args: ExportArgs, config: &Config) -> anyhow::Result<()> {
    let registry = catalog::registry(config.catalog_options());
    let written = write_scripts(&registry, args.dialect.backend(), &args.dir)?;

    info!(dir = %args.dir.display(), files = written.len(), "exported migrations");
    for path in &written {
        println!("{}", path.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MySql;
    use crate::catalog::CatalogOptions;

    #[test]
    fn writes_up_and_down_scripts() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("sql");
        let registry = catalog::registry(CatalogOptions::default());

        let written = write_scripts(&registry, &MySql, &out).unwrap();

        // Eleven up scripts, ten rollbacks; the baseline has none.
        assert_eq!(written.len(), 21);
        assert!(!out.join("0000_baseline.mysql.down.sql").exists());

        let metade = fs::read_to_string(out.join("0001_pedido_items_metade.mysql.sql")).unwrap();
        assert!(metade.starts_with("-- 0001_pedido_items_metade (mysql)\n"));
        assert!(metade.contains("-- verify: pedido_items.metade_bool holds TRUE wherever metade = 'true'"));

        let pagadores =
            fs::read_to_string(out.join("0004_pagadores.mysql.down.sql")).unwrap();
        assert!(pagadores.contains("DROP TABLE IF EXISTS `pagamento_pagador_forma`;"));
    }
}
