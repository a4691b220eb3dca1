use std::fmt::Write as _;

use crate::catalog;
use crate::config::Config;
use crate::migration::MigrationRegistry;

fn render(registry: &MigrationRegistry) -> anyhow::Result<String> {
    let mut out = String::new();
    for name in registry.resolve_order()? {
        let Some(migration) = registry.get(name) else {
            continue;
        };
        let note = if migration.is_reversible() {
            ""
        } else {
            " (irreversible)"
        };
        writeln!(out, "{}{}", name, note)?;
        for line in migration.describe() {
            writeln!(out, "  - {}", line)?;
        }
    }
    Ok(out)
}

pub fn execute(config: &Config) -> anyhow::Result<()> {
    let registry = catalog::registry(config.catalog_options());
    print!("{}", render(&registry)?);
    Ok(())
}
