use crate::catalog;
use crate::config::Config;
use crate::database::Database;
use crate::migrator::Migrator;

pub fn execute(config: &Config) -> anyhow::Result<()> {
    let target = config.target()?;
    let registry = catalog::registry(config.catalog_options());

    let db = Database::connect(&target)?;
    let session = db.session(&config.migrations_table)?;
    let mut migrator = Migrator::new(&registry, session.backend, session.state);

    let status = migrator.status()?;
    let pending = status.iter().filter(|s| !s.applied).count();

    println!("Database: {}", target);
    for entry in &status {
        let mark = if entry.applied { "x" } else { " " };
        println!("[{}] {}", mark, entry.name);
    }
    println!("{} applied, {} pending", status.len() - pending, pending);
    Ok(())
}
