//! MySQL integration tests
//!
//! These tests require a running MySQL 8 instance with an empty database.
//! They are ignored by default. To run them:
//!
//! ```sh
//! # Set environment variables (optional, defaults shown)
//! export MYSQL_HOST=localhost
//! export MYSQL_USER=root
//! export MYSQL_PASSWORD=root
//! export MYSQL_DB=mimonb_test
//!
//! # Run the ignored tests
//! cargo test --features mysql --test mysql_integration -- --ignored --test-threads=1
//! ```
#![cfg(feature = "mysql")]

use std::env;

use mimonb_schema::catalog;
use mimonb_schema::prelude::*;
use mysql::prelude::*;
use mysql::Pool;

fn test_target() -> Target {
    let host = env::var("MYSQL_HOST").unwrap_or_else(|_| "localhost".to_string());
    let user = env::var("MYSQL_USER").unwrap_or_else(|_| "root".to_string());
    let password = env::var("MYSQL_PASSWORD").unwrap_or_else(|_| "root".to_string());
    let dbname = env::var("MYSQL_DB").unwrap_or_else(|_| "mimonb_test".to_string());

    Target::parse(&format!("mysql://{}:{}@{}/{}", user, password, host, dbname)).unwrap()
}

fn pool(db: &Database) -> &Pool {
    match db {
        Database::MySql(pool) => pool,
        #[allow(unreachable_patterns)]
        _ => unreachable!("mysql target opened another database"),
    }
}

const TABLES: [&str; 9] = [
    "pagamento_pagador_forma",
    "pagadores",
    "pagamentos",
    "pedido_items",
    "pedido_remessas",
    "pedidos",
    "produtos",
    "clientes",
    "schema_migrations",
];

fn fresh_db() -> Database {
    let db = Database::connect(&test_target()).unwrap();
    let mut conn = pool(&db).get_conn().unwrap();
    conn.query_drop("SET FOREIGN_KEY_CHECKS = 0").unwrap();
    for table in TABLES {
        conn.query_drop(format!("DROP TABLE IF EXISTS {}", table))
            .unwrap();
    }
    conn.query_drop("SET FOREIGN_KEY_CHECKS = 1").unwrap();
    db
}

fn up(db: &Database, options: CatalogOptions, target: Option<&str>) -> Vec<String> {
    let registry = catalog::registry(options);
    let mut session = db.session("schema_migrations").unwrap();
    let mut migrator = Migrator::new(&registry, session.backend, session.state);
    migrator
        .migrate_forward_with(target, &mut *session.executor)
        .unwrap()
}

fn column_type(db: &Database, table: &str, column: &str) -> Option<String> {
    let mut conn = pool(db).get_conn().unwrap();
    conn.exec_first(
        "SELECT COLUMN_TYPE FROM information_schema.COLUMNS
         WHERE TABLE_SCHEMA = DATABASE() AND TABLE_NAME = ? AND COLUMN_NAME = ?",
        (table, column),
    )
    .unwrap()
}

#[test]
#[ignore = "requires mysql connection"]
fn applies_the_catalog_once() {
    let db = fresh_db();

    assert_eq!(up(&db, CatalogOptions::default(), None).len(), 11);
    assert!(up(&db, CatalogOptions::default(), None).is_empty());

    assert_eq!(
        column_type(&db, "produtos", "categoria").as_deref(),
        Some("enum('pizza','bebida','outros')")
    );
    assert_eq!(
        column_type(&db, "pedido_items", "metade").as_deref(),
        Some("tinyint(1)")
    );
    assert_eq!(
        column_type(&db, "clientes", "ativo").as_deref(),
        Some("tinyint(1)")
    );
}

#[test]
#[ignore = "requires mysql connection"]
fn metade_backfill_on_mysql() {
    let db = fresh_db();
    up(&db, CatalogOptions::default(), Some("0000_baseline"));

    let mut conn = pool(&db).get_conn().unwrap();
    conn.query_drop("INSERT INTO pedidos (tipo) VALUES ('local')")
        .unwrap();
    conn.query_drop("INSERT INTO pedido_items (pedido_id, quantidade) VALUES (1, 0.5), (1, 1.0)")
        .unwrap();

    up(&db, CatalogOptions::default(), None);

    let metade: Vec<bool> = conn
        .query("SELECT metade FROM pedido_items ORDER BY id")
        .unwrap();
    assert_eq!(metade, vec![true, false]);
}

#[test]
#[ignore = "requires mysql connection"]
fn varchar_fallback_for_categoria() {
    let db = fresh_db();
    let options = CatalogOptions {
        enum_as_varchar: true,
    };

    up(&db, options, None);

    assert_eq!(
        column_type(&db, "produtos", "categoria").as_deref(),
        Some("varchar(100)")
    );
}

#[test]
#[ignore = "requires mysql connection"]
fn payer_split_rejects_unknown_payment() {
    let db = fresh_db();
    up(&db, CatalogOptions::default(), None);

    let mut conn = pool(&db).get_conn().unwrap();
    let result = conn.query_drop(
        "INSERT INTO pagamento_pagador_forma (pagamento_id, pagador_id, forma_pagamento, valor)
         VALUES (999, 999, 'pix', 10)",
    );
    assert!(result.is_err());
}

#[test]
#[ignore = "requires mysql connection"]
fn rollback_without_transactions() {
    let db = fresh_db();
    up(&db, CatalogOptions::default(), None);

    let registry = catalog::registry(CatalogOptions::default());
    let mut session = db.session("schema_migrations").unwrap();
    assert!(!session.backend.supports_transactional_ddl());

    let mut migrator = Migrator::new(&registry, session.backend, session.state);
    let unapplied = migrator
        .migrate_backward_with(Some("0001_pedido_items_metade"), &mut *session.executor)
        .unwrap();

    assert_eq!(unapplied.len(), 10);
    assert_eq!(column_type(&db, "produtos", "imagem"), None);
    assert_eq!(
        column_type(&db, "produtos", "categoria").as_deref(),
        Some("enum('pizza','bebida')")
    );
}
