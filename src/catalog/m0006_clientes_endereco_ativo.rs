use crate::field::{Field, FieldType};
use crate::migration::Migration;
use crate::operation::{AddField, RunSql};

use super::m0000_baseline;

pub const NAME: &str = "0006_clientes_endereco_ativo";

const DROP_ATIVO: &str = "ALTER TABLE clientes DROP COLUMN ativo";

pub fn migration() -> Migration {
    Migration::new(NAME)
        .depends_on(&[m0000_baseline::NAME])
        .operation(AddField::new(
            "clientes",
            Field::new("endereco", FieldType::VarChar(500)),
        ))
        .operation(
            RunSql::portable()
                .for_backend_reversible(
                    "mysql",
                    "ALTER TABLE clientes ADD COLUMN ativo TINYINT(1) NOT NULL DEFAULT 1",
                    DROP_ATIVO,
                )
                .for_backend_reversible(
                    "sqlite",
                    "ALTER TABLE clientes ADD COLUMN ativo BOOLEAN DEFAULT 1",
                    DROP_ATIVO,
                )
                .with_description("Add field ativo to clientes"),
        )
}
