use crate::field::{Field, FieldType};
use crate::migration::Migration;
use crate::operation::{AddField, RunSql};

use super::m0000_baseline;

pub const NAME: &str = "0009_pedido_remessas_status_tipo";

const DROP_TIPO: &str = "ALTER TABLE pedido_remessas DROP COLUMN tipo";

pub fn migration() -> Migration {
    Migration::new(NAME)
        .depends_on(&[m0000_baseline::NAME])
        .operation(AddField::new(
            "pedido_remessas",
            Field::new("status", FieldType::VarChar(20))
                .not_null()
                .default("'pendente'"),
        ))
        .operation(
            RunSql::portable()
                .for_backend_reversible(
                    "mysql",
                    "ALTER TABLE pedido_remessas ADD COLUMN tipo VARCHAR(20) NOT NULL DEFAULT 'local'",
                    DROP_TIPO,
                )
                .for_backend_reversible(
                    "sqlite",
                    "ALTER TABLE pedido_remessas ADD COLUMN tipo TEXT DEFAULT 'local'",
                    DROP_TIPO,
                )
                .with_description("Add field tipo to pedido_remessas"),
        )
}
