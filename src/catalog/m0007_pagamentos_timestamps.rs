use crate::migration::Migration;
use crate::operation::RunSql;

use super::m0000_baseline;

pub const NAME: &str = "0007_pagamentos_timestamps";

// SQLite rejects non-constant defaults on ADD COLUMN, so its columns are
// plain DATETIME.
pub fn migration() -> Migration {
    Migration::new(NAME)
        .depends_on(&[m0000_baseline::NAME])
        .operation(
            RunSql::portable()
                .for_backend_reversible(
                    "mysql",
                    "ALTER TABLE pagamentos ADD COLUMN criado_em DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP",
                    "ALTER TABLE pagamentos DROP COLUMN criado_em",
                )
                .for_backend_reversible(
                    "sqlite",
                    "ALTER TABLE pagamentos ADD COLUMN criado_em DATETIME",
                    "ALTER TABLE pagamentos DROP COLUMN criado_em",
                )
                .with_description("Add field criado_em to pagamentos"),
        )
        .operation(
            RunSql::portable()
                .for_backend_reversible(
                    "mysql",
                    "ALTER TABLE pagamentos ADD COLUMN atualizado_em DATETIME NULL DEFAULT NULL ON UPDATE CURRENT_TIMESTAMP",
                    "ALTER TABLE pagamentos DROP COLUMN atualizado_em",
                )
                .for_backend_reversible(
                    "sqlite",
                    "ALTER TABLE pagamentos ADD COLUMN atualizado_em DATETIME",
                    "ALTER TABLE pagamentos DROP COLUMN atualizado_em",
                )
                .with_description("Add field atualizado_em to pagamentos"),
        )
}
