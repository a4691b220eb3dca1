use crate::field::{Field, FieldType, ReferentialAction};
use crate::migration::Migration;
use crate::operation::{CreateTable, DropTable};

use super::m0000_baseline;

pub const NAME: &str = "0004_pagadores";

fn criado_em() -> Field {
    Field::new("criado_em", FieldType::Timestamp).default("CURRENT_TIMESTAMP")
}

/// Payers, and the split of a payment between payers and payment methods.
pub fn migration() -> Migration {
    let pagadores = CreateTable::new("pagadores")
        .add_field(Field::id())
        .add_field(Field::new("nome", FieldType::VarChar(255)).not_null())
        .add_field(criado_em())
        .if_not_exists();

    let pagamento_pagador_forma = CreateTable::new("pagamento_pagador_forma")
        .add_field(Field::id())
        .add_field(
            Field::new("pagamento_id", FieldType::BigInt)
                .not_null()
                .references("pagamentos", "id")
                .on_delete(ReferentialAction::Cascade),
        )
        .add_field(
            Field::new("pagador_id", FieldType::Integer)
                .not_null()
                .references("pagadores", "id")
                .on_delete(ReferentialAction::Restrict),
        )
        .add_field(Field::new("forma_pagamento", FieldType::VarChar(80)).not_null())
        .add_field(
            Field::new(
                "valor",
                FieldType::Decimal {
                    precision: 10,
                    scale: 2,
                },
            )
            .not_null()
            .default("0"),
        )
        .add_field(criado_em())
        .if_not_exists();

    Migration::new(NAME)
        .depends_on(&[m0000_baseline::NAME])
        .operation(pagadores)
        .operation(pagamento_pagador_forma)
        .backward_ops(vec![
            Box::new(DropTable::new("pagamento_pagador_forma").if_exists()),
            Box::new(DropTable::new("pagadores").if_exists()),
        ])
}
