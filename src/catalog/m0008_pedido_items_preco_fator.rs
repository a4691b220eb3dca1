use crate::field::{Field, FieldType};
use crate::migration::Migration;
use crate::operation::AddField;

use super::m0000_baseline;

pub const NAME: &str = "0008_pedido_items_preco_fator";

/// Price multiplier applied per item.
pub fn migration() -> Migration {
    Migration::new(NAME)
        .depends_on(&[m0000_baseline::NAME])
        .operation(AddField::new(
            "pedido_items",
            Field::new(
                "preco_fator",
                FieldType::Decimal {
                    precision: 4,
                    scale: 2,
                },
            )
            .not_null()
            .default("1.00"),
        ))
}
