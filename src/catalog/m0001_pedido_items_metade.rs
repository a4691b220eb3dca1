use crate::field::{Field, FieldType};
use crate::migration::Migration;
use crate::operation::{AddField, Backfill, ReplaceField, RunSql};

use super::m0000_baseline;

pub const NAME: &str = "0001_pedido_items_metade";

/// Half-portion flag. Legacy rows encode a half pizza as `quantidade = 0.5`;
/// that is first copied into a text marker, which is then replaced by a
/// boolean column defaulting to false.
pub fn migration() -> Migration {
    Migration::new(NAME)
        .depends_on(&[m0000_baseline::NAME])
        .operation(AddField::new(
            "pedido_items",
            Field::new("metade", FieldType::Text),
        ))
        .operation(
            RunSql::new("UPDATE pedido_items SET metade = 'true' WHERE quantidade = 0.5")
                .with_reverse_statements(vec![])
                .with_description("Mark half portions in pedido_items.metade"),
        )
        .operation(
            ReplaceField::new(
                "pedido_items",
                Field::new("metade", FieldType::Boolean)
                    .not_null()
                    .default("FALSE"),
                "metade_bool",
                Backfill::new("TRUE", "metade = 'true'"),
            )
            .with_reverse(
                Field::new("metade", FieldType::Text),
                "metade_text",
                Backfill::new("'true'", "metade = TRUE"),
            ),
        )
}
