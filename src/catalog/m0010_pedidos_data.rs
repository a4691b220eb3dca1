use crate::field::{Field, FieldType};
use crate::migration::Migration;
use crate::operation::{AddField, RunSql};

use super::m0000_baseline;

pub const NAME: &str = "0010_pedidos_data";

/// Calendar day of each order, taken from its creation time where known.
pub fn migration() -> Migration {
    Migration::new(NAME)
        .depends_on(&[m0000_baseline::NAME])
        .operation(AddField::new("pedidos", Field::new("data", FieldType::Date)))
        .operation(
            RunSql::new(
                "UPDATE pedidos SET data = DATE(criado_em) WHERE data IS NULL AND criado_em IS NOT NULL",
            )
            .with_reverse_statements(Vec::new())
            .with_description("Backfill pedidos.data from criado_em"),
        )
}
