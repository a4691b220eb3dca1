use crate::field::{Field, FieldType};
use crate::migration::Migration;
use crate::operation::AddField;

use super::m0000_baseline;

pub const NAME: &str = "0002_produtos_imagem";

/// Image URL or storage key; existing products get NULL.
pub fn migration() -> Migration {
    Migration::new(NAME)
        .depends_on(&[m0000_baseline::NAME])
        .operation(AddField::new(
            "produtos",
            Field::new("imagem", FieldType::VarChar(500)),
        ))
}
