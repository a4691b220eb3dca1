use crate::field::{Field, FieldType};
use crate::migration::Migration;
use crate::operation::ModifyField;

use super::{m0000_baseline, CatalogOptions};

pub const NAME: &str = "0003_produtos_categoria_outros";

const PREVIOUS: [&str; 2] = ["pizza", "bebida"];
const CURRENT: [&str; 3] = ["pizza", "bebida", "outros"];

fn categoria(field_type: FieldType) -> Field {
    Field::new("categoria", field_type).not_null()
}

/// Adds `outros` to the product categories. Hosts that reject `ENUM`
/// alterations get a `VARCHAR(100)` column instead.
pub fn migration(options: CatalogOptions) -> Migration {
    let target = if options.enum_as_varchar {
        FieldType::VarChar(100)
    } else {
        FieldType::enumeration(CURRENT)
    };

    Migration::new(NAME)
        .depends_on(&[m0000_baseline::NAME])
        .operation(
            ModifyField::new("produtos", categoria(target))
                .with_previous(categoria(FieldType::enumeration(PREVIOUS))),
        )
}
