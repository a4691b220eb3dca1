use crate::migration::Migration;
use crate::operation::AddIndex;

use super::m0000_baseline;

pub const NAME: &str = "0005_pedidos_indexes";

pub fn migration() -> Migration {
    Migration::new(NAME)
        .depends_on(&[m0000_baseline::NAME])
        .operation(AddIndex::on("pedidos", "data_pedido"))
        .operation(AddIndex::on("pedidos", "cliente_id"))
        .operation(AddIndex::on("pedidos", "status"))
}
