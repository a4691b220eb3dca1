//! Schema history of the order database, oldest first.

pub mod m0000_baseline;
pub mod m0001_pedido_items_metade;
pub mod m0002_produtos_imagem;
pub mod m0003_produtos_categoria_outros;
pub mod m0004_pagadores;
pub mod m0005_pedidos_indexes;
pub mod m0006_clientes_endereco_ativo;
pub mod m0007_pagamentos_timestamps;
pub mod m0008_pedido_items_preco_fator;
pub mod m0009_pedido_remessas_status_tipo;
pub mod m0010_pedidos_data;

use crate::migration::MigrationRegistry;

/// Switches that change how individual migrations render.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct CatalogOptions {
    /// Widen `produtos.categoria` to `VARCHAR(100)` instead of altering the
    /// `ENUM`.
    pub enum_as_varchar: bool,
}

pub fn registry(options: CatalogOptions) -> MigrationRegistry {
    let mut registry = MigrationRegistry::new();
    registry.register(m0000_baseline::migration());
    registry.register(m0001_pedido_items_metade::migration());
    registry.register(m0002_produtos_imagem::migration());
    registry.register(m0003_produtos_categoria_outros::migration(options));
    registry.register(m0004_pagadores::migration());
    registry.register(m0005_pedidos_indexes::migration());
    registry.register(m0006_clientes_endereco_ativo::migration());
    registry.register(m0007_pagamentos_timestamps::migration());
    registry.register(m0008_pedido_items_preco_fator::migration());
    registry.register(m0009_pedido_remessas_status_tipo::migration());
    registry.register(m0010_pedidos_data::migration());
    registry
}
