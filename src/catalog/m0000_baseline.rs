use crate::field::{Field, FieldType, ReferentialAction};
use crate::migration::Migration;
use crate::operation::CreateTable;

pub const NAME: &str = "0000_baseline";

fn money(name: &str) -> Field {
    Field::new(
        name,
        FieldType::Decimal {
            precision: 10,
            scale: 2,
        },
    )
}

fn criado_em() -> Field {
    Field::new("criado_em", FieldType::Timestamp).default("CURRENT_TIMESTAMP")
}

fn status() -> Field {
    Field::new("status", FieldType::VarChar(20))
        .not_null()
        .default("'pendente'")
}

fn clientes() -> CreateTable {
    CreateTable::new("clientes")
        .add_field(Field::id())
        .add_field(Field::new("nome", FieldType::VarChar(255)).not_null())
        .add_field(Field::new("telefone", FieldType::VarChar(30)))
        .add_field(Field::new("observacoes", FieldType::Text))
        .add_field(criado_em())
}

fn produtos() -> CreateTable {
    CreateTable::new("produtos")
        .add_field(Field::big_id())
        .add_field(Field::new("nome", FieldType::VarChar(255)).not_null())
        .add_field(
            Field::new("categoria", FieldType::enumeration(["pizza", "bebida"])).not_null(),
        )
        .add_field(Field::new("unidade", FieldType::VarChar(20)))
        .add_field(money("unidade_valor"))
        .add_field(money("preco_atual").not_null().default("0"))
        .add_field(Field::new("descricao", FieldType::Text))
        .add_field(
            Field::new("ativo", FieldType::Boolean)
                .not_null()
                .default("TRUE"),
        )
        .add_field(criado_em())
}

fn pedidos() -> CreateTable {
    CreateTable::new("pedidos")
        .add_field(Field::big_id())
        // `clientes.id` is a 32-bit key; MySQL rejects a wider referencing column.
        .add_field(Field::new("cliente_id", FieldType::Integer).references("clientes", "id"))
        .add_field(Field::new("usuario_id", FieldType::BigInt))
        .add_field(
            Field::new("tipo", FieldType::VarChar(20))
                .not_null()
                .default("'local'"),
        )
        .add_field(status())
        .add_field(Field::new("data_pedido", FieldType::Date))
        .add_field(money("subtotal"))
        .add_field(money("valor_total").default("0"))
        .add_field(Field::new("observacao", FieldType::Text))
        .add_field(criado_em())
}

fn pedido_remessas() -> CreateTable {
    CreateTable::new("pedido_remessas")
        .add_field(Field::big_id())
        .add_field(
            Field::new("pedido_id", FieldType::BigInt)
                .not_null()
                .references("pedidos", "id")
                .on_delete(ReferentialAction::Cascade),
        )
        .add_field(Field::new("observacao_remessa", FieldType::Text))
        .add_field(Field::new("endereco", FieldType::VarChar(500)))
        .add_field(criado_em())
}

fn pedido_items() -> CreateTable {
    CreateTable::new("pedido_items")
        .add_field(Field::big_id())
        .add_field(
            Field::new("pedido_id", FieldType::BigInt)
                .not_null()
                .references("pedidos", "id")
                .on_delete(ReferentialAction::Cascade),
        )
        .add_field(
            Field::new("remessa_id", FieldType::BigInt)
                .references("pedido_remessas", "id")
                .on_delete(ReferentialAction::SetNull),
        )
        .add_field(Field::new("produto_id", FieldType::BigInt).references("produtos", "id"))
        .add_field(Field::new("nome", FieldType::VarChar(255)))
        .add_field(money("quantidade").not_null().default("1"))
        .add_field(money("preco").not_null().default("0"))
        .add_field(Field::new("observacao", FieldType::Text))
        .add_field(status())
}

fn pagamentos() -> CreateTable {
    CreateTable::new("pagamentos")
        .add_field(Field::big_id())
        .add_field(
            Field::new("pedido_id", FieldType::BigInt)
                .not_null()
                .references("pedidos", "id")
                .on_delete(ReferentialAction::Cascade),
        )
        .add_field(Field::new("status", FieldType::VarChar(20)).default("'pendente'"))
        .add_field(money("valor").not_null().default("0"))
        .add_field(Field::new("forma_pagamento", FieldType::VarChar(80)).default("'dinheiro'"))
}

/// Tables as they stood before the fix-ups. Existing databases already have
/// them, so every creation is `IF NOT EXISTS` and the migration cannot be
/// rolled back.
pub fn migration() -> Migration {
    Migration::new(NAME)
        .operation(clientes().if_not_exists())
        .operation(produtos().if_not_exists())
        .operation(pedidos().if_not_exists())
        .operation(pedido_remessas().if_not_exists())
        .operation(pedido_items().if_not_exists())
        .operation(pagamentos().if_not_exists())
}
