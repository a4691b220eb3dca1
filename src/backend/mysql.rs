use sea_query::{
    IndexCreateStatement, IndexDropStatement, MysqlQueryBuilder, TableAlterStatement,
    TableCreateStatement, TableDropStatement,
};

use crate::backend::{quote_literal, Backend};

#[derive(Debug, Clone, Copy, Default)]
pub struct MySql;

impl Backend for MySql {
    fn name(&self) -> &'static str {
        "mysql"
    }

    fn supports_transactional_ddl(&self) -> bool {
        // DDL commits implicitly
        false
    }

    fn build_table_create(&self, stmt: TableCreateStatement) -> String {
        stmt.to_string(MysqlQueryBuilder)
    }

    fn build_table_drop(&self, stmt: TableDropStatement) -> String {
        stmt.to_string(MysqlQueryBuilder)
    }

    fn build_table_alter(&self, stmt: TableAlterStatement) -> String {
        stmt.to_string(MysqlQueryBuilder)
    }

    fn build_index_create(&self, stmt: IndexCreateStatement) -> String {
        stmt.to_string(MysqlQueryBuilder)
    }

    fn build_index_drop(&self, stmt: IndexDropStatement) -> String {
        stmt.to_string(MysqlQueryBuilder)
    }

    fn quote_identifier(&self, name: &str) -> String {
        format!("`{}`", name.replace('`', "``"))
    }

    fn enum_type_sql(&self, variants: &[String]) -> String {
        let values: Vec<String> = variants.iter().map(|v| quote_literal(v)).collect();
        format!("ENUM({})", values.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{Field, FieldType, ReferentialAction};
    use crate::operation::Index;

    #[test]
    fn ddl_commits_implicitly() {
        assert_eq!(MySql.name(), "mysql");
        assert!(!MySql.supports_transactional_ddl());
    }

    #[test]
    fn pagadores_table_uses_backticks() {
        let fields = vec![
            Field::id(),
            Field::new("nome", FieldType::VarChar(255)).not_null(),
        ];

        let sql = MySql.create_table_sql("pagadores", &fields, true);
        assert_eq!(sql.len(), 1);
        assert!(sql[0].starts_with("CREATE TABLE IF NOT EXISTS `pagadores`"));
        assert!(sql[0].contains("`id` int PRIMARY KEY AUTO_INCREMENT"));
        assert!(sql[0].contains("`nome` varchar(255) NOT NULL"));
    }

    #[test]
    fn payment_split_restricts_payer_deletion() {
        let fields = vec![
            Field::id(),
            Field::new("pagador_id", FieldType::Integer)
                .not_null()
                .references("pagadores", "id")
                .on_delete(ReferentialAction::Restrict),
        ];

        let sql = MySql.create_table_sql("pagamento_pagador_forma", &fields, true);
        assert!(sql[0].contains("`pagador_id` int NOT NULL"));
        assert!(sql[0].contains("REFERENCES `pagadores`"));
        assert!(sql[0].contains("ON DELETE RESTRICT"));
    }

    #[test]
    fn categoria_enum_lists_variants() {
        let variants = vec!["pizza".to_string(), "bebida".to_string()];
        assert_eq!(MySql.enum_type_sql(&variants), "ENUM('pizza', 'bebida')");
    }

    #[test]
    fn widening_categoria_modifies_the_column() {
        let field = Field::new(
            "categoria",
            FieldType::enumeration(["pizza", "bebida", "outros"]),
        )
        .not_null();

        let sql = MySql.modify_field_sql("produtos", &field).unwrap();
        assert_eq!(sql.len(), 1);
        assert!(sql[0].starts_with("ALTER TABLE `produtos` MODIFY COLUMN `categoria`"));
        assert!(sql[0].contains("ENUM('pizza', 'bebida', 'outros')"));
        assert!(sql[0].contains("NOT NULL"));
    }

    #[test]
    fn metade_replacement_defaults_to_false() {
        let field = Field::new("metade_bool", FieldType::Boolean)
            .not_null()
            .default("FALSE");

        let sql = MySql.add_field_sql("pedido_items", &field);
        assert!(sql[0].starts_with("ALTER TABLE `pedido_items` ADD COLUMN `metade_bool`"));
        assert!(sql[0].contains("NOT NULL"));
        assert!(sql[0].contains("DEFAULT FALSE"));
    }

    #[test]
    fn replacement_renamed_into_place() {
        let sql = MySql.rename_field_sql("pedido_items", "metade_bool", "metade");
        assert_eq!(
            sql,
            vec!["ALTER TABLE `pedido_items` RENAME COLUMN `metade_bool` TO `metade`"]
        );
    }

    #[test]
    fn pedidos_cliente_index_round_trip() {
        let index = Index::new("idx_pedidos_cliente_id").column("cliente_id");

        let create = MySql.add_index_sql("pedidos", &index);
        assert_eq!(
            create,
            "CREATE INDEX `idx_pedidos_cliente_id` ON `pedidos` (`cliente_id`)"
        );

        let drop = MySql.drop_index_sql("pedidos", "idx_pedidos_cliente_id");
        assert_eq!(drop, "DROP INDEX `idx_pedidos_cliente_id` ON `pedidos`");
    }

    #[test]
    fn identifiers_double_embedded_backticks() {
        assert_eq!(MySql.quote_identifier("pedido_items"), "`pedido_items`");
        assert_eq!(MySql.quote_identifier("meta`de"), "`meta``de`");
    }
}
