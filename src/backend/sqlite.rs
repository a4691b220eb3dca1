use sea_query::{
    IndexCreateStatement, IndexDropStatement, SqliteQueryBuilder, TableAlterStatement,
    TableCreateStatement, TableDropStatement,
};

use crate::backend::Backend;
use crate::field::{Field, FieldType};

#[derive(Debug, Clone, Copy, Default)]
pub struct Sqlite;

impl Backend for Sqlite {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn supports_transactional_ddl(&self) -> bool {
        true
    }

    fn build_table_create(&self, stmt: TableCreateStatement) -> String {
        stmt.to_string(SqliteQueryBuilder)
    }

    fn build_table_drop(&self, stmt: TableDropStatement) -> String {
        stmt.to_string(SqliteQueryBuilder)
    }

    fn build_table_alter(&self, stmt: TableAlterStatement) -> String {
        stmt.to_string(SqliteQueryBuilder)
    }

    fn build_index_create(&self, stmt: IndexCreateStatement) -> String {
        stmt.to_string(SqliteQueryBuilder)
    }

    fn build_index_drop(&self, stmt: IndexDropStatement) -> String {
        stmt.to_string(SqliteQueryBuilder)
    }

    fn quote_identifier(&self, name: &str) -> String {
        format!("\"{}\"", name.replace('"', "\"\""))
    }

    fn enum_type_sql(&self, _variants: &[String]) -> String {
        "TEXT".to_string()
    }

    fn modify_field_sql(&self, _table: &str, field: &Field) -> Option<Vec<String>> {
        // No ALTER COLUMN. Textual columns all share TEXT affinity and carry
        // no length or value checks, so redefining one needs no statement.
        match field.field_type {
            FieldType::Enum(_) | FieldType::Text | FieldType::VarChar(_) => Some(Vec::new()),
            _ => None,
        }
    }
}
