mod mysql;
mod sqlite;

pub use mysql::MySql;
pub use sqlite::Sqlite;

use sea_query::{
    Alias, ColumnDef, ForeignKey as SeaForeignKey, ForeignKeyAction, Index as SeaIndex,
    IndexCreateStatement, IndexDropStatement, Table, TableAlterStatement, TableCreateStatement,
    TableDropStatement,
};

use crate::field::{Field, FieldType, ReferentialAction};
use crate::operation::Index;

/// Supported SQL dialects, selectable from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Dialect {
    #[value(name = "sqlite")]
    Sqlite,
    #[value(name = "mysql")]
    MySql,
}

impl Dialect {
    pub fn backend(self) -> &'static dyn Backend {
        match self {
            Dialect::Sqlite => &Sqlite,
            Dialect::MySql => &MySql,
        }
    }

    pub fn name(self) -> &'static str {
        self.backend().name()
    }
}

/// SQL dialect. Statement shapes are built with `sea-query` and rendered by
/// the dialect's query builder.
pub trait Backend: Send + Sync {
    fn name(&self) -> &'static str;
    fn supports_transactional_ddl(&self) -> bool;

    fn build_table_create(&self, stmt: TableCreateStatement) -> String;
    fn build_table_drop(&self, stmt: TableDropStatement) -> String;
    fn build_table_alter(&self, stmt: TableAlterStatement) -> String;
    fn build_index_create(&self, stmt: IndexCreateStatement) -> String;
    fn build_index_drop(&self, stmt: IndexDropStatement) -> String;

    fn quote_identifier(&self, name: &str) -> String;

    /// Column type used for a closed set of string values.
    fn enum_type_sql(&self, variants: &[String]) -> String;

    /// Change the definition of an existing column in place.
    /// `None` when the dialect cannot express the change.
    fn modify_field_sql(&self, table: &str, field: &Field) -> Option<Vec<String>> {
        let stmt = Table::alter()
            .table(Alias::new(table))
            .modify_column(field_to_column_def(self, field))
            .to_owned();
        Some(vec![self.build_table_alter(stmt)])
    }

    fn create_table_sql(&self, name: &str, fields: &[Field], if_not_exists: bool) -> Vec<String> {
        let mut stmt = Table::create();
        stmt.table(Alias::new(name));

        if if_not_exists {
            stmt.if_not_exists();
        }

        for field in fields {
            stmt.col(field_to_column_def(self, field));
        }

        for field in fields {
            if let Some(ref fk) = field.references {
                stmt.foreign_key(
                    SeaForeignKey::create()
                        .from_col(Alias::new(&field.name))
                        .to_tbl(Alias::new(&fk.table))
                        .to_col(Alias::new(&fk.column))
                        .on_delete(referential_action_to_sea(&fk.on_delete)),
                );
            }
        }

        vec![self.build_table_create(stmt)]
    }

    fn drop_table_sql(&self, name: &str, if_exists: bool) -> String {
        let mut stmt = Table::drop();
        stmt.table(Alias::new(name));
        if if_exists {
            stmt.if_exists();
        }
        self.build_table_drop(stmt)
    }

    fn add_field_sql(&self, table: &str, field: &Field) -> Vec<String> {
        let stmt = Table::alter()
            .table(Alias::new(table))
            .add_column(field_to_column_def(self, field))
            .to_owned();
        vec![self.build_table_alter(stmt)]
    }

    fn drop_field_sql(&self, table: &str, field_name: &str) -> Vec<String> {
        let stmt = Table::alter()
            .table(Alias::new(table))
            .drop_column(Alias::new(field_name))
            .to_owned();
        vec![self.build_table_alter(stmt)]
    }

    fn rename_field_sql(&self, table: &str, old_name: &str, new_name: &str) -> Vec<String> {
        let stmt = Table::alter()
            .table(Alias::new(table))
            .rename_column(Alias::new(old_name), Alias::new(new_name))
            .to_owned();
        vec![self.build_table_alter(stmt)]
    }

    /// `UPDATE table SET column = value WHERE condition`, with `value` and
    /// `condition` passed through as raw SQL.
    fn backfill_sql(&self, table: &str, column: &str, value: &str, condition: &str) -> String {
        format!(
            "UPDATE {} SET {} = {} WHERE {}",
            self.quote_identifier(table),
            self.quote_identifier(column),
            value,
            condition
        )
    }

    /// Counts rows matching `condition` whose `column` does not hold `value`.
    fn backfill_mismatch_sql(
        &self,
        table: &str,
        column: &str,
        value: &str,
        condition: &str,
    ) -> String {
        let column = self.quote_identifier(column);
        format!(
            "SELECT COUNT(*) FROM {} WHERE ({}) AND ({} IS NULL OR {} <> {})",
            self.quote_identifier(table),
            condition,
            column,
            column,
            value
        )
    }

    fn add_index_sql(&self, table: &str, index: &Index) -> String {
        let mut stmt = SeaIndex::create();
        stmt.name(&index.name).table(Alias::new(table));

        for col_name in &index.columns {
            stmt.col(Alias::new(col_name));
        }

        self.build_index_create(stmt.to_owned())
    }

    fn drop_index_sql(&self, table: &str, index_name: &str) -> String {
        let stmt = SeaIndex::drop()
            .name(index_name)
            .table(Alias::new(table))
            .to_owned();
        self.build_index_drop(stmt)
    }
}

fn field_to_column_def<B: Backend + ?Sized>(backend: &B, field: &Field) -> ColumnDef {
    let mut col = ColumnDef::new(Alias::new(&field.name));

    apply_column_type(backend, &mut col, &field.field_type);

    if field.primary_key {
        col.primary_key();
        if field.field_type.is_serial() {
            col.auto_increment();
        }
    }

    if !field.nullable && !field.primary_key {
        col.not_null();
    }

    if let Some(ref default) = field.default {
        col.default(sea_query::Expr::cust(default));
    }

    col
}

fn apply_column_type<B: Backend + ?Sized>(
    backend: &B,
    col: &mut ColumnDef,
    field_type: &FieldType,
) {
    match field_type {
        FieldType::Serial | FieldType::Integer => {
            col.integer();
        }
        FieldType::BigSerial | FieldType::BigInt => {
            col.big_integer();
        }
        FieldType::Text => {
            col.text();
        }
        FieldType::VarChar(len) => {
            col.string_len(*len as u32);
        }
        FieldType::Boolean => {
            col.boolean();
        }
        FieldType::Timestamp => {
            col.timestamp();
        }
        FieldType::Date => {
            col.date();
        }
        FieldType::Decimal { precision, scale } => {
            col.custom(Alias::new(format!("DECIMAL({}, {})", precision, scale)));
        }
        FieldType::Enum(variants) => {
            col.custom(Alias::new(backend.enum_type_sql(variants)));
        }
    }
}

fn referential_action_to_sea(action: &ReferentialAction) -> ForeignKeyAction {
    match action {
        ReferentialAction::NoAction => ForeignKeyAction::NoAction,
        ReferentialAction::Restrict => ForeignKeyAction::Restrict,
        ReferentialAction::Cascade => ForeignKeyAction::Cascade,
        ReferentialAction::SetNull => ForeignKeyAction::SetNull,
    }
}

/// SQL string literal with embedded quotes doubled.
pub(crate) fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}
