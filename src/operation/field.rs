use crate::backend::{quote_literal, Backend};
use crate::field::{Field, FieldType};
use crate::operation::{Guard, Operation, Step};

/// `ALTER TABLE ... ADD COLUMN`. Running it twice fails on the duplicate
/// column, which the migration state prevents.
#[derive(Debug, Clone)]
pub struct AddField {
    pub table: String,
    pub field: Field,
}

impl AddField {
    pub fn new(table: impl Into<String>, field: Field) -> Self {
        Self {
            table: table.into(),
            field,
        }
    }
}

impl Operation for AddField {
    fn forward(&self, backend: &dyn Backend) -> Vec<String> {
        backend.add_field_sql(&self.table, &self.field)
    }

    fn backward(&self, backend: &dyn Backend) -> Option<Vec<String>> {
        Some(backend.drop_field_sql(&self.table, &self.field.name))
    }

    fn describe(&self) -> String {
        format!("Add field {} to {}", self.field.name, self.table)
    }
}

/// Redefine an existing column in place, e.g. widening an enumeration.
#[derive(Debug, Clone)]
pub struct ModifyField {
    pub table: String,
    pub field: Field,
    pub previous: Option<Field>,
}

impl ModifyField {
    pub fn new(table: impl Into<String>, field: Field) -> Self {
        Self {
            table: table.into(),
            field,
            previous: None,
        }
    }

    /// Definition restored on rollback.
    pub fn with_previous(mut self, previous: Field) -> Self {
        self.previous = Some(previous);
        self
    }

    /// Rows the restored enumeration cannot hold. MySQL either rejects the
    /// narrowing or blanks those values, so they must be gone first.
    fn narrowing_guard(&self, backend: &dyn Backend) -> Option<Guard> {
        let FieldType::Enum(ref variants) = self.previous.as_ref()?.field_type else {
            return None;
        };
        let allowed: Vec<String> = variants.iter().map(|v| quote_literal(v)).collect();
        let column = backend.quote_identifier(&self.field.name);

        Some(Guard {
            description: format!(
                "no {}.{} outside ({})",
                self.table,
                self.field.name,
                variants.join(", ")
            ),
            sql: format!(
                "SELECT COUNT(*) FROM {} WHERE {} NOT IN ({})",
                backend.quote_identifier(&self.table),
                column,
                allowed.join(", ")
            ),
        })
    }
}

impl Operation for ModifyField {
    fn forward(&self, backend: &dyn Backend) -> Vec<String> {
        backend
            .modify_field_sql(&self.table, &self.field)
            .unwrap_or_default()
    }

    fn backward(&self, backend: &dyn Backend) -> Option<Vec<String>> {
        let previous = self.previous.as_ref()?;
        Some(
            backend
                .modify_field_sql(&self.table, previous)
                .unwrap_or_default(),
        )
    }

    fn describe(&self) -> String {
        format!("Modify field {} on {}", self.field.name, self.table)
    }

    fn backward_steps(&self, backend: &dyn Backend) -> Option<Vec<Step>> {
        let statements = self.backward(backend)?;
        let mut steps: Vec<Step> = self
            .narrowing_guard(backend)
            .map(Step::Verify)
            .into_iter()
            .collect();
        steps.extend(statements.into_iter().map(Step::Execute));
        Some(steps)
    }

    fn is_reversible(&self) -> bool {
        self.previous.is_some()
    }

    fn supports(&self, backend: &dyn Backend) -> bool {
        let forward = backend.modify_field_sql(&self.table, &self.field).is_some();
        let backward = self
            .previous
            .as_ref()
            .is_none_or(|prev| backend.modify_field_sql(&self.table, prev).is_some());
        forward && backward
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{MySql, Sqlite};
    use crate::field::FieldType;

    fn categoria(variants: &[&str]) -> Field {
        Field::new("categoria", FieldType::enumeration(variants.iter().copied())).not_null()
    }

    #[test]
    fn add_field_generates_sql() {
        let op = AddField::new("produtos", Field::new("imagem", FieldType::VarChar(500)));

        let sql = op.forward(&Sqlite);
        assert_eq!(sql.len(), 1);
        assert!(sql[0].contains("ADD COLUMN \"imagem\""));
    }

    #[test]
    fn add_field_reverse_drops_column() {
        let op = AddField::new("produtos", Field::new("imagem", FieldType::VarChar(500)));

        assert!(op.is_reversible());
        let reverse = op.backward(&MySql).unwrap();
        assert_eq!(reverse, vec!["ALTER TABLE `produtos` DROP COLUMN `imagem`"]);
        assert_eq!(op.describe(), "Add field imagem to produtos");
    }

    #[test]
    fn modify_field_widens_enum_on_mysql() {
        let op = ModifyField::new("produtos", categoria(&["pizza", "bebida", "outros"]))
            .with_previous(categoria(&["pizza", "bebida"]));

        assert!(op.supports(&MySql));
        let forward = op.forward(&MySql);
        assert!(forward[0].contains("MODIFY COLUMN `categoria`"));
        assert!(forward[0].contains("'outros'"));

        let backward = op.backward(&MySql).unwrap();
        assert!(backward[0].contains("ENUM('pizza', 'bebida')"));
    }

    #[test]
    fn narrowing_an_enum_checks_for_removed_values() {
        let op = ModifyField::new("produtos", categoria(&["pizza", "bebida", "outros"]))
            .with_previous(categoria(&["pizza", "bebida"]));

        let steps = op.backward_steps(&MySql).unwrap();
        assert_eq!(steps.len(), 2);
        assert!(matches!(
            &steps[0],
            Step::Verify(guard)
                if guard.sql == "SELECT COUNT(*) FROM `produtos` WHERE `categoria` NOT IN ('pizza', 'bebida')"
        ));
        assert!(matches!(&steps[1], Step::Execute(sql) if sql.contains("MODIFY COLUMN")));

        let sqlite = op.backward_steps(&Sqlite).unwrap();
        assert_eq!(sqlite.len(), 1);
        assert!(matches!(&sqlite[0], Step::Verify(_)));
    }

    #[test]
    fn widening_needs_no_check() {
        let op = ModifyField::new("produtos", categoria(&["pizza", "bebida", "outros"]))
            .with_previous(categoria(&["pizza", "bebida"]));

        let steps = op.forward_steps(&MySql);
        assert!(steps.iter().all(|s| matches!(s, Step::Execute(_))));
    }

    #[test]
    fn modify_enum_is_noop_on_sqlite() {
        let op = ModifyField::new("produtos", categoria(&["pizza", "bebida", "outros"]))
            .with_previous(categoria(&["pizza", "bebida"]));

        assert!(op.supports(&Sqlite));
        assert!(op.forward(&Sqlite).is_empty());
        assert_eq!(op.backward(&Sqlite), Some(vec![]));
    }

    #[test]
    fn modify_non_text_column_unsupported_on_sqlite() {
        let op = ModifyField::new("pedidos", Field::new("subtotal", FieldType::BigInt));

        assert!(!op.supports(&Sqlite));
        assert!(op.supports(&MySql));
        assert!(!op.is_reversible());
    }
}
