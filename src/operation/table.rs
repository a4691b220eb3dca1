use crate::backend::Backend;
use crate::field::Field;
use crate::operation::Operation;

#[derive(Debug, Clone)]
pub struct CreateTable {
    pub name: String,
    pub fields: Vec<Field>,
    pub if_not_exists: bool,
}

impl CreateTable {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            if_not_exists: false,
        }
    }

    pub fn add_field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    /// Skip creation when the table is already there. The table may then
    /// predate the migration, so the automatic reverse (drop) is withheld.
    pub fn if_not_exists(mut self) -> Self {
        self.if_not_exists = true;
        self
    }
}

impl Operation for CreateTable {
    fn forward(&self, backend: &dyn Backend) -> Vec<String> {
        backend.create_table_sql(&self.name, &self.fields, self.if_not_exists)
    }

    fn backward(&self, backend: &dyn Backend) -> Option<Vec<String>> {
        if self.if_not_exists {
            return None;
        }
        Some(vec![backend.drop_table_sql(&self.name, false)])
    }

    fn describe(&self) -> String {
        if self.if_not_exists {
            format!("Create table {} if not exists", self.name)
        } else {
            format!("Create table {}", self.name)
        }
    }

    fn is_reversible(&self) -> bool {
        !self.if_not_exists
    }
}

#[derive(Debug, Clone)]
pub struct DropTable {
    pub name: String,
    pub if_exists: bool,
    pub fields: Option<Vec<Field>>,
}

impl DropTable {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            if_exists: false,
            fields: None,
        }
    }

    pub fn if_exists(mut self) -> Self {
        self.if_exists = true;
        self
    }

    /// Definition used to recreate the table on rollback.
    pub fn with_fields(mut self, fields: Vec<Field>) -> Self {
        self.fields = Some(fields);
        self
    }
}

impl Operation for DropTable {
    fn forward(&self, backend: &dyn Backend) -> Vec<String> {
        vec![backend.drop_table_sql(&self.name, self.if_exists)]
    }

    fn backward(&self, backend: &dyn Backend) -> Option<Vec<String>> {
        self.fields
            .as_ref()
            .map(|fields| backend.create_table_sql(&self.name, fields, false))
    }

    fn describe(&self) -> String {
        format!("Drop table {}", self.name)
    }

    fn is_reversible(&self) -> bool {
        self.fields.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{MySql, Sqlite};
    use crate::field::FieldType;

    fn pagadores() -> CreateTable {
        CreateTable::new("pagadores")
            .add_field(Field::id())
            .add_field(Field::new("nome", FieldType::VarChar(255)).not_null())
    }

    #[test]
    fn create_table_generates_valid_sql() {
        let sql = pagadores().forward(&Sqlite);
        assert!(sql[0].starts_with("CREATE TABLE \"pagadores\""));
        assert!(sql[0].contains("PRIMARY KEY"));
        assert!(sql[0].contains("AUTOINCREMENT"));
        assert!(sql[0].contains("\"nome\""));
    }

    #[test]
    fn create_table_is_reversible() {
        let op = pagadores();
        assert!(op.is_reversible());
        assert_eq!(
            op.backward(&Sqlite),
            Some(vec!["DROP TABLE \"pagadores\"".to_string()])
        );
    }

    #[test]
    fn create_table_if_not_exists_withholds_reverse() {
        let op = pagadores().if_not_exists();

        let sql = op.forward(&MySql);
        assert!(sql[0].starts_with("CREATE TABLE IF NOT EXISTS `pagadores`"));
        assert!(!op.is_reversible());
        assert!(op.backward(&MySql).is_none());
        assert_eq!(op.describe(), "Create table pagadores if not exists");
    }

    #[test]
    fn drop_table_without_fields_is_not_reversible() {
        let op = DropTable::new("pagadores");
        assert!(!op.is_reversible());
        assert!(op.backward(&Sqlite).is_none());
        assert_eq!(op.forward(&Sqlite), vec!["DROP TABLE \"pagadores\""]);
    }

    #[test]
    fn drop_table_if_exists_with_fields_is_reversible() {
        let op = DropTable::new("pagadores")
            .if_exists()
            .with_fields(pagadores().fields);

        assert_eq!(op.forward(&Sqlite), vec!["DROP TABLE IF EXISTS \"pagadores\""]);
        assert!(op.is_reversible());
        let reverse = op.backward(&Sqlite).unwrap();
        assert!(reverse[0].starts_with("CREATE TABLE \"pagadores\""));
        assert_eq!(op.describe(), "Drop table pagadores");
    }
}
