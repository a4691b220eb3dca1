mod field;
mod index;
mod replace;
mod sql;
mod table;

pub use field::{AddField, ModifyField};
pub use index::{AddIndex, Index};
pub use replace::{Backfill, ReplaceField};
pub use sql::RunSql;
pub use table::{CreateTable, DropTable};

use crate::backend::Backend;

/// Verification query run between statements. The query returns a single
/// row count, and any non-zero count aborts the migration.
#[derive(Debug, Clone, PartialEq)]
pub struct Guard {
    pub description: String,
    pub sql: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    Execute(String),
    Verify(Guard),
}

impl Step {
    pub fn sql(&self) -> &str {
        match self {
            Step::Execute(sql) => sql,
            Step::Verify(guard) => &guard.sql,
        }
    }
}

fn execute_all(statements: Vec<String>) -> Vec<Step> {
    statements.into_iter().map(Step::Execute).collect()
}

pub trait Operation: Send + Sync {
    fn forward(&self, backend: &dyn Backend) -> Vec<String>;

    fn backward(&self, backend: &dyn Backend) -> Option<Vec<String>>;

    fn describe(&self) -> String;

    fn is_reversible(&self) -> bool {
        true
    }

    /// Whether this operation can be rendered for `backend` at all.
    fn supports(&self, _backend: &dyn Backend) -> bool {
        true
    }

    fn forward_steps(&self, backend: &dyn Backend) -> Vec<Step> {
        execute_all(self.forward(backend))
    }

    fn backward_steps(&self, backend: &dyn Backend) -> Option<Vec<Step>> {
        self.backward(backend).map(execute_all)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::Sqlite;
    use crate::field::{Field, FieldType};

    #[test]
    fn default_steps_wrap_statements() {
        let op = AddField::new("produtos", Field::new("imagem", FieldType::VarChar(500)));

        let steps = op.forward_steps(&Sqlite);
        assert_eq!(steps.len(), 1);
        assert!(matches!(&steps[0], Step::Execute(sql) if sql.contains("ADD COLUMN")));

        let back = op.backward_steps(&Sqlite).unwrap();
        assert_eq!(back[0].sql(), "ALTER TABLE \"produtos\" DROP COLUMN \"imagem\"");
    }
}
