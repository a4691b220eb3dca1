use crate::backend::Backend;
use crate::operation::Operation;

#[derive(Debug, Clone)]
pub struct Index {
    pub name: String,
    pub columns: Vec<String>,
}

impl Index {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
        }
    }

    pub fn column(mut self, name: impl Into<String>) -> Self {
        self.columns.push(name.into());
        self
    }
}

/// Secondary, non-unique index.
#[derive(Debug, Clone)]
pub struct AddIndex {
    pub table: String,
    pub index: Index,
}

impl AddIndex {
    pub fn new(table: impl Into<String>, index: Index) -> Self {
        Self {
            table: table.into(),
            index,
        }
    }

    /// Single-column index named `idx_<table>_<column>`.
    pub fn on(table: impl Into<String>, column: &str) -> Self {
        let table = table.into();
        let index = Index::new(format!("idx_{}_{}", table, column)).column(column);
        Self::new(table, index)
    }
}

impl Operation for AddIndex {
    fn forward(&self, backend: &dyn Backend) -> Vec<String> {
        vec![backend.add_index_sql(&self.table, &self.index)]
    }

    fn backward(&self, backend: &dyn Backend) -> Option<Vec<String>> {
        Some(vec![backend.drop_index_sql(&self.table, &self.index.name)])
    }

    fn describe(&self) -> String {
        format!("Add index {} on {}", self.index.name, self.table)
    }
}
