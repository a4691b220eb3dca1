use std::collections::HashMap;

use crate::backend::Backend;
use crate::operation::Operation;

#[derive(Debug, Clone)]
enum SqlSource {
    Any(Vec<String>),
    ByBackend(HashMap<&'static str, Vec<String>>),
}

impl SqlSource {
    fn resolve(&self, backend: &dyn Backend) -> Option<&[String]> {
        match self {
            SqlSource::Any(sql) => Some(sql.as_slice()),
            SqlSource::ByBackend(map) => map.get(backend.name()).map(Vec::as_slice),
        }
    }

    fn insert(&mut self, backend: &'static str, sql: Vec<String>) {
        match self {
            SqlSource::ByBackend(map) => {
                map.insert(backend, sql);
            }
            SqlSource::Any(_) => {
                let mut map = HashMap::new();
                map.insert(backend, sql);
                *self = SqlSource::ByBackend(map);
            }
        }
    }
}

/// Hand-written SQL, either shared by every dialect or given per dialect.
#[derive(Debug, Clone)]
pub struct RunSql {
    forward: SqlSource,
    backward: Option<SqlSource>,
    description: String,
}

impl RunSql {
    pub fn new(sql: impl Into<String>) -> Self {
        Self::statements(vec![sql.into()])
    }

    pub fn statements(sqls: Vec<String>) -> Self {
        Self {
            forward: SqlSource::Any(sqls),
            backward: None,
            description: "Run custom SQL".to_string(),
        }
    }

    /// Dialect-specific SQL; add each dialect with `for_backend`.
    /// Unconfigured dialects are reported by `supports`.
    pub fn portable() -> Self {
        Self {
            forward: SqlSource::ByBackend(HashMap::new()),
            backward: None,
            description: "Run portable SQL".to_string(),
        }
    }

    pub fn for_backend(mut self, backend: &'static str, sql: impl Into<String>) -> Self {
        self.forward.insert(backend, vec![sql.into()]);
        self
    }

    pub fn for_backend_reversible(
        mut self,
        backend: &'static str,
        forward: impl Into<String>,
        backward: impl Into<String>,
    ) -> Self {
        self.forward.insert(backend, vec![forward.into()]);
        self.backward
            .get_or_insert_with(|| SqlSource::ByBackend(HashMap::new()))
            .insert(backend, vec![backward.into()]);
        self
    }

    pub fn with_reverse(self, sql: impl Into<String>) -> Self {
        self.with_reverse_statements(vec![sql.into()])
    }

    /// An empty list marks the statement as safe to skip on rollback.
    pub fn with_reverse_statements(mut self, sqls: Vec<String>) -> Self {
        self.backward = Some(SqlSource::Any(sqls));
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

impl Operation for RunSql {
    fn forward(&self, backend: &dyn Backend) -> Vec<String> {
        self.forward
            .resolve(backend)
            .map(<[String]>::to_vec)
            .unwrap_or_default()
    }

    fn backward(&self, backend: &dyn Backend) -> Option<Vec<String>> {
        let backward = self.backward.as_ref()?;
        Some(
            backward
                .resolve(backend)
                .map(<[String]>::to_vec)
                .unwrap_or_default(),
        )
    }

    fn describe(&self) -> String {
        self.description.clone()
    }

    fn is_reversible(&self) -> bool {
        self.backward.is_some()
    }

    fn supports(&self, backend: &dyn Backend) -> bool {
        self.forward.resolve(backend).is_some()
            && self
                .backward
                .as_ref()
                .is_none_or(|b| b.resolve(backend).is_some())
    }
}
