use std::collections::HashMap;

use thiserror::Error;

use crate::backend::Backend;
use crate::operation::{Operation, Step};
use crate::state::StateError;

/// Named, ordered set of operations applied as one unit.
pub struct Migration {
    pub name: &'static str,
    pub dependencies: &'static [&'static str],
    forward: Vec<Box<dyn Operation>>,
    backward: Option<Vec<Box<dyn Operation>>>,
    atomic: bool,
}

impl std::fmt::Debug for Migration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Migration")
            .field("name", &self.name)
            .field("dependencies", &self.dependencies)
            .field("forward", &self.describe())
            .field(
                "backward",
                &self
                    .backward
                    .as_ref()
                    .map(|ops| ops.iter().map(|op| op.describe()).collect::<Vec<_>>()),
            )
            .field("atomic", &self.atomic)
            .finish()
    }
}

impl Migration {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            dependencies: &[],
            forward: Vec::new(),
            backward: None,
            atomic: true,
        }
    }

    pub fn depends_on(mut self, dependencies: &'static [&'static str]) -> Self {
        self.dependencies = dependencies;
        self
    }

    /// Whether the migration runs inside one transaction on backends with
    /// transactional DDL. Defaults to `true`.
    pub fn atomic(mut self, atomic: bool) -> Self {
        self.atomic = atomic;
        self
    }

    pub fn is_atomic(&self) -> bool {
        self.atomic
    }

    /// Add an operation; rollback is derived from each operation's reverse.
    pub fn operation(mut self, op: impl Operation + 'static) -> Self {
        self.forward.push(Box::new(op));
        self
    }

    /// Explicit rollback operations, run in the given order instead of the
    /// derived reverse.
    pub fn backward_ops(mut self, ops: Vec<Box<dyn Operation>>) -> Self {
        self.backward = Some(ops);
        self
    }

    pub fn is_reversible(&self) -> bool {
        if self.backward.is_some() {
            return true;
        }
        self.forward.iter().all(|op| op.is_reversible())
    }

    /// Every operation, in both directions, renders for `backend`.
    pub fn supports(&self, backend: &dyn Backend) -> bool {
        self.forward
            .iter()
            .chain(self.backward.iter().flatten())
            .all(|op| op.supports(backend))
    }

    pub fn describe(&self) -> Vec<String> {
        self.forward.iter().map(|op| op.describe()).collect()
    }

    pub fn forward_steps(&self, backend: &dyn Backend) -> Vec<Step> {
        self.forward
            .iter()
            .flat_map(|op| op.forward_steps(backend))
            .collect()
    }

    /// `None` if the migration cannot be reversed.
    pub fn backward_steps(&self, backend: &dyn Backend) -> Option<Vec<Step>> {
        if let Some(ref backward) = self.backward {
            return Some(
                backward
                    .iter()
                    .flat_map(|op| op.forward_steps(backend))
                    .collect(),
            );
        }

        let mut steps = Vec::new();
        for op in self.forward.iter().rev() {
            steps.extend(op.backward_steps(backend)?);
        }
        Some(steps)
    }

    /// Executable statements only, without verification guards.
    pub fn forward_sql(&self, backend: &dyn Backend) -> Vec<String> {
        self.forward
            .iter()
            .flat_map(|op| op.forward(backend))
            .collect()
    }

    pub fn backward_sql(&self, backend: &dyn Backend) -> Option<Vec<String>> {
        if let Some(ref backward) = self.backward {
            return Some(backward.iter().flat_map(|op| op.forward(backend)).collect());
        }

        let mut sqls = Vec::new();
        for op in self.forward.iter().rev() {
            sqls.extend(op.backward(backend)?);
        }
        Some(sqls)
    }

    pub fn forward_operations(&self) -> &[Box<dyn Operation>] {
        &self.forward
    }
}

#[derive(Default)]
pub struct MigrationRegistry {
    migrations: HashMap<&'static str, Migration>,
    order: Vec<&'static str>,
}

impl MigrationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registering a name twice replaces the earlier migration in place.
    pub fn register(&mut self, migration: Migration) {
        let name = migration.name;
        if self.migrations.insert(name, migration).is_none() {
            self.order.push(name);
        }
    }

    pub fn get(&self, name: &str) -> Option<&Migration> {
        self.migrations.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.migrations.contains_key(name)
    }

    /// Migrations in registration order.
    pub fn all(&self) -> impl Iterator<Item = &Migration> {
        self.order
            .iter()
            .filter_map(|name| self.migrations.get(name))
    }

    /// Dependency order: depth-first over dependencies, with registration
    /// order breaking ties.
    pub fn resolve_order(&self) -> Result<Vec<&'static str>, MigrationError> {
        let mut resolved: Vec<&'static str> = Vec::new();
        let mut in_progress: HashMap<&'static str, bool> = HashMap::new();

        for name in &self.order {
            self.visit(name, &mut resolved, &mut in_progress)?;
        }

        Ok(resolved)
    }

    fn visit(
        &self,
        name: &'static str,
        resolved: &mut Vec<&'static str>,
        in_progress: &mut HashMap<&'static str, bool>,
    ) -> Result<(), MigrationError> {
        match in_progress.get(name) {
            Some(true) => return Err(MigrationError::CircularDependency(name.to_string())),
            Some(false) => return Ok(()),
            None => {}
        }

        in_progress.insert(name, true);

        let migration = self
            .migrations
            .get(name)
            .ok_or_else(|| MigrationError::NotFound(name.to_string()))?;

        for dep in migration.dependencies {
            self.visit(dep, resolved, in_progress)?;
        }

        in_progress.insert(name, false);
        resolved.push(name);

        Ok(())
    }

    pub fn len(&self) -> usize {
        self.migrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.migrations.is_empty()
    }
}

fn completed_suffix(completed: &[String]) -> String {
    if completed.is_empty() {
        String::new()
    } else {
        format!(" (completed: {})", completed.join(", "))
    }
}

#[derive(Debug, Error)]
pub enum MigrationError {
    #[error("Migration not found: {0}")]
    NotFound(String),

    #[error("Circular dependency detected at: {0}")]
    CircularDependency(String),

    #[error("Migration is not reversible: {0}")]
    NotReversible(String),

    #[error("Migration {migration} has no SQL for backend {backend}")]
    Unsupported {
        migration: String,
        backend: &'static str,
    },

    #[error(
        "Migration {migration} stopped: {rows} row(s) violate `{guard}`{}",
        completed_suffix(.completed)
    )]
    GuardFailed {
        migration: String,
        guard: String,
        rows: i64,
        /// Migrations that were successfully applied before the failure.
        completed: Vec<String>,
    },

    #[error("Migration {migration} failed: {error}{}", completed_suffix(.completed))]
    ExecutionFailed {
        migration: String,
        error: String,
        /// Migrations that were successfully applied before the failure.
        completed: Vec<String>,
    },

    #[error("Migration state: {0}")]
    State(#[from] StateError),
}

impl MigrationError {
    /// Migrations completed before a failed run stopped.
    pub fn completed(&self) -> &[String] {
        match self {
            MigrationError::GuardFailed { completed, .. }
            | MigrationError::ExecutionFailed { completed, .. } => completed,
            _ => &[],
        }
    }
}
