use tracing::{debug, info, warn};

use crate::backend::Backend;
use crate::migration::{Migration, MigrationError, MigrationRegistry};
use crate::operation::Step;
use crate::state::StateError;

/// Record of which migrations have been applied.
pub trait MigrationStateStore {
    fn applied_migrations(&mut self) -> Result<Vec<String>, StateError>;
    fn mark_applied(&mut self, name: &str) -> Result<(), StateError>;
    fn mark_unapplied(&mut self, name: &str) -> Result<(), StateError>;
}

impl<S: MigrationStateStore + ?Sized> MigrationStateStore for Box<S> {
    fn applied_migrations(&mut self) -> Result<Vec<String>, StateError> {
        (**self).applied_migrations()
    }

    fn mark_applied(&mut self, name: &str) -> Result<(), StateError> {
        (**self).mark_applied(name)
    }

    fn mark_unapplied(&mut self, name: &str) -> Result<(), StateError> {
        (**self).mark_unapplied(name)
    }
}

/// Runs migration SQL against a live database. Failures are reported as the
/// engine's message.
pub trait Executor {
    fn execute(&mut self, sql: &str) -> Result<(), String>;

    /// Evaluates a guard query returning a single row count. `None` means
    /// this executor cannot read results, so the guard is skipped.
    fn count(&mut self, _sql: &str) -> Result<Option<i64>, String> {
        Ok(None)
    }

    fn begin(&mut self) -> Result<(), String> {
        Ok(())
    }

    fn commit(&mut self) -> Result<(), String> {
        Ok(())
    }

    fn rollback(&mut self) -> Result<(), String> {
        Ok(())
    }
}

/// Adapts a statement callback into an `Executor` without transactions or
/// guard evaluation.
pub struct StatementExecutor<F>(pub F);

impl<F> Executor for StatementExecutor<F>
where
    F: FnMut(&str) -> Result<(), String>,
{
    fn execute(&mut self, sql: &str) -> Result<(), String> {
        (self.0)(sql)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Direction {
    Forward,
    Backward,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MigrationStatus {
    pub name: &'static str,
    pub applied: bool,
}

pub struct Migrator<'a, S: MigrationStateStore> {
    registry: &'a MigrationRegistry,
    backend: &'a dyn Backend,
    state: S,
}

impl<'a, S: MigrationStateStore> Migrator<'a, S> {
    pub fn new(registry: &'a MigrationRegistry, backend: &'a dyn Backend, state: S) -> Self {
        Self {
            registry,
            backend,
            state,
        }
    }

    pub fn backend(&self) -> &'a dyn Backend {
        self.backend
    }

    pub fn into_state(self) -> S {
        self.state
    }

    fn migration(&self, name: &str) -> Result<&'a Migration, MigrationError> {
        self.registry
            .get(name)
            .ok_or_else(|| MigrationError::NotFound(name.to_string()))
    }

    fn check_target(&self, target: Option<&str>) -> Result<(), MigrationError> {
        match target {
            Some(name) if !self.registry.contains(name) => {
                Err(MigrationError::NotFound(name.to_string()))
            }
            _ => Ok(()),
        }
    }

    fn check_supported(&self, names: &[&'static str]) -> Result<(), MigrationError> {
        for name in names {
            if !self.migration(name)?.supports(self.backend) {
                return Err(MigrationError::Unsupported {
                    migration: name.to_string(),
                    backend: self.backend.name(),
                });
            }
        }
        Ok(())
    }

    /// Every registered migration in dependency order with its state.
    pub fn status(&mut self) -> Result<Vec<MigrationStatus>, MigrationError> {
        let order = self.registry.resolve_order()?;
        let applied = self.state.applied_migrations()?;

        Ok(order
            .into_iter()
            .map(|name| MigrationStatus {
                name,
                applied: applied.iter().any(|a| a == name),
            })
            .collect())
    }

    /// Most recently applied migration in dependency order.
    pub fn last_applied(&mut self) -> Result<Option<&'static str>, MigrationError> {
        Ok(self
            .status()?
            .into_iter()
            .rev()
            .find(|s| s.applied)
            .map(|s| s.name))
    }

    pub fn plan_forward(&mut self) -> Result<Vec<&'static str>, MigrationError> {
        self.plan_forward_to(None)
    }

    /// Pending migrations in dependency order, ending with `target` when given.
    pub fn plan_forward_to(
        &mut self,
        target: Option<&str>,
    ) -> Result<Vec<&'static str>, MigrationError> {
        self.check_target(target)?;
        let order = self.registry.resolve_order()?;
        let applied = self.state.applied_migrations()?;

        let mut to_apply = Vec::new();
        for name in order {
            if !applied.iter().any(|a| a == name) {
                to_apply.push(name);
            }
            if Some(name) == target {
                break;
            }
        }

        self.check_supported(&to_apply)?;
        Ok(to_apply)
    }

    /// Applied migrations newest first. With `target`, stops after unapplying
    /// `target` itself; migrations ordered before it stay applied.
    pub fn plan_backward(
        &mut self,
        target: Option<&str>,
    ) -> Result<Vec<&'static str>, MigrationError> {
        self.check_target(target)?;
        let order = self.registry.resolve_order()?;
        let applied = self.state.applied_migrations()?;

        let start = match target {
            Some(target) => order.iter().position(|&n| n == target).unwrap_or(0),
            None => 0,
        };

        let to_unapply: Vec<&'static str> = order[start..]
            .iter()
            .rev()
            .filter(|name| applied.iter().any(|a| a == *name))
            .copied()
            .collect();

        for name in &to_unapply {
            if !self.migration(name)?.is_reversible() {
                return Err(MigrationError::NotReversible(name.to_string()));
            }
        }

        self.check_supported(&to_unapply)?;
        Ok(to_unapply)
    }

    /// Forward steps per pending migration, guards included.
    pub fn forward_plan_steps(
        &mut self,
        target: Option<&str>,
    ) -> Result<Vec<(&'static str, Vec<Step>)>, MigrationError> {
        let mut result = Vec::new();
        for name in self.plan_forward_to(target)? {
            result.push((name, self.migration(name)?.forward_steps(self.backend)));
        }
        Ok(result)
    }

    pub fn backward_plan_steps(
        &mut self,
        target: Option<&str>,
    ) -> Result<Vec<(&'static str, Vec<Step>)>, MigrationError> {
        let mut result = Vec::new();
        for name in self.plan_backward(target)? {
            let steps = self
                .migration(name)?
                .backward_steps(self.backend)
                .ok_or_else(|| MigrationError::NotReversible(name.to_string()))?;
            result.push((name, steps));
        }
        Ok(result)
    }

    pub fn generate_forward_sql(&mut self) -> Result<Vec<(String, Vec<String>)>, MigrationError> {
        let mut result = Vec::new();
        for name in self.plan_forward()? {
            result.push((name.to_string(), self.migration(name)?.forward_sql(self.backend)));
        }
        Ok(result)
    }

    pub fn generate_backward_sql(
        &mut self,
        target: Option<&str>,
    ) -> Result<Vec<(String, Vec<String>)>, MigrationError> {
        let mut result = Vec::new();
        for name in self.plan_backward(target)? {
            let sqls = self
                .migration(name)?
                .backward_sql(self.backend)
                .ok_or_else(|| MigrationError::NotReversible(name.to_string()))?;
            result.push((name.to_string(), sqls));
        }
        Ok(result)
    }

    /// Applies every pending migration through a statement callback.
    /// No transactions, and guards are logged as skipped.
    pub fn migrate_forward<F>(&mut self, executor: F) -> Result<Vec<String>, MigrationError>
    where
        F: FnMut(&str) -> Result<(), String>,
    {
        self.migrate_forward_with(None, &mut StatementExecutor(executor))
    }

    pub fn migrate_backward<F>(
        &mut self,
        target: Option<&str>,
        executor: F,
    ) -> Result<Vec<String>, MigrationError>
    where
        F: FnMut(&str) -> Result<(), String>,
    {
        self.migrate_backward_with(target, &mut StatementExecutor(executor))
    }

    /// Applies pending migrations up to `target`, each one at most once.
    ///
    /// An atomic migration on a backend with transactional DDL runs between
    /// `begin` and `commit`, with its state row written inside the same
    /// transaction, and is rolled back on any failure. A failing guard stops
    /// the migration before the statements that follow it.
    pub fn migrate_forward_with<E>(
        &mut self,
        target: Option<&str>,
        executor: &mut E,
    ) -> Result<Vec<String>, MigrationError>
    where
        E: Executor + ?Sized,
    {
        let plan = self.forward_plan_steps(target)?;
        let mut applied = Vec::new();

        for (name, steps) in plan {
            info!(migration = name, "applying migration");
            self.run(name, &steps, Direction::Forward, executor, &applied)?;
            info!(migration = name, "applied migration");
            applied.push(name.to_string());
        }

        Ok(applied)
    }

    /// Unapplies migrations newest first, down to and including `target`.
    pub fn migrate_backward_with<E>(
        &mut self,
        target: Option<&str>,
        executor: &mut E,
    ) -> Result<Vec<String>, MigrationError>
    where
        E: Executor + ?Sized,
    {
        let plan = self.backward_plan_steps(target)?;
        let mut unapplied = Vec::new();

        for (name, steps) in plan {
            info!(migration = name, "unapplying migration");
            self.run(name, &steps, Direction::Backward, executor, &unapplied)?;
            info!(migration = name, "unapplied migration");
            unapplied.push(name.to_string());
        }

        Ok(unapplied)
    }

    fn run<E>(
        &mut self,
        name: &'static str,
        steps: &[Step],
        direction: Direction,
        executor: &mut E,
        completed: &[String],
    ) -> Result<(), MigrationError>
    where
        E: Executor + ?Sized,
    {
        let wrap = self.backend.supports_transactional_ddl() && self.migration(name)?.is_atomic();

        if wrap {
            executor
                .begin()
                .map_err(|e| failed(name, format!("begin transaction: {}", e), completed))?;
        }

        let outcome = match run_steps(name, steps, executor, completed) {
            Ok(()) => self.record(name, direction, completed),
            Err(err) => Err(err),
        };

        if let Err(err) = outcome {
            if wrap {
                warn!(migration = name, "rolling back");
                if let Err(e) = executor.rollback() {
                    warn!(migration = name, error = %e, "rollback failed");
                }
            }
            return Err(err);
        }

        if wrap {
            if let Err(e) = executor.commit() {
                if let Err(rollback) = executor.rollback() {
                    warn!(migration = name, error = %rollback, "rollback failed");
                }
                return Err(failed(name, format!("commit transaction: {}", e), completed));
            }
        }

        Ok(())
    }

    fn record(
        &mut self,
        name: &str,
        direction: Direction,
        completed: &[String],
    ) -> Result<(), MigrationError> {
        let result = match direction {
            Direction::Forward => self.state.mark_applied(name),
            Direction::Backward => self.state.mark_unapplied(name),
        };
        result.map_err(|e| failed(name, e.to_string(), completed))
    }
}

fn failed(name: &str, error: String, completed: &[String]) -> MigrationError {
    MigrationError::ExecutionFailed {
        migration: name.to_string(),
        error,
        completed: completed.to_vec(),
    }
}

fn run_steps<E>(
    name: &str,
    steps: &[Step],
    executor: &mut E,
    completed: &[String],
) -> Result<(), MigrationError>
where
    E: Executor + ?Sized,
{
    for step in steps {
        match step {
            Step::Execute(sql) => {
                debug!(migration = name, %sql, "executing");
                executor
                    .execute(sql)
                    .map_err(|e| failed(name, e, completed))?;
            }
            Step::Verify(guard) => {
                let count = executor
                    .count(&guard.sql)
                    .map_err(|e| failed(name, e, completed))?;
                match count {
                    Some(0) => debug!(migration = name, guard = %guard.description, "guard passed"),
                    Some(rows) => {
                        warn!(migration = name, guard = %guard.description, rows, "guard failed");
                        return Err(MigrationError::GuardFailed {
                            migration: name.to_string(),
                            guard: guard.description.clone(),
                            rows,
                            completed: completed.to_vec(),
                        });
                    }
                    None => {
                        warn!(migration = name, guard = %guard.description, "guard not evaluated")
                    }
                }
            }
        }
    }
    Ok(())
}

/// State held in memory, for previews and tests.
#[derive(Debug, Default)]
pub struct InMemoryState {
    applied: Vec<String>,
}

impl InMemoryState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_applied(applied: Vec<String>) -> Self {
        Self { applied }
    }
}

impl MigrationStateStore for InMemoryState {
    fn applied_migrations(&mut self) -> Result<Vec<String>, StateError> {
        Ok(self.applied.clone())
    }

    fn mark_applied(&mut self, name: &str) -> Result<(), StateError> {
        if !self.applied.iter().any(|a| a == name) {
            self.applied.push(name.to_string());
        }
        Ok(())
    }

    fn mark_unapplied(&mut self, name: &str) -> Result<(), StateError> {
        self.applied.retain(|n| n != name);
        Ok(())
    }
}
