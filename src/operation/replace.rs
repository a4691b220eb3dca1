use crate::backend::Backend;
use crate::field::Field;
use crate::operation::{Guard, Operation, Step};

/// Deterministic mapping from the old column into the new one: `value` is
/// assigned on every row where `condition` holds. Both are raw SQL.
#[derive(Debug, Clone)]
pub struct Backfill {
    pub value: String,
    pub condition: String,
}

impl Backfill {
    pub fn new(value: impl Into<String>, condition: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            condition: condition.into(),
        }
    }
}

#[derive(Debug, Clone)]
struct Replacement {
    field: Field,
    temp_name: String,
    backfill: Backfill,
}

impl Replacement {
    fn steps(&self, backend: &dyn Backend, table: &str) -> Vec<Step> {
        let temp = self.field.renamed(&self.temp_name);
        let Backfill { value, condition } = &self.backfill;

        let mut steps = Vec::new();
        steps.extend(
            backend
                .add_field_sql(table, &temp)
                .into_iter()
                .map(Step::Execute),
        );
        steps.push(Step::Execute(backend.backfill_sql(
            table,
            &self.temp_name,
            value,
            condition,
        )));
        steps.push(Step::Verify(Guard {
            description: format!(
                "{}.{} holds {} wherever {}",
                table, self.temp_name, value, condition
            ),
            sql: backend.backfill_mismatch_sql(table, &self.temp_name, value, condition),
        }));
        steps.extend(
            backend
                .drop_field_sql(table, &self.field.name)
                .into_iter()
                .map(Step::Execute),
        );
        steps.extend(
            backend
                .rename_field_sql(table, &self.temp_name, &self.field.name)
                .into_iter()
                .map(Step::Execute),
        );
        steps
    }
}

/// Changes a column's type by building the replacement next to it:
/// add the new definition under a temporary name, backfill it from the old
/// column, verify the backfill, drop the old column, then rename the new one
/// into place. Rows outside the backfill condition keep the new column's
/// default.
#[derive(Debug, Clone)]
pub struct ReplaceField {
    pub table: String,
    forward: Replacement,
    reverse: Option<Replacement>,
}

impl ReplaceField {
    /// `field` is the final definition, named after the column it replaces.
    pub fn new(
        table: impl Into<String>,
        field: Field,
        temp_name: impl Into<String>,
        backfill: Backfill,
    ) -> Self {
        Self {
            table: table.into(),
            forward: Replacement {
                field,
                temp_name: temp_name.into(),
                backfill,
            },
            reverse: None,
        }
    }

    /// Replacement run on rollback to restore the previous definition.
    pub fn with_reverse(
        mut self,
        field: Field,
        temp_name: impl Into<String>,
        backfill: Backfill,
    ) -> Self {
        self.reverse = Some(Replacement {
            field,
            temp_name: temp_name.into(),
            backfill,
        });
        self
    }
}

fn statements(steps: Vec<Step>) -> Vec<String> {
    steps
        .into_iter()
        .filter_map(|step| match step {
            Step::Execute(sql) => Some(sql),
            Step::Verify(_) => None,
        })
        .collect()
}

impl Operation for ReplaceField {
    fn forward(&self, backend: &dyn Backend) -> Vec<String> {
        statements(self.forward_steps(backend))
    }

    fn backward(&self, backend: &dyn Backend) -> Option<Vec<String>> {
        self.backward_steps(backend).map(statements)
    }

    fn describe(&self) -> String {
        format!(
            "Replace field {} on {} via {}",
            self.forward.field.name, self.table, self.forward.temp_name
        )
    }

    fn is_reversible(&self) -> bool {
        self.reverse.is_some()
    }

    fn forward_steps(&self, backend: &dyn Backend) -> Vec<Step> {
        self.forward.steps(backend, &self.table)
    }

    fn backward_steps(&self, backend: &dyn Backend) -> Option<Vec<Step>> {
        self.reverse
            .as_ref()
            .map(|reverse| reverse.steps(backend, &self.table))
    }
}
