//! Subcommand implementations. Each one takes its parsed arguments and the
//! resolved configuration.

pub mod down;
pub mod export;
pub mod list;
pub mod sql;
pub mod status;
pub mod up;

use std::fmt::Write as _;

use crate::operation::Step;

/// Renders steps as a runnable script. Guards become comments carrying the
/// verification query and the count it must return.
pub fn render_steps(steps: &[Step]) -> String {
    let mut out = String::new();
    for step in steps {
        match step {
            Step::Execute(sql) => {
                let _ = writeln!(out, "{};", sql);
            }
            Step::Verify(guard) => {
                let _ = writeln!(out, "-- verify: {}", guard.description);
                let _ = writeln!(out, "-- expect 0: {};", guard.sql);
            }
        }
    }
    out
}

/// Renders a plan as one commented block per migration.
pub fn render_plan(plan: &[(&str, Vec<Step>)]) -> String {
    let mut out = String::new();
    for (name, steps) in plan {
        let _ = writeln!(out, "-- {}", name);
        if steps.is_empty() {
            let _ = writeln!(out, "-- (no statements for this dialect)");
        }
        out.push_str(&render_steps(steps));
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operation::Guard;

    #[test]
    fn guards_render_as_comments() {
        let steps = vec![
            Step::Execute("UPDATE pedido_items SET metade_bool = TRUE WHERE metade = 'true'".into()),
            Step::Verify(Guard {
                description: "backfill complete".into(),
                sql: "SELECT COUNT(*) FROM pedido_items".into(),
            }),
        ];

        assert_eq!(
            render_steps(&steps),
            "UPDATE pedido_items SET metade_bool = TRUE WHERE metade = 'true';\n\
             -- verify: backfill complete\n\
             -- expect 0: SELECT COUNT(*) FROM pedido_items;\n"
        );
    }

    #[test]
    fn plan_marks_empty_migrations() {
        let plan = vec![("0003_produtos_categoria_outros", vec![])];
        let out = render_plan(&plan);
        assert!(out.starts_with("-- 0003_produtos_categoria_outros\n"));
        assert!(out.contains("no statements"));
    }
}
