//! Reusable step constructors.

use super::expressions::Expression;
use super::types::{Shell, Step};

/// Output name written by [`ternary_step`].
pub const TERNARY_OUTPUT: &str = "value";

/// A bash step that writes `then_value` or `else_value` to the step output
/// `value`, depending on `bash_condition`.
///
/// Expression-level `cond && a || b` misbehaves when `a` is falsy, so the
/// branch is taken in the shell instead. Read the result with
/// [`ternary_output`].
pub fn ternary_step(step_id: &str, bash_condition: &str, then_value: &str, else_value: &str) -> Step {
    let script = format!(
        "if [[ {cond} ]]; then\n  echo \"{out}={then}\" >> \"$GITHUB_OUTPUT\"\nelse\n  echo \"{out}={otherwise}\" >> \"$GITHUB_OUTPUT\"\nfi",
        cond = bash_condition,
        out = TERNARY_OUTPUT,
        then = then_value,
        otherwise = else_value,
    );
    Step::run(script).with_id(step_id).with_shell(Shell::Bash)
}

/// Expression reading the result of a [`ternary_step`].
pub fn ternary_output(step_id: &str) -> Expression {
    Expression::step_output(step_id, TERNARY_OUTPUT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ternary_step_shape() {
        let step = ternary_step("env-name", "\"$REF\" == main", "production", "staging");
        assert_eq!(step.id, "env-name");
        assert_eq!(step.shell, Some(Shell::Bash));
        assert!(step.run.starts_with("if [[ \"$REF\" == main ]]; then"));
        assert!(step.run.contains("echo \"value=production\" >> \"$GITHUB_OUTPUT\""));
        assert!(step.run.contains("echo \"value=staging\" >> \"$GITHUB_OUTPUT\""));
        assert!(step.run.ends_with("fi"));
    }

    #[test]
    fn test_ternary_output_expression() {
        assert_eq!(
            ternary_output("env-name").to_string(),
            "${{steps.env-name.outputs.value}}"
        );
    }
}
