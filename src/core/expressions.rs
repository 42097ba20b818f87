//! Workflow expression strings (`${{ ... }}`).
//!
//! Pure string building: no parsing or evaluation. Every `or`/`and`
//! combination is parenthesized so composed expressions keep their grouping.
//! <https://docs.github.com/en/actions/reference/evaluate-expressions-in-workflows-and-actions>

use super::error::WorkflowError;
use std::fmt;

/// The body of an expression, without the `${{ }}` delimiters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Expression(String);

impl Expression {
    /// Use a raw fragment as-is.
    pub fn raw(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn string_literal(value: &str) -> Self {
        Self(format!("\"{}\"", value))
    }

    pub fn bool_literal(value: bool) -> Self {
        Self(value.to_string())
    }

    pub fn int_literal(value: i64) -> Self {
        Self(value.to_string())
    }

    pub fn float_literal(value: f64) -> Self {
        Self(value.to_string())
    }

    pub fn inputs(name: &str) -> Self {
        Self(format!("inputs.{}", name))
    }

    pub fn secrets(name: &str) -> Self {
        Self(format!("secrets.{}", name))
    }

    pub fn step_output(step_id: &str, output: &str) -> Self {
        Self(format!("steps.{}.outputs.{}", step_id, output))
    }

    pub fn or(self, other: Expression) -> Self {
        Self(format!("{} || {}", self.0, other.0)).with_parentheses()
    }

    pub fn and(self, other: Expression) -> Self {
        Self(format!("{} && {}", self.0, other.0)).with_parentheses()
    }

    pub fn with_parentheses(self) -> Self {
        Self(format!("( {} )", self.0))
    }

    /// The raw body, without delimiters.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${{{{{}}}}}", self.0)
    }
}

// Falsy literals in conditionals. `false` here is the boolean, not a string.
const ALWAYS_FALSE: &[&str] = &["", "\"\"", "''", "false", "0", "-0", "null"];

/// True when `value` is a literal that always evaluates to false.
pub fn is_always_false(value: &str) -> bool {
    ALWAYS_FALSE.contains(&value)
}

/// True when `value` is the boolean literal `true`.
pub fn is_always_true(value: &str) -> bool {
    value == "true"
}

pub fn check_always_false(value: &str) -> Result<(), WorkflowError> {
    if is_always_false(value) {
        return Err(WorkflowError::ConstantCondition {
            value: value.to_string(),
            always: false,
        });
    }
    Ok(())
}

pub fn check_always_true(value: &str) -> Result<(), WorkflowError> {
    if is_always_true(value) {
        return Err(WorkflowError::ConstantCondition {
            value: value.to_string(),
            always: true,
        });
    }
    Ok(())
}
