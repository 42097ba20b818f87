//! Error kinds for workflow assembly, variant decoding, and validation.

use thiserror::Error;

/// Errors produced while building, decoding, or validating workflows.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkflowError {
    /// A required input was empty at assembly time.
    #[error("{field} is required")]
    MissingRequiredField { field: String },

    /// Wire data for a union-typed field matched none of its legal shapes.
    #[error("invalid {field} value, expected {expected}")]
    InvalidVariantShape { field: String, expected: String },

    /// A job carries both inline steps and a remote workflow reference.
    #[error("job '{job}' has both steps and a uses reference")]
    AmbiguousReference { job: String },

    /// `include` and `exclude` cannot be used as matrix dimension names.
    #[error("'{name}' is a reserved matrix key")]
    ReservedDimension { name: String },

    /// An option or input failed validation; wraps the underlying problems.
    #[error("{context}: {source}")]
    InvalidInput {
        context: String,
        #[source]
        source: Box<WorkflowError>,
    },

    /// Several independent problems, reported together.
    #[error("{}", join_lines(.0))]
    Aggregate(Vec<WorkflowError>),

    #[error("job '{job}' needs unknown job '{need}'")]
    UnknownNeed { job: String, need: String },

    #[error("job '{job}' references unknown workflow '{reference}'")]
    UnknownReference { job: String, reference: String },

    /// Distinct workflows that would be written to the same file.
    #[error("workflows {} all derive file name '{filename}'", .workflows.join(", "))]
    DuplicateFilename {
        filename: String,
        workflows: Vec<String>,
    },

    #[error("job dependency cycle detected involving: {}", .jobs.join(", "))]
    DependencyCycle { jobs: Vec<String> },

    #[error("'{job}' is not a valid job id")]
    InvalidJobId { job: String },

    #[error("value is always {always}: {value:?}")]
    ConstantCondition { value: String, always: bool },

    #[error("serialize error: {0}")]
    Serialize(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("{path}: {message}")]
    Io { path: String, message: String },
}

fn join_lines(errors: &[WorkflowError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

impl WorkflowError {
    pub fn missing(field: &str) -> Self {
        Self::MissingRequiredField {
            field: field.to_string(),
        }
    }

    pub fn invalid_shape(field: &str, expected: &str) -> Self {
        Self::InvalidVariantShape {
            field: field.to_string(),
            expected: expected.to_string(),
        }
    }

    pub fn invalid_input(context: &str, source: WorkflowError) -> Self {
        Self::InvalidInput {
            context: context.to_string(),
            source: Box::new(source),
        }
    }

    /// Collapse a list of problems: `None` when empty, the error itself when
    /// there is exactly one, an `Aggregate` otherwise.
    pub fn join(mut errors: Vec<WorkflowError>) -> Option<WorkflowError> {
        match errors.len() {
            0 => None,
            1 => errors.pop(),
            _ => Some(Self::Aggregate(errors)),
        }
    }

    /// Every leaf error, with `InvalidInput` and `Aggregate` wrappers removed.
    pub fn leaves(&self) -> Vec<&WorkflowError> {
        match self {
            Self::Aggregate(errors) => errors.iter().flat_map(|e| e.leaves()).collect(),
            Self::InvalidInput { source, .. } => source.leaves(),
            other => vec![other],
        }
    }
}
