//! Generation plan: diff rendered workflows against what is on disk.

use super::error::WorkflowError;
use super::naming::path_in;
use super::output::render;
use super::types::Workflow;
use crate::tripwire::hasher;
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// What `generate` would do to one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PlanAction {
    Create,
    Update,
    NoOp,
}

impl fmt::Display for PlanAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Create => write!(f, "CREATE"),
            Self::Update => write!(f, "UPDATE"),
            Self::NoOp => write!(f, "NO-OP"),
        }
    }
}

/// One planned file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedChange {
    pub workflow: String,
    pub path: PathBuf,
    pub action: PlanAction,
    /// Hash of the rendered document
    pub hash: String,
}

/// Plan for a whole set of workflows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationPlan {
    pub changes: Vec<PlannedChange>,
    pub to_create: u32,
    pub to_update: u32,
    pub unchanged: u32,
}

impl GenerationPlan {
    /// True when generating would not touch any file.
    pub fn is_up_to_date(&self) -> bool {
        self.to_create == 0 && self.to_update == 0
    }
}

/// Compare each rendered workflow with the file it would be written to.
pub fn plan(dir: &Path, workflows: &[&Workflow]) -> Result<GenerationPlan, WorkflowError> {
    let mut changes = Vec::with_capacity(workflows.len());
    let (mut to_create, mut to_update, mut unchanged) = (0u32, 0u32, 0u32);

    for wf in workflows {
        let path = path_in(dir, wf);
        let hash = hasher::hash_string(&render(wf)?);
        let action = determine_action(&path, &hash)?;

        match action {
            PlanAction::Create => to_create += 1,
            PlanAction::Update => to_update += 1,
            PlanAction::NoOp => unchanged += 1,
        }
        changes.push(PlannedChange {
            workflow: wf.name.clone(),
            path,
            action,
            hash,
        });
    }

    Ok(GenerationPlan {
        changes,
        to_create,
        to_update,
        unchanged,
    })
}

fn determine_action(path: &Path, desired_hash: &str) -> Result<PlanAction, WorkflowError> {
    if !path.exists() {
        return Ok(PlanAction::Create);
    }
    let current = hasher::hash_file(path).map_err(|message| WorkflowError::Io {
        path: path.display().to_string(),
        message,
    })?;
    if current == desired_hash {
        Ok(PlanAction::NoOp)
    } else {
        Ok(PlanAction::Update)
    }
}
