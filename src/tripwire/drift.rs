//! Drift detection: compare committed workflow files with what would be
//! generated now.

use crate::core::error::WorkflowError;
use crate::core::naming::{path_in, WORKFLOW_EXTENSION};
use crate::core::output::{render, GENERATED_HEADER};
use crate::core::types::Workflow;
use crate::tripwire::hasher;
use std::collections::HashSet;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

/// Reported in place of a hash when the file does not exist.
pub const MISSING: &str = "MISSING";

/// A single drift finding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriftFinding {
    pub workflow: String,
    pub path: PathBuf,
    pub expected_hash: String,
    pub actual_hash: String,
    pub detail: String,
}

/// Check one file against the hash of its expected content.
pub fn check_file_drift(workflow: &str, path: &Path, expected_hash: &str) -> Option<DriftFinding> {
    if !path.exists() {
        return Some(DriftFinding {
            workflow: workflow.to_string(),
            path: path.to_path_buf(),
            expected_hash: expected_hash.to_string(),
            actual_hash: MISSING.to_string(),
            detail: format!("{} does not exist", path.display()),
        });
    }

    let actual = hasher::hash_file(path).unwrap_or_else(|e| format!("ERROR:{}", e));
    if actual == expected_hash {
        return None;
    }
    Some(DriftFinding {
        workflow: workflow.to_string(),
        path: path.to_path_buf(),
        expected_hash: expected_hash.to_string(),
        actual_hash: actual,
        detail: format!("{} content changed", path.display()),
    })
}

/// Check every workflow against its file in `dir`.
pub fn detect_drift(dir: &Path, workflows: &[&Workflow]) -> Result<Vec<DriftFinding>, WorkflowError> {
    let mut findings = Vec::new();
    for wf in workflows {
        let expected = hasher::hash_string(&render(wf)?);
        let path = path_in(dir, wf);
        if let Some(finding) = check_file_drift(&wf.name, &path, &expected) {
            tracing::warn!(
                workflow = %finding.workflow,
                path = %finding.path.display(),
                "{}",
                finding.detail
            );
            findings.push(finding);
        }
    }
    Ok(findings)
}

/// Generated files in `dir` that no workflow of the set produces any more.
///
/// Only files whose first line is the generated-file header are considered;
/// hand-written workflows living next to generated ones are left alone.
pub fn find_orphans(dir: &Path, workflows: &[&Workflow]) -> Result<Vec<PathBuf>, WorkflowError> {
    if !dir.exists() {
        return Ok(Vec::new());
    }
    let io = |e: std::io::Error| WorkflowError::Io {
        path: dir.display().to_string(),
        message: e.to_string(),
    };

    let expected: HashSet<String> = workflows.iter().map(|wf| wf.filename()).collect();
    let mut orphans = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(io)? {
        let path = entry.map_err(io)?.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if !name.ends_with(WORKFLOW_EXTENSION) || expected.contains(name) {
            continue;
        }
        if is_generated(&path) {
            tracing::warn!(path = %path.display(), "generated workflow no longer produced");
            orphans.push(path);
        }
    }
    orphans.sort();
    Ok(orphans)
}

fn is_generated(path: &Path) -> bool {
    let Ok(file) = std::fs::File::open(path) else {
        return false;
    };
    let mut first = String::new();
    match BufReader::new(file).read_line(&mut first) {
        Ok(_) => first.trim_end() == GENERATED_HEADER,
        Err(_) => false,
    }
}
