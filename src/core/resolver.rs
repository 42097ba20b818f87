//! Job dependency resolution and cross-document reference checks.
//!
//! Builds a DAG from each workflow's `needs` edges and computes a topological
//! job order using Kahn's algorithm with deterministic (alphabetical)
//! tie-breaking. Validation collects every problem instead of stopping at the
//! first.

use super::error::WorkflowError;
use super::naming::{filename_for, DEFAULT_WORKFLOWS_DIR};
use super::types::Workflow;
use regex::Regex;
use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};
use std::sync::OnceLock;

/// Job id of the commit job in every stage workflow.
pub const COMMIT_JOB_ID: &str = "commit";

fn job_id_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[_A-Za-z][A-Za-z0-9_-]*$").expect("job id pattern is a valid regex")
    })
}

/// Job ids must start with a letter or `_` and contain only alphanumerics,
/// `-`, or `_`.
pub fn is_valid_job_id(id: &str) -> bool {
    job_id_pattern().is_match(id)
}

/// Topological job order for one workflow.
///
/// Needs that do not name a sibling job are ignored here; see
/// [`validate_workflow`] for reporting them.
pub fn job_execution_order(workflow: &Workflow) -> Result<Vec<String>, WorkflowError> {
    let job_ids: Vec<String> = workflow.jobs.keys().cloned().collect();
    let mut in_degree: HashMap<&str, usize> = HashMap::new();
    let mut adjacency: HashMap<&str, Vec<&str>> = HashMap::new();

    for id in &job_ids {
        in_degree.insert(id.as_str(), 0);
        adjacency.insert(id.as_str(), Vec::new());
    }

    for (id, job) in &workflow.jobs {
        for need in &job.needs {
            let Some(successors) = adjacency.get_mut(need.as_str()) else {
                continue;
            };
            successors.push(id.as_str());
            if let Some(degree) = in_degree.get_mut(id.as_str()) {
                *degree += 1;
            }
        }
    }

    let mut zero_degree: Vec<&str> = in_degree
        .iter()
        .filter(|(_, &d)| d == 0)
        .map(|(id, _)| *id)
        .collect();
    zero_degree.sort_unstable();
    let mut queue: VecDeque<&str> = zero_degree.into_iter().collect();

    let mut order = Vec::with_capacity(job_ids.len());
    while let Some(current) = queue.pop_front() {
        order.push(current.to_string());

        let mut next_ready: Vec<&str> = Vec::new();
        if let Some(neighbors) = adjacency.get(current) {
            for neighbor in neighbors {
                if let Some(degree) = in_degree.get_mut(neighbor) {
                    *degree -= 1;
                    if *degree == 0 {
                        next_ready.push(*neighbor);
                    }
                }
            }
        }
        next_ready.sort_unstable();
        queue.extend(next_ready);
    }

    if order.len() != job_ids.len() {
        let ordered: HashSet<&str> = order.iter().map(String::as_str).collect();
        let mut jobs: Vec<String> = job_ids
            .iter()
            .filter(|id| !ordered.contains(id.as_str()))
            .cloned()
            .collect();
        jobs.sort();
        return Err(WorkflowError::DependencyCycle { jobs });
    }

    Ok(order)
}

/// Validate one workflow.
///
/// `external` lists names outside this workflow that a `needs` entry may
/// legitimately name (the other workflows of a river).
pub fn validate_workflow(workflow: &Workflow, external: &[String]) -> Vec<WorkflowError> {
    let mut errors = Vec::new();

    for (id, job) in &workflow.jobs {
        if !is_valid_job_id(id) {
            errors.push(WorkflowError::InvalidJobId { job: id.clone() });
        }
        if job.is_reusable_call() && !job.steps.is_empty() {
            errors.push(WorkflowError::AmbiguousReference { job: id.clone() });
        }
        for need in &job.needs {
            if workflow.jobs.contains_key(need) || external.contains(need) {
                continue;
            }
            errors.push(WorkflowError::UnknownNeed {
                job: id.clone(),
                need: need.clone(),
            });
        }
    }

    if let Err(cycle) = job_execution_order(workflow) {
        errors.push(cycle);
    }

    errors
}

/// Check that every local `uses` reference in `workflows` names a file that
/// is itself part of `workflows`. Remote references (`owner/repo/...@ref`)
/// are outside the generated set and are not checked.
pub fn validate_references(workflows: &[&Workflow]) -> Vec<WorkflowError> {
    let local_prefix = format!("{}/", DEFAULT_WORKFLOWS_DIR);
    let known: HashSet<String> = workflows.iter().map(|wf| wf.filename()).collect();

    let mut errors = Vec::new();
    for wf in workflows {
        for (id, job) in &wf.jobs {
            let Some(file) = job.uses.strip_prefix(&local_prefix) else {
                continue;
            };
            if !known.contains(file) && !known.contains(&filename_for(file)) {
                errors.push(WorkflowError::UnknownReference {
                    job: id.clone(),
                    reference: job.uses.clone(),
                });
            }
        }
    }
    errors
}

/// Every workflow of a set must land in its own file. Reports each file name
/// claimed by more than one workflow, in file name order.
pub fn validate_filenames(workflows: &[&Workflow]) -> Vec<WorkflowError> {
    let mut by_file: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for wf in workflows {
        by_file.entry(wf.filename()).or_default().push(wf.name.clone());
    }
    by_file
        .into_iter()
        .filter(|(_, names)| names.len() > 1)
        .map(|(filename, workflows)| WorkflowError::DuplicateFilename { filename, workflows })
        .collect()
}
